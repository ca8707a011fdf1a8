//! Inventory readings fetch.

use anyhow::Result;
use wetstock_lib::ReadingsQuery;

use super::{Connection, parse_instant};

pub(crate) async fn readings(
    connection: &Connection,
    store: &str,
    tank: &str,
    start: &str,
    end: Option<&str>,
    limit: Option<u64>,
    zone: Option<&str>,
) -> Result<()> {
    let client = connection.ims_client()?;

    let mut query = ReadingsQuery::since(parse_instant(start)?);
    if let Some(end) = end {
        query = query.until(parse_instant(end)?);
    }
    if let Some(limit) = limit {
        query = query.limit(limit);
    }

    let count = match zone {
        Some(zone) => {
            let readings = client.localized_readings(zone, store, tank, &query).await?;
            for reading in &readings {
                println!("{}", serde_json::to_string(reading)?);
            }
            readings.len()
        }
        None => {
            let readings = client.readings(store, tank, &query).await?;
            for reading in &readings {
                println!("{}", serde_json::to_string(reading)?);
            }
            readings.len()
        }
    };
    eprintln!("{count} readings");
    Ok(())
}
