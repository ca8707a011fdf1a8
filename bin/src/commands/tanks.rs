//! Tank metadata listing.

use anyhow::Result;

use super::Connection;

pub(crate) async fn tanks(connection: &Connection, store: &str, tank: &str) -> Result<()> {
    let client = connection.ims_client()?;
    let tanks = client.tanks(store, tank).await?;

    for tank in &tanks {
        println!("{}", serde_json::to_string(tank)?);
    }
    eprintln!("{} tanks", tanks.len());
    Ok(())
}
