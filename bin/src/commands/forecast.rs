//! Latest forecast fetch.

use anyhow::Result;
use clap::ValueEnum;

use super::Connection;

/// Forecast horizon choice.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub(crate) enum Kind {
    /// Short-horizon forecast.
    Near,
    /// Long-horizon forecast.
    Far,
}

pub(crate) async fn forecast(
    connection: &Connection,
    store: &str,
    tank: &str,
    kind: Kind,
) -> Result<()> {
    let client = connection.forecast_client()?;

    let forecasts = match kind {
        Kind::Near => client.near(store, tank).await?,
        Kind::Far => client.far(store, tank).await?,
    };
    for forecast in &forecasts {
        println!("{}", serde_json::to_string(forecast)?);
    }
    eprintln!("{} forecast points", forecasts.len());
    Ok(())
}
