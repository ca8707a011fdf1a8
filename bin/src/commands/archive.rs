//! Batched archival runner.

use std::time::Duration;

use anyhow::Result;
use wetstock_lib::ArchiveOptions;

use super::Connection;

pub(crate) async fn archive_all(
    connection: &Connection,
    limit: u64,
    days_back: u64,
    sleep: u64,
) -> Result<()> {
    let client = connection.ims_client()?;

    let options = ArchiveOptions {
        limit,
        days_back,
        sleep: Duration::from_secs(sleep),
        log_progress: true,
    };
    client.archive_all(&options).await?;
    Ok(())
}
