//! Paginated replication pull.

use anyhow::Result;
use futures::StreamExt;
use indicatif::{ProgressBar, ProgressStyle};
use wetstock_lib::ReplicationQuery;

use super::{Connection, parse_instant};

pub(crate) async fn pull(
    connection: &Connection,
    window_start: Option<&str>,
    limit: u64,
    force: bool,
    quiet: bool,
) -> Result<()> {
    let client = connection.ims_client()?;

    let query = ReplicationQuery {
        window_start: window_start.map(parse_instant).transpose()?,
        limit,
        force,
    };

    let progress = if quiet {
        ProgressBar::hidden()
    } else {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} [{elapsed_precise}] {msg}")
                .expect("valid progress template"),
        );
        pb
    };

    let mut rows: u64 = 0;
    let mut pages = std::pin::pin!(client.replication_data(query).await?);
    while let Some(page) = pages.next().await {
        rows += page.len() as u64;
        for row in &page {
            println!("{}", serde_json::to_string(row)?);
        }
        progress.set_message(format!("{rows} rows"));
        progress.tick();
    }

    progress.finish_and_clear();
    eprintln!("{rows} rows");
    Ok(())
}
