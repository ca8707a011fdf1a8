//! wetstock CLI - clients for the Forecast and Inventory Management services.

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

use commands::Connection;

#[derive(Parser)]
#[command(name = "wetstock")]
#[command(about = "Query the wetstock Forecast and Inventory Management services", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// IMS base address. Defaults to $IMS_URL.
    #[arg(long, global = true)]
    ims_url: Option<String>,

    /// Forecast service base address. Defaults to $FC_URL.
    #[arg(long, global = true)]
    fc_url: Option<String>,

    /// Shared-secret credential. Defaults to $SYSTEM_PSK.
    #[arg(long, global = true)]
    psk: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// List tank metadata
    Tanks {
        /// Filter by store number
        #[arg(short, long, default_value = "")]
        store: String,

        /// Filter by tank id
        #[arg(short, long, default_value = "")]
        tank: String,
    },

    /// Fetch inventory readings for one tank
    Readings {
        /// Store number
        store: String,

        /// Tank id
        tank: String,

        /// Start of the range (YYYY-MM-DD or RFC 3339)
        #[arg(short, long)]
        start: String,

        /// End of the range. Defaults to open-ended.
        #[arg(short, long)]
        end: Option<String>,

        /// Maximum rows to return
        #[arg(short, long)]
        limit: Option<u64>,

        /// Localize timestamps to a named zone (e.g. America/Chicago)
        #[arg(short, long)]
        zone: Option<String>,
    },

    /// Pull replication log rows for a time window
    Replication {
        /// Window start (YYYY-MM-DD or RFC 3339). Defaults to two days ago.
        #[arg(short, long)]
        window_start: Option<String>,

        /// Page size
        #[arg(short, long, default_value = "1000")]
        limit: u64,

        /// Forwarded verbatim to the service
        #[arg(long)]
        force: bool,

        /// Quiet mode (suppress progress output)
        #[arg(short, long)]
        quiet: bool,
    },

    /// Archive old records batch by batch until none remain
    ArchiveAll {
        /// Maximum records per batch
        #[arg(short, long, default_value = "500")]
        limit: u64,

        /// Age threshold in days
        #[arg(short, long, default_value = "30")]
        days_back: u64,

        /// Pause between batches, in seconds
        #[arg(long, default_value = "10")]
        sleep: u64,
    },

    /// Fetch the latest forecast for one tank
    Forecast {
        /// Store number
        store: String,

        /// Tank id
        tank: String,

        /// Forecast horizon
        #[arg(short, long, value_enum, default_value = "near")]
        kind: commands::forecast::Kind,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .init();

    // Show help if no command provided
    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    let connection = Connection {
        ims_url: cli.ims_url,
        fc_url: cli.fc_url,
        psk: cli.psk,
    };

    match command {
        Commands::Tanks { store, tank } => commands::tanks::tanks(&connection, &store, &tank).await,
        Commands::Readings {
            store,
            tank,
            start,
            end,
            limit,
            zone,
        } => {
            commands::readings::readings(
                &connection,
                &store,
                &tank,
                &start,
                end.as_deref(),
                limit,
                zone.as_deref(),
            )
            .await
        }
        Commands::Replication {
            window_start,
            limit,
            force,
            quiet,
        } => {
            commands::replication::pull(&connection, window_start.as_deref(), limit, force, quiet)
                .await
        }
        Commands::ArchiveAll {
            limit,
            days_back,
            sleep,
        } => commands::archive::archive_all(&connection, limit, days_back, sleep).await,
        Commands::Forecast { store, tank, kind } => {
            commands::forecast::forecast(&connection, &store, &tank, kind).await
        }
    }
}
