use anyhow::Result;
use clap::Parser;
use eventcount::*;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::time::FormatTime;

struct LocalTimer;

impl FormatTime for LocalTimer {
    fn format_time(&self, w: &mut tracing_subscriber::fmt::format::Writer<'_>) -> std::fmt::Result {
        write!(
            w,
            "{}",
            chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z")
        )
    }
}

/// Ingest a customer events file and answer hourly roll-up queries.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the delimited events file
    file_path: std::path::PathBuf,

    /// Keep serving GET /hourly after ingestion instead of exiting
    #[arg(long)]
    serve: bool,

    /// Customer to query in one-shot mode
    #[arg(long)]
    customer_id: Option<String>,

    /// Range start (inclusive), e.g. "2021-03-01 00:30:00+0000"
    #[arg(long)]
    start: Option<String>,

    /// Range end (exclusive)
    #[arg(long)]
    end: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_timer(LocalTimer)
        .with_env_filter(filter)
        .init();

    let args = Args::parse();
    let app_config = config::AppConfig::load()?;

    let repo = Arc::new(
        event_repo::EventRepo::connect(
            &app_config.database.path,
            app_config.database.max_pool_size,
        )
        .await?,
    );
    repo.init().await?;

    ingest::ingest_file(
        repo.as_ref(),
        &args.file_path,
        app_config.ingest.flush_threshold,
    )
    .await?;

    if args.serve {
        let app = routes::app(repo);
        let addr = format!("{}:{}", app_config.server.host, app_config.server.port);
        let listener = tokio::net::TcpListener::bind(&addr).await?;
        tracing::info!("Listening on http://{}", addr);

        tokio::select! {
            result = axum::serve(listener, app) => {
                result?;
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Received shutdown signal");
            }
        }
    } else {
        let (Some(customer_id), Some(start), Some(end)) = (args.customer_id, args.start, args.end)
        else {
            anyhow::bail!("missing one of required args: --customer-id, --start or --end");
        };
        let counts =
            event_repo::rollup::hourly_event_counts(repo.as_ref(), &customer_id, &start, &end)
                .await?;
        println!("{}", serde_json::to_string_pretty(&counts)?);
    }

    Ok(())
}
