use std::{
    fs::OpenOptions,
    net::{IpAddr, SocketAddr},
    path::{Path, PathBuf},
    process::ExitCode,
    sync::Arc,
    time::Duration,
};

use axum::{
    Router,
    extract::{MatchedPath, Request},
};
use axum_server::Handle;
use clap::Parser;
use tower_http::trace::TraceLayer;

#[cfg(debug_assertions)]
use tower_livereload::LiveReloadLayer;

use tracing_subscriber::{Layer, filter, layer::SubscriberExt, util::SubscriberInitExt};

use budget_tracker::{
    AppState, NoticeBoard, RemoteClient, build_router, get_local_offset, graceful_shutdown,
    open_local_store, reconcile,
};

/// The web server for the budget tracker widget.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the local SQLite database that keeps transactions while offline.
    #[arg(long, default_value = "budget_tracker.db")]
    db_path: PathBuf,

    /// Base URL of the remote transaction service, e.g. "https://example.com".
    #[arg(long, env = "BUDGET_TRACKER_REMOTE_URL")]
    remote_url: String,

    /// The address to serve the widget from.
    #[arg(long, default_value = "127.0.0.1")]
    host: IpAddr,

    /// The port to serve the widget from.
    #[arg(short, long, default_value_t = 3000)]
    port: u16,

    /// How long to wait for the remote service before giving up on a request.
    #[arg(long, default_value_t = 10)]
    request_timeout_secs: u64,

    /// The canonical name of the local timezone, e.g. "Pacific/Auckland".
    #[arg(long, env = "BUDGET_TRACKER_TIMEZONE", default_value = "Etc/UTC")]
    timezone: String,

    /// Directory to serve static files from.
    #[arg(long, default_value = "static/")]
    static_dir: PathBuf,

    /// File path for the debug log.
    #[arg(long, default_value = "debug.log")]
    log_path: PathBuf,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    if let Err(error) = setup_logging(&args.log_path) {
        eprintln!("Could not open log file {}: {error}", args.log_path.display());
        return ExitCode::FAILURE;
    }

    if get_local_offset(&args.timezone).is_none() {
        tracing::error!("\"{}\" is not a valid canonical timezone name", args.timezone);
        return ExitCode::FAILURE;
    }

    let remote_client = match RemoteClient::new(
        &args.remote_url,
        Duration::from_secs(args.request_timeout_secs),
    ) {
        Ok(client) => client,
        Err(error) => {
            tracing::error!("Could not create remote client: {error}");
            return ExitCode::FAILURE;
        }
    };

    let (local_store, notice) = open_local_store(&args.db_path);
    let state = AppState::new(
        local_store,
        remote_client,
        &args.timezone,
        NoticeBoard::new(notice),
    );

    match reconcile(
        state.local_store.as_ref(),
        &state.remote_client,
        &state.ledger,
        &state.notices,
    )
    .await
    {
        Ok(report) if !report.remote_available => {
            tracing::warn!("Remote service is unavailable, starting in offline mode");
        }
        Ok(_) => {}
        Err(error) => tracing::error!("Could not reconcile transactions: {error}"),
    }

    let handle = Handle::new();
    tokio::spawn(graceful_shutdown(handle.clone()));

    let router = add_tracing_layer(build_router(state, &args.static_dir));

    #[cfg(debug_assertions)]
    let router = router
        .layer(axum::middleware::from_fn(budget_tracker::logging_middleware))
        .layer(LiveReloadLayer::new());

    let addr = SocketAddr::from((args.host, args.port));
    tracing::info!("HTTP server listening on http://{}", addr);

    if let Err(error) = axum_server::bind(addr)
        .handle(handle)
        .serve(router.into_make_service())
        .await
    {
        tracing::error!("Server stopped with an error: {error}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

fn setup_logging(log_path: &Path) -> std::io::Result<()> {
    let stdout_log = tracing_subscriber::fmt::layer().pretty();

    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)?;

    let debug_log = tracing_subscriber::fmt::layer()
        .pretty()
        .with_writer(Arc::new(log_file));

    tracing_subscriber::registry()
        .with(
            stdout_log
                .with_filter(filter::LevelFilter::INFO)
                .and_then(debug_log)
                .with_filter(filter::LevelFilter::DEBUG),
        )
        .init();

    Ok(())
}

fn add_tracing_layer(router: Router) -> Router {
    let tracing_layer = TraceLayer::new_for_http()
        .make_span_with(|req: &Request| {
            let method = req.method();
            let uri = req.uri();

            let matched_path = req
                .extensions()
                .get::<MatchedPath>()
                .map(|matched_path| matched_path.as_str());

            tracing::debug_span!("request", %method, %uri, matched_path)
        })
        // By default, `TraceLayer` will log 5xx responses but we're doing our specific
        // logging of errors so disable that
        .on_failure(());

    router.layer(tracing_layer)
}
