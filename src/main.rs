use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;
use tripsim_api::{RecommendLimits, RestApi};
use tripsim_similarity::Recommender;
use tripsim_storage::{
    CatalogSources, DEFAULT_HOTEL_FILE, DEFAULT_PLACE_FILE, DEFAULT_RESTAURANT_FILE,
};

/// Content-based recommendations for restaurants, hotels and tourist places
#[derive(Parser, Debug)]
#[command(name = "tripsim")]
#[command(about = "Restaurant, hotel and place recommendations", long_about = None)]
struct Args {
    /// Directory holding the catalog CSV files
    #[arg(short, long, default_value = "./data")]
    data_dir: PathBuf,

    /// Restaurant catalog file, relative to the data directory
    #[arg(long, default_value = DEFAULT_RESTAURANT_FILE)]
    restaurants: String,

    /// Hotel catalog file, relative to the data directory
    #[arg(long, default_value = DEFAULT_HOTEL_FILE)]
    hotels: String,

    /// Tourist place catalog file, relative to the data directory
    #[arg(long, default_value = DEFAULT_PLACE_FILE)]
    places: String,

    /// HTTP API port
    #[arg(long, default_value_t = 5000)]
    http_port: u16,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_level = match args.log_level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting tripsim v{}", env!("CARGO_PKG_VERSION"));
    info!("Data directory: {:?}", args.data_dir);

    let sources = CatalogSources::in_dir(&args.data_dir, &args.restaurants, &args.hotels, &args.places);
    let registry = sources.load_registry()?;
    let recommender = Arc::new(Recommender::new(Arc::new(registry)));

    let http_port = args.http_port;
    let http_handle = std::thread::spawn(move || {
        info!("Starting HTTP server on port {}", http_port);
        let sys = actix_web::rt::System::new();
        sys.block_on(async {
            if let Err(e) = RestApi::start(recommender, RecommendLimits::default(), http_port).await {
                error!("HTTP server error: {}", e);
            }
        })
    });

    info!("HTTP API: http://localhost:{}/", http_port);

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received");
        }
        _ = tokio::task::spawn_blocking(move || {
            http_handle.join().ok();
        }) => {
            info!("HTTP server stopped");
        }
    }

    info!("Shutting down...");
    Ok(())
}
