use papertrade_server::{App, ServerConfig};

fn print_help() {
    eprintln!(
        r#"Paper-Trading Server - quote proxy and simulated order ledger

USAGE:
    papertrade-server [OPTIONS]

OPTIONS:
    --config <PATH>     Load configuration from JSON file
    --help              Print this help message

ENVIRONMENT VARIABLES:
    HOST                Server host (default: 0.0.0.0)
    PORT                Server port (default: 5000)
    QUOTE_SOURCE        Upstream: mock, yahoo or proxy (default: mock)
    QUOTE_SOURCE_URL    Base URL for yahoo/proxy sources
    RUST_LOG            Log level filter (default: info)

EXAMPLES:
    # Offline, against the mock source
    papertrade-server

    # Real market data
    QUOTE_SOURCE=yahoo papertrade-server

    # Run with config file
    papertrade-server --config papertrade.json
"#
    );
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Parse command line arguments
    let args: Vec<String> = std::env::args().collect();
    let mut config_path: Option<String> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                print_help();
                return Ok(());
            }
            "--config" | "-c" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("Error: --config requires a path argument");
                    std::process::exit(1);
                }
                config_path = Some(args[i].clone());
            }
            arg => {
                eprintln!("Unknown argument: {}", arg);
                print_help();
                std::process::exit(1);
            }
        }
        i += 1;
    }

    let mut config = match config_path {
        Some(path) => {
            log::info!("Loading configuration from: {}", path);
            ServerConfig::from_file(&path)?
        }
        None => {
            log::info!("Using default configuration");
            ServerConfig::default()
        }
    };
    config.apply_env()?;
    config.validate()?;

    let app = App::new(config)?;

    log::info!("Starting Paper-Trading Server");
    log::info!("Quote source: {}", app.state.quotes.source_name());
    log::info!("Seed balance: {}", app.state.engine.get_balance());
    log::info!("Available endpoints:");
    log::info!("  GET    /api/health");
    log::info!("  GET    /api/stock/{{symbol}}?interval=5m&range=1d");
    log::info!("  GET    /api/search/{{query}}");
    log::info!("  GET    /api/balance | /api/positions | /api/summary");
    log::info!("  GET    /api/orders");
    log::info!("  POST   /api/orders");
    log::info!("  DELETE /api/orders/{{id}}");
    log::info!("  POST   /api/watch/{{symbol}}");
    log::info!("  DELETE /api/watch/{{symbol}}");

    app.run().await
}
