use eyre::Result;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = nls::cli::parse();

    // Initialize logging first
    if let Err(e) = nls::init_logging(cli.verbose) {
        eprintln!("Warning: Failed to initialize logging: {}", e);
    }

    log::info!("================================================================================");
    log::info!("NEW SESSION STARTING: target={}", cli.target);
    log::info!("================================================================================");

    let config = nls::Config::from(&cli);
    nls::app::run(config, nls::default_discovery()).await
}
