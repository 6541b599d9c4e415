use clap::Parser;
use compinv::cli::dispatcher::Dispatcher;
use compinv::cli::main_types::Cli;
use compinv::storage::config::Config;
use compinv::utils::logging::init_logging;
use std::path::Path;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    // Load Config
    let config_path = cli
        .config_dir
        .as_ref()
        .map(|dir| Config::file_in(Path::new(dir)));

    let config = match Config::load(config_path.clone()) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Error loading config: {}", err);
            std::process::exit(1);
        }
    };

    if let Some(config_dir) = &cli.config_dir {
        log::debug!("using config directory: {}", config_dir);
    }

    let mut dispatcher = Dispatcher::new(config, config_path, cli.url, cli.token);

    // Execute the command
    if let Err(e) = dispatcher.dispatch(cli.command).await {
        eprintln!("{} {}", e.severity().emoji(), e.display_friendly());
        if let Some(hint) = e.troubleshooting_hint() {
            eprintln!("💡 {}", hint);
        }
        log::debug!("error detail: {:?}", e);
        std::process::exit(1);
    }
}
