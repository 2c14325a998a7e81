// Clinic Back Office - Main executable
// Author: Gabriel Demetrios Lafis

use std::path::Path;

use anyhow::Context;
use clap::{App, Arg};
use log::info;

use clinic_backoffice::{
    api::{Server, ServerConfig},
    services::Services,
    storage::memory_collections,
    utils::{init_logging, Config},
};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Parse command line arguments
    let matches = App::new("Clinic Back Office")
        .version(env!("CARGO_PKG_VERSION"))
        .author("Gabriel Demetrios Lafis")
        .about("Listings and dashboard analytics for a healthcare back office")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Sets a custom config file (JSON or YAML)")
                .takes_value(true),
        )
        .subcommand(
            App::new("server")
                .about("Run the API server")
                .arg(
                    Arg::new("host")
                        .long("host")
                        .value_name("HOST")
                        .help("Sets the server host")
                        .takes_value(true),
                )
                .arg(
                    Arg::new("port")
                        .short('p')
                        .long("port")
                        .value_name("PORT")
                        .help("Sets the server port")
                        .takes_value(true),
                ),
        )
        .get_matches();

    // Load configuration; a missing file falls back to defaults
    let config = Config::load(matches.value_of("config"))
        .context("Error loading config file")?;

    let log_file = config.logging.file.as_deref().map(Path::new);
    if let Err(err) = init_logging(config.log_level_filter(), log_file) {
        eprintln!("Error initializing logger: {}", err);
    }

    let time_zone = config.storage.time_zone()?;
    let collections = memory_collections(config.storage.seed_path.as_deref().map(Path::new), time_zone)
        .context("Error seeding collections")?;
    let services = Services::new(collections, config.pagination.default_page_limit);

    if let Some(matches) = matches.subcommand_matches("server") {
        // Override config with command line arguments
        let host = matches.value_of("host").unwrap_or(&config.server.host);
        let port = match matches.value_of("port") {
            Some(p) => p.parse::<u16>().with_context(|| format!("Invalid port '{}'", p))?,
            None => config.server.port,
        };

        let server_config = ServerConfig {
            host: host.to_string(),
            port,
            workers: config.server.workers.unwrap_or_else(num_cpus::get),
            enable_cors: config.server.enable_cors,
        };

        info!("Starting server at {}:{}", host, port);
        Server::new(services, server_config).run().await?;
    } else {
        println!("No subcommand specified. Use --help for usage information.");
    }

    Ok(())
}
