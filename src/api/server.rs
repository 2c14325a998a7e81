// API server implementation
// Author: Gabriel Demetrios Lafis

use std::io;
use std::net::SocketAddr;

use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use log::info;

use crate::services::Services;
use super::routes;

/// API server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: usize,
    pub enable_cors: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 8080,
            workers: num_cpus::get(),
            enable_cors: false,
        }
    }
}

/// API server
pub struct Server {
    config: ServerConfig,
    services: Services,
}

impl Server {
    /// Create a new API server
    pub fn new(services: Services, config: ServerConfig) -> Self {
        Server { config, services }
    }

    /// Run the API server
    pub async fn run(&self) -> io::Result<()> {
        let addr = format!("{}:{}", self.config.host, self.config.port)
            .parse::<SocketAddr>()
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;

        let services = self.services.clone();
        let enable_cors = self.config.enable_cors;

        info!("Starting server at http://{} with {} workers", addr, self.config.workers);

        HttpServer::new(move || {
            let cors = if enable_cors {
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600)
            } else {
                Cors::default()
            };

            App::new()
                .app_data(web::Data::new(services.clone()))
                .wrap(cors)
                .configure(routes::configure)
        })
        .workers(self.config.workers)
        .bind(addr)?
        .run()
        .await
    }
}
