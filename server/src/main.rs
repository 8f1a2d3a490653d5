use actix_web::middleware::Logger;
use actix_web::{web, App, HttpServer};

use server::config::RelayConfig;
use server::handlers;
use server::server::spawn_server;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = RelayConfig::from_env()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;
    log::info!(
        "Listening on {}:{} (allowed origin: {:?})",
        config.host,
        config.port,
        config.allowed_origin
    );

    let srv_tx = spawn_server();
    let bind_address = config.bind_address();

    HttpServer::new(move || {
        App::new()
            .wrap(config.cors())
            .wrap(Logger::default())
            .app_data(web::Data::new(srv_tx.clone()))
            .app_data(web::Data::new(config.clone()))
            .configure(handlers::root)
    })
    .bind(bind_address)?
    .run()
    .await
}
