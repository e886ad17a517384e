use std::{io, sync::Arc};

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};

use quiz_server::{
    actor::ActorMiddleware, app_state::AppState, config::Config, handlers,
    middleware::RequestIdMiddleware, services::ActivationScheduler,
};

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::from_env();
    config.validate().map_err(io::Error::other)?;

    let state = Arc::new(AppState::new(config.clone()).await.map_err(io::Error::other)?);

    let scheduler = ActivationScheduler::new(
        Arc::clone(&state.activation_service),
        config.activation_interval(),
    );
    scheduler.start().await;

    let bind = (config.web_server_host.clone(), config.web_server_port);
    log::info!("Starting HTTP server on {}:{}", bind.0, bind.1);
    log::info!("Activation webhook target: {}", config.webhook_url);

    let system_actor = config.system_actor.clone();
    let server = HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(Arc::clone(&state)))
            .wrap(ActorMiddleware::new(&system_actor))
            .wrap(RequestIdMiddleware)
            .wrap(Logger::default())
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .configure(handlers::configure)
    })
    .bind(bind)?
    .run()
    .await;

    scheduler.stop().await;
    log::info!("Server stopped");
    server
}
