use actix_web::{middleware::NormalizePath, web, App, HttpServer};
use dotenv::dotenv;
use landing_server::{
    background_task::start_ledger_sweep,
    graceful_shutdown::shutdown_signal,
    routes::configure_routes,
    settings::{AppConfig, AppEnvironment},
    telemetry::init_subscriber,
    AppState,
};
use tracing_actix_web::TracingLogger;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    init_subscriber(AppEnvironment::from_env().is_ok_and(|env| env.is_production()));

    let config = match AppConfig::new() {
        Ok(cfg) => {
            tracing::info!("Loaded configuration: {:?}", cfg);
            cfg
        }
        Err(e) => {
            tracing::error!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    let app_state = match AppState::new(&config) {
        Ok(state) => web::Data::new(state),
        Err(e) => {
            tracing::error!("Startup error: {:#}", e);
            std::process::exit(1);
        }
    };

    let server_addr = format!("{}:{}", config.host, config.port);

    tracing::info!(
        "🚀 Landing page v{} running on http://{}",
        env!("CARGO_PKG_VERSION"),
        server_addr
    );

    let sweep = tokio::spawn(start_ledger_sweep(
        app_state.rate_limiter.clone(),
        config.rate_limit_sweep_interval(),
    ));

    let server = HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .wrap(NormalizePath::trim())
            .wrap(TracingLogger::default())
            .configure(configure_routes)
    })
    .workers(config.worker_count)
    .bind(server_addr)?
    .run();

    let result = tokio::select! {
        res = server => res,
        _ = shutdown_signal() => Ok(()),
    };

    sweep.abort();
    result
}
