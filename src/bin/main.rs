use actix_web::{middleware::Logger, web, App, HttpServer};
use anyhow::Context;
use tracing::info;

use plank::config::Config;
use plank::AppState;

fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt().with_env_filter(filter).with_target(false).try_init();
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = Config::from_env();
    let bind_addr = config.bind_addr.clone();

    // One store per process; every worker shares it.
    let state = web::Data::new(AppState::new(config));

    info!("Server listening on http://{}", bind_addr);

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(state.clone())
            .configure(plank::routes)
    })
    .bind(&bind_addr)
    .with_context(|| format!("failed to bind {}", bind_addr))?
    .run()
    .await
    .context("server exited with an error")?;

    Ok(())
}
