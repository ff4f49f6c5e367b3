//! # Price-Post Binary
//!
//! The entry point that assembles the backend from settings and the
//! compiled-in plugins.

use actix_web::{web, App, HttpServer};
use anyhow::Context;
use pp_api::{configure_routes, middleware, AppState};
use pp_config::Settings;

#[cfg(feature = "auth-jwt")]
use pp_auth_jwt::JwtAdminAuth;

#[cfg(not(feature = "auth-jwt"))]
compile_error!("price-post needs an auth plugin; enable the `auth-jwt` feature");

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    // 1. Settings (.env + PRICE_POST_* environment)
    let settings = Settings::load().context("loading settings")?;
    log::debug!("settings: {settings:?}");

    // 2. Auth implementation
    #[cfg(feature = "auth-jwt")]
    let auth = JwtAdminAuth::from_settings(&settings).context("initialising auth")?;

    let state = web::Data::new(AppState {
        auth: Box::new(auth),
    });

    let (host, port) = settings.bind_addr();
    let allowed_origin = settings.allowed_origin.clone();
    log::info!("Price-Post backend listening on http://{host}:{port}");

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(middleware::cors_policy(allowed_origin.as_deref()))
            .wrap(middleware::security_headers())
            .wrap(middleware::standard_middleware())
            .configure(configure_routes)
    })
    .bind((host.as_str(), port))
    .with_context(|| format!("binding {host}:{port}"))?
    .run()
    .await
    .context("server terminated")?;

    Ok(())
}
