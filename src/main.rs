//! Handmade Commerce - pricing and shipping quote service

use anyhow::Result;
use handmade_commerce::{api, config::Config};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry().with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into())).with(tracing_subscriber::fmt::layer()).init();

    let config = Config::from_env()?;
    let shipping = config.shipping_table()?;
    tracing::info!(methods = shipping.len(), default_locale = %config.default_locale, "shipping methods ready");

    let app = api::router(api::AppState::new(shipping, config.default_locale));
    tracing::info!("🚀 Handmade Commerce listening on 0.0.0.0:{}", config.port);
    axum::serve(tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port)).await?, app).await?;
    Ok(())
}
