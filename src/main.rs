use actix_web::{web, App, HttpServer};
use std::env;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use signal_relay_rs::api;
use signal_relay_rs::auth_middleware::AuthMiddleware;
use signal_relay_rs::config::Settings;
use signal_relay_rs::context::RelayContext;
use signal_relay_rs::inbox::SignalInbox;
use signal_relay_rs::normalizer::SignalNormalizer;
use signal_relay_rs::relay::{start_relay, Relay};
use signal_relay_rs::transport::TelegramBotClient;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    if env::var("LOG_FORMAT").map(|v| v == "json").unwrap_or(false) {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    // Load .env before anything reads the environment
    dotenv::dotenv().ok();
    init_tracing();

    info!("╔═══════════════════════════════════════════════════════════════╗");
    info!("║               SIGNAL RELAY RS                                 ║");
    info!("║               Chat signal normalization service               ║");
    info!("╚═══════════════════════════════════════════════════════════════╝");

    let settings = match Settings::new() {
        Ok(s) => s,
        Err(e) => {
            error!("❌ Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };
    let channels = settings.channel_directory();

    // Shared between the relay (writer) and the poll handlers (reader)
    let inbox = Arc::new(SignalInbox::new());
    let normalizer = Arc::new(SignalNormalizer::new(
        RelayContext::new_system(),
        inbox.clone(),
    ));

    let transport = match TelegramBotClient::new(&settings.telegram) {
        Ok(t) => Arc::new(t),
        Err(e) => {
            error!("❌ Failed to initialize Telegram client: {}", e);
            std::process::exit(1);
        }
    };
    info!(
        target_channel = channels.target(),
        "✅ Core components initialized"
    );

    let relay = Arc::new(Relay::new(
        transport,
        normalizer,
        channels,
        settings.relay.notify_ignored,
    ));
    let relay_handle = start_relay(relay);

    // --- API Server Task ---
    let bind_address = format!("0.0.0.0:{}", settings.api.port);
    info!("🚀 Starting API Server on {}", bind_address);

    let auth_token = settings.api.auth_token.clone();
    if auth_token.is_none() {
        info!("Poll endpoints are open (no api.auth_token configured)");
    }

    HttpServer::new(move || {
        let cors = actix_cors::Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header();

        App::new()
            .wrap(AuthMiddleware::new(auth_token.clone()))
            .wrap(cors)
            .app_data(web::Data::from(inbox.clone()))
            .configure(api::config)
    })
    .bind(&bind_address)?
    .run()
    .await?;

    relay_handle.abort();
    Ok(())
}
