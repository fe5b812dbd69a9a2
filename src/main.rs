use anyhow::{Context, Result};
use mealvoice::api::HttpBackend;
use mealvoice::storage::SessionStore;
use mealvoice::ui::MealVoiceApp;
use mealvoice::AppConfig;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mealvoice=debug,info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Mealvoice");

    let config = AppConfig::load().context("Failed to load configuration")?;
    info!("Using API at {}", config.api.base_url);

    let backend = HttpBackend::new(config.api.clone()).context("Failed to create HTTP client")?;
    let store = SessionStore::default_location();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Mealvoice")
            .with_inner_size([480.0, 760.0])
            .with_min_inner_size([360.0, 520.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Mealvoice",
        options,
        Box::new(move |cc| {
            let app = MealVoiceApp::new(cc, config, Arc::new(backend), store)?;
            Ok(Box::new(app))
        }),
    )
    .map_err(|e| anyhow::anyhow!("UI error: {}", e))
}
