// src/main.rs
use actix_web::{App, HttpResponse, HttpServer, middleware, web};
use anyhow::Context;
use log::info;
use std::sync::Arc;

mod config;
mod errors;
mod handlers;
mod models;
mod services;

use crate::config::Config;
use crate::errors::AdError;
use crate::handlers::{
    create_ad, delete_ad, download_ad, generate_image, get_product, get_stats, list_ads, list_options,
    upload_product,
};
use crate::services::{
    AdRepository, GenerationService, ImageProcessor, MemoryRepository, RedisRepository,
};

#[derive(Clone)]
pub struct AppState {
    generator: Arc<GenerationService>,
    repository: Arc<dyn AdRepository>,
    image_processor: Arc<ImageProcessor>,
    credit_ceiling: usize,
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    info!("Starting AdCraft service...");

    let config = Config::from_env()?;

    // Initialize services
    let repository: Arc<dyn AdRepository> = match &config.redis_url {
        Some(url) => {
            info!("Using Redis ad storage");
            Arc::new(
                RedisRepository::new(url)
                    .await
                    .context("Failed to connect to Redis")?,
            )
        }
        None => {
            info!("REDIS_URL not set, using in-memory ad storage");
            Arc::new(MemoryRepository::new())
        }
    };
    let generator = Arc::new(GenerationService::from_config(
        &config,
        reqwest::Client::new(),
    ));
    let image_processor = Arc::new(ImageProcessor::new());

    let app_state = AppState {
        generator,
        repository,
        image_processor,
        credit_ceiling: config.credit_ceiling,
    };

    info!("Starting HTTP server on {}", config.bind_addr);

    HttpServer::new(move || {
        App::new()
            .wrap(middleware::Logger::default())
            .configure(|cfg| configure_app(cfg, app_state.clone()))
    })
    .bind(&config.bind_addr)
    .with_context(|| format!("Failed to bind {}", config.bind_addr))?
    .run()
    .await?;

    Ok(())
}

pub fn configure_app(cfg: &mut web::ServiceConfig, state: AppState) {
    cfg.app_data(web::Data::new(state))
        .app_data(web::JsonConfig::default().error_handler(|err, _req| {
            AdError::Validation(format!("Invalid request body: {}", err)).into()
        }))
        .service(
            web::scope("/api/v1")
                .route("/product", web::post().to(upload_product))
                .route("/product", web::get().to(get_product))
                .route("/ads", web::post().to(create_ad))
                .route("/ads", web::get().to(list_ads))
                .route("/ads/{ad_id}", web::delete().to(delete_ad))
                .route("/ads/{ad_id}/image", web::get().to(download_ad))
                .route("/stats", web::get().to(get_stats))
                .route("/options", web::get().to(list_options)),
        )
        .route("/generate-image", web::post().to(generate_image))
        .route("/health", web::get().to(health_check));
}

async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": "adcraft",
        "version": env!("CARGO_PKG_VERSION")
    }))
}
