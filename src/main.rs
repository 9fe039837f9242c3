// src/main.rs
use actix_web::{App, HttpResponse, HttpServer, middleware, web};
use log::info;
use std::sync::Arc;

mod catalog;
mod config;
mod directives;
mod errors;
mod handlers;
mod models;
mod services;

use crate::config::AppConfig;
use crate::handlers::{
    clear_history, compose, create_session, delete_session, download_image, enhance_prompt,
    generate_image, get_session, list_styles, select_history_item, suggest_prompt, surprise_me,
    upload_reference,
};
use crate::services::{
    GeminiClient, GenerativeBackend, ImageGenerator, ImageProcessor, PromptEnhancer,
    PromptSuggester, SessionService,
};

#[derive(Clone)]
pub struct AppState {
    session_service: Arc<SessionService>,
    image_processor: Arc<ImageProcessor>,
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    info!("Starting Brandshot studio service...");

    directives::validate_tables()?;
    let config = AppConfig::from_env()?;

    // Initialize services
    let backend: Arc<dyn GenerativeBackend> = Arc::new(GeminiClient::new(&config)?);
    let session_service = Arc::new(SessionService::new(
        PromptEnhancer::new(backend.clone(), config.text_model.clone()),
        PromptSuggester::new(backend.clone(), config.text_model.clone()),
        ImageGenerator::new(backend, config.image_model.clone()),
    ));
    let image_processor = Arc::new(
        ImageProcessor::new(config.max_reference_dim)
            .with_max_upload_bytes(config.max_upload_bytes),
    );

    let app_state = AppState {
        session_service,
        image_processor,
    };

    info!(
        "Starting HTTP server on {} (text model {}, image model {})",
        config.bind_addr, config.text_model, config.image_model
    );

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .wrap(middleware::Logger::default())
            .configure(routes)
    })
    .bind(config.bind_addr.as_str())?
    .run()
    .await?;

    Ok(())
}

// Reference images travel inline as base64 in generate requests.
const JSON_BODY_LIMIT: usize = 25 * 1024 * 1024;

pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .app_data(web::JsonConfig::default().limit(JSON_BODY_LIMIT))
            .route("/styles", web::get().to(list_styles))
            .route("/compose", web::post().to(compose))
            .route("/reference", web::post().to(upload_reference))
            .route("/sessions", web::post().to(create_session))
            .route("/sessions/{session_id}", web::get().to(get_session))
            .route("/sessions/{session_id}", web::delete().to(delete_session))
            .route("/sessions/{session_id}/enhance", web::post().to(enhance_prompt))
            .route("/sessions/{session_id}/suggest", web::post().to(suggest_prompt))
            .route("/sessions/{session_id}/generate", web::post().to(generate_image))
            .route("/sessions/{session_id}/surprise", web::post().to(surprise_me))
            .route(
                "/sessions/{session_id}/history",
                web::delete().to(clear_history),
            )
            .route(
                "/sessions/{session_id}/history/{image_id}/select",
                web::post().to(select_history_item),
            )
            .route(
                "/sessions/{session_id}/history/{image_id}/download",
                web::get().to(download_image),
            ),
    )
    .route("/health", web::get().to(health_check));
}

async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": "brandshot",
        "version": env!("CARGO_PKG_VERSION")
    }))
}
