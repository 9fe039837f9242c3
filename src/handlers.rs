// src/handlers.rs
use crate::catalog::STYLE_PRESETS;
use crate::{AppState, errors::StudioError, models::*, services::prompt_composer::compose_prompt};
use actix_multipart::Multipart;
use actix_web::{Error, HttpResponse, web};
use bytes::Bytes;
use futures_util::TryStreamExt;
use serde::de::DeserializeOwned;
use uuid::Uuid;

// Bodies that may be left out entirely. An empty body means all defaults,
// anything else has to parse.
fn optional_json<T: DeserializeOwned + Default>(body: &[u8]) -> Result<T, StudioError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    serde_json::from_slice(body)
        .map_err(|e| StudioError::Validation(format!("Invalid JSON body: {}", e)))
}

pub async fn list_styles() -> HttpResponse {
    HttpResponse::Ok().json(STYLE_PRESETS)
}

pub async fn compose(body: web::Json<ComposeRequest>) -> HttpResponse {
    HttpResponse::Ok().json(PromptResponse {
        prompt: compose_prompt(&body.prompt, &body.style_id, body.tone),
    })
}

pub async fn upload_reference(
    mut payload: Multipart,
    data: web::Data<AppState>,
) -> Result<HttpResponse, Error> {
    while let Some(mut field) = payload.try_next().await? {
        let filename = match field.content_disposition().get_filename() {
            Some(name) => name.to_string(),
            None => continue,
        };

        let mut image_data = Vec::new();
        while let Some(chunk) = field.try_next().await? {
            data.image_processor.check_upload_size(image_data.len() + chunk.len())?;
            image_data.extend_from_slice(&chunk);
        }

        let (reference_image, width, height) =
            data.image_processor.prepare_reference(&image_data)?;

        return Ok(HttpResponse::Ok().json(ReferenceUpload {
            filename,
            width,
            height,
            reference_image,
        }));
    }

    Err(StudioError::Validation("No image file provided".to_string()).into())
}

pub async fn create_session(data: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Created().json(data.session_service.create())
}

pub async fn get_session(
    path: web::Path<Uuid>,
    data: web::Data<AppState>,
) -> Result<HttpResponse, Error> {
    let snapshot = data.session_service.snapshot(path.into_inner())?;
    Ok(HttpResponse::Ok().json(snapshot))
}

pub async fn delete_session(
    path: web::Path<Uuid>,
    data: web::Data<AppState>,
) -> Result<HttpResponse, Error> {
    data.session_service.remove(path.into_inner())?;
    Ok(HttpResponse::NoContent().finish())
}

pub async fn enhance_prompt(
    path: web::Path<Uuid>,
    data: web::Data<AppState>,
    body: web::Json<EnhanceRequest>,
) -> Result<HttpResponse, Error> {
    let prompt = data
        .session_service
        .enhance(path.into_inner(), &body)
        .await?;
    Ok(HttpResponse::Ok().json(PromptResponse { prompt }))
}

pub async fn suggest_prompt(
    path: web::Path<Uuid>,
    data: web::Data<AppState>,
    body: Bytes,
) -> Result<HttpResponse, Error> {
    let request: SuggestRequest = optional_json(&body)?;
    let prompt = data
        .session_service
        .suggest(path.into_inner(), &request)
        .await?;
    Ok(HttpResponse::Ok().json(PromptResponse { prompt }))
}

pub async fn generate_image(
    path: web::Path<Uuid>,
    data: web::Data<AppState>,
    body: web::Json<GenerateRequest>,
) -> Result<HttpResponse, Error> {
    let snapshot = data
        .session_service
        .generate(path.into_inner(), &body)
        .await?;
    Ok(HttpResponse::Ok().json(snapshot))
}

pub async fn surprise_me(
    path: web::Path<Uuid>,
    data: web::Data<AppState>,
    body: Bytes,
) -> Result<HttpResponse, Error> {
    let request: SurpriseRequest = optional_json(&body)?;
    let (prompt, session) = data
        .session_service
        .surprise(path.into_inner(), &request)
        .await?;
    Ok(HttpResponse::Ok().json(SurpriseResponse { prompt, session }))
}

pub async fn select_history_item(
    path: web::Path<(Uuid, Uuid)>,
    data: web::Data<AppState>,
) -> Result<HttpResponse, Error> {
    let (session_id, image_id) = path.into_inner();
    let snapshot = data
        .session_service
        .select_history_item(session_id, image_id)?;
    Ok(HttpResponse::Ok().json(snapshot))
}

pub async fn clear_history(
    path: web::Path<Uuid>,
    data: web::Data<AppState>,
) -> Result<HttpResponse, Error> {
    let snapshot = data.session_service.clear_history(path.into_inner())?;
    Ok(HttpResponse::Ok().json(snapshot))
}

pub async fn download_image(
    path: web::Path<(Uuid, Uuid)>,
    data: web::Data<AppState>,
) -> Result<HttpResponse, Error> {
    let (session_id, image_id) = path.into_inner();
    let image = data.session_service.image(session_id, image_id)?;
    let bytes = data.image_processor.decode_data_url(&image.data)?;

    Ok(HttpResponse::Ok()
        .content_type("image/png")
        .insert_header((
            "Content-Disposition",
            format!("attachment; filename=\"{}\"", image.download_filename()),
        ))
        .body(Bytes::from(bytes)))
}
