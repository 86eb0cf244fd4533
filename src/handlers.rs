// src/handlers.rs
use crate::{AppState, errors::AdError, models::*};
use actix_multipart::Multipart;
use actix_web::{HttpResponse, http::header, web};
use base64::{Engine as _, engine::general_purpose};
use bytes::BytesMut;
use futures_util::TryStreamExt;
use log::{error, info};
use uuid::Uuid;

const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// Absent means the default provider; an explicit `null` is rejected.
fn parse_provider(value: Option<Option<&str>>) -> Result<Provider, AdError> {
    match value {
        None => Ok(Provider::default()),
        Some(None) => Err(AdError::InvalidProvider("null".to_string())),
        Some(Some(name)) => name.parse(),
    }
}

/// Stateless proxy: an already enhanced prompt in, an image reference out.
pub async fn generate_image(
    body: web::Json<GenerateImageRequest>,
    data: web::Data<AppState>,
) -> Result<HttpResponse, AdError> {
    let prompt = non_blank(body.prompt.as_deref())
        .ok_or_else(|| AdError::Validation("Prompt is required".to_string()))?;
    let provider = parse_provider(body.provider.as_ref().map(Option::as_deref))?;

    let image_url = data
        .generator
        .generate(prompt, provider)
        .await
        .inspect_err(|e| error!("Image generation failed: {}", e))?;

    Ok(HttpResponse::Ok().json(GenerateImageResponse { image_url }))
}

pub async fn upload_product(
    mut payload: Multipart,
    data: web::Data<AppState>,
) -> Result<HttpResponse, AdError> {
    let invalid = |e: actix_multipart::MultipartError| {
        AdError::Validation(format!("Invalid multipart payload: {}", e))
    };

    while let Some(mut field) = payload.try_next().await.map_err(invalid)? {
        let filename = field
            .content_disposition()
            .get_filename()
            .map(|name| name.to_string());

        let Some(filename) = filename else {
            // Plain form fields are ignored.
            while field.try_next().await.map_err(invalid)?.is_some() {}
            continue;
        };

        let content_type = field.content_type().map(|ct| ct.to_string());

        let mut image_data = BytesMut::new();
        while let Some(chunk) = field.try_next().await.map_err(invalid)? {
            if image_data.len() + chunk.len() > MAX_UPLOAD_BYTES {
                return Err(AdError::ImageProcessing(format!(
                    "File exceeds {} bytes",
                    MAX_UPLOAD_BYTES
                )));
            }
            image_data.extend_from_slice(&chunk);
        }

        let product = data
            .image_processor
            .describe_upload(filename, content_type, &image_data)?;

        data.repository.save_product(&product).await?;
        info!("Stored product {} ({} bytes)", product.name, product.size);

        return Ok(HttpResponse::Created().json(&product));
    }

    Err(AdError::Validation("No file provided".to_string()))
}

pub async fn get_product(data: web::Data<AppState>) -> Result<HttpResponse, AdError> {
    let product = data
        .repository
        .product()
        .await?
        .ok_or_else(|| AdError::NotFound("No product uploaded".to_string()))?;

    Ok(HttpResponse::Ok().json(&product))
}

pub async fn create_ad(
    body: web::Json<CreateAdRequest>,
    data: web::Data<AppState>,
) -> Result<HttpResponse, AdError> {
    let product = data.repository.product().await?.ok_or_else(|| {
        AdError::Validation("Please upload a product image first".to_string())
    })?;

    let description = non_blank(body.description.as_deref()).ok_or_else(|| {
        AdError::Validation("Please enter a description for your ad".to_string())
    })?;
    let provider = parse_provider(body.provider.as_ref().map(Option::as_deref))?;
    let style = body.style.as_deref().unwrap_or(DEFAULT_STYLE);
    let mood = body.mood.as_deref().unwrap_or(DEFAULT_MOOD);

    let image_url = data
        .generator
        .generate_ad(description, style, mood, provider)
        .await
        .inspect_err(|e| error!("Ad generation failed: {}", e))?;

    let record = GeneratedAdRecord {
        id: Uuid::now_v7().to_string(),
        image_url,
        prompt: description.to_string(),
        style: style.to_string(),
        mood: mood.to_string(),
        created_at: chrono::Utc::now(),
        originating_product: product,
        provider,
    };

    data.repository.append(&record).await?;
    info!("Stored ad {} ({}, {} style)", record.id, provider, record.style);

    Ok(HttpResponse::Created().json(&record))
}

pub async fn list_ads(data: web::Data<AppState>) -> Result<HttpResponse, AdError> {
    let ads = data.repository.list().await?;
    Ok(HttpResponse::Ok().json(ads))
}

pub async fn delete_ad(
    path: web::Path<String>,
    data: web::Data<AppState>,
) -> Result<HttpResponse, AdError> {
    let id = path.into_inner();

    if data.repository.remove(&id).await? {
        info!("Removed ad {}", id);
        Ok(HttpResponse::NoContent().finish())
    } else {
        Err(AdError::NotFound(format!("Ad {} not found", id)))
    }
}

/// Inline images are decoded and served as an attachment; hosted ones are redirected to.
pub async fn download_ad(
    path: web::Path<String>,
    data: web::Data<AppState>,
) -> Result<HttpResponse, AdError> {
    let id = path.into_inner();

    let record = data
        .repository
        .list()
        .await?
        .into_iter()
        .find(|ad| ad.id == id)
        .ok_or_else(|| AdError::NotFound(format!("Ad {} not found", id)))?;

    let Some((mime, payload)) = record.image_url.data_uri_parts() else {
        let ImageReference::Url(url) = &record.image_url else {
            return Err(AdError::Serialization(format!("Ad {} has a malformed image", id)));
        };
        return Ok(HttpResponse::Found()
            .insert_header((header::LOCATION, url.as_str()))
            .finish());
    };

    let bytes = general_purpose::STANDARD
        .decode(payload)
        .map_err(|e| AdError::Serialization(format!("Failed to decode image: {}", e)))?;

    Ok(HttpResponse::Ok()
        .content_type(mime)
        .insert_header((
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"ai-ad-{}.png\"", id),
        ))
        .body(bytes))
}

pub async fn get_stats(data: web::Data<AppState>) -> Result<HttpResponse, AdError> {
    let records = data.repository.list().await?;
    Ok(HttpResponse::Ok().json(DerivedStats::project(&records, data.credit_ceiling)))
}

pub async fn list_options() -> HttpResponse {
    HttpResponse::Ok().json(GenerationOptions::catalog())
}
