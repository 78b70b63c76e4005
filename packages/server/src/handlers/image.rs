use std::collections::BTreeMap;

use axum::extract::{DefaultBodyLimit, Multipart, Path, Query, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use common::image_job::ImageProcessingJob;
use common::storage::ImageCategory;
use tracing::{info, instrument, warn};

use crate::error::{AppError, ErrorBody};
use crate::models::image::{ImageQuery, parse_image_category};
use crate::state::AppState;

const ALLOWED_CONTENT_TYPES: [&str; 3] = ["image/png", "image/jpeg", "image/jpg"];

/// Slightly above the image size cap so oversized files reach the handler
/// and fail with a field validation error instead of a 413.
pub fn upload_body_limit() -> DefaultBodyLimit {
    DefaultBodyLimit::max(6 * 1024 * 1024)
}

#[utoipa::path(
    get,
    path = "/{filename}",
    tag = "Images",
    operation_id = "getImage",
    summary = "Download an image",
    description = "Fetches an image from the object store. The `type` query parameter \
        selects the bucket.",
    params(
        ("filename" = String, Path, description = "Storage key returned at upload time"),
        ImageQuery,
    ),
    responses(
        (status = 200, description = "Image content"),
        (status = 400, description = "Missing or invalid type parameter"),
        (status = 404, description = "Image not found (NOT_FOUND_RESSOURCE)", body = ErrorBody),
        (status = 500, description = "Storage access failure (STORAGE_ACCESS_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, query), fields(filename = %filename))]
pub async fn get_image(
    State(state): State<AppState>,
    Path(filename): Path<String>,
    Query(query): Query<ImageQuery>,
) -> Result<Response, AppError> {
    let category = parse_image_category(query.r#type.as_deref())?;

    let bytes = state.object_store.get(category, &filename).await?;

    let content_type = mime_guess::from_path(&filename).first_or_octet_stream();
    Ok((
        [(header::CONTENT_TYPE, content_type.to_string())],
        bytes,
    )
        .into_response())
}

#[utoipa::path(
    post,
    path = "/",
    tag = "Images",
    operation_id = "uploadImage",
    summary = "Upload an image",
    description = "Stores an image in the bucket for its category and returns the \
        generated storage key. Accepts PNG and JPEG up to 5 MB. After a successful \
        store, a post-processing job is published on a best-effort basis.",
    request_body(content_type = "multipart/form-data", description = "`image` file field and `type` category field"),
    responses(
        (status = 200, description = "Storage key of the uploaded image", body = String),
        (status = 400, description = "Missing file, missing type, disallowed content type, or oversized file"),
        (status = 500, description = "Storage access failure (STORAGE_ACCESS_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, multipart))]
pub async fn upload_image(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<String, AppError> {
    let max_size = state.config.upload.max_image_size;

    let mut file: Option<(String, String, Vec<u8>)> = None;
    let mut raw_type: Option<String> = None;
    let mut oversized = false;

    while let Some(mut field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::InvalidArgument(format!("Multipart error: {e}")))?
    {
        match field.name() {
            Some("image") => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let content_type = field.content_type().unwrap_or_default().to_string();
                let mut data = Vec::new();
                while let Some(chunk) = field
                    .chunk()
                    .await
                    .map_err(|e| AppError::InvalidArgument(format!("Multipart error: {e}")))?
                {
                    if data.len() + chunk.len() > max_size {
                        oversized = true;
                        data.clear();
                        break;
                    }
                    data.extend_from_slice(&chunk);
                }
                file = Some((file_name, content_type, data));
            }
            Some("type") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::InvalidArgument(format!("Multipart error: {e}")))?;
                raw_type = Some(text);
            }
            _ => {} // Ignore unknown fields.
        }
    }

    let mut errors = BTreeMap::new();

    let category = match parse_image_category(raw_type.as_deref()) {
        Ok(category) => Some(category),
        Err(AppError::Validation(field_errors)) => {
            errors.extend(field_errors);
            None
        }
        Err(other) => return Err(other),
    };

    let upload = match &file {
        None => {
            errors.insert("image".to_string(), "Image file is required".to_string());
            None
        }
        Some((_, _, data)) if data.is_empty() && !oversized => {
            errors.insert("image".to_string(), "Image file is required".to_string());
            None
        }
        Some((name, content_type, data)) => {
            if oversized {
                errors.insert(
                    "image".to_string(),
                    "Image file size must not exceed 5 MB".to_string(),
                );
                None
            } else if !ALLOWED_CONTENT_TYPES.contains(&content_type.as_str()) {
                errors.insert(
                    "image".to_string(),
                    "Image file must be a valid image type (PNG, JPEG, or JPG)".to_string(),
                );
                None
            } else {
                Some((name, content_type, data))
            }
        }
    };

    if !errors.is_empty() {
        return Err(AppError::Validation(errors));
    }

    let (name, content_type, data) = upload
        .ok_or_else(|| AppError::Internal("upload state lost after validation".to_string()))?;
    let category =
        category.ok_or_else(|| AppError::Internal("category lost after validation".to_string()))?;

    let key = state
        .object_store
        .put(category, name, content_type, data)
        .await?;

    dispatch_background_processing(&state, &key, category).await;

    Ok(key)
}

/// Publishes a post-processing job for a stored image. Fire-and-forget: a
/// publish failure is logged and never fails the upload.
pub(crate) async fn dispatch_background_processing(
    state: &AppState,
    key: &str,
    category: ImageCategory,
) {
    let Some(mq) = &state.mq else {
        return;
    };

    let job = ImageProcessingJob::new(key, category);
    match mq
        .publish(&state.config.mq.image_queue_name, None, &job, None)
        .await
    {
        Ok(_) => info!(key, "queued image for background processing"),
        Err(e) => warn!(key, error = %e, "failed to queue image for background processing"),
    }
}
