use std::collections::HashMap;

use axum::Json;
use axum::extract::{Path, State};
use common::storage::ImageCategory;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set, TransactionTrait};
use tracing::instrument;

use crate::entity::{brand, image};
use crate::error::{AppError, ErrorBody};
use crate::extractors::AppJson;
use crate::models::brand::{BrandResponse, CreateBrandRequest, validate_create_brand};
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/",
    tag = "Brands",
    operation_id = "listBrands",
    summary = "List all brands",
    responses(
        (status = 200, description = "Brand list", body = [BrandResponse]),
    ),
)]
#[instrument(skip(state))]
pub async fn list_brands(
    State(state): State<AppState>,
) -> Result<Json<Vec<BrandResponse>>, AppError> {
    let brands = brand::Entity::find().all(&state.db).await?;

    let logo_keys: Vec<String> = brands.iter().map(|b| b.logo_file_name.clone()).collect();
    let mut logos: HashMap<String, image::Model> = image::Entity::find()
        .filter(image::Column::FileName.is_in(logo_keys))
        .all(&state.db)
        .await?
        .into_iter()
        .map(|img| (img.file_name.clone(), img))
        .collect();

    let mut responses = Vec::with_capacity(brands.len());
    for brand in brands {
        let logo = logos
            .remove(&brand.logo_file_name)
            .ok_or_else(|| AppError::Internal(format!("logo row missing for brand {}", brand.id)))?;
        responses.push(BrandResponse::from_models(brand, logo));
    }

    Ok(Json(responses))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Brands",
    operation_id = "getBrand",
    summary = "Get a brand by ID",
    params(("id" = i32, Path, description = "Brand ID")),
    responses(
        (status = 200, description = "Brand found", body = BrandResponse),
        (status = 404, description = "Brand not found (NOT_FOUND_RESSOURCE)", body = ErrorBody),
    ),
)]
#[instrument(skip(state), fields(brand_id = id))]
pub async fn get_brand(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<BrandResponse>, AppError> {
    let brand = brand::Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or(AppError::NotFound)?;

    let logo = image::Entity::find_by_id(brand.logo_file_name.clone())
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::Internal(format!("logo row missing for brand {}", brand.id)))?;

    Ok(Json(BrandResponse::from_models(brand, logo)))
}

#[utoipa::path(
    post,
    path = "/",
    tag = "Brands",
    operation_id = "createBrand",
    summary = "Create a brand",
    description = "Creates a brand referencing a previously uploaded logo image. \
        The referenced image must already exist in the object store.",
    request_body = CreateBrandRequest,
    responses(
        (status = 200, description = "Brand created", body = BrandResponse),
        (status = 400, description = "Field validation failure, or referenced image \
            not uploaded (INVALID_ARGUMENT)"),
        (status = 500, description = "Storage access failure (STORAGE_ACCESS_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, req))]
pub async fn create_brand(
    State(state): State<AppState>,
    AppJson(req): AppJson<CreateBrandRequest>,
) -> Result<Json<BrandResponse>, AppError> {
    validate_create_brand(&req)?;

    let uploaded = state
        .object_store
        .exists(ImageCategory::Brand, &req.image_file_name)
        .await?;
    if !uploaded {
        return Err(AppError::InvalidArgument(format!(
            "Image file {} is not uploaded",
            req.image_file_name
        )));
    }

    let txn = state.db.begin().await?;

    let logo = image::ActiveModel {
        file_name: Set(req.image_file_name.clone()),
        category: Set(ImageCategory::Brand.as_str().to_string()),
        bucket_name: Set(ImageCategory::Brand.bucket_name().to_string()),
        variant_id: Set(None),
        image_order: Set(None),
        position: Set(None),
    }
    .insert(&txn)
    .await?;

    let brand = brand::ActiveModel {
        name: Set(req.name),
        description: Set(req.description),
        logo_file_name: Set(logo.file_name.clone()),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    txn.commit().await?;

    Ok(Json(BrandResponse::from_models(brand, logo)))
}
