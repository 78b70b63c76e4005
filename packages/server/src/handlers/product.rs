use std::collections::HashMap;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use common::storage::ImageCategory;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use tracing::instrument;
use uuid::Uuid;

use crate::entity::product::PRODUCT_TYPE_SHOES;
use crate::entity::{brand, image, product, variant};
use crate::error::{AppError, ErrorBody};
use crate::extractors::AppJson;
use crate::models::brand::BrandResponse;
use crate::models::product::{
    CreateShoesRequest, ShoesResponse, VariantResponse, validate_create_shoes,
};
use crate::state::AppState;

/// Loads the brand response (brand row plus logo row) for a product.
async fn load_brand_response(
    db: &sea_orm::DatabaseConnection,
    brand: brand::Model,
) -> Result<BrandResponse, AppError> {
    let logo = image::Entity::find_by_id(brand.logo_file_name.clone())
        .one(db)
        .await?
        .ok_or_else(|| AppError::Internal(format!("logo row missing for brand {}", brand.id)))?;
    Ok(BrandResponse::from_models(brand, logo))
}

/// Loads variants and their images for a set of products, in display order.
async fn load_variants(
    db: &sea_orm::DatabaseConnection,
    product_ids: Vec<Uuid>,
) -> Result<HashMap<Uuid, Vec<VariantResponse>>, AppError> {
    let variants = variant::Entity::find()
        .filter(variant::Column::ProductId.is_in(product_ids))
        .order_by_asc(variant::Column::Position)
        .all(db)
        .await?;

    let variant_ids: Vec<Uuid> = variants.iter().map(|v| v.id).collect();
    let mut images_by_variant: HashMap<Uuid, Vec<image::Model>> = HashMap::new();
    let images = image::Entity::find()
        .filter(image::Column::VariantId.is_in(variant_ids))
        .order_by_asc(image::Column::ImageOrder)
        .order_by_asc(image::Column::Position)
        .all(db)
        .await?;
    for img in images {
        if let Some(variant_id) = img.variant_id {
            images_by_variant.entry(variant_id).or_default().push(img);
        }
    }

    let mut by_product: HashMap<Uuid, Vec<VariantResponse>> = HashMap::new();
    for v in variants {
        let images = images_by_variant.remove(&v.id).unwrap_or_default();
        let product_id = v.product_id;
        by_product
            .entry(product_id)
            .or_default()
            .push(VariantResponse::from_models(v, images));
    }
    Ok(by_product)
}

#[utoipa::path(
    get,
    path = "/",
    tag = "Products",
    operation_id = "listProducts",
    summary = "List all products",
    responses(
        (status = 200, description = "Product list", body = [ShoesResponse]),
    ),
)]
#[instrument(skip(state))]
pub async fn list_products(
    State(state): State<AppState>,
) -> Result<Json<Vec<ShoesResponse>>, AppError> {
    let products = product::Entity::find().all(&state.db).await?;

    let brand_ids: Vec<i32> = products.iter().map(|p| p.brand_id).collect();
    let brands: HashMap<i32, brand::Model> = brand::Entity::find()
        .filter(brand::Column::Id.is_in(brand_ids))
        .all(&state.db)
        .await?
        .into_iter()
        .map(|b| (b.id, b))
        .collect();

    let mut variants_by_product =
        load_variants(&state.db, products.iter().map(|p| p.id).collect()).await?;

    let mut responses = Vec::with_capacity(products.len());
    for p in products {
        let brand = brands
            .get(&p.brand_id)
            .cloned()
            .ok_or_else(|| AppError::Internal(format!("brand row missing for product {}", p.id)))?;
        let brand = load_brand_response(&state.db, brand).await?;
        let variants = variants_by_product.remove(&p.id).unwrap_or_default();
        responses.push(ShoesResponse::from_models(p, brand, variants));
    }

    Ok(Json(responses))
}

#[utoipa::path(
    get,
    path = "/shoes/{id}",
    tag = "Products",
    operation_id = "getShoes",
    summary = "Get a shoes product by ID",
    params(("id" = Uuid, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Product found", body = ShoesResponse),
        (status = 404, description = "Product not found (NOT_FOUND_RESSOURCE)", body = ErrorBody),
    ),
)]
#[instrument(skip(state), fields(product_id = %id))]
pub async fn get_shoes(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ShoesResponse>, AppError> {
    let product = product::Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or(AppError::NotFound)?;

    let brand = brand::Entity::find_by_id(product.brand_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| {
            AppError::Internal(format!("brand row missing for product {}", product.id))
        })?;
    let brand = load_brand_response(&state.db, brand).await?;

    let variants = load_variants(&state.db, vec![product.id])
        .await?
        .remove(&product.id)
        .unwrap_or_default();

    Ok(Json(ShoesResponse::from_models(product, brand, variants)))
}

#[utoipa::path(
    post,
    path = "/shoes",
    tag = "Products",
    operation_id = "createShoes",
    summary = "Create a shoes product",
    description = "Creates a shoes product with its variants and their image references. \
        Every referenced image must already exist in the object store; the whole request \
        is rejected before any database write otherwise.",
    request_body = CreateShoesRequest,
    responses(
        (status = 201, description = "Product created", body = ShoesResponse),
        (status = 400, description = "Field validation failure, unknown brand, or \
            referenced image not uploaded (INVALID_ARGUMENT)"),
        (status = 500, description = "Storage access failure (STORAGE_ACCESS_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, req))]
pub async fn create_shoes(
    State(state): State<AppState>,
    AppJson(req): AppJson<CreateShoesRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_create_shoes(&req)?;

    let brand_id = req.brand_id.unwrap_or_default();
    let brand = brand::Entity::find_by_id(brand_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::InvalidArgument("Brand not found".to_string()))?;

    // Every referenced image must exist before any row is written.
    for variant_req in &req.variants {
        for image_req in &variant_req.images {
            let uploaded = state
                .object_store
                .exists(ImageCategory::Product, &image_req.file_name)
                .await?;
            if !uploaded {
                return Err(AppError::InvalidArgument("Image not found".to_string()));
            }
        }
    }

    let price = req
        .price
        .ok_or_else(|| AppError::Internal("price missing after validation".to_string()))?;

    let txn = state.db.begin().await?;

    let product = product::ActiveModel {
        id: Set(Uuid::new_v4()),
        product_type: Set(PRODUCT_TYPE_SHOES.to_string()),
        name: Set(req.name),
        description: Set(req.description),
        price: Set(price),
        brand_id: Set(brand.id),
        material: Set(req.material),
    }
    .insert(&txn)
    .await?;

    let mut variants = Vec::with_capacity(req.variants.len());
    for (variant_pos, variant_req) in req.variants.into_iter().enumerate() {
        let saved_variant = variant::ActiveModel {
            id: Set(Uuid::new_v4()),
            variant_name: Set(variant_req.variant_name),
            position: Set(variant_pos as i32),
            product_id: Set(product.id),
        }
        .insert(&txn)
        .await?;

        let mut images = Vec::with_capacity(variant_req.images.len());
        for (image_pos, image_req) in variant_req.images.into_iter().enumerate() {
            let saved_image = image::ActiveModel {
                file_name: Set(image_req.file_name),
                category: Set(ImageCategory::Product.as_str().to_string()),
                bucket_name: Set(ImageCategory::Product.bucket_name().to_string()),
                variant_id: Set(Some(saved_variant.id)),
                image_order: Set(Some(image_req.order.unwrap_or(0))),
                position: Set(Some(image_pos as i32)),
            }
            .insert(&txn)
            .await?;
            images.push(saved_image);
        }

        variants.push(VariantResponse::from_models(saved_variant, images));
    }

    txn.commit().await?;

    let brand = load_brand_response(&state.db, brand).await?;
    let response = ShoesResponse::from_models(product, brand, variants);

    Ok((StatusCode::CREATED, Json(response)))
}
