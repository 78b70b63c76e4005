use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entity::{product, variant};
use crate::error::AppError;
use crate::models::brand::BrandResponse;

/// Fields that must be present use `Option` or default so that a missing
/// field becomes a field validation error rather than a parse failure.
#[derive(Debug, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateShoesRequest {
    #[serde(default)]
    pub name: String,
    pub brand_id: Option<i32>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub material: Option<String>,
    #[serde(default)]
    pub variants: Vec<CreateVariantRequest>,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateVariantRequest {
    #[serde(default)]
    pub variant_name: String,
    #[serde(default)]
    pub images: Vec<CreateImageRefRequest>,
}

/// Reference to an already uploaded product image.
#[derive(Debug, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateImageRefRequest {
    #[serde(default)]
    pub file_name: String,
    pub order: Option<i32>,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductImageResponse {
    pub file_name: String,
    #[serde(rename = "type")]
    pub category: String,
    pub bucket_name: String,
    pub order: i32,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VariantResponse {
    pub id: Uuid,
    pub variant_name: String,
    pub images: Vec<ProductImageResponse>,
}

impl VariantResponse {
    /// Builds the response for one variant. `images` must already be in
    /// display order.
    pub fn from_models(
        variant: variant::Model,
        images: Vec<crate::entity::image::Model>,
    ) -> Self {
        Self {
            id: variant.id,
            variant_name: variant.variant_name,
            images: images
                .into_iter()
                .map(|img| ProductImageResponse {
                    file_name: img.file_name,
                    category: img.category,
                    bucket_name: img.bucket_name,
                    order: img.image_order.unwrap_or(0),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ShoesResponse {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub product_type: String,
    pub name: String,
    pub description: Option<String>,
    /// Serialized as a JSON number, not a decimal string.
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub brand: BrandResponse,
    pub material: Option<String>,
    pub variants: Vec<VariantResponse>,
}

impl ShoesResponse {
    pub fn from_models(
        product: product::Model,
        brand: BrandResponse,
        variants: Vec<VariantResponse>,
    ) -> Self {
        Self {
            id: product.id,
            product_type: product.product_type,
            name: product.name,
            description: product.description,
            price: product.price,
            brand,
            material: product.material,
            variants,
        }
    }
}

/// Validates a shoes creation request, collecting every field failure.
pub fn validate_create_shoes(req: &CreateShoesRequest) -> Result<(), AppError> {
    let mut errors = BTreeMap::new();

    if req.name.is_empty() {
        errors.insert("name".to_string(), "Name is required".to_string());
    } else if req.name.chars().count() > 100 {
        errors.insert(
            "name".to_string(),
            "Name must have up to 100 characters".to_string(),
        );
    }

    match req.brand_id {
        None => {
            errors.insert("brandId".to_string(), "Brand ID is required".to_string());
        }
        Some(id) if id <= 0 => {
            errors.insert(
                "brandId".to_string(),
                "Brand ID must be a positive number".to_string(),
            );
        }
        Some(_) => {}
    }

    if let Some(description) = &req.description
        && description.chars().count() > 1000
    {
        errors.insert(
            "description".to_string(),
            "Description must have up to 1000 characters".to_string(),
        );
    }

    match &req.price {
        None => {
            errors.insert("price".to_string(), "Price is required".to_string());
        }
        Some(price) => {
            if price.is_sign_negative() || price.is_zero() {
                errors.insert(
                    "price".to_string(),
                    "Price must be a positive number".to_string(),
                );
            } else if !price_digits_ok(price) {
                errors.insert(
                    "price".to_string(),
                    "Price must have up to 10 digits and 2 decimals".to_string(),
                );
            }
        }
    }

    match &req.material {
        None => {
            errors.insert("material".to_string(), "Material is required".to_string());
        }
        Some(material) if material.chars().count() > 100 => {
            errors.insert(
                "material".to_string(),
                "Material must have up to 100 characters".to_string(),
            );
        }
        Some(_) => {}
    }

    if req.variants.is_empty() {
        errors.insert(
            "variants".to_string(),
            "At least one variant is required.".to_string(),
        );
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(AppError::Validation(errors))
    }
}

/// Up to 10 integer digits and up to 2 fractional digits.
fn price_digits_ok(price: &Decimal) -> bool {
    if price.normalize().scale() > 2 {
        return false;
    }
    let integer_part = price.trunc().abs();
    integer_part.to_string().len() <= 10
}
