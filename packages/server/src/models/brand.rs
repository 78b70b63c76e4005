use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::entity::{brand, image};
use crate::error::AppError;

/// All fields default to empty so that missing fields surface as field
/// validation errors rather than deserialization failures.
#[derive(Debug, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateBrandRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Storage key returned by the image upload endpoint.
    #[serde(default)]
    pub image_file_name: String,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BrandLogoResponse {
    pub file_name: String,
    #[serde(rename = "type")]
    pub category: String,
    pub bucket_name: String,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BrandResponse {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub logo: BrandLogoResponse,
}

impl BrandResponse {
    pub fn from_models(brand: brand::Model, logo: image::Model) -> Self {
        Self {
            id: brand.id,
            name: brand.name,
            description: brand.description,
            logo: BrandLogoResponse {
                file_name: logo.file_name,
                category: logo.category,
                bucket_name: logo.bucket_name,
            },
        }
    }
}

/// Validates a brand creation request, collecting every field failure.
pub fn validate_create_brand(req: &CreateBrandRequest) -> Result<(), AppError> {
    let mut errors = BTreeMap::new();

    if req.name.is_empty() {
        errors.insert("name".to_string(), "Name is required".to_string());
    } else if req.name.chars().count() > 100 {
        errors.insert(
            "name".to_string(),
            "Name cannot be longer than 100 characters".to_string(),
        );
    }

    if req.description.is_empty() {
        errors.insert(
            "description".to_string(),
            "Description is required".to_string(),
        );
    } else if req.description.chars().count() > 1000 {
        errors.insert(
            "description".to_string(),
            "Description cannot be longer than 1000 characters".to_string(),
        );
    }

    if req.image_file_name.is_empty() {
        errors.insert(
            "imageFileName".to_string(),
            "Image file name is required".to_string(),
        );
    } else if req.image_file_name.chars().count() > 100 {
        errors.insert(
            "imageFileName".to_string(),
            "Image file name cannot be longer than 100 characters".to_string(),
        );
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(AppError::Validation(errors))
    }
}
