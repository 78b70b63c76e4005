use common::storage::ImageCategory;
use serde::Deserialize;

use crate::error::AppError;

#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct ImageQuery {
    /// Image category. One of: BRAND, PRODUCT.
    #[serde(rename = "type")]
    pub r#type: Option<String>,
}

/// Parses the raw `type` value from a query or form field.
pub fn parse_image_category(raw: Option<&str>) -> Result<ImageCategory, AppError> {
    match raw {
        None => Err(AppError::validation("type", "Image type is required")),
        Some("BRAND") => Ok(ImageCategory::Brand),
        Some("PRODUCT") => Ok(ImageCategory::Product),
        Some(_) => Err(AppError::validation(
            "type",
            "Image type must be BRAND or PRODUCT",
        )),
    }
}
