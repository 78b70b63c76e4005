use serde::{Deserialize, Serialize};

/// Asset category. Determines which object-store bucket holds the file and
/// which registry subtype a reference row represents.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum ImageCategory {
    Brand,
    Product,
}

impl ImageCategory {
    /// Bucket holding objects of this category.
    pub fn bucket_name(&self) -> &'static str {
        match self {
            Self::Brand => "brand-image",
            Self::Product => "product-image",
        }
    }

    /// Discriminator string stored in the registry and sent on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Brand => "BRAND",
            Self::Product => "PRODUCT",
        }
    }
}

impl std::fmt::Display for ImageCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
