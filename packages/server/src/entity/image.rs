use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "image")]
pub struct Model {
    /// Storage key of the uploaded object. Doubles as the primary key so a
    /// stored object can be referenced at most once.
    #[sea_orm(primary_key, auto_increment = false)]
    pub file_name: String,

    /// Subtype discriminator. One of: BRAND, PRODUCT.
    pub category: String,

    pub bucket_name: String,

    /// NULL for brand logos.
    pub variant_id: Option<Uuid>,
    #[sea_orm(belongs_to, from = "variant_id", to = "id")]
    pub variant: Option<super::variant::Entity>,

    /// Display position within a variant's gallery, taken verbatim from the
    /// request. NULL for brand logos.
    pub image_order: Option<i32>,

    /// Insertion index within the owning variant, used to break ties between
    /// equal `image_order` values. NULL for brand logos.
    pub position: Option<i32>,

    #[sea_orm(has_one)]
    pub brand: HasOne<super::brand::Entity>,
}

impl ActiveModelBehavior for ActiveModel {}
