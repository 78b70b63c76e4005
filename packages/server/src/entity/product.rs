use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Subtype discriminator for shoes products.
pub const PRODUCT_TYPE_SHOES: &str = "SHOES";

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "product")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Subtype discriminator. Currently only SHOES.
    pub product_type: String,

    #[sea_orm(unique)]
    pub name: String,
    pub description: Option<String>,

    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub price: Decimal,

    pub brand_id: i32,
    #[sea_orm(belongs_to, from = "brand_id", to = "id")]
    pub brand: HasOne<super::brand::Entity>,

    /// NULL for product types without a material attribute.
    pub material: Option<String>,

    #[sea_orm(has_many)]
    pub variants: HasMany<super::variant::Entity>,
}

impl ActiveModelBehavior for ActiveModel {}
