//! Development data loader.
//!
//! Fills an empty catalog from a data directory at startup. The directory
//! holds one subdirectory per brand under `brand/` and one per product
//! under `product/`, each with a JSON descriptor named after the
//! subdirectory plus the image files it references:
//!
//! ```text
//! dev-data/
//!   brand/salomon/salomon.json          {"name", "description", "image"}
//!   brand/salomon/logo.png
//!   product/speedcross/speedcross.json  {"name", "type", "brand", ...}
//!   product/speedcross/black/side.png
//! ```
//!
//! Entries whose brand or product name already exists are skipped, so
//! restarting against a populated database is a no-op. Failures are logged
//! per entry and never abort startup.

use std::fs;
use std::path::Path;

use anyhow::{Context, bail};
use common::storage::ImageCategory;
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set, TransactionTrait};
use serde::Deserialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::entity::product::PRODUCT_TYPE_SHOES;
use crate::entity::{brand, image, product, variant};
use crate::handlers::image::dispatch_background_processing;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
struct BrandSeed {
    name: String,
    description: String,
    /// Logo file name, relative to the brand's seed directory.
    image: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProductSeed {
    name: String,
    #[serde(rename = "type")]
    product_type: String,
    /// Brand name, resolved against already seeded brands.
    brand: String,
    description: Option<String>,
    price: Decimal,
    material: Option<String>,
    variants: Vec<VariantSeed>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VariantSeed {
    variant_name: String,
    /// Subdirectory of the product's seed directory holding this variant's
    /// image files.
    image_dir_name: String,
    images: Vec<ImageSeed>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ImageSeed {
    file_name: String,
    #[serde(default)]
    order: i32,
}

/// Loads development data from `dir`. Logs and continues on any failure.
pub async fn populate_dev_data(state: &AppState, dir: &Path) {
    info!(dir = %dir.display(), "loading development data");
    for entry in seed_entries(&dir.join("brand")) {
        if let Err(e) = seed_brand(state, &entry).await {
            warn!(entry = %entry.display(), error = %e, "failed to seed brand");
        }
    }
    for entry in seed_entries(&dir.join("product")) {
        if let Err(e) = seed_product(state, &entry).await {
            warn!(entry = %entry.display(), error = %e, "failed to seed product");
        }
    }
}

/// Subdirectories of `dir`, sorted by name. Brands must be seeded before
/// the products that reference them, so ordering is kept deterministic.
fn seed_entries(dir: &Path) -> Vec<std::path::PathBuf> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            warn!(dir = %dir.display(), error = %e, "seed directory not readable");
            return Vec::new();
        }
    };
    let mut dirs: Vec<_> = entries
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.is_dir())
        .collect();
    dirs.sort();
    dirs
}

/// Reads the JSON descriptor named after the entry directory.
fn read_descriptor<T: serde::de::DeserializeOwned>(entry: &Path) -> anyhow::Result<T> {
    let name = entry
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .context("entry has no directory name")?;
    let path = entry.join(format!("{name}.json"));
    let bytes = fs::read(&path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_slice(&bytes).with_context(|| format!("parsing {}", path.display()))
}

/// Uploads one seed image file and returns its storage key.
async fn upload_seed_image(
    state: &AppState,
    category: ImageCategory,
    path: &Path,
) -> anyhow::Result<String> {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .context("image path has no file name")?;
    let bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let content_type = mime_guess::from_path(path).first_or_octet_stream();
    let key = state
        .object_store
        .put(category, &file_name, content_type.as_ref(), &bytes)
        .await
        .with_context(|| format!("storing {}", path.display()))?;
    dispatch_background_processing(state, &key, category).await;
    Ok(key)
}

async fn seed_brand(state: &AppState, entry: &Path) -> anyhow::Result<()> {
    let seed: BrandSeed = read_descriptor(entry)?;

    let existing = brand::Entity::find()
        .filter(brand::Column::Name.eq(&seed.name))
        .one(&state.db)
        .await?;
    if existing.is_some() {
        info!(brand = %seed.name, "brand already present, skipping");
        return Ok(());
    }

    let key = upload_seed_image(state, ImageCategory::Brand, &entry.join(&seed.image)).await?;

    let txn = state.db.begin().await?;
    let logo = image::ActiveModel {
        file_name: Set(key),
        category: Set(ImageCategory::Brand.as_str().to_string()),
        bucket_name: Set(ImageCategory::Brand.bucket_name().to_string()),
        variant_id: Set(None),
        image_order: Set(None),
        position: Set(None),
    }
    .insert(&txn)
    .await?;
    brand::ActiveModel {
        name: Set(seed.name.clone()),
        description: Set(seed.description),
        logo_file_name: Set(logo.file_name),
        ..Default::default()
    }
    .insert(&txn)
    .await?;
    txn.commit().await?;

    info!(brand = %seed.name, "seeded brand");
    Ok(())
}

async fn seed_product(state: &AppState, entry: &Path) -> anyhow::Result<()> {
    let seed: ProductSeed = read_descriptor(entry)?;

    if seed.product_type != PRODUCT_TYPE_SHOES {
        bail!("unsupported product type {}", seed.product_type);
    }

    let existing = product::Entity::find()
        .filter(product::Column::Name.eq(&seed.name))
        .one(&state.db)
        .await?;
    if existing.is_some() {
        info!(product = %seed.name, "product already present, skipping");
        return Ok(());
    }

    let brand = brand::Entity::find()
        .filter(brand::Column::Name.eq(&seed.brand))
        .one(&state.db)
        .await?;
    let Some(brand) = brand else {
        bail!("brand {} not found", seed.brand);
    };

    // Upload every image before writing any row, mirroring the creation
    // endpoint's images-first ordering.
    let mut uploaded_variants = Vec::with_capacity(seed.variants.len());
    for variant_seed in &seed.variants {
        let image_dir = entry.join(&variant_seed.image_dir_name);
        let mut keys = Vec::with_capacity(variant_seed.images.len());
        for image_seed in &variant_seed.images {
            let key = upload_seed_image(
                state,
                ImageCategory::Product,
                &image_dir.join(&image_seed.file_name),
            )
            .await?;
            keys.push((key, image_seed.order));
        }
        uploaded_variants.push((variant_seed.variant_name.clone(), keys));
    }

    let txn = state.db.begin().await?;
    let product = product::ActiveModel {
        id: Set(Uuid::new_v4()),
        product_type: Set(PRODUCT_TYPE_SHOES.to_string()),
        name: Set(seed.name.clone()),
        description: Set(seed.description),
        price: Set(seed.price),
        brand_id: Set(brand.id),
        material: Set(seed.material),
    }
    .insert(&txn)
    .await?;

    for (variant_pos, (variant_name, keys)) in uploaded_variants.into_iter().enumerate() {
        let saved_variant = variant::ActiveModel {
            id: Set(Uuid::new_v4()),
            variant_name: Set(variant_name),
            position: Set(variant_pos as i32),
            product_id: Set(product.id),
        }
        .insert(&txn)
        .await?;

        for (image_pos, (key, order)) in keys.into_iter().enumerate() {
            image::ActiveModel {
                file_name: Set(key),
                category: Set(ImageCategory::Product.as_str().to_string()),
                bucket_name: Set(ImageCategory::Product.bucket_name().to_string()),
                variant_id: Set(Some(saved_variant.id)),
                image_order: Set(Some(order)),
                position: Set(Some(image_pos as i32)),
            }
            .insert(&txn)
            .await?;
        }
    }
    txn.commit().await?;

    info!(product = %seed.name, "seeded product");
    Ok(())
}
