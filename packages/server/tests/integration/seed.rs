use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use sea_orm::{EntityTrait, PaginatorTrait};
use serde_json::json;
use server::entity::{brand, product};
use server::seed::populate_dev_data;

use crate::common::{TestApp, routes};

/// Creates a unique empty data directory under the system temp dir.
fn dev_data_dir() -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let dir = std::env::temp_dir().join(format!("dev-data-{}-{nanos}", std::process::id()));
    fs::create_dir_all(&dir).unwrap();
    dir
}

fn write_json(path: &Path, value: &serde_json::Value) {
    fs::write(path, serde_json::to_vec_pretty(value).unwrap()).unwrap();
}

/// One brand with a logo and one shoes product with a two-image variant.
fn write_sample_data(root: &Path) {
    let brand_dir = root.join("brand/salomon");
    fs::create_dir_all(&brand_dir).unwrap();
    write_json(
        &brand_dir.join("salomon.json"),
        &json!({
            "name": "Salomon",
            "description": "Trail running gear",
            "image": "logo.png",
        }),
    );
    fs::write(brand_dir.join("logo.png"), b"PNG_LOGO").unwrap();

    let product_dir = root.join("product/speedcross");
    fs::create_dir_all(product_dir.join("black")).unwrap();
    write_json(
        &product_dir.join("speedcross.json"),
        &json!({
            "name": "Speedcross 6",
            "type": "SHOES",
            "brand": "Salomon",
            "description": "Aggressive grip trail shoe",
            "price": 139.95,
            "material": "Synthetic",
            "variants": [{
                "variantName": "Black",
                "imageDirName": "black",
                "images": [
                    {"fileName": "side.png", "order": 0},
                    {"fileName": "top.png", "order": 1},
                ],
            }],
        }),
    );
    fs::write(product_dir.join("black/side.png"), b"PNG_SIDE").unwrap();
    fs::write(product_dir.join("black/top.png"), b"PNG_TOP").unwrap();
}

mod dev_seeding {
    use super::*;

    #[tokio::test]
    async fn loads_brands_and_products_from_data_directory() {
        let app = TestApp::spawn().await;
        let root = dev_data_dir();
        write_sample_data(&root);

        populate_dev_data(&app.state, &root).await;

        let res = app.get(routes::BRAND).await;
        assert_eq!(res.status, 200);
        let brands = res.body.as_array().unwrap();
        assert_eq!(brands.len(), 1);
        assert_eq!(brands[0]["name"].as_str().unwrap(), "Salomon");
        assert_eq!(
            brands[0]["logo"]["bucketName"].as_str().unwrap(),
            "brand-image"
        );
        let logo_key = brands[0]["logo"]["fileName"].as_str().unwrap();
        assert!(logo_key.ends_with("-logo.png"), "unexpected key {logo_key}");

        // The logo bytes must be retrievable through the image endpoint.
        let (status, _, bytes) = app.get_bytes(&routes::image(logo_key, "BRAND")).await;
        assert_eq!(status, 200);
        assert_eq!(bytes, b"PNG_LOGO");

        let res = app.get(routes::PRODUCT).await;
        assert_eq!(res.status, 200);
        let products = res.body.as_array().unwrap();
        assert_eq!(products.len(), 1);
        let shoes = &products[0];
        assert_eq!(shoes["name"].as_str().unwrap(), "Speedcross 6");
        assert_eq!(shoes["type"].as_str().unwrap(), "SHOES");
        assert_eq!(shoes["price"].as_f64().unwrap(), 139.95);
        assert_eq!(shoes["brand"]["name"].as_str().unwrap(), "Salomon");

        let variants = shoes["variants"].as_array().unwrap();
        assert_eq!(variants.len(), 1);
        assert_eq!(variants[0]["variantName"].as_str().unwrap(), "Black");
        let images = variants[0]["images"].as_array().unwrap();
        assert_eq!(images.len(), 2);
        assert!(images[0]["fileName"].as_str().unwrap().ends_with("-side.png"));
        assert_eq!(images[0]["order"].as_i64().unwrap(), 0);
        assert!(images[1]["fileName"].as_str().unwrap().ends_with("-top.png"));
        assert_eq!(images[1]["order"].as_i64().unwrap(), 1);

        fs::remove_dir_all(&root).unwrap();
    }

    #[tokio::test]
    async fn rerun_skips_entries_that_already_exist() {
        let app = TestApp::spawn().await;
        let root = dev_data_dir();
        write_sample_data(&root);

        populate_dev_data(&app.state, &root).await;
        populate_dev_data(&app.state, &root).await;

        let brand_count = brand::Entity::find().count(&app.db).await.unwrap();
        let product_count = product::Entity::find().count(&app.db).await.unwrap();
        assert_eq!(brand_count, 1);
        assert_eq!(product_count, 1);

        fs::remove_dir_all(&root).unwrap();
    }

    #[tokio::test]
    async fn tolerates_missing_data_directory() {
        let app = TestApp::spawn().await;

        populate_dev_data(&app.state, Path::new("/nonexistent/dev-data")).await;

        let res = app.get(routes::BRAND).await;
        assert_eq!(res.status, 200);
        assert!(res.body.as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn skips_product_whose_brand_is_unknown() {
        let app = TestApp::spawn().await;
        let root = dev_data_dir();
        write_sample_data(&root);
        // Point the product at a brand the data set never defines.
        let descriptor = root.join("product/speedcross/speedcross.json");
        let mut value: serde_json::Value =
            serde_json::from_slice(&fs::read(&descriptor).unwrap()).unwrap();
        value["brand"] = json!("Nowhere");
        write_json(&descriptor, &value);

        populate_dev_data(&app.state, &root).await;

        let brand_count = brand::Entity::find().count(&app.db).await.unwrap();
        let product_count = product::Entity::find().count(&app.db).await.unwrap();
        assert_eq!(brand_count, 1);
        assert_eq!(product_count, 0);

        fs::remove_dir_all(&root).unwrap();
    }
}
