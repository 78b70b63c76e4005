use sea_orm::{EntityTrait, PaginatorTrait};
use serde_json::json;
use server::entity::{product, variant};

use crate::common::{TestApp, routes};

/// Uploads `count` product images and returns their storage keys.
async fn upload_product_images(app: &TestApp, count: usize) -> Vec<String> {
    let mut keys = Vec::with_capacity(count);
    for i in 0..count {
        let key = app
            .upload_png(
                &format!("shoe_{i}.png"),
                format!("PNG_{i}").into_bytes(),
                "PRODUCT",
            )
            .await;
        keys.push(key);
    }
    keys
}

fn variant_body(name: &str, keys: &[String]) -> serde_json::Value {
    let images: Vec<serde_json::Value> = keys
        .iter()
        .enumerate()
        .map(|(i, key)| json!({"fileName": key, "order": i}))
        .collect();
    json!({"variantName": name, "images": images})
}

mod shoes_creation {
    use super::*;

    #[tokio::test]
    async fn create_preserves_variant_and_image_order() {
        let app = TestApp::spawn().await;
        let brand_id = app.create_brand("Salomon").await;
        let black_keys = upload_product_images(&app, 4).await;
        let white_keys = upload_product_images(&app, 4).await;

        let res = app
            .post(
                routes::SHOES,
                &json!({
                    "name": "Speedcross 6",
                    "brandId": brand_id,
                    "description": "Aggressive grip trail shoe",
                    "price": "139.95",
                    "material": "Synthetic",
                    "variants": [
                        variant_body("Black", &black_keys),
                        variant_body("White", &white_keys),
                    ],
                }),
            )
            .await;

        assert_eq!(res.status, 201, "create failed: {}", res.text);
        assert_eq!(res.body["type"].as_str().unwrap(), "SHOES");
        assert_eq!(res.body["name"].as_str().unwrap(), "Speedcross 6");
        assert_eq!(res.body["brand"]["id"].as_i64().unwrap() as i32, brand_id);
        assert!(res.body["price"].is_number(), "price must be a JSON number");
        assert_eq!(res.body["price"].as_f64().unwrap(), 139.95);
        assert_eq!(res.body["material"].as_str().unwrap(), "Synthetic");

        let variants = res.body["variants"].as_array().unwrap();
        assert_eq!(variants.len(), 2);
        assert_eq!(variants[0]["variantName"].as_str().unwrap(), "Black");
        assert_eq!(variants[1]["variantName"].as_str().unwrap(), "White");

        let black_images = variants[0]["images"].as_array().unwrap();
        assert_eq!(black_images.len(), 4);
        for (i, img) in black_images.iter().enumerate() {
            assert_eq!(img["fileName"].as_str().unwrap(), black_keys[i]);
            assert_eq!(img["order"].as_i64().unwrap() as usize, i);
            assert_eq!(img["type"].as_str().unwrap(), "PRODUCT");
            assert_eq!(img["bucketName"].as_str().unwrap(), "product-image");
        }
    }

    #[tokio::test]
    async fn created_shoes_round_trips_through_get() {
        let app = TestApp::spawn().await;
        let brand_id = app.create_brand("Hoka").await;
        let keys = upload_product_images(&app, 2).await;

        let created = app
            .post(
                routes::SHOES,
                &json!({
                    "name": "Mafate Speed",
                    "brandId": brand_id,
                    "price": "189.00",
                    "material": "Mesh",
                    "variants": [variant_body("Blue", &keys)],
                }),
            )
            .await;
        assert_eq!(created.status, 201, "create failed: {}", created.text);

        let id = created.body["id"].as_str().unwrap();
        let fetched = app.get(&routes::shoes(id)).await;

        assert_eq!(fetched.status, 200);
        assert_eq!(fetched.body, created.body);
    }

    #[tokio::test]
    async fn duplicate_and_gapped_orders_are_stored_verbatim() {
        let app = TestApp::spawn().await;
        let brand_id = app.create_brand("Altra").await;
        let keys = upload_product_images(&app, 3).await;

        let res = app
            .post(
                routes::SHOES,
                &json!({
                    "name": "Lone Peak 8",
                    "brandId": brand_id,
                    "price": "150.00",
                    "material": "Knit",
                    "variants": [{
                        "variantName": "Tan",
                        "images": [
                            {"fileName": keys[0], "order": 7},
                            {"fileName": keys[1], "order": 7},
                            {"fileName": keys[2], "order": 2},
                        ],
                    }],
                }),
            )
            .await;

        assert_eq!(res.status, 201, "create failed: {}", res.text);
        let images = res.body["variants"][0]["images"].as_array().unwrap();
        let orders: Vec<i64> = images.iter().map(|i| i["order"].as_i64().unwrap()).collect();
        assert_eq!(orders, vec![7, 7, 2]);

        // A subsequent read sorts by order, breaking the tie by insertion order.
        let id = res.body["id"].as_str().unwrap();
        let fetched = app.get(&routes::shoes(id)).await;
        let images = fetched.body["variants"][0]["images"].as_array().unwrap();
        let files: Vec<&str> = images
            .iter()
            .map(|i| i["fileName"].as_str().unwrap())
            .collect();
        assert_eq!(files, vec![&keys[2], &keys[0], &keys[1]]);
    }

    #[tokio::test]
    async fn rejects_unknown_brand_without_persisting() {
        let app = TestApp::spawn().await;
        let keys = upload_product_images(&app, 1).await;

        let res = app
            .post(
                routes::SHOES,
                &json!({
                    "name": "Orphan Shoe",
                    "brandId": 4242,
                    "price": "99.99",
                    "material": "Leather",
                    "variants": [variant_body("Red", &keys)],
                }),
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["errorCode"].as_str().unwrap(), "INVALID_ARGUMENT");
        assert_eq!(res.body["message"].as_str().unwrap(), "Brand not found");

        let product_count = product::Entity::find().count(&app.db).await.unwrap();
        assert_eq!(product_count, 0);
    }

    #[tokio::test]
    async fn rejects_reference_to_image_never_uploaded() {
        let app = TestApp::spawn().await;
        let brand_id = app.create_brand("Salomon").await;

        let res = app
            .post(
                routes::SHOES,
                &json!({
                    "name": "Phantom Shoe",
                    "brandId": brand_id,
                    "price": "120.00",
                    "material": "Gore-Tex",
                    "variants": [{
                        "variantName": "Grey",
                        "images": [{"fileName": "never-uploaded.png", "order": 0}],
                    }],
                }),
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["errorCode"].as_str().unwrap(), "INVALID_ARGUMENT");
        assert_eq!(res.body["message"].as_str().unwrap(), "Image not found");

        let product_count = product::Entity::find().count(&app.db).await.unwrap();
        let variant_count = variant::Entity::find().count(&app.db).await.unwrap();
        assert_eq!(product_count, 0);
        assert_eq!(variant_count, 0);
    }

    #[tokio::test]
    async fn aggregates_all_field_errors_in_one_response() {
        let app = TestApp::spawn().await;

        let res = app.post(routes::SHOES, &json!({})).await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["name"].as_str().unwrap(), "Name is required");
        assert_eq!(res.body["brandId"].as_str().unwrap(), "Brand ID is required");
        assert_eq!(res.body["price"].as_str().unwrap(), "Price is required");
        assert_eq!(
            res.body["material"].as_str().unwrap(),
            "Material is required"
        );
        assert_eq!(
            res.body["variants"].as_str().unwrap(),
            "At least one variant is required."
        );
    }

    #[tokio::test]
    async fn rejects_invalid_price_values() {
        let app = TestApp::spawn().await;
        let brand_id = app.create_brand("Brooks").await;
        let keys = upload_product_images(&app, 1).await;

        let base = json!({
            "name": "Cascadia 17",
            "brandId": brand_id,
            "material": "Mesh",
            "variants": [variant_body("Green", &keys)],
        });

        let mut negative = base.clone();
        negative["price"] = json!("-5.00");
        let res = app.post(routes::SHOES, &negative).await;
        assert_eq!(res.status, 400);
        assert_eq!(
            res.body["price"].as_str().unwrap(),
            "Price must be a positive number"
        );

        let mut too_precise = base.clone();
        too_precise["price"] = json!("10.999");
        let res = app.post(routes::SHOES, &too_precise).await;
        assert_eq!(res.status, 400);
        assert_eq!(
            res.body["price"].as_str().unwrap(),
            "Price must have up to 10 digits and 2 decimals"
        );
    }
}

mod product_lookup {
    use super::*;

    #[tokio::test]
    async fn get_unknown_shoes_returns_404() {
        let app = TestApp::spawn().await;

        let res = app
            .get(&routes::shoes("00000000-0000-0000-0000-000000000000"))
            .await;

        assert_eq!(res.status, 404);
        assert_eq!(
            res.body["errorCode"].as_str().unwrap(),
            "NOT_FOUND_RESSOURCE"
        );
    }

    #[tokio::test]
    async fn list_returns_all_created_products() {
        let app = TestApp::spawn().await;
        let brand_id = app.create_brand("Salomon").await;

        for name in ["Shoe One", "Shoe Two"] {
            let keys = upload_product_images(&app, 1).await;
            let res = app
                .post(
                    routes::SHOES,
                    &json!({
                        "name": name,
                        "brandId": brand_id,
                        "price": "100.00",
                        "material": "Mesh",
                        "variants": [variant_body("Default", &keys)],
                    }),
                )
                .await;
            assert_eq!(res.status, 201, "create failed: {}", res.text);
        }

        let res = app.get(routes::PRODUCT).await;

        assert_eq!(res.status, 200);
        let products = res.body.as_array().unwrap();
        assert_eq!(products.len(), 2);
        for p in products {
            assert_eq!(p["type"].as_str().unwrap(), "SHOES");
            assert_eq!(p["brand"]["id"].as_i64().unwrap() as i32, brand_id);
        }
    }
}
