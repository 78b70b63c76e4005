use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::handlers;
use crate::state::AppState;

pub fn api_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .nest("/brand", brand_routes())
        .nest("/product", product_routes())
        .nest("/image", image_routes())
}

fn brand_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::brand::list_brands, handlers::brand::create_brand))
        .routes(routes!(handlers::brand::get_brand))
}

fn product_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::product::list_products))
        .routes(routes!(handlers::product::create_shoes))
        .routes(routes!(handlers::product::get_shoes))
}

fn image_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::image::get_image))
        .routes(routes!(handlers::image::upload_image))
        .layer(handlers::image::upload_body_limit())
}
