use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::handlers;
use crate::state::AppState;

pub fn routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .nest("/auth", auth_routes())
        .nest("/reviews", review_routes())
        .nest("/images", image_routes())
        .routes(routes!(handlers::review::list_cities))
        .routes(routes!(handlers::review::perceptual_map))
}

fn auth_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::auth::register))
        .routes(routes!(handlers::auth::login))
        .routes(routes!(handlers::auth::me))
}

fn review_routes() -> OpenApiRouter<AppState> {
    let crud = OpenApiRouter::new()
        .routes(routes!(
            handlers::review::list_reviews,
            handlers::review::create_review
        ))
        .routes(routes!(handlers::review::top_reviews))
        .routes(routes!(
            handlers::review::get_review,
            handlers::review::update_review,
            handlers::review::delete_review
        ))
        .routes(routes!(handlers::scorecard::generate_scorecard));

    let upload = OpenApiRouter::new()
        .routes(routes!(handlers::review::upload_photos))
        .layer(handlers::review::photo_upload_body_limit());

    crud.merge(upload)
}

fn image_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().routes(routes!(handlers::image::get_image))
}
