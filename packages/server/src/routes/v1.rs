use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::config::AppConfig;
use crate::handlers;
use crate::state::AppState;

pub fn routes(config: &AppConfig) -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .nest("/auth", auth_routes())
        .nest("/events", event_routes())
        .nest("/counties", county_routes())
        .nest("/users", user_routes())
        .nest("/uploads", upload_routes(config.storage.max_upload_size))
        .nest("/text", text_routes())
}

fn auth_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::auth::register))
        .routes(routes!(handlers::auth::login))
        .routes(routes!(handlers::auth::me))
}

fn event_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::event::create_event))
        .routes(routes!(
            handlers::event::get_event,
            handlers::event::update_event,
            handlers::event::delete_event
        ))
        .routes(routes!(handlers::event::toggle_like))
        .routes(routes!(handlers::event::can_modify))
}

fn county_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::county::list_counties))
        .routes(routes!(handlers::county::get_county))
        .routes(routes!(handlers::event::list_county_events))
}

fn user_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::user::update_me, handlers::user::delete_me))
        .routes(routes!(handlers::user::change_password))
        .routes(routes!(handlers::event::list_my_events))
        .routes(routes!(handlers::user::get_user))
        .routes(routes!(handlers::event::list_user_events))
}

fn upload_routes(max_upload_size: u64) -> OpenApiRouter<AppState> {
    let uploads = OpenApiRouter::new()
        .routes(routes!(handlers::upload::upload_image))
        .routes(routes!(handlers::upload::upload_video))
        .layer(handlers::upload::upload_body_limit(max_upload_size));

    let files = OpenApiRouter::new().routes(routes!(
        handlers::upload::download,
        handlers::upload::delete_upload
    ));

    uploads.merge(files)
}

fn text_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().routes(routes!(handlers::text::recommend))
}
