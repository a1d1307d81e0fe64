/// Route table for the public API
use crate::handlers;
use actix_web::web;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(handlers::json_config())
        .route("/", web::get().to(handlers::root))
        .service(
            web::scope("/api/v1")
                .route("/signup", web::post().to(handlers::signup))
                .route("/users", web::get().to(handlers::list_users))
                .service(
                    web::resource("/users/{id}")
                        .route(web::get().to(handlers::get_user))
                        .route(web::put().to(handlers::update_user)),
                )
                .route("/post-content", web::post().to(handlers::create_content))
                .route("/content", web::get().to(handlers::list_content))
                .service(
                    web::resource("/content/{id}")
                        .route(web::get().to(handlers::get_content))
                        .route(web::put().to(handlers::update_content)),
                ),
        );
}
