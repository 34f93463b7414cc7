//! HTTP handlers and route configuration.

mod auth;
mod health;
mod posts;
mod users;

use actix_web::web;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            // Public routes
            .route("/health", web::get().to(health::health_check))
            // Auth routes
            .service(
                web::scope("/auth")
                    .route("/register", web::post().to(auth::register))
                    .route("/login", web::post().to(auth::login))
                    .route("/me", web::get().to(auth::me)),
            )
            // User routes (read-only)
            .service(
                web::scope("/users")
                    .route("", web::get().to(users::list))
                    .route("/{id}", web::get().to(users::get)),
            )
            // Post routes
            .service(
                web::scope("/posts")
                    .service(
                        web::resource("")
                            .route(web::post().to(posts::create))
                            .route(web::get().to(posts::list_mine)),
                    )
                    .route("/share-due", web::post().to(posts::share_due))
                    .route("/{id}/share", web::post().to(posts::share))
                    .service(
                        web::resource("/{id}")
                            .route(web::get().to(posts::get))
                            .route(web::put().to(posts::update))
                            .route(web::delete().to(posts::delete)),
                    ),
            ),
    );
}
