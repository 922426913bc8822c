use actix_web::web;

use crate::handlers::{contact::create_contact, landing::site_fallback};

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/contact")
            .route(web::post().to(create_contact))
            .default_service(web::to(site_fallback)),
    );

    cfg.default_service(web::to(site_fallback));
}
