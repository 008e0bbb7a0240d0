use actix_web::{Scope, web};

use crate::model::PERSONAS_BASE_PATH;

pub fn routes() -> Scope {
    web::scope(PERSONAS_BASE_PATH)
        .service(
            web::resource(["", "/"])
                .route(web::get().to(super::persona::list))
                .route(web::post().to(super::persona::create)),
        )
        .service(super::persona::populate)
        .service(super::persona::domain_stats)
        .service(super::persona::age_stats)
        .service(super::persona::search)
        // `/reset` must be registered before `/{id}`
        .service(super::persona::reset)
        .service(super::persona::find)
        .service(super::persona::update)
        .service(super::persona::remove)
}
