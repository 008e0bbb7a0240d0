//! Persona HTTP handlers

use actix_web::{HttpResponse, delete, get, post, put, web};
use validator::Validate;

use crate::api::model::{
    AgeStatsResponse, ListParams, PersonaCreate, PersonaUpdate, PoblarRequest, PoblarResponse,
    ResetResponse,
};
use crate::error::AppError;
use crate::model::{AppState, RESET_MESSAGE, populate_message};
use crate::service::persona as persona_service;

pub async fn create(
    data: web::Data<AppState>,
    body: web::Json<PersonaCreate>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    body.validate()?;

    let persona = persona_service::create(data.db(), body.into()).await?;

    Ok(HttpResponse::Created().json(persona))
}

pub async fn list(
    data: web::Data<AppState>,
    params: web::Query<ListParams>,
) -> Result<HttpResponse, AppError> {
    params.validate()?;

    let personas = persona_service::list(data.db(), params.skip, params.limit).await?;

    Ok(HttpResponse::Ok().json(personas))
}

#[post("/poblar")]
pub async fn populate(
    data: web::Data<AppState>,
    body: web::Json<PoblarRequest>,
) -> Result<HttpResponse, AppError> {
    body.validate()?;

    let inserted = persona_service::populate(data.db(), data.generator(), body.count()).await?;

    Ok(HttpResponse::Created().json(PoblarResponse {
        message: populate_message(inserted),
        inserted_count: inserted,
    }))
}

#[get("/estadisticas/dominios")]
pub async fn domain_stats(data: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let counts = persona_service::domain_stats(data.db()).await?;

    Ok(HttpResponse::Ok().json(counts))
}

#[get("/estadisticas/edad")]
pub async fn age_stats(data: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let stats = persona_service::age_stats(data.db()).await?;

    Ok(HttpResponse::Ok().json(AgeStatsResponse::from(stats)))
}

#[get("/buscar/{termino}")]
pub async fn search(
    data: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let term = path.into_inner();

    let personas = persona_service::search(data.db(), &term).await?;

    Ok(HttpResponse::Ok().json(personas))
}

#[delete("/reset")]
pub async fn reset(data: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let deleted = persona_service::reset(data.db()).await?;

    Ok(HttpResponse::Ok().json(ResetResponse {
        message: RESET_MESSAGE.to_string(),
        deleted_count: deleted,
    }))
}

#[get("/{id}")]
pub async fn find(
    data: web::Data<AppState>,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    let persona = persona_service::get(data.db(), path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(persona))
}

#[put("/{id}")]
pub async fn update(
    data: web::Data<AppState>,
    path: web::Path<i32>,
    body: web::Json<PersonaUpdate>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    body.validate()?;

    let persona = persona_service::update(data.db(), path.into_inner(), body.into()).await?;

    Ok(HttpResponse::Ok().json(persona))
}

#[delete("/{id}")]
pub async fn remove(
    data: web::Data<AppState>,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    persona_service::delete(data.db(), path.into_inner()).await?;

    Ok(HttpResponse::NoContent().finish())
}
