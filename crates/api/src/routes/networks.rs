use actix_web::{delete, get, patch, post, web, HttpResponse};
use serde_json::json;
use validator::Validate;

use common::networks;

use crate::model::{ApiResponse, CreateNetworkRequest, UpdateNetworkRequest};
use crate::routes::ApiError;
use crate::startup::AppState;

#[get("/networks")]
#[tracing::instrument(skip(app_state))]
pub async fn get_networks(app_state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let networks = networks::select_all(&app_state.db).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::data(networks)))
}

#[get("/networks/{id}")]
#[tracing::instrument(skip(app_state))]
pub async fn get_network(
    id: web::Path<String>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    let network = networks::select_by_id(&app_state.db, &id.into_inner())
        .await?
        .ok_or(ApiError::NotFound("Network"))?;

    Ok(HttpResponse::Ok().json(ApiResponse::data(network)))
}

#[post("/networks")]
#[tracing::instrument(skip(app_state, body))]
pub async fn create_network(
    body: web::Json<CreateNetworkRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    let body = body.into_inner();
    body.validate()?;

    let created = networks::insert_network(&app_state.db, &body.into_new_network()).await?;

    Ok(HttpResponse::Created().json(ApiResponse::data(created)))
}

#[patch("/networks/{id}")]
#[tracing::instrument(skip(app_state, body))]
pub async fn update_network(
    id: web::Path<String>,
    body: web::Json<UpdateNetworkRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    let body = body.into_inner();
    body.validate()?;

    let updated = networks::update_network(&app_state.db, &id.into_inner(), &body.into_update())
        .await?
        .ok_or(ApiError::NotFound("Network"))?;

    Ok(HttpResponse::Ok().json(ApiResponse::data(updated)))
}

#[delete("/networks/{id}")]
#[tracing::instrument(skip(app_state))]
pub async fn delete_network(
    id: web::Path<String>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    if !networks::delete_network(&app_state.db, &id.into_inner()).await? {
        return Err(ApiError::NotFound("Network"));
    }

    Ok(HttpResponse::Ok().json(json!({"success": true, "message": "Network deleted"})))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(get_networks)
        .service(create_network)
        .service(get_network)
        .service(update_network)
        .service(delete_network);
}
