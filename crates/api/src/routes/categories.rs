use actix_web::{delete, get, patch, post, web, HttpResponse};
use serde_json::json;
use validator::Validate;

use common::categories;

use crate::model::{ApiResponse, CreateCategoryRequest, UpdateCategoryRequest};
use crate::routes::ApiError;
use crate::startup::AppState;

#[get("/categories")]
#[tracing::instrument(skip(app_state))]
pub async fn get_categories(app_state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let categories = categories::select_all(&app_state.db).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::data(categories)))
}

#[get("/categories/{id}")]
#[tracing::instrument(skip(app_state))]
pub async fn get_category(
    id: web::Path<String>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    let category = categories::select_by_id(&app_state.db, &id.into_inner())
        .await?
        .ok_or(ApiError::NotFound("Category"))?;

    Ok(HttpResponse::Ok().json(ApiResponse::data(category)))
}

#[post("/categories")]
#[tracing::instrument(skip(app_state, body))]
pub async fn create_category(
    body: web::Json<CreateCategoryRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    let body = body.into_inner();
    body.validate()?;

    let created = categories::insert_category(&app_state.db, &body.into_new_category()).await?;

    Ok(HttpResponse::Created().json(ApiResponse::data(created)))
}

#[patch("/categories/{id}")]
#[tracing::instrument(skip(app_state, body))]
pub async fn update_category(
    id: web::Path<String>,
    body: web::Json<UpdateCategoryRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    let body = body.into_inner();
    body.validate()?;

    let updated = categories::update_category(&app_state.db, &id.into_inner(), &body.into_update())
        .await?
        .ok_or(ApiError::NotFound("Category"))?;

    Ok(HttpResponse::Ok().json(ApiResponse::data(updated)))
}

/// Removal is rejected while any article still references the category, so a
/// direct API call cannot orphan association rows.
#[delete("/categories/{id}")]
#[tracing::instrument(skip(app_state))]
pub async fn delete_category(
    id: web::Path<String>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    let category_id = id.into_inner();

    let references = categories::count_article_references(&app_state.db, &category_id).await?;
    if references > 0 {
        return Err(ApiError::Conflict(format!(
            "Category is still referenced by {references} article(s)"
        )));
    }

    if !categories::delete_category(&app_state.db, &category_id).await? {
        return Err(ApiError::NotFound("Category"));
    }

    Ok(HttpResponse::Ok().json(json!({"success": true, "message": "Category deleted"})))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(get_categories)
        .service(create_category)
        .service(get_category)
        .service(update_category)
        .service(delete_category);
}
