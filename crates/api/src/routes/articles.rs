use actix_web::{delete, get, patch, post, web, HttpResponse};
use serde_json::json;
use validator::Validate;

use common::articles;

use crate::model::{
    ApiResponse, ArticleQuery, BulkStatusRequest, CreateArticleRequest, ImportRequest,
    UpdateArticleRequest,
};
use crate::routes::ApiError;
use crate::services::import;
use crate::startup::AppState;

#[get("/articles")]
#[tracing::instrument(skip(app_state))]
pub async fn get_articles(
    query: web::Query<ArticleQuery>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    let query = query.into_inner();
    let page = articles::select_page(
        &app_state.db,
        &query.filters(),
        query.get_page(),
        query.get_size(),
    )
    .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::page(page)))
}

#[get("/articles/{id}")]
#[tracing::instrument(skip(app_state))]
pub async fn get_article(
    id: web::Path<String>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    let article = articles::select_by_id(&app_state.db, &id.into_inner())
        .await?
        .ok_or(ApiError::NotFound("Article"))?;

    Ok(HttpResponse::Ok().json(ApiResponse::data(article)))
}

#[post("/articles")]
#[tracing::instrument(skip(app_state, body))]
pub async fn create_article(
    body: web::Json<CreateArticleRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    let body = body.into_inner();
    body.validate()?;

    let created = articles::insert_article(&app_state.db, &body.into_new_article()).await?;

    Ok(HttpResponse::Created().json(ApiResponse::data(created)))
}

#[patch("/articles/bulk-status")]
#[tracing::instrument(skip(app_state))]
pub async fn bulk_update_status(
    body: web::Json<BulkStatusRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    let body = body.into_inner();
    body.validate()?;

    articles::set_status_bulk(&app_state.db, &body.ids, body.status).await?;

    Ok(HttpResponse::Ok().json(json!({"success": true, "message": "Articles updated"})))
}

#[post("/articles/import")]
#[tracing::instrument(skip(app_state, body))]
pub async fn import_articles(
    body: web::Json<ImportRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    let report = import::import_articles(&app_state.db, &body.into_inner().articles).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::data(report)))
}

#[patch("/articles/{id}")]
#[tracing::instrument(skip(app_state, body))]
pub async fn update_article(
    id: web::Path<String>,
    body: web::Json<UpdateArticleRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    let body = body.into_inner();
    body.validate()?;

    let updated = articles::update_article(&app_state.db, &id.into_inner(), &body.into_update())
        .await?
        .ok_or(ApiError::NotFound("Article"))?;

    Ok(HttpResponse::Ok().json(ApiResponse::data(updated)))
}

#[delete("/articles/{id}")]
#[tracing::instrument(skip(app_state))]
pub async fn delete_article(
    id: web::Path<String>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    if !articles::delete_article(&app_state.db, &id.into_inner()).await? {
        return Err(ApiError::NotFound("Article"));
    }

    Ok(HttpResponse::Ok().json(json!({"success": true, "message": "Article deleted"})))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    // bulk-status and import before the parameterized routes
    cfg.service(get_articles)
        .service(bulk_update_status)
        .service(import_articles)
        .service(create_article)
        .service(get_article)
        .service(update_article)
        .service(delete_article);
}
