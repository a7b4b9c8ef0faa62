use actix_web::{get, web, HttpResponse};

use common::{articles, categories, networks, notifications, stats};

use crate::model::{ApiResponse, DashboardData};
use crate::routes::ApiError;
use crate::startup::AppState;

/// Number of log entries shipped with the dashboard payload.
const RECENT_NOTIFICATIONS: u64 = 10;

/// Full unfiltered sets for the admin client, notifications capped.
#[get("/dashboard/stats")]
#[tracing::instrument(skip(app_state))]
pub async fn get_stats(app_state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let db = &app_state.db;

    let data = DashboardData {
        articles: articles::select_all(db).await?,
        categories: categories::select_all(db).await?,
        networks: networks::select_all(db).await?,
        notifications: notifications::select_recent(db, RECENT_NOTIFICATIONS).await?,
    };

    Ok(HttpResponse::Ok().json(ApiResponse::data(data)))
}

/// Grouped article counts, computed server-side from the full collections.
#[get("/dashboard/summary")]
#[tracing::instrument(skip(app_state))]
pub async fn get_summary(app_state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let db = &app_state.db;

    let articles = articles::select_all(db).await?;
    let categories = categories::select_all(db).await?;
    let networks = networks::select_all(db).await?;

    let summary = stats::dashboard_stats(&articles, &categories, &networks);

    Ok(HttpResponse::Ok().json(ApiResponse::data(summary)))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(get_stats).service(get_summary);
}
