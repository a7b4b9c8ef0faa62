use actix_web::{get, post, web, HttpResponse};
use validator::Validate;

use common::model::NotificationStatus;
use common::notifications;

use crate::model::{ApiResponse, SendNotificationRequest};
use crate::routes::ApiError;
use crate::services::mailer;
use crate::startup::AppState;

#[get("/notifications")]
#[tracing::instrument(skip(app_state))]
pub async fn get_notifications(app_state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let notifications = notifications::select_all(&app_state.db).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::data(notifications)))
}

/// Send action: the delivery outcome decides the recorded status. The log
/// entry is written either way.
#[post("/notifications")]
#[tracing::instrument(skip(app_state, body))]
pub async fn send_notification(
    body: web::Json<SendNotificationRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    let body = body.into_inner();
    body.validate()?;

    let status = match mailer::deliver(&body.recipients, &body.subject).await {
        Ok(()) => NotificationStatus::Sent,
        Err(error) => {
            tracing::warn!("Notification delivery failed: {error}");
            NotificationStatus::Failed
        }
    };

    let record =
        notifications::insert_notification(&app_state.db, &body.into_new_notification(), status)
            .await?;

    Ok(HttpResponse::Created().json(ApiResponse::data(record)))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(get_notifications).service(send_notification);
}
