use crate::api::response::{created, list, ok};
use crate::auth::auth::AuthUser;
use crate::model::shift::{NewShift, ShiftUpdate};
use crate::scheduling::{Scheduler, SchedulingError, SchedulingResult};
use actix_web::{HttpResponse, web};
use chrono::NaiveTime;
use serde::Deserialize;
use tracing::debug;
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateShift {
    #[schema(example = "Morning")]
    pub name: String,
    /// `HH:MM` or `HH:MM:SS`
    #[schema(example = "08:00")]
    pub start_time: String,
    #[schema(example = "16:00")]
    pub end_time: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateShift {
    /// Keeps the current name when omitted
    #[schema(example = "Early morning")]
    pub name: Option<String>,
    #[schema(example = "07:00")]
    pub start_time: String,
    #[schema(example = "15:00")]
    pub end_time: String,
}

pub(crate) fn parse_time(field: &str, raw: &str) -> SchedulingResult<NaiveTime> {
    let raw = raw.trim();
    NaiveTime::parse_from_str(raw, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M"))
        .map_err(|_| {
            SchedulingError::Validation(format!("{field} must be HH:MM or HH:MM:SS, got {raw:?}"))
        })
}

/// Create a shift
#[utoipa::path(
    post,
    path = "/api/shifts",
    request_body = CreateShift,
    responses(
        (status = 201, description = "Shift created", body = crate::model::shift::Shift),
        (status = 400, description = "Invalid name or window"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 409, description = "Window overlaps an existing shift", body = crate::api::response::ErrorBody)
    ),
    security(("bearer_auth" = [])),
    tag = "Shift"
)]
pub async fn create_shift(
    auth: AuthUser,
    scheduler: web::Data<Scheduler>,
    body: web::Json<CreateShift>,
) -> actix_web::Result<HttpResponse> {
    auth.require_schedule_manager()?;

    let body = body.into_inner();
    let shift = NewShift {
        start_time: parse_time("start_time", &body.start_time)?,
        end_time: parse_time("end_time", &body.end_time)?,
        name: body.name,
    };

    let shift = scheduler.create_shift(shift).await?;
    debug!(shift_id = shift.id, by = auth.user_id, "Shift created via API");
    Ok(created(shift))
}

/// List all shifts ordered by start time
#[utoipa::path(
    get,
    path = "/api/shifts",
    responses(
        (status = 200, description = "All shifts", body = [crate::model::shift::Shift]),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Shift"
)]
pub async fn list_shifts(
    _auth: AuthUser,
    scheduler: web::Data<Scheduler>,
) -> actix_web::Result<HttpResponse> {
    Ok(list(scheduler.list_shifts().await?))
}

/// Get a shift by id
#[utoipa::path(
    get,
    path = "/api/shifts/{id}",
    params(("id" = u64, Path, description = "Shift id")),
    responses(
        (status = 200, description = "The shift", body = crate::model::shift::Shift),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "No such shift")
    ),
    security(("bearer_auth" = [])),
    tag = "Shift"
)]
pub async fn get_shift(
    _auth: AuthUser,
    scheduler: web::Data<Scheduler>,
    path: web::Path<u64>,
) -> actix_web::Result<HttpResponse> {
    Ok(ok(scheduler.get_shift(path.into_inner()).await?))
}

/// Replace a shift's window (and optionally its name)
#[utoipa::path(
    put,
    path = "/api/shifts/{id}",
    params(("id" = u64, Path, description = "Shift id")),
    request_body = UpdateShift,
    responses(
        (status = 200, description = "Shift updated", body = crate::model::shift::Shift),
        (status = 400, description = "Invalid name or window"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "No such shift"),
        (status = 409, description = "Window overlaps another shift", body = crate::api::response::ErrorBody)
    ),
    security(("bearer_auth" = [])),
    tag = "Shift"
)]
pub async fn update_shift(
    auth: AuthUser,
    scheduler: web::Data<Scheduler>,
    path: web::Path<u64>,
    body: web::Json<UpdateShift>,
) -> actix_web::Result<HttpResponse> {
    auth.require_schedule_manager()?;

    let body = body.into_inner();
    let update = ShiftUpdate {
        start_time: parse_time("start_time", &body.start_time)?,
        end_time: parse_time("end_time", &body.end_time)?,
        name: body.name,
    };

    Ok(ok(scheduler.update_shift(path.into_inner(), update).await?))
}

/// Delete a shift that has no active assignments
#[utoipa::path(
    delete,
    path = "/api/shifts/{id}",
    params(("id" = u64, Path, description = "Shift id")),
    responses(
        (status = 204, description = "Shift deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "No such shift"),
        (status = 409, description = "Shift still has active assignments", body = crate::api::response::ErrorBody)
    ),
    security(("bearer_auth" = [])),
    tag = "Shift"
)]
pub async fn delete_shift(
    auth: AuthUser,
    scheduler: web::Data<Scheduler>,
    path: web::Path<u64>,
) -> actix_web::Result<HttpResponse> {
    auth.require_schedule_manager()?;
    scheduler.delete_shift(path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}
