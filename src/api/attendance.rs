use crate::api::response::{list, ok};
use crate::auth::auth::AuthUser;
use crate::scheduling::Scheduler;
use actix_web::{HttpResponse, web};
use chrono::NaiveDate;
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Deserialize, ToSchema)]
pub struct ClockReq {
    #[schema(example = 1)]
    pub shift_id: u64,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AttendanceQuery {
    /// First day, inclusive
    #[param(example = "2024-03-01", value_type = String, format = "date")]
    pub from: NaiveDate,
    /// Last day, inclusive
    #[param(example = "2024-03-31", value_type = String, format = "date")]
    pub to: NaiveDate,
}

/// Clock-in endpoint
#[utoipa::path(
    post,
    path = "/api/employees/{id}/clock-in",
    params(("id" = u64, Path, description = "Employee id")),
    request_body = ClockReq,
    responses(
        (status = 200, description = "Clocked in", body = crate::model::attendance::AttendanceRecord),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Unknown employee or shift"),
        (status = 409, description = "Already clocked in for this shift today", body = crate::api::response::ErrorBody),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Attendance"
)]
pub async fn clock_in(
    auth: AuthUser,
    scheduler: web::Data<Scheduler>,
    path: web::Path<u64>,
    body: web::Json<ClockReq>,
) -> actix_web::Result<HttpResponse> {
    let employee_id = path.into_inner();
    auth.require_self_or_manager(employee_id)?;

    Ok(ok(scheduler.clock_in(employee_id, body.shift_id).await?))
}

/// Clock-out endpoint
#[utoipa::path(
    post,
    path = "/api/employees/{id}/clock-out",
    params(("id" = u64, Path, description = "Employee id")),
    request_body = ClockReq,
    responses(
        (status = 200, description = "Clocked out", body = crate::model::attendance::AttendanceRecord),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Unknown employee or no clock-in today", body = crate::api::response::ErrorBody),
        (status = 409, description = "Already clocked out", body = crate::api::response::ErrorBody),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Attendance"
)]
pub async fn clock_out(
    auth: AuthUser,
    scheduler: web::Data<Scheduler>,
    path: web::Path<u64>,
    body: web::Json<ClockReq>,
) -> actix_web::Result<HttpResponse> {
    let employee_id = path.into_inner();
    auth.require_self_or_manager(employee_id)?;

    Ok(ok(scheduler.clock_out(employee_id, body.shift_id).await?))
}

/// Attendance records between two days
#[utoipa::path(
    get,
    path = "/api/employees/{id}/attendance",
    params(("id" = u64, Path, description = "Employee id"), AttendanceQuery),
    responses(
        (status = 200, description = "Records ordered by day", body = [crate::model::attendance::AttendanceRecord]),
        (status = 400, description = "from is after to"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Unknown employee")
    ),
    security(("bearer_auth" = [])),
    tag = "Attendance"
)]
pub async fn attendance(
    auth: AuthUser,
    scheduler: web::Data<Scheduler>,
    path: web::Path<u64>,
    query: web::Query<AttendanceQuery>,
) -> actix_web::Result<HttpResponse> {
    let employee_id = path.into_inner();
    auth.require_self_or_manager(employee_id)?;

    Ok(list(
        scheduler
            .attendance(employee_id, query.from, query.to)
            .await?,
    ))
}

#[cfg(test)]
mod tests {
    use crate::api::test_support::{app, employee, hr, json_body, scheduler};
    use actix_web::http::StatusCode;
    use actix_web::test;
    use serde_json::json;

    #[actix_web::test]
    async fn employee_day_through_the_api() {
        let (clock, scheduler) = scheduler("2024-03-01 08:02:00");
        let app = test::init_service(app(scheduler)).await;

        let req = test::TestRequest::post()
            .uri("/api/shifts")
            .insert_header(hr())
            .set_json(json!({"name": "Morning", "start_time": "08:00", "end_time": "16:00"}))
            .to_request();
        let shift = json_body(test::call_service(&app, req).await).await["data"]["id"].clone();

        let clock_in = || {
            test::TestRequest::post()
                .uri("/api/employees/5/clock-in")
                .insert_header(employee(5))
                .set_json(json!({"shift_id": shift}))
                .to_request()
        };
        let clock_out = || {
            test::TestRequest::post()
                .uri("/api/employees/5/clock-out")
                .insert_header(employee(5))
                .set_json(json!({"shift_id": shift}))
                .to_request()
        };

        let resp = test::call_service(&app, clock_out()).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_eq!(json_body(resp).await["error"]["code"], "no_open_clock_in");

        let resp = test::call_service(&app, clock_in()).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body = json_body(resp).await;
        assert_eq!(body["data"]["work_date"], "2024-03-01");
        assert_eq!(body["data"]["status"], "present");
        assert!(body["data"]["clock_out"].is_null());

        let resp = test::call_service(&app, clock_in()).await;
        assert_eq!(resp.status(), StatusCode::CONFLICT);
        assert_eq!(json_body(resp).await["error"]["code"], "already_clocked_in");

        clock.set("2024-03-01 16:04:00");
        let resp = test::call_service(&app, clock_out()).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(!json_body(resp).await["data"]["clock_out"].is_null());

        let resp = test::call_service(&app, clock_out()).await;
        assert_eq!(resp.status(), StatusCode::CONFLICT);
        assert_eq!(json_body(resp).await["error"]["code"], "already_clocked_out");

        let req = test::TestRequest::get()
            .uri("/api/employees/5/attendance?from=2024-03-01&to=2024-03-31")
            .insert_header(employee(5))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(json_body(resp).await["meta"]["count"], 1);
    }

    #[actix_web::test]
    async fn cannot_clock_in_for_someone_else() {
        let (_, scheduler) = scheduler("2024-03-01 08:00:00");
        let app = test::init_service(app(scheduler)).await;

        let req = test::TestRequest::post()
            .uri("/api/employees/6/clock-in")
            .insert_header(employee(5))
            .set_json(json!({"shift_id": 1}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    }

    #[actix_web::test]
    async fn reversed_range_is_rejected() {
        let (_, scheduler) = scheduler("2024-03-01 08:00:00");
        let app = test::init_service(app(scheduler)).await;

        let req = test::TestRequest::get()
            .uri("/api/employees/5/attendance?from=2024-03-31&to=2024-03-01")
            .insert_header(hr())
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(resp).await["error"]["code"], "validation_error");
    }

    #[actix_web::test]
    async fn missing_query_gets_an_envelope() {
        let (_, scheduler) = scheduler("2024-03-01 08:00:00");
        let app = test::init_service(app(scheduler)).await;

        let req = test::TestRequest::get()
            .uri("/api/employees/5/attendance")
            .insert_header(hr())
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(resp).await["error"]["code"], "validation_error");
    }
}
