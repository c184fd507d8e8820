use crate::api::response::{created, list};
use crate::auth::auth::AuthUser;
use crate::scheduling::Scheduler;
use actix_web::{HttpResponse, web};
use chrono::NaiveDate;
use serde::Deserialize;
use tracing::info;
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
pub struct AssignShift {
    #[schema(example = 1)]
    pub shift_id: u64,
    /// First day worked
    #[schema(example = "2024-01-01", value_type = String, format = "date")]
    pub start_date: NaiveDate,
    /// Last day worked (inclusive)
    #[schema(example = "2024-01-10", value_type = String, format = "date")]
    pub end_date: NaiveDate,
}

/// Assign a shift to an employee for a range of days
#[utoipa::path(
    post,
    path = "/api/employees/{id}/assignments",
    params(("id" = u64, Path, description = "Employee id")),
    request_body = AssignShift,
    responses(
        (status = 201, description = "Assignment created", body = crate::model::assignment::Assignment),
        (status = 400, description = "start_date is after end_date"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Unknown employee or shift"),
        (status = 409, description = "Overlaps an existing assignment of the same shift", body = crate::api::response::ErrorBody)
    ),
    security(("bearer_auth" = [])),
    tag = "Assignment"
)]
pub async fn assign_shift(
    auth: AuthUser,
    scheduler: web::Data<Scheduler>,
    path: web::Path<u64>,
    body: web::Json<AssignShift>,
) -> actix_web::Result<HttpResponse> {
    auth.require_schedule_manager()?;

    let employee_id = path.into_inner();
    let assignment = scheduler
        .assign_shift(employee_id, body.shift_id, body.start_date, body.end_date)
        .await?;

    Ok(created(assignment))
}

/// An employee's assignments ordered by start date
#[utoipa::path(
    get,
    path = "/api/employees/{id}/assignments",
    params(("id" = u64, Path, description = "Employee id")),
    responses(
        (status = 200, description = "Assignments", body = [crate::model::assignment::Assignment]),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Unknown employee")
    ),
    security(("bearer_auth" = [])),
    tag = "Assignment"
)]
pub async fn list_assignments(
    auth: AuthUser,
    scheduler: web::Data<Scheduler>,
    path: web::Path<u64>,
) -> actix_web::Result<HttpResponse> {
    let employee_id = path.into_inner();
    auth.require_self_or_manager(employee_id)?;

    Ok(list(scheduler.list_assignments(employee_id).await?))
}

/// Remove an assignment
#[utoipa::path(
    delete,
    path = "/api/assignments/{id}",
    params(("id" = u64, Path, description = "Assignment id")),
    responses(
        (status = 204, description = "Assignment removed"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "No such assignment")
    ),
    security(("bearer_auth" = [])),
    tag = "Assignment"
)]
pub async fn remove_assignment(
    auth: AuthUser,
    scheduler: web::Data<Scheduler>,
    path: web::Path<u64>,
) -> actix_web::Result<HttpResponse> {
    auth.require_schedule_manager()?;

    let id = path.into_inner();
    scheduler.remove_assignment(id).await?;
    info!(assignment_id = id, by = auth.user_id, "Assignment removed via API");

    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
mod tests {
    use crate::api::test_support::{app, employee, hr, json_body, scheduler};
    use actix_web::http::StatusCode;
    use actix_web::test;
    use serde_json::json;

    #[actix_web::test]
    async fn boundary_day_overlap_is_a_conflict() {
        let (_, scheduler) = scheduler("2023-12-20 09:00:00");
        let app = test::init_service(app(scheduler)).await;

        let req = test::TestRequest::post()
            .uri("/api/shifts")
            .insert_header(hr())
            .set_json(json!({"name": "Morning", "start_time": "08:00", "end_time": "16:00"}))
            .to_request();
        let shift = json_body(test::call_service(&app, req).await).await["data"]["id"].clone();

        let req = test::TestRequest::post()
            .uri("/api/employees/5/assignments")
            .insert_header(hr())
            .set_json(json!({"shift_id": shift, "start_date": "2024-01-01", "end_date": "2024-01-10"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);

        let req = test::TestRequest::post()
            .uri("/api/employees/5/assignments")
            .insert_header(hr())
            .set_json(json!({"shift_id": shift, "start_date": "2024-01-10", "end_date": "2024-01-15"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CONFLICT);
        assert_eq!(json_body(resp).await["error"]["code"], "assignment_overlap");

        // an employee may read their own assignments but not someone else's
        let req = test::TestRequest::get()
            .uri("/api/employees/5/assignments")
            .insert_header(employee(5))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(json_body(resp).await["meta"]["count"], 1);

        let req = test::TestRequest::get()
            .uri("/api/employees/5/assignments")
            .insert_header(employee(6))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    }

    #[actix_web::test]
    async fn unknown_employee_and_reversed_dates() {
        let (_, scheduler) = scheduler("2023-12-20 09:00:00");
        let app = test::init_service(app(scheduler)).await;

        let req = test::TestRequest::post()
            .uri("/api/shifts")
            .insert_header(hr())
            .set_json(json!({"name": "Morning", "start_time": "08:00", "end_time": "16:00"}))
            .to_request();
        let shift = json_body(test::call_service(&app, req).await).await["data"]["id"].clone();

        let req = test::TestRequest::post()
            .uri("/api/employees/99/assignments")
            .insert_header(hr())
            .set_json(json!({"shift_id": shift, "start_date": "2024-01-01", "end_date": "2024-01-10"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let req = test::TestRequest::post()
            .uri("/api/employees/5/assignments")
            .insert_header(hr())
            .set_json(json!({"shift_id": shift, "start_date": "2024-01-10", "end_date": "2024-01-01"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn malformed_date_gets_an_envelope() {
        let (_, scheduler) = scheduler("2023-12-20 09:00:00");
        let app = test::init_service(app(scheduler)).await;

        let req = test::TestRequest::post()
            .uri("/api/employees/5/assignments")
            .insert_header(hr())
            .set_json(json!({"shift_id": 1, "start_date": "01/01/2024", "end_date": "2024-01-10"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(resp).await["error"]["code"], "validation_error");
    }

    #[actix_web::test]
    async fn remove_unknown_assignment_is_not_found() {
        let (_, scheduler) = scheduler("2023-12-20 09:00:00");
        let app = test::init_service(app(scheduler)).await;

        let req = test::TestRequest::delete()
            .uri("/api/assignments/41")
            .insert_header(hr())
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_eq!(json_body(resp).await["error"]["code"], "not_found");
    }
}
