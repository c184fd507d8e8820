use crate::api::assignment::AssignShift;
use crate::api::attendance::ClockReq;
use crate::api::response::{ErrorBody, ListMeta};
use crate::api::shift::{CreateShift, UpdateShift};
use crate::auth::handlers::LoginResponse;
use crate::model::assignment::Assignment;
use crate::model::attendance::{AttendanceRecord, AttendanceStatus};
use crate::model::shift::Shift;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi, openapi};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "HRM Scheduling API",
        version = "1.0.0",
        description = r#"
## Shift scheduling and attendance

Shift definitions, employee shift assignments and daily clock-in/clock-out.

### Rules
- **Shifts** never overlap. Windows are half-open, so 08:00-16:00 and
  16:00-22:00 can coexist.
- **Assignments** of the same employee to the same shift never share a day.
  Ranges are inclusive on both ends.
- **Attendance** allows one clock-in and one clock-out per employee, shift and
  UTC day.

### Security
All `/api` endpoints need a **JWT Bearer** token from `POST /auth/login`.
Managing shifts and assignments is limited to **HR** and **Admin**; employees
may clock in and out and read their own records.

### Response format
Every body is an envelope: `{"data": ..., "error": {"code", "message"} | null, "meta": ... | null}`.
List endpoints put the item count in `meta`.
"#,
    ),
    paths(
        crate::auth::handlers::login,
        crate::api::health::health,

        crate::api::shift::create_shift,
        crate::api::shift::list_shifts,
        crate::api::shift::get_shift,
        crate::api::shift::update_shift,
        crate::api::shift::delete_shift,

        crate::api::assignment::assign_shift,
        crate::api::assignment::list_assignments,
        crate::api::assignment::remove_assignment,

        crate::api::attendance::clock_in,
        crate::api::attendance::clock_out,
        crate::api::attendance::attendance
    ),
    components(
        schemas(
            Shift,
            CreateShift,
            UpdateShift,
            Assignment,
            AssignShift,
            AttendanceRecord,
            AttendanceStatus,
            ClockReq,
            ErrorBody,
            ListMeta,
            LoginResponse
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Auth", description = "Token issuance"),
        (name = "Health", description = "Liveness"),
        (name = "Shift", description = "Shift catalog"),
        (name = "Assignment", description = "Employee shift assignments"),
        (name = "Attendance", description = "Clock-in, clock-out and attendance history"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_every_route_and_the_bearer_scheme() {
        let doc = ApiDoc::openapi();
        for path in [
            "/auth/login",
            "/health",
            "/api/shifts",
            "/api/shifts/{id}",
            "/api/employees/{id}/assignments",
            "/api/assignments/{id}",
            "/api/employees/{id}/clock-in",
            "/api/employees/{id}/clock-out",
            "/api/employees/{id}/attendance",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }

        let components = doc.components.unwrap();
        assert!(components.security_schemes.contains_key("bearer_auth"));
    }

    #[test]
    fn response_bodies_point_at_registered_schemas() {
        let doc = serde_json::to_value(ApiDoc::openapi()).unwrap();
        let schema = |path: &str, method: &str, status: &str| {
            doc["paths"][path][method]["responses"][status]["content"]["application/json"]["schema"]
                .clone()
        };

        assert_eq!(
            schema("/api/shifts", "post", "201")["$ref"],
            "#/components/schemas/Shift"
        );
        assert_eq!(
            schema("/api/shifts", "get", "200")["items"]["$ref"],
            "#/components/schemas/Shift"
        );
        assert_eq!(
            schema("/api/shifts/{id}", "delete", "409")["$ref"],
            "#/components/schemas/ErrorBody"
        );
        assert_eq!(
            schema("/api/employees/{id}/assignments", "post", "201")["$ref"],
            "#/components/schemas/Assignment"
        );
        assert_eq!(
            schema("/api/employees/{id}/attendance", "get", "200")["items"]["$ref"],
            "#/components/schemas/AttendanceRecord"
        );

        for name in ["Shift", "Assignment", "AttendanceRecord", "ErrorBody"] {
            assert!(
                doc["components"]["schemas"].get(name).is_some(),
                "schema {name} not registered"
            );
        }
    }
}
