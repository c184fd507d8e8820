use crate::api::response::reject;
use crate::model::role::Role;
use actix_web::http::StatusCode;
use actix_web::{FromRequest, HttpMessage, HttpRequest, dev::Payload};
use futures::future::{Ready, ready};

/// Caller identity placed in the request extensions by `auth_middleware`.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: u64,
    pub username: String,
    pub role: Role,

    /// Present only if this user is linked to an employee record
    pub employee_id: Option<u64>,
}

impl FromRequest for AuthUser {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        match req.extensions().get::<AuthUser>() {
            Some(user) => ready(Ok(user.clone())),
            None => ready(Err(reject(
                StatusCode::UNAUTHORIZED,
                "unauthorized",
                "Missing credentials",
            ))),
        }
    }
}

impl AuthUser {
    pub fn require_schedule_manager(&self) -> actix_web::Result<()> {
        if self.role.manages_schedule() {
            Ok(())
        } else {
            Err(reject(StatusCode::FORBIDDEN, "forbidden", "HR/Admin only"))
        }
    }

    /// Employees may act on their own record; managers on anyone's.
    pub fn require_self_or_manager(&self, employee_id: u64) -> actix_web::Result<()> {
        if self.role.manages_schedule() || self.employee_id == Some(employee_id) {
            Ok(())
        } else {
            Err(reject(
                StatusCode::FORBIDDEN,
                "forbidden",
                "Not allowed to act for this employee",
            ))
        }
    }
}
