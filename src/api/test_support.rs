//! App and token builders for handler tests.

use actix_web::body::MessageBody;
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::middleware::from_fn;
use actix_web::web::{self, Data};
use actix_web::{App, test};
use serde_json::Value;
use std::sync::Arc;

use crate::auth::jwt::generate_access_token;
use crate::auth::middleware::auth_middleware;
use crate::config::Config;
use crate::model::role::Role;
use crate::routes::scheduling_routes;
use crate::scheduling::Scheduler;
use crate::scheduling::clock::FixedClock;
use crate::store::memory::{MemoryDirectory, MemoryStore};

/// Employees 5 and 6 exist in the directory.
pub fn scheduler(at: &str) -> (Arc<FixedClock>, Data<Scheduler>) {
    let clock = Arc::new(FixedClock::at(at));
    let scheduler = Scheduler::from_store(
        Arc::new(MemoryStore::new()),
        Arc::new(MemoryDirectory::with(&[5, 6])),
        clock.clone(),
    );
    (clock, Data::new(scheduler))
}

/// The protected `/api` scope without rate limiting.
pub fn app(
    scheduler: Data<Scheduler>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(scheduler)
        .app_data(Data::new(Config::for_tests()))
        .service(
            web::scope("/api")
                .wrap(from_fn(auth_middleware))
                .configure(scheduling_routes),
        )
}

pub fn bearer(role: Role, employee_id: Option<u64>) -> (&'static str, String) {
    let config = Config::for_tests();
    let token = generate_access_token(
        1,
        "tester".into(),
        role as u8,
        employee_id,
        &config.jwt_secret,
        config.access_token_ttl,
    )
    .unwrap();
    ("Authorization", format!("Bearer {token}"))
}

pub fn hr() -> (&'static str, String) {
    bearer(Role::Hr, None)
}

pub fn employee(id: u64) -> (&'static str, String) {
    bearer(Role::Employee, Some(id))
}

pub async fn json_body(resp: ServiceResponse<impl MessageBody>) -> Value {
    let bytes = test::read_body(resp).await;
    serde_json::from_slice(&bytes).unwrap()
}
