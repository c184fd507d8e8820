use crate::{
    api::{assignment, attendance, response::reject, shift},
    auth::{handlers, middleware::auth_middleware},
    config::Config,
};
use actix_governor::{
    Governor, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware,
};
use actix_web::{http::StatusCode, middleware::from_fn, web};
use anyhow::{Result, anyhow};
use std::sync::Arc;

type Limiter = Arc<Governor<PeerIpKeyExtractor, NoOpMiddleware>>;

/// Per-IP limiters, built once and shared by every worker.
#[derive(Clone)]
pub struct Limiters {
    login: Limiter,
    protected: Limiter,
}

impl Limiters {
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self {
            login: build_limiter(config.rate_login_per_min)?,
            protected: build_limiter(config.rate_protected_per_min)?,
        })
    }
}

fn build_limiter(requests_per_min: u32) -> Result<Limiter> {
    let requests_per_min = requests_per_min.max(1);
    let per_ms = 60_000 / requests_per_min as u64;
    let cfg = GovernorConfigBuilder::default()
        .per_millisecond(per_ms.max(1))
        .burst_size(requests_per_min)
        .key_extractor(PeerIpKeyExtractor)
        .finish()
        .ok_or_else(|| anyhow!("invalid rate limit: {requests_per_min}/min"))?;
    Ok(Arc::new(Governor::new(&cfg)))
}

pub fn configure(cfg: &mut web::ServiceConfig, api_prefix: &str, limiters: Limiters) {
    // Public routes
    cfg.service(
        web::scope("/auth").service(
            web::resource("/login")
                .wrap(limiters.login.clone())
                .route(web::post().to(handlers::login)),
        ),
    );

    // Protected routes
    cfg.service(
        web::scope(api_prefix)
            .wrap(from_fn(auth_middleware)) // authentication
            .wrap(limiters.protected) // rate limiting
            .configure(scheduling_routes),
    );
}

/// Scheduling endpoints, relative to the protected scope.
pub fn scheduling_routes(cfg: &mut web::ServiceConfig) {
    // malformed bodies, queries and ids get the same envelope as domain errors
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _| {
        reject(StatusCode::BAD_REQUEST, "validation_error", err.to_string())
    }))
    .app_data(web::QueryConfig::default().error_handler(|err, _| {
        reject(StatusCode::BAD_REQUEST, "validation_error", err.to_string())
    }))
    .app_data(web::PathConfig::default().error_handler(|err, _| {
        reject(StatusCode::NOT_FOUND, "not_found", err.to_string())
    }));

    cfg.service(
        web::scope("/shifts")
            // /shifts
            .service(
                web::resource("")
                    .route(web::post().to(shift::create_shift))
                    .route(web::get().to(shift::list_shifts)),
            )
            // /shifts/{id}
            .service(
                web::resource("/{id}")
                    .route(web::get().to(shift::get_shift))
                    .route(web::put().to(shift::update_shift))
                    .route(web::delete().to(shift::delete_shift)),
            ),
    )
    .service(
        web::scope("/employees/{id}")
            // /employees/{id}/assignments
            .service(
                web::resource("/assignments")
                    .route(web::post().to(assignment::assign_shift))
                    .route(web::get().to(assignment::list_assignments)),
            )
            .service(web::resource("/clock-in").route(web::post().to(attendance::clock_in)))
            .service(web::resource("/clock-out").route(web::post().to(attendance::clock_out)))
            .service(web::resource("/attendance").route(web::get().to(attendance::attendance))),
    )
    .service(
        web::resource("/assignments/{id}")
            .route(web::delete().to(assignment::remove_assignment)),
    );
}
