use crate::{
    api::response::{failure, ok},
    auth::{jwt::generate_access_token, password::verify_password},
    config::Config,
    model::user::{LoginReqDto, User},
};
use actix_web::{HttpResponse, Responder, http::StatusCode, web};
use serde::Serialize;
use sqlx::MySqlPool;
use tracing::{debug, error, info, instrument};
use utoipa::ToSchema;

#[derive(Serialize, ToSchema)]
pub struct LoginResponse {
    access_token: String,
    #[schema(example = "Bearer")]
    token_type: String,
    /// seconds
    #[schema(example = 900)]
    expires_in: usize,
}

fn invalid_credentials() -> HttpResponse {
    failure(
        StatusCode::UNAUTHORIZED,
        "invalid_credentials",
        "Invalid credentials",
    )
}

/// Exchange username and password for an access token
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body(content = Object, example = json!({
        "username": "hr.alice",
        "password": "********"
    })),
    responses(
        (status = 200, description = "Token issued", body = LoginResponse),
        (status = 400, description = "Username or password missing"),
        (status = 401, description = "Invalid credentials"),
        (status = 429, description = "Too many login attempts"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Auth"
)]
#[instrument(
    name = "auth_login",
    skip(pool, config, user),
    fields(username = %user.username)
)]
pub async fn login(
    user: web::Json<LoginReqDto>,
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
) -> impl Responder {
    info!("Login request received");

    if user.username.trim().is_empty() || user.password.is_empty() {
        info!("Validation failed: empty username or password");
        return failure(
            StatusCode::BAD_REQUEST,
            "validation_error",
            "Username or password required",
        );
    }

    debug!("Fetching user from database");

    let db_user = match sqlx::query_as::<_, User>(
        r#"
        SELECT id, username, password, role_id, employee_id, is_active
        FROM users
        WHERE username = ?
        "#,
    )
    .bind(user.username.trim())
    .fetch_optional(pool.get_ref())
    .await
    {
        Ok(Some(user)) => {
            debug!(user_id = user.id, "User found");
            user
        }
        Ok(None) => {
            info!("Invalid credentials: user not found");
            return invalid_credentials();
        }
        Err(e) => {
            error!(error = %e, "Database error while fetching user");
            return failure(
                StatusCode::INTERNAL_SERVER_ERROR,
                "storage_error",
                "Internal server error",
            );
        }
    };

    if let Err(e) = verify_password(&user.password, &db_user.password) {
        info!(error = %e, "Invalid credentials: password mismatch");
        return invalid_credentials();
    }

    if !db_user.is_active {
        info!(user_id = db_user.id, "Login refused: account disabled");
        return invalid_credentials();
    }

    let access_token = match generate_access_token(
        db_user.id,
        db_user.username.clone(),
        db_user.role_id,
        db_user.employee_id,
        &config.jwt_secret,
        config.access_token_ttl,
    ) {
        Ok(token) => token,
        Err(e) => {
            error!(error = %e, "Failed to sign access token");
            return failure(
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                "Internal server error",
            );
        }
    };

    info!(user_id = db_user.id, "Login successful");

    ok(LoginResponse {
        access_token,
        token_type: "Bearer".into(),
        expires_in: config.access_token_ttl,
    })
}
