use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;

use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::Role;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::router::AppState;
use crate::user::errors::UserError;

/// Exchange email and password for an access token.
///
/// An unknown email and a wrong password produce the same `401` after the
/// same amount of password hashing work.
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequestBody>,
) -> Result<ApiSuccess<LoginResponseData>, ApiError> {
    let Ok(email) = EmailAddress::new(body.email) else {
        state.authenticator.reject_unknown_subject(&body.password);
        return Err(ApiError::invalid_credentials());
    };

    let user = match state.account_service.get_user_by_email(&email).await {
        Ok(user) => user,
        Err(UserError::NotFoundByEmail(_)) => {
            state.authenticator.reject_unknown_subject(&body.password);
            return Err(ApiError::invalid_credentials());
        }
        Err(e) => return Err(ApiError::from(e)),
    };

    let result = state
        .authenticator
        .authenticate(&body.password, &user.password_hash, user.email.as_str())
        .map_err(|e| match e {
            auth::AuthenticationError::InvalidCredentials => {
                tracing::debug!(user_id = %user.id, "Password mismatch");
                ApiError::invalid_credentials()
            }
            auth::AuthenticationError::JwtError(err) => {
                ApiError::InternalServerError(format!("Token generation failed: {}", err))
            }
        })?;

    tracing::info!(user_id = %user.id, "User logged in");

    Ok(ApiSuccess::new(
        StatusCode::OK,
        LoginResponseData {
            access_token: result.access_token,
            user_id: user.id.to_string(),
            email: user.email.as_str().to_string(),
            role: user.role,
        },
    ))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginRequestBody {
    email: String,
    password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponseData {
    pub access_token: String,
    pub user_id: String,
    pub email: String,
    pub role: Role,
}
