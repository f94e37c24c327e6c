use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::extract::Request;
use axum::extract::State;
use axum::http::header;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::Response;

use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::Role;
use crate::domain::user::models::UserId;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::policy::AccessClass;
use crate::inbound::http::router::AppState;

/// Caller identity resolved for a single request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identity {
    Anonymous,
    Authenticated(AuthenticatedUser),
}

/// Authenticated caller, built from a verified token and a stored account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user_id: UserId,
    /// Token subject (the account email)
    pub subject: String,
    pub role: Role,
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        match parts.extensions.get::<Identity>() {
            Some(Identity::Authenticated(user)) => Ok(user.clone()),
            _ => Err(ApiError::Unauthorized("Authentication required".to_string())),
        }
    }
}

/// Resolves the caller from the `Authorization` header.
///
/// Never rejects: any failure leaves the request anonymous and the decision to
/// the access policy.
pub async fn authenticate(State(state): State<AppState>, mut req: Request, next: Next) -> Response {
    let identity = resolve_identity(&state, req.headers()).await;
    req.extensions_mut().insert(identity);
    next.run(req).await
}

async fn resolve_identity(state: &AppState, headers: &HeaderMap) -> Identity {
    let Some(token) = extract_bearer_token(headers) else {
        tracing::debug!("No bearer token, continuing anonymously");
        return Identity::Anonymous;
    };

    let subject = match state.authenticator.validate_token(token) {
        Ok(subject) => subject,
        Err(e) => {
            tracing::warn!(error = %e, "JWT validation failed");
            return Identity::Anonymous;
        }
    };

    let Ok(email) = EmailAddress::new(subject.clone()) else {
        tracing::warn!("Token subject is not an email address");
        return Identity::Anonymous;
    };

    match state.account_service.get_user_by_email(&email).await {
        Ok(user) => Identity::Authenticated(AuthenticatedUser {
            user_id: user.id,
            subject,
            role: user.role,
        }),
        Err(e) => {
            tracing::warn!(error = %e, "Token subject could not be resolved to an account");
            Identity::Anonymous
        }
    }
}

/// Applies the access policy to the identity set by [`authenticate`].
pub async fn authorize(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let class = state.access_policy.classify(req.uri().path());
    let authenticated = matches!(
        req.extensions().get::<Identity>(),
        Some(Identity::Authenticated(_))
    );

    if class == AccessClass::RequiresAuthenticated && !authenticated {
        tracing::debug!(path = %req.uri().path(), "Anonymous request to protected path");
        return Err(ApiError::Unauthorized(
            "Authentication required".to_string(),
        ));
    }

    Ok(next.run(req).await)
}

/// Token from an `Authorization: Bearer <token>` header.
///
/// The scheme is case-sensitive and the token must be non-empty.
pub fn extract_bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .filter(|token| !token.is_empty())
}
