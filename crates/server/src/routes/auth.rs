use axum::{
    Json,
    extract::{FromRef, FromRequestParts, State},
    http::{HeaderMap, HeaderValue, StatusCode, header, request::Parts},
    response::{AppendHeaders, IntoResponse},
};

use sitework_api::{
    AuthResponse, ChangePasswordRequest, LoginRequest, OkResponse, SignupRequest, crypto, service,
};
use sitework_core::{Action, User};
use sitework_store::{Store, StoreError};

use crate::config::AppConfig;
use crate::error::{ApiErr, ApiJson};

/// Name of the cookie carrying the access token for browser sessions.
pub const SESSION_COOKIE: &str = "sitework_token";

// ---------------------------------------------------------------------------
// Auth extractor
// ---------------------------------------------------------------------------

/// Authenticated user, resolved from `Authorization: Bearer <jwt>` or the
/// session cookie.
pub struct AuthUser {
    pub user: User,
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    Store: FromRef<S>,
    AppConfig: FromRef<S>,
{
    type Rejection = ApiErr;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let store = Store::from_ref(state);
        let config = AppConfig::from_ref(state);

        let token = bearer_token(&parts.headers)
            .or_else(|| cookie_token(&parts.headers))
            .ok_or_else(|| ApiErr::unauthorized("authentication required"))?;

        let user_id = service::resolve_auth_token(&token, &config.jwt_secret, service::now_unix())?;
        match store.get_user(&user_id) {
            Ok(user) => Ok(AuthUser { user }),
            Err(StoreError::NotFound(_)) => Err(ApiErr::unauthorized("account no longer exists")),
            Err(e) => Err(e.into()),
        }
    }
}

impl AuthUser {
    pub fn id(&self) -> &str {
        &self.user.id
    }

    /// Refuse the request unless the user's role allows `action`.
    pub fn require(&self, action: Action) -> Result<(), ApiErr> {
        if self.user.role.can(action) {
            Ok(())
        } else {
            Err(ApiErr::forbidden(format!(
                "{} role cannot {}",
                self.user.role,
                action.as_str()
            )))
        }
    }

    /// The user's company, or 403 when they have none yet.
    pub fn company_id(&self) -> Result<&str, ApiErr> {
        self.user
            .company_id
            .as_deref()
            .ok_or_else(|| ApiErr::forbidden("you do not belong to a company"))
    }

    /// Tenant isolation: resources of other companies are off limits.
    pub fn require_company(&self, company_id: &str) -> Result<(), ApiErr> {
        if self.user.company_id.as_deref() == Some(company_id) {
            Ok(())
        } else {
            Err(ApiErr::forbidden("resource belongs to another company"))
        }
    }

    /// Owner-only actions: the user must own `company_id`, not merely hold
    /// the Owner role.
    pub fn require_owner(&self, store: &Store, company_id: &str) -> Result<(), ApiErr> {
        self.require_company(company_id)?;
        if store.get_company(company_id)?.owner_id == self.user.id {
            Ok(())
        } else {
            Err(ApiErr::forbidden("only the company owner can do this"))
        }
    }

    /// Tenant check for anything hanging off a project.
    pub fn require_project(&self, store: &Store, project_id: &str) -> Result<(), ApiErr> {
        let company_id = store.project_company(project_id)?;
        self.require_company(&company_id)
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

pub(crate) fn cookie_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value.to_string())
        .filter(|v| !v.is_empty())
}

/// `Set-Cookie` value for a freshly issued token.
pub(crate) fn session_cookie(token: &str, config: &AppConfig) -> HeaderValue {
    cookie_header(token, crypto::JWT_EXPIRY_SECS, config.secure_cookies)
}

/// `Set-Cookie` value that expires the session cookie.
pub(crate) fn clear_session_cookie(config: &AppConfig) -> HeaderValue {
    cookie_header("", 0, config.secure_cookies)
}

fn cookie_header(value: &str, max_age: u64, secure: bool) -> HeaderValue {
    let mut cookie =
        format!("{SESSION_COOKIE}={value}; Path=/; HttpOnly; SameSite=Lax; Max-Age={max_age}");
    if secure {
        cookie.push_str("; Secure");
    }
    HeaderValue::from_str(&cookie).unwrap_or_else(|_| HeaderValue::from_static(""))
}

// ---------------------------------------------------------------------------
// Shared flows (JSON API and HTML forms)
// ---------------------------------------------------------------------------

pub(crate) fn signup_user(
    store: &Store,
    config: &AppConfig,
    req: &SignupRequest,
) -> Result<AuthResponse, ApiErr> {
    if !config.registration_open {
        return Err(ApiErr::forbidden("registration is currently closed"));
    }
    let signup = service::signup(req)?;
    let user = store.signup(&signup.user, signup.company_name.as_deref())?;
    Ok(service::auth_response(
        user,
        &config.jwt_secret,
        service::now_unix(),
    ))
}

pub(crate) fn login_user(
    store: &Store,
    config: &AppConfig,
    req: &LoginRequest,
) -> Result<AuthResponse, ApiErr> {
    let invalid = || ApiErr::unauthorized("invalid username or password");
    let username = service::login_username(&req.username)?;
    let creds = store
        .credentials_by_username(&username)?
        .ok_or_else(invalid)?;
    if !crypto::verify_password(&req.password, &creds.password_hash, &creds.password_salt) {
        tracing::info!(username = %username, "failed login");
        return Err(invalid());
    }
    let user = store.get_user(&creds.user_id)?;
    Ok(service::auth_response(
        user,
        &config.jwt_secret,
        service::now_unix(),
    ))
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/auth/signup: create an account (and, for owners, a company).
pub async fn signup(
    State(store): State<Store>,
    State(config): State<AppConfig>,
    ApiJson(req): ApiJson<SignupRequest>,
) -> Result<impl IntoResponse, ApiErr> {
    let auth = signup_user(&store, &config, &req)?;
    tracing::info!(user_id = %auth.user.id, "signup");
    Ok((
        StatusCode::CREATED,
        AppendHeaders([(
            header::SET_COOKIE,
            session_cookie(&auth.access_token, &config),
        )]),
        Json(auth),
    ))
}

/// POST /api/auth/login: exchange username + password for a token.
pub async fn login(
    State(store): State<Store>,
    State(config): State<AppConfig>,
    ApiJson(req): ApiJson<LoginRequest>,
) -> Result<impl IntoResponse, ApiErr> {
    let auth = login_user(&store, &config, &req)?;
    Ok((
        AppendHeaders([(
            header::SET_COOKIE,
            session_cookie(&auth.access_token, &config),
        )]),
        Json(auth),
    ))
}

/// POST /api/auth/logout: drop the session cookie. Bearer tokens simply
/// expire.
pub async fn logout(State(config): State<AppConfig>) -> impl IntoResponse {
    (
        AppendHeaders([(header::SET_COOKIE, clear_session_cookie(&config))]),
        Json(OkResponse { ok: true }),
    )
}

/// GET /api/auth/me: the authenticated user.
pub async fn me(user: AuthUser) -> Json<User> {
    Json(user.user)
}

/// PUT /api/auth/password: change password (requires the current one).
pub async fn change_password(
    State(store): State<Store>,
    user: AuthUser,
    ApiJson(req): ApiJson<ChangePasswordRequest>,
) -> Result<Json<OkResponse>, ApiErr> {
    let creds = store.credentials_by_id(user.id())?;
    if !crypto::verify_password(
        &req.current_password,
        &creds.password_hash,
        &creds.password_salt,
    ) {
        return Err(ApiErr::unauthorized("current password is incorrect"));
    }
    let (hash, salt) = service::new_password(&req.new_password)?;
    store.set_password(user.id(), &hash, &salt)?;
    tracing::info!(user_id = %user.id(), "password changed");
    Ok(Json(OkResponse { ok: true }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cookie_token_parsing() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("theme=dark; sitework_token=abc.def.ghi; other=1"),
        );
        assert_eq!(cookie_token(&headers).as_deref(), Some("abc.def.ghi"));
        assert_eq!(bearer_token(&headers), None);

        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Bearer xyz"),
        );
        assert_eq!(bearer_token(&headers).as_deref(), Some("xyz"));
    }

    #[test]
    fn test_cookie_header_flags() {
        let v = cookie_header("tok", 3600, true);
        let s = v.to_str().unwrap();
        assert!(s.starts_with("sitework_token=tok; Path=/; HttpOnly; SameSite=Lax"));
        assert!(s.ends_with("Max-Age=3600; Secure"));
        assert!(
            !cookie_header("", 0, false)
                .to_str()
                .unwrap()
                .contains("Secure")
        );
    }
}
