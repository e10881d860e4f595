//! Password hashing and session tokens.
//!
//! Passwords are stored as PBKDF2-SHA256 hex with a per-user salt. Sessions
//! are HS256 JWTs whose `sub` is the user id.

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use hmac::{Hmac, Mac};
use pbkdf2::pbkdf2_hmac;
use serde::{Deserialize, Serialize};
use sha2::Sha256;

use crate::ServiceError;

const PBKDF2_ITERATIONS: u32 = 600_000;
const SALT_LEN: usize = 16;
const HASH_LEN: usize = 32;

/// Session lifetime: 1 hour in seconds.
pub const JWT_EXPIRY_SECS: u64 = 3600;

const JWT_HEADER: &str = r#"{"alg":"HS256","typ":"JWT"}"#;

// ── Passwords ───────────────────────────────────────────────────────────────

fn derive(password: &str, salt: &[u8]) -> [u8; HASH_LEN] {
    let mut hash = [0u8; HASH_LEN];
    pbkdf2_hmac::<Sha256>(password.as_bytes(), salt, PBKDF2_ITERATIONS, &mut hash);
    hash
}

/// Hash a password with a fresh salt. Returns `(hash_hex, salt_hex)`.
pub fn hash_password(password: &str) -> Result<(String, String), ServiceError> {
    let salt: [u8; SALT_LEN] = random_bytes()?;
    Ok((hex::encode(derive(password, &salt)), hex::encode(salt)))
}

/// Check a password against the stored hex hash and salt. Malformed stored
/// values never match.
pub fn verify_password(password: &str, hash_hex: &str, salt_hex: &str) -> bool {
    match (hex::decode(hash_hex), hex::decode(salt_hex)) {
        (Ok(expected), Ok(salt)) => constant_time_eq(&derive(password, &salt), &expected),
        _ => false,
    }
}

// ── Session tokens ──────────────────────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize)]
struct SessionClaims {
    sub: String,
    iat: u64,
    exp: u64,
}

fn unauthorized(msg: &str) -> ServiceError {
    ServiceError::Unauthorized(msg.into())
}

/// Issue a session token for `user_id`, valid for [`JWT_EXPIRY_SECS`].
pub fn sign_jwt(user_id: &str, secret: &str, now_unix: u64) -> String {
    let claims = SessionClaims {
        sub: user_id.to_string(),
        iat: now_unix,
        exp: now_unix + JWT_EXPIRY_SECS,
    };
    // Serializing three plain fields cannot fail.
    let payload = serde_json::to_vec(&claims).unwrap_or_default();
    let signing_input = format!(
        "{}.{}",
        URL_SAFE_NO_PAD.encode(JWT_HEADER),
        URL_SAFE_NO_PAD.encode(payload)
    );
    let sig = URL_SAFE_NO_PAD.encode(hmac_sha256(secret.as_bytes(), signing_input.as_bytes()));
    format!("{signing_input}.{sig}")
}

/// Verify a session token and return the user id it was issued for.
pub fn verify_jwt(token: &str, secret: &str, now_unix: u64) -> Result<String, ServiceError> {
    let mut parts = token.splitn(3, '.');
    let (Some(header), Some(payload), Some(sig)) = (parts.next(), parts.next(), parts.next())
    else {
        return Err(unauthorized("invalid token format"));
    };
    if sig.contains('.') {
        return Err(unauthorized("invalid token format"));
    }

    let expected = hmac_sha256(secret.as_bytes(), format!("{header}.{payload}").as_bytes());
    let actual = URL_SAFE_NO_PAD
        .decode(sig)
        .map_err(|_| unauthorized("invalid token signature encoding"))?;
    if !constant_time_eq(&expected, &actual) {
        return Err(unauthorized("invalid token signature"));
    }

    let claims: SessionClaims = URL_SAFE_NO_PAD
        .decode(payload)
        .ok()
        .and_then(|bytes| serde_json::from_slice(&bytes).ok())
        .ok_or_else(|| unauthorized("invalid token payload"))?;
    if now_unix > claims.exp {
        return Err(unauthorized("token expired"));
    }
    Ok(claims.sub)
}

// ── Randomness ──────────────────────────────────────────────────────────────

fn random_bytes<const N: usize>() -> Result<[u8; N], ServiceError> {
    let mut bytes = [0u8; N];
    getrandom::getrandom(&mut bytes)
        .map_err(|e| ServiceError::Internal(format!("RNG failure: {e}")))?;
    Ok(bytes)
}

/// A random 256-bit secret, hex-encoded. Used when no JWT secret is configured.
pub fn random_secret() -> Result<String, ServiceError> {
    Ok(hex::encode(random_bytes::<32>()?))
}

fn hmac_sha256(key: &[u8], data: &[u8]) -> Vec<u8> {
    let mut mac = Hmac::<Sha256>::new_from_slice(key).expect("HMAC can take key of any size");
    mac.update(data);
    mac.finalize().into_bytes().to_vec()
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    a.len() == b.len() && a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
