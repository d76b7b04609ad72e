//! Session authentication for the scribe routes.
//!
//! The session token arrives in the `scribe_token` cookie or as
//! `Authorization: Bearer <token>`. Only SHA-256 hashes of accepted tokens
//! are held in memory or config.

use super::AppState;
use super::error::ApiError;
use crate::audit::RequestContext;
use crate::config::AuthConfig;
use crate::error::ScribeError;
use axum::extract::{ConnectInfo, FromRequestParts};
use axum::http::{HeaderMap, header, request::Parts};
use sha2::{Digest, Sha256};
use std::future::Future;
use std::net::SocketAddr;
use std::pin::Pin;

pub const SESSION_COOKIE: &str = "scribe_token";
pub const PATIENT_HEADER: &str = "x-patient-id";

/// SHA-256 hash a token for storage (never store plaintext).
pub fn hash_token(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}

/// Constant-time equality comparison for secret strings.
fn constant_time_eq(a: &str, b: &str) -> bool {
    use subtle::ConstantTimeEq;
    a.as_bytes().ct_eq(b.as_bytes()).into()
}

/// Maps a presented session token to a user id.
pub trait SessionVerifier: Send + Sync {
    fn verify<'a>(
        &'a self,
        token: &'a str,
    ) -> Pin<Box<dyn Future<Output = Option<String>> + Send + 'a>>;
}

/// Verifier over the `[auth] sessions` table.
#[derive(Debug, Clone, Default)]
pub struct StaticSessionVerifier {
    sessions: Vec<(String, String)>,
}

impl StaticSessionVerifier {
    pub fn from_config(config: &AuthConfig) -> Self {
        Self {
            sessions: config
                .sessions
                .iter()
                .map(|s| (s.token_sha256.to_ascii_lowercase(), s.user_id.clone()))
                .collect(),
        }
    }

    /// Accept `token` for `user_id`. Only the hash is kept.
    #[must_use]
    pub fn with_token(mut self, user_id: impl Into<String>, token: &str) -> Self {
        self.sessions.push((hash_token(token), user_id.into()));
        self
    }

    fn lookup(&self, token: &str) -> Option<String> {
        let presented = hash_token(token);
        // Scan every entry so timing does not reveal which one matched.
        let mut found = None;
        for (hash, user_id) in &self.sessions {
            if constant_time_eq(&presented, hash) && found.is_none() {
                found = Some(user_id.clone());
            }
        }
        found
    }
}

impl SessionVerifier for StaticSessionVerifier {
    fn verify<'a>(
        &'a self,
        token: &'a str,
    ) -> Pin<Box<dyn Future<Output = Option<String>> + Send + 'a>> {
        Box::pin(async move { self.lookup(token) })
    }
}

fn session_token(headers: &HeaderMap) -> Option<String> {
    let from_cookie = headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value.trim().to_string());

    from_cookie
        .or_else(|| {
            headers
                .get(header::AUTHORIZATION)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.strip_prefix("Bearer "))
                .map(|t| t.trim().to_string())
        })
        .filter(|t| !t.is_empty())
}

fn client_ip(parts: &Parts) -> Option<String> {
    parts
        .headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(ToOwned::to_owned)
        .or_else(|| {
            parts
                .extensions
                .get::<ConnectInfo<SocketAddr>>()
                .map(|ConnectInfo(addr)| addr.ip().to_string())
        })
}

/// The authenticated caller and the audit context derived from the request.
#[derive(Debug, Clone)]
pub struct Caller(pub RequestContext);

impl FromRequestParts<AppState> for Caller {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let unauthenticated = || ApiError(ScribeError::Unauthenticated("Authentication required".into()));

        let token = session_token(&parts.headers).ok_or_else(unauthenticated)?;
        let Some(user_id) = state.sessions.verify(&token).await else {
            tracing::warn!("gateway.auth.rejected");
            return Err(unauthenticated());
        };

        let patient_id = parts
            .headers
            .get(PATIENT_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(ToOwned::to_owned);

        Ok(Self(
            RequestContext::new(user_id)
                .with_patient(patient_id)
                .with_ip(client_ip(parts)),
        ))
    }
}
