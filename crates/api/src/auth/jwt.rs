//! Bearer tokens naming the editor behind a request.
//!
//! The admin panel's login flow hands editors an HS256 token whose claims
//! carry the editor id and role. Handlers never see the token itself, only
//! the [`Editor`] recovered from it by [`verify_token`]. [`issue_token`]
//! exists for tooling and tests.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use pages_core::editor::Editor;
use pages_core::types::DbId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Default token lifetime in minutes.
const DEFAULT_TOKEN_LIFETIME_MINS: i64 = 15;

/// Claims of an editor token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Editor id.
    pub sub: DbId,
    /// Role name checked by the page guard.
    pub role: String,
    pub exp: i64,
    pub iat: i64,
    /// Token id, for audit trails.
    pub jti: String,
}

impl Claims {
    /// Claims for `editor`, valid for `lifetime_mins` from now.
    pub fn for_editor(editor: &Editor, lifetime_mins: i64) -> Self {
        let now = Utc::now();
        Self {
            sub: editor.id,
            role: editor.role.clone(),
            exp: (now + Duration::minutes(lifetime_mins)).timestamp(),
            iat: now.timestamp(),
            jti: Uuid::new_v4().to_string(),
        }
    }

    pub fn into_editor(self) -> Editor {
        Editor::new(self.sub, self.role)
    }
}

/// Signing secret and token lifetime.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub token_lifetime_mins: i64,
}

impl JwtConfig {
    /// Read `JWT_SECRET` (required, non-empty) and `JWT_ACCESS_EXPIRY_MINS`
    /// (default 15).
    ///
    /// # Panics
    ///
    /// Panics when the secret is missing or empty, or the lifetime is not
    /// an integer.
    pub fn from_env() -> Self {
        let secret = std::env::var("JWT_SECRET")
            .ok()
            .filter(|s| !s.is_empty())
            .expect("JWT_SECRET must be set to a non-empty value");

        let token_lifetime_mins = match std::env::var("JWT_ACCESS_EXPIRY_MINS") {
            Ok(raw) => raw
                .parse()
                .expect("JWT_ACCESS_EXPIRY_MINS must be an integer"),
            Err(_) => DEFAULT_TOKEN_LIFETIME_MINS,
        };

        Self {
            secret,
            token_lifetime_mins,
        }
    }

    fn validation() -> Validation {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_required_spec_claims(&["exp", "sub"]);
        validation
    }
}

/// Sign a token for `editor`.
pub fn issue_token(
    editor: &Editor,
    config: &JwtConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    let claims = Claims::for_editor(editor, config.token_lifetime_mins);
    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
}

/// Check the signature and expiry of `token` and return the editor it names.
pub fn verify_token(
    token: &str,
    config: &JwtConfig,
) -> Result<Editor, jsonwebtoken::errors::Error> {
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &JwtConfig::validation(),
    )?;
    Ok(data.claims.into_editor())
}
