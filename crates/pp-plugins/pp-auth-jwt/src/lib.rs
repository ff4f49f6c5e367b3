//! # pp-auth-jwt
//!
//! Argon2 + JWT implementation of `AdminAuth`.
//! The admin password is only ever held as an Argon2 hash in memory; session
//! tokens are HS256 JWTs with a configurable lifetime.

use anyhow::anyhow;
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use pp_config::{Settings, TokenPolicy};
use pp_core::traits::AdminAuth;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use uuid::Uuid;

const SUBJECT: &str = "admin";

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    jti: String,
    iat: i64,
    exp: i64,
}

pub struct JwtAdminAuth {
    /// PHC string of the current admin password
    password_hash: RwLock<String>,
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: Duration,
    policy: TokenPolicy,
}

impl JwtAdminAuth {
    pub fn new(
        admin_password: &SecretString,
        jwt_secret: &SecretString,
        ttl: Duration,
        policy: TokenPolicy,
    ) -> anyhow::Result<Self> {
        let secret = jwt_secret.expose_secret().as_bytes();
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_required_spec_claims(&["exp", "sub"]);
        validation.sub = Some(SUBJECT.to_string());

        Ok(Self {
            password_hash: RwLock::new(hash_password(admin_password.expose_secret())?),
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
            ttl,
            policy,
        })
    }

    pub fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        Self::new(
            &settings.admin_password,
            &settings.jwt_secret,
            Duration::hours(settings.token_ttl_hours),
            settings.token_policy,
        )
    }

    fn issue_token_at(&self, now: DateTime<Utc>) -> anyhow::Result<String> {
        let claims = Claims {
            sub: SUBJECT.to_string(),
            jti: Uuid::new_v4().to_string(),
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };
        Ok(encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)?)
    }
}

/// Hashes with a fresh random salt and returns the PHC string.
fn hash_password(password: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| anyhow!("password hashing failed: {e}"))
}

#[async_trait]
impl AdminAuth for JwtAdminAuth {
    /// Verifies a login attempt against the stored Argon2 hash.
    async fn verify_password(&self, password: &str) -> bool {
        let hash = self.password_hash.read().await;
        let parsed_hash = match PasswordHash::new(&hash) {
            Ok(p) => p,
            Err(_) => return false,
        };
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok()
    }

    async fn change_password(&self, new_password: &str) -> anyhow::Result<()> {
        let hash = hash_password(new_password)?;
        *self.password_hash.write().await = hash;
        log::info!("admin password replaced");
        Ok(())
    }

    fn issue_token(&self) -> anyhow::Result<String> {
        self.issue_token_at(Utc::now())
    }

    fn verify_token(&self, token: &str) -> bool {
        match self.policy {
            TokenPolicy::Lenient => !token.trim().is_empty(),
            TokenPolicy::Strict => decode::<Claims>(token, &self.decoding, &self.validation).is_ok(),
        }
    }
}
