//! Bearer credentials and password digests.
//!
//! Tokens are HMAC-SHA-256 signed JSON claims, hex encoded as
//! `payload.signature`. Passwords are stored as salted iterated
//! HMAC-SHA-256 digests in `iterations$salt$digest` form. Both verify
//! through the mac primitive so comparisons stay constant time.

use chrono::{DateTime, Duration, Utc};
use hmac::{Hmac, Mac};
use rand::RngCore;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use thiserror::Error;

use crate::domain::user::{Perfil, User};

type HmacSha256 = Hmac<Sha256>;

const PASSWORD_ITERATIONS: u32 = 50_000;
const SALT_LEN: usize = 16;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("malformed token")]
    Malformed,
    #[error("token signature mismatch")]
    BadSignature,
    #[error("token expired")]
    Expired,
}

/// Claims carried by a bearer token.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub id: String,
    pub nome: String,
    pub login: String,
    pub perfil: Perfil,
    /// Expiry as unix seconds.
    pub exp: i64,
}

impl Claims {
    pub fn is_admin(&self) -> bool {
        self.perfil == Perfil::Admin
    }
}

#[derive(Clone)]
pub struct TokenService {
    secret: SecretString,
}

impl TokenService {
    pub fn new(secret: SecretString) -> Self {
        Self { secret }
    }

    pub fn issue(&self, user: &User, ttl_hours: u64, now: DateTime<Utc>) -> String {
        let claims = Claims {
            id: user.id.0.clone(),
            nome: user.nome.clone(),
            login: user.login.clone(),
            perfil: user.perfil,
            exp: (now + Duration::hours(ttl_hours as i64)).timestamp(),
        };
        // Claims serialize infallibly: plain strings and an integer.
        let payload = serde_json::to_vec(&claims).unwrap_or_default();
        let signature = self.sign(&payload);
        format!("{}.{}", encode_hex(&payload), encode_hex(&signature))
    }

    pub fn verify(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, AuthError> {
        let (payload_hex, signature_hex) = token.split_once('.').ok_or(AuthError::Malformed)?;
        let payload = decode_hex(payload_hex).ok_or(AuthError::Malformed)?;
        let signature = decode_hex(signature_hex).ok_or(AuthError::Malformed)?;

        let mut mac = mac_for(self.secret.expose_secret().as_bytes());
        mac.update(&payload);
        mac.verify_slice(&signature).map_err(|_| AuthError::BadSignature)?;

        let claims: Claims =
            serde_json::from_slice(&payload).map_err(|_| AuthError::Malformed)?;
        if claims.exp <= now.timestamp() {
            return Err(AuthError::Expired);
        }
        Ok(claims)
    }

    fn sign(&self, payload: &[u8]) -> Vec<u8> {
        let mut mac = mac_for(self.secret.expose_secret().as_bytes());
        mac.update(payload);
        mac.finalize().into_bytes().to_vec()
    }
}

/// Salted iterated digest for password storage.
pub fn hash_password(password: &str) -> String {
    let mut salt = [0u8; SALT_LEN];
    rand::thread_rng().fill_bytes(&mut salt);
    let digest = derive(password, &salt, PASSWORD_ITERATIONS);
    format!("{PASSWORD_ITERATIONS}${}${}", encode_hex(&salt), encode_hex(&digest))
}

/// Constant-time check of a candidate password against a stored digest.
/// Unparseable stored values simply fail the check.
pub fn verify_password(password: &str, stored: &str) -> bool {
    let mut parts = stored.splitn(3, '$');
    let (Some(iterations), Some(salt_hex), Some(digest_hex)) =
        (parts.next(), parts.next(), parts.next())
    else {
        return false;
    };
    let Ok(iterations) = iterations.parse::<u32>() else {
        return false;
    };
    let (Some(salt), Some(expected)) = (decode_hex(salt_hex), decode_hex(digest_hex)) else {
        return false;
    };

    let mut mac = mac_for(&derive(password, &salt, iterations));
    mac.update(b"orcapro.password.v1");
    let candidate = mac.finalize().into_bytes();

    let mut mac = mac_for(&expected);
    mac.update(b"orcapro.password.v1");
    mac.verify_slice(&candidate).is_ok()
}

fn derive(password: &str, salt: &[u8], iterations: u32) -> Vec<u8> {
    let mut block = {
        let mut mac = mac_for(password.as_bytes());
        mac.update(salt);
        mac.finalize().into_bytes()
    };
    for _ in 1..iterations {
        let mut mac = mac_for(password.as_bytes());
        mac.update(&block);
        block = mac.finalize().into_bytes();
    }
    block.to_vec()
}

fn mac_for(key: &[u8]) -> HmacSha256 {
    HmacSha256::new_from_slice(key).expect("HMAC accepts keys of any length")
}

fn encode_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|byte| format!("{byte:02x}")).collect()
}

fn decode_hex(text: &str) -> Option<Vec<u8>> {
    if text.len() % 2 != 0 {
        return None;
    }
    (0..text.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(text.get(i..i + 2)?, 16).ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};

    use crate::domain::user::{Perfil, User, UserId};

    use super::{hash_password, verify_password, AuthError, TokenService};

    fn service() -> TokenService {
        TokenService::new("unit-test-secret-material".to_string().into())
    }

    fn user() -> User {
        User {
            id: UserId("u-1".to_string()),
            nome: "Camila".to_string(),
            login: "camila".to_string(),
            perfil: Perfil::Admin,
            ativo: true,
            created_date: String::new(),
        }
    }

    #[test]
    fn issued_tokens_verify_and_carry_claims() {
        let now = Utc::now();
        let token = service().issue(&user(), 12, now);
        let claims = service().verify(&token, now).expect("token should verify");

        assert_eq!(claims.login, "camila");
        assert!(claims.is_admin());
        assert_eq!(claims.exp, (now + Duration::hours(12)).timestamp());
    }

    #[test]
    fn expired_tokens_are_rejected() {
        let issued_at = Utc::now() - Duration::hours(13);
        let token = service().issue(&user(), 12, issued_at);
        assert_eq!(service().verify(&token, Utc::now()), Err(AuthError::Expired));
    }

    #[test]
    fn tampered_tokens_fail_signature_verification() {
        let now = Utc::now();
        let token = service().issue(&user(), 12, now);
        let (payload, _signature) = token.split_once('.').expect("token shape");
        let forged = format!("{payload}.{}", "ab".repeat(32));
        assert_eq!(service().verify(&forged, now), Err(AuthError::BadSignature));
    }

    #[test]
    fn tokens_signed_with_another_secret_are_rejected() {
        let now = Utc::now();
        let other = TokenService::new("a-completely-different-secret".to_string().into());
        let token = other.issue(&user(), 12, now);
        assert_eq!(service().verify(&token, now), Err(AuthError::BadSignature));
    }

    #[test]
    fn garbage_tokens_are_malformed() {
        assert_eq!(service().verify("not-a-token", Utc::now()), Err(AuthError::Malformed));
        assert_eq!(service().verify("zz.zz", Utc::now()), Err(AuthError::Malformed));
    }

    #[test]
    fn password_digests_verify_and_are_salted() {
        let first = hash_password("s3nh4-forte");
        let second = hash_password("s3nh4-forte");

        assert_ne!(first, second);
        assert!(verify_password("s3nh4-forte", &first));
        assert!(verify_password("s3nh4-forte", &second));
        assert!(!verify_password("senha-errada", &first));
    }

    #[test]
    fn malformed_stored_digests_never_verify() {
        assert!(!verify_password("qualquer", "not-a-digest"));
        assert!(!verify_password("qualquer", "abc$zz$zz"));
    }
}
