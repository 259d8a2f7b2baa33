//! Identity read from a token's payload segment.
//!
//! Nothing here verifies a signature. Display only.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};

/// Claims read from an unverified JWT payload.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct UntrustedClaims {
    /// `sub`, which the backend issues as an integer user id
    #[serde(default, deserialize_with = "deserialize_subject")]
    pub sub: Option<String>,
    #[serde(default)]
    pub exp: Option<i64>,
    /// `type`, either `access` or `refresh`
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
}

/// Display-only identity of the signed-in user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserIdentity {
    /// Untrusted user id taken from the token
    pub user_id: String,
    pub expires_at: Option<DateTime<Utc>>,
}

impl UserIdentity {
    /// Derive an identity from an access token without verifying it.
    pub fn from_access_token(token: &str) -> Option<Self> {
        let claims = decode_untrusted_claims(token)?;
        Some(Self {
            user_id: claims.sub?,
            expires_at: claims
                .exp
                .and_then(|exp| DateTime::<Utc>::from_timestamp(exp, 0)),
        })
    }

    pub fn is_expired(&self) -> bool {
        self.expires_at
            .map(|exp| Utc::now() >= exp)
            .unwrap_or(false)
    }
}

/// Decode the payload segment of a JWT. No signature check.
///
/// Returns `None` unless the token has three segments and a JSON payload.
pub fn decode_untrusted_claims(token: &str) -> Option<UntrustedClaims> {
    let parts: Vec<&str> = token.split('.').collect();
    if parts.len() != 3 {
        return None;
    }
    let payload = URL_SAFE_NO_PAD.decode(parts[1].trim_end_matches('=')).ok()?;
    serde_json::from_slice(&payload).ok()
}

fn deserialize_subject<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) => Some(s),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_token(payload: &str) -> String {
        let header = URL_SAFE_NO_PAD.encode(r#"{"alg":"HS256","typ":"JWT"}"#);
        let payload = URL_SAFE_NO_PAD.encode(payload);
        let signature = URL_SAFE_NO_PAD.encode("not-checked");
        format!("{}.{}.{}", header, payload, signature)
    }

    #[test]
    fn test_numeric_subject() {
        let token = make_token(r#"{"sub":42,"exp":4102444800,"type":"access"}"#);
        let claims = decode_untrusted_claims(&token).unwrap();
        assert_eq!(claims.sub.as_deref(), Some("42"));
        assert_eq!(claims.kind.as_deref(), Some("access"));

        let identity = UserIdentity::from_access_token(&token).unwrap();
        assert_eq!(identity.user_id, "42");
        assert!(!identity.is_expired());
    }

    #[test]
    fn test_string_subject_and_past_expiry() {
        let token = make_token(r#"{"sub":"alice","exp":1}"#);
        let identity = UserIdentity::from_access_token(&token).unwrap();
        assert_eq!(identity.user_id, "alice");
        assert!(identity.is_expired());
    }

    #[test]
    fn test_missing_subject_has_no_identity() {
        let token = make_token(r#"{"exp":4102444800}"#);
        assert!(decode_untrusted_claims(&token).is_some());
        assert!(UserIdentity::from_access_token(&token).is_none());
    }

    #[test]
    fn test_malformed_tokens() {
        assert!(decode_untrusted_claims("").is_none());
        assert!(decode_untrusted_claims("opaque-token").is_none());
        assert!(decode_untrusted_claims("a.b").is_none());
        assert!(decode_untrusted_claims("a.!!!.c").is_none());
        let not_json = format!("x.{}.y", URL_SAFE_NO_PAD.encode("plain"));
        assert!(decode_untrusted_claims(&not_json).is_none());
    }
}
