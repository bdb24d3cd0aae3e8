//! Token verification and failure classification.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use jsonwebtoken::errors::ErrorKind as JwtErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};

use adminhub_core::error::AppError;

use super::claims::TokenClaims;

/// The only accepted header algorithm.
const SUPPORTED_ALG: &str = "HS256";

/// HMAC-SHA256 digest length.
const SIGNATURE_BYTES: usize = 32;

/// Verifies tokens and classifies every failure.
#[derive(Clone)]
pub struct JwtDecoder {
    /// HMAC secret key for verification.
    decoding_key: DecodingKey,
    /// Validation configuration.
    validation: Validation,
}

impl std::fmt::Debug for JwtDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtDecoder")
            .field("leeway", &self.validation.leeway)
            .finish()
    }
}

impl JwtDecoder {
    /// Creates a new decoder from the shared secret.
    pub fn new(secret: &[u8], leeway_seconds: u64) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.validate_aud = false;
        validation.leeway = leeway_seconds;

        Self {
            decoding_key: DecodingKey::from_secret(secret),
            validation,
        }
    }

    /// Verifies structure, algorithm, signature and expiry, in that order.
    ///
    /// A signature segment that is not a canonical 32-byte digest counts as
    /// tampering, so altering any signature character always yields
    /// `TokenSignatureInvalid`.
    pub fn verify(&self, token: &str) -> Result<TokenClaims, AppError> {
        let segments: Vec<&str> = token.split('.').collect();
        if segments.len() != 3 || segments.iter().any(|s| s.is_empty()) {
            return Err(AppError::token_malformed(
                "Token must have three non-empty segments",
            ));
        }

        check_header(segments[0])?;

        match URL_SAFE_NO_PAD.decode(segments[2]) {
            Ok(sig) if sig.len() == SIGNATURE_BYTES => {}
            _ => {
                return Err(AppError::token_signature_invalid(
                    "Invalid token signature",
                ));
            }
        }

        let token_data = decode::<TokenClaims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| match e.kind() {
                JwtErrorKind::ExpiredSignature => AppError::token_expired("Token has expired"),
                JwtErrorKind::InvalidSignature => {
                    AppError::token_signature_invalid("Invalid token signature")
                }
                JwtErrorKind::InvalidAlgorithm | JwtErrorKind::InvalidAlgorithmName => {
                    AppError::token_unsupported("Unsupported token algorithm")
                }
                _ => AppError::token_malformed(format!("Token validation failed: {e}")),
            })?;

        Ok(token_data.claims)
    }
}

/// Decodes the header segment and checks its algorithm.
fn check_header(segment: &str) -> Result<(), AppError> {
    let bytes = URL_SAFE_NO_PAD
        .decode(segment)
        .map_err(|_| AppError::token_malformed("Token header is not base64url"))?;
    let header: serde_json::Value = serde_json::from_slice(&bytes)
        .map_err(|_| AppError::token_malformed("Token header is not JSON"))?;

    match header.get("alg").and_then(|alg| alg.as_str()) {
        Some(SUPPORTED_ALG) => Ok(()),
        Some(other) => Err(AppError::token_unsupported(format!(
            "Unsupported token algorithm '{other}'"
        ))),
        None => Err(AppError::token_malformed("Token header has no algorithm")),
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use adminhub_core::error::ErrorKind;

    use super::super::TokenCodec;
    use super::*;

    const SECRET: &[u8] = b"test-secret-test-secret-test-secret!";

    fn codec() -> TokenCodec {
        TokenCodec::from_secret(SECRET, 0)
    }

    #[test]
    fn test_issue_then_verify() {
        let codec = codec();
        let (token, _) = codec
            .issue("tid-1", "alice", Duration::from_secs(60))
            .unwrap();

        let claims = codec.verify(&token).unwrap();
        assert_eq!(claims.token_id, "tid-1");
        assert_eq!(claims.principal_name, "alice");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_every_signature_char_is_tamper_evident() {
        const ALPHABET: &[u8] =
            b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-_";
        let codec = codec();
        let (token, _) = codec
            .issue("tid-2", "bob", Duration::from_secs(60))
            .unwrap();
        let sig_start = token.rfind('.').unwrap() + 1;

        for pos in sig_start..token.len() {
            let mut bytes = token.clone().into_bytes();
            let original = bytes[pos];
            let idx = ALPHABET.iter().position(|&c| c == original).unwrap();
            bytes[pos] = ALPHABET[(idx + 1) % ALPHABET.len()];
            let tampered = String::from_utf8(bytes).unwrap();

            let err = codec.verify(&tampered).unwrap_err();
            assert_eq!(err.kind, ErrorKind::TokenSignatureInvalid, "position {pos}");
        }
    }

    #[test]
    fn test_tampered_payload_fails_signature() {
        let codec = codec();
        let (token, _) = codec
            .issue("tid-3", "carol", Duration::from_secs(60))
            .unwrap();
        let parts: Vec<&str> = token.split('.').collect();
        let forged_claims = URL_SAFE_NO_PAD.encode(
            serde_json::json!({"tid": "other", "sub": "carol", "iat": 0, "exp": i64::MAX / 2})
                .to_string(),
        );
        let forged = format!("{}.{}.{}", parts[0], forged_claims, parts[2]);

        let err = codec.verify(&forged).unwrap_err();
        assert_eq!(err.kind, ErrorKind::TokenSignatureInvalid);
    }

    #[test]
    fn test_wrong_secret_fails_signature() {
        let (token, _) = codec()
            .issue("tid-4", "dave", Duration::from_secs(60))
            .unwrap();
        let other = TokenCodec::from_secret(b"another-secret-another-secret-1234", 0);

        let err = other.verify(&token).unwrap_err();
        assert_eq!(err.kind, ErrorKind::TokenSignatureInvalid);
    }

    #[test]
    fn test_malformed_inputs() {
        let codec = codec();
        for input in ["", "abc", "a.b", "a..c", "!!!.???.###"] {
            let err = codec.verify(input).unwrap_err();
            assert_eq!(err.kind, ErrorKind::TokenMalformed, "input {input:?}");
        }
    }

    #[test]
    fn test_unsupported_algorithm() {
        let codec = codec();
        let (token, _) = codec
            .issue("tid-5", "erin", Duration::from_secs(60))
            .unwrap();
        let parts: Vec<&str> = token.split('.').collect();

        for alg in ["none", "RS256", "HS512"] {
            let header =
                URL_SAFE_NO_PAD.encode(serde_json::json!({"alg": alg, "typ": "JWT"}).to_string());
            let forged = format!("{}.{}.{}", header, parts[1], parts[2]);
            let err = codec.verify(&forged).unwrap_err();
            assert_eq!(err.kind, ErrorKind::TokenUnsupportedFormat, "alg {alg}");
        }
    }

    #[tokio::test]
    async fn test_expired_token() {
        let codec = codec();
        let (token, _) = codec
            .issue("tid-6", "frank", Duration::from_secs(1))
            .unwrap();

        tokio::time::sleep(Duration::from_millis(2100)).await;

        let err = codec.verify(&token).unwrap_err();
        assert_eq!(err.kind, ErrorKind::TokenExpired);
    }
}
