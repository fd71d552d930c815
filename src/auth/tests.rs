//! Tests for auth module
//!
//! These tests verify the token subsystem:
//! - Access token generation and claim validation
//! - Refresh token encode/decode round-trip
//! - Caller-claims verification against a target identity

#[cfg(test)]
mod tests {
    use super::super::*;
    use crate::auth::extractors::CallerClaims;
    use crate::auth::tokens::{JwtConfig, TokenError, TokenService};
    use chrono::{Duration, Utc};

    fn test_config() -> JwtConfig {
        JwtConfig {
            secret: "test_secret_key".to_string(),
            issuer: "account-api".to_string(),
            audience: "account-api-clients".to_string(),
            access_ttl_minutes: 15,
            refresh_ttl_days: 7,
        }
    }

    fn service() -> TokenService {
        TokenService::new(test_config())
    }

    fn caller(token_id: Option<&str>, user_id: &str, email: &str) -> CallerClaims {
        CallerClaims {
            token_id: token_id.map(|t| t.to_string()),
            user_id: user_id.to_string(),
            email: email.to_string(),
        }
    }

    #[test]
    fn test_access_token_claims_and_expiry() {
        let tokens = service();
        let issued_at = Utc::now();

        let token = tokens
            .generate_access_token("U_ABC123", "test@example.com", issued_at, "tok-1")
            .unwrap();
        let claims = tokens.decode_access_token(&token).unwrap();

        assert_eq!(claims.sub, "U_ABC123");
        assert_eq!(claims.email, "test@example.com");
        assert_eq!(claims.jti.as_deref(), Some("tok-1"));
        // TTL=15min: expiry lands exactly at issued_at + 15 minutes
        let expected = (issued_at + Duration::minutes(15)).timestamp() as usize;
        assert_eq!(claims.exp, expected);
    }

    #[test]
    fn test_access_token_rejected_with_wrong_secret() {
        let tokens = service();
        let token = tokens
            .generate_access_token("U_ABC123", "test@example.com", Utc::now(), "tok-1")
            .unwrap();

        let mut other_config = test_config();
        other_config.secret = "wrong_secret_key".to_string();
        let other = TokenService::new(other_config);

        assert!(other.decode_access_token(&token).is_err());
    }

    #[test]
    fn test_access_token_rejected_with_wrong_issuer() {
        let tokens = service();
        let token = tokens
            .generate_access_token("U_ABC123", "test@example.com", Utc::now(), "tok-1")
            .unwrap();

        let mut other_config = test_config();
        other_config.issuer = "someone-else".to_string();
        let other = TokenService::new(other_config);

        assert!(other.decode_access_token(&token).is_err());
    }

    #[test]
    fn test_refresh_token_round_trip() {
        let tokens = service();
        let issued_at = Utc::now();

        let opaque = tokens
            .generate_refresh_token("U_ABC123", "test@example.com", issued_at)
            .unwrap();
        let payload = tokens.decode_refresh_token(&opaque).unwrap();
        let again = tokens.decode_refresh_token(&opaque).unwrap();

        // Decode is the exact inverse of encode
        assert_eq!(payload, again);
        assert!(!payload.token_id.is_empty());
        // Refresh TTL=7 days
        assert_eq!(
            payload.expires_at.timestamp(),
            (issued_at + Duration::days(7)).timestamp()
        );
    }

    #[test]
    fn test_refresh_tokens_are_unique() {
        let tokens = service();
        let now = Utc::now();

        let a = tokens
            .generate_refresh_token("U_ABC123", "test@example.com", now)
            .unwrap();
        let b = tokens
            .generate_refresh_token("U_ABC123", "test@example.com", now)
            .unwrap();

        let pa = tokens.decode_refresh_token(&a).unwrap();
        let pb = tokens.decode_refresh_token(&b).unwrap();
        assert_ne!(pa.token_id, pb.token_id);
    }

    #[test]
    fn test_decode_refresh_token_malformed_base64() {
        let tokens = service();
        let result = tokens.decode_refresh_token("not base64!!!");
        assert!(matches!(result, Err(TokenError::Malformed(_))));
    }

    #[test]
    fn test_decode_refresh_token_invalid_payload() {
        use base64::engine::general_purpose::STANDARD as BASE64;
        use base64::Engine;

        let tokens = service();
        let garbage = BASE64.encode(b"this is not json");
        let result = tokens.decode_refresh_token(&garbage);
        assert!(matches!(result, Err(TokenError::InvalidPayload(_))));
    }

    #[test]
    fn test_verify_caller_claims_match() {
        let tokens = service();
        let refresh = tokens
            .generate_refresh_token("U_ABC123", "test@example.com", Utc::now())
            .unwrap();
        let token_id = tokens.decode_refresh_token(&refresh).unwrap().token_id;

        let caller = caller(Some(&token_id), "U_ABC123", "test@example.com");
        assert!(tokens
            .verify_caller_claims(&caller, "U_ABC123", "test@example.com", &refresh)
            .unwrap());
    }

    #[test]
    fn test_verify_caller_claims_email_case_insensitive() {
        let tokens = service();
        let refresh = tokens
            .generate_refresh_token("U_ABC123", "Test@Example.com", Utc::now())
            .unwrap();
        let token_id = tokens.decode_refresh_token(&refresh).unwrap().token_id;

        let caller = caller(Some(&token_id), "U_ABC123", "TEST@EXAMPLE.COM");
        assert!(tokens
            .verify_caller_claims(&caller, "U_ABC123", "test@example.com", &refresh)
            .unwrap());
    }

    #[test]
    fn test_verify_caller_claims_wrong_user() {
        let tokens = service();
        let refresh = tokens
            .generate_refresh_token("U_ABC123", "test@example.com", Utc::now())
            .unwrap();
        let token_id = tokens.decode_refresh_token(&refresh).unwrap().token_id;

        let caller = caller(Some(&token_id), "U_OTHER1", "test@example.com");
        assert!(!tokens
            .verify_caller_claims(&caller, "U_ABC123", "test@example.com", &refresh)
            .unwrap());
    }

    #[test]
    fn test_verify_caller_claims_stale_token_id() {
        // A bearer token minted before the last refresh carries the old
        // generation's token ID and must fail verification.
        let tokens = service();
        let refresh = tokens
            .generate_refresh_token("U_ABC123", "test@example.com", Utc::now())
            .unwrap();

        let caller = caller(Some("stale-token-id"), "U_ABC123", "test@example.com");
        assert!(!tokens
            .verify_caller_claims(&caller, "U_ABC123", "test@example.com", &refresh)
            .unwrap());
    }

    #[test]
    fn test_verify_caller_claims_missing_token_id() {
        let tokens = service();
        let refresh = tokens
            .generate_refresh_token("U_ABC123", "test@example.com", Utc::now())
            .unwrap();

        let caller = caller(None, "U_ABC123", "test@example.com");
        assert!(!tokens
            .verify_caller_claims(&caller, "U_ABC123", "test@example.com", &refresh)
            .unwrap());
    }

    #[test]
    fn test_verify_caller_claims_malformed_refresh_token_errors() {
        let tokens = service();
        let caller = caller(Some("tok"), "U_ABC123", "test@example.com");
        let result =
            tokens.verify_caller_claims(&caller, "U_ABC123", "test@example.com", "garbage!!!");
        assert!(result.is_err());
    }
}
