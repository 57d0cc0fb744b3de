use std::collections::HashSet;

use chrono::Utc;
use randrecs::{
    config::Settings,
    error::{ApiError, is_retryable_status},
    management::TokenManager,
    spotify::auth::{authorize_url, into_token},
    types::{Album, Artist, SavedAlbum, Token, TokenResponse},
    utils::*,
};

fn create_test_album(id: &str, artist_ids: &[&str]) -> SavedAlbum {
    SavedAlbum {
        added_at: "2024-01-01T00:00:00Z".to_string(),
        album: Album {
            id: id.to_string(),
            name: format!("Album {}", id),
            release_date: "2023-06-15".to_string(),
            artists: artist_ids
                .iter()
                .map(|a| Artist {
                    id: a.to_string(),
                    name: format!("Artist {}", a),
                })
                .collect(),
        },
    }
}

fn create_test_token(obtained_at: u64, expires_in: u64) -> Token {
    Token {
        access_token: "access".to_string(),
        refresh_token: "refresh".to_string(),
        scope: String::new(),
        expires_in,
        obtained_at,
    }
}

fn test_settings() -> Settings {
    Settings::from_lookup(|key| match key {
        "SPOTIFY_API_AUTH_CLIENT_ID" => Some("client-123".to_string()),
        "SPOTIFY_API_REDIRECT_URI" => Some("http://127.0.0.1:9001/authorize".to_string()),
        _ => None,
    })
    .unwrap()
}

#[test]
fn test_generate_code_verifier() {
    let verifier = generate_code_verifier();

    // Should be exactly 128 characters
    assert_eq!(verifier.len(), 128);

    // Should contain only alphanumeric characters
    assert!(verifier.chars().all(|c| c.is_ascii_alphanumeric()));

    let verifier2 = generate_code_verifier();
    assert_ne!(verifier, verifier2);
}

#[test]
fn test_generate_code_challenge() {
    let verifier = "test_verifier_123";
    let challenge = generate_code_challenge(verifier);

    assert!(!challenge.is_empty());
    assert_eq!(challenge, generate_code_challenge(verifier));
    assert_ne!(challenge, generate_code_challenge("different_verifier"));

    // SHA-256 digest, base64url without padding
    assert_eq!(challenge.len(), 43);
    assert!(
        challenge
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    );
}

#[test]
fn test_generate_code_challenge_known_vector() {
    // RFC 7636, appendix B
    let challenge = generate_code_challenge("dBjftJeZ4CVP-mB92K27uhbUJU1p1r_wW1gFWFOEjXk");
    assert_eq!(challenge, "E9Melhoa2OwvFrEMTJguCHaoeK1t8URWbuGJSstw-cM");
}

#[test]
fn test_generate_state() {
    let state = generate_state();

    assert_eq!(state.len(), 32);
    assert!(state.chars().all(|c| c.is_ascii_alphanumeric()));
    assert_ne!(state, generate_state());
}

#[test]
fn test_parse_flag_accepts_boolean_spellings() {
    for value in ["1", "t", "T", "TRUE", "true", "True"] {
        assert_eq!(parse_flag(value), Ok(true), "{}", value);
    }
    for value in ["0", "f", "F", "FALSE", "false", "False"] {
        assert_eq!(parse_flag(value), Ok(false), "{}", value);
    }
}

#[test]
fn test_parse_flag_rejects_everything_else() {
    for value in ["", "yes", "no", "tRUE", "2", " true"] {
        assert!(parse_flag(value).is_err(), "{:?} should be rejected", value);
    }
}

#[test]
fn test_library_artist_ids() {
    let albums = vec![
        create_test_album("a1", &["x", "y"]),
        create_test_album("a2", &["y", "z"]),
        create_test_album("a3", &[]),
    ];

    let ids = library_artist_ids(&albums);

    let expected: HashSet<String> = ["x", "y", "z"].iter().map(|s| s.to_string()).collect();
    assert_eq!(ids, expected);
    assert!(library_artist_ids(&[]).is_empty());
}

#[test]
fn test_dedup_by_key_keeps_first_occurrence() {
    let items = vec![("a", 1), ("b", 2), ("a", 3), ("c", 4), ("b", 5)];

    let deduped = dedup_by_key(&items, |item| item.0);

    assert_eq!(deduped, vec![("a", 1), ("b", 2), ("c", 4)]);
}

#[test]
fn test_authorize_url_carries_pkce_parameters() {
    let settings = test_settings();

    let url = authorize_url(&settings, "challenge-abc", "state-xyz").unwrap();

    assert_eq!(url.host_str(), Some("accounts.spotify.com"));
    assert_eq!(url.path(), "/authorize");
    let params: std::collections::HashMap<String, String> = url.query_pairs().into_owned().collect();
    assert_eq!(params["client_id"], "client-123");
    assert_eq!(params["response_type"], "code");
    assert_eq!(params["redirect_uri"], "http://127.0.0.1:9001/authorize");
    assert_eq!(params["code_challenge_method"], "S256");
    assert_eq!(params["code_challenge"], "challenge-abc");
    assert_eq!(params["state"], "state-xyz");
    assert_eq!(params["scope"], settings.scope);
}

#[test]
fn test_token_expiry_includes_margin() {
    let now = Utc::now().timestamp() as u64;

    assert!(!TokenManager::new(create_test_token(now, 3600)).is_expired());
    // expires in 100 seconds, inside the refresh margin
    assert!(TokenManager::new(create_test_token(now - 3500, 3600)).is_expired());
    assert!(TokenManager::new(create_test_token(now - 7200, 3600)).is_expired());
}

#[tokio::test]
async fn test_expired_token_without_refresh_token_is_unauthorized() {
    let mut token = create_test_token(0, 3600);
    token.refresh_token = String::new();
    let mut manager = TokenManager::new(token);

    let result = manager.ensure_fresh(&test_settings()).await;

    assert!(matches!(result, Err(ApiError::Unauthorized(_))));
}

#[tokio::test]
async fn test_fresh_token_is_not_refreshed() {
    let now = Utc::now().timestamp() as u64;
    let mut manager = TokenManager::new(create_test_token(now, 3600));

    let refreshed = manager.ensure_fresh(&test_settings()).await.unwrap();

    assert!(!refreshed);
    assert_eq!(manager.current_token().access_token, "access");
}

#[test]
fn test_into_token_keeps_previous_refresh_token() {
    let response = TokenResponse {
        access_token: "new-access".to_string(),
        refresh_token: None,
        scope: Some("user-library-read".to_string()),
        expires_in: Some(1800),
    };

    let token = into_token(response, Some("old-refresh"));

    assert_eq!(token.access_token, "new-access");
    assert_eq!(token.refresh_token, "old-refresh");
    assert_eq!(token.scope, "user-library-read");
    assert_eq!(token.expires_in, 1800);
}

#[test]
fn test_into_token_prefers_new_refresh_token() {
    let response = TokenResponse {
        access_token: "new-access".to_string(),
        refresh_token: Some("new-refresh".to_string()),
        scope: None,
        expires_in: None,
    };

    let token = into_token(response, Some("old-refresh"));

    assert_eq!(token.refresh_token, "new-refresh");
    assert_eq!(token.expires_in, 3600);
    assert!(token.obtained_at > 0);
}

#[test]
fn test_retryable_errors() {
    assert!(ApiError::Timeout.is_retryable());
    assert!(ApiError::RateLimited { retry_after: 2 }.is_retryable());
    for status in [502, 503, 504] {
        let err = ApiError::Status {
            status,
            message: String::new(),
        };
        assert!(err.is_retryable(), "{}", status);
    }
    assert!(!ApiError::Unauthorized("expired".to_string()).is_retryable());
    for status in [400, 404, 500] {
        let err = ApiError::Status {
            status,
            message: String::new(),
        };
        assert!(!err.is_retryable(), "{}", status);
        assert!(!is_retryable_status(status));
    }
}
