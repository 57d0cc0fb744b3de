use std::{collections::HashMap, path::PathBuf, time::Duration};

use randrecs::{
    config::{
        DEFAULT_API_URL, DEFAULT_PLAYLIST_NAME, DEFAULT_SCOPE, DEFAULT_SERVER_ADDRESS, Settings,
    },
    error::ConfigError,
};

fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| map.get(key).cloned()
}

const REQUIRED: [(&str, &str); 2] = [
    ("SPOTIFY_API_AUTH_CLIENT_ID", "client-123"),
    ("SPOTIFY_API_REDIRECT_URI", "http://127.0.0.1:9001/authorize"),
];

#[test]
fn test_defaults_apply_when_only_required_values_are_set() {
    let settings = Settings::from_lookup(lookup(&REQUIRED)).unwrap();

    assert_eq!(settings.client_id, "client-123");
    assert_eq!(settings.redirect_uri, "http://127.0.0.1:9001/authorize");
    assert_eq!(settings.scope, DEFAULT_SCOPE);
    assert_eq!(settings.api_url, DEFAULT_API_URL);
    assert_eq!(settings.server_addr, DEFAULT_SERVER_ADDRESS);
    assert_eq!(settings.playlist_name, DEFAULT_PLAYLIST_NAME);
    assert_eq!(settings.template_dir, PathBuf::from("./templates"));
    assert_eq!(settings.request_timeout, Duration::from_secs(30));
    assert_eq!(settings.max_retries, 3);
    assert!(settings.cache_path.ends_with("cache.json"));
}

#[test]
fn test_missing_client_id_is_reported() {
    let result = Settings::from_lookup(lookup(&[REQUIRED[1]]));

    assert!(matches!(
        result,
        Err(ConfigError::Missing("SPOTIFY_API_AUTH_CLIENT_ID"))
    ));
}

#[test]
fn test_blank_redirect_uri_counts_as_missing() {
    let result = Settings::from_lookup(lookup(&[REQUIRED[0], ("SPOTIFY_API_REDIRECT_URI", "  ")]));

    assert!(matches!(
        result,
        Err(ConfigError::Missing("SPOTIFY_API_REDIRECT_URI"))
    ));
}

#[test]
fn test_overrides_are_used() {
    let mut vars = REQUIRED.to_vec();
    vars.extend([
        ("SERVER_ADDRESS", "0.0.0.0:8080"),
        ("CACHE_PATH", "/tmp/randrecs/cache.json"),
        ("PLAYLIST_NAME", "Fresh Finds"),
        ("REQUEST_TIMEOUT_SECS", "5"),
        ("MAX_RETRIES", "0"),
        ("SPOTIFY_API_URL", "http://localhost:3000/v1/"),
    ]);

    let settings = Settings::from_lookup(lookup(&vars)).unwrap();

    assert_eq!(settings.server_addr, "0.0.0.0:8080");
    assert_eq!(settings.cache_path, PathBuf::from("/tmp/randrecs/cache.json"));
    assert_eq!(settings.playlist_name, "Fresh Finds");
    assert_eq!(settings.request_timeout, Duration::from_secs(5));
    assert_eq!(settings.max_retries, 0);
    assert_eq!(settings.api_url, "http://localhost:3000/v1");
}

#[test]
fn test_zero_timeout_is_invalid() {
    let mut vars = REQUIRED.to_vec();
    vars.push(("REQUEST_TIMEOUT_SECS", "0"));

    let result = Settings::from_lookup(lookup(&vars));

    assert!(matches!(
        result,
        Err(ConfigError::Invalid {
            key: "REQUEST_TIMEOUT_SECS",
            ..
        })
    ));
}

#[test]
fn test_non_numeric_retries_are_invalid() {
    let mut vars = REQUIRED.to_vec();
    vars.push(("MAX_RETRIES", "many"));

    let result = Settings::from_lookup(lookup(&vars));

    match result {
        Err(ConfigError::Invalid { key, value }) => {
            assert_eq!(key, "MAX_RETRIES");
            assert_eq!(value, "many");
        }
        other => panic!("expected invalid value, got {:?}", other),
    }
}

#[test]
fn test_retries_beyond_u32_are_invalid() {
    let mut vars = REQUIRED.to_vec();
    vars.push(("MAX_RETRIES", "4294967296"));

    let result = Settings::from_lookup(lookup(&vars));

    assert!(matches!(
        result,
        Err(ConfigError::Invalid {
            key: "MAX_RETRIES",
            ..
        })
    ));
}
