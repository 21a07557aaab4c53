use std::collections::HashMap;
use std::env::VarError;

use super::*;

fn lookup_from_map<'a>(
    map: &'a HashMap<&'a str, &'a str>,
) -> impl Fn(&str) -> Result<String, VarError> + 'a {
    move |key| {
        map.get(key)
            .map(|v| (*v).to_string())
            .ok_or(VarError::NotPresent)
    }
}

/// Returns a map with both dashboard URLs populated.
fn full_env<'a>() -> HashMap<&'a str, &'a str> {
    let mut m = HashMap::new();
    m.insert("VOLTIQ_API_ENDPOINT", "https://analytics.example.com/prod");
    m.insert("VOLTIQ_BI_EMBED_URL", "https://bi.example.com/embed/abc");
    m
}

#[test]
fn parse_environment_development() {
    assert_eq!(
        parse_environment("development").unwrap(),
        Environment::Development
    );
}

#[test]
fn parse_environment_test() {
    assert_eq!(parse_environment("test").unwrap(), Environment::Test);
}

#[test]
fn parse_environment_production() {
    assert_eq!(
        parse_environment("production").unwrap(),
        Environment::Production
    );
}

#[test]
fn parse_environment_unknown_fails() {
    let err = parse_environment("staging").unwrap_err();
    assert!(matches!(err, ConfigError::InvalidEnvVar { ref var, .. } if var == "VOLTIQ_ENV"));
}

#[test]
fn build_app_config_succeeds_with_empty_env() {
    let map: HashMap<&str, &str> = HashMap::new();
    let cfg = build_app_config(lookup_from_map(&map)).expect("empty env is valid");
    assert!(cfg.api_endpoint.is_none());
    assert!(cfg.bi_embed_url.is_none());
    assert_eq!(
        cfg.missing_vars(),
        vec!["VOLTIQ_API_ENDPOINT", "VOLTIQ_BI_EMBED_URL"]
    );
}

#[test]
fn require_api_endpoint_fails_when_unset() {
    let map: HashMap<&str, &str> = HashMap::new();
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    let result = cfg.require_api_endpoint();
    assert!(
        matches!(result, Err(ConfigError::MissingEnvVar(ref v)) if v == "VOLTIQ_API_ENDPOINT"),
        "expected MissingEnvVar(VOLTIQ_API_ENDPOINT), got: {result:?}"
    );
}

#[test]
fn require_bi_embed_url_fails_when_unset() {
    let mut map: HashMap<&str, &str> = HashMap::new();
    map.insert("VOLTIQ_API_ENDPOINT", "https://analytics.example.com");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert!(cfg.require_api_endpoint().is_ok());
    let result = cfg.require_bi_embed_url();
    assert!(
        matches!(result, Err(ConfigError::MissingEnvVar(ref v)) if v == "VOLTIQ_BI_EMBED_URL"),
        "expected MissingEnvVar(VOLTIQ_BI_EMBED_URL), got: {result:?}"
    );
}

#[test]
fn blank_endpoint_is_treated_as_unset() {
    let mut map = full_env();
    map.insert("VOLTIQ_API_ENDPOINT", "   ");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert!(cfg.api_endpoint.is_none());
    assert_eq!(cfg.missing_vars(), vec!["VOLTIQ_API_ENDPOINT"]);
}

#[test]
fn build_app_config_succeeds_with_all_vars() {
    let map = full_env();
    let result = build_app_config(lookup_from_map(&map));
    assert!(result.is_ok(), "expected Ok, got: {result:?}");
    let cfg = result.unwrap();
    assert_eq!(cfg.env, Environment::Development);
    assert_eq!(
        cfg.require_api_endpoint().unwrap(),
        "https://analytics.example.com/prod"
    );
    assert_eq!(
        cfg.require_bi_embed_url().unwrap(),
        "https://bi.example.com/embed/abc"
    );
    assert_eq!(cfg.log_level, "info");
    assert_eq!(cfg.request_timeout_secs, 30);
    assert_eq!(cfg.user_agent, "voltiq/0.1 (service-analytics)");
    assert_eq!(cfg.max_retries, 0);
    assert_eq!(cfg.retry_backoff_base_ms, 1000);
    assert_eq!(cfg.cluster_count, 3);
    assert!(cfg.missing_vars().is_empty());
}

#[test]
fn request_timeout_secs_override() {
    let mut map = full_env();
    map.insert("VOLTIQ_REQUEST_TIMEOUT_SECS", "60");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.request_timeout_secs, 60);
}

#[test]
fn request_timeout_secs_invalid() {
    let mut map = full_env();
    map.insert("VOLTIQ_REQUEST_TIMEOUT_SECS", "not-a-number");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(
            result,
            Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "VOLTIQ_REQUEST_TIMEOUT_SECS"
        ),
        "expected InvalidEnvVar(VOLTIQ_REQUEST_TIMEOUT_SECS), got: {result:?}"
    );
}

#[test]
fn max_retries_override() {
    let mut map = full_env();
    map.insert("VOLTIQ_MAX_RETRIES", "2");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.max_retries, 2);
}

#[test]
fn max_retries_invalid() {
    let mut map = full_env();
    map.insert("VOLTIQ_MAX_RETRIES", "-1");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(
            result,
            Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "VOLTIQ_MAX_RETRIES"
        ),
        "expected InvalidEnvVar(VOLTIQ_MAX_RETRIES), got: {result:?}"
    );
}

#[test]
fn user_agent_override() {
    let mut map = full_env();
    map.insert("VOLTIQ_USER_AGENT", "custom-agent/2.0");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.user_agent, "custom-agent/2.0");
}

#[test]
fn cluster_count_override() {
    let mut map = full_env();
    map.insert("VOLTIQ_CLUSTER_COUNT", "4");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.cluster_count, 4);
}

#[test]
fn cluster_count_zero_is_rejected() {
    let mut map = full_env();
    map.insert("VOLTIQ_CLUSTER_COUNT", "0");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(
            result,
            Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "VOLTIQ_CLUSTER_COUNT"
        ),
        "expected InvalidEnvVar(VOLTIQ_CLUSTER_COUNT), got: {result:?}"
    );
}

#[test]
fn invalid_env_is_rejected() {
    let mut map = full_env();
    map.insert("VOLTIQ_ENV", "qa");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(
            result,
            Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "VOLTIQ_ENV"
        ),
        "expected InvalidEnvVar(VOLTIQ_ENV), got: {result:?}"
    );
}
