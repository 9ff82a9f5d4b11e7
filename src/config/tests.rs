use super::*;
use serial_test::serial;
use std::env;

fn with_env_vars<F, R>(vars: &[(&str, &str)], f: F) -> R
where
    F: FnOnce() -> R,
{
    // SAFETY: Test code only, we accept the thread-safety risk in tests.
    for (key, value) in vars {
        unsafe { env::set_var(key, value) };
    }

    let result = f();

    // SAFETY: Test code only, we accept the thread-safety risk in tests.
    for (key, _) in vars {
        unsafe { env::remove_var(key) };
    }

    result
}

fn clear_facematch_env() {
    // SAFETY: Test code only, we accept the thread-safety risk in tests.
    unsafe {
        env::remove_var("FACEMATCH_PRIMARY_MODEL");
        env::remove_var("FACEMATCH_FALLBACK_MODEL");
        env::remove_var("FACEMATCH_RETRY_BACKOFF_MS");
        env::remove_var("FACEMATCH_HIGH_CONFIDENCE");
        env::remove_var("FACEMATCH_MINIMUM_CONFIDENCE");
        env::remove_var("FACEMATCH_SCORE_MARGIN");
    }
}

#[test]
fn test_default_config() {
    let config = Config::default();

    assert_eq!(config.primary_model, "gemini-2.0-flash");
    assert_eq!(config.fallback_model, "gemini-2.0-flash-lite");
    assert_eq!(config.retry_backoff_ms, 300);
    assert_eq!(config.thresholds.high_confidence, 95.0);
    assert_eq!(config.thresholds.minimum_confidence, 75.0);
    assert_eq!(config.thresholds.minimum_margin, 3.0);
    assert!(config.validate().is_ok());
}

#[test]
#[serial]
fn test_from_env_with_defaults() {
    clear_facematch_env();

    let config = Config::from_env().unwrap();
    assert_eq!(config, Config::default());
}

#[test]
#[serial]
fn test_from_env_with_overrides() {
    clear_facematch_env();

    let config = with_env_vars(
        &[
            ("FACEMATCH_PRIMARY_MODEL", "gemini-2.5-pro"),
            ("FACEMATCH_FALLBACK_MODEL", "gemini-2.5-flash"),
            ("FACEMATCH_RETRY_BACKOFF_MS", "500"),
            ("FACEMATCH_HIGH_CONFIDENCE", "97.5"),
            ("FACEMATCH_MINIMUM_CONFIDENCE", "80"),
            ("FACEMATCH_SCORE_MARGIN", "5"),
        ],
        || Config::from_env().unwrap(),
    );

    assert_eq!(config.primary_model, "gemini-2.5-pro");
    assert_eq!(config.fallback_model, "gemini-2.5-flash");
    assert_eq!(config.retry_backoff_ms, 500);
    assert_eq!(config.thresholds.high_confidence, 97.5);
    assert_eq!(config.thresholds.minimum_confidence, 80.0);
    assert_eq!(config.thresholds.minimum_margin, 5.0);
    assert_eq!(config.retry_backoff(), std::time::Duration::from_millis(500));
}

#[test]
#[serial]
fn test_from_env_rejects_bad_backoff() {
    clear_facematch_env();

    let result = with_env_vars(&[("FACEMATCH_RETRY_BACKOFF_MS", "soon")], Config::from_env);

    assert!(matches!(
        result,
        Err(ConfigError::IntParseError { name, .. }) if name == "FACEMATCH_RETRY_BACKOFF_MS"
    ));
}

#[test]
#[serial]
fn test_from_env_rejects_bad_threshold() {
    clear_facematch_env();

    let result = with_env_vars(&[("FACEMATCH_HIGH_CONFIDENCE", "very high")], Config::from_env);

    assert!(matches!(
        result,
        Err(ConfigError::FloatParseError { name, .. }) if name == "FACEMATCH_HIGH_CONFIDENCE"
    ));
}

#[test]
#[serial]
fn test_from_env_rejects_empty_model() {
    clear_facematch_env();

    let result = with_env_vars(&[("FACEMATCH_PRIMARY_MODEL", "  ")], Config::from_env);

    assert!(matches!(
        result,
        Err(ConfigError::EmptyValue { name }) if name == "FACEMATCH_PRIMARY_MODEL"
    ));
}

#[test]
fn test_validate_rejects_inconsistent_thresholds() {
    let config = Config {
        thresholds: crate::constants::MatchThresholds::new(80.0, 90.0, 3.0),
        ..Default::default()
    };

    assert!(matches!(
        config.validate(),
        Err(ConfigError::InvalidThresholds(_))
    ));
}
