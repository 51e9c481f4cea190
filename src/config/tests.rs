use std::io::Write;

use serial_test::serial;

use super::*;

const ENV_KEYS: &[&str] = &[
    "STASHLINE__LOGGING__LEVEL",
    "STASHLINE__LOGGING__JSON",
    "STASHLINE__CACHE__DEFAULT_TTL_SECONDS",
    "STASHLINE__CACHE__ENABLED",
];

fn clear_env() {
    for key in ENV_KEYS {
        // SAFETY: tests touching the environment are serialized.
        unsafe { std::env::remove_var(key) };
    }
}

fn write_config(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(".toml")
        .tempfile()
        .expect("temp config");
    file.write_all(contents.as_bytes()).expect("write config");
    file
}

#[test]
fn defaults_apply_without_sources() {
    let settings = Settings::from_raw(RawSettings::default()).expect("valid settings");

    assert_eq!(settings.logging.level, LevelFilter::INFO);
    assert_eq!(settings.logging.format, LogFormat::Compact);
    assert!(settings.cache.enabled);
    assert_eq!(settings.cache.default_ttl, Duration::from_secs(86_400));
    assert_eq!(settings.cache.consume_batch_limit.get(), 100);
    assert_eq!(settings.cache.event_queue_limit.get(), 1_024);
    assert_eq!(settings.cache, CacheSettings::default());
}

#[test]
fn namespace_ttl_falls_back_to_default() {
    let mut raw = RawSettings::default();
    raw.cache.default_ttl_seconds = Some(1234);
    raw.cache
        .namespaces
        .insert("menus".to_string(), RawNamespaceSettings::default());
    raw.cache.namespaces.insert(
        "permalinks".to_string(),
        RawNamespaceSettings {
            ttl_seconds: Some(0),
        },
    );

    let settings = Settings::from_raw(raw).expect("valid settings");

    assert_eq!(settings.cache.ttl_for("menus"), Duration::from_secs(1234));
    assert_eq!(settings.cache.ttl_for("permalinks"), Duration::ZERO);
    assert_eq!(settings.cache.ttl_for("thumbs"), Duration::from_secs(1234));
}

#[test]
fn zero_limits_are_rejected() {
    let mut raw = RawSettings::default();
    raw.cache.store_capacity = Some(0);

    match Settings::from_raw(raw) {
        Err(LoadError::Invalid { key, .. }) => assert_eq!(key, "cache.store_capacity"),
        other => panic!("expected invalid store capacity, got {other:?}"),
    }
}

#[test]
fn blank_namespace_is_rejected() {
    let mut raw = RawSettings::default();
    raw.cache
        .namespaces
        .insert("  ".to_string(), RawNamespaceSettings::default());

    assert!(matches!(
        Settings::from_raw(raw),
        Err(LoadError::Invalid { .. })
    ));
}

#[test]
fn invalid_log_level_is_rejected() {
    let mut raw = RawSettings::default();
    raw.logging.level = Some("chatty".to_string());

    match Settings::from_raw(raw) {
        Err(LoadError::Invalid { key, reason }) => {
            assert_eq!(key, "logging.level");
            assert!(reason.contains("failed to parse"));
        }
        other => panic!("expected invalid level, got {other:?}"),
    }
}

#[test]
#[serial]
fn explicit_file_is_loaded() {
    clear_env();
    let file = write_config(
        r#"
[logging]
level = "debug"
json = true

[cache]
default_ttl_seconds = 600
consume_batch_limit = 10

[cache.namespaces.menus]
ttl_seconds = 1234
"#,
    );

    let settings = load(Some(file.path())).expect("settings load");

    assert_eq!(settings.logging.level, LevelFilter::DEBUG);
    assert_eq!(settings.logging.format, LogFormat::Json);
    assert_eq!(settings.cache.default_ttl, Duration::from_secs(600));
    assert_eq!(settings.cache.consume_batch_limit.get(), 10);
    assert_eq!(settings.cache.ttl_for("menus"), Duration::from_secs(1234));
}

#[test]
#[serial]
fn missing_explicit_file_is_an_error() {
    clear_env();
    let dir = tempfile::tempdir().expect("temp dir");
    let missing = dir.path().join("absent.toml");

    assert!(matches!(load(Some(&missing)), Err(LoadError::Build(_))));
}

#[test]
#[serial]
fn environment_overrides_file() {
    clear_env();
    let file = write_config(
        r#"
[cache]
default_ttl_seconds = 600
enabled = true
"#,
    );

    // SAFETY: tests touching the environment are serialized.
    unsafe {
        std::env::set_var("STASHLINE__CACHE__DEFAULT_TTL_SECONDS", "42");
        std::env::set_var("STASHLINE__CACHE__ENABLED", "false");
    }
    let result = load(Some(file.path()));
    clear_env();

    let settings = result.expect("settings load");
    assert_eq!(settings.cache.default_ttl, Duration::from_secs(42));
    assert!(!settings.cache.enabled);
}
