// tests/feed_config.rs
use events_feed::config::{
    load_config_default, load_config_from, EmptyResultPolicy, ENV_CONFIG_PATH,
};
use std::{env, fs, path::PathBuf};

#[test]
fn toml_and_json_files() {
    let dir = tempfile::tempdir().unwrap();

    let p_toml = dir.path().join("feed.toml");
    fs::write(
        &p_toml,
        r#"
feed_path = "public/events.json"
timeframe = "next 21 days"
empty_result = "fail"
"#,
    )
    .unwrap();
    let c = load_config_from(&p_toml).unwrap();
    assert_eq!(c.feed_path, PathBuf::from("public/events.json"));
    assert_eq!(c.timeframe, "next 21 days");
    assert_eq!(c.empty_result, EmptyResultPolicy::Fail);

    let p_json = dir.path().join("feed.json");
    fs::write(
        &p_json,
        r#"{"dedup_sources": true, "generator": {"models": ["m1", "m2"]}}"#,
    )
    .unwrap();
    let cj = load_config_from(&p_json).unwrap();
    assert!(cj.dedup_sources);
    assert_eq!(cj.generator.models, vec!["m1".to_string(), "m2".to_string()]);
}

#[serial_test::serial]
#[test]
fn default_uses_env_then_fallbacks() {
    // Isolate CWD so the repo's own config/ is not picked up.
    let old = env::current_dir().unwrap();
    let tmp = tempfile::tempdir().unwrap();
    env::set_current_dir(tmp.path()).unwrap();
    env::remove_var(ENV_CONFIG_PATH);

    // 1) Nothing on disk -> defaults
    let c = load_config_default().unwrap();
    assert_eq!(c.feed_path, PathBuf::from("events.json"));

    // 2) config/feed.toml
    fs::create_dir_all(tmp.path().join("config")).unwrap();
    fs::write(tmp.path().join("config/feed.toml"), r#"timeframe = "next 3 days""#).unwrap();
    assert_eq!(load_config_default().unwrap().timeframe, "next 3 days");

    // 3) env wins
    let p_env = tmp.path().join("override.json");
    fs::write(&p_env, r#"{"timeframe": "next 9 days"}"#).unwrap();
    env::set_var(ENV_CONFIG_PATH, p_env.display().to_string());
    assert_eq!(load_config_default().unwrap().timeframe, "next 9 days");

    // 4) env pointing nowhere is an error
    env::set_var(ENV_CONFIG_PATH, tmp.path().join("missing.toml").display().to_string());
    assert!(load_config_default().is_err());
    env::remove_var(ENV_CONFIG_PATH);

    env::set_current_dir(&old).unwrap();
}
