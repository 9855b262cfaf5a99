use chat_widget::config::{AppConfig, DEFAULT_FALLBACK_REPLY, DEFAULT_GREETING};
use chat_widget::transport::HttpTransport;
use chat_widget::widget::WidgetSettings;
use serial_test::serial;
use std::env;
use std::io::Write;
use std::time::Duration;

// Helper to clear environment variables that might interfere with tests
fn clear_env_vars() {
    unsafe {
        env::remove_var("CHAT_SERVICE__BASE_URL");
        env::remove_var("CHAT_SERVICE__REQUEST_TIMEOUT_SECS");
        env::remove_var("CHAT_CONTENT__AVATAR_PATH");
        env::remove_var("CHAT_BASE_URL");
        env::remove_var("CHAT_TIMEOUT_SECS");
        env::remove_var("CHAT_AVATAR_PATH");
        env::remove_var("CONFIG_FILE");
    }
}

fn load(args: &[&str]) -> AppConfig {
    let argv = std::iter::once("chat-widget").chain(args.iter().copied());
    AppConfig::load_from_args(argv).expect("Failed to load config")
}

#[test]
#[serial]
fn test_default_config() {
    clear_env_vars();

    let config = load(&[]);
    assert_eq!(config.service.base_url, "http://127.0.0.1:5000");
    assert_eq!(config.service.chat_path, "/chat");
    assert_eq!(config.service.reset_path, "/new-chat");
    assert_eq!(config.service.request_timeout(), Duration::from_secs(30));
    assert_eq!(config.content.greeting, DEFAULT_GREETING);
    assert_eq!(config.content.fallback_reply, DEFAULT_FALLBACK_REPLY);
    assert!(config.content.avatar_path.is_none());
}

#[test]
#[serial]
fn test_env_override() {
    clear_env_vars();
    unsafe {
        env::set_var("CHAT_SERVICE__BASE_URL", "http://coach.local:9090");
        env::set_var("CHAT_SERVICE__REQUEST_TIMEOUT_SECS", "12");
    }

    let config = load(&[]);
    assert_eq!(config.service.base_url, "http://coach.local:9090");
    assert_eq!(config.service.request_timeout_secs, 12);

    clear_env_vars();
}

#[test]
#[serial]
fn test_file_load() {
    clear_env_vars();

    let mut file = tempfile::Builder::new()
        .suffix(".yaml")
        .tempfile()
        .expect("Failed to create temp config");
    write!(
        file,
        r#"
service:
  base_url: "http://10.0.0.5:7070"
  chat_path: "/api/chat"
content:
  avatar_path: "/static/guru-avatar.png"
"#
    )
    .expect("Failed to write temp config");

    // Tell AppConfig to use this file via Env Var (mocking CLI arg indirectly)
    unsafe {
        env::set_var("CONFIG_FILE", file.path());
    }

    let config = load(&[]);
    assert_eq!(config.service.base_url, "http://10.0.0.5:7070");
    assert_eq!(config.service.chat_path, "/api/chat");
    assert_eq!(config.service.reset_path, "/new-chat");
    assert_eq!(
        config.content.avatar_path.as_deref(),
        Some("/static/guru-avatar.png")
    );

    let transport = HttpTransport::from_config(&config.service).unwrap();
    assert_eq!(transport.chat_url().as_str(), "http://10.0.0.5:7070/api/chat");

    clear_env_vars();
}

#[test]
#[serial]
fn test_cli_flags_win_over_env() {
    clear_env_vars();
    unsafe {
        env::set_var("CHAT_SERVICE__BASE_URL", "http://from-env:1");
    }

    let config = load(&[
        "--base-url",
        "http://from-cli:2",
        "--timeout-secs",
        "3",
        "--avatar",
        "/static/a.png",
    ]);
    assert_eq!(config.service.base_url, "http://from-cli:2");
    assert_eq!(config.service.request_timeout_secs, 3);
    assert_eq!(config.content.avatar_path.as_deref(), Some("/static/a.png"));

    let settings = WidgetSettings::from_config(&config);
    assert_eq!(settings.request_timeout, Duration::from_secs(3));
    assert_eq!(settings.greeting, DEFAULT_GREETING);

    clear_env_vars();
}

#[test]
#[serial]
fn test_missing_explicit_file_is_an_error() {
    clear_env_vars();

    let result = AppConfig::load_from_args(["chat-widget", "--config", "/nonexistent/chat.yaml"]);
    assert!(result.is_err());
}
