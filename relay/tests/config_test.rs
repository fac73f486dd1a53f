use contact_relay::config::{Config, EnvConfig};
use serde::Deserialize;

#[derive(Debug, Deserialize, PartialEq)]
struct ListenConfig {
    host: String,
    port: u16,
    debug: bool,
}

#[test]
fn env_config_with_prefix() {
    std::env::set_var("RELAYTEST_HOST", "0.0.0.0");
    std::env::set_var("RELAYTEST_PORT", "3000");
    std::env::set_var("RELAYTEST_DEBUG", "false");

    let config = ListenConfig::from_env_with_prefix("RELAYTEST").unwrap();

    assert_eq!(config.host, "0.0.0.0");
    assert_eq!(config.port, 3000);
    assert!(!config.debug);

    std::env::remove_var("RELAYTEST_HOST");
    std::env::remove_var("RELAYTEST_PORT");
    std::env::remove_var("RELAYTEST_DEBUG");
}

#[test]
fn relay_config_reads_smtp_settings() {
    std::env::set_var("SMTPCFG_SMTP_HOST", "smtp.example.com");
    std::env::set_var("SMTPCFG_SMTP_PORT", "465");
    std::env::set_var("SMTPCFG_SMTP_SECURE", "true");
    std::env::set_var("SMTPCFG_SMTP_USER", "relay@example.com");
    std::env::set_var("SMTPCFG_SMTP_PASS", "secret");
    std::env::set_var("SMTPCFG_RATE_LIMIT_MAX", "5");

    let config = Config::from_env_with_prefix("SMTPCFG").unwrap();
    let smtp = config.smtp().expect("smtp configured");

    assert_eq!(smtp.host, "smtp.example.com");
    assert_eq!(smtp.port, 465);
    assert!(smtp.secure);
    assert_eq!(config.rate_limit_max, 5);
    assert_eq!(config.port, 3001);
    assert_eq!(config.contact_recipient, "contact@example.com");

    for key in ["HOST", "PORT", "SECURE", "USER", "PASS"] {
        std::env::remove_var(format!("SMTPCFG_SMTP_{key}"));
    }
    std::env::remove_var("SMTPCFG_RATE_LIMIT_MAX");
}

#[test]
fn missing_credentials_select_test_mode() {
    std::env::set_var("NOSMTP_SMTP_HOST", "smtp.example.com");

    let config = Config::from_env_with_prefix("NOSMTP").unwrap();
    assert_eq!(config.smtp(), None);

    std::env::remove_var("NOSMTP_SMTP_HOST");
}
