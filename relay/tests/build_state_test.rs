use contact_relay::mail::MailError;
use contact_relay::{build_state, Config};

fn smtp_config(user: &str) -> Config {
    Config {
        smtp_host: Some("smtp.example.com".into()),
        smtp_user: Some(user.into()),
        smtp_pass: Some("secret".into()),
        ..Config::default()
    }
}

#[test]
fn test_mode_without_smtp() {
    let state = build_state(&Config::default()).unwrap();
    assert!(state.dispatcher.is_test_mode());
}

#[test]
fn test_mode_when_password_blank() {
    let config = Config {
        smtp_pass: Some("  ".into()),
        ..smtp_config("relay@example.com")
    };
    let state = build_state(&config).unwrap();
    assert!(state.dispatcher.is_test_mode());
}

#[test]
fn invalid_sender_is_startup_error() {
    match build_state(&smtp_config("not an address")) {
        Err(MailError::InvalidAddress(user)) => assert_eq!(user, "not an address"),
        Err(other) => panic!("expected invalid address, got {other}"),
        Ok(_) => panic!("expected invalid address, got a state"),
    }
}

#[tokio::test]
async fn complete_smtp_settings_inject_a_mailer() {
    let state = build_state(&smtp_config("relay@example.com")).unwrap();
    assert!(!state.dispatcher.is_test_mode());
}
