//! End-to-end tests over the public entry points

use std::io::Write;
use test_case::test_case;
use ytcontroller::models::{parse_status_message, PageType, SettingsModel, StatusMessage};
use ytcontroller::parser::{export_bundle, import_bundle, parse_settings_from_file};
use ytcontroller::redirect::watch_url_for;
use ytcontroller::report::{describe_message, generate_report};
use ytcontroller::validator::{validate_patch, validate_settings};
use ytcontroller::{classify, prepare_injection, Prepared, Session};

#[test_case("https://m.youtube.com/" => PageType::Home ; "root")]
#[test_case("https://m.youtube.com/feed/subscriptions" => PageType::Subscriptions ; "subscriptions")]
#[test_case("https://m.youtube.com/watch?v=abc&list=feed/subscriptions" => PageType::Subscriptions ; "subscriptions marker wins")]
#[test_case("https://m.youtube.com/watch?v=abc" => PageType::Watch ; "watch")]
#[test_case("https://m.youtube.com/shorts/abc" => PageType::Shorts ; "shorts")]
#[test_case("https://m.youtube.com/@someone/videos" => PageType::Channel ; "handle")]
#[test_case("https://m.youtube.com/results?search_query=rust" => PageType::Search ; "search")]
#[test_case("https://m.youtube.com/feed/library" => PageType::Home ; "unmatched youtube path")]
#[test_case("https://example.com/" => PageType::Unknown ; "foreign host")]
fn test_classification(url: &str) -> PageType {
    classify(url)
}

#[test]
fn test_redirect_keeps_video_id() {
    let target = watch_url_for("https://m.youtube.com/shorts/VIDEOID123").unwrap();
    assert!(target.contains("VIDEOID123"));
    assert!(!target.contains("/shorts/"));
}

#[test]
fn test_settings_file_to_patch() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"{{
            // Comments-only preset, with a custom tweak
            "showComments": true,
            "showShorts": false,
            "customCSS": "ytm-app {{ font-size: 15px; }}"
        }}"#
    )
    .unwrap();

    let settings = parse_settings_from_file(file.path()).unwrap();
    let Prepared::Patch(patch) = prepare_injection(&settings, "https://m.youtube.com/watch?v=a", false).unwrap() else {
        panic!("watch page must not redirect");
    };

    validate_patch(&patch).unwrap();
    assert_eq!(patch.page_type, PageType::Watch);
    assert!(patch.rule_text.ends_with("ytm-app { font-size: 15px; }\n"));
    assert!(!patch.rule_text.contains("/* Comments:"));
    assert!(patch.script.contains("addEventListener('click'"));

    let report = generate_report(&settings, &patch, &validate_settings(&settings)).unwrap();
    assert!(report.contains("Comments Only"));
    assert!(report.contains("Shorts blocking will redirect"));
}

#[test]
fn test_bundle_round_trip_keeps_settings() {
    let settings = SettingsModel {
        show_sidebar: true,
        injection_delay: 400,
        ..SettingsModel::default()
    };
    let bundle = import_bundle(&export_bundle(&settings, &[]).unwrap()).unwrap();
    assert_eq!(bundle.settings, settings);
    assert_eq!(bundle.version, "1.0");
}

#[test]
fn test_status_messages_use_host_field_names() {
    let mut session = Session::open(SettingsModel::default(), true, "https://m.youtube.com/");
    session.settle();

    let message = session.messages().last().cloned().unwrap();
    let json: serde_json::Value = serde_json::from_str(&message.to_json().unwrap()).unwrap();
    assert_eq!(json["type"], "injection-success");
    assert_eq!(json["pageType"], "home");
    assert_eq!(json["timestamp"], 1000);
    assert_eq!(json["location"], "https://m.youtube.com/");
    assert_eq!(json["authenticated"], true);
    assert_eq!(json["settings"]["showShorts"], true);
}

#[test]
fn test_messages_from_page_script_decode() {
    let raw = r#"{"type":"navigation-detected","from":"https://m.youtube.com/","to":"https://m.youtube.com/watch?v=a","pageType":"watch"}"#;
    let message = parse_status_message(raw).unwrap();
    assert_eq!(
        message,
        StatusMessage::NavigationDetected {
            from: "https://m.youtube.com/".to_string(),
            to: "https://m.youtube.com/watch?v=a".to_string(),
            page_type: PageType::Watch,
        }
    );
    assert_eq!(
        describe_message(&message),
        "Navigated https://m.youtube.com/ -> https://m.youtube.com/watch?v=a (watch)"
    );

    let err = parse_status_message(r#"{"type":"bogus"}"#).unwrap_err();
    assert!(err.to_string().contains("bogus"));
}
