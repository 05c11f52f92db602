//! Tests for `application::services::session::authenticate`.

#![allow(clippy::expect_used)]

use moemail_deploy::application::services::session::authenticate;
use moemail_deploy::domain::{CookieRecord, ProvisionError};

use crate::mocks::{MemorySessions, MockCodeHost, MockJar, RecordingReporter};

fn cookie(name: &str) -> CookieRecord {
    CookieRecord::new(name, "v")
}

#[tokio::test]
async fn test_saved_session_is_restored_without_login() {
    let github = MockCodeHost::new();
    let sessions = MemorySessions::with("GitHub", vec![cookie("user_session"), cookie("_gh_sess")]);
    let jar = MockJar::default();
    let reporter = RecordingReporter::default();

    authenticate(&github, &sessions, &jar, &reporter)
        .await
        .expect("restored session authenticates");

    assert_eq!(github.calls.calls(), vec!["visit_main_page"]);
    assert_eq!(
        jar.restores.calls(),
        vec!["https://github.com/settings/developers (2)"]
    );
    assert!(sessions.saves.calls().is_empty(), "nothing new to save");
}

#[tokio::test]
async fn test_missing_session_logs_in_and_persists_cookies() {
    let github = MockCodeHost::new();
    let sessions = MemorySessions::default();
    let jar = MockJar {
        live: vec![cookie("user_session")],
        ..MockJar::default()
    };
    let reporter = RecordingReporter::default();

    authenticate(&github, &sessions, &jar, &reporter)
        .await
        .expect("login succeeds");

    assert_eq!(github.calls.calls(), vec!["login"]);
    assert_eq!(sessions.get("GitHub"), Some(vec![cookie("user_session")]));
    assert!(jar.restores.calls().is_empty());
}

#[tokio::test]
async fn test_failed_login_persists_nothing() {
    let github = MockCodeHost {
        login_ok: false,
        ..MockCodeHost::new()
    };
    let sessions = MemorySessions::default();
    let jar = MockJar {
        live: vec![cookie("logged_out")],
        ..MockJar::default()
    };
    let reporter = RecordingReporter::default();

    let err = authenticate(&github, &sessions, &jar, &reporter)
        .await
        .expect_err("unconfirmed login fails");

    assert!(matches!(
        err.downcast_ref::<ProvisionError>(),
        Some(ProvisionError::AuthenticationFailed { platform }) if platform == "GitHub"
    ));
    assert!(sessions.saves.calls().is_empty());
    assert_eq!(sessions.get("GitHub"), None);
}

#[tokio::test]
async fn test_sessions_are_kept_per_platform() {
    let github = MockCodeHost::new();
    let sessions = MemorySessions::with("Cloudflare", vec![cookie("CF_Authorization")]);
    let jar = MockJar::default();
    let reporter = RecordingReporter::default();

    authenticate(&github, &sessions, &jar, &reporter)
        .await
        .expect("github logs in");

    assert_eq!(github.calls.calls(), vec!["login"], "cloudflare cookies are not github's");
    assert!(sessions.get("Cloudflare").is_some());
}
