use super::*;
use chrono::TimeZone;

fn sample_user() -> User {
    User { id: 1, email: "a@b.com".into(), name: "a".into() }
}

// =============================================================================
// Session
// =============================================================================

#[test]
fn session_default_is_unauthenticated() {
    let session = Session::default();
    assert!(session.user.is_none());
    assert!(session.token.is_none());
    assert!(!session.authenticated);
}

#[test]
fn session_authenticated_sets_all_fields() {
    let session = Session::authenticated(sample_user(), "tok".into());
    assert_eq!(session.user, Some(sample_user()));
    assert_eq!(session.token.as_deref(), Some("tok"));
    assert!(session.authenticated);
}

#[test]
fn session_normalized_clears_flag_without_token() {
    let session = Session { user: Some(sample_user()), token: None, authenticated: true }.normalized();
    assert!(!session.authenticated);
}

#[test]
fn session_normalized_sets_flag_with_user_and_token() {
    let session = Session { user: Some(sample_user()), token: Some("t".into()), authenticated: false }.normalized();
    assert!(session.authenticated);
}

#[test]
fn session_serializes_is_authenticated_key() {
    let json = serde_json::to_value(Session::authenticated(sample_user(), "tok".into())).unwrap();
    assert_eq!(json["isAuthenticated"], true);
    assert_eq!(json["user"]["name"], "a");
    assert_eq!(json["token"], "tok");
}

#[test]
fn session_deserializes_without_flag() {
    let session: Session = serde_json::from_str(r#"{"user":null,"token":null}"#).unwrap();
    assert_eq!(session, Session::default());
}

// =============================================================================
// AuthOutcome
// =============================================================================

#[test]
fn auth_outcome_ok_has_no_error() {
    let outcome = AuthOutcome::ok();
    assert!(outcome.success);
    assert!(outcome.error.is_none());
}

#[test]
fn auth_outcome_failed_carries_message() {
    let outcome = AuthOutcome::failed("nope");
    assert!(!outcome.success);
    assert_eq!(outcome.error.as_deref(), Some("nope"));
}

#[test]
fn auth_outcome_ok_omits_error_key() {
    let json = serde_json::to_value(AuthOutcome::ok()).unwrap();
    assert!(json.get("error").is_none());
}

// =============================================================================
// Post
// =============================================================================

#[test]
fn post_serializes_camel_case() {
    let at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
    let post = Post { id: 7, user_id: 3, title: "t".into(), body: "b".into(), created_at: at, updated_at: at };
    let json = serde_json::to_value(&post).unwrap();
    assert_eq!(json["userId"], 3);
    assert_eq!(json["createdAt"], "2024-05-01T12:00:00Z");
    assert!(json.get("user_id").is_none());
}
