// ====================================
// tests/integration/advice_flow_tests.rs
// ====================================
//! Advice service behavior as seen from the dashboard and the signup form.
use crate::test_utils::{flat_file_state, FailingGenerator, ScriptedGenerator};
use secureauth_lib::advice::{
    AdviceClient, STRENGTH_FALLBACK_FEEDBACK, WELCOME_FALLBACK,
};
use std::sync::{atomic::Ordering, Arc};
use std::time::Duration;

#[tokio::test]
async fn test_failing_service_degrades_to_fallbacks() {
    let generator = Arc::new(FailingGenerator::default());
    let advice = AdviceClient::new(generator.clone());

    assert_eq!(advice.welcome_advice("Ada").await, WELCOME_FALLBACK);

    let strength = advice.analyze_password_strength("secret123").await;
    assert_eq!(strength.score, 3.0);
    assert_eq!(strength.feedback, STRENGTH_FALLBACK_FEEDBACK);

    // one request per call, no retries
    assert_eq!(generator.calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_welcome_request_uses_username_and_temperature() {
    let generator = Arc::new(ScriptedGenerator::new("Welcome, Ada! Turn on MFA."));
    let (state, _temp_dir) = flat_file_state(generator.clone());

    let user = state
        .auth
        .register("Ada", "ada@x.com", "secret123")
        .await
        .unwrap();
    let text = state.advice.welcome_advice(&user.name).await;
    assert_eq!(text, "Welcome, Ada! Turn on MFA.");

    let requests = generator.requests();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].prompt.contains("a user named Ada"));
    assert_eq!(requests[0].temperature, Some(0.7));
    assert!(requests[0].json_schema.is_none());
}

#[tokio::test]
async fn test_strength_request_asks_for_json() {
    let generator = Arc::new(ScriptedGenerator::new(
        r#"{"score": 5, "feedback": "Excellent mix of characters"}"#,
    ));
    let advice = AdviceClient::new(generator.clone());

    let strength = advice.analyze_password_strength("C0rrect-Horse!").await;
    assert_eq!(strength.score, 5.0);

    let request = &generator.requests()[0];
    assert!(request.prompt.contains("Password: \"C0rrect-Horse!\""));
    assert!(request.json_schema.is_some());
}

#[tokio::test(start_paused = true)]
async fn test_strength_monitor_applies_latest_input_only() {
    let generator = Arc::new(ScriptedGenerator::new(r#"{"score": 2, "feedback": "Short"}"#));
    let (state, _temp_dir) = flat_file_state(generator.clone());
    let monitor = state.strength_monitor();
    let mut readings = monitor.subscribe();

    monitor.input("secret");
    monitor.input("secret1");
    let last = monitor.input("secret12");

    let reading = readings
        .wait_for(|r| r.strength.is_some())
        .await
        .unwrap()
        .clone();
    assert_eq!(reading.version, last);

    tokio::time::sleep(Duration::from_secs(5)).await;
    let requests = generator.requests();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].prompt.contains("\"secret12\""));

    // shrinking below the minimum clears the meter
    monitor.input("sec");
    assert_eq!(monitor.current(), None);
}
