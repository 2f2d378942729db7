//! Flow-dispatch priority and outcome-reporting tests (no provider network).

mod support;

use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use ticketauth_strategy::{
    LoginRequest, Outcome, OutcomeSink, Scope, Strategy, StrategyConfig, StrategyError, Verdict,
    Verify,
};

fn base_config() -> StrategyConfig {
    StrategyConfig {
        authorization_url: Some("https://auth.example.test/authorize".to_string()),
        token_url: Some("https://auth.example.test/token".to_string()),
        product_id: Some("prod-1".to_string()),
        client_secret: Some("sec-1".to_string()),
        ..StrategyConfig::default()
    }
}

fn granting_verify() -> Verify {
    Verify::tokens(|_access, _refresh, _profile| async {
        Ok(Verdict::granted(json!({ "id": "alice" })))
    })
}

#[tokio::test]
async fn ticketless_request_redirects_when_callback_url_is_configured() {
    let mut config = base_config();
    config.callback_url = Some("https://app.example.test/cb".to_string());
    config.scope = Some(Scope::List(vec!["read".to_string(), "write".to_string()]));
    config.scope_separator = Some(",".to_string());
    config.state = Some("opaque-state".to_string());

    let strategy = Strategy::new(config, granting_verify()).expect("strategy");
    let outcome = strategy.run(&LoginRequest::default()).await;

    match outcome {
        Outcome::Redirect { url } => {
            assert!(url.starts_with("https://auth.example.test/authorize?"));
            assert!(url.contains("prod_id=prod-1"));
            assert!(url.contains("redirect_uri=https%3A%2F%2Fapp.example.test%2Fcb"));
            assert!(url.contains("scope=read%2Cwrite"));
            assert!(url.contains("state=opaque-state"));
        }
        other => panic!("expected redirect, got {other:?}"),
    }
}

#[tokio::test]
async fn redirect_takes_priority_over_the_ticket_acquisition_callback() {
    let mut config = base_config();
    config.callback_url = Some("https://app.example.test/cb".to_string());

    let calls = Arc::new(AtomicUsize::new(0));
    let calls_in = Arc::clone(&calls);
    let strategy = Strategy::new(config, granting_verify())
        .expect("strategy")
        .with_get_ticket(move |_request| {
            let calls = Arc::clone(&calls_in);
            async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok("t-unused".to_string())
            }
        });

    let outcome = strategy.run(&LoginRequest::default()).await;

    assert!(matches!(outcome, Outcome::Redirect { .. }));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn form_mode_without_ticket_url_is_an_error_naming_the_option() {
    let strategy = Strategy::new(base_config(), granting_verify()).expect("strategy");
    let request = LoginRequest::new(json!({ "user_id": "alice", "user_pw": "pw1" }), Value::Null);

    match strategy.run(&request).await {
        Outcome::Error(StrategyError::MissingOption { field }) => {
            assert_eq!(field, "ticket_url");
        }
        other => panic!("expected missing-option error, got {other:?}"),
    }
}

#[tokio::test]
async fn custom_field_names_are_honored_with_bracket_paths() {
    let mut config = base_config();
    config.ticket_field = Some("auth[ticket]".to_string());

    let token = support::StubEndpoint::json(r#"{"token": "at-1"}"#).await;
    config.token_url = Some(token.url());

    let strategy = Strategy::new(config, granting_verify()).expect("strategy");
    let request = LoginRequest::new(json!({ "auth": { "ticket": "t-nested" } }), Value::Null);
    let outcome = strategy.run(&request).await;

    assert!(matches!(outcome, Outcome::Success { .. }));
    assert!(token.single_request_body().contains("ticket=t-nested"));
}

#[derive(Default)]
struct RecordingSink {
    redirects: Vec<String>,
    successes: Vec<(Value, Value)>,
    fails: Vec<Value>,
    errors: Vec<StrategyError>,
}

impl RecordingSink {
    fn total(&self) -> usize {
        self.redirects.len() + self.successes.len() + self.fails.len() + self.errors.len()
    }
}

impl OutcomeSink for RecordingSink {
    fn redirect(&mut self, url: String) {
        self.redirects.push(url);
    }
    fn success(&mut self, user: Value, info: Value) {
        self.successes.push((user, info));
    }
    fn fail(&mut self, info: Value) {
        self.fails.push(info);
    }
    fn error(&mut self, err: StrategyError) {
        self.errors.push(err);
    }
}

#[tokio::test]
async fn authenticate_reports_exactly_one_outcome_through_the_sink() {
    let mut config = base_config();
    config.callback_url = Some("https://app.example.test/cb".to_string());
    let strategy = Strategy::new(config, granting_verify()).expect("strategy");

    let mut sink = RecordingSink::default();
    strategy.authenticate(&LoginRequest::default(), &mut sink).await;

    assert_eq!(sink.total(), 1);
    assert_eq!(sink.redirects.len(), 1);
}

#[tokio::test]
async fn failed_authentication_reports_through_the_fail_channel() {
    let strategy = Strategy::new(base_config(), granting_verify()).expect("strategy");

    let mut sink = RecordingSink::default();
    strategy
        .authenticate(&LoginRequest::default(), &mut sink)
        .await;

    assert_eq!(sink.total(), 1);
    assert_eq!(sink.fails.len(), 1);
    assert_eq!(sink.fails[0], json!({ "message": "Missing credentials" }));
}
