//! Scripted sessions against the console and one-shot operations, with a
//! stub transport that answers by endpoint.

use std::sync::Mutex;

use async_trait::async_trait;
use pretty_assertions::assert_eq;
use relief_core::{
    ApiConfig, AuthMode, CauseOfDamage, ClaimInput, Credentials, Inference, RawResponse,
    Transport, TransportError,
};
use relief_ui::{Console, app};
use serde_json::{Value, json};

/// Replies by URL suffix and records every request.
struct RoutedTransport {
    login: (u16, &'static str),
    signup: (u16, &'static str),
    prediction: (u16, &'static str),
    calls: Mutex<Vec<(String, Value)>>,
}

impl RoutedTransport {
    fn happy() -> Self {
        Self {
            login: (200, "true"),
            signup: (200, "true"),
            prediction: (200, r#"{"inference": 12345.6}"#),
            calls: Mutex::new(Vec::new()),
        }
    }

    fn urls(&self) -> Vec<String> {
        self.calls.lock().unwrap().iter().map(|(u, _)| u.clone()).collect()
    }

    fn bodies(&self) -> Vec<Value> {
        self.calls.lock().unwrap().iter().map(|(_, b)| b.clone()).collect()
    }
}

#[async_trait]
impl Transport for RoutedTransport {
    fn name(&self) -> &'static str {
        "routed"
    }

    async fn post_json(
        &self,
        url: &str,
        body: &Value,
    ) -> Result<RawResponse, TransportError> {
        self.calls
            .lock()
            .unwrap()
            .push((url.to_string(), body.clone()));
        let (status, text) = if url.ends_with("/validatelogin") {
            self.login
        } else if url.ends_with("/makenewuser") {
            self.signup
        } else if url.ends_with("/prediction") {
            self.prediction
        } else {
            return Err(TransportError::other(format!("unexpected url {url}")));
        };
        Ok(RawResponse::new(status, text))
    }
}

fn config() -> ApiConfig {
    ApiConfig {
        auth_base: "http://auth.test".to_string(),
        prediction_base: "http://predict.test".to_string(),
    }
}

async fn run_script(
    transport: &RoutedTransport,
    script: &str,
) -> String {
    let config = config();
    let mut output = Vec::new();
    Console::new(transport, &config, script.as_bytes(), &mut output)
        .run()
        .await
        .unwrap();
    String::from_utf8(output).unwrap()
}

// ── console ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn sign_in_and_estimate() {
    let transport = RoutedTransport::happy();
    let script = "\nalice\nsecret1\n2.5\n3\n4\nFlooding\nq\n";

    let out = run_script(&transport, script).await;

    assert!(out.contains("Signing in…"), "{out}");
    assert!(out.contains("Signed in as alice."), "{out}");
    assert!(out.contains("Calculating…"), "{out}");
    assert!(out.contains("Estimated compensation: $12,346"), "{out}");
    assert!(out.ends_with("Goodbye.\n"), "{out}");

    assert_eq!(
        transport.urls(),
        vec![
            "http://auth.test/validatelogin".to_string(),
            "http://predict.test/prediction".to_string(),
        ]
    );
    assert_eq!(
        transport.bodies()[1],
        json!({
            "waterDepth": 2.5,
            "floodWaterDuration": 3,
            "causeOfDamage": 4,
            "floodEvent": "Flooding"
        })
    );
}

#[tokio::test]
async fn rejected_sign_in_retries_with_kept_username() {
    let transport = RoutedTransport {
        login: (200, "false"),
        ..RoutedTransport::happy()
    };
    // Second attempt presses Enter for username and password.
    let script = "i\nalice\nwrong1\n\n\n\n";

    let out = run_script(&transport, script).await;

    assert_eq!(out.matches("Error: Invalid username or password").count(), 2, "{out}");
    assert!(out.contains("Username [alice]"), "{out}");
    assert!(out.contains("Password [******]"), "{out}");
    assert_eq!(
        transport.bodies(),
        vec![
            json!({"username": "alice", "password": "wrong1"}),
            json!({"username": "alice", "password": "wrong1"}),
        ]
    );
}

#[tokio::test]
async fn sign_up_mismatch_is_caught_locally() {
    let transport = RoutedTransport::happy();
    let script = "u\nbob\nsecret1\nsecret2\nq\n";

    let out = run_script(&transport, script).await;

    assert!(out.contains("Passwords do not match."), "{out}");
    assert!(transport.urls().is_empty());
}

#[tokio::test]
async fn sign_up_posts_to_makenewuser() {
    let transport = RoutedTransport::happy();
    let script = "u\nbob\nsecret1\nsecret1\n";

    let out = run_script(&transport, script).await;

    assert!(out.contains("Creating account…"), "{out}");
    assert!(out.contains("Signed in as bob."), "{out}");
    assert_eq!(transport.urls(), vec!["http://auth.test/makenewuser".to_string()]);
}

#[tokio::test]
async fn missing_claim_fields_send_nothing() {
    let transport = RoutedTransport::happy();
    // Flood event left blank.
    let script = "\nalice\nsecret1\n2.5\n3\n4\n\nq\n";

    let out = run_script(&transport, script).await;

    assert!(out.contains("Please fill in water depth"), "{out}");
    assert!(!out.contains("Calculating…"), "{out}");
    assert_eq!(transport.urls(), vec!["http://auth.test/validatelogin".to_string()]);
}

#[tokio::test]
async fn prediction_error_keeps_claim_for_retry() {
    let transport = RoutedTransport {
        prediction: (500, "model offline"),
        ..RoutedTransport::happy()
    };
    // Edit again keeping every field, then quit.
    let script = "\nalice\nsecret1\n2.5\n3\nA\nFlooding\ne\n\n\n\n\nq\n";

    let out = run_script(&transport, script).await;

    assert_eq!(out.matches("Error: model offline").count(), 2, "{out}");
    assert!(out.contains("Water depth (ft) [2.5]"), "{out}");
    assert!(out.contains("Cause of damage code, ? to list [A]"), "{out}");
    let bodies = transport.bodies();
    assert_eq!(bodies.len(), 3);
    assert_eq!(bodies[1], bodies[2]);
    assert_eq!(bodies[2]["causeOfDamage"], json!(10));
}

#[tokio::test]
async fn unknown_cause_is_reprompted_and_list_is_shown() {
    let transport = RoutedTransport::happy();
    let script = "\nalice\nsecret1\n1\n1\n5\n?\nc\nStorm\nq\n";

    let out = run_script(&transport, script).await;

    assert!(out.contains("Unknown cause code '5'."), "{out}");
    assert!(out.contains(" D  Expedited claim handling process by Adjusting"), "{out}");
    assert_eq!(transport.bodies()[1]["causeOfDamage"], json!(12));
}

#[tokio::test]
async fn logout_returns_to_gate_and_new_estimate_clears_form() {
    let transport = RoutedTransport::happy();
    let script = concat!(
        "\nalice\nsecret1\n",
        "2.5\n3\n4\nFlooding\n",
        "n\n",
        // Blank form after "new estimate": nothing is pre-filled.
        "\n\n\n\n",
        "l\n",
        "\n\n\n",
    );

    let out = run_script(&transport, script).await;

    assert_eq!(out.matches("Water depth (ft) []").count(), 2, "{out}");
    assert_eq!(out.matches("Flood event []").count(), 2, "{out}");
    assert!(out.contains("Logged out."), "{out}");
    // Credentials are not remembered across logout.
    assert!(out.contains("Error: Please enter username and password."), "{out}");
    assert_eq!(transport.urls().len(), 2);
}

#[tokio::test]
async fn end_of_input_exits_cleanly() {
    let transport = RoutedTransport::happy();
    let out = run_script(&transport, "").await;
    assert!(out.ends_with("Goodbye.\n"), "{out}");
    assert!(transport.urls().is_empty());
}

// ── one-shot operations ──────────────────────────────────────────────────────

#[tokio::test]
async fn estimate_once_signs_in_first() {
    let transport = RoutedTransport {
        prediction: (200, r#"{"inference": [500, 1000]}"#),
        ..RoutedTransport::happy()
    };
    let input = ClaimInput {
        water_depth: "1200 ft".to_string(),
        flood_water_duration: "48".to_string(),
        cause_of_damage: Some(CauseOfDamage::StreamRiverOrLakeOverflow),
        flood_event: "Hurricane".to_string(),
    };

    let (session, inference) =
        app::estimate_once(&transport, &config(), &Credentials::new("alice", "secret1"), input)
            .await
            .unwrap();

    assert_eq!(session.username, "alice");
    assert_eq!(inference.display().as_deref(), Some("$500"));
    assert!(matches!(inference, Inference::Series { .. }));
    assert_eq!(transport.bodies()[1]["waterDepth"], json!(1200));
}

#[tokio::test]
async fn estimate_once_stops_at_rejected_sign_in() {
    let transport = RoutedTransport {
        login: (200, "false"),
        ..RoutedTransport::happy()
    };
    let input = ClaimInput {
        water_depth: "1".to_string(),
        flood_water_duration: "1".to_string(),
        cause_of_damage: Some(CauseOfDamage::OtherCauses),
        flood_event: "Storm".to_string(),
    };

    let err = app::estimate_once(&transport, &config(), &Credentials::new("alice", "nope12"), input)
        .await
        .unwrap_err();

    assert!(err.to_string().contains("Invalid username or password"), "{err}");
    assert_eq!(transport.urls(), vec!["http://auth.test/validatelogin".to_string()]);
}

#[tokio::test]
async fn authenticate_once_reports_validation_errors() {
    let transport = RoutedTransport::happy();
    let err = app::authenticate_once(
        &transport,
        &config(),
        AuthMode::SignUp,
        &Credentials::new("bob", "abc").with_repeat_password("abc"),
    )
    .await
    .unwrap_err();

    assert_eq!(err.to_string(), "Password should be at least 6 characters.");
    assert!(transport.urls().is_empty());
}
