use std::collections::VecDeque;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

use cricpredict::catalog::{MatchFormat, PitchNature, Team};
use cricpredict::error::PredictionError;
use cricpredict::gemini::Predictor;
use cricpredict::inputs::{FormError, PredictionInputs};
use cricpredict::result::{PredictionResult, parse_prediction_json};
use cricpredict::state::{
    AppState, CREDENTIAL_HINT, Delta, PREDICTION_FAILED_MESSAGE, Phase, ProviderCommand,
    apply_delta,
};
use cricpredict::worker::execute;

fn read_fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    fs::read_to_string(path).expect("fixture file should be readable")
}

fn smith_result() -> PredictionResult {
    parse_prediction_json(&read_fixture("prediction_smith.json")).expect("fixture should parse")
}

/// Replays scripted outcomes and records every call.
struct ScriptedPredictor {
    calls: Mutex<Vec<PredictionInputs>>,
    outcomes: Mutex<VecDeque<Result<PredictionResult, PredictionError>>>,
}

impl ScriptedPredictor {
    fn new(outcomes: Vec<Result<PredictionResult, PredictionError>>) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            outcomes: Mutex::new(outcomes.into()),
        }
    }

    fn calls(&self) -> Vec<PredictionInputs> {
        self.calls.lock().unwrap().clone()
    }
}

impl Predictor for ScriptedPredictor {
    fn predict(&self, inputs: &PredictionInputs) -> Result<PredictionResult, PredictionError> {
        self.calls.lock().unwrap().push(inputs.clone());
        self.outcomes
            .lock()
            .unwrap()
            .pop_front()
            .expect("no scripted outcome left")
    }
}

/// Submit through the controller and, if a request was issued, run it to completion.
fn submit_and_run(state: &mut AppState, predictor: &ScriptedPredictor) -> bool {
    let Some(cmd) = state.submit() else {
        return false;
    };
    let ProviderCommand::Predict { request_id, inputs } = cmd else {
        panic!("submit must produce a predict command");
    };
    assert!(state.loading);
    assert!(state.error.is_none());
    let delta = execute(predictor, request_id, inputs);
    apply_delta(state, delta);
    true
}

fn fill_smith(state: &mut AppState) {
    state.form.batsman_name = "Steve Smith".to_string();
    state.form.opponent_team = Team::India;
    state.form.ground = "MCG".to_string();
    state.form.match_format = MatchFormat::TestMatch;
    state.form.pitch_nature = PitchNature::Bouncy;
    state.form.batting_order = 3;
}

#[test]
fn valid_submit_calls_client_once_with_form_snapshot() {
    let predictor = ScriptedPredictor::new(vec![Ok(smith_result())]);
    let mut state = AppState::new();
    fill_smith(&mut state);
    let expected = state.form.submit().expect("form is complete");

    assert!(submit_and_run(&mut state, &predictor));

    let calls = predictor.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0], expected);
    assert_eq!(state.phase(), Phase::Loaded);
    assert!(!state.loading);
    assert_eq!(state.result, Some(smith_result()));
    assert_eq!(state.last_inputs, Some(expected));
}

#[test]
fn incomplete_form_never_reaches_client() {
    let predictor = ScriptedPredictor::new(Vec::new());

    let mut missing_name = AppState::new();
    missing_name.form.ground = "MCG".to_string();
    assert!(!submit_and_run(&mut missing_name, &predictor));
    assert_eq!(missing_name.field_errors, vec![FormError::MissingBatsmanName]);

    let mut missing_ground = AppState::new();
    missing_ground.form.batsman_name = "Steve Smith".to_string();
    assert!(!submit_and_run(&mut missing_ground, &predictor));
    assert_eq!(missing_ground.field_errors, vec![FormError::MissingGround]);

    let mut empty = AppState::new();
    assert!(!submit_and_run(&mut empty, &predictor));
    assert_eq!(empty.field_errors.len(), 2);

    assert!(predictor.calls().is_empty());
    for state in [&missing_name, &missing_ground, &empty] {
        assert!(!state.loading);
        assert!(state.error.is_none());
        assert!(state.result.is_none());
        assert_eq!(state.phase(), Phase::Idle);
    }
}

#[test]
fn field_errors_clear_after_a_valid_submit() {
    let predictor = ScriptedPredictor::new(vec![Ok(smith_result())]);
    let mut state = AppState::new();
    assert!(!submit_and_run(&mut state, &predictor));
    assert!(!state.field_errors.is_empty());

    fill_smith(&mut state);
    assert!(submit_and_run(&mut state, &predictor));
    assert!(state.field_errors.is_empty());
}

#[test]
fn rejection_sets_fixed_message_and_keeps_previous_result() {
    let predictor = ScriptedPredictor::new(vec![
        Ok(smith_result()),
        Err(PredictionError::Transport("connection refused".to_string())),
    ]);
    let mut state = AppState::new();
    fill_smith(&mut state);
    assert!(submit_and_run(&mut state, &predictor));
    let before = state.result.clone();
    let inputs_before = state.last_inputs.clone();

    state.form.ground = "SCG".to_string();
    assert!(submit_and_run(&mut state, &predictor));

    assert!(!state.loading);
    assert_eq!(state.error.as_deref(), Some(PREDICTION_FAILED_MESSAGE));
    assert_eq!(state.result, before);
    assert_eq!(state.last_inputs, inputs_before);
    assert!(
        state
            .logs
            .iter()
            .any(|line| line.contains("[WARN]") && line.contains("connection refused"))
    );
}

#[test]
fn every_failure_cause_maps_to_the_same_message() {
    let causes = vec![
        PredictionError::CredentialMissing,
        PredictionError::Transport("dns".to_string()),
        PredictionError::Status {
            code: 403,
            message: "PERMISSION_DENIED".to_string(),
        },
        PredictionError::InvalidResponseShape("missing field".to_string()),
    ];
    for cause in causes {
        let predictor = ScriptedPredictor::new(vec![Err(cause)]);
        let mut state = AppState::new();
        fill_smith(&mut state);
        assert!(submit_and_run(&mut state, &predictor));
        assert_eq!(state.error.as_deref(), Some(PREDICTION_FAILED_MESSAGE));
        assert!(state.result.is_none());
        assert_eq!(state.phase(), Phase::Errored);
    }
}

#[test]
fn form_keeps_its_values_after_a_successful_submit() {
    let predictor = ScriptedPredictor::new(vec![Ok(smith_result())]);
    let mut state = AppState::new();
    fill_smith(&mut state);
    state.form.batting_order = 5;
    let before = state.form.clone();

    assert!(submit_and_run(&mut state, &predictor));
    assert_eq!(state.phase(), Phase::Loaded);
    assert_eq!(state.form, before);
    assert_eq!(state.form.batsman_name, "Steve Smith");
    assert_eq!(state.form.ground, "MCG");
}

#[test]
fn credential_failures_add_a_key_hint_to_the_console() {
    let cases = vec![
        (PredictionError::CredentialMissing, true),
        (
            PredictionError::Status {
                code: 400,
                message: "INVALID_ARGUMENT: API key not valid".to_string(),
            },
            true,
        ),
        (
            PredictionError::Status {
                code: 503,
                message: "UNAVAILABLE".to_string(),
            },
            false,
        ),
        (PredictionError::Transport("reset".to_string()), false),
    ];
    for (cause, hinted) in cases {
        let predictor = ScriptedPredictor::new(vec![Err(cause.clone())]);
        let mut state = AppState::new();
        fill_smith(&mut state);
        assert!(submit_and_run(&mut state, &predictor));
        let has_hint = state.logs.iter().any(|line| line.ends_with(CREDENTIAL_HINT));
        assert_eq!(has_hint, hinted, "{cause:?}");
    }
}

#[test]
fn second_submission_fully_replaces_the_first() {
    let mut second = smith_result();
    second.primary_threat = "Off-spin".to_string();
    second.key_insights = vec!["x".to_string()];
    let predictor = ScriptedPredictor::new(vec![Ok(smith_result()), Ok(second.clone())]);

    let mut state = AppState::new();
    fill_smith(&mut state);
    assert!(submit_and_run(&mut state, &predictor));

    state.form.batsman_name = "Joe Root".to_string();
    state.form.opponent_team = Team::Australia;
    let second_inputs = state.form.submit().expect("complete");
    assert!(submit_and_run(&mut state, &predictor));

    assert_eq!(state.result, Some(second));
    assert_eq!(state.last_inputs, Some(second_inputs));
    assert_eq!(predictor.calls().len(), 2);
}

#[test]
fn success_clears_previous_error() {
    let predictor = ScriptedPredictor::new(vec![
        Err(PredictionError::CredentialMissing),
        Ok(smith_result()),
    ]);
    let mut state = AppState::new();
    fill_smith(&mut state);
    assert!(submit_and_run(&mut state, &predictor));
    assert!(state.error.is_some());
    assert!(submit_and_run(&mut state, &predictor));
    assert!(state.error.is_none());
    assert_eq!(state.phase(), Phase::Loaded);
}

#[test]
fn submit_is_ignored_while_loading() {
    let mut state = AppState::new();
    fill_smith(&mut state);
    assert!(state.submit().is_some());
    assert!(state.submit().is_none());
    assert_eq!(state.inflight, Some(1));
}

#[test]
fn stale_and_cancelled_outcomes_are_discarded() {
    let mut state = AppState::new();
    fill_smith(&mut state);
    let Some(ProviderCommand::Predict { request_id, inputs }) = state.submit() else {
        panic!("expected predict command");
    };

    let cancel = state.cancel();
    assert!(matches!(cancel, Some(ProviderCommand::Cancel { request_id: id }) if id == request_id));
    assert!(!state.loading);

    apply_delta(
        &mut state,
        Delta::PredictionReady {
            request_id,
            inputs,
            result: smith_result(),
        },
    );
    assert!(state.result.is_none());
    assert!(state.last_inputs.is_none());

    let Some(ProviderCommand::Predict {
        request_id: newer, ..
    }) = state.submit()
    else {
        panic!("expected predict command");
    };
    assert!(newer > request_id);

    apply_delta(
        &mut state,
        Delta::PredictionFailed {
            request_id,
            error: PredictionError::Transport("late".to_string()),
        },
    );
    assert!(state.loading);
    assert!(state.error.is_none());
}
