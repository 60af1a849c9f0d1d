use std::fs;
use std::path::PathBuf;

use cricpredict::dashboard::{
    CardTone, DashboardView, MAX_INSIGHTS, aggression_score, momentum_score, milestones_score,
};
use cricpredict::result::{PhaseProjection, PredictionResult, RiskLevel, parse_prediction_json};

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

#[test]
fn smith_scenario_renders_three_insights_one_point_and_exact_bars() {
    let view = DashboardView::build(&smith_result(), "Steve Smith");

    assert_eq!(view.player_name, "Steve Smith");
    assert_eq!(view.insights, vec!["a", "b", "c"]);
    assert_eq!(view.trajectory.len(), 1);
    assert_eq!(view.trajectory[0].phase, "Powerplay");
    assert_eq!(view.trajectory[0].runs, 15.0);

    let widths: Vec<f64> = view.milestones.iter().map(|b| b.percent).collect();
    assert_eq!(widths, vec![70.0, 40.0, 10.0]);
    let labels: Vec<&str> = view.milestones.iter().map(|b| b.label).collect();
    assert_eq!(labels, vec!["30+", "50+", "100+"]);

    assert_eq!(view.technical_advice, "Watch the short ball");
}

#[test]
fn milestone_width_matches_probability_exactly() {
    let mut result = smith_result();
    result.probability_of_fifty = 72.0;
    let view = DashboardView::build(&result, "X");
    assert_eq!(view.milestones[1].percent, 72.0);
}

#[test]
fn aggression_follows_risk_level() {
    assert_eq!(aggression_score(RiskLevel::High), 90.0);
    assert_eq!(aggression_score(RiskLevel::Low), 30.0);
    assert_eq!(aggression_score(RiskLevel::Medium), 65.0);

    for level in RiskLevel::ALL {
        let mut result = smith_result();
        result.risk_level = level;
        let view = DashboardView::build(&result, "X");
        let axis = view
            .radar
            .iter()
            .find(|a| a.subject == "Aggression")
            .expect("aggression axis");
        assert_eq!(axis.value, aggression_score(level));
    }
}

#[test]
fn radar_uses_pace_spin_momentum_and_milestones() {
    let result = smith_result();
    let view = DashboardView::build(&result, "X");
    let values: Vec<(&str, f64)> = view.radar.iter().map(|a| (a.subject, a.value)).collect();
    assert_eq!(
        values,
        vec![
            ("Vs Pace", 60.0),
            ("Vs Spin", 75.0),
            ("Aggression", 65.0),
            ("Momentum", 40.0),
            ("Milestones", (70.0 + 40.0) / 1.5),
        ]
    );
    assert_eq!(milestones_score(&result), (70.0 + 40.0) / 1.5);
}

#[test]
fn momentum_defaults_without_phases() {
    let mut result = smith_result();
    result.phased_analysis.clear();
    assert_eq!(momentum_score(&result), 50.0);

    result.phased_analysis.push(PhaseProjection {
        phase: "Powerplay".to_string(),
        expected_runs: 0.0,
        intensity: 0.0,
    });
    assert_eq!(momentum_score(&result), 50.0);
}

#[test]
fn trajectory_keeps_phase_order() {
    let mut result = smith_result();
    result.phased_analysis = ["Death", "Powerplay", "Middle"]
        .iter()
        .enumerate()
        .map(|(i, phase)| PhaseProjection {
            phase: phase.to_string(),
            expected_runs: (i as f64 + 1.0) * 10.0,
            intensity: 50.0,
        })
        .collect();
    let view = DashboardView::build(&result, "X");
    let order: Vec<(&str, f64)> = view
        .trajectory
        .iter()
        .map(|p| (p.phase.as_str(), p.x))
        .collect();
    assert_eq!(order, vec![("Death", 0.0), ("Powerplay", 1.0), ("Middle", 2.0)]);
    assert_eq!(view.trajectory_ceiling(), (30.0_f64 * 1.2).ceil());
}

#[test]
fn fewer_than_three_insights_are_shown_as_is() {
    let mut result = smith_result();
    result.key_insights = vec!["only".to_string()];
    let view = DashboardView::build(&result, "X");
    assert_eq!(view.insights, vec!["only"]);
    assert!(view.insights.len() <= MAX_INSIGHTS);
}

#[test]
fn summary_cards_show_range_and_risk_tone() {
    let mut result = smith_result();
    let view = DashboardView::build(&result, "X");
    assert_eq!(view.cards[0].value, "45");
    assert_eq!(view.cards[0].sub, "20-80 Range");
    assert_eq!(view.cards[1].value, "55");
    assert_eq!(view.cards[2].value, "Left-arm pace");
    assert_eq!(view.cards[3].value, "Medium");
    assert_eq!(view.cards[3].tone, CardTone::Calm);

    result.risk_level = RiskLevel::High;
    let view = DashboardView::build(&result, "X");
    assert_eq!(view.cards[3].tone, CardTone::Hot);
}
