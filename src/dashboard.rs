//! Display values derived from a prediction. Nothing here is stored; the view is
//! rebuilt from the current result on every frame.

use crate::result::{PredictionResult, RiskLevel};

pub const MAX_INSIGHTS: usize = 3;
const DEFAULT_MOMENTUM: f64 = 50.0;
const MILESTONE_DIVISOR: f64 = 1.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardTone {
    Runs,
    Tempo,
    Threat,
    Calm,
    Hot,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StatCard {
    pub label: &'static str,
    pub value: String,
    pub sub: String,
    pub tone: CardTone,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrajectoryPoint {
    pub phase: String,
    pub x: f64,
    pub runs: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MilestoneBar {
    pub label: &'static str,
    /// Bar width in percent; the probability exactly as the model reported it.
    pub percent: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RadarAxis {
    pub subject: &'static str,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardView {
    pub player_name: String,
    pub cards: [StatCard; 4],
    pub trajectory: Vec<TrajectoryPoint>,
    pub milestones: [MilestoneBar; 3],
    pub radar: [RadarAxis; 5],
    pub insights: Vec<String>,
    pub technical_advice: String,
}

impl DashboardView {
    pub fn build(result: &PredictionResult, player_name: &str) -> Self {
        Self {
            player_name: player_name.to_string(),
            cards: summary_cards(result),
            trajectory: trajectory(result),
            milestones: milestone_bars(result),
            radar: radar_axes(result),
            insights: visible_insights(result),
            technical_advice: result.technical_advice.clone(),
        }
    }

    /// Upper bound for the trajectory y-axis, with a little headroom.
    pub fn trajectory_ceiling(&self) -> f64 {
        let peak = self
            .trajectory
            .iter()
            .map(|p| p.runs)
            .fold(0.0_f64, f64::max);
        if peak <= 0.0 { 10.0 } else { (peak * 1.2).ceil() }
    }
}

pub fn aggression_score(risk: RiskLevel) -> f64 {
    match risk {
        RiskLevel::Low => 30.0,
        RiskLevel::Medium => 65.0,
        RiskLevel::High => 90.0,
    }
}

pub fn momentum_score(result: &PredictionResult) -> f64 {
    match result.phased_analysis.first() {
        Some(phase) if phase.intensity != 0.0 => phase.intensity,
        _ => DEFAULT_MOMENTUM,
    }
}

pub fn milestones_score(result: &PredictionResult) -> f64 {
    (result.probability_of_thirty + result.probability_of_fifty) / MILESTONE_DIVISOR
}

pub fn summary_cards(result: &PredictionResult) -> [StatCard; 4] {
    let runs = result.expected_runs;
    [
        StatCard {
            label: "Avg Projection",
            value: format_number(runs.avg),
            sub: format!("{}-{} Range", format_number(runs.min), format_number(runs.max)),
            tone: CardTone::Runs,
        },
        StatCard {
            label: "Strike Rate",
            value: format_number(result.strike_rate),
            sub: "Projected Tempo".to_string(),
            tone: CardTone::Tempo,
        },
        StatCard {
            label: "Primary Threat",
            value: result.primary_threat.clone(),
            sub: "Dangerous Matchup".to_string(),
            tone: CardTone::Threat,
        },
        StatCard {
            label: "Risk Rating",
            value: result.risk_level.label().to_string(),
            sub: "Batting Approach".to_string(),
            tone: if result.risk_level == RiskLevel::High {
                CardTone::Hot
            } else {
                CardTone::Calm
            },
        },
    ]
}

pub fn trajectory(result: &PredictionResult) -> Vec<TrajectoryPoint> {
    result
        .phased_analysis
        .iter()
        .enumerate()
        .map(|(idx, phase)| TrajectoryPoint {
            phase: phase.phase.clone(),
            x: idx as f64,
            runs: phase.expected_runs,
        })
        .collect()
}

pub fn milestone_bars(result: &PredictionResult) -> [MilestoneBar; 3] {
    [
        MilestoneBar {
            label: "30+",
            percent: result.probability_of_thirty,
        },
        MilestoneBar {
            label: "50+",
            percent: result.probability_of_fifty,
        },
        MilestoneBar {
            label: "100+",
            percent: result.probability_of_hundred,
        },
    ]
}

pub fn radar_axes(result: &PredictionResult) -> [RadarAxis; 5] {
    [
        RadarAxis {
            subject: "Vs Pace",
            value: result.performance_against_pace,
        },
        RadarAxis {
            subject: "Vs Spin",
            value: result.performance_against_spin,
        },
        RadarAxis {
            subject: "Aggression",
            value: aggression_score(result.risk_level),
        },
        RadarAxis {
            subject: "Momentum",
            value: momentum_score(result),
        },
        RadarAxis {
            subject: "Milestones",
            value: milestones_score(result),
        },
    ]
}

pub fn visible_insights(result: &PredictionResult) -> Vec<String> {
    result
        .key_insights
        .iter()
        .take(MAX_INSIGHTS)
        .cloned()
        .collect()
}

/// Whole numbers without a trailing `.0`, everything else to one decimal.
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value:.1}")
    }
}
