use once_cell::sync::Lazy;
use serde_json::{Value, json};

use crate::inputs::PredictionInputs;

/// Every top-level field of the prediction payload, all mandatory.
pub const REQUIRED_FIELDS: [&str; 12] = [
    "expectedRuns",
    "strikeRate",
    "probabilityOfThirty",
    "probabilityOfFifty",
    "probabilityOfHundred",
    "performanceAgainstPace",
    "performanceAgainstSpin",
    "primaryThreat",
    "riskLevel",
    "keyInsights",
    "phasedAnalysis",
    "technicalAdvice",
];

static RESPONSE_SCHEMA: Lazy<Value> = Lazy::new(|| {
    json!({
        "type": "OBJECT",
        "properties": {
            "expectedRuns": {
                "type": "OBJECT",
                "properties": {
                    "min": { "type": "NUMBER" },
                    "max": { "type": "NUMBER" },
                    "avg": { "type": "NUMBER" }
                },
                "required": ["min", "max", "avg"]
            },
            "strikeRate": { "type": "NUMBER" },
            "probabilityOfThirty": { "type": "NUMBER" },
            "probabilityOfFifty": { "type": "NUMBER" },
            "probabilityOfHundred": { "type": "NUMBER" },
            "performanceAgainstPace": { "type": "NUMBER" },
            "performanceAgainstSpin": { "type": "NUMBER" },
            "primaryThreat": { "type": "STRING" },
            "riskLevel": { "type": "STRING", "enum": ["Low", "Medium", "High"] },
            "keyInsights": {
                "type": "ARRAY",
                "items": { "type": "STRING" }
            },
            "phasedAnalysis": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "phase": { "type": "STRING" },
                        "expectedRuns": { "type": "NUMBER" },
                        "intensity": { "type": "NUMBER" }
                    },
                    "required": ["phase", "expectedRuns", "intensity"]
                }
            },
            "technicalAdvice": { "type": "STRING" }
        },
        "required": REQUIRED_FIELDS
    })
});

/// Response contract sent with every request.
pub fn response_schema() -> &'static Value {
    &RESPONSE_SCHEMA
}

pub fn render_prompt(inputs: &PredictionInputs) -> String {
    format!(
        "Act as a World-Class Cricket Performance Analyst using data-driven scouting.
Predict the performance for {name} with this elite context:
- Match: {format} ({match_type})
- Opponent: {opponent}
- Venue: {ground} (Pitch: {pitch})
- Weather: {conditions}
- Player Role: {role} at Pos #{order}
- Context: {toss} under {pressure} pressure.
- Form: {form}

Calculate realistic probabilities based on historical matchups between {name} and {opponent}'s typical bowling attack composition.",
        name = inputs.batsman_name,
        format = inputs.match_format.label(),
        match_type = inputs.match_type.label(),
        opponent = inputs.opponent_team.label(),
        ground = inputs.ground,
        pitch = inputs.pitch_nature.label(),
        conditions = inputs.conditions.label(),
        role = inputs.player_role.label(),
        order = inputs.batting_order,
        toss = inputs.toss_context.label(),
        pressure = inputs.pressure_level.label(),
        form = inputs.recent_form.label(),
    )
}

/// `generateContent` body: one user turn plus the JSON response contract.
pub fn build_request_body(inputs: &PredictionInputs) -> Value {
    json!({
        "contents": [
            {
                "role": "user",
                "parts": [{ "text": render_prompt(inputs) }]
            }
        ],
        "generationConfig": {
            "responseMimeType": "application/json",
            "responseSchema": response_schema()
        }
    })
}
