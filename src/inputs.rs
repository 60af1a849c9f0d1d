use thiserror::Error;

use crate::catalog::{
    Conditions, FormLevel, MatchFormat, MatchType, PitchNature, PlayerRole, PressureLevel, Team,
    TossContext,
};

pub const DEFAULT_BATTING_ORDER: u8 = 3;
pub const MIN_BATTING_ORDER: u8 = 1;
pub const MAX_BATTING_ORDER: u8 = 11;

/// One submitted scenario. Built only by [`InputForm::submit`] and never mutated after.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PredictionInputs {
    pub batsman_name: String,
    pub opponent_team: Team,
    pub ground: String,
    pub conditions: Conditions,
    pub match_format: MatchFormat,
    pub batting_order: u8,
    pub toss_context: TossContext,
    pub recent_form: FormLevel,
    pub pitch_nature: PitchNature,
    pub match_type: MatchType,
    pub player_role: PlayerRole,
    pub pressure_level: PressureLevel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("batsman name is required")]
    MissingBatsmanName,
    #[error("venue is required")]
    MissingGround,
}

impl FormError {
    pub fn field(self) -> FormField {
        match self {
            FormError::MissingBatsmanName => FormField::BatsmanName,
            FormError::MissingGround => FormField::Ground,
        }
    }
}

/// Form rows in on-screen order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormField {
    BatsmanName,
    MatchFormat,
    OpponentTeam,
    Ground,
    PitchNature,
    MatchType,
    Conditions,
    PlayerRole,
    RecentForm,
    BattingOrder,
    PressureLevel,
    TossContext,
}

impl FormField {
    pub const ALL: [FormField; 12] = [
        FormField::BatsmanName,
        FormField::MatchFormat,
        FormField::OpponentTeam,
        FormField::Ground,
        FormField::PitchNature,
        FormField::MatchType,
        FormField::Conditions,
        FormField::PlayerRole,
        FormField::RecentForm,
        FormField::BattingOrder,
        FormField::PressureLevel,
        FormField::TossContext,
    ];

    pub fn label(self) -> &'static str {
        match self {
            FormField::BatsmanName => "Batsman Name",
            FormField::MatchFormat => "Format",
            FormField::OpponentTeam => "Opponent",
            FormField::Ground => "Venue / Ground",
            FormField::PitchNature => "Pitch Type",
            FormField::MatchType => "Match Type",
            FormField::Conditions => "Conditions",
            FormField::PlayerRole => "Role",
            FormField::RecentForm => "Recent Form",
            FormField::BattingOrder => "Batting Pos",
            FormField::PressureLevel => "Pressure",
            FormField::TossContext => "Toss",
        }
    }

    pub fn is_text(self) -> bool {
        matches!(self, FormField::BatsmanName | FormField::Ground)
    }

    fn index(self) -> usize {
        Self::ALL.iter().position(|f| *f == self).unwrap_or(0)
    }

    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        let len = Self::ALL.len();
        Self::ALL[(self.index() + len - 1) % len]
    }
}

/// Live form state. Editing never validates; only [`InputForm::submit`] does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputForm {
    pub batsman_name: String,
    pub opponent_team: Team,
    pub ground: String,
    pub conditions: Conditions,
    pub match_format: MatchFormat,
    pub batting_order: u8,
    pub toss_context: TossContext,
    pub recent_form: FormLevel,
    pub pitch_nature: PitchNature,
    pub match_type: MatchType,
    pub player_role: PlayerRole,
    pub pressure_level: PressureLevel,
    pub focus: FormField,
}

impl Default for InputForm {
    fn default() -> Self {
        Self::new()
    }
}

impl InputForm {
    pub fn new() -> Self {
        Self {
            batsman_name: String::new(),
            opponent_team: Team::default(),
            ground: String::new(),
            conditions: Conditions::default(),
            match_format: MatchFormat::default(),
            batting_order: DEFAULT_BATTING_ORDER,
            toss_context: TossContext::default(),
            recent_form: FormLevel::default(),
            pitch_nature: PitchNature::default(),
            match_type: MatchType::default(),
            player_role: PlayerRole::default(),
            pressure_level: PressureLevel::default(),
            focus: FormField::BatsmanName,
        }
    }

    /// Snapshot the form into an immutable record. Fails when either required
    /// free-text field is blank; the form itself is left untouched either way.
    pub fn submit(&self) -> Result<PredictionInputs, Vec<FormError>> {
        let errors = self.validate();
        if !errors.is_empty() {
            return Err(errors);
        }
        Ok(PredictionInputs {
            batsman_name: self.batsman_name.clone(),
            opponent_team: self.opponent_team,
            ground: self.ground.clone(),
            conditions: self.conditions,
            match_format: self.match_format,
            batting_order: self.batting_order,
            toss_context: self.toss_context,
            recent_form: self.recent_form,
            pitch_nature: self.pitch_nature,
            match_type: self.match_type,
            player_role: self.player_role,
            pressure_level: self.pressure_level,
        })
    }

    pub fn validate(&self) -> Vec<FormError> {
        let mut errors = Vec::new();
        if self.batsman_name.trim().is_empty() {
            errors.push(FormError::MissingBatsmanName);
        }
        if self.ground.trim().is_empty() {
            errors.push(FormError::MissingGround);
        }
        errors
    }

    pub fn focus_next(&mut self) {
        self.focus = self.focus.next();
    }

    pub fn focus_prev(&mut self) {
        self.focus = self.focus.prev();
    }

    pub fn push_char(&mut self, ch: char) {
        if let Some(text) = self.focused_text_mut() {
            text.push(ch);
        }
    }

    pub fn pop_char(&mut self) {
        if let Some(text) = self.focused_text_mut() {
            text.pop();
        }
    }

    /// Right arrow: next option, or one batting position down the order.
    pub fn cycle_next(&mut self) {
        match self.focus {
            FormField::BatsmanName | FormField::Ground => {}
            FormField::MatchFormat => self.match_format = self.match_format.next(),
            FormField::OpponentTeam => self.opponent_team = self.opponent_team.next(),
            FormField::PitchNature => self.pitch_nature = self.pitch_nature.next(),
            FormField::MatchType => self.match_type = self.match_type.next(),
            FormField::Conditions => self.conditions = self.conditions.next(),
            FormField::PlayerRole => self.player_role = self.player_role.next(),
            FormField::RecentForm => self.recent_form = self.recent_form.next(),
            FormField::BattingOrder => {
                self.batting_order = self.batting_order.saturating_add(1).min(MAX_BATTING_ORDER)
            }
            FormField::PressureLevel => self.pressure_level = self.pressure_level.next(),
            FormField::TossContext => self.toss_context = self.toss_context.next(),
        }
    }

    pub fn cycle_prev(&mut self) {
        match self.focus {
            FormField::BatsmanName | FormField::Ground => {}
            FormField::MatchFormat => self.match_format = self.match_format.prev(),
            FormField::OpponentTeam => self.opponent_team = self.opponent_team.prev(),
            FormField::PitchNature => self.pitch_nature = self.pitch_nature.prev(),
            FormField::MatchType => self.match_type = self.match_type.prev(),
            FormField::Conditions => self.conditions = self.conditions.prev(),
            FormField::PlayerRole => self.player_role = self.player_role.prev(),
            FormField::RecentForm => self.recent_form = self.recent_form.prev(),
            FormField::BattingOrder => {
                self.batting_order = self
                    .batting_order
                    .saturating_sub(1)
                    .max(MIN_BATTING_ORDER)
            }
            FormField::PressureLevel => self.pressure_level = self.pressure_level.prev(),
            FormField::TossContext => self.toss_context = self.toss_context.prev(),
        }
    }

    /// Display value for a form row.
    pub fn value_text(&self, field: FormField) -> String {
        match field {
            FormField::BatsmanName => self.batsman_name.clone(),
            FormField::MatchFormat => self.match_format.label().to_string(),
            FormField::OpponentTeam => self.opponent_team.label().to_string(),
            FormField::Ground => self.ground.clone(),
            FormField::PitchNature => self.pitch_nature.label().to_string(),
            FormField::MatchType => self.match_type.label().to_string(),
            FormField::Conditions => self.conditions.label().to_string(),
            FormField::PlayerRole => self.player_role.label().to_string(),
            FormField::RecentForm => self.recent_form.label().to_string(),
            FormField::BattingOrder => self.batting_order.to_string(),
            FormField::PressureLevel => self.pressure_level.label().to_string(),
            FormField::TossContext => self.toss_context.label().to_string(),
        }
    }

    fn focused_text_mut(&mut self) -> Option<&mut String> {
        match self.focus {
            FormField::BatsmanName => Some(&mut self.batsman_name),
            FormField::Ground => Some(&mut self.ground),
            _ => None,
        }
    }
}
