//! Guided symptom form.
//!
//! An alternative to free text: the user answers a few fixed questions and
//! [`SymptomForm::to_description`] turns the answers into the description
//! the symptom pipeline reads.

use crate::errors::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Severity assumed when the user does not rate it.
pub const DEFAULT_SEVERITY: u8 = 5;

/// Lowercases and dashes a value so `"All day"`, `"all_day"` and `"ALL-DAY"` compare equal.
fn choice_key(value: &str) -> String {
    value
        .trim()
        .to_lowercase()
        .split(|c: char| c.is_whitespace() || c == '_' || c == '-')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

/// Matches `value` against each choice's label and short token.
fn parse_choice<T: Copy>(
    field: &'static str,
    value: &str,
    choices: &[T],
    label: fn(&T) -> &'static str,
    token: fn(&T) -> &'static str,
) -> Result<T, ValidationError> {
    let key = choice_key(value);
    choices
        .iter()
        .find(|c| key == choice_key(label(c)) || key == token(c))
        .copied()
        .ok_or_else(|| ValidationError::UnknownChoice {
            field,
            value: value.to_string(),
            expected: choices.iter().map(token).collect::<Vec<_>>().join(", "),
        })
}

/// How long the main symptom has lasted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SymptomDuration {
    /// Started today.
    LessThanADay,
    /// One to three days.
    OneToThreeDays,
    /// Four to seven days.
    FourToSevenDays,
    /// One to two weeks.
    OneToTwoWeeks,
    /// Longer than two weeks.
    MoreThanTwoWeeks,
}

impl SymptomDuration {
    /// Every bucket, shortest first.
    pub const ALL: [Self; 5] = [
        Self::LessThanADay,
        Self::OneToThreeDays,
        Self::FourToSevenDays,
        Self::OneToTwoWeeks,
        Self::MoreThanTwoWeeks,
    ];

    /// Label written into the description.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::LessThanADay => "Less than 1 day",
            Self::OneToThreeDays => "1-3 days",
            Self::FourToSevenDays => "4-7 days",
            Self::OneToTwoWeeks => "1-2 weeks",
            Self::MoreThanTwoWeeks => "More than 2 weeks",
        }
    }

    /// Short command-line token.
    #[must_use]
    pub fn token(&self) -> &'static str {
        match self {
            Self::LessThanADay => "under-1-day",
            Self::OneToThreeDays => "1-3-days",
            Self::FourToSevenDays => "4-7-days",
            Self::OneToTwoWeeks => "1-2-weeks",
            Self::MoreThanTwoWeeks => "over-2-weeks",
        }
    }
}

impl fmt::Display for SymptomDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for SymptomDuration {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_choice("duration", s, &Self::ALL, Self::label, Self::token)
    }
}

/// Part of the body the symptom affects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[allow(missing_docs)]
pub enum BodyArea {
    Head,
    Neck,
    Chest,
    Back,
    Abdomen,
    Arms,
    Legs,
    Other,
}

impl BodyArea {
    /// Every area, in form order.
    pub const ALL: [Self; 8] = [
        Self::Head,
        Self::Neck,
        Self::Chest,
        Self::Back,
        Self::Abdomen,
        Self::Arms,
        Self::Legs,
        Self::Other,
    ];

    /// Label written into the description.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Head => "Head",
            Self::Neck => "Neck",
            Self::Chest => "Chest",
            Self::Back => "Back",
            Self::Abdomen => "Abdomen",
            Self::Arms => "Arms",
            Self::Legs => "Legs",
            Self::Other => "Other",
        }
    }

    fn token(&self) -> &'static str {
        match self {
            Self::Head => "head",
            Self::Neck => "neck",
            Self::Chest => "chest",
            Self::Back => "back",
            Self::Abdomen => "abdomen",
            Self::Arms => "arms",
            Self::Legs => "legs",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for BodyArea {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for BodyArea {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_choice("body area", s, &Self::ALL, Self::label, Self::token)
    }
}

/// When during the day the symptom shows up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[allow(missing_docs)]
pub enum SymptomTiming {
    Morning,
    Afternoon,
    Evening,
    Night,
    AllDay,
}

impl SymptomTiming {
    /// Every option, in form order.
    pub const ALL: [Self; 5] = [
        Self::Morning,
        Self::Afternoon,
        Self::Evening,
        Self::Night,
        Self::AllDay,
    ];

    /// Label written into the description.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Morning => "Morning",
            Self::Afternoon => "Afternoon",
            Self::Evening => "Evening",
            Self::Night => "Night",
            Self::AllDay => "All day",
        }
    }

    fn token(&self) -> &'static str {
        match self {
            Self::Morning => "morning",
            Self::Afternoon => "afternoon",
            Self::Evening => "evening",
            Self::Night => "night",
            Self::AllDay => "all-day",
        }
    }
}

impl fmt::Display for SymptomTiming {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for SymptomTiming {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_choice("timing", s, &Self::ALL, Self::label, Self::token)
    }
}

/// Answers to the guided symptom questions.
///
/// Only the main symptom is required. Unanswered questions still appear in
/// the description, with an empty value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymptomForm {
    /// The symptom that bothers the user most.
    pub main_symptom: String,
    /// How long it has lasted.
    #[serde(default)]
    pub duration: Option<SymptomDuration>,
    /// Rating from 1 (mild) to 10 (worst).
    #[serde(default = "default_severity")]
    pub severity: u8,
    /// Affected body areas, in the order chosen.
    #[serde(default)]
    pub affected_areas: Vec<BodyArea>,
    /// What makes it worse.
    #[serde(default)]
    pub triggers: String,
    /// When it occurs.
    #[serde(default)]
    pub timing: Option<SymptomTiming>,
    /// Anything else the user noticed.
    #[serde(default)]
    pub associated_symptoms: String,
}

fn default_severity() -> u8 {
    DEFAULT_SEVERITY
}

impl SymptomForm {
    /// Starts a form with the main symptom and default severity.
    #[must_use]
    pub fn new(main_symptom: impl Into<String>) -> Self {
        Self {
            main_symptom: main_symptom.into(),
            duration: None,
            severity: DEFAULT_SEVERITY,
            affected_areas: Vec::new(),
            triggers: String::new(),
            timing: None,
            associated_symptoms: String::new(),
        }
    }

    /// Sets the duration bucket.
    #[must_use]
    pub fn with_duration(mut self, duration: SymptomDuration) -> Self {
        self.duration = Some(duration);
        self
    }

    /// Sets the severity rating.
    #[must_use]
    pub fn with_severity(mut self, severity: u8) -> Self {
        self.severity = severity;
        self
    }

    /// Adds an affected area. Repeats are ignored.
    #[must_use]
    pub fn with_area(mut self, area: BodyArea) -> Self {
        if !self.affected_areas.contains(&area) {
            self.affected_areas.push(area);
        }
        self
    }

    /// Sets what makes the symptom worse.
    #[must_use]
    pub fn with_triggers(mut self, triggers: impl Into<String>) -> Self {
        self.triggers = triggers.into();
        self
    }

    /// Sets when the symptom occurs.
    #[must_use]
    pub fn with_timing(mut self, timing: SymptomTiming) -> Self {
        self.timing = Some(timing);
        self
    }

    /// Sets other symptoms.
    #[must_use]
    pub fn with_associated_symptoms(mut self, symptoms: impl Into<String>) -> Self {
        self.associated_symptoms = symptoms.into();
        self
    }

    /// Renders the answers as a symptom description, one question per line.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::MissingMainSymptom`] for a blank main
    /// symptom and [`ValidationError::SeverityOutOfRange`] for a rating
    /// outside 1 to 10.
    pub fn to_description(&self) -> Result<String, ValidationError> {
        let main_symptom = self.main_symptom.trim();
        if main_symptom.is_empty() {
            return Err(ValidationError::MissingMainSymptom);
        }
        if !(1..=10).contains(&self.severity) {
            return Err(ValidationError::SeverityOutOfRange {
                severity: self.severity,
            });
        }

        let areas = self
            .affected_areas
            .iter()
            .map(BodyArea::label)
            .collect::<Vec<_>>()
            .join(", ");

        Ok(format!(
            "Main symptom: {main_symptom}\n\
             Duration: {}\n\
             Severity: {}/10\n\
             Affected areas: {areas}\n\
             Triggers: {}\n\
             Timing: {}\n\
             Associated symptoms: {}",
            self.duration.as_ref().map_or("", SymptomDuration::label),
            self.severity,
            self.triggers.trim(),
            self.timing.as_ref().map_or("", SymptomTiming::label),
            self.associated_symptoms.trim(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_full_form_description() {
        let form = SymptomForm::new("Headache")
            .with_duration(SymptomDuration::OneToThreeDays)
            .with_severity(7)
            .with_area(BodyArea::Head)
            .with_area(BodyArea::Neck)
            .with_triggers("Bright light")
            .with_timing(SymptomTiming::Afternoon)
            .with_associated_symptoms("Nausea");

        assert_eq!(
            form.to_description().unwrap(),
            "Main symptom: Headache\n\
             Duration: 1-3 days\n\
             Severity: 7/10\n\
             Affected areas: Head, Neck\n\
             Triggers: Bright light\n\
             Timing: Afternoon\n\
             Associated symptoms: Nausea"
        );
    }

    #[test]
    fn test_unanswered_questions_stay_in_layout() {
        let description = SymptomForm::new("  Cough ").to_description().unwrap();
        let lines: Vec<_> = description.lines().collect();

        assert_eq!(lines.len(), 7);
        assert_eq!(lines[0], "Main symptom: Cough");
        assert_eq!(lines[1], "Duration: ");
        assert_eq!(lines[2], "Severity: 5/10");
        assert_eq!(lines[3], "Affected areas: ");
    }

    #[test]
    fn test_form_rejects_bad_answers() {
        assert_eq!(
            SymptomForm::new(" ").to_description(),
            Err(ValidationError::MissingMainSymptom)
        );
        assert_eq!(
            SymptomForm::new("Cough").with_severity(0).to_description(),
            Err(ValidationError::SeverityOutOfRange { severity: 0 })
        );
        assert!(SymptomForm::new("Cough").with_severity(11).to_description().is_err());
        assert!(SymptomForm::new("Cough").with_severity(10).to_description().is_ok());
    }

    #[test]
    fn test_repeated_area_is_kept_once() {
        let form = SymptomForm::new("Pain")
            .with_area(BodyArea::Back)
            .with_area(BodyArea::Back);
        assert_eq!(form.affected_areas, vec![BodyArea::Back]);
    }

    #[test]
    fn test_choices_parse_from_label_or_token() {
        assert_eq!("1-3 days".parse::<SymptomDuration>(), Ok(SymptomDuration::OneToThreeDays));
        assert_eq!("over-2-weeks".parse::<SymptomDuration>(), Ok(SymptomDuration::MoreThanTwoWeeks));
        assert_eq!("Less than 1 day".parse::<SymptomDuration>(), Ok(SymptomDuration::LessThanADay));
        assert_eq!("All day".parse::<SymptomTiming>(), Ok(SymptomTiming::AllDay));
        assert_eq!("all_day".parse::<SymptomTiming>(), Ok(SymptomTiming::AllDay));
        assert_eq!("ABDOMEN".parse::<BodyArea>(), Ok(BodyArea::Abdomen));
    }

    #[test]
    fn test_unknown_choice_lists_options() {
        let err = "noon".parse::<SymptomTiming>().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Unknown timing 'noon'. Expected one of: morning, afternoon, evening, night, all-day."
        );
    }

    #[test]
    fn test_form_deserializes_with_defaults() {
        let form: SymptomForm =
            serde_json::from_str(r#"{"main_symptom": "Rash", "affected_areas": ["arms"]}"#)
                .unwrap();
        assert_eq!(form.severity, DEFAULT_SEVERITY);
        assert_eq!(form.affected_areas, vec![BodyArea::Arms]);
        assert!(form.timing.is_none());
    }
}
