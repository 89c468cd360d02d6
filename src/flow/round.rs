//! Round configuration and validation

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    error::FlowError,
    timer::{minutes_to_ms, Side},
};

/// Kind of timer a round runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RoundKind {
    Normal,
    Chess,
}

/// Round config as supplied by the flow editor, before validation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundConfig {
    #[serde(default)]
    pub id: Option<String>,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: RoundKind,
    pub duration_minutes: i64,
    #[serde(default)]
    pub speaker: Option<Side>,
}

/// A validated round, immutable once created
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Round {
    pub id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: RoundKind,
    pub duration_minutes: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speaker: Option<Side>,
}

impl Round {
    pub fn normal(id: &str, title: &str, duration_minutes: u32, speaker: Side) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            kind: RoundKind::Normal,
            duration_minutes,
            speaker: Some(speaker),
        }
    }

    pub fn chess(id: &str, title: &str, duration_minutes: u32) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            kind: RoundKind::Chess,
            duration_minutes,
            speaker: None,
        }
    }

    pub fn duration_ms(&self) -> u64 {
        minutes_to_ms(self.duration_minutes)
    }
}

impl RoundConfig {
    /// Validate into a [`Round`], generating an id when none was given.
    ///
    /// A normal round without a speaker is assigned side A; a chess round's
    /// speaker is dropped.
    pub fn into_round(self) -> Result<Round, FlowError> {
        let title = self.title.trim().to_string();
        if title.is_empty() {
            return Err(FlowError::InvalidRound("title must not be empty".to_string()));
        }
        if self.duration_minutes < 1 {
            return Err(FlowError::InvalidRound(format!(
                "durationMinutes must be at least 1, got {}",
                self.duration_minutes
            )));
        }
        let duration_minutes = u32::try_from(self.duration_minutes).map_err(|_| {
            FlowError::InvalidRound(format!(
                "durationMinutes is too large: {}",
                self.duration_minutes
            ))
        })?;

        let id = match self.id {
            Some(id) if !id.trim().is_empty() => id,
            _ => Uuid::new_v4().to_string(),
        };

        let speaker = match self.kind {
            RoundKind::Normal => Some(self.speaker.unwrap_or(Side::A)),
            RoundKind::Chess => None,
        };

        Ok(Round {
            id,
            title,
            kind: self.kind,
            duration_minutes,
            speaker,
        })
    }
}

/// The standard five-round debate format
pub fn standard_template() -> Vec<Round> {
    vec![
        Round::normal("1", "Affirmative Opening", 4, Side::A),
        Round::normal("2", "Negative Opening", 4, Side::B),
        Round::chess("3", "Free Debate", 3),
        Round::normal("4", "Negative Closing", 3, Side::B),
        Round::normal("5", "Affirmative Closing", 3, Side::A),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(json: &str) -> RoundConfig {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn parses_flow_editor_json() {
        let round = config(
            r#"{"id":"r1","title":"Opening","type":"NORMAL","durationMinutes":4,"speaker":"B"}"#,
        )
        .into_round()
        .unwrap();
        assert_eq!(round, Round::normal("r1", "Opening", 4, Side::B));
        assert_eq!(round.duration_ms(), 240_000);
    }

    #[test]
    fn generates_missing_ids() {
        let round = config(r#"{"title":"Free","type":"CHESS","durationMinutes":3}"#)
            .into_round()
            .unwrap();
        assert!(Uuid::parse_str(&round.id).is_ok());
        assert_eq!(round.kind, RoundKind::Chess);
    }

    #[test]
    fn normal_round_defaults_to_side_a_and_chess_drops_speaker() {
        let normal = config(r#"{"title":"x","type":"NORMAL","durationMinutes":2}"#)
            .into_round()
            .unwrap();
        assert_eq!(normal.speaker, Some(Side::A));

        let chess = config(r#"{"title":"x","type":"CHESS","durationMinutes":2,"speaker":"B"}"#)
            .into_round()
            .unwrap();
        assert_eq!(chess.speaker, None);
    }

    #[test]
    fn rejects_non_positive_minutes_and_blank_titles() {
        let zero = config(r#"{"title":"x","type":"NORMAL","durationMinutes":0}"#).into_round();
        assert!(matches!(zero, Err(FlowError::InvalidRound(_))));

        let blank = config(r#"{"title":"  ","type":"NORMAL","durationMinutes":3}"#).into_round();
        assert!(matches!(blank, Err(FlowError::InvalidRound(_))));
    }

    #[test]
    fn serializes_with_wire_field_names() {
        let value = serde_json::to_value(Round::chess("3", "Free Debate", 3)).unwrap();
        assert_eq!(value["type"], "CHESS");
        assert_eq!(value["durationMinutes"], 3);
        assert!(value.get("speaker").is_none());
    }

    #[test]
    fn template_has_one_free_debate_round() {
        let template = standard_template();
        assert_eq!(template.len(), 5);
        let chess: Vec<_> = template.iter().filter(|r| r.kind == RoundKind::Chess).collect();
        assert_eq!(chess.len(), 1);
        assert_eq!(chess[0].duration_minutes, 3);
    }
}
