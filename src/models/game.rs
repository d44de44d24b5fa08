//! Match, BracketSegment and Bye.

use crate::models::participant::ParticipantId;
use serde::{Deserialize, Serialize};

/// Identifier of a match, unique within one draw result (e.g. `M3`, `U-M1`, `R2-M4`).
pub type MatchId = String;

/// Which part of an elimination structure a match belongs to.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BracketSegment {
    #[default]
    Upper,
    Lower,
    Final,
}

/// A single scheduled match.
///
/// Either side may be empty: a placeholder for a slot decided by an earlier match.
/// In round-robin and league-phase draws `participant_a` is the home side.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub id: MatchId,
    pub participant_a: Option<ParticipantId>,
    pub participant_b: Option<ParticipantId>,
    /// 1-based.
    pub round_index: u32,
    pub segment: BracketSegment,
    pub group_id: Option<String>,
    pub leg_number: Option<u32>,
    /// Match the winner of this one plays next.
    pub advances_to: Option<MatchId>,
    /// Match the loser of this one drops into (multi-elimination only).
    pub loser_advances_to: Option<MatchId>,
}

impl Match {
    pub fn new(id: impl Into<MatchId>, round_index: u32, segment: BracketSegment) -> Self {
        Self {
            id: id.into(),
            participant_a: None,
            participant_b: None,
            round_index,
            segment,
            group_id: None,
            leg_number: None,
            advances_to: None,
            loser_advances_to: None,
        }
    }

    /// A match with both sides known.
    pub fn pairing(
        id: impl Into<MatchId>,
        round_index: u32,
        a: ParticipantId,
        b: ParticipantId,
    ) -> Self {
        Self {
            participant_a: Some(a),
            participant_b: Some(b),
            ..Self::new(id, round_index, BracketSegment::Upper)
        }
    }

    /// True if `id` plays on either side.
    pub fn involves(&self, id: &str) -> bool {
        self.participant_a.as_deref() == Some(id) || self.participant_b.as_deref() == Some(id)
    }

    /// Both sides, when both are known.
    pub fn sides(&self) -> Option<(&str, &str)> {
        match (&self.participant_a, &self.participant_b) {
            (Some(a), Some(b)) => Some((a.as_str(), b.as_str())),
            _ => None,
        }
    }
}

/// A round-1 walkover: the participant has no opponent and moves straight on.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Bye {
    pub participant: ParticipantId,
    /// Round-2 match the participant is carried into (`None` in a 2-slot bracket).
    pub advances_to: Option<MatchId>,
}
