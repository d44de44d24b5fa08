//! Participant data structure and roster checks.

use crate::models::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Caller-assigned identifier for a participant (used in matches and lookups).
pub type ParticipantId = String;

/// An entrant in a draw. Created once by the caller; schedulers never mutate it.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Participant {
    pub id: ParticipantId,
    pub name: String,
    /// 1 = strongest. Unranked participants sort after all ranked ones.
    #[serde(default, alias = "seed")]
    pub seed_rank: Option<u32>,
    /// Used by the league-phase country checks.
    #[serde(default, alias = "country")]
    pub country_code: Option<String>,
}

impl Participant {
    pub fn new(id: impl Into<ParticipantId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            seed_rank: None,
            country_code: None,
        }
    }

    /// Same participant with a seed rank.
    pub fn with_seed(mut self, rank: u32) -> Self {
        self.seed_rank = Some(rank);
        self
    }

    /// Same participant with a country code.
    pub fn with_country(mut self, code: impl Into<String>) -> Self {
        self.country_code = Some(code.into());
        self
    }

    /// Country code, ignoring blank values.
    pub fn country(&self) -> Option<&str> {
        self.country_code
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
    }
}

/// Reject rosters that are too small or reuse an id.
pub fn check_roster(participants: &[Participant], required: usize) -> Result<(), ConfigError> {
    if participants.len() < required {
        return Err(ConfigError::NotEnoughParticipants {
            required,
            got: participants.len(),
        });
    }
    let mut seen = HashSet::with_capacity(participants.len());
    for p in participants {
        if !seen.insert(p.id.as_str()) {
            return Err(ConfigError::DuplicateParticipant(p.id.clone()));
        }
    }
    Ok(())
}
