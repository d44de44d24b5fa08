//! DrawResult and its grouping views.

use crate::models::game::{Bye, Match, MatchId};
use crate::models::participant::{Participant, ParticipantId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Matches sharing a round index. Refers to matches by id; the flat list owns them.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Round {
    pub index: u32,
    pub match_ids: Vec<MatchId>,
}

/// A sub-group of the field (round-robin group, league-phase pot).
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub id: String,
    pub name: String,
    pub participant_ids: Vec<ParticipantId>,
    /// Matches played inside the group (empty for pots).
    pub match_ids: Vec<MatchId>,
}

/// Output of one scheduler call. Read-only once returned.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct DrawResult {
    pub matches: Vec<Match>,
    pub rounds: Vec<Round>,
    pub groups: Vec<Group>,
    /// Round-1 walkovers of an elimination bracket.
    pub byes: Vec<Bye>,
    /// Stand-ins for participants decided by an earlier stage (e.g. "A#1").
    pub placeholders: Vec<Participant>,
    pub description: String,
}

impl DrawResult {
    pub fn get_match(&self, id: &str) -> Option<&Match> {
        self.matches.iter().find(|m| m.id == id)
    }

    /// Matches of one round, in round order.
    pub fn round_matches(&self, index: u32) -> Vec<&Match> {
        let by_id: HashMap<&str, &Match> =
            self.matches.iter().map(|m| (m.id.as_str(), m)).collect();
        self.rounds
            .iter()
            .filter(|r| r.index == index)
            .flat_map(|r| r.match_ids.iter())
            .filter_map(|id| by_id.get(id.as_str()).copied())
            .collect()
    }

    /// Matches in which `participant` plays.
    pub fn matches_of<'a>(&'a self, participant: &'a str) -> impl Iterator<Item = &'a Match> + 'a {
        self.matches.iter().filter(move |m| m.involves(participant))
    }

    /// Plain-text rendering: description, groups, then every round.
    /// Undetermined slots show which matches feed them.
    pub fn render(&self, roster: &[Participant]) -> String {
        let names: HashMap<&str, &str> = roster
            .iter()
            .chain(self.placeholders.iter())
            .map(|p| (p.id.as_str(), p.name.as_str()))
            .collect();
        let name_of = |id: &str| names.get(id).copied().unwrap_or(id).to_string();

        let mut lines = vec![self.description.clone(), String::new()];
        if !self.groups.is_empty() {
            for g in &self.groups {
                let members: Vec<String> = g
                    .participant_ids
                    .iter()
                    .map(|id| name_of(id.as_str()))
                    .collect();
                lines.push(format!("{}: {}", g.name, members.join(", ")));
            }
            lines.push(String::new());
        }
        if !self.byes.is_empty() {
            let bye_names: Vec<String> = self
                .byes
                .iter()
                .map(|b| name_of(b.participant.as_str()))
                .collect();
            lines.push(format!("Byes: {}", bye_names.join(", ")));
            lines.push(String::new());
        }
        for round in &self.rounds {
            lines.push(format!("--- Round {} ---", round.index));
            for m in self.round_matches(round.index) {
                lines.push(format!("  [{}] {}", m.id, self.describe_match(m, &name_of)));
            }
            lines.push(String::new());
        }
        lines.join("\n")
    }

    fn describe_match(&self, m: &Match, name_of: &dyn Fn(&str) -> String) -> String {
        if let Some((a, b)) = m.sides() {
            return format!("{} vs {}", name_of(a), name_of(b));
        }
        let mut feeders: Vec<String> = self
            .byes
            .iter()
            .filter(|b| b.advances_to.as_deref() == Some(m.id.as_str()))
            .map(|b| name_of(b.participant.as_str()))
            .collect();
        let target = Some(m.id.as_str());
        let mut sources: Vec<(&str, &str)> = Vec::new();
        for s in &self.matches {
            if s.advances_to.as_deref() == target {
                sources.push((s.id.as_str(), "Winner"));
            }
            if s.loser_advances_to.as_deref() == target {
                sources.push((s.id.as_str(), "Loser"));
            }
        }
        sources.sort();
        feeders.extend(
            sources
                .iter()
                .map(|(id, side)| format!("{} of {}", side, id)),
        );
        match feeders.len() {
            0 => "? vs ?".to_string(),
            1 => format!("{} vs ?", feeders[0]),
            _ => feeders.join(" vs "),
        }
    }
}
