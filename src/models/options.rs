//! Per-format draw options. All fields have defaults so partial JSON bodies work.

use serde::{Deserialize, Serialize};

/// How many losses knock a participant out.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Elimination {
    #[default]
    Single,
    Double,
    Triple,
}

impl Elimination {
    /// Number of lower tiers below the upper bracket.
    pub fn lower_tiers(self) -> usize {
        match self {
            Elimination::Single => 0,
            Elimination::Double => 1,
            Elimination::Triple => 2,
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BracketOptions {
    /// Seed for the draw of unseeded participants. `None` = non-reproducible.
    pub seed: Option<u64>,
    pub seeded: bool,
    /// Participants placed by the fixed seeding ladder; the rest are drawn.
    /// `None` with seeding on places the whole field on the ladder.
    pub num_seeded: Option<usize>,
    pub elimination: Elimination,
}

impl Default for BracketOptions {
    fn default() -> Self {
        Self {
            seed: None,
            seeded: true,
            num_seeded: None,
            elimination: Elimination::Single,
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoundRobinOptions {
    pub seed: Option<u64>,
    /// Order by seed rank instead of shuffling before pairing.
    pub seeded: bool,
    /// Full passes over the schedule; even legs swap home and away.
    pub legs: u32,
}

impl Default for RoundRobinOptions {
    fn default() -> Self {
        Self {
            seed: None,
            seeded: false,
            legs: 1,
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LeaguePhaseOptions {
    /// Matches per participant; pots hold `rounds + 1` participants.
    pub rounds: usize,
    pub seed: Option<u64>,
    /// Reject draws pairing two participants of the same country.
    pub country_lock: bool,
    /// Most opponents one participant may face from a single country. 0 = no limit.
    pub max_per_country: usize,
}

impl Default for LeaguePhaseOptions {
    fn default() -> Self {
        Self {
            rounds: 8,
            seed: None,
            country_lock: false,
            max_per_country: 2,
        }
    }
}

/// Options shared by every stage of a multi-stage formula.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormulaOptions {
    pub seed: Option<u64>,
    /// Seed-ordered group distribution and brackets (otherwise shuffled).
    pub seeded: bool,
    pub num_seeded: Option<usize>,
    pub league: LeaguePhaseOptions,
}

impl Default for FormulaOptions {
    fn default() -> Self {
        Self {
            seed: None,
            seeded: true,
            num_seeded: None,
            league: LeaguePhaseOptions::default(),
        }
    }
}
