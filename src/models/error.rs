//! Errors raised by the draw schedulers.

use crate::models::participant::ParticipantId;

/// Invalid or out-of-range draw parameters, detected before any scheduling work.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ConfigError {
    /// The format needs more participants than were supplied.
    NotEnoughParticipants { required: usize, got: usize },
    /// Two participants share an id.
    DuplicateParticipant(ParticipantId),
    /// More seeded participants requested than there are participants.
    SeedCountOutOfRange { num_seeded: usize, participants: usize },
    /// Bracket seed order only exists for powers of two.
    NotPowerOfTwo(usize),
    ZeroLegs,
    ZeroGroups,
    ZeroRounds,
    /// Splitting into groups would leave a group with fewer than two participants.
    TooFewForGroups { groups: usize, participants: usize },
    /// League phase needs an even field (every round is a perfect pairing).
    OddFieldSize(usize),
    FieldNotDivisibleByPotSize { participants: usize, pot_size: usize },
    RoundsNotDivisibleByPots { rounds: usize, pots: usize },
    /// A pot of this size cannot give every member `per_pot` opponents from the same pot.
    OddPotQuota { pot_size: usize, per_pot: usize },
    /// `top(k)` asks for more places than the smallest group has.
    AdvanceExceedsGroup { advance: usize, smallest_group: usize },
    InvalidFormula(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::NotEnoughParticipants { required, got } => {
                write!(f, "Need at least {} participants (got {})", required, got)
            }
            ConfigError::DuplicateParticipant(id) => {
                write!(f, "Participant id '{}' is used more than once", id)
            }
            ConfigError::SeedCountOutOfRange {
                num_seeded,
                participants,
            } => write!(
                f,
                "Cannot seed {} participants in a field of {}",
                num_seeded, participants
            ),
            ConfigError::NotPowerOfTwo(n) => write!(f, "Bracket size {} is not a power of two", n),
            ConfigError::ZeroLegs => write!(f, "Round robin needs at least one leg"),
            ConfigError::ZeroGroups => write!(f, "Need at least one group"),
            ConfigError::ZeroRounds => write!(f, "League phase needs at least one round"),
            ConfigError::TooFewForGroups {
                groups,
                participants,
            } => write!(
                f,
                "Need at least {} participants for {} groups (got {})",
                groups * 2,
                groups,
                participants
            ),
            ConfigError::OddFieldSize(n) => write!(
                f,
                "League phase needs an even number of participants (got {})",
                n
            ),
            ConfigError::FieldNotDivisibleByPotSize {
                participants,
                pot_size,
            } => write!(
                f,
                "{} participants cannot be split into pots of {} (rounds + 1)",
                participants, pot_size
            ),
            ConfigError::RoundsNotDivisibleByPots { rounds, pots } => write!(
                f,
                "{} rounds cannot be shared evenly across {} pots",
                rounds, pots
            ),
            ConfigError::OddPotQuota { pot_size, per_pot } => write!(
                f,
                "Pots of {} cannot give every team {} opponents from its own pot; choose another round count",
                pot_size, per_pot
            ),
            ConfigError::AdvanceExceedsGroup {
                advance,
                smallest_group,
            } => write!(
                f,
                "Cannot advance {} per group when the smallest group has {}",
                advance, smallest_group
            ),
            ConfigError::InvalidFormula(msg) => write!(f, "Invalid formula: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

/// The constructed pairings cannot be turned into a valid schedule.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ScheduleError {
    /// Pairings left over after trying to fit them into `rounds` conflict-free rounds.
    RoundAssignmentFailed { rounds: usize, unassigned: usize },
    /// Country lock is on and two participants from the same country were paired.
    CountryLockViolated {
        first: ParticipantId,
        second: ParticipantId,
        country: String,
    },
    /// A participant faces more opponents from one country than allowed.
    CountryLimitExceeded {
        participant: ParticipantId,
        country: String,
        count: usize,
        max: usize,
    },
}

impl std::fmt::Display for ScheduleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScheduleError::RoundAssignmentFailed { rounds, unassigned } => write!(
                f,
                "Could not fit the pairings into {} rounds ({} left over); try another round count or field size",
                rounds, unassigned
            ),
            ScheduleError::CountryLockViolated {
                first,
                second,
                country,
            } => write!(
                f,
                "Country lock: {} and {} are both from {}; disable the lock or spread countries across pots",
                first, second, country
            ),
            ScheduleError::CountryLimitExceeded {
                participant,
                country,
                count,
                max,
            } => write!(
                f,
                "{} faces {} opponents from {} (max {}); raise the limit or spread countries across pots",
                participant, count, country, max
            ),
        }
    }
}

impl std::error::Error for ScheduleError {}

/// Any failure of a draw request.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DrawError {
    Config(ConfigError),
    Schedule(ScheduleError),
}

impl std::fmt::Display for DrawError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DrawError::Config(e) => write!(f, "{}", e),
            DrawError::Schedule(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for DrawError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DrawError::Config(e) => Some(e),
            DrawError::Schedule(e) => Some(e),
        }
    }
}

impl From<ConfigError> for DrawError {
    fn from(e: ConfigError) -> Self {
        DrawError::Config(e)
    }
}

impl From<ScheduleError> for DrawError {
    fn from(e: ScheduleError) -> Self {
        DrawError::Schedule(e)
    }
}
