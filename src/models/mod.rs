//! Data structures for draws: participants, matches, rounds, groups, options and errors.

mod draw;
mod error;
mod game;
mod options;
mod participant;

pub use draw::{DrawResult, Group, Round};
pub use error::{ConfigError, DrawError, ScheduleError};
pub use game::{BracketSegment, Bye, Match, MatchId};
pub use options::{
    BracketOptions, Elimination, FormulaOptions, LeaguePhaseOptions, RoundRobinOptions,
};
pub use participant::{check_roster, Participant, ParticipantId};
