//! Tournament draw generator: library with models and scheduling logic.
//!
//! Three schedulers share one data model:
//! - [`build_bracket`] – single/double/triple elimination with seeding ladder and byes;
//! - [`build_round_robin`] – circle-method round robin over any number of legs;
//! - [`build_league_phase`] – pot-based league phase resolved into conflict-free rounds.
//!
//! [`run_formula`] chains them into multi-stage formats such as
//! `groups(4).round_robin().top(2).knockout()`.

pub mod logic;
pub mod models;

pub use logic::{
    build_bracket, build_league_phase, build_round_robin, parse_formula, run_formula, run_steps,
    seed_order, valid_field_sizes, Cohort, GroupMembers, PotLayout, Step,
};
pub use models::{
    check_roster, BracketOptions, BracketSegment, Bye, ConfigError, DrawError, DrawResult,
    Elimination, FormulaOptions, Group, LeaguePhaseOptions, Match, MatchId, Participant,
    ParticipantId, Round, RoundRobinOptions, ScheduleError,
};
