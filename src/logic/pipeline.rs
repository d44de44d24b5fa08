//! Multi-stage draws: runs a list of [`Step`]s over a cohort of participants.

use crate::logic::bracket::build_bracket;
use crate::logic::formula::{parse_formula, Step};
use crate::logic::league_phase::build_league_phase;
use crate::logic::round_robin::{build_round_robin, circle_schedule};
use crate::logic::rounds_of;
use crate::logic::seed_order::distribute_into_groups;
use crate::models::{
    check_roster, BracketOptions, ConfigError, DrawError, DrawResult, FormulaOptions, Group,
    LeaguePhaseOptions, Participant, RoundRobinOptions,
};

/// What the next step works on: one field, or a list of groups.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Cohort {
    Field(Vec<Participant>),
    Groups(Vec<GroupMembers>),
}

impl Default for Cohort {
    fn default() -> Self {
        Cohort::Field(Vec::new())
    }
}

/// A group while the formula runs; `id` matches the [`Group`] in the result.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct GroupMembers {
    pub id: String,
    pub name: String,
    pub members: Vec<Participant>,
}

impl Cohort {
    fn into_field(self, step: &Step) -> Result<Vec<Participant>, ConfigError> {
        match self {
            Cohort::Field(field) => Ok(field),
            Cohort::Groups(_) => Err(ConfigError::InvalidFormula(format!(
                "{:?} needs a single field; add top(k) after the group stage",
                step
            ))),
        }
    }

    fn into_groups(self, step: &Step) -> Result<Vec<GroupMembers>, ConfigError> {
        match self {
            Cohort::Groups(groups) => Ok(groups),
            Cohort::Field(_) => Err(ConfigError::InvalidFormula(format!(
                "{:?} needs groups; start with groups(n) or split(n)",
                step
            ))),
        }
    }
}

/// Parse `formula` and run it.
pub fn run_formula(
    participants: &[Participant],
    formula: &str,
    options: &FormulaOptions,
) -> Result<DrawResult, DrawError> {
    let steps = parse_formula(formula)?;
    run_steps(participants, &steps, options)
}

/// Run `steps` in order, collecting every stage into one result.
///
/// Group rounds run side by side (matchday `r` of every group is round `r`); later
/// stages are numbered after the rounds already scheduled and get an id prefix.
pub fn run_steps(
    participants: &[Participant],
    steps: &[Step],
    options: &FormulaOptions,
) -> Result<DrawResult, DrawError> {
    check_roster(participants, 2)?;
    if steps.is_empty() {
        return Err(ConfigError::InvalidFormula("no steps".to_string()).into());
    }

    let mut run = Run {
        out: DrawResult::default(),
        offset: 0,
        parts: Vec::new(),
        single_description: None,
    };
    let mut cohort = Cohort::Field(participants.to_vec());

    for (i, step) in steps.iter().enumerate() {
        if i > 0 && steps[i - 1].is_terminal() {
            return Err(
                ConfigError::InvalidFormula(format!("nothing can follow {:?}", steps[i - 1]))
                    .into(),
            );
        }
        let current = std::mem::take(&mut cohort);
        cohort = match step {
            Step::GroupBy(size) => {
                let field = current.into_field(step)?;
                if *size < 2 {
                    return Err(ConfigError::InvalidFormula(
                        "groups(n) needs n of at least 2".to_string(),
                    )
                    .into());
                }
                let count = field.len().div_ceil(*size);
                run.parts.push(format!("groups of {}", size));
                Cohort::Groups(run.form_groups(&field, count, i, options)?)
            }
            Step::SplitInto(count) => {
                let field = current.into_field(step)?;
                run.parts.push(format!("{} groups", count));
                Cohort::Groups(run.form_groups(&field, *count, i, options)?)
            }
            Step::PlayRoundRobin { legs } => {
                if *legs == 0 {
                    return Err(ConfigError::ZeroLegs.into());
                }
                run.parts.push(match legs {
                    1 => "round robin".to_string(),
                    n => format!("round robin x{}", n),
                });
                match current {
                    Cohort::Field(field) => {
                        let result = build_round_robin(
                            &field,
                            &RoundRobinOptions {
                                seed: options.seed,
                                seeded: options.seeded,
                                legs: *legs,
                            },
                        )?;
                        let prefix = run.prefix(&format!("S{}-", i + 1));
                        run.absorb(result, &prefix);
                        Cohort::Field(field)
                    }
                    Cohort::Groups(groups) => {
                        run.play_groups(&groups, *legs);
                        Cohort::Groups(groups)
                    }
                }
            }
            Step::AdvanceTop(k) => {
                let groups = current.into_groups(step)?;
                let smallest = groups.iter().map(|g| g.members.len()).min().unwrap_or(0);
                if *k == 0 {
                    return Err(ConfigError::InvalidFormula(
                        "top(k) needs k of at least 1".to_string(),
                    )
                    .into());
                }
                if *k > smallest {
                    return Err(ConfigError::AdvanceExceedsGroup {
                        advance: *k,
                        smallest_group: smallest,
                    }
                    .into());
                }
                run.parts.push(format!("top {} per group", k));
                let advancing = advance_placeholders(&groups, *k);
                run.out.placeholders.extend(advancing.iter().cloned());
                Cohort::Field(advancing)
            }
            Step::Eliminate(elimination) => {
                let field = current.into_field(step)?;
                // A seed count only makes sense against the caller's own field.
                let num_seeded = if run.offset == 0 {
                    options.num_seeded
                } else {
                    None
                };
                let result = build_bracket(
                    &field,
                    &BracketOptions {
                        seed: options.seed,
                        seeded: options.seeded,
                        num_seeded,
                        elimination: *elimination,
                    },
                )?;
                run.parts.push(format!("{:?} elimination", elimination).to_lowercase());
                let prefix = run.prefix("PO-");
                run.absorb(result, &prefix);
                Cohort::Field(field)
            }
            Step::LeaguePhase => {
                let field = current.into_field(step)?;
                let result = build_league_phase(
                    &field,
                    &LeaguePhaseOptions {
                        seed: options.seed.or(options.league.seed),
                        ..options.league.clone()
                    },
                )?;
                run.parts.push("league phase".to_string());
                let prefix = run.prefix("LP-");
                run.absorb(result, &prefix);
                Cohort::Field(field)
            }
        };
    }

    let mut out = run.out;
    out.rounds = rounds_of(&out.matches);
    out.description = match (steps.len(), run.single_description) {
        (1, Some(description)) => description,
        _ => format!("Formula: {}", run.parts.join(" -> ")),
    };
    log::debug!(
        "formula: {} steps, {} matches over {} rounds",
        steps.len(),
        out.matches.len(),
        out.rounds.len()
    );
    Ok(out)
}

struct Run {
    out: DrawResult,
    /// Rounds already scheduled by earlier stages.
    offset: u32,
    parts: Vec<String>,
    single_description: Option<String>,
}

impl Run {
    /// No prefix for the first stage.
    fn prefix(&self, prefix: &str) -> String {
        if self.offset == 0 && self.out.matches.is_empty() {
            String::new()
        } else {
            prefix.to_string()
        }
    }

    fn form_groups(
        &mut self,
        field: &[Participant],
        count: usize,
        step_index: usize,
        options: &FormulaOptions,
    ) -> Result<Vec<GroupMembers>, ConfigError> {
        if count == 0 {
            return Err(ConfigError::ZeroGroups);
        }
        if field.len() < count * 2 {
            return Err(ConfigError::TooFewForGroups {
                groups: count,
                participants: field.len(),
            });
        }
        let suffix = if self.out.groups.is_empty() {
            String::new()
        } else {
            (step_index + 1).to_string()
        };
        let lists = distribute_into_groups(field, count, options.seeded, options.seed)?;
        let groups: Vec<GroupMembers> = lists
            .into_iter()
            .enumerate()
            .map(|(i, members)| {
                let letter = group_letter(i);
                GroupMembers {
                    id: format!("{}{}", letter, suffix),
                    name: format!("Group {}{}", letter, suffix),
                    members,
                }
            })
            .collect();
        self.out.groups.extend(groups.iter().map(|g| Group {
            id: g.id.clone(),
            name: g.name.clone(),
            participant_ids: g.members.iter().map(|p| p.id.clone()).collect(),
            match_ids: Vec::new(),
        }));
        Ok(groups)
    }

    /// Round robin inside every group; matchday `r` of each group shares round `offset + r`.
    fn play_groups(&mut self, groups: &[GroupMembers], legs: u32) {
        let mut longest = 0;
        for g in groups {
            let ids: Vec<String> = g.members.iter().map(|p| p.id.clone()).collect();
            let mut matches = circle_schedule(&ids, legs, &format!("{}-", g.id));
            for m in &mut matches {
                longest = longest.max(m.round_index);
                m.round_index += self.offset;
                m.group_id = Some(g.id.clone());
            }
            if let Some(group) = self.out.groups.iter_mut().find(|x| x.id == g.id) {
                group.match_ids.extend(matches.iter().map(|m| m.id.clone()));
            }
            self.out.matches.extend(matches);
        }
        self.offset += longest;
    }

    /// Append a stage's result, shifting rounds after the ones already scheduled.
    fn absorb(&mut self, mut result: DrawResult, prefix: &str) {
        let with_prefix = |id: &mut String| {
            if !prefix.is_empty() {
                id.insert_str(0, prefix);
            }
        };
        let mut last_round = 0;
        for m in &mut result.matches {
            with_prefix(&mut m.id);
            if let Some(next) = m.advances_to.as_mut() {
                with_prefix(next);
            }
            if let Some(next) = m.loser_advances_to.as_mut() {
                with_prefix(next);
            }
            last_round = last_round.max(m.round_index);
            m.round_index += self.offset;
        }
        for bye in &mut result.byes {
            if let Some(next) = bye.advances_to.as_mut() {
                with_prefix(next);
            }
        }
        for group in &mut result.groups {
            group.match_ids.iter_mut().for_each(|id| with_prefix(id));
        }
        self.offset += last_round;
        self.single_description = Some(result.description);
        self.out.matches.extend(result.matches);
        self.out.byes.extend(result.byes);
        self.out.groups.extend(result.groups);
    }
}

fn group_letter(index: usize) -> String {
    if index < 26 {
        ((b'A' + index as u8) as char).to_string()
    } else {
        format!("G{}", index + 1)
    }
}

/// Stand-ins for the `k` best of every group, seeded so that all group winners rank
/// ahead of all runners-up (A#1, B#1, ..., A#2, B#2, ...).
fn advance_placeholders(groups: &[GroupMembers], k: usize) -> Vec<Participant> {
    let mut advancing = Vec::with_capacity(groups.len() * k);
    for place in 0..k {
        for (gi, g) in groups.iter().enumerate() {
            let rank = place * groups.len() + gi + 1;
            advancing.push(
                Participant::new(
                    format!("{}#{}", g.id, place + 1),
                    format!("{} #{}", g.name, place + 1),
                )
                .with_seed(rank as u32),
            );
        }
    }
    advancing
}
