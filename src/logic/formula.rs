//! Text formulas for multi-stage formats, parsed into a closed set of steps.
//!
//! ```text
//! knockout | double_knockout | triple_knockout
//! round_robin | double_round_robin | round_robin(3)
//! league_phase
//! uefa(8, 2)                                  8 groups, top 2 advance, knockout
//! groups(4).round_robin().top(2).knockout()
//! ```

use crate::models::{ConfigError, Elimination};
use serde::{Deserialize, Serialize};

/// One stage of a multi-stage draw.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    /// Split the field into groups of (at most) this size.
    GroupBy(usize),
    /// Split the field into this many groups.
    SplitInto(usize),
    /// Round robin over the field, or inside every group.
    PlayRoundRobin { legs: u32 },
    /// The best `k` of every group go on (as placeholders).
    AdvanceTop(usize),
    /// Elimination bracket over the field. Ends the formula.
    Eliminate(Elimination),
    /// Pot-based league phase over the field. Ends the formula.
    LeaguePhase,
}

impl Step {
    /// Steps after which nothing else can be scheduled.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Step::Eliminate(_) | Step::LeaguePhase)
    }
}

#[derive(Debug, PartialEq)]
enum Arg {
    Number(usize),
    Named(String, usize),
}

/// Parse a formula such as `groups(4).round_robin().top(2).knockout()`.
pub fn parse_formula(formula: &str) -> Result<Vec<Step>, ConfigError> {
    let compact: String = formula
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_lowercase();
    if compact.is_empty() {
        return Err(ConfigError::InvalidFormula("empty formula".to_string()));
    }

    let mut steps = Vec::new();
    for call in split_calls(&compact)? {
        let (name, args) = parse_call(call)?;
        steps.extend(expand(name, &args)?);
    }
    if let Some(pos) = steps.iter().position(Step::is_terminal) {
        if pos + 1 < steps.len() {
            return Err(ConfigError::InvalidFormula(format!(
                "nothing can follow {:?}",
                steps[pos]
            )));
        }
    }
    Ok(steps)
}

/// Split on dots that are not inside parentheses.
fn split_calls(formula: &str) -> Result<Vec<&str>, ConfigError> {
    let mut calls = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, c) in formula.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth = depth.checked_sub(1).ok_or_else(|| {
                    ConfigError::InvalidFormula("unbalanced parentheses".to_string())
                })?
            }
            '.' if depth == 0 => {
                calls.push(&formula[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    if depth != 0 {
        return Err(ConfigError::InvalidFormula(
            "unbalanced parentheses".to_string(),
        ));
    }
    calls.push(&formula[start..]);
    if calls.iter().any(|c| c.is_empty()) {
        return Err(ConfigError::InvalidFormula("empty step".to_string()));
    }
    Ok(calls)
}

fn parse_call(call: &str) -> Result<(&str, Vec<Arg>), ConfigError> {
    let Some(open) = call.find('(') else {
        return Ok((call, Vec::new()));
    };
    let inner = call[open + 1..].strip_suffix(')').ok_or_else(|| {
        ConfigError::InvalidFormula(format!("'{}' is missing a closing parenthesis", call))
    })?;
    let args = inner
        .split(',')
        .filter(|a| !a.is_empty())
        .map(|a| parse_arg(a, call))
        .collect::<Result<Vec<_>, _>>()?;
    Ok((&call[..open], args))
}

fn parse_arg(arg: &str, call: &str) -> Result<Arg, ConfigError> {
    let number = |s: &str| {
        s.parse::<usize>().map_err(|_| {
            ConfigError::InvalidFormula(format!("'{}' in '{}' is not a whole number", s, call))
        })
    };
    match arg.split_once('=') {
        Some((key, value)) => Ok(Arg::Named(key.to_string(), number(value)?)),
        None => Ok(Arg::Number(number(arg)?)),
    }
}

/// Positional argument `index`, or the named one `key`.
fn arg(args: &[Arg], index: usize, keys: &[&str]) -> Option<usize> {
    args.iter()
        .find_map(|a| match a {
            Arg::Named(k, v) if keys.contains(&k.as_str()) => Some(*v),
            _ => None,
        })
        .or_else(|| {
            args.iter()
                .filter_map(|a| match a {
                    Arg::Number(v) => Some(*v),
                    Arg::Named(..) => None,
                })
                .nth(index)
        })
}

fn required(args: &[Arg], keys: &[&str], name: &str) -> Result<usize, ConfigError> {
    arg(args, 0, keys)
        .ok_or_else(|| ConfigError::InvalidFormula(format!("{}(n) needs a number", name)))
}

fn expand(name: &str, args: &[Arg]) -> Result<Vec<Step>, ConfigError> {
    let legs = |default: u32| arg(args, 0, &["legs"]).map_or(default, |l| l as u32);
    let steps = match name {
        "knockout" | "single_knockout" | "single_elimination" => {
            vec![Step::Eliminate(Elimination::Single)]
        }
        "double_knockout" | "double_elimination" => vec![Step::Eliminate(Elimination::Double)],
        "triple_knockout" | "triple_elimination" => vec![Step::Eliminate(Elimination::Triple)],
        "round_robin" => vec![Step::PlayRoundRobin { legs: legs(1) }],
        "double_round_robin" => vec![Step::PlayRoundRobin { legs: 2 }],
        "league_phase" | "uefa_league_phase" => vec![Step::LeaguePhase],
        "groups" => vec![Step::GroupBy(required(args, &["size"], name)?)],
        "split" => vec![Step::SplitInto(required(args, &["groups"], name)?)],
        "top" => vec![Step::AdvanceTop(required(args, &["k", "advance"], name)?)],
        "uefa" => vec![
            Step::SplitInto(arg(args, 0, &["groups"]).unwrap_or(8)),
            Step::PlayRoundRobin { legs: 1 },
            Step::AdvanceTop(arg(args, 1, &["advance", "advance_per_group"]).unwrap_or(2)),
            Step::Eliminate(Elimination::Single),
        ],
        other => {
            return Err(ConfigError::InvalidFormula(format!(
                "unknown step '{}'",
                other
            )))
        }
    };
    Ok(steps)
}
