//! Trait Aggregator — turns raw per-question answers into percentage scores per trait
//! and picks the dominant traits.
//!
//! Every answer is assumed to be on a 1–5 Likert scale. Unparseable answers count as
//! `FALLBACK_ANSWER`; they are never dropped from the question count.

use std::cmp::Ordering;
use std::collections::HashMap;

use serde_json::Value;

use crate::models::orientation::TestDefinition;
use crate::orientation::models::{Responses, ScoreMap};
use crate::orientation::traits::{normalize_trait, PERSONALITY_PAIRS, RIASEC};

pub const FALLBACK_ANSWER: i64 = 1;
pub const MAX_ANSWER: i64 = 5;
pub const MAX_DOMINANT_TRAITS: usize = 3;
/// Category used by generic tests for questions without one.
pub const GENERIC_CATEGORY: &str = "Général";

/// Question id → category tag.
pub type QuestionCategories = HashMap<String, String>;

#[derive(Debug, Clone, PartialEq)]
pub struct Aggregate {
    pub scores: ScoreMap,
    /// Highest first, at most three, all with a score above zero.
    pub dominant_traits: Vec<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Input helpers
// ────────────────────────────────────────────────────────────────────────────

/// Total parse of a raw answer. Integers pass through, floats truncate toward zero
/// (saturating at the `i64` bounds), booleans become 0/1, numeric strings are parsed
/// after trimming.
pub fn parse_answer(value: &Value) -> i64 {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f.trunc() as i64))
            .unwrap_or(FALLBACK_ANSWER),
        Value::String(s) => s.trim().parse::<i64>().unwrap_or(FALLBACK_ANSWER),
        Value::Bool(b) => i64::from(*b),
        Value::Null | Value::Array(_) | Value::Object(_) => FALLBACK_ANSWER,
    }
}

/// Builds the question → category map from a test definition.
/// Questions without a category are left out.
pub fn question_categories(definition: &TestDefinition) -> QuestionCategories {
    definition
        .questions
        .iter()
        .filter_map(|q| {
            q.question
                .category
                .as_ref()
                .filter(|c| !c.is_empty())
                .map(|c| (q.question.id.to_string(), c.clone()))
        })
        .collect()
}

/// Legacy question ids look like `R_1`: the category code precedes the first `_`.
fn legacy_category(question_id: &str) -> Option<&str> {
    question_id
        .split_once('_')
        .map(|(code, _)| code)
        .filter(|code| !code.is_empty())
}

fn explicit_category<'a>(categories: &'a QuestionCategories, question_id: &str) -> Option<&'a str> {
    categories
        .get(question_id)
        .map(String::as_str)
        .filter(|c| !c.is_empty())
}

/// Rounds to one decimal place.
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn percentage(sum: i64, count: u32) -> f64 {
    if count == 0 {
        return 0.0;
    }
    let max_possible = (count as i64 * MAX_ANSWER) as f64;
    round1((sum as f64 / max_possible * 100.0).clamp(0.0, 100.0))
}

/// Running sum and count per trait, in first-seen order.
#[derive(Default)]
struct Tally {
    entries: Vec<(String, i64, u32)>,
}

impl Tally {
    fn add(&mut self, name: &str, value: i64) {
        match self.entries.iter_mut().find(|(n, _, _)| n == name) {
            Some((_, sum, count)) => {
                *sum = sum.saturating_add(value);
                *count += 1;
            }
            None => self.entries.push((name.to_string(), value, 1)),
        }
    }

    fn get(&self, name: &str) -> (i64, u32) {
        self.entries
            .iter()
            .find(|(n, _, _)| n == name)
            .map(|(_, sum, count)| (*sum, *count))
            .unwrap_or((0, 0))
    }
}

/// Stable descending sort; ties keep input order.
fn rank_dominant(mut ranked: Vec<(String, f64)>) -> Vec<String> {
    ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
    ranked
        .into_iter()
        .take(MAX_DOMINANT_TRAITS)
        .filter(|(_, score)| *score > 0.0)
        .map(|(name, _)| name)
        .collect()
}

// ────────────────────────────────────────────────────────────────────────────
// Families
// ────────────────────────────────────────────────────────────────────────────

/// RIASEC scoring. All six traits are present in the result, unobserved ones at 0.0.
pub fn aggregate_riasec(responses: &Responses, categories: &QuestionCategories) -> Aggregate {
    let mut tally = Tally::default();

    for (question_id, value) in responses {
        let category = explicit_category(categories, question_id)
            .or_else(|| legacy_category(question_id));
        let Some(category) = category else {
            continue;
        };
        tally.add(&normalize_trait(category), parse_answer(value));
    }

    let ranked: Vec<(String, f64)> = RIASEC
        .iter()
        .map(|profile| {
            let (sum, count) = tally.get(profile.name);
            (profile.name.to_string(), percentage(sum, count))
        })
        .collect();

    Aggregate {
        scores: ranked.iter().cloned().collect(),
        dominant_traits: rank_dominant(ranked),
    }
}

/// Personality scoring over the four opposed pairs.
///
/// Each observed pair reports both sides: `left = (avg - 1) / 4 * 100`, `right = 100 - left`,
/// and contributes its winning side (left on a tie) as a dominant candidate. Pairs without
/// answers are absent from the result. Returns `None` when no pair was observed at all.
pub fn aggregate_personality(
    responses: &Responses,
    categories: &QuestionCategories,
) -> Option<Aggregate> {
    let mut tally = Tally::default();

    for (question_id, value) in responses {
        let Some(tag) = explicit_category(categories, question_id) else {
            continue;
        };
        if PERSONALITY_PAIRS.iter().any(|p| p.tag == tag) {
            tally.add(tag, parse_answer(value));
        }
    }

    if tally.entries.is_empty() {
        return None;
    }

    let mut scores = ScoreMap::new();
    let mut winners = Vec::new();

    for pair in PERSONALITY_PAIRS {
        let (total, count) = tally.get(pair.tag);
        if count == 0 {
            continue;
        }
        let avg = total as f64 / count as f64;
        let left = round1((((avg - 1.0) / 4.0) * 100.0).clamp(0.0, 100.0));
        let right = round1(100.0 - left);

        scores.insert(pair.left.label.to_string(), left);
        scores.insert(pair.right.label.to_string(), right);
        winners.push(if left >= right {
            (pair.left.label.to_string(), left)
        } else {
            (pair.right.label.to_string(), right)
        });
    }

    Some(Aggregate {
        scores,
        dominant_traits: rank_dominant(winners),
    })
}

/// Generic scoring: one trait per observed category, no zero-filling.
pub fn aggregate_generic(responses: &Responses, categories: &QuestionCategories) -> Aggregate {
    let mut tally = Tally::default();

    for (question_id, value) in responses {
        let category = explicit_category(categories, question_id).unwrap_or(GENERIC_CATEGORY);
        tally.add(category, parse_answer(value));
    }

    let ranked: Vec<(String, f64)> = tally
        .entries
        .iter()
        .map(|(name, sum, count)| (name.clone(), percentage(*sum, *count)))
        .collect();

    Aggregate {
        scores: ranked.iter().cloned().collect(),
        dominant_traits: rank_dominant(ranked),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
