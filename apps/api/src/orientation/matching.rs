//! Match Scorer — compatibility between a career's related traits and a user's profile.
//!
//! Algorithm:
//! 1. Normalize career traits to canonical French names.
//! 2. common = career ∩ dominant traits.
//!    - empty → partial = career ∩ all scored traits; score = avg(user score) × 0.5
//! 3. overlap = |common| / |dominant|
//!    score = overlap × 60 + avg(user score over common) / 100 × 40, clamped to 100
//!
//! Scores are rounded to one decimal.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use crate::models::orientation::CareerRow;
use crate::orientation::aggregator::round1;
use crate::orientation::models::{CareerSummary, ScoreMap};
use crate::orientation::traits::normalize_trait;

pub const OVERLAP_WEIGHT: f64 = 60.0;
pub const STRENGTH_WEIGHT: f64 = 40.0;
/// Weight applied when a career only matches non-dominant traits.
pub const PARTIAL_MATCH_FACTOR: f64 = 0.5;
pub const MAX_RECOMMENDATIONS: usize = 6;
const MAX_SKILLS_SHOWN: usize = 5;

fn average_score(scores: &ScoreMap, traits: &BTreeSet<String>) -> f64 {
    let sum: f64 = traits
        .iter()
        .map(|t| scores.get(t).copied().unwrap_or(0.0))
        .sum();
    sum / traits.len() as f64
}

/// Compatibility in `[0, 100]` between a career and a user profile.
pub fn match_score(career_traits: &[String], dominant: &[String], scores: &ScoreMap) -> f64 {
    if career_traits.is_empty() || dominant.is_empty() {
        return 0.0;
    }

    let career: BTreeSet<String> = career_traits.iter().map(|t| normalize_trait(t)).collect();
    let dominant_set: BTreeSet<&String> = dominant.iter().collect();

    let common: BTreeSet<String> = career
        .iter()
        .filter(|t| dominant_set.contains(t))
        .cloned()
        .collect();

    if common.is_empty() {
        let partial: BTreeSet<String> = career
            .iter()
            .filter(|t| scores.contains_key(*t))
            .cloned()
            .collect();
        if partial.is_empty() {
            return 0.0;
        }
        return round1(average_score(scores, &partial) * PARTIAL_MATCH_FACTOR);
    }

    let overlap_ratio = common.len() as f64 / dominant_set.len().max(1) as f64;
    let avg_user_score = average_score(scores, &common);
    let score = overlap_ratio * OVERLAP_WEIGHT + (avg_user_score / 100.0) * STRENGTH_WEIGHT;

    round1(score.clamp(0.0, 100.0))
}

/// Normalized career traits that are among the user's dominant traits, in career order.
pub fn matching_traits(career_traits: &[String], dominant: &[String]) -> Vec<String> {
    let mut matching: Vec<String> = Vec::new();
    for t in career_traits.iter().map(|t| normalize_trait(t)) {
        if dominant.contains(&t) && !matching.contains(&t) {
            matching.push(t);
        }
    }
    matching
}

/// Scores every candidate against the profile and keeps the best `MAX_RECOMMENDATIONS`,
/// highest first. Equal scores keep candidate order.
pub fn rank_careers(
    candidates: &[CareerRow],
    dominant: &[String],
    scores: &ScoreMap,
) -> Vec<CareerSummary> {
    let mut ranked: Vec<CareerSummary> = candidates
        .iter()
        .map(|career| {
            let mut summary = CareerSummary::from_row(career);
            summary.match_score = match_score(&career.related_traits, dominant, scores);
            summary.matching_traits = matching_traits(&career.related_traits, dominant);
            summary.required_skills.truncate(MAX_SKILLS_SHOWN);
            summary
        })
        .collect();

    ranked.sort_by(|a, b| {
        b.match_score
            .partial_cmp(&a.match_score)
            .unwrap_or(Ordering::Equal)
    });
    ranked.truncate(MAX_RECOMMENDATIONS);
    ranked
}
