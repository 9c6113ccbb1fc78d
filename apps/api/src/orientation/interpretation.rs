//! Interpretation Generator — builds the narrative shown to the user from the dominant
//! traits and the static reference tables.

use std::collections::BTreeMap;

use crate::orientation::models::{Interpretation, ScoreMap, TraitDetail};
use crate::orientation::traits::{personality_side, riasec_profile, trait_description};

const MAX_SECTORS: usize = 5;
const SECONDARY_STRENGTHS: usize = 2;

const INCONCLUSIVE_SUMMARY: &str = "Les résultats ne permettent pas de dégager un profil dominant clair. Nous vous recommandons de refaire le test en prenant le temps de répondre à chaque question.";
const INCONCLUSIVE_ADVICE: &str =
    "Prenez le temps de réfléchir à ce qui vous motive réellement dans votre quotidien.";

const PERSONALITY_WORK_STYLE: &str = "Votre personnalité influence votre manière d'aborder le travail et les relations professionnelles.";
const PERSONALITY_ADVICE: &str = "Cherchez des métiers et environnements de travail compatibles avec votre type de personnalité pour vous épanouir professionnellement.";

const GENERIC_ADVICE: &str = "Explorez les métiers liés à vos points forts pour trouver votre voie.";

/// Fixed interpretation for a submission without any dominant trait.
pub fn inconclusive() -> Interpretation {
    Interpretation {
        profile_summary: INCONCLUSIVE_SUMMARY.to_string(),
        profile_code: None,
        strengths: vec![],
        work_style: String::new(),
        advice: INCONCLUSIVE_ADVICE.to_string(),
        recommended_sectors: vec![],
        trait_details: BTreeMap::new(),
    }
}

fn trait_details(scores: &ScoreMap, dominant: &[String]) -> BTreeMap<String, TraitDetail> {
    dominant
        .iter()
        .map(|t| {
            (
                t.clone(),
                TraitDetail {
                    score: scores.get(t).copied().unwrap_or(0.0),
                    description: trait_description(t).to_string(),
                },
            )
        })
        .collect()
}

fn push_unique(list: &mut Vec<String>, item: &str) {
    if !list.iter().any(|existing| existing == item) {
        list.push(item.to_string());
    }
}

/// Tier message chosen by the primary trait's own score.
fn clarity_advice(top_score: f64) -> &'static str {
    if top_score >= 80.0 {
        "Votre profil est très marqué, ce qui est un atout pour cibler précisément votre orientation."
    } else if top_score >= 60.0 {
        "Votre profil montre des tendances claires qui peuvent guider efficacement vos choix d'orientation."
    } else {
        "Votre profil est équilibré, ce qui vous donne de la flexibilité dans vos choix. Explorez plusieurs pistes avant de vous décider."
    }
}

pub fn interpret_riasec(scores: &ScoreMap, dominant: &[String]) -> Interpretation {
    let Some(primary) = dominant.first() else {
        return inconclusive();
    };
    let primary_profile = riasec_profile(primary);
    let secondary = dominant.get(1);
    let secondary_profile = secondary.and_then(|s| riasec_profile(s));

    let profile_code: String = dominant
        .iter()
        .map(|t| riasec_profile(t).map(|p| p.code).unwrap_or("?"))
        .collect();

    let mut summary = format!(
        "Votre profil RIASEC est de type **{profile_code}** ({}). ",
        dominant.join(" - ")
    );
    summary.push_str(primary_profile.map(|p| p.description).unwrap_or(""));
    if let Some(secondary) = secondary {
        let description = secondary_profile.map(|p| p.description).unwrap_or("");
        summary.push_str(&format!(
            " Votre dimension secondaire **{secondary}** renforce ce profil : {}",
            description.to_lowercase()
        ));
    }

    let mut strengths: Vec<String> = primary_profile
        .map(|p| p.forces.iter().map(|f| f.to_string()).collect())
        .unwrap_or_default();
    if let Some(profile) = secondary_profile {
        for force in profile.forces.iter().take(SECONDARY_STRENGTHS) {
            push_unique(&mut strengths, force);
        }
    }

    let mut advice = clarity_advice(scores.get(primary).copied().unwrap_or(0.0)).to_string();
    if let Some(profile) = primary_profile {
        advice.push(' ');
        advice.push_str(profile.advice);
    }

    let mut sectors: Vec<String> = primary_profile
        .map(|p| p.sectors.iter().map(|s| s.to_string()).collect())
        .unwrap_or_default();
    if let Some(profile) = secondary_profile {
        for sector in profile.sectors {
            push_unique(&mut sectors, sector);
        }
    }
    sectors.truncate(MAX_SECTORS);

    Interpretation {
        profile_summary: summary,
        profile_code: Some(profile_code),
        strengths,
        work_style: primary_profile
            .map(|p| p.work_style.to_string())
            .unwrap_or_default(),
        advice,
        recommended_sectors: sectors,
        trait_details: trait_details(scores, dominant),
    }
}

pub fn interpret_personality(scores: &ScoreMap, dominant: &[String]) -> Interpretation {
    if dominant.is_empty() {
        return inconclusive();
    }

    let descriptions: Vec<&str> = dominant
        .iter()
        .filter_map(|t| personality_side(t).map(|s| s.description))
        .collect();

    let mut summary = format!(
        "Votre profil de personnalité dominant est : **{}**. ",
        dominant.join(" / ")
    );
    summary.push_str(&descriptions.join(" "));

    Interpretation {
        profile_summary: summary,
        profile_code: None,
        strengths: dominant.to_vec(),
        work_style: PERSONALITY_WORK_STYLE.to_string(),
        advice: PERSONALITY_ADVICE.to_string(),
        recommended_sectors: vec![],
        trait_details: trait_details(scores, dominant),
    }
}

pub fn interpret_generic(scores: &ScoreMap, dominant: &[String]) -> Interpretation {
    if dominant.is_empty() {
        return inconclusive();
    }

    Interpretation {
        profile_summary: format!(
            "Vos domaines de force principaux sont : {}.",
            dominant.join(", ")
        ),
        profile_code: None,
        strengths: dominant.to_vec(),
        work_style: String::new(),
        advice: GENERIC_ADVICE.to_string(),
        recommended_sectors: vec![],
        trait_details: trait_details(scores, dominant),
    }
}
