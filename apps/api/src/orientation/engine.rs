use tracing::{debug, warn};
use uuid::Uuid;

use crate::models::orientation::TestDefinition;
use crate::orientation::aggregator::{
    aggregate_generic, aggregate_personality, aggregate_riasec, question_categories,
    QuestionCategories,
};
use crate::orientation::family::{ScoringKind, TestFamily};
use crate::orientation::interpretation::{interpret_generic, interpret_personality, interpret_riasec};
use crate::orientation::models::{Responses, TestResult};

/// Scores a submission and interprets it. Pure and synchronous; recommendations and
/// matching programs are left empty for the caller to fill.
pub fn calculate_result(
    test_id: Uuid,
    family: TestFamily,
    responses: &Responses,
    definition: Option<&TestDefinition>,
) -> TestResult {
    let categories = definition
        .map(question_categories)
        .unwrap_or_else(QuestionCategories::new);

    if family == TestFamily::Unknown {
        warn!("Unknown test family for test {test_id}, using generic calculation");
    }

    let (aggregate, interpretation) = match family.scoring_kind() {
        ScoringKind::Riasec => {
            let agg = aggregate_riasec(responses, &categories);
            let interpretation = interpret_riasec(&agg.scores, &agg.dominant_traits);
            (agg, interpretation)
        }
        ScoringKind::Personality => match aggregate_personality(responses, &categories) {
            Some(agg) => {
                let interpretation = interpret_personality(&agg.scores, &agg.dominant_traits);
                (agg, interpretation)
            }
            None => {
                debug!("No personality dimension answered for test {test_id}, scoring generically");
                let agg = aggregate_generic(responses, &categories);
                let interpretation = interpret_generic(&agg.scores, &agg.dominant_traits);
                (agg, interpretation)
            }
        },
        ScoringKind::Generic => {
            let agg = aggregate_generic(responses, &categories);
            let interpretation = interpret_generic(&agg.scores, &agg.dominant_traits);
            (agg, interpretation)
        }
    };

    TestResult {
        test_id,
        scores: aggregate.scores,
        dominant_traits: aggregate.dominant_traits,
        recommendations: vec![],
        interpretation: Some(interpretation),
        matching_programs: vec![],
    }
}
