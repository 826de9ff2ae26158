//! Result synthesis: merging worker results into one ranked report
//!
//! Synthesis is a pure function of the worker results and the request. The
//! result set is ordered by category first so the output does not depend on
//! the order in which analyzers finished.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};

use crate::domain::entities::{AnalysisRequest, CategoryFailure, CostImpact, SynthesizedReport};
use crate::domain::value_objects::Priority;
use crate::domain::{Recommendation, WorkerOutcome, WorkerResult};

/// Default length of the ranked recommendation list
pub const DEFAULT_MAX_RANKED: usize = 10;
/// Default savings above which a stakeholder review is suggested
pub const DEFAULT_LARGE_SAVINGS_THRESHOLD: f64 = 1000.0;

/// Tuning knobs for [`ResultSynthesizer`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SynthesisOptions {
    pub max_ranked: usize,
    pub large_savings_threshold: f64,
}

impl Default for SynthesisOptions {
    fn default() -> Self {
        Self {
            max_ranked: DEFAULT_MAX_RANKED,
            large_savings_threshold: DEFAULT_LARGE_SAVINGS_THRESHOLD,
        }
    }
}

/// Merges worker results into a [`SynthesizedReport`] without a narrative
#[derive(Debug, Clone, Default)]
pub struct ResultSynthesizer {
    options: SynthesisOptions,
}

impl ResultSynthesizer {
    pub fn new(options: SynthesisOptions) -> Self {
        Self { options }
    }

    pub fn synthesize(&self, results: &[WorkerResult], request: &AnalysisRequest) -> SynthesizedReport {
        self.synthesize_at(results, request, Utc::now())
    }

    /// Same as [`Self::synthesize`] with a fixed timestamp
    pub fn synthesize_at(
        &self,
        results: &[WorkerResult],
        request: &AnalysisRequest,
        generated_at: DateTime<Utc>,
    ) -> SynthesizedReport {
        let mut ordered: Vec<&WorkerResult> = results.iter().collect();
        ordered.sort_by_key(|r| r.category);

        let mut categories_consulted = BTreeSet::new();
        let mut category_summaries = BTreeMap::new();
        let mut failures = Vec::new();
        let mut current_monthly_cost = 0.0;
        let mut potential_monthly_savings = 0.0;
        let mut recommendations: Vec<Recommendation> = Vec::new();

        for result in ordered {
            match &result.outcome {
                WorkerOutcome::Success(payload) => {
                    categories_consulted.insert(result.category);
                    category_summaries.insert(result.category, payload.summary.clone());
                    current_monthly_cost += payload.summary.current_monthly_cost;
                    potential_monthly_savings += payload.summary.potential_monthly_savings;
                    recommendations.extend(payload.recommendations.iter().cloned().map(|mut r| {
                        r.category = result.category;
                        r
                    }));
                }
                WorkerOutcome::Failure(failure) => failures.push(CategoryFailure {
                    category: result.category,
                    kind: failure.kind,
                    message: failure.message.clone(),
                }),
            }
        }

        let total_recommendations = recommendations.len();
        let high_priority_recommendations = recommendations
            .iter()
            .filter(|r| r.priority == Priority::High)
            .count();

        recommendations.sort_by(compare_recommendations);
        recommendations.truncate(self.options.max_ranked);

        let next_steps = self.next_steps(high_priority_recommendations, potential_monthly_savings);

        SynthesizedReport {
            query: request.query.clone(),
            categories_consulted,
            aggregate: CostImpact::new(current_monthly_cost, potential_monthly_savings),
            ranked_recommendations: recommendations,
            next_steps,
            narrative: String::new(),
            generated_at,
            category_summaries,
            failures,
            total_recommendations,
            high_priority_recommendations,
            error: None,
        }
    }

    fn next_steps(&self, high_priority: usize, potential_savings: f64) -> Vec<String> {
        let mut steps = Vec::new();
        if high_priority > 0 {
            steps.push(format!(
                "Address {} high-priority recommendations immediately",
                high_priority
            ));
        }
        if potential_savings > self.options.large_savings_threshold {
            steps.push("Schedule a detailed cost review meeting with stakeholders".to_string());
        }
        steps.push("Set up automated monitoring for identified optimization opportunities".to_string());
        steps
    }
}

/// Priority first, then savings (absent = 0), both descending; the remaining
/// keys only make ties deterministic
fn compare_recommendations(lhs: &Recommendation, rhs: &Recommendation) -> Ordering {
    rhs.priority
        .cmp(&lhs.priority)
        .then_with(|| rhs.savings_or_zero().total_cmp(&lhs.savings_or_zero()))
        .then_with(|| lhs.category.cmp(&rhs.category))
        .then_with(|| lhs.recommendation_type.cmp(&rhs.recommendation_type))
        .then_with(|| lhs.resource_id.cmp(&rhs.resource_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::Category;
    use crate::domain::{RecommendationType, WorkerFailure, WorkerFailureKind};

    fn rec(priority: Priority, savings: Option<f64>, id: &str) -> Recommendation {
        let rec = Recommendation::for_resource(
            RecommendationType::IdleResource,
            id,
            Category::Compute,
            priority,
            "idle",
        );
        match savings {
            Some(s) => rec.with_savings(s),
            None => rec,
        }
    }

    #[test]
    fn test_missing_savings_rank_as_zero() {
        let mut recs = vec![
            rec(Priority::Medium, None, "a"),
            rec(Priority::Medium, Some(10.0), "b"),
            rec(Priority::High, None, "c"),
        ];
        recs.sort_by(compare_recommendations);
        let ids: Vec<_> = recs.iter().filter_map(|r| r.resource_id.as_deref()).collect();
        assert_eq!(ids, vec!["c", "b", "a"]);
    }

    #[test]
    fn test_next_steps_always_end_with_monitoring() {
        let synthesizer = ResultSynthesizer::default();
        let steps = synthesizer.next_steps(0, 0.0);
        assert_eq!(
            steps,
            vec!["Set up automated monitoring for identified optimization opportunities".to_string()]
        );

        let steps = synthesizer.next_steps(2, 1000.01);
        assert_eq!(steps.len(), 3);
        assert_eq!(steps[0], "Address 2 high-priority recommendations immediately");
    }

    #[test]
    fn test_failures_are_recorded_not_summed() {
        let results = vec![WorkerResult::failure(
            Category::Storage,
            WorkerFailure::new(WorkerFailureKind::Timeout, "too slow"),
        )];
        let report = ResultSynthesizer::default()
            .synthesize(&results, &AnalysisRequest::new("s3"));
        assert!(report.categories_consulted.is_empty());
        assert_eq!(report.aggregate, CostImpact::default());
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].kind, WorkerFailureKind::Timeout);
    }
}
