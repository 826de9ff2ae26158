//! Narrative generation
//!
//! Produces a short plain-text summary of a report. The text is a pure
//! function of the report contents.

use crate::domain::entities::SynthesizedReport;

/// Default number of next steps quoted in the narrative
pub const DEFAULT_MAX_NARRATIVE_STEPS: usize = 3;

const FALLBACK_NARRATIVE: &str = "No cost data could be analyzed for this request, so there are no optimization recommendations to report.";

#[derive(Debug, Clone)]
pub struct NarrativeGenerator {
    max_steps: usize,
}

impl NarrativeGenerator {
    pub fn new(max_steps: usize) -> Self {
        Self { max_steps }
    }

    pub fn narrate(&self, report: &SynthesizedReport) -> String {
        if report.categories_consulted.is_empty() && report.total_recommendations == 0 {
            let mut text = FALLBACK_NARRATIVE.to_string();
            if !report.failures.is_empty() {
                text.push_str(&format!(
                    " {} analyzer(s) failed; see the failure list for details.",
                    report.failures.len()
                ));
            }
            return text;
        }

        let mut sentences = Vec::new();

        let categories: Vec<&str> = report
            .categories_consulted
            .iter()
            .map(|c| c.as_str())
            .collect();
        sentences.push(format!("Analyzed {} costs.", join_words(&categories)));

        let aggregate = &report.aggregate;
        if aggregate.current_monthly_cost > 0.0 && aggregate.potential_monthly_savings > 0.0 {
            sentences.push(format!(
                "Current monthly cost is {} with potential savings of {} ({:.1}%).",
                format_currency(aggregate.current_monthly_cost),
                format_currency(aggregate.potential_monthly_savings),
                aggregate.savings_percentage
            ));
        } else if aggregate.current_monthly_cost > 0.0 {
            sentences.push(format!(
                "Current monthly cost is {}.",
                format_currency(aggregate.current_monthly_cost)
            ));
        } else if aggregate.potential_monthly_savings > 0.0 {
            sentences.push(format!(
                "Potential monthly savings are {}.",
                format_currency(aggregate.potential_monthly_savings)
            ));
        }

        sentences.push(format!(
            "Found {} recommendation{}, {} of them high priority.",
            report.total_recommendations,
            if report.total_recommendations == 1 { "" } else { "s" },
            report.high_priority_recommendations
        ));

        if let Some(top) = report.ranked_recommendations.first() {
            sentences.push(format!("Top recommendation: {}", terminated(&top.rationale)));
        }

        let steps: Vec<&str> = report
            .next_steps
            .iter()
            .take(self.max_steps)
            .map(String::as_str)
            .collect();
        if !steps.is_empty() {
            let numbered: Vec<String> = steps
                .iter()
                .enumerate()
                .map(|(i, step)| format!("({}) {}", i + 1, step))
                .collect();
            sentences.push(format!("Next steps: {}.", numbered.join("; ")));
        }

        if !report.failures.is_empty() {
            let failed: Vec<&str> = report.failures.iter().map(|f| f.category.as_str()).collect();
            sentences.push(format!("Analysis failed for {}.", join_words(&failed)));
        }

        sentences.join(" ")
    }
}

impl Default for NarrativeGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_NARRATIVE_STEPS)
    }
}

/// `$1,234.56`
pub fn format_currency(amount: f64) -> String {
    let cents = (amount.abs() * 100.0).round() as u64;
    let whole = (cents / 100).to_string();
    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    let sign = if amount < 0.0 && cents > 0 { "-" } else { "" };
    format!("{}${}.{:02}", sign, grouped, cents % 100)
}

fn join_words(words: &[&str]) -> String {
    match words {
        [] => String::new(),
        [only] => (*only).to_string(),
        [init @ .., last] => format!("{} and {}", init.join(", "), last),
    }
}

fn terminated(text: &str) -> String {
    let trimmed = text.trim_end();
    if trimmed.ends_with(['.', '!', '?']) {
        trimmed.to_string()
    } else {
        format!("{}.", trimmed)
    }
}
