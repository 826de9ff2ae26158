//! Keyword-based query planner
//!
//! Maps free text to a dispatch plan using fixed keyword tables. The query is
//! split into alphanumeric tokens; a keyword of three or more characters
//! matches any token starting with it ("instances", "buckets"), while shorter
//! keywords ("ri", "db", "s3") must match a whole token.

use std::collections::BTreeSet;

use tracing::debug;

use crate::domain::entities::{AnalysisPlan, AnalysisRequest};
use crate::domain::services::QueryPlanner;
use crate::domain::value_objects::{AnalysisDepth, AnalysisScope, Category, Priority};

/// Trigger keywords per category
const CATEGORY_KEYWORDS: &[(Category, &[&str])] = &[
    (Category::Compute, &["ec2", "instance", "compute", "server"]),
    (Category::Storage, &["s3", "storage", "bucket"]),
    (Category::Database, &["rds", "database", "db"]),
    (Category::Commitments, &["reserved", "savings", "ri", "sp"]),
    (Category::Tagging, &["tag", "tagging", "compliance"]),
];

const HIGH_PRIORITY_KEYWORDS: &[&str] = &["urgent", "critical", "high", "immediate"];
const LOW_PRIORITY_KEYWORDS: &[&str] = &["low", "minor", "later"];
const DETAILED_KEYWORDS: &[&str] = &["detailed", "comprehensive", "full", "complete"];
const SUMMARY_KEYWORDS: &[&str] = &["quick", "summary", "brief"];

/// Keywords shorter than this must match a whole token
const PREFIX_MATCH_MIN_LEN: usize = 3;

/// Lower-cased alphanumeric tokens of a query
struct QueryTokens(Vec<String>);

impl QueryTokens {
    fn new(query: &str) -> Self {
        Self(
            query
                .split(|c: char| !c.is_alphanumeric())
                .filter(|token| !token.is_empty())
                .map(str::to_lowercase)
                .collect(),
        )
    }

    fn matches(&self, keyword: &str) -> bool {
        self.0.iter().any(|token| {
            if keyword.len() < PREFIX_MATCH_MIN_LEN {
                token == keyword
            } else {
                token.starts_with(keyword)
            }
        })
    }

    fn matches_any(&self, keywords: &[&str]) -> bool {
        keywords.iter().any(|k| self.matches(k))
    }
}

/// Planner driven by the keyword tables above
#[derive(Debug, Default, Clone, Copy)]
pub struct KeywordQueryPlanner;

impl KeywordQueryPlanner {
    pub fn new() -> Self {
        Self
    }
}

impl QueryPlanner for KeywordQueryPlanner {
    fn plan(&self, request: &AnalysisRequest) -> AnalysisPlan {
        let tokens = QueryTokens::new(&request.query);

        let matched: BTreeSet<Category> = CATEGORY_KEYWORDS
            .iter()
            .filter(|(_, keywords)| tokens.matches_any(keywords))
            .map(|(category, _)| *category)
            .collect();

        let (target_categories, scope) = if matched.is_empty() {
            (Category::ALL.into_iter().collect(), AnalysisScope::Comprehensive)
        } else {
            (matched, AnalysisScope::Targeted)
        };

        let priority = if tokens.matches_any(HIGH_PRIORITY_KEYWORDS) {
            Priority::High
        } else if tokens.matches_any(LOW_PRIORITY_KEYWORDS) {
            Priority::Low
        } else {
            Priority::Medium
        };

        let depth = if tokens.matches_any(DETAILED_KEYWORDS) {
            AnalysisDepth::Detailed
        } else if tokens.matches_any(SUMMARY_KEYWORDS) {
            AnalysisDepth::Summary
        } else {
            request.depth
        };

        debug!(
            categories = ?target_categories,
            scope = %scope,
            priority = %priority,
            depth = %depth,
            "Planned analysis"
        );

        AnalysisPlan {
            target_categories,
            priority,
            scope,
            depth,
        }
    }
}
