//! Analyzer registry for resolving category analyzers

use std::collections::HashMap;
use std::sync::Arc;

use crate::domain::CategoryAnalyzer;
use crate::domain::value_objects::Category;

/// Registry of category analyzers, one per category
pub struct AnalyzerRegistry {
    analyzers: HashMap<Category, Arc<dyn CategoryAnalyzer>>,
}

impl AnalyzerRegistry {
    pub fn new() -> Self {
        Self {
            analyzers: HashMap::new(),
        }
    }

    /// Register an analyzer, replacing any previous one for its category
    pub fn register(&mut self, analyzer: Arc<dyn CategoryAnalyzer>) {
        self.analyzers.insert(analyzer.category(), analyzer);
    }

    /// Get the analyzer for a category
    pub fn get_analyzer(&self, category: Category) -> Option<Arc<dyn CategoryAnalyzer>> {
        self.analyzers.get(&category).cloned()
    }

    /// Registered categories, in category order
    pub fn registered_categories(&self) -> Vec<Category> {
        let mut categories: Vec<Category> = self.analyzers.keys().copied().collect();
        categories.sort();
        categories
    }
}

impl Default for AnalyzerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl FromIterator<Arc<dyn CategoryAnalyzer>> for AnalyzerRegistry {
    fn from_iter<I: IntoIterator<Item = Arc<dyn CategoryAnalyzer>>>(iter: I) -> Self {
        let mut registry = Self::new();
        for analyzer in iter {
            registry.register(analyzer);
        }
        registry
    }
}
