//! Tag compliance analyzer tests

mod common;

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use cloudspend_analyzers::TaggingAnalyzer;
use cloudspend_core::config::TaggingPolicyConfig;
use cloudspend_core::domain::analyzer::{
    AnalyzerError, Category, CategoryAnalyzer, Priority, RecommendationType,
};
use cloudspend_core::domain::provider::{
    InventoryProvider, ProviderError, ResourceDescriptor, ResourceFilter,
};
use cloudspend_core::infrastructure::StaticCloudProvider;

use common::*;

fn analyzer(builder: SnapshotBuilder) -> TaggingAnalyzer {
    let provider = builder.build();
    TaggingAnalyzer::new(provider.clone(), provider, TaggingPolicyConfig::default())
}

fn account() -> SnapshotBuilder {
    SnapshotBuilder::new()
        .resource(Category::Compute, fully_tagged(resource("i-1", "m5.large", "running")))
        .resource(Category::Compute, resource("i-2", "m5.large", "stopped"))
        .resource(
            Category::Compute,
            with_tags(
                fully_tagged(resource("i-3", "t3.small", "running")),
                &[("Environment", "prod")],
            ),
        )
        .resource(Category::Storage, fully_tagged(ResourceDescriptor::new("b-1")))
        .resource(
            Category::Database,
            with_tags(
                resource("db-1", "db.t3.micro", "available"),
                &[
                    ("Environment", "Staging"),
                    ("Project", "orders"),
                    ("CostCenter", "cc-1"),
                    ("Application", "orders"),
                ],
            ),
        )
        .cost(Category::Compute, 200.0, &[("i-1", 80.0), ("i-2", 80.0), ("i-3", 40.0)])
        .cost(Category::Database, 10.0, &[("db-1", 10.0)])
}

fn account_wide<'a>(
    payload: &'a cloudspend_core::domain::analyzer::AnalyzerPayload,
    recommendation_type: RecommendationType,
    needle: &str,
) -> Option<&'a cloudspend_core::domain::analyzer::Recommendation> {
    of_type(payload, recommendation_type)
        .into_iter()
        .find(|r| r.rationale.contains(needle))
}

#[tokio::test]
async fn test_untagged_spend_is_quantified() {
    let payload = analyzer(account()).analyze(&params()).await.unwrap();

    let spend = of_type(&payload, RecommendationType::UntaggedSpend);
    assert_eq!(spend.len(), 1);
    assert_eq!(spend[0].priority, Priority::High);
    assert!(spend[0].rationale.contains("$130.00"));
    assert_eq!(payload.metadata.additional_info["untagged_monthly_spend"], "130.00");
}

#[tokio::test]
async fn test_overall_compliance_below_critical() {
    let payload = analyzer(account()).analyze(&params()).await.unwrap();

    // i-1 and b-1 comply: 2 of 5
    let rate = account_wide(&payload, RecommendationType::TaggingComplianceRate, "of 5 resources")
        .unwrap();
    assert_eq!(rate.priority, Priority::High);
    assert!(rate.rationale.starts_with("40.0%"));
    assert_eq!(payload.summary.current_monthly_cost, 0.0);
    assert_eq!(payload.summary.resources_analyzed, 5);
}

#[tokio::test]
async fn test_frequently_missing_tags() {
    let payload = analyzer(account()).analyze(&params()).await.unwrap();

    // An invalid Environment value counts as missing
    let environment = account_wide(&payload, RecommendationType::TaggingGap, "'Environment'").unwrap();
    assert_eq!(environment.priority, Priority::High);
    let owner = account_wide(&payload, RecommendationType::TaggingGap, "'Owner'").unwrap();
    assert_eq!(owner.priority, Priority::High);

    // Project is missing on exactly 20%, which is not above the threshold
    assert!(account_wide(&payload, RecommendationType::TaggingGap, "'Project'").is_none());
}

#[tokio::test]
async fn test_per_resource_type_compliance() {
    let payload = analyzer(account()).analyze(&params()).await.unwrap();

    let compute = account_wide(&payload, RecommendationType::TaggingComplianceRate, "of compute")
        .unwrap();
    assert_eq!(compute.priority, Priority::Medium);
    assert!(account_wide(&payload, RecommendationType::TaggingComplianceRate, "of database").is_some());
    assert!(account_wide(&payload, RecommendationType::TaggingComplianceRate, "of storage").is_none());
}

#[tokio::test]
async fn test_one_unavailable_inventory_is_skipped() {
    let builder = account().unavailable(Category::Database, "rds throttled");
    let payload = analyzer(builder).analyze(&params()).await.unwrap();

    assert_eq!(payload.summary.resources_analyzed, 4);
    assert!(account_wide(&payload, RecommendationType::TaggingComplianceRate, "of database").is_none());
}

#[tokio::test]
async fn test_all_inventories_unavailable_fails() {
    let builder = account()
        .unavailable(Category::Compute, "down")
        .unavailable(Category::Storage, "down")
        .unavailable(Category::Database, "down");
    let err = analyzer(builder).analyze(&params()).await.unwrap_err();
    assert!(matches!(err, AnalyzerError::Provider(_)));
}

#[tokio::test]
async fn test_fully_compliant_account() {
    let builder = SnapshotBuilder::new()
        .resource(Category::Compute, fully_tagged(resource("i-1", "m5.large", "running")))
        .resource(Category::Storage, fully_tagged(ResourceDescriptor::new("b-1")));
    let payload = analyzer(builder).analyze(&params()).await.unwrap();
    assert!(payload.recommendations.is_empty());
    assert_eq!(payload.metadata.additional_info["compliance_percent"], "100.0");
}

/// Inventory that records every describe call it serves
struct RecordingInventory {
    inner: Arc<StaticCloudProvider>,
    described: Mutex<Vec<(Category, Vec<String>)>>,
}

#[async_trait]
impl InventoryProvider for RecordingInventory {
    async fn list_resources(
        &self,
        category: Category,
        filter: Option<&ResourceFilter>,
    ) -> Result<Vec<String>, ProviderError> {
        self.inner.list_resources(category, filter).await
    }

    async fn describe_resources(
        &self,
        category: Category,
        resource_ids: &[String],
    ) -> Result<Vec<ResourceDescriptor>, ProviderError> {
        self.described
            .lock()
            .unwrap()
            .push((category, resource_ids.to_vec()));
        self.inner.describe_resources(category, resource_ids).await
    }
}

#[tokio::test]
async fn test_explicit_ids_are_described_under_their_own_category() {
    let provider = account().build();
    let inventory = Arc::new(RecordingInventory {
        inner: provider.clone(),
        described: Mutex::new(Vec::new()),
    });
    let analyzer = TaggingAnalyzer::new(provider, inventory.clone(), TaggingPolicyConfig::default());

    let mut params = params();
    params.resource_ids = vec!["i-2".to_string(), "db-1".to_string(), "i-missing".to_string()];
    let payload = analyzer.analyze(&params).await.unwrap();

    assert_eq!(payload.summary.resources_analyzed, 2);
    let described = inventory.described.lock().unwrap().clone();
    assert_eq!(
        described,
        vec![
            (Category::Compute, vec!["i-2".to_string()]),
            (Category::Database, vec!["db-1".to_string()]),
        ]
    );
}
