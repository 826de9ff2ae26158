//! Storage analyzer tests

mod common;

use cloudspend_analyzers::StorageAnalyzer;
use cloudspend_core::config::StorageThresholds;
use cloudspend_core::domain::analyzer::{Category, CategoryAnalyzer, Priority, RecommendationType};
use cloudspend_core::domain::provider::{MetricName, ResourceDescriptor, StorageProfile};

use common::*;

fn analyzer(builder: SnapshotBuilder) -> StorageAnalyzer {
    let provider = builder.build();
    StorageAnalyzer::new(provider.clone(), provider, StorageThresholds::default())
}

fn bucket(id: &str, profile: StorageProfile) -> ResourceDescriptor {
    fully_tagged(ResourceDescriptor {
        storage: Some(profile),
        ..ResourceDescriptor::new(id)
    })
}

fn standard_only(size_gb: f64) -> StorageProfile {
    StorageProfile {
        size_gb,
        storage_classes: [("STANDARD".to_string(), size_gb)].into_iter().collect(),
        ..StorageProfile::default()
    }
}

#[tokio::test]
async fn test_large_standard_bucket_without_lifecycle() {
    let profile = StorageProfile {
        versioning_enabled: true,
        incomplete_multipart_uploads: 2,
        ..standard_only(10.0)
    };
    let builder = SnapshotBuilder::new()
        .resource(Category::Storage, bucket("big-standard", profile))
        // Size metric (200 GB) overrides the stale inventory figure
        .metric("big-standard", MetricName::BucketSizeBytes, 200.0 * GB, 200.0 * GB)
        .cost(Category::Storage, 100.0, &[("big-standard", 100.0)]);

    let payload = analyzer(builder).analyze(&params()).await.unwrap();

    let tier = find(&payload, RecommendationType::StorageTier, "big-standard").unwrap();
    assert_eq!(tier.priority, Priority::Medium);
    assert_close(savings(tier), 20.0);

    let lifecycle = find(&payload, RecommendationType::LifecyclePolicy, "big-standard").unwrap();
    assert_eq!(lifecycle.priority, Priority::High);
    assert_close(savings(lifecycle), 30.0);

    let versions = find(&payload, RecommendationType::VersionManagement, "big-standard").unwrap();
    assert_close(savings(versions), 15.0);

    let multipart = find(&payload, RecommendationType::MultipartCleanup, "big-standard").unwrap();
    assert_eq!(multipart.priority, Priority::Low);
    assert_eq!(multipart.estimated_monthly_savings, None);

    assert_close(payload.summary.current_monthly_cost, 100.0);
    assert_close(payload.summary.potential_monthly_savings, 65.0);
}

#[tokio::test]
async fn test_medium_bucket_uses_price_table_cost() {
    let builder = SnapshotBuilder::new().resource(
        Category::Storage,
        bucket(
            "mid",
            StorageProfile {
                size_gb: 50.0,
                ..StorageProfile::default()
            },
        ),
    );

    let payload = analyzer(builder).analyze(&params()).await.unwrap();

    // 50 GB in STANDARD at 0.023/GB-month
    assert_close(payload.summary.current_monthly_cost, 1.15);
    let lifecycle = find(&payload, RecommendationType::LifecyclePolicy, "mid").unwrap();
    assert_eq!(lifecycle.priority, Priority::Medium);
    assert_close(savings(lifecycle), 0.23);
    assert!(find(&payload, RecommendationType::StorageTier, "mid").is_some());
}

#[tokio::test]
async fn test_small_and_archived_buckets_are_clean() {
    let archived = StorageProfile {
        size_gb: 500.0,
        storage_classes: [("GLACIER".to_string(), 500.0)].into_iter().collect(),
        lifecycle_policy: true,
        ..StorageProfile::default()
    };
    let builder = SnapshotBuilder::new()
        .resource(Category::Storage, bucket("small", standard_only(0.5)))
        .resource(Category::Storage, bucket("archive", archived));

    let payload = analyzer(builder).analyze(&params()).await.unwrap();

    assert!(payload.recommendations.is_empty());
    assert_eq!(payload.summary.resources_analyzed, 2);
}

#[tokio::test]
async fn test_untagged_bucket_reports_tagging_gap() {
    let builder = SnapshotBuilder::new().resource(
        Category::Storage,
        ResourceDescriptor {
            storage: Some(standard_only(0.1)),
            ..ResourceDescriptor::new("loose")
        },
    );

    let payload = analyzer(builder).analyze(&params()).await.unwrap();

    assert_eq!(of_type(&payload, RecommendationType::TaggingGap).len(), 1);
}
