//! Database analyzer tests

mod common;

use cloudspend_analyzers::DatabaseAnalyzer;
use cloudspend_core::config::DatabaseThresholds;
use cloudspend_core::domain::analyzer::{Category, CategoryAnalyzer, Priority, RecommendationType};
use cloudspend_core::domain::provider::{MetricName, ResourceDescriptor};

use common::*;

fn analyzer(builder: SnapshotBuilder) -> DatabaseAnalyzer {
    let provider = builder.build();
    DatabaseAnalyzer::new(provider.clone(), provider, DatabaseThresholds::default())
}

fn multi_az(mut descriptor: ResourceDescriptor, backup_days: u32) -> ResourceDescriptor {
    descriptor.multi_az = true;
    descriptor.backup_retention_days = Some(backup_days);
    descriptor
}

fn databases() -> SnapshotBuilder {
    SnapshotBuilder::new()
        .resource(
            Category::Database,
            fully_tagged(multi_az(resource("db-idle", "db.m5.large", "available"), 14)),
        )
        .resource(
            Category::Database,
            fully_tagged(multi_az(resource("db-busy", "db.m5.large", "available"), 14)),
        )
        .resource(
            Category::Database,
            fully_tagged(resource("db-small", "db.t3.medium", "available")),
        )
        .resource(
            Category::Database,
            fully_tagged(resource("db-stopped", "db.m5.xlarge", "stopped")),
        )
        .metric("db-idle", MetricName::CpuUtilization, 1.0, 2.0)
        .metric("db-idle", MetricName::DatabaseConnections, 0.2, 1.0)
        .metric("db-busy", MetricName::CpuUtilization, 25.0, 70.0)
        .metric("db-busy", MetricName::DatabaseConnections, 50.0, 80.0)
        .metric("db-busy", MetricName::ReadIops, 30.0, 60.0)
        .metric("db-busy", MetricName::WriteIops, 20.0, 40.0)
        .metric("db-small", MetricName::CpuUtilization, 50.0, 80.0)
        .metric("db-small", MetricName::DatabaseConnections, 10.0, 20.0)
        .metric("db-small", MetricName::ReadIops, 10.0, 10.0)
        .metric("db-small", MetricName::WriteIops, 10.0, 10.0)
        .cost(Category::Database, 200.0, &[("db-busy", 200.0)])
}

#[tokio::test]
async fn test_idle_database_supersedes_other_savings_rules() {
    let payload = analyzer(databases()).analyze(&params()).await.unwrap();

    let idle = find(&payload, RecommendationType::IdleResource, "db-idle").unwrap();
    assert_eq!(idle.priority, Priority::High);
    // db.m5.large list price, 0.171/h for 720 h
    assert_close(savings(idle), 123.12);

    let others: Vec<_> = payload
        .recommendations
        .iter()
        .filter(|r| r.resource_id.as_deref() == Some("db-idle"))
        .collect();
    assert_eq!(others.len(), 1);
}

#[tokio::test]
async fn test_provisioning_rules_for_lightly_used_multi_az() {
    let payload = analyzer(databases()).analyze(&params()).await.unwrap();

    let review = find(&payload, RecommendationType::MultiAzReview, "db-busy").unwrap();
    assert_eq!(review.priority, Priority::Medium);
    assert_close(savings(review), 100.0);

    let burstable = find(&payload, RecommendationType::BurstableInstance, "db-busy").unwrap();
    assert_eq!(burstable.priority, Priority::Medium);
    assert_close(savings(burstable), 50.0);

    let backups = find(&payload, RecommendationType::BackupRetention, "db-busy").unwrap();
    assert_eq!(backups.priority, Priority::Low);
    assert_close(savings(backups), 10.0);

    // 25% average CPU is above the right-sizing threshold
    assert!(find(&payload, RecommendationType::RightSizing, "db-busy").is_none());
}

#[tokio::test]
async fn test_burstable_classes_are_not_flagged_again() {
    let payload = analyzer(databases()).analyze(&params()).await.unwrap();
    assert!(find(&payload, RecommendationType::BurstableInstance, "db-small").is_none());
    assert!(
        payload
            .recommendations
            .iter()
            .all(|r| r.resource_id.as_deref() != Some("db-small"))
    );
}

#[tokio::test]
async fn test_only_available_databases_are_analyzed() {
    let payload = analyzer(databases()).analyze(&params()).await.unwrap();
    assert_eq!(payload.summary.resources_analyzed, 3);
}

#[tokio::test]
async fn test_low_cpu_without_connection_data_is_right_sized_not_idle() {
    let builder = SnapshotBuilder::new()
        .resource(
            Category::Database,
            fully_tagged(resource("db-quiet", "db.m5.xlarge", "available")),
        )
        .metric("db-quiet", MetricName::CpuUtilization, 3.0, 4.0)
        .cost(Category::Database, 400.0, &[("db-quiet", 400.0)]);

    let payload = analyzer(builder).analyze(&params()).await.unwrap();

    assert!(find(&payload, RecommendationType::IdleResource, "db-quiet").is_none());
    let rec = find(&payload, RecommendationType::RightSizing, "db-quiet").unwrap();
    assert_eq!(rec.priority, Priority::High);
    assert_close(savings(rec), 120.0);
}

#[tokio::test]
async fn test_savings_never_exceed_resource_cost() {
    let builder = SnapshotBuilder::new()
        .resource(
            Category::Database,
            multi_az(resource("db-everything", "db.m5.large", "available"), 30),
        )
        .metric("db-everything", MetricName::CpuUtilization, 5.0, 40.0)
        .metric("db-everything", MetricName::DatabaseConnections, 5.0, 9.0)
        .metric("db-everything", MetricName::ReadIops, 1.0, 2.0)
        .metric("db-everything", MetricName::WriteIops, 1.0, 2.0)
        .cost(Category::Database, 100.0, &[("db-everything", 100.0)]);

    let payload = analyzer(builder).analyze(&params()).await.unwrap();

    // right-sizing 30 + multi-AZ 50 + burstable 25 + backups 5 would be 110
    assert_close(payload.summary.potential_monthly_savings, 100.0);
    assert!(find(&payload, RecommendationType::TaggingGap, "db-everything").is_some());
}
