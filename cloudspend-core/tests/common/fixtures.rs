//! Test data fixtures for cloudspend-core

use std::num::NonZeroU32;

use chrono::Utc;
use cloudspend_core::domain::provider::TimeWindow;

pub fn thirty_days() -> TimeWindow {
    TimeWindow::trailing_days(NonZeroU32::new(30).unwrap(), Utc::now()).unwrap()
}

/// Small account export covering every category
pub fn sample_snapshot_json() -> &'static str {
    r#"{
  "resources": {
    "compute": [
      {"resource_id": "i-web", "resource_type": "m5.xlarge", "state": "running",
       "tags": {"Environment": "Production", "Owner": "web", "Project": "shop"}},
      {"resource_id": "i-old", "resource_type": "t3.large", "state": "stopped"}
    ],
    "storage": [
      {"resource_id": "logs-bucket",
       "storage": {"size_gb": 250.0, "storage_classes": {"STANDARD": 250.0},
                   "versioning_enabled": true, "incomplete_multipart_uploads": 3}}
    ],
    "database": [
      {"resource_id": "orders-db", "resource_type": "db.m5.large", "state": "available",
       "multi_az": true, "backup_retention_days": 14}
    ],
    "commitments": [
      {"resource_id": "ri-1", "resource_type": "m5.large", "commitment": "reserved_instance"}
    ]
  },
  "metrics": [
    {"resource_id": "i-web", "metric": "cpu_utilization",
     "samples": [{"average": 12.0, "maximum": 60.0}]},
    {"resource_id": "ri-1", "metric": "commitment_utilization",
     "samples": [{"average": 45.0, "maximum": 45.0}]}
  ],
  "costs": {
    "compute": {"total": 400.0, "per_resource": {"i-web": 400.0}},
    "storage": {"total": 5.75}
  }
}"#
}
