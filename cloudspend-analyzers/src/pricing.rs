//! On-demand price table used when billing data cannot be attributed to a resource

/// Hours used to turn an hourly price into a monthly cost
pub const HOURS_PER_MONTH: f64 = 720.0;

pub const DEFAULT_INSTANCE_HOURLY: f64 = 0.10;
pub const DEFAULT_DB_INSTANCE_HOURLY: f64 = 0.20;
pub const DEFAULT_STORAGE_GB_MONTH: f64 = 0.023;

const INSTANCE_HOURLY: &[(&str, f64)] = &[
    ("t3.micro", 0.0104),
    ("t3.small", 0.0208),
    ("t3.medium", 0.0416),
    ("t3.large", 0.0832),
    ("m5.large", 0.096),
    ("m5.xlarge", 0.192),
    ("m5.2xlarge", 0.384),
    ("c5.large", 0.085),
    ("c5.xlarge", 0.17),
];

const DB_INSTANCE_HOURLY: &[(&str, f64)] = &[
    ("db.t3.micro", 0.017),
    ("db.t3.small", 0.034),
    ("db.t3.medium", 0.068),
    ("db.m5.large", 0.171),
    ("db.m5.xlarge", 0.342),
];

const STORAGE_GB_MONTH: &[(&str, f64)] = &[
    ("STANDARD", 0.023),
    ("INTELLIGENT_TIERING", 0.023),
    ("STANDARD_IA", 0.0125),
    ("ONEZONE_IA", 0.01),
    ("GLACIER_IR", 0.004),
    ("GLACIER", 0.0036),
    ("DEEP_ARCHIVE", 0.00099),
];

fn lookup(table: &[(&str, f64)], key: &str) -> Option<f64> {
    table
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(key))
        .map(|(_, price)| *price)
}

/// Monthly on-demand cost of an instance type
pub fn instance_monthly_cost(instance_type: Option<&str>) -> f64 {
    let hourly = instance_type
        .and_then(|t| lookup(INSTANCE_HOURLY, t))
        .unwrap_or(DEFAULT_INSTANCE_HOURLY);
    hourly * HOURS_PER_MONTH
}

/// Monthly on-demand cost of a database instance class
pub fn db_instance_monthly_cost(instance_class: Option<&str>) -> f64 {
    let hourly = instance_class
        .and_then(|c| lookup(DB_INSTANCE_HOURLY, c))
        .unwrap_or(DEFAULT_DB_INSTANCE_HOURLY);
    hourly * HOURS_PER_MONTH
}

/// Per-GB monthly price of a storage class
pub fn storage_gb_month_price(storage_class: &str) -> f64 {
    lookup(STORAGE_GB_MONTH, storage_class).unwrap_or(DEFAULT_STORAGE_GB_MONTH)
}
