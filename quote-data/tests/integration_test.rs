//! Integration tests for rate table loading feeding the estimator.

use pretty_assertions::assert_eq;
use quote_core::{Estimator, RateTable};
use quote_data::{RateTableError, RateTableLoader};
use rust_decimal_macros::dec;

const SERVICE_RATES_CSV: &str = include_str!("../test-data/service_rates.csv");

fn rates_path() -> std::path::PathBuf {
    std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("test-data/service_rates.csv")
}

#[test]
fn test_bundled_csv_matches_default_table() {
    let loaded = RateTableLoader::from_reader(SERVICE_RATES_CSV.as_bytes())
        .expect("Failed to load bundled rates");

    assert_eq!(loaded, RateTable::default());
}

#[test]
fn test_load_file_from_disk() {
    let table = RateTableLoader::load_file(rates_path()).expect("Failed to load rates file");

    assert_eq!(table.len(), 5);
    assert_eq!(table.get("app-web").unwrap().base_price, dec!(3500));
}

#[test]
fn test_loaded_table_drives_estimates() {
    let table = RateTableLoader::load_file(rates_path()).unwrap();
    let estimator = Estimator::new(&table);

    let urgent_site = estimator.estimate("site-web", "urgent").unwrap();
    assert_eq!(urgent_site.price, 1950);
    assert!(urgent_site.timeline_label.contains("Express"));

    let flexible_consulting = estimator.estimate("consulting", "flexible").unwrap();
    assert_eq!(flexible_consulting.price, 85);
    assert!(flexible_consulting.is_hourly);

    let standard_automation = estimator.estimate("automatisation", "normal").unwrap();
    assert_eq!(standard_automation.price, 450);
    assert_eq!(standard_automation.timeline_label, "1-2 weeks");
}

#[test]
fn test_custom_rates_change_estimates() {
    let csv = "service_id,base_price,timeline_label,is_hourly,urgent_multiplier,flexible_discount\n\
               audit,1200,1 week,false,1.5,0.75";

    let table = RateTableLoader::from_reader(csv.as_bytes()).unwrap();
    let estimator = Estimator::new(&table);

    assert_eq!(estimator.estimate("audit", "urgent").unwrap().price, 1800);
    assert_eq!(estimator.estimate("audit", "flexible").unwrap().price, 900);
    assert!(estimator.estimate("site-web", "urgent").is_none());
}

#[test]
fn test_error_messages_name_the_service() {
    let csv = "service_id,base_price,timeline_label,is_hourly,urgent_multiplier,flexible_discount\n\
               audit,0,1 week,false,1.5,0.75";

    let err = RateTableLoader::from_reader(csv.as_bytes()).unwrap_err();

    assert!(matches!(err, RateTableError::InvalidRate { .. }));
    assert_eq!(
        err.to_string(),
        "Invalid rate for 'audit': base_price must be positive"
    );
}

#[test]
fn test_huge_factor_gives_no_estimate_instead_of_failing() {
    let csv = "service_id,base_price,timeline_label,is_hourly,urgent_multiplier,flexible_discount\n\
               big,1000000000000000000,x,false,1000000000000,0.9\n";
    let table = RateTableLoader::from_reader(csv.as_bytes()).expect("rate file loads");
    let estimator = Estimator::new(&table);

    assert_eq!(estimator.estimate("big", "urgent"), None);
    assert_eq!(
        estimator.estimate("big", "flexible").map(|e| e.price),
        Some(900_000_000_000_000_000)
    );
    assert_eq!(
        estimator.estimate("big", "normal").map(|e| e.price),
        Some(1_000_000_000_000_000_000)
    );
}
