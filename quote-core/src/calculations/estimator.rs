//! Price and timeline estimation.
//!
//! | Timeline choice | Price                                | Label                   |
//! |-----------------|--------------------------------------|-------------------------|
//! | `urgent`        | `base_price × urgent_multiplier`     | table express label     |
//! | `flexible`      | `base_price × flexible_discount`     | table flexible label    |
//! | anything else   | `base_price`                         | service timeline label  |
//!
//! Prices are rounded to whole currency units.
//!
//! # Example
//!
//! ```
//! use quote_core::{Estimator, RateTable};
//!
//! let rates = RateTable::default();
//! let estimate = Estimator::new(&rates).estimate("site-web", "urgent").unwrap();
//!
//! assert_eq!(estimate.price, 1950);
//! assert!(estimate.timeline_label.contains("Express"));
//! ```

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use tracing::warn;

use crate::calculations::common::round_to_unit;
use crate::models::{Estimate, RateTable, ServiceRate};

/// How soon the client needs the work done.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimelineChoice {
    Urgent,
    Flexible,
    Standard,
}

impl TimelineChoice {
    /// Maps the raw timeline answer. Unrecognised values mean standard.
    pub fn parse(s: &str) -> Self {
        match s.trim() {
            "urgent" => Self::Urgent,
            "flexible" => Self::Flexible,
            _ => Self::Standard,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Estimator<'a> {
    rates: &'a RateTable,
}

impl<'a> Estimator<'a> {
    pub fn new(rates: &'a RateTable) -> Self {
        Self { rates }
    }

    /// Estimates the price and timeline for `service_id`.
    ///
    /// Returns `None` when the service is not in the rate table or the
    /// price does not fit in an `i64`.
    pub fn estimate(
        &self,
        service_id: &str,
        timeline: &str,
    ) -> Option<Estimate> {
        let rate = self.rates.get(service_id)?;
        let choice = TimelineChoice::parse(timeline);

        let Some(adjusted) = self.adjusted_price(rate, choice) else {
            warn!(service_id, "estimated price overflows");
            return None;
        };
        let price = round_to_unit(adjusted);
        let Some(price) = price.to_i64() else {
            warn!(service_id, %price, "estimated price out of range");
            return None;
        };

        Some(Estimate {
            price,
            timeline_label: self.timeline_label(rate, choice).to_string(),
            is_hourly: rate.is_hourly,
        })
    }

    fn adjusted_price(
        &self,
        rate: &ServiceRate,
        choice: TimelineChoice,
    ) -> Option<Decimal> {
        match choice {
            TimelineChoice::Urgent => rate.base_price.checked_mul(rate.urgent_multiplier),
            TimelineChoice::Flexible => rate.base_price.checked_mul(rate.flexible_discount),
            TimelineChoice::Standard => Some(rate.base_price),
        }
    }

    fn timeline_label<'r>(
        &'r self,
        rate: &'r ServiceRate,
        choice: TimelineChoice,
    ) -> &'r str {
        match choice {
            TimelineChoice::Urgent => self.rates.express_label(),
            TimelineChoice::Flexible => self.rates.flexible_label(),
            TimelineChoice::Standard => &rate.timeline_label,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn single_service_table(rate: ServiceRate) -> RateTable {
        let mut services = BTreeMap::new();
        services.insert("svc".to_string(), rate);
        RateTable::new(services)
    }

    // =========================================================================
    // TimelineChoice
    // =========================================================================

    #[test]
    fn timeline_choice_recognises_urgent_and_flexible() {
        assert_eq!(TimelineChoice::parse("urgent"), TimelineChoice::Urgent);
        assert_eq!(TimelineChoice::parse("flexible"), TimelineChoice::Flexible);
    }

    #[test]
    fn timeline_choice_defaults_to_standard() {
        assert_eq!(TimelineChoice::parse("normal"), TimelineChoice::Standard);
        assert_eq!(TimelineChoice::parse(""), TimelineChoice::Standard);
        assert_eq!(TimelineChoice::parse("URGENT"), TimelineChoice::Standard);
    }

    // =========================================================================
    // estimate
    // =========================================================================

    #[test]
    fn urgent_site_applies_multiplier_and_express_label() {
        let rates = RateTable::default();

        let estimate = Estimator::new(&rates).estimate("site-web", "urgent").unwrap();

        assert_eq!(estimate.price, 1950);
        assert!(estimate.timeline_label.contains("Express"));
        assert!(!estimate.is_hourly);
    }

    #[test]
    fn flexible_consulting_keeps_hourly_rate() {
        let rates = RateTable::default();

        let estimate = Estimator::new(&rates)
            .estimate("consulting", "flexible")
            .unwrap();

        assert_eq!(estimate.price, 85);
        assert!(estimate.is_hourly);
        assert_eq!(estimate.timeline_label, rates.flexible_label());
    }

    #[test]
    fn flexible_flat_rate_applies_discount() {
        let rates = RateTable::default();

        let estimate = Estimator::new(&rates).estimate("app-web", "flexible").unwrap();

        assert_eq!(estimate.price, 3150);
    }

    #[test]
    fn standard_timeline_uses_base_price_and_service_label() {
        let rates = RateTable::default();

        let estimate = Estimator::new(&rates).estimate("design", "normal").unwrap();

        assert_eq!(
            estimate,
            Estimate {
                price: 800,
                timeline_label: "2-4 weeks".to_string(),
                is_hourly: false,
            }
        );
    }

    #[test]
    fn urgent_consulting_uses_its_own_multiplier() {
        let rates = RateTable::default();

        let estimate = Estimator::new(&rates).estimate("consulting", "urgent").unwrap();

        assert_eq!(estimate.price, 102);
    }

    #[test]
    fn unknown_service_yields_no_estimate() {
        let rates = RateTable::default();

        assert_eq!(Estimator::new(&rates).estimate("logo", "urgent"), None);
    }

    #[test]
    fn fractional_price_is_rounded_to_nearest_unit() {
        let rates = single_service_table(ServiceRate {
            base_price: dec!(999),
            timeline_label: "1 week".to_string(),
            is_hourly: false,
            urgent_multiplier: dec!(1.25),
            flexible_discount: dec!(0.85),
        });
        let estimator = Estimator::new(&rates);

        // 999 × 1.25 = 1248.75
        assert_eq!(estimator.estimate("svc", "urgent").unwrap().price, 1249);
        // 999 × 0.85 = 849.15
        assert_eq!(estimator.estimate("svc", "flexible").unwrap().price, 849);
    }

    #[test]
    fn midpoint_price_rounds_up() {
        let rates = single_service_table(ServiceRate {
            base_price: dec!(5),
            timeline_label: "1 day".to_string(),
            is_hourly: true,
            urgent_multiplier: dec!(1.5),
            flexible_discount: dec!(1),
        });

        // 5 × 1.5 = 7.5
        let estimate = Estimator::new(&rates).estimate("svc", "urgent").unwrap();

        assert_eq!(estimate.price, 8);
    }

    #[test]
    fn overflowing_price_yields_no_estimate() {
        let rates = single_service_table(ServiceRate {
            base_price: Decimal::MAX,
            timeline_label: "never".to_string(),
            is_hourly: false,
            urgent_multiplier: dec!(2),
            flexible_discount: dec!(0.5),
        });
        let estimator = Estimator::new(&rates);

        assert_eq!(estimator.estimate("svc", "urgent"), None);
        assert_eq!(estimator.estimate("svc", "flexible"), None);
        assert_eq!(estimator.estimate("svc", "normal"), None);
    }

    #[test]
    fn custom_labels_flow_into_estimates() {
        let rates = RateTable::default().with_labels("Rush job", "No hurry");
        let estimator = Estimator::new(&rates);

        assert_eq!(
            estimator.estimate("design", "urgent").unwrap().timeline_label,
            "Rush job"
        );
        assert_eq!(
            estimator.estimate("design", "flexible").unwrap().timeline_label,
            "No hurry"
        );
    }

    #[test]
    fn estimate_is_deterministic() {
        let rates = RateTable::default();
        let estimator = Estimator::new(&rates);

        for service in rates.service_ids() {
            for timeline in ["urgent", "flexible", "normal"] {
                assert_eq!(
                    estimator.estimate(service, timeline),
                    estimator.estimate(service, timeline)
                );
            }
        }
    }
}
