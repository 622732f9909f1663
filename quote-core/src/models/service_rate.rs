use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Label used in place of the service timeline for `urgent` requests.
pub const DEFAULT_EXPRESS_LABEL: &str = "Express (under 2 weeks)";

/// Label used in place of the service timeline for `flexible` requests.
pub const DEFAULT_FLEXIBLE_LABEL: &str = "Flexible (over 6 weeks)";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceRate {
    pub base_price: Decimal,
    pub timeline_label: String,
    #[serde(default)]
    pub is_hourly: bool,
    pub urgent_multiplier: Decimal,
    pub flexible_discount: Decimal,
}

/// Immutable pricing table keyed by service identifier.
///
/// Built once at startup, either from [`RateTable::default`] or from a rate
/// file, and shared read-only with every wizard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateTable {
    services: BTreeMap<String, ServiceRate>,
    express_label: String,
    flexible_label: String,
}

impl RateTable {
    pub fn new(services: BTreeMap<String, ServiceRate>) -> Self {
        Self {
            services,
            express_label: DEFAULT_EXPRESS_LABEL.to_string(),
            flexible_label: DEFAULT_FLEXIBLE_LABEL.to_string(),
        }
    }

    /// Replaces the labels shown for express and flexible timelines.
    pub fn with_labels(
        mut self,
        express: impl Into<String>,
        flexible: impl Into<String>,
    ) -> Self {
        self.express_label = express.into();
        self.flexible_label = flexible.into();
        self
    }

    pub fn get(
        &self,
        service_id: &str,
    ) -> Option<&ServiceRate> {
        self.services.get(service_id)
    }

    pub fn contains(
        &self,
        service_id: &str,
    ) -> bool {
        self.services.contains_key(service_id)
    }

    /// Service identifiers in alphabetical order.
    pub fn service_ids(&self) -> impl Iterator<Item = &str> {
        self.services.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ServiceRate)> {
        self.services.iter().map(|(id, rate)| (id.as_str(), rate))
    }

    pub fn len(&self) -> usize {
        self.services.len()
    }

    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }

    pub fn express_label(&self) -> &str {
        &self.express_label
    }

    pub fn flexible_label(&self) -> &str {
        &self.flexible_label
    }
}

fn flat_rate(
    base_price: i64,
    timeline_label: &str,
) -> ServiceRate {
    ServiceRate {
        base_price: Decimal::from(base_price),
        timeline_label: timeline_label.to_string(),
        is_hourly: false,
        urgent_multiplier: Decimal::new(13, 1),
        flexible_discount: Decimal::new(9, 1),
    }
}

/// The rates published on the portfolio site, in euros.
impl Default for RateTable {
    fn default() -> Self {
        let mut services = BTreeMap::new();
        services.insert("site-web".to_string(), flat_rate(1500, "2-4 weeks"));
        services.insert("app-web".to_string(), flat_rate(3500, "4-8 weeks"));
        services.insert("automatisation".to_string(), flat_rate(450, "1-2 weeks"));
        services.insert("design".to_string(), flat_rate(800, "2-4 weeks"));
        services.insert(
            "consulting".to_string(),
            ServiceRate {
                base_price: Decimal::from(85),
                timeline_label: "Flexible".to_string(),
                is_hourly: true,
                urgent_multiplier: Decimal::new(12, 1),
                flexible_discount: Decimal::ONE,
            },
        );
        Self::new(services)
    }
}
