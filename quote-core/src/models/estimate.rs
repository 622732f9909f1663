use std::fmt;

use serde::{Deserialize, Serialize};

/// Price and timeline projection for the selected service.
///
/// Derived from the answers on every pricing change; never persisted with
/// a draft.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Estimate {
    /// Whole currency units (euros), or euros per hour when `is_hourly`.
    pub price: i64,
    pub timeline_label: String,
    pub is_hourly: bool,
}

impl Estimate {
    /// Formats the price the way the quote form shows it: `85€/hour` for
    /// hourly rates, `1,950€` for flat prices.
    pub fn display_price(&self) -> String {
        if self.is_hourly {
            format!("{}€/hour", self.price)
        } else {
            format!("{}€", group_thousands(self.price))
        }
    }
}

impl fmt::Display for Estimate {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "{} ({})", self.display_price(), self.timeline_label)
    }
}

fn group_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        grouped.push('-');
    }
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}
