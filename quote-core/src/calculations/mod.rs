//! Pricing calculations for quote requests.
//!
//! The estimator turns a service identifier and a timeline choice into an
//! [`Estimate`](crate::models::Estimate) using the static rate table.

pub mod common;
pub mod estimator;

pub use estimator::{Estimator, TimelineChoice};
