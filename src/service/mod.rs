pub mod merger;
pub mod pricing_engine;
pub mod reconciler;
pub mod shipping;

pub use merger::merge_and_validate;
pub use pricing_engine::PricingEngine;
pub use reconciler::{ReconcileReport, Reconciler};
