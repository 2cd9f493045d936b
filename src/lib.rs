pub mod config;
pub mod error;
pub mod io;
pub mod models;
pub mod service;

pub use crate::config::{AppConfig, PricingOptions};
pub use error::{ReconcileError, Result};
pub use service::{PricingEngine, ReconcileReport, Reconciler};
