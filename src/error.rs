use std::fmt;
use thiserror::Error;

/// 数据来源 (用于结构性错误提示)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dataset {
    Listings,
    Inventory,
}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dataset::Listings => write!(f, "marketplace listings"),
            Dataset::Inventory => write!(f, "inventory"),
        }
    }
}

/// 结构性错误：只有这些错误会中断整个批次
#[derive(Debug, Error)]
pub enum ReconcileError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("{dataset} export is missing required column '{column}'")]
    MissingColumn { dataset: Dataset, column: String },

    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error(
        "financing base 'tariff_plus_marketplace_fee' has no defined formula; \
         use 'tariff' until the variant is specified"
    )]
    UnsupportedFinancingBase,
}

pub type Result<T> = std::result::Result<T, ReconcileError>;
