use bigdecimal::{BigDecimal, Zero};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::Result;

/// 默认的"自行配送"标记 (运费附加费只对这种配送方式生效)
pub const DEFAULT_SHIPPING_MARKER: &str = "Mercado Envíos por mi cuenta";

/// 应用配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub input: InputConfig,
    pub output: OutputConfig,
    pub pricing: PricingOptions,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    pub listings_path: PathBuf,
    pub inventory_path: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub path: PathBuf,
}

/// 融资费计算基数
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinancingBase {
    #[default]
    Tariff,
    /// 公式尚未确定，引擎会拒绝该配置
    TariffPlusMarketplaceFee,
}

/// 运费附加费模式
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShippingSurchargeMode {
    #[default]
    None,
    Fixed,
    Percentage,
}

/// 定价引擎参数
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingOptions {
    pub financing_base: FinancingBase,
    pub include_tax_in_base: bool,
    pub shipping_surcharge_mode: ShippingSurchargeMode,
    pub shipping_surcharge_value: BigDecimal,
    pub shipping_marker: String,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            listings_path: PathBuf::from("listings.csv"),
            inventory_path: PathBuf::from("inventory.csv"),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("listing_prices.csv"),
        }
    }
}

impl Default for PricingOptions {
    fn default() -> Self {
        Self {
            financing_base: FinancingBase::Tariff,
            include_tax_in_base: false,
            shipping_surcharge_mode: ShippingSurchargeMode::None,
            shipping_surcharge_value: BigDecimal::zero(),
            shipping_marker: DEFAULT_SHIPPING_MARKER.to_string(),
        }
    }
}

impl PricingOptions {
    /// 输出中是否需要"运费附加费"列
    pub fn shipping_enabled(&self) -> bool {
        self.shipping_surcharge_mode != ShippingSurchargeMode::None
    }
}

impl AppConfig {
    /// 加载配置：可选的 reconcile.toml，再由环境变量覆盖
    /// (例如 PRICE_RECONCILE__PRICING__INCLUDE_TAX_IN_BASE=true)
    pub fn load() -> Result<Self> {
        Self::load_with(environment())
    }

    fn load_with(env: config::Environment) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name("reconcile").required(false))
            .add_source(env)
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}

fn environment() -> config::Environment {
    config::Environment::with_prefix("PRICE_RECONCILE")
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}
