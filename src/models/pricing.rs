use bigdecimal::{BigDecimal, Zero};
use serde::{Deserialize, Serialize};

use super::JoinedRecord;

/// 单行定价输入 (已归一化：百分比均为小数形式)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeductionInputs {
    pub tariff_price: BigDecimal,
    pub commission_pct: BigDecimal,
    pub commission_fixed: BigDecimal,
    pub financing_pct: BigDecimal,
    pub withholding_pct: BigDecimal,
    pub tax_pct: BigDecimal,
    pub shipping_eligible: bool,
}

impl DeductionInputs {
    /// 从关联记录提取定价输入；`shipping_eligible` 由调用方判定
    pub fn from_joined(record: &JoinedRecord, shipping_eligible: bool) -> Self {
        let listing = &record.listing;
        Self {
            tariff_price: record.tariff_price(),
            commission_pct: listing.commission_pct.clone(),
            commission_fixed: listing.commission_fixed.clone(),
            financing_pct: listing.financing_pct.clone(),
            withholding_pct: listing
                .withholding_pct
                .clone()
                .unwrap_or_else(BigDecimal::zero),
            tax_pct: record.tax_pct(),
            shipping_eligible,
        }
    }
}

/// 单行定价结果
///
/// 保存未舍入的值，`net_received == target` 在这里精确成立；
/// 展示时使用 [`PriceBreakdown::rounded`]。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceBreakdown {
    pub tariff_price: BigDecimal,
    pub tariff_with_tax: BigDecimal,
    pub shipping_surcharge: BigDecimal,
    pub target: BigDecimal,
    pub gross_price: BigDecimal,
    pub commission_pct_amount: BigDecimal,
    pub commission_fixed_amount: BigDecimal,
    pub commission_amount: BigDecimal,
    pub financing_amount: BigDecimal,
    pub withholding_amount: BigDecimal,
    pub net_received: BigDecimal,
    pub tax_amount: BigDecimal,
    pub valid: bool,
}

/// 金额展示：四舍五入到 2 位小数
pub fn round_money(value: &BigDecimal) -> BigDecimal {
    value.round(2).with_scale(2)
}

impl PriceBreakdown {
    pub fn rounded(&self) -> Self {
        Self {
            tariff_price: round_money(&self.tariff_price),
            tariff_with_tax: round_money(&self.tariff_with_tax),
            shipping_surcharge: round_money(&self.shipping_surcharge),
            target: round_money(&self.target),
            gross_price: round_money(&self.gross_price),
            commission_pct_amount: round_money(&self.commission_pct_amount),
            commission_fixed_amount: round_money(&self.commission_fixed_amount),
            commission_amount: round_money(&self.commission_amount),
            financing_amount: round_money(&self.financing_amount),
            withholding_amount: round_money(&self.withholding_amount),
            net_received: round_money(&self.net_received),
            tax_amount: round_money(&self.tax_amount),
            valid: self.valid,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).unwrap()
    }

    #[test]
    fn test_round_money_half_up() {
        assert_eq!(round_money(&dec("24042.944785")).to_string(), "24042.94");
        assert_eq!(round_money(&dec("961.725")).to_string(), "961.73");
        assert_eq!(round_money(&dec("18500")).to_string(), "18500.00");
        assert_eq!(round_money(&dec("0")).to_string(), "0.00");
    }
}
