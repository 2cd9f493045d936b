use bigdecimal::{BigDecimal, Zero};
use rayon::prelude::*;

use crate::config::{FinancingBase, PricingOptions};
use crate::error::{ReconcileError, Result};
use crate::models::{DeductionInputs, Flag, JoinedRecord, PriceBreakdown, PricedRow};
use crate::service::shipping;

/// 扣费反算结果 (未舍入)
#[derive(Debug, Clone, PartialEq)]
pub struct Inversion {
    pub gross_price: BigDecimal,
    pub commission_pct_amount: BigDecimal,
    pub commission_amount: BigDecimal,
    pub financing_amount: BigDecimal,
    pub withholding_amount: BigDecimal,
    pub net_received: BigDecimal,
}

/// 由目标到手金额反算挂牌价
///
/// `gross = (target + f) / (1 - p - r - w)`，扣除佣金 `p·gross + f`、
/// 融资费 `r·gross`、代扣 `w·gross` 后恰好剩下 `target`。
/// 分母 <= 0 时无解，返回 None。
pub fn invert_deductions(
    target: &BigDecimal,
    commission_pct: &BigDecimal,
    commission_fixed: &BigDecimal,
    financing_pct: &BigDecimal,
    withholding_pct: &BigDecimal,
) -> Option<Inversion> {
    let denom = BigDecimal::from(1) - commission_pct - financing_pct - withholding_pct;
    if denom <= BigDecimal::zero() {
        return None;
    }

    let gross_price = (target + commission_fixed) / &denom;
    let commission_pct_amount = commission_pct * &gross_price;
    let commission_amount = &commission_pct_amount + commission_fixed;
    let financing_amount = financing_pct * &gross_price;
    let withholding_amount = withholding_pct * &gross_price;
    let net_received = &gross_price - &commission_amount - &financing_amount - &withholding_amount;

    Some(Inversion {
        gross_price,
        commission_pct_amount,
        commission_amount,
        financing_amount,
        withholding_amount,
        net_received,
    })
}

/// 价格中包含的税额 (仅展示，不参与到手金额计算)
pub fn embedded_tax(gross_price: &BigDecimal, tax_pct: &BigDecimal) -> BigDecimal {
    if *tax_pct <= BigDecimal::zero() {
        return BigDecimal::zero();
    }
    (gross_price * tax_pct) / &(BigDecimal::from(1) + tax_pct)
}

/// 定价引擎：逐行无状态计算
#[derive(Debug, Clone)]
pub struct PricingEngine {
    options: PricingOptions,
}

impl PricingEngine {
    pub fn new(options: PricingOptions) -> Result<Self> {
        if options.financing_base == FinancingBase::TariffPlusMarketplaceFee {
            return Err(ReconcileError::UnsupportedFinancingBase);
        }
        Ok(Self { options })
    }

    pub fn options(&self) -> &PricingOptions {
        &self.options
    }

    /// 计算单行价格明细
    pub fn resolve_price(&self, inputs: &DeductionInputs) -> PriceBreakdown {
        let tariff_with_tax = &inputs.tariff_price * &(BigDecimal::from(1) + &inputs.tax_pct);
        let base = if self.options.include_tax_in_base {
            tariff_with_tax.clone()
        } else {
            inputs.tariff_price.clone()
        };

        let shipping_surcharge =
            shipping::surcharge_for(&self.options, &base, inputs.shipping_eligible);
        let target = &base + &shipping_surcharge;

        let inversion = invert_deductions(
            &target,
            &inputs.commission_pct,
            &inputs.commission_fixed,
            &inputs.financing_pct,
            &inputs.withholding_pct,
        );

        match inversion {
            Some(inv) => PriceBreakdown {
                tariff_price: inputs.tariff_price.clone(),
                tariff_with_tax,
                shipping_surcharge,
                target,
                tax_amount: embedded_tax(&inv.gross_price, &inputs.tax_pct),
                gross_price: inv.gross_price,
                commission_pct_amount: inv.commission_pct_amount,
                commission_fixed_amount: inputs.commission_fixed.clone(),
                commission_amount: inv.commission_amount,
                financing_amount: inv.financing_amount,
                withholding_amount: inv.withholding_amount,
                net_received: inv.net_received,
                valid: true,
            },
            None => PriceBreakdown {
                tariff_price: inputs.tariff_price.clone(),
                tariff_with_tax,
                shipping_surcharge,
                target,
                gross_price: BigDecimal::zero(),
                commission_pct_amount: BigDecimal::zero(),
                commission_fixed_amount: BigDecimal::zero(),
                commission_amount: BigDecimal::zero(),
                financing_amount: BigDecimal::zero(),
                withholding_amount: BigDecimal::zero(),
                net_received: BigDecimal::zero(),
                tax_amount: BigDecimal::zero(),
                valid: false,
            },
        }
    }

    /// 对关联记录定价；无解时追加标记
    pub fn price_row(&self, mut record: JoinedRecord) -> PricedRow {
        let eligible = shipping::is_surcharge_eligible(
            record.listing.shipping_method.as_deref(),
            &self.options.shipping_marker,
        );
        let inputs = DeductionInputs::from_joined(&record, eligible);
        let breakdown = self.resolve_price(&inputs);

        if !breakdown.valid {
            tracing::warn!(
                "Listing {} ({}): deduction percentages sum to 100% or more, no price resolved",
                record.listing.item_id,
                record.listing.product_code
            );
            record.notes.push(Flag::NoSolution);
        }

        PricedRow { record, breakdown }
    }

    /// 批量定价：行间无依赖，并行计算且保持输入顺序
    pub fn price_rows(&self, records: Vec<JoinedRecord>) -> Vec<PricedRow> {
        records
            .into_par_iter()
            .map(|record| self.price_row(record))
            .collect()
    }
}
