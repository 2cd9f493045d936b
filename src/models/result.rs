use bigdecimal::{BigDecimal, Zero};
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use super::pricing::round_money;
use super::{JoinedRecord, Notes, PriceBreakdown};
use crate::config::PricingOptions;

/// 定价后的单行 (关联记录 + 计算结果 + 全部标记)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricedRow {
    pub record: JoinedRecord,
    pub breakdown: PriceBreakdown,
}

impl PricedRow {
    pub fn notes(&self) -> &Notes {
        &self.record.notes
    }
}

/// 输出列布局：可选列由定价参数决定
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OutputLayout {
    pub include_tax: bool,
    pub include_shipping: bool,
}

impl OutputLayout {
    pub fn from_options(options: &PricingOptions) -> Self {
        Self {
            include_tax: options.include_tax_in_base,
            include_shipping: options.shipping_enabled(),
        }
    }

    /// 表头 (顺序固定)
    pub fn headers(&self) -> Vec<&'static str> {
        let mut headers = vec!["ITEM_ID", "SKU", "PRODUCT_NAME", "STOCK", "TARIFF_PRICE"];
        if self.include_tax {
            headers.push("TARIFF_PLUS_TAX");
        }
        headers.extend([
            "FINAL_PRICE",
            "VALUE_ADDED_TAX",
            "COMMISSION_PCT_AMOUNT",
            "COMMISSION_FIXED_AMOUNT",
            "FINANCING_AMOUNT",
            "WITHHOLDING_AMOUNT",
            "NET_RECEIVED",
        ]);
        if self.include_shipping {
            headers.push("SHIPPING_SURCHARGE");
        }
        headers.extend([
            "COMMISSION_PCT_APPLIED",
            "FINANCING_PCT_APPLIED",
            "LISTING_TYPE",
            "CURRENT_MARKETPLACE_PRICE",
            "CURRENCY",
            "NOTES",
        ]);
        headers
    }
}

/// 输出行：金额已舍入，可选列为 None 时不输出
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultRow {
    pub item_id: String,
    pub product_code: String,
    pub product_name: String,
    pub stock: BigDecimal,
    pub tariff_price: BigDecimal,
    pub tariff_with_tax: Option<BigDecimal>,
    pub gross_price: BigDecimal,
    pub tax_amount: BigDecimal,
    pub commission_pct_amount: BigDecimal,
    pub commission_fixed_amount: BigDecimal,
    pub financing_amount: BigDecimal,
    pub withholding_amount: BigDecimal,
    pub net_received: BigDecimal,
    pub shipping_surcharge: Option<BigDecimal>,
    pub commission_pct_applied: BigDecimal,
    pub financing_pct_applied: BigDecimal,
    pub listing_type: String,
    pub listed_price: BigDecimal,
    pub currency: String,
    pub notes: String,
}

/// 小数百分比 → 展示用百分数 (0.145 → 14.50)
fn as_percent(fraction: &BigDecimal) -> BigDecimal {
    round_money(&(fraction * &BigDecimal::from(100)))
}

impl ResultRow {
    pub fn project(row: &PricedRow, layout: OutputLayout) -> Self {
        let listing = &row.record.listing;
        let b = row.breakdown.rounded();

        Self {
            item_id: listing.item_id.clone(),
            product_code: listing.product_code.clone(),
            product_name: row.record.display_name().to_string(),
            stock: row
                .record
                .stock()
                .map(|s| s.with_scale(0))
                .unwrap_or_else(BigDecimal::zero),
            tariff_price: b.tariff_price,
            tariff_with_tax: layout.include_tax.then_some(b.tariff_with_tax),
            gross_price: b.gross_price,
            tax_amount: b.tax_amount,
            commission_pct_amount: b.commission_pct_amount,
            commission_fixed_amount: b.commission_fixed_amount,
            financing_amount: b.financing_amount,
            withholding_amount: b.withholding_amount,
            net_received: b.net_received,
            shipping_surcharge: layout.include_shipping.then_some(b.shipping_surcharge),
            commission_pct_applied: as_percent(&listing.commission_pct),
            financing_pct_applied: as_percent(&listing.financing_pct),
            listing_type: listing.listing_type.clone(),
            listed_price: listing.price.clone(),
            currency: listing.currency.clone(),
            notes: row.notes().to_string(),
        }
    }

    /// 按布局顺序输出字段
    pub fn to_record(&self) -> Vec<String> {
        let mut record = vec![
            self.item_id.clone(),
            self.product_code.clone(),
            self.product_name.clone(),
            self.stock.to_string(),
            self.tariff_price.to_string(),
        ];
        if let Some(v) = &self.tariff_with_tax {
            record.push(v.to_string());
        }
        record.extend([
            self.gross_price.to_string(),
            self.tax_amount.to_string(),
            self.commission_pct_amount.to_string(),
            self.commission_fixed_amount.to_string(),
            self.financing_amount.to_string(),
            self.withholding_amount.to_string(),
            self.net_received.to_string(),
        ]);
        if let Some(v) = &self.shipping_surcharge {
            record.push(v.to_string());
        }
        record.extend([
            self.commission_pct_applied.to_string(),
            self.financing_pct_applied.to_string(),
            self.listing_type.clone(),
            self.listed_price.to_string(),
            self.currency.clone(),
            self.notes.clone(),
        ]);
        record
    }
}

/// 批次统计信息
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchStats {
    pub total_rows: usize,
    pub matched_rows: usize,
    pub unmatched_rows: usize,
    pub invalid_rows: usize,
    pub flagged_rows: usize,
    pub generated_at: DateTime<Local>,
}

impl BatchStats {
    pub fn from_rows(rows: &[PricedRow]) -> Self {
        let matched_rows = rows.iter().filter(|r| r.record.is_matched()).count();
        Self {
            total_rows: rows.len(),
            matched_rows,
            unmatched_rows: rows.len() - matched_rows,
            invalid_rows: rows.iter().filter(|r| !r.breakdown.valid).count(),
            flagged_rows: rows.iter().filter(|r| !r.notes().is_empty()).count(),
            generated_at: Local::now(),
        }
    }
}
