use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

/// 市场平台商品 (一行 listing 导出)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListingRecord {
    pub item_id: String,
    pub product_code: String,     // 商品编码/SKU (关联键)
    pub title: String,
    pub quantity: BigDecimal,     // 平台库存
    pub price: BigDecimal,        // 当前挂牌价
    pub currency: String,
    pub commission_pct: BigDecimal,
    pub commission_fixed: BigDecimal,
    pub financing_pct: BigDecimal,
    pub withholding_pct: Option<BigDecimal>, // 可选列，缺失视为 0
    pub listing_type: String,
    pub shipping_method: Option<String>,     // 可选列，缺失则永不计运费附加费
}
