use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

/// 内部 ERP 商品
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryRecord {
    pub product_code: String,
    pub name: String,
    pub tariff_price: Option<BigDecimal>, // 参考价 (卖家期望到手金额)
    pub stock: Option<BigDecimal>,        // 在手数量
    pub tax_pct: BigDecimal,
}
