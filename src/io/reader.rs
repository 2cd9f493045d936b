use bigdecimal::{BigDecimal, Zero};
use csv::{ReaderBuilder, StringRecord, Trim};
use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

use super::parse::{extract_tax_percentage, parse_decimal, parse_fee_combo, parse_money, parse_pct};
use crate::error::{Dataset, ReconcileError, Result};
use crate::models::{InventoryRecord, ListingRecord};

/// listing 导出列名
pub mod listing_columns {
    pub const ITEM_ID: &str = "ITEM_ID";
    pub const SKU: &str = "SKU";
    pub const TITLE: &str = "TITLE";
    pub const QUANTITY: &str = "QUANTITY";
    pub const PRICE: &str = "PRICE";
    pub const CURRENCY: &str = "CURRENCY_ID";
    pub const FEE: &str = "FEE_PER_SALE_MARKETPLACE_V2";
    pub const FINANCING: &str = "COST_OF_FINANCING_MARKETPLACE";
    pub const LISTING_TYPE: &str = "LISTING_TYPE_V3";
    pub const SHIPPING_METHOD: &str = "SHIPPING_METHOD";
    pub const WITHHOLDING: &str = "WITHHOLDING_PCT";
}

/// inventory 导出列名
pub mod inventory_columns {
    pub const CODE: &str = "Código Neored";
    pub const NAME: &str = "Nombre";
    pub const STOCK: &str = "Cantidad a mano";
    pub const TARIFF: &str = "Precio Tarifa";
    pub const TAX: &str = "Impuestos del cliente";
}

/// 表头 -> 列序号
struct Columns {
    dataset: Dataset,
    index: HashMap<String, usize>,
}

impl Columns {
    fn from_headers(dataset: Dataset, headers: &StringRecord) -> Self {
        let mut index = HashMap::with_capacity(headers.len());
        for (idx, name) in headers.iter().enumerate() {
            // 首列可能带 BOM，列名两侧可能有空格
            let name = name.trim_start_matches('\u{feff}').trim();
            index.entry(name.to_string()).or_insert(idx);
        }
        Self { dataset, index }
    }

    fn require(&self, name: &str) -> Result<usize> {
        self.index
            .get(name)
            .copied()
            .ok_or_else(|| ReconcileError::MissingColumn {
                dataset: self.dataset,
                column: name.to_string(),
            })
    }

    fn optional(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }
}

fn cell(record: &StringRecord, idx: usize) -> &str {
    record.get(idx).unwrap_or("")
}

fn csv_reader<R: std::io::Read>(rdr: R) -> csv::Reader<R> {
    ReaderBuilder::new()
        .flexible(true)
        .trim(Trim::All)
        .from_reader(rdr)
}

/// 读取 listing 导出
pub fn read_listings<R: std::io::Read>(rdr: R) -> Result<Vec<ListingRecord>> {
    use listing_columns as col;

    let mut reader = csv_reader(rdr);
    let columns = Columns::from_headers(Dataset::Listings, reader.headers()?);

    let item_id = columns.require(col::ITEM_ID)?;
    let sku = columns.require(col::SKU)?;
    let title = columns.require(col::TITLE)?;
    let quantity = columns.require(col::QUANTITY)?;
    let price = columns.require(col::PRICE)?;
    let currency = columns.require(col::CURRENCY)?;
    let fee = columns.require(col::FEE)?;
    let financing = columns.require(col::FINANCING)?;
    let listing_type = columns.require(col::LISTING_TYPE)?;
    let shipping = columns.optional(col::SHIPPING_METHOD);
    let withholding = columns.optional(col::WITHHOLDING);

    let mut listings = Vec::new();
    for (line, record) in reader.records().enumerate() {
        let record = record?;
        if cell(&record, item_id).is_empty() && cell(&record, sku).is_empty() {
            tracing::debug!("Skipping empty listing row {}", line + 2);
            continue;
        }

        let (commission_pct, commission_fixed) = parse_fee_combo(cell(&record, fee));
        listings.push(ListingRecord {
            item_id: cell(&record, item_id).to_string(),
            product_code: cell(&record, sku).to_string(),
            title: cell(&record, title).to_string(),
            quantity: parse_money(cell(&record, quantity)),
            price: parse_money(cell(&record, price)),
            currency: cell(&record, currency).to_string(),
            commission_pct,
            commission_fixed,
            financing_pct: parse_pct(cell(&record, financing)),
            withholding_pct: withholding.map(|idx| parse_pct(cell(&record, idx))),
            listing_type: cell(&record, listing_type).to_string(),
            shipping_method: shipping.map(|idx| cell(&record, idx).to_string()),
        });
    }

    tracing::info!("读取 listing: {} 行", listings.len());
    Ok(listings)
}

/// 读取 inventory 导出；空白的参考价/库存视为缺失
pub fn read_inventory<R: std::io::Read>(rdr: R) -> Result<Vec<InventoryRecord>> {
    use inventory_columns as col;

    let mut reader = csv_reader(rdr);
    let columns = Columns::from_headers(Dataset::Inventory, reader.headers()?);

    let code = columns.require(col::CODE)?;
    let name = columns.require(col::NAME)?;
    let stock = columns.require(col::STOCK)?;
    let tariff = columns.require(col::TARIFF)?;
    let tax = columns.require(col::TAX)?;

    let mut inventory = Vec::new();
    for record in reader.records() {
        let record = record?;
        if cell(&record, code).is_empty() {
            continue;
        }

        inventory.push(InventoryRecord {
            product_code: cell(&record, code).to_string(),
            name: cell(&record, name).to_string(),
            tariff_price: present(cell(&record, tariff)),
            stock: present(cell(&record, stock)),
            tax_pct: extract_tax_percentage(cell(&record, tax)),
        });
    }

    tracing::info!("读取 inventory: {} 行", inventory.len());
    Ok(inventory)
}

/// 空白为 None，无法解析为 0
fn present(raw: &str) -> Option<BigDecimal> {
    if raw.is_empty() {
        None
    } else {
        Some(parse_decimal(raw).unwrap_or_else(BigDecimal::zero))
    }
}

pub fn read_listings_file(path: &Path) -> Result<Vec<ListingRecord>> {
    read_listings(File::open(path)?)
}

pub fn read_inventory_file(path: &Path) -> Result<Vec<InventoryRecord>> {
    read_inventory(File::open(path)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).unwrap()
    }

    const LISTINGS: &str = "\
ITEM_ID,SKU,TITLE,QUANTITY,PRICE,CURRENCY_ID,FEE_PER_SALE_MARKETPLACE_V2,COST_OF_FINANCING_MARKETPLACE,LISTING_TYPE_V3,SHIPPING_METHOD
MLA934071512,LED7012795,Lampara Sodio 250w,232,21997.46,$,14.50% + $1095.00,4.00%,gold_special,Mercado Envíos por mi cuenta
,,,,,,,,,
MLA864175834,CORNPR06WW,Panel Led 6w,106,8164.02,$,12.00% + $800.00,3.50%,gold_pro,Mercado Envíos Full
";

    const INVENTORY: &str = "\
Código Neored,Nombre,Cantidad a mano,Precio Tarifa,Impuestos del cliente
LED7012795,Lámpara Sodio 250W E40 Osram,250,18500.00,IVA Ventas 21%
CORNPR06WW,Panel LED Redondo 6W Cálido,,,IVA Ventas 21%
,Sin código,1,1,IVA Ventas 21%
";

    #[test]
    fn test_read_listings() {
        let listings = read_listings(LISTINGS.as_bytes()).unwrap();
        assert_eq!(listings.len(), 2);

        let first = &listings[0];
        assert_eq!(first.item_id, "MLA934071512");
        assert_eq!(first.product_code, "LED7012795");
        assert_eq!(first.quantity, dec("232"));
        assert_eq!(first.price, dec("21997.46"));
        assert_eq!(first.commission_pct, dec("0.145"));
        assert_eq!(first.commission_fixed, dec("1095"));
        assert_eq!(first.financing_pct, dec("0.04"));
        assert_eq!(first.withholding_pct, None);
        assert_eq!(first.shipping_method.as_deref(), Some("Mercado Envíos por mi cuenta"));
    }

    #[test]
    fn test_read_inventory_blank_cells_are_absent() {
        let inventory = read_inventory(INVENTORY.as_bytes()).unwrap();
        assert_eq!(inventory.len(), 2);

        assert_eq!(inventory[0].tariff_price, Some(dec("18500.00")));
        assert_eq!(inventory[0].stock, Some(dec("250")));
        assert_eq!(inventory[0].tax_pct, dec("0.21"));

        assert_eq!(inventory[1].tariff_price, None);
        assert_eq!(inventory[1].stock, None);
    }

    #[test]
    fn test_shipping_header_with_trailing_space() {
        use crate::config::DEFAULT_SHIPPING_MARKER;
        use crate::service::shipping::is_surcharge_eligible;

        let csv = "\
ITEM_ID,SKU,TITLE,QUANTITY,PRICE,CURRENCY_ID,FEE_PER_SALE_MARKETPLACE_V2,COST_OF_FINANCING_MARKETPLACE,LISTING_TYPE_V3,SHIPPING_METHOD \n\
MLA864175834,CORNPR06WW,Panel Led 6w,106,8164.02,$,12.00% + $800.00,3.50%,gold_pro,Mercado Envíos por mi cuenta\n";
        let listings = read_listings(csv.as_bytes()).unwrap();

        let method = listings[0].shipping_method.as_deref();
        assert_eq!(method, Some("Mercado Envíos por mi cuenta"));
        assert!(is_surcharge_eligible(method, DEFAULT_SHIPPING_MARKER));
    }

    #[test]
    fn test_missing_required_column_is_fatal() {
        let csv = "ITEM_ID,SKU,TITLE\nMLA1,SKU1,Title\n";
        let err = read_listings(csv.as_bytes()).unwrap_err();
        match err {
            ReconcileError::MissingColumn { dataset, column } => {
                assert_eq!(dataset, Dataset::Listings);
                assert_eq!(column, "QUANTITY");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
