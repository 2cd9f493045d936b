use bigdecimal::Zero;
use indexmap::map::Entry;
use indexmap::IndexMap;

use crate::models::{Flag, InventoryRecord, JoinedRecord, ListingRecord};

/// 按商品编码左关联 listing 与 inventory，并追加数据质量标记
///
/// 每个 listing 恰好产出一行；未匹配的 listing 保留。编码精确匹配 (区分大小写)，
/// inventory 中重复的编码以第一次出现为准。
pub fn merge_and_validate(
    listings: &[ListingRecord],
    inventory: &[InventoryRecord],
) -> Vec<JoinedRecord> {
    let index = index_inventory(inventory);

    let joined: Vec<JoinedRecord> = listings
        .iter()
        .map(|listing| {
            let matched = index.get(listing.product_code.as_str()).map(|&inv| inv.clone());
            let mut record = JoinedRecord::new(listing.clone(), matched);
            validate(&mut record);
            record
        })
        .collect();

    let matched = joined.iter().filter(|r| r.is_matched()).count();
    tracing::info!(
        "关联完成: listings: {}, inventory: {}, 已匹配: {}, 未匹配: {}",
        listings.len(),
        index.len(),
        matched,
        joined.len() - matched
    );

    joined
}

/// 对关联记录执行数据质量检查；重复执行不会产生重复标记
pub fn validate(record: &mut JoinedRecord) {
    if !record.is_matched() {
        record.notes.push(Flag::CodeNotFound);
    }

    let tariff_missing = record
        .inventory
        .as_ref()
        .and_then(|inv| inv.tariff_price.as_ref())
        .map_or(true, |price| price.is_zero());
    if tariff_missing {
        record.notes.push(Flag::TariffPriceMissing);
    }

    if record.stock().is_none() {
        record.notes.push(Flag::StockMissing);
    }
}

/// 构建 编码 -> inventory 索引 (保序，首条优先)
fn index_inventory(inventory: &[InventoryRecord]) -> IndexMap<&str, &InventoryRecord> {
    let mut index: IndexMap<&str, &InventoryRecord> = IndexMap::with_capacity(inventory.len());
    for item in inventory {
        match index.entry(item.product_code.as_str()) {
            Entry::Vacant(slot) => {
                slot.insert(item);
            }
            Entry::Occupied(_) => {
                tracing::warn!(
                    "Duplicate inventory code {}, keeping first occurrence",
                    item.product_code
                );
            }
        }
    }
    index
}
