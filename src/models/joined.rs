use bigdecimal::{BigDecimal, Zero};
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::{InventoryRecord, ListingRecord};

/// 数据质量标记
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Flag {
    CodeNotFound,
    TariffPriceMissing,
    StockMissing,
    NoSolution,
}

impl Flag {
    pub fn message(&self) -> &'static str {
        match self {
            Flag::CodeNotFound => "code not found in inventory",
            Flag::TariffPriceMissing => "tariff price missing",
            Flag::StockMissing => "stock missing",
            Flag::NoSolution => "percentages have no solution (non-positive denominator)",
        }
    }
}

impl fmt::Display for Flag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// 有序去重的标记列表，只在输出时拼接为字符串
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Notes(IndexSet<Flag>);

// IndexSet 的相等比较忽略顺序，这里顺序也要一致
impl PartialEq for Notes {
    fn eq(&self, other: &Self) -> bool {
        self.0.iter().eq(other.0.iter())
    }
}

impl Eq for Notes {}

impl Notes {
    pub fn new() -> Self {
        Self(IndexSet::new())
    }

    /// 追加标记；已存在的标记保持原位置
    pub fn push(&mut self, flag: Flag) {
        self.0.insert(flag);
    }

    pub fn contains(&self, flag: Flag) -> bool {
        self.0.contains(&flag)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = Flag> + '_ {
        self.0.iter().copied()
    }
}

impl fmt::Display for Notes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, flag) in self.0.iter().enumerate() {
            if idx > 0 {
                f.write_str("; ")?;
            }
            f.write_str(flag.message())?;
        }
        Ok(())
    }
}

impl FromIterator<Flag> for Notes {
    fn from_iter<I: IntoIterator<Item = Flag>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// listing 左关联 inventory 的结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JoinedRecord {
    pub listing: ListingRecord,
    pub inventory: Option<InventoryRecord>,
    pub notes: Notes,
}

impl JoinedRecord {
    pub fn new(listing: ListingRecord, inventory: Option<InventoryRecord>) -> Self {
        Self {
            listing,
            inventory,
            notes: Notes::new(),
        }
    }

    pub fn is_matched(&self) -> bool {
        self.inventory.is_some()
    }

    /// 参考价；未匹配或缺失时为 0
    pub fn tariff_price(&self) -> BigDecimal {
        self.inventory
            .as_ref()
            .and_then(|inv| inv.tariff_price.clone())
            .unwrap_or_else(BigDecimal::zero)
    }

    pub fn stock(&self) -> Option<&BigDecimal> {
        self.inventory.as_ref().and_then(|inv| inv.stock.as_ref())
    }

    pub fn tax_pct(&self) -> BigDecimal {
        self.inventory
            .as_ref()
            .map(|inv| inv.tax_pct.clone())
            .unwrap_or_else(BigDecimal::zero)
    }

    /// 商品名称：优先 ERP 名称，否则使用平台标题
    pub fn display_name(&self) -> &str {
        match &self.inventory {
            Some(inv) if !inv.name.is_empty() => &inv.name,
            _ => &self.listing.title,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notes_render_without_separators_at_edges() {
        let mut notes = Notes::new();
        assert_eq!(notes.to_string(), "");

        notes.push(Flag::CodeNotFound);
        assert_eq!(notes.to_string(), "code not found in inventory");

        notes.push(Flag::TariffPriceMissing);
        assert_eq!(
            notes.to_string(),
            "code not found in inventory; tariff price missing"
        );
    }

    #[test]
    fn test_notes_push_is_idempotent() {
        let mut notes: Notes = [Flag::TariffPriceMissing, Flag::StockMissing]
            .into_iter()
            .collect();
        notes.push(Flag::TariffPriceMissing);
        notes.push(Flag::StockMissing);

        assert_eq!(notes.len(), 2);
        assert_eq!(
            notes.iter().collect::<Vec<_>>(),
            vec![Flag::TariffPriceMissing, Flag::StockMissing]
        );
    }
}
