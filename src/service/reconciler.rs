use crate::config::PricingOptions;
use crate::error::Result;
use crate::models::{
    BatchStats, InventoryRecord, ListingRecord, OutputLayout, PricedRow, ResultRow,
};
use crate::service::merger;
use crate::service::PricingEngine;

/// 批次结果
#[derive(Debug, Clone)]
pub struct ReconcileReport {
    pub rows: Vec<PricedRow>,
    pub layout: OutputLayout,
    pub stats: BatchStats,
}

impl ReconcileReport {
    /// 投影为输出行 (金额已舍入)
    pub fn result_rows(&self) -> Vec<ResultRow> {
        self.rows
            .iter()
            .map(|row| ResultRow::project(row, self.layout))
            .collect()
    }
}

/// 对账服务：关联 → 校验 → 定价
pub struct Reconciler {
    engine: PricingEngine,
}

impl Reconciler {
    pub fn new(options: PricingOptions) -> Result<Self> {
        Ok(Self {
            engine: PricingEngine::new(options)?,
        })
    }

    pub fn run(
        &self,
        listings: &[ListingRecord],
        inventory: &[InventoryRecord],
    ) -> ReconcileReport {
        tracing::info!(
            "开始对账: {} 条 listing, {} 条 inventory",
            listings.len(),
            inventory.len()
        );

        let joined = merger::merge_and_validate(listings, inventory);
        let rows = self.engine.price_rows(joined);
        let stats = BatchStats::from_rows(&rows);

        tracing::info!(
            "定价完成: 总行数: {}, 已匹配: {}, 无解: {}, 带标记: {}",
            stats.total_rows,
            stats.matched_rows,
            stats.invalid_rows,
            stats.flagged_rows
        );

        ReconcileReport {
            rows,
            layout: OutputLayout::from_options(self.engine.options()),
            stats,
        }
    }
}
