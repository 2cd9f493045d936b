pub mod inventory;
pub mod joined;
pub mod listing;
pub mod pricing;
pub mod result;

pub use inventory::InventoryRecord;
pub use joined::{Flag, JoinedRecord, Notes};
pub use listing::ListingRecord;
pub use pricing::{DeductionInputs, PriceBreakdown};
pub use result::{BatchStats, OutputLayout, PricedRow, ResultRow};
