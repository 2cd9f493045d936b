pub mod export;
pub mod parse;
pub mod reader;

pub use export::{export_to_csv, write_csv};
pub use reader::{read_inventory, read_inventory_file, read_listings, read_listings_file};
