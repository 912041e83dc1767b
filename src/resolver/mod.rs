pub mod loader;
pub mod table;

pub use loader::load_table;
pub use table::{extract_targets, Table};
