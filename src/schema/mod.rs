pub mod evolution;
pub mod types;

pub use evolution::SchemaDiff;
pub use types::{Column, Reduction, SummarySchema, KEY_COLUMNS};
