pub mod categories;
pub mod common;
pub mod drill;
pub mod import;
pub mod trend;
