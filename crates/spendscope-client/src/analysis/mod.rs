//! Pure, synchronous analysis over a loaded file's transactions: time
//! windows, filtering, the category tree, drill navigation, category
//! exclusion and trend buckets. Nothing here touches the store or fails.

pub mod exclusion;
pub mod filter;
pub mod navigation;
pub mod palette;
pub mod range;
pub mod session;
pub mod tree;
pub mod trend;
pub mod types;

pub use filter::{FilterConfig, filter_transactions};
pub use navigation::{DrillEvent, DrillNotice, DrillPhase, DrillState};
pub use range::{DateRange, TimeFrame, WeekStart};
pub use session::DrillSession;
pub use tree::{CategoryNode, CategoryTree, build_tree};
pub use types::Transaction;
