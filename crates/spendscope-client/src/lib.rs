pub mod analysis;
pub mod commands;
pub mod contracts;
pub mod error;
pub mod import;
pub mod migrations;
pub mod state;
pub mod store;

pub use contracts::envelope::{FailureEnvelope, SuccessEnvelope};
pub use error::{ClientError, ClientResult};

pub const API_VERSION: &str = env!("CARGO_PKG_VERSION");
