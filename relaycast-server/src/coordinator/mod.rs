mod coordinator;
mod error;

pub use coordinator::{Coordinator, Outbound};
pub use error::SignalError;
