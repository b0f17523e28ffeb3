//! Paint claims: the request type, the conflict resolver, and the FIFO queue
//! and executor that feed claims into the tile registry one at a time.

pub mod claim;
pub mod executor;
pub mod plugin;
pub mod queue;
pub mod resolver;
pub mod result_log;

pub use claim::*;
pub use executor::resolve_queued_claims;
pub use plugin::PaintPlugin;
pub use queue::*;
pub use resolver::resolve_claim;
pub use result_log::ClaimResultLog;
