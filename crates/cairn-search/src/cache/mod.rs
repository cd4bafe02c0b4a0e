//! Short-lived response cache and the longer-lived response store that
//! serves follow-ups and exports by query id.

pub mod response_cache;
pub mod response_store;

pub use response_cache::{cache_key, ResponseCache};
pub use response_store::ResponseStore;
