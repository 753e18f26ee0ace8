//! Transient conversational session store.
//!
//! Maps an interview id to a linear message history with a time-bounded
//! lifespan. Process-local only: nothing survives a restart, and expiry is
//! handled by one background sweeper task rather than per-session timers.

pub mod clock;
pub mod store;

pub use clock::{Clock, ManualClock, SystemClock};
pub use store::{ChatConfig, ChatSessionStore};
