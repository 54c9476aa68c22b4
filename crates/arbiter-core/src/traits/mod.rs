mod context_signals;
mod state_store;

pub use context_signals::{IContextSignals, NoContext};
pub use state_store::IStateStore;
