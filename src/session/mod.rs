pub mod flow;
pub mod state;
pub mod store;

pub use flow::Orchestrator;
pub use state::{Phase, Session};
pub use store::{SessionHandle, SessionStore};
