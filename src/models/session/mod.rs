mod transitions;
mod types;

pub use types::{Session, SessionState, SessionStats, SessionType, SessionUpdate};
