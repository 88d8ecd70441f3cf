//! External service integrations.

pub mod signaling {
    pub use crate::signaling::*;
}
