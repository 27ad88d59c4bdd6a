//! Connected sessions and outbound delivery

mod manager;
mod session;

pub use manager::SessionManager;
pub use session::{NewSessionParams, Session};
