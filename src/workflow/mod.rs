pub mod session;
pub mod session_ctx;

pub use session::{Session, SessionEvent};
pub use session_ctx::SessionCtx;
