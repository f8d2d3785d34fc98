//! Interactive MedAI chat: the single chat view's state, a session that binds it
//! to the backend, and the terminal loop that drives it.

pub mod repl;
pub mod session;
pub mod view;

pub use session::ChatSession;
pub use view::{ChatView, SubmitRejected};
