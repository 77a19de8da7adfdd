pub mod session;

pub use session::{CommandHistory, Session};
