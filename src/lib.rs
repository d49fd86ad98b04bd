pub mod app;
pub mod session;

pub use app::VoxcalApp;
pub use session::{Conversation, Turn};
