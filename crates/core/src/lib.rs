// crates/core/src/lib.rs
pub mod clock;
pub mod events;
pub mod records;
pub mod result;
pub mod state;

pub use clock::*;
pub use events::*;
pub use records::*;
pub use result::*;
pub use state::*;
