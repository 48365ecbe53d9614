pub mod context;
pub mod error;
pub mod switch;

pub use context::Context;
pub use error::SwitchError;
