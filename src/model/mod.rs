pub mod capability;
pub mod types;

pub use capability::*;
pub use types::*;
