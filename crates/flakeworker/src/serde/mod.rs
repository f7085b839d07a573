mod error;
mod native;

pub use error::*;
pub use native::*;
