mod atomic;
mod interface;
mod lock;
mod mutex;
mod status;
mod tick;

pub use atomic::*;
pub use interface::*;
pub use lock::*;
pub use status::*;
