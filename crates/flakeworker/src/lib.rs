//! Snowflake-style ID generation for a single node.
//!
//! Every [`SnowflakeId`] packs a 41-bit millisecond offset from a fixed epoch,
//! a 5-bit datacenter ID, a 5-bit worker ID and a 12-bit per-millisecond
//! sequence into the low 63 bits of a `u64`. Uniqueness across nodes relies on
//! each generator being given a distinct `(datacenter_id, worker_id)` pair.
//!
//! ```
//! use flakeworker::{DEFAULT_EPOCH, LockSnowflakeGenerator};
//!
//! let generator = LockSnowflakeGenerator::with_system_clock(10, 20, DEFAULT_EPOCH).unwrap();
//!
//! let first = generator.next_id().unwrap();
//! let second = generator.next_id().unwrap();
//!
//! assert!(first < second);
//! assert_eq!(first.datacenter_id(), 10);
//! assert_eq!(first.worker_id(), 20);
//! ```

mod error;
mod generator;
mod id;
mod node;
#[cfg(feature = "serde")]
mod serde;
mod time;

pub use crate::error::*;
pub use crate::generator::*;
pub use crate::id::*;
pub use crate::node::*;
#[cfg(feature = "serde")]
pub use crate::serde::*;
pub use crate::time::*;
