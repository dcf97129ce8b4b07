//! Collector Core - range resolution and bounded fan-out
//!
//! ```text
//! RangeSpec + chain head → BlockRange → work items
//!     ↓
//! BoundedCollector (batch barrier, K in flight)
//!     ↓
//! Vec<Collected> (unordered, one per item)
//! ```
//!
//! Ordering and filtering are the caller's job.

pub mod fanout;
pub mod range;

pub use fanout::{BoundedCollector, Collected, ConcurrencyLimit};
pub use range::{BlockRange, RangeError, RangeSpec};
