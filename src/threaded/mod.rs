//! Thread-based strategies.
//!
//! All three split rows the same way as the process strategy; they differ in
//! how the spawner treats its workers:
//! - `joined`: every worker joined before returning
//! - `mixed`: first half detached, second half joined
//! - `detached`: nothing joined, completion observed through a handle
//!
//! No locks guard the results. Each worker writes only its own row range.

pub mod detached;
pub mod joined;
pub mod lifecycle;
pub mod mixed;
pub mod report;
pub mod unit;

pub use detached::spawn_detached;
pub use joined::multiply_joined;
pub use lifecycle::DetachedHandle;
pub use mixed::multiply_mixed;
pub use report::{Reporter, Role, WorkerReport};
pub use unit::Operands;
