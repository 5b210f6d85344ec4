//! The three canonical tables of NDN forwarding.
//!
//! Each table sits behind a narrow find/add/remove interface; ownership of
//! locking and aging policy stays with the engine.

mod cs;
mod fib;
mod pit;

pub use cs::{ContentStore, CsEntry};
pub use fib::{Fib, FibEntry};
pub use pit::{Downstream, Pit, PitEntry};
