//! State Module - Reactive primitives independent of the hook engine.
//!
//! - **Signal** - Single value, direct synchronous subscribers
//! - **Store** - Aggregate state, shallow merge on `set_state`
//! - **ReducerStore** - Action-driven state with thunk support
//!
//! Every `set`/`set_state`/`dispatch` notifies all current subscribers
//! immediately, in subscription order. Nothing is batched.
//!
//! Values are held in spark-signals signals (see `cell`), so spark
//! effects and deriveds reading them are re-run on every write as well.

mod cell;
mod reducer_store;
mod signal;
mod store;
mod subscribers;

pub use reducer_store::{create_reducer_store, ReducerStore};
pub use signal::{create_signal, Signal};
pub use store::{create_store, Merge, Store};
pub use subscribers::Subscribers;
