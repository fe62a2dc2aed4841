//! Tree printer for headless hosts.
//!
//! Writes a [`MemoryHost`](crate::pipeline::MemoryHost) subtree as an
//! indented outline through crossterm, so a running tree can be inspected
//! in a terminal:
//!
//! ```text
//! <div id="app">
//!   <button> [click]
//!     "count: 3"
//! ```

mod tree;

pub use tree::{print_tree, write_tree, TreeStyle};
