//! Helpers - Higher-level hooks and components built on the public hook API.
//!
//! Nothing here reaches into the engine: every helper is composed from
//! `use_state`, `use_effect`, `use_ref`, `use_callback` and `use_signal`,
//! the same way an application would write it.

mod form;
mod persisted;
mod previous;
mod router;
mod store_state;

pub use form::{use_form, Form, FormErrors, FormOptions, FormValues};
pub use persisted::{use_persisted, MemoryStorage, PersistError, Persisted, Storage};
pub use previous::use_previous;
pub use router::{Router, NOT_FOUND_ROUTE};
pub use store_state::use_store_state;
