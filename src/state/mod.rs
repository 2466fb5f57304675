//! Client-side synchronization model: store, operation tokens, page status
//! and per-session form state.

pub mod form;
pub mod page;
pub mod store;
pub mod tokens;
