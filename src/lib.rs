//! Core library exports for the categories service.
//!
//! With the `data` feature this crate exposes the domain types, forms and the
//! client-side synchronization model. The `server` feature adds the backend
//! client, service layer and Actix-web routes.

pub mod domain;
pub mod dto;
pub mod forms;
pub mod models;
pub mod state;

#[cfg(feature = "server")]
pub mod error_conversions;
#[cfg(feature = "server")]
pub mod repository;
#[cfg(feature = "server")]
pub mod routes;
#[cfg(feature = "server")]
pub mod services;
