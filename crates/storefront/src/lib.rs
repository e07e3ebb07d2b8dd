//! The Pickle Pot storefront library.
//!
//! This crate provides the cart service as a library, allowing it to be
//! tested and reused. The binary in `main.rs` only adds process setup.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod backend;
pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;

pub use routes::app;
pub use state::AppState;
