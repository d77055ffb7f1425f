//! Library crate for userdash.
//!
//! This crate exposes the building blocks of the TUI dashboard:
//! - Remote directory models, port and adapter (`api`)
//! - Client-side state container (`store`)
//! - Application state and update loop (`app`)
//! - Error types (`error`)
//! - In-memory search helpers (`search`)
//! - UI rendering and widgets (`ui`)
//!
//! It is used by the `userdash` binary and by tests.
#![doc = include_str!("../README.md")]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod api;
pub mod app;
pub mod error;
pub mod search;
pub mod store;
pub mod ui;

// Re-export commonly used items at the crate root for convenience
pub use api::{NewUser, RestClient, User, UserApi, UserId};
pub use error::{ApiError, Result, WriteFailure, WriteOp};
pub use store::{StoreEvent, UserStore};
