//! # triton-cli
//!
//! The `triton` and `manta` command-line tools.
//!
//! Both binaries declare a command tree over the shared dispatch kernel
//! in `triton-kernel` and call Triton services through `triton-sdk`:
//!
//! ```text
//! argv + env ──► Dispatcher ──► Command hooks ──► Clients ──► CloudAPI / Manta
//!                    │
//!                    └──► Terminal (stdout, pager, stderr)
//! ```
//!
//! Handlers never build HTTP clients directly; they go through the
//! [`clients::Clients`] factory so tests can swap in stubs.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod app;
pub mod clients;
pub mod commands;
pub mod keys;
pub mod output;
pub mod version;

pub use clients::{Clients, SdkClients};
