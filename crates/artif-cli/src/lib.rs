//! # artif-cli
//!
//! Single-purpose Artifactory tools, one binary per REST call.
//!
//! Each `artif-*` binary is a one-node command tree over `triton-kernel`:
//!
//! ```text
//! argv + ARTIFACTORY_* env ──► Dispatcher ──► Tool<Command> ──► ArtifactoryApi ──► /api/...
//! ```
//!
//! Credentials come from the environment only. An API token wins over an
//! API key, which wins over a username and password; with none of them
//! the client calls the server anonymously.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod client;
pub mod commands;
pub mod error;
pub mod keys;
pub mod models;
pub mod render;
pub mod tool;

pub use client::{ArtifactoryApi, ArtifactoryClient, Credentials};
pub use error::ArtifError;
