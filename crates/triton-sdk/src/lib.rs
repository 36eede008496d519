//! # triton-sdk
//!
//! Async clients for the Triton CloudAPI and the Manta object store.
//!
//! Each service is exposed as a trait ([`ComputeApi`], [`AccountApi`],
//! [`NetworkApi`], [`StorageApi`]) with a reqwest-backed implementation
//! that signs every request with the account's Ed25519 key. Command
//! handlers depend on the traits so tests can substitute stubs.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod account;
pub mod auth;
pub mod client;
pub mod compute;
pub mod error;
pub mod network;
pub mod storage;

pub use account::{Account, AccountApi, AccountClient, Key, UpdateAccountInput};
pub use auth::RequestSigner;
pub use client::{ClientConfig, HttpClient};
pub use compute::{
    ComputeApi, ComputeClient, CreateInstanceInput, Endpoint, Image, Instance, InstanceAction,
    ListInstancesInput, ListPackagesInput, Package, find_instance_by_name,
};
pub use error::{ApiError, Result, SdkError, find_api_error, is_code, is_status};
pub use network::{Network, NetworkApi, NetworkClient, resolve_networks};
pub use storage::{DirectoryEntry, ListDirectoryOutput, StorageApi, StorageClient, resolve_path};
