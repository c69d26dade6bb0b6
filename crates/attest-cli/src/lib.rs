//! # attest-cli -- Document Attestation Command-Line Interface
//!
//! Provides the `attest` binary.
//!
//! ## Subcommands
//!
//! - `attest digest <FILE>`: SHA-256 digest of a file.
//! - `attest sign <FILE> [--out-dir DIR]`: sign through the local agent and
//!   write `<stem>-digest=<digest>.zip`.
//! - `attest verify <ZIP>`: submit an archive to the verification service.
//! - `attest inspect <ZIP>`: show the filename digest and archive entries.
//! - `attest health`: probe the verification service.
//!
//! ## Crate Policy
//!
//! - Argument parsing lives in `main.rs`; handlers here delegate to the
//!   domain crates.
//! - Handlers return the process exit code; `anyhow` is used only here.

pub mod config;
pub mod digest;
pub mod health;
pub mod inspect;
pub mod sign;
pub mod verify;

pub use config::AppConfig;
