//! kubectl integration for kubepods
//!
//! This crate runs kubectl for contexts, pod listing, deletion, exec and
//! filesystem listing, and decodes what it prints.

mod client;
mod error;
mod runner;

pub use client::Kubectl;
pub use error::KubectlError;
pub use runner::{CommandOutput, CommandRunner, ProcessRunner};

// Re-export types that are used in our public API
pub use kubepods_types::{ContextInfo, DeleteOptions, FsEntry, PodRecord};
