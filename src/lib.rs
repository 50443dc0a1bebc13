// file: src/lib.rs
// version: 3.0.0
// guid: d82472d1-7f0f-4eb4-b0a3-6e1547103eb4

//! # devctl
//!
//! Drives a local development loop from one YAML file: a k3d cluster with a
//! pull-through registry mirror, docker image builds, and helm releases for
//! applications and their third-party dependencies.
//!
//! Configuration sections are resolved into validated records, turned into
//! tool invocations by pure builders in [`tools`], and handed to a
//! [`executor::CommandRunner`].

pub mod cli;
pub mod cluster;
pub mod config;
pub mod deploy;
pub mod error;
pub mod executor;
pub mod logging;
pub mod output;
pub mod tools;
pub mod utils;

pub use error::{DevctlError, Result};
