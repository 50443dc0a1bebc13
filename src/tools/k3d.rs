// file: src/tools/k3d.rs
// version: 1.0.0
// guid: 1d8f3a6c-e950-4b27-8c4d-a6b2f0e7d913

//! k3d cluster lifecycle invocations

use super::{Invocation, Tool};
use std::path::Path;

/// `k3d cluster create NAME [--registry-config FILE]`
pub fn create(name: &str, registry_config: Option<&Path>) -> Invocation {
    let inv = cluster_op("create", name);
    match registry_config {
        Some(path) => inv.arg("--registry-config").path_arg(path),
        None => inv,
    }
}

pub fn delete(name: &str) -> Invocation {
    cluster_op("delete", name)
}

pub fn start(name: &str) -> Invocation {
    cluster_op("start", name)
}

pub fn stop(name: &str) -> Invocation {
    cluster_op("stop", name)
}

fn cluster_op(verb: &str, name: &str) -> Invocation {
    Invocation::new(Tool::K3d, format!("cluster {} '{}'", verb, name)).args(["cluster", verb, name])
}
