// file: src/tools/docker.rs
// version: 1.0.0
// guid: c7a05e3b-6d14-4f9a-b82c-4e1f9d7a0b35

//! docker invocations: image builds and the registry mirror container

use super::{Invocation, Tool};
use crate::config::{BuildTarget, RegistryConfig};
use std::path::Path;

/// Image that provides the pull-through registry
pub const REGISTRY_IMAGE: &str = "registry:2";

/// `docker build -t IMAGE -f CONTEXT/DOCKERFILE [--build-arg ARG]... CONTEXT`, run from the project
pub fn build(target: &BuildTarget) -> Invocation {
    let dockerfile = Path::new(&target.context).join(&target.dockerfile);

    let mut inv = Invocation::new(Tool::Docker, format!("build for application '{}'", target.app))
        .arg("build")
        .args(["-t", target.image_name.as_str()])
        .arg("-f")
        .path_arg(&dockerfile);

    for build_arg in &target.build_args {
        inv = inv.args(["--build-arg", build_arg.as_str()]);
    }

    inv.arg(target.context.as_str())
        .current_dir(&target.project_path)
}

/// Exits zero when the registry container exists, running or not
pub fn registry_exists(registry: &RegistryConfig) -> Invocation {
    Invocation::new(Tool::Docker, format!("inspect registry '{}'", registry.name))
        .args(["container", "inspect", registry.name.as_str()])
}

/// Start a fresh pull-through registry container
pub fn registry_run(registry: &RegistryConfig) -> Invocation {
    Invocation::new(Tool::Docker, format!("run registry '{}'", registry.name))
        .args(["run", "-d", "--name", registry.name.as_str()])
        .args(["--restart", "always"])
        .arg("-p")
        .arg(format!("{}:5000", registry.port))
        .arg("-e")
        .arg(format!("REGISTRY_PROXY_REMOTEURL={}", registry.remote_url))
        .arg(REGISTRY_IMAGE)
}

pub fn registry_start(registry: &RegistryConfig) -> Invocation {
    container_op("start", registry)
}

pub fn registry_stop(registry: &RegistryConfig) -> Invocation {
    container_op("stop", registry)
}

pub fn registry_remove(registry: &RegistryConfig) -> Invocation {
    container_op("rm", registry)
}

fn container_op(verb: &str, registry: &RegistryConfig) -> Invocation {
    Invocation::new(Tool::Docker, format!("{} registry '{}'", verb, registry.name))
        .args([verb, registry.name.as_str()])
}
