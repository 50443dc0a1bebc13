// file: src/tools/helm.rs
// version: 1.0.0
// guid: e3b9d2f7-4a81-4c6e-b0d5-8f1a7c3e9264

//! helm invocations for releases and chart repositories

use super::{Invocation, Tool};
use crate::config::{AppRelease, DependencyRelease, Repository};

/// `helm upgrade --install NAME CHART [--version V] [--namespace N --create-namespace] [-f VALUES]`
pub fn install_dependency(release: &DependencyRelease) -> Invocation {
    let inv = Invocation::new(Tool::Helm, format!("install for dependency '{}'", release.name))
        .args(["upgrade", "--install", release.name.as_str(), release.chart.as_str()])
        .flag_opt("--version", release.version.as_deref());

    let inv = match release.namespace.as_deref() {
        Some(ns) => inv.args(["--namespace", ns, "--create-namespace"]),
        None => inv,
    };

    match release.values_file.as_deref() {
        Some(values) => inv.arg("-f").path_arg(values),
        None => inv,
    }
}

/// `helm upgrade --install APP CHART -f VALUES --namespace N --create-namespace`
pub fn install_app(release: &AppRelease) -> Invocation {
    Invocation::new(Tool::Helm, format!("install for application '{}'", release.app))
        .args(["upgrade", "--install", release.app.as_str()])
        .path_arg(&release.chart_path)
        .arg("-f")
        .path_arg(&release.values_file)
        .args(["--namespace", release.namespace.as_str(), "--create-namespace"])
}

/// `helm uninstall NAME [--namespace N]`
pub fn uninstall(kind: &str, name: &str, namespace: Option<&str>) -> Invocation {
    Invocation::new(Tool::Helm, format!("uninstall for {} '{}'", kind, name))
        .args(["uninstall", name])
        .flag_opt("--namespace", namespace)
}

pub fn repo_add(repo: &Repository) -> Invocation {
    Invocation::new(Tool::Helm, format!("repo add for repository '{}'", repo.name))
        .args(["repo", "add", repo.name.as_str(), repo.url.as_str()])
}

pub fn repo_update() -> Invocation {
    Invocation::new(Tool::Helm, "repo update").args(["repo", "update"])
}
