// file: src/utils/paths.rs
// version: 1.0.0
// guid: 0e6b3d9f-2a4c-4b71-8f5e-c19a7d3b2e60

//! Path helpers for configuration-relative file references

use std::path::{Component, Path, PathBuf};

/// Expand a leading `~` to the user's home directory
pub fn expand_home(raw: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(raw).into_owned())
}

/// Resolve `path` against `base` unless it is already absolute.
///
/// The joined result is cleaned lexically, so `./chart` under `/srv/app`
/// becomes `/srv/app/chart`.
pub fn resolve_against(base: &Path, path: &str) -> PathBuf {
    let candidate = expand_home(path);
    if candidate.is_absolute() {
        return candidate;
    }
    clean(&base.join(candidate))
}

/// Lexically drop `.` components and fold `..` into its parent where possible
pub fn clean(path: &Path) -> PathBuf {
    let mut out: Vec<Component> = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.last() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(component),
            },
            other => out.push(other),
        }
    }

    if out.is_empty() {
        return PathBuf::from(".");
    }
    out.iter().collect()
}
