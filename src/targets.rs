//! Scan target resolution: selected remotes × selected directories.

use anyhow::{bail, Result};

use crate::models::ScanTarget;
use crate::registry::Registry;

/// Expand the requested remotes and directories into an ordered target list.
///
/// An empty remote list selects every remote in the registry; an empty
/// directory list selects the remote root. The result is the cartesian
/// product with remotes as the outer loop.
///
/// Unknown remotes are rejected in one batch, naming every offender. An
/// empty result (only possible when the registry itself is empty) is also
/// an error — the caller aborts the run.
pub fn resolve_targets(
    registry: &Registry,
    remotes: &[String],
    dirs: &[String],
) -> Result<Vec<ScanTarget>> {
    let selected: Vec<String> = if remotes.is_empty() {
        registry.names().map(str::to_string).collect()
    } else {
        remotes.to_vec()
    };

    let missing: Vec<&str> = selected
        .iter()
        .filter(|name| !registry.contains(name))
        .map(String::as_str)
        .collect();
    if !missing.is_empty() {
        bail!("requested remotes not in config: {}", missing.join(", "));
    }

    let root_only = [String::new()];
    let dirs: &[String] = if dirs.is_empty() { &root_only } else { dirs };

    let targets: Vec<ScanTarget> = selected
        .iter()
        .flat_map(|remote| dirs.iter().map(move |dir| ScanTarget::new(remote, dir)))
        .collect();

    if targets.is_empty() {
        bail!("no rclone remotes found to index");
    }

    Ok(targets)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry;

    fn registry_of(names: &[&str]) -> Registry {
        let content: String = names
            .iter()
            .map(|n| format!("[{}]\ntype = local\n", n))
            .collect();
        registry::parse_sections(&content)
    }

    #[test]
    fn cartesian_product_remotes_outer() {
        let registry = registry_of(&["a", "b"]);
        let targets = resolve_targets(
            &registry,
            &[],
            &["x".to_string(), "y".to_string()],
        )
        .unwrap();
        let pairs: Vec<(&str, &str)> = targets
            .iter()
            .map(|t| (t.remote.as_str(), t.directory.as_str()))
            .collect();
        assert_eq!(pairs, vec![("a", "x"), ("a", "y"), ("b", "x"), ("b", "y")]);
    }

    #[test]
    fn empty_dirs_default_to_root() {
        let registry = registry_of(&["a"]);
        let targets = resolve_targets(&registry, &[], &[]).unwrap();
        assert_eq!(targets, vec![ScanTarget::new("a", "")]);
    }

    #[test]
    fn unknown_remotes_reported_in_one_batch() {
        let registry = registry_of(&["a", "b"]);
        let err = resolve_targets(
            &registry,
            &["a".to_string(), "x".to_string(), "y".to_string()],
            &[],
        )
        .unwrap_err();
        let message = err.to_string();
        assert_eq!(message, "requested remotes not in config: x, y");
    }

    #[test]
    fn empty_registry_yields_no_targets() {
        let registry = registry_of(&[]);
        let err = resolve_targets(&registry, &[], &[]).unwrap_err();
        assert!(err.to_string().contains("no rclone remotes found"));
    }
}
