// SPDX-License-Identifier: MIT OR Apache-2.0

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{ComposeError, Result};

/// One service's identity for remote-edge augmentation (§4.7, §4.8):
/// a name, the solution it lives in, the assemblies it ships, and the
/// base addresses clients reach it at.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ServiceDefinition {
    pub name: String,
    pub solution: Option<String>,
    pub assembly_names: Vec<String>,
    pub base_addresses: BTreeMap<String, String>,
}

/// A caller→client→targetService binding (§4.7 step 1, §4.8).
#[derive(Clone, Debug, PartialEq)]
pub struct Binding {
    pub caller: Option<String>,
    pub client: String,
    pub target_service: String,
}

/// The consumed workspace contract (§4.8): root path, discovered or
/// declared solutions, named services, and client→service bindings.
/// Loaded from `flow.workspace.json` / `flow.map.json` (§6) and merged
/// additively across sources.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct WorkspaceDefinition {
    pub root_path: PathBuf,
    pub solution_paths: Vec<PathBuf>,
    pub services: BTreeMap<String, ServiceDefinition>,
    pub bindings: Vec<Binding>,
}

impl WorkspaceDefinition {
    pub fn empty(root_path: impl Into<PathBuf>) -> Self {
        Self { root_path: root_path.into(), ..Default::default() }
    }

    /// Merges `other` into `self` additively (§4.8): later sources union
    /// `assembly_names`, win last-write per `base_addresses` key, and only
    /// overwrite `solution` when `self` doesn't already have one.
    pub fn merge(&mut self, other: WorkspaceDefinition) {
        for path in other.solution_paths {
            if !self.solution_paths.contains(&path) {
                self.solution_paths.push(path);
            }
        }
        for (name, incoming) in other.services {
            self.services
                .entry(name.clone())
                .and_modify(|existing| existing.merge(&incoming))
                .or_insert(incoming);
        }
        self.bindings.extend(other.bindings);
    }

    /// Loads and merges `flow.workspace.json` then `flow.map.json` from
    /// `root`, if present (§6). Neither file existing is not an error: an
    /// empty workspace is valid (§4.8).
    pub fn load(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        let mut definition = Self::empty(root.clone());

        if let Some(loaded) = load_if_present::<WorkspaceFile>(&root.join("flow.workspace.json"))? {
            definition.merge(loaded.into_definition(&root));
        }
        if let Some(loaded) = load_if_present::<MapFile>(&root.join("flow.map.json"))? {
            definition.merge(loaded.into_definition());
        }
        if definition.solution_paths.is_empty() {
            definition.solution_paths = discover_solutions(&root);
        }
        Ok(definition)
    }
}

impl ServiceDefinition {
    fn merge(&mut self, other: &ServiceDefinition) {
        for assembly in &other.assembly_names {
            if !self.assembly_names.contains(assembly) {
                self.assembly_names.push(assembly.clone());
            }
        }
        for (key, url) in &other.base_addresses {
            self.base_addresses.insert(key.clone(), url.clone());
        }
        if self.solution.is_none() {
            self.solution = other.solution.clone();
        }
    }
}

fn load_if_present<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<Option<T>> {
    match std::fs::read_to_string(path) {
        Ok(contents) => {
            let value = serde_json::from_str(&contents)
                .map_err(|source| ComposeError::Json { path: path.display().to_string(), source })?;
            Ok(Some(value))
        }
        Err(source) if source.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(source) => Err(ComposeError::Io { path: path.display().to_string(), source }),
    }
}

/// Recursively finds `*.sln` files under `root`, excluding any path with a
/// `bin`, `obj`, or `.git` component (§6, used when no source declares
/// solutions explicitly).
fn discover_solutions(root: &Path) -> Vec<PathBuf> {
    const EXCLUDED: &[&str] = &["bin", "obj", ".git"];
    let mut found = Vec::new();
    let mut stack = vec![root.to_path_buf()];
    while let Some(dir) = stack.pop() {
        let Ok(entries) = std::fs::read_dir(&dir) else { continue };
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                let excluded = path.file_name().and_then(|n| n.to_str()).is_some_and(|n| EXCLUDED.contains(&n));
                if !excluded {
                    stack.push(path);
                }
            } else if path.extension().is_some_and(|ext| ext == "sln") {
                found.push(path);
            }
        }
    }
    found.sort();
    found
}

#[derive(Deserialize)]
struct WorkspaceFile {
    #[serde(default)]
    solutions: Vec<PathBuf>,
    #[serde(default)]
    services: BTreeMap<String, WorkspaceServiceEntry>,
}

#[derive(Deserialize)]
struct WorkspaceServiceEntry {
    solution: Option<PathBuf>,
    #[serde(default)]
    assembly_names: Vec<String>,
    #[serde(default)]
    base_addresses: BTreeMap<String, String>,
}

impl WorkspaceFile {
    fn into_definition(self, root: &Path) -> WorkspaceDefinition {
        let services = self
            .services
            .into_iter()
            .map(|(name, entry)| {
                let service = ServiceDefinition {
                    name: name.clone(),
                    solution: entry.solution.map(|p| root.join(p).display().to_string()),
                    assembly_names: entry.assembly_names,
                    base_addresses: entry.base_addresses,
                };
                (name, service)
            })
            .collect();
        WorkspaceDefinition {
            root_path: root.to_path_buf(),
            solution_paths: self.solutions.into_iter().map(|p| root.join(p)).collect(),
            services,
            bindings: Vec::new(),
        }
    }
}

#[derive(Deserialize)]
struct MapFile {
    #[serde(default)]
    services: BTreeMap<String, MapServiceEntry>,
    #[serde(default)]
    bindings: Vec<MapBindingEntry>,
}

#[derive(Deserialize)]
struct MapServiceEntry {
    solution: Option<PathBuf>,
    #[serde(default)]
    assembly_names: Vec<String>,
    #[serde(default)]
    base_urls: BTreeMap<String, String>,
}

#[derive(Deserialize)]
struct MapBindingEntry {
    caller: Option<String>,
    client: String,
    target_service: String,
}

impl MapFile {
    fn into_definition(self) -> WorkspaceDefinition {
        let services = self
            .services
            .into_iter()
            .map(|(name, entry)| {
                let service = ServiceDefinition {
                    name: name.clone(),
                    solution: entry.solution.map(|p| p.display().to_string()),
                    assembly_names: entry.assembly_names,
                    base_addresses: entry.base_urls,
                };
                (name, service)
            })
            .collect();
        WorkspaceDefinition {
            root_path: PathBuf::new(),
            solution_paths: Vec::new(),
            services,
            bindings: self
                .bindings
                .into_iter()
                .map(|b| Binding { caller: b.caller, client: b.client, target_service: b.target_service })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_unions_assembly_names_and_last_writer_wins_on_base_addresses() {
        let mut a = ServiceDefinition {
            name: "ReportsApi".to_string(),
            solution: None,
            assembly_names: vec!["SolutionB".to_string()],
            base_addresses: BTreeMap::from([("default".to_string(), "http://old".to_string())]),
        };
        let b = ServiceDefinition {
            name: "ReportsApi".to_string(),
            solution: Some("Reports.sln".to_string()),
            assembly_names: vec!["SolutionB".to_string(), "SolutionC".to_string()],
            base_addresses: BTreeMap::from([("default".to_string(), "http://new".to_string())]),
        };
        a.merge(&b);
        assert_eq!(a.assembly_names, vec!["SolutionB".to_string(), "SolutionC".to_string()]);
        assert_eq!(a.base_addresses["default"], "http://new");
        assert_eq!(a.solution.as_deref(), Some("Reports.sln"));
    }

    #[test]
    fn empty_workspace_has_no_solutions_or_services() {
        let workspace = WorkspaceDefinition::empty("/tmp/nowhere-flowql-test");
        assert!(workspace.services.is_empty());
        assert!(workspace.bindings.is_empty());
    }

    #[test]
    fn load_merges_workspace_file_and_map_file_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("flow.workspace.json"),
            r#"{
                "solutions": ["Reports.sln"],
                "services": {
                    "ReportsApi": {
                        "solution": "Reports.sln",
                        "assembly_names": ["Reports.Api"],
                        "base_addresses": {"default": "http://reports.local/"}
                    }
                }
            }"#,
        )
        .unwrap();
        std::fs::write(
            dir.path().join("flow.map.json"),
            r#"{
                "services": {
                    "ReportsApi": {
                        "solution": null,
                        "assembly_names": ["Reports.Api.Contracts"],
                        "base_urls": {"staging": "http://reports.staging.local/"}
                    }
                },
                "bindings": [
                    {"caller": "Billing.Worker", "client": "IReportsClient", "target_service": "ReportsApi"}
                ]
            }"#,
        )
        .unwrap();

        let workspace = WorkspaceDefinition::load(dir.path()).unwrap();

        assert_eq!(workspace.solution_paths, vec![dir.path().join("Reports.sln")]);
        let service = &workspace.services["ReportsApi"];
        assert_eq!(service.assembly_names, vec!["Reports.Api".to_string(), "Reports.Api.Contracts".to_string()]);
        assert_eq!(service.base_addresses["default"], "http://reports.local/");
        assert_eq!(service.base_addresses["staging"], "http://reports.staging.local/");
        assert_eq!(workspace.bindings.len(), 1);
        assert_eq!(workspace.bindings[0].client, "IReportsClient");
    }

    #[test]
    fn load_falls_back_to_sln_discovery_when_no_solutions_declared() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("bin/Debug")).unwrap();
        std::fs::write(dir.path().join("App.sln"), "").unwrap();
        std::fs::write(dir.path().join("bin/Debug/Ignored.sln"), "").unwrap();

        let workspace = WorkspaceDefinition::load(dir.path()).unwrap();

        assert_eq!(workspace.solution_paths, vec![dir.path().join("App.sln")]);
    }
}
