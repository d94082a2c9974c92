// SPDX-License-Identifier: MIT OR Apache-2.0

use std::collections::{HashMap, HashSet};

use flowql_core::NodeId;
use flowql_graph::{Edge, Graph};

use crate::workspace::WorkspaceDefinition;

struct ActionInfo {
    id: NodeId,
    assembly: Option<String>,
    route: Option<String>,
    verb: Option<String>,
}

struct CallInfo {
    id: NodeId,
    assembly: Option<String>,
    client_type: Option<String>,
    caller_type: Option<String>,
    caller_id: Option<String>,
    base_url: Option<String>,
    route: Option<String>,
    verb: Option<String>,
}

fn property(node: &flowql_graph::Node, key: &str) -> Option<String> {
    node.properties.get(key).and_then(flowql_core::Value::as_match_string)
}

fn normalize_base_url(url: &str) -> String {
    url.trim_end_matches('/').to_string()
}

/// Remote-edge augmentation (§4.7): turns each `infra.http_call` node into a
/// `flow` edge from its caller plus `remote` edges to the controller actions
/// it most plausibly targets, using workspace bindings and route/verb/
/// assembly evidence to narrow the candidate set.
pub fn augment(graph: &mut Graph, workspace: &WorkspaceDefinition) {
    let actions: Vec<ActionInfo> = graph
        .nodes
        .iter()
        .filter(|n| n.kind == "endpoint.controller_action")
        .map(|n| ActionInfo {
            id: n.id.clone(),
            assembly: n.assembly.clone(),
            route: property(n, "full_route"),
            verb: property(n, "http_method"),
        })
        .collect();

    let calls: Vec<CallInfo> = graph
        .nodes
        .iter()
        .filter(|n| n.kind == "infra.http_call")
        .map(|n| CallInfo {
            id: n.id.clone(),
            assembly: n.assembly.clone(),
            client_type: property(n, "client_type"),
            caller_type: property(n, "caller_type"),
            caller_id: property(n, "caller_id"),
            base_url: property(n, "base_url"),
            route: property(n, "route"),
            verb: property(n, "verb"),
        })
        .collect();

    if calls.is_empty() {
        return;
    }

    let has_any_metadata = calls.iter().any(|c| {
        c.verb.is_some() || c.route.is_some() || c.client_type.is_some() || c.caller_type.is_some() || c.base_url.is_some() || c.assembly.is_some()
    });
    if !has_any_metadata {
        log::warn!("remote-edge augmentation: no call carries verb/route/client_type/caller_type/base_url/assembly metadata, skipping");
        return;
    }

    let mut actions_by_assembly: HashMap<&str, Vec<usize>> = HashMap::new();
    let mut actions_by_verb_route: HashMap<(Option<&str>, Option<&str>), Vec<usize>> = HashMap::new();
    for (idx, action) in actions.iter().enumerate() {
        if let Some(assembly) = &action.assembly {
            actions_by_assembly.entry(assembly.as_str()).or_default().push(idx);
        }
        let verb = action.verb.as_deref();
        let route = action.route.as_deref();
        actions_by_verb_route.entry((verb, route)).or_default().push(idx);
        actions_by_verb_route.entry((verb, None)).or_default().push(idx);
        actions_by_verb_route.entry((None, route)).or_default().push(idx);
    }

    let mut new_edges = Vec::new();

    for call in &calls {
        let target_assemblies = candidate_target_assemblies(workspace, call);

        let mut candidate_idx: HashSet<usize> = HashSet::new();
        for assembly in &target_assemblies {
            if let Some(idxs) = actions_by_assembly.get(assembly.as_str()) {
                candidate_idx.extend(idxs.iter().copied());
            }
        }
        if let Some(idxs) = actions_by_verb_route.get(&(call.verb.as_deref(), call.route.as_deref())) {
            candidate_idx.extend(idxs.iter().copied());
        }
        if let Some(idxs) = actions_by_verb_route.get(&(call.verb.as_deref(), None)) {
            candidate_idx.extend(idxs.iter().copied());
        }
        if let Some(idxs) = actions_by_verb_route.get(&(None, call.route.as_deref())) {
            candidate_idx.extend(idxs.iter().copied());
        }

        let no_narrowing_signal = target_assemblies.is_empty() && call.verb.is_none() && call.route.is_none();
        if candidate_idx.is_empty() && no_narrowing_signal {
            candidate_idx.extend(0..actions.len());
        }

        let both_match: Vec<usize> = candidate_idx
            .iter()
            .copied()
            .filter(|&i| actions[i].route.as_deref() == call.route.as_deref() && actions[i].verb.as_deref() == call.verb.as_deref())
            .collect();
        let route_match: Vec<usize> =
            candidate_idx.iter().copied().filter(|&i| call.route.is_some() && actions[i].route.as_deref() == call.route.as_deref()).collect();
        let verb_match: Vec<usize> =
            candidate_idx.iter().copied().filter(|&i| call.verb.is_some() && actions[i].verb.as_deref() == call.verb.as_deref()).collect();

        let refined: Vec<usize> = if !both_match.is_empty() {
            both_match
        } else if !route_match.is_empty() {
            route_match
        } else if !verb_match.is_empty() {
            verb_match
        } else {
            candidate_idx.into_iter().collect()
        };

        if let Some(caller_id) = &call.caller_id {
            let caller_node = NodeId::from(caller_id.clone());
            if graph.node(&caller_node).is_some() {
                new_edges.push(Edge::new(caller_node, call.id.clone(), "flow", "flowql-compose"));
            }
        }
        for idx in refined {
            new_edges.push(Edge::new(call.id.clone(), actions[idx].id.clone(), "remote", "flowql-compose"));
        }
    }

    for edge in new_edges {
        graph.insert_edge(edge);
    }
}

/// Priority-ordered candidate target services for one call (§4.7 step 1).
fn candidate_target_assemblies(workspace: &WorkspaceDefinition, call: &CallInfo) -> Vec<String> {
    if let Some(client_type) = &call.client_type {
        let services = services_for_binding(workspace, |b| &b.client == client_type);
        if !services.is_empty() {
            return assemblies_of(workspace, &services);
        }
    }
    if let Some(caller_type) = &call.caller_type {
        let services = services_for_binding(workspace, |b| b.caller.as_deref() == Some(caller_type.as_str()));
        if !services.is_empty() {
            return assemblies_of(workspace, &services);
        }
    }
    if let Some(base_url) = &call.base_url {
        let normalized = normalize_base_url(base_url);
        let matches: Vec<&str> = workspace
            .services
            .values()
            .filter(|s| s.base_addresses.values().any(|url| normalize_base_url(url) == normalized))
            .map(|s| s.name.as_str())
            .collect();
        if !matches.is_empty() {
            return assemblies_of(workspace, &matches);
        }
    }
    if let Some(assembly) = &call.assembly {
        let matches: Vec<&str> =
            workspace.services.values().filter(|s| s.assembly_names.contains(assembly)).map(|s| s.name.as_str()).collect();
        if !matches.is_empty() {
            return assemblies_of(workspace, &matches);
        }
    }
    Vec::new()
}

fn services_for_binding<'a>(workspace: &'a WorkspaceDefinition, matches: impl Fn(&crate::workspace::Binding) -> bool) -> Vec<&'a str> {
    workspace
        .bindings
        .iter()
        .filter(|b| matches(b))
        .filter_map(|b| workspace.services.get(&b.target_service))
        .map(|s| s.name.as_str())
        .collect()
}

fn assemblies_of(workspace: &WorkspaceDefinition, service_names: &[&str]) -> Vec<String> {
    let mut out = Vec::new();
    for name in service_names {
        if let Some(service) = workspace.services.get(*name) {
            for assembly in &service.assembly_names {
                if !out.contains(assembly) {
                    out.push(assembly.clone());
                }
            }
        }
    }
    out
}
