//! Boundary adapter from loosely-shaped upstream objects to [`Resource`].
//!
//! Upstream resources carry a free-form `spec` whose reference fields come in
//! several shapes (plain names, `{name}` objects, legacy field names). All of
//! that branching lives here so the builder only ever sees the canonical form.

use crate::{Error, Resource, ResourceKind, ResourceSet, StatusPhase};
use serde::{Deserialize, Serialize};
use serde_json::Value;

const DEFAULT_NAMESPACE: &str = "default";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawMetadata {
    pub namespace: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawResource {
    pub metadata: RawMetadata,
    pub spec: Value,
    /// Kept untyped: a status of the wrong shape reads as `Unknown` instead of
    /// failing the whole snapshot.
    pub status: Value,
}

/// Wire shape of a full snapshot as delivered by the fetching collaborator.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawSnapshot {
    #[serde(rename = "modelApis", alias = "modelAPIs")]
    pub model_apis: Vec<RawResource>,
    #[serde(rename = "toolServers", alias = "mcpServers")]
    pub tool_servers: Vec<RawResource>,
    pub agents: Vec<RawResource>,
}

impl RawSnapshot {
    /// Normalizes every item. Items that cannot be normalized are skipped
    /// with a warning so the rest of the snapshot is still laid out.
    pub fn into_resource_set(self) -> ResourceSet {
        let mut set = ResourceSet::new();
        let collections = [
            (ResourceKind::ModelApi, self.model_apis),
            (ResourceKind::ToolServer, self.tool_servers),
            (ResourceKind::Agent, self.agents),
        ];
        for (kind, items) in collections {
            for raw in items {
                match normalize(kind, raw) {
                    Ok(resource) => set.push(resource),
                    Err(err) => tracing::warn!("Skipping {} resource: {}", kind, err),
                }
            }
        }
        set
    }
}

impl ResourceSet {
    /// Parse and normalize a JSON snapshot. Only JSON that does not match the
    /// snapshot envelope is an error.
    pub fn from_json(json: &str) -> Result<Self, Error> {
        let raw: RawSnapshot = serde_json::from_str(json)?;
        Ok(raw.into_resource_set())
    }
}

/// Map one upstream object of `kind` into the canonical [`Resource`].
pub fn normalize(kind: ResourceKind, raw: RawResource) -> Result<Resource, Error> {
    let name = raw
        .metadata
        .name
        .filter(|name| !name.trim().is_empty())
        .ok_or_else(|| Error::MissingName {
            kind: kind.slug().to_string(),
        })?;
    let namespace = raw
        .metadata
        .namespace
        .filter(|ns| !ns.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_NAMESPACE.to_string());

    let status = StatusPhase::from_raw(raw.status.get("phase").and_then(Value::as_str));
    let status_message = raw
        .status
        .get("message")
        .and_then(Value::as_str)
        .map(str::to_string);

    let mut resource = Resource {
        kind,
        namespace,
        name,
        status,
        status_message,
        model_api: None,
        tool_servers: Vec::new(),
        peer_agents: Vec::new(),
    };

    if kind == ResourceKind::Agent {
        let spec = &raw.spec;
        resource.model_api = first_field(spec, &["modelAPI", "modelApi", "model_api"])
            .and_then(reference_name);
        resource.tool_servers = first_field(spec, &["mcpServers", "toolServers", "tool_servers"])
            .map(reference_list)
            .unwrap_or_default();
        resource.peer_agents = spec
            .get("agentNetwork")
            .and_then(|network| network.get("access"))
            .or_else(|| first_field(spec, &["peers", "peerAgents"]))
            .map(reference_list)
            .unwrap_or_default();
    }

    Ok(resource)
}

fn first_field<'a>(spec: &'a Value, names: &[&str]) -> Option<&'a Value> {
    names
        .iter()
        .find_map(|name| spec.get(*name).filter(|value| !value.is_null()))
}

fn reference_name(value: &Value) -> Option<String> {
    let name = match value {
        Value::String(name) => name.as_str(),
        Value::Object(map) => map.get("name")?.as_str()?,
        _ => return None,
    };
    let name = name.trim();
    (!name.is_empty()).then(|| name.to_string())
}

fn reference_list(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items.iter().filter_map(reference_name).collect(),
        other => reference_name(other).into_iter().collect(),
    }
}
