use serde::{Deserialize, Serialize};
use std::fmt;

pub mod adapter;
pub mod error;
pub mod status;

pub use adapter::{RawMetadata, RawResource, RawSnapshot, normalize};
pub use error::Error;
pub use status::{StatusBucket, StatusPhase};

/// Stable identity of a graph node, e.g. `"agent/default/agent-1"`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeId(pub String);

impl NodeId {
    pub fn resource(kind: ResourceKind, namespace: &str, name: &str) -> Self {
        Self(format!("{}/{}/{}", kind.slug(), namespace, name))
    }

    pub fn header(kind: ResourceKind) -> Self {
        Self(format!("header/{}", kind.slug()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Stable identity of a graph edge, derived from `(kind, source, target)`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EdgeId(pub String);

impl EdgeId {
    pub fn new(kind: EdgeKind, source: &NodeId, target: &NodeId) -> Self {
        Self(format!("{}:{}->{}", kind.label(), source, target))
    }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ResourceKind {
    /// Backend model provider.
    ModelApi,
    /// Tool provider.
    ToolServer,
    /// Orchestrating agent.
    Agent,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 3] = [
        ResourceKind::ModelApi,
        ResourceKind::ToolServer,
        ResourceKind::Agent,
    ];

    pub fn slug(self) -> &'static str {
        match self {
            ResourceKind::ModelApi => "modelapi",
            ResourceKind::ToolServer => "toolserver",
            ResourceKind::Agent => "agent",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ResourceKind::ModelApi => "Model APIs",
            ResourceKind::ToolServer => "Tool Servers",
            ResourceKind::Agent => "Agents",
        }
    }

    /// Column the kind occupies in the three-tier mental model.
    pub fn index(self) -> usize {
        match self {
            ResourceKind::ModelApi => 0,
            ResourceKind::ToolServer => 1,
            ResourceKind::Agent => 2,
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl TryFrom<&str> for ResourceKind {
    type Error = Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.to_ascii_lowercase().as_str() {
            "modelapi" | "modelapis" => Ok(ResourceKind::ModelApi),
            "toolserver" | "toolservers" | "mcpserver" | "mcpservers" => {
                Ok(ResourceKind::ToolServer)
            }
            "agent" | "agents" => Ok(ResourceKind::Agent),
            _ => Err(Error::UnknownKind(value.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EdgeKind {
    /// Model API -> Agent
    ProvidesModel,
    /// Tool server -> Agent
    ProvidesTool,
    /// Agent -> peer Agent
    PeerLink,
}

impl EdgeKind {
    pub fn label(self) -> &'static str {
        match self {
            EdgeKind::ProvidesModel => "provides-model",
            EdgeKind::ProvidesTool => "provides-tool",
            EdgeKind::PeerLink => "peer-link",
        }
    }
}

/// Canonical resource shape consumed by the graph pipeline.
///
/// Upstream objects with loose or legacy shapes are mapped into this form by
/// [`adapter::normalize`] before they reach the builder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    pub kind: ResourceKind,
    pub namespace: String,
    pub name: String,
    #[serde(default)]
    pub status: StatusPhase,
    #[serde(default)]
    pub status_message: Option<String>,
    /// Single reference to a model API (agents only).
    #[serde(default)]
    pub model_api: Option<String>,
    /// References to tool servers (agents only).
    #[serde(default)]
    pub tool_servers: Vec<String>,
    /// Peer agents this agent may call.
    #[serde(default)]
    pub peer_agents: Vec<String>,
}

impl Resource {
    pub fn new(kind: ResourceKind, namespace: &str, name: &str) -> Self {
        Self {
            kind,
            namespace: namespace.to_string(),
            name: name.to_string(),
            status: StatusPhase::Unknown,
            status_message: None,
            model_api: None,
            tool_servers: Vec::new(),
            peer_agents: Vec::new(),
        }
    }

    pub fn with_status(mut self, status: StatusPhase) -> Self {
        self.status = status;
        self
    }

    pub fn with_message(mut self, message: &str) -> Self {
        self.status_message = Some(message.to_string());
        self
    }

    pub fn with_model_api(mut self, name: &str) -> Self {
        self.model_api = Some(name.to_string());
        self
    }

    pub fn with_tool_server(mut self, name: &str) -> Self {
        self.tool_servers.push(name.to_string());
        self
    }

    pub fn with_peer(mut self, name: &str) -> Self {
        self.peer_agents.push(name.to_string());
        self
    }

    pub fn node_id(&self) -> NodeId {
        NodeId::resource(self.kind, &self.namespace, &self.name)
    }
}

/// One snapshot of the three typed resource collections.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceSet {
    pub model_apis: Vec<Resource>,
    pub tool_servers: Vec<Resource>,
    pub agents: Vec<Resource>,
}

impl ResourceSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collection for `kind`, in input order.
    pub fn of_kind(&self, kind: ResourceKind) -> &[Resource] {
        match kind {
            ResourceKind::ModelApi => &self.model_apis,
            ResourceKind::ToolServer => &self.tool_servers,
            ResourceKind::Agent => &self.agents,
        }
    }

    /// Appends to the collection matching the resource's own kind.
    pub fn push(&mut self, resource: Resource) {
        match resource.kind {
            ResourceKind::ModelApi => self.model_apis.push(resource),
            ResourceKind::ToolServer => self.tool_servers.push(resource),
            ResourceKind::Agent => self.agents.push(resource),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Resource> {
        ResourceKind::ALL
            .into_iter()
            .flat_map(move |kind| self.of_kind(kind).iter())
    }

    pub fn len(&self) -> usize {
        self.model_apis.len() + self.tool_servers.len() + self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum LayoutDirection {
    #[default]
    Horizontal,
    Vertical,
}
