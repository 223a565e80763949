use fleetgraph_core::{Resource, ResourceKind, ResourceSet};
use std::fmt;

/// Separates the per-kind sections. Cannot occur in a resource name.
const KIND_SEPARATOR: &str = "\u{1e}";
const ENTRY_SEPARATOR: &str = "\n";

/// Order-independent summary of everything that affects layout: identities,
/// status phases and reference fields. Status messages and other display-only
/// fields are left out.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fingerprint(String);

impl Fingerprint {
    pub fn of(resources: &ResourceSet) -> Self {
        let sections: Vec<String> = ResourceKind::ALL
            .into_iter()
            .map(|kind| {
                let mut entries: Vec<String> =
                    resources.of_kind(kind).iter().map(canonical_entry).collect();
                entries.sort_unstable();
                format!("{}:{}", kind.slug(), entries.join(ENTRY_SEPARATOR))
            })
            .collect();
        Self(sections.join(KIND_SEPARATOR))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn sorted_refs(refs: &[String]) -> String {
    let mut refs: Vec<&str> = refs.iter().map(String::as_str).collect();
    refs.sort_unstable();
    refs.dedup();
    refs.join(",")
}

fn canonical_entry(resource: &Resource) -> String {
    format!(
        "{}/{}|{}|m={}|t={}|p={}",
        resource.namespace,
        resource.name,
        resource.status.as_str(),
        resource.model_api.as_deref().unwrap_or(""),
        sorted_refs(&resource.tool_servers),
        sorted_refs(&resource.peer_agents),
    )
}

/// Remembers the last fingerprint seen by one graph view.
#[derive(Debug, Clone, Default)]
pub struct ChangeDetector {
    previous: Option<Fingerprint>,
}

impl ChangeDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// `true` when no fingerprint was seen yet or `current` differs from it.
    pub fn has_changed(&self, current: &Fingerprint) -> bool {
        structural_change(self.previous.as_ref(), current)
    }

    /// Compares against the previous fingerprint, then stores `current`.
    pub fn observe(&mut self, current: Fingerprint) -> bool {
        let changed = self.has_changed(&current);
        self.previous = Some(current);
        changed
    }

}

pub fn structural_change(previous: Option<&Fingerprint>, current: &Fingerprint) -> bool {
    previous.is_none_or(|previous| previous != current)
}
