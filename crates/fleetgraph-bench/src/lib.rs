use fleetgraph_core::{Resource, ResourceKind, ResourceSet, StatusPhase};

/// A fleet of `agent_count` agents spread over a handful of model APIs and
/// tool servers, each agent peering with its predecessor.
pub fn synthetic_fleet(agent_count: usize) -> ResourceSet {
    let api_count = (agent_count / 8).max(1);
    let tool_count = (agent_count / 4).max(1);
    let mut set = ResourceSet::new();

    for i in 0..api_count {
        set.push(
            Resource::new(ResourceKind::ModelApi, "default", &format!("api-{}", i))
                .with_status(StatusPhase::Ready),
        );
    }
    for i in 0..tool_count {
        set.push(
            Resource::new(ResourceKind::ToolServer, "default", &format!("tool-{}", i))
                .with_status(StatusPhase::Running),
        );
    }
    for i in 0..agent_count {
        let mut agent = Resource::new(ResourceKind::Agent, "default", &format!("agent-{}", i))
            .with_status(if i % 5 == 0 {
                StatusPhase::Pending
            } else {
                StatusPhase::Running
            })
            .with_model_api(&format!("api-{}", i % api_count))
            .with_tool_server(&format!("tool-{}", i % tool_count))
            .with_tool_server(&format!("tool-{}", (i * 7) % tool_count));
        if i > 0 {
            agent = agent.with_peer(&format!("agent-{}", i - 1));
        }
        set.push(agent);
    }
    set
}
