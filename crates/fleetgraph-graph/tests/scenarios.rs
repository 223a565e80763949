use fleetgraph_core::{
    EdgeKind, LayoutDirection, NodeId, Resource, ResourceKind, ResourceSet, StatusBucket,
    StatusPhase,
};
use fleetgraph_events::{Event, EventBus, LayoutAlgorithm};
use fleetgraph_graph::{
    FilterState, GraphBuilder, GraphView, LayoutSettings, PositionLocks, Vec2, assign_ranks,
    filter, layout_graph,
};
use proptest::prelude::*;

fn api(name: &str) -> Resource {
    Resource::new(ResourceKind::ModelApi, "default", name).with_status(StatusPhase::Running)
}

fn tool(name: &str) -> Resource {
    Resource::new(ResourceKind::ToolServer, "default", name).with_status(StatusPhase::Running)
}

fn agent(name: &str) -> Resource {
    Resource::new(ResourceKind::Agent, "default", name).with_status(StatusPhase::Running)
}

fn id(kind: ResourceKind, name: &str) -> NodeId {
    NodeId::resource(kind, "default", name)
}

fn linear_chain() -> ResourceSet {
    let mut set = ResourceSet::new();
    set.push(api("api-1"));
    set.push(tool("tool-1"));
    set.push(agent("agent-1").with_model_api("api-1").with_tool_server("tool-1"));
    set
}

#[test]
fn test_linear_chain() {
    let graph = GraphBuilder::default().build(&linear_chain());

    assert_eq!(graph.node_count(), 6);
    assert_eq!(graph.nodes().iter().filter(|n| n.is_header()).count(), 3);
    assert_eq!(graph.edge_count(), 2);

    let agent_id = id(ResourceKind::Agent, "agent-1");
    let mut sources: Vec<_> = graph
        .edges()
        .iter()
        .inspect(|e| assert_eq!(e.target, agent_id))
        .map(|e| (e.kind, e.source.clone()))
        .collect();
    sources.sort_by(|a, b| a.1.as_str().cmp(b.1.as_str()));
    assert_eq!(
        sources,
        vec![
            (EdgeKind::ProvidesModel, id(ResourceKind::ModelApi, "api-1")),
            (EdgeKind::ProvidesTool, id(ResourceKind::ToolServer, "tool-1")),
        ]
    );

    let ranks = assign_ranks(&graph);
    let rank_of = |kind, name| ranks[&graph.index_of(&id(kind, name)).unwrap()];
    assert_eq!(rank_of(ResourceKind::ModelApi, "api-1"), 0);
    assert_eq!(rank_of(ResourceKind::ToolServer, "tool-1"), 0);
    assert_eq!(rank_of(ResourceKind::Agent, "agent-1"), 1);

    let mut view = GraphView::default();
    let snapshot = view.update(&linear_chain());
    let x_of = |name: &str| {
        snapshot
            .nodes
            .iter()
            .find(|n| n.label() == name)
            .unwrap()
            .position
            .x
    };
    assert_eq!(x_of("api-1"), x_of("tool-1"));
    assert!(x_of("agent-1") > x_of("api-1"));
}

#[test]
fn test_dangling_reference_is_dropped() {
    let mut set = ResourceSet::new();
    set.push(agent("agent-1").with_model_api("ghost-api"));

    let graph = GraphBuilder::default().build(&set);
    assert_eq!(graph.edge_count(), 0);
    assert!(
        graph
            .edges()
            .iter()
            .all(|e| !e.source.as_str().contains("ghost-api"))
    );

    let ranks = assign_ranks(&graph);
    let idx = graph.index_of(&id(ResourceKind::Agent, "agent-1")).unwrap();
    assert_eq!(ranks[&idx], 0);
}

#[test]
fn test_status_message_update_reuses_positions() {
    let mut view = GraphView::default();
    let first = view.update(&linear_chain());

    let mut touched = linear_chain();
    touched.agents[0].status_message = Some("scaling".to_string());
    let second = view.update(&touched);

    for (before, after) in first.nodes.iter().zip(&second.nodes) {
        assert_eq!(before.id, after.id);
        assert_eq!(before.position, after.position);
    }
    let message = second
        .nodes
        .iter()
        .find_map(|n| n.as_resource().and_then(|r| r.status_message.clone()));
    assert_eq!(message.as_deref(), Some("scaling"));
}

#[test]
fn test_search_highlights_only_matches() {
    let mut set = ResourceSet::new();
    set.push(api("api-1"));
    set.push(agent("agent-1").with_model_api("api-1"));
    set.push(agent("worker-2").with_model_api("api-1"));

    let graph = GraphBuilder::default().build(&set);
    let view = filter::apply(&graph, &FilterState::new(ResourceKind::ALL, [], "agent"));

    let agent_node = view.get_node(&id(ResourceKind::Agent, "agent-1")).unwrap();
    assert!(agent_node.highlighted && !agent_node.dimmed);

    let worker = id(ResourceKind::Agent, "worker-2");
    let worker_node = view.get_node(&worker).unwrap();
    assert!(worker_node.dimmed && !worker_node.highlighted);

    for edge in view.edges() {
        if edge.source == worker || edge.target == worker {
            assert!(edge.dimmed);
            assert!(!edge.animated);
        }
    }
}

#[test]
fn test_locks_survive_unrelated_additions() {
    for algorithm in [LayoutAlgorithm::Rank, LayoutAlgorithm::Layered] {
        let settings = LayoutSettings {
            algorithm,
            ..LayoutSettings::default()
        };
        let layouter = settings.layouter();
        let headers = settings.header_placement();

        let pinned = id(ResourceKind::Agent, "agent-1");
        let mut locks = PositionLocks::new();
        locks.record_drag(pinned.clone(), Vec2::new(-40.0, 512.5));

        let mut before = GraphBuilder::default().build(&linear_chain());
        layout_graph(layouter.as_ref(), &mut before, &locks, &headers);

        let mut grown_set = linear_chain();
        grown_set.push(api("api-2"));
        grown_set.push(tool("tool-2"));
        grown_set.push(agent("agent-2").with_model_api("api-2").with_peer("agent-1"));
        let mut after = GraphBuilder::default().build(&grown_set);
        layout_graph(layouter.as_ref(), &mut after, &locks, &headers);

        let pinned_at = |graph: &fleetgraph_graph::Graph| graph.get_node(&pinned).unwrap().position;
        assert_eq!(pinned_at(&before), Vec2::new(-40.0, 512.5));
        assert_eq!(pinned_at(&after), Vec2::new(-40.0, 512.5));
    }
}

fn algorithm_strategy() -> impl Strategy<Value = LayoutAlgorithm> {
    prop_oneof![Just(LayoutAlgorithm::Rank), Just(LayoutAlgorithm::Layered)]
}

proptest! {
    #[test]
    fn prop_pins_hold_under_unrelated_growth(
        algorithm in algorithm_strategy(),
        vertical in any::<bool>(),
        pinned_pick in 0usize..3,
        x in -2000.0f32..2000.0,
        y in -2000.0f32..2000.0,
        extra_apis in 0usize..4,
        extra_tools in 0usize..4,
        extra_agents in 0usize..6,
    ) {
        let settings = LayoutSettings {
            algorithm,
            direction: if vertical {
                LayoutDirection::Vertical
            } else {
                LayoutDirection::Horizontal
            },
            ..LayoutSettings::default()
        };
        let layouter = settings.layouter();
        let headers = settings.header_placement();

        let pinned = match pinned_pick {
            0 => id(ResourceKind::ModelApi, "api-1"),
            1 => id(ResourceKind::ToolServer, "tool-1"),
            _ => id(ResourceKind::Agent, "agent-1"),
        };
        let mut locks = PositionLocks::new();
        locks.record_drag(pinned.clone(), Vec2::new(x, y));

        let mut before = GraphBuilder::default().build(&linear_chain());
        layout_graph(layouter.as_ref(), &mut before, &locks, &headers);

        let mut grown_set = linear_chain();
        for i in 0..extra_apis {
            grown_set.push(api(&format!("extra-api-{i}")));
        }
        for i in 0..extra_tools {
            grown_set.push(tool(&format!("extra-tool-{i}")));
        }
        for i in 0..extra_agents {
            let mut extra = agent(&format!("extra-agent-{i}"));
            if extra_apis > 0 {
                extra = extra.with_model_api(&format!("extra-api-{}", i % extra_apis));
            }
            if i > 0 {
                extra = extra.with_peer(&format!("extra-agent-{}", i - 1));
            }
            grown_set.push(extra);
        }
        let mut after = GraphBuilder::default().build(&grown_set);
        layout_graph(layouter.as_ref(), &mut after, &locks, &headers);

        prop_assert_eq!(before.get_node(&pinned).unwrap().position, Vec2::new(x, y));
        prop_assert_eq!(after.get_node(&pinned).unwrap().position, Vec2::new(x, y));
    }
}

#[test]
fn test_builder_is_deterministic() {
    let builder = GraphBuilder::default();
    let a = builder.build(&linear_chain());
    let b = builder.build(&linear_chain());

    let ids = |g: &fleetgraph_graph::Graph| {
        g.nodes()
            .iter()
            .map(|n| (n.id.clone(), n.label().to_string()))
            .collect::<Vec<_>>()
    };
    assert_eq!(ids(&a), ids(&b));
    assert_eq!(a.edges(), b.edges());
}

#[test]
fn test_json_snapshot_to_view() -> anyhow::Result<()> {
    let json = r#"{
        "modelAPIs": [{"metadata": {"name": "api-1"}, "status": {"phase": "Ready"}}],
        "mcpServers": [{"metadata": {"name": "tool-1", "namespace": "default"}}],
        "agents": [{
            "metadata": {"name": "agent-1"},
            "spec": {"modelAPI": "api-1", "mcpServers": [{"name": "tool-1"}, "ghost"]},
            "status": {"phase": "Pending", "message": "waiting"}
        }]
    }"#;
    let resources = ResourceSet::from_json(json)?;

    let mut view = GraphView::default();
    let snapshot = view.update(&resources);
    assert_eq!(snapshot.edges.len(), 2);

    // Only the ready model API animates its edge.
    let animated: Vec<_> = snapshot.edges.iter().filter(|e| e.animated).collect();
    assert_eq!(animated.len(), 1);
    assert_eq!(animated[0].kind, EdgeKind::ProvidesModel);

    let rendered = serde_json::to_value(&snapshot)?;
    assert_eq!(rendered["positions_locked"], false);
    assert!(rendered["nodes"][0]["colors"]["fill"].is_object());
    assert!(rendered["edges"][0]["color"].is_object());
    Ok(())
}

#[test]
fn test_views_are_independent() {
    let mut left = GraphView::default();
    let mut right = GraphView::new(LayoutSettings {
        algorithm: LayoutAlgorithm::Layered,
        ..LayoutSettings::default()
    });
    left.update(&linear_chain());
    right.update(&linear_chain());

    let agent_id = id(ResourceKind::Agent, "agent-1");
    left.on_node_drag_stop(&agent_id, Vec2::new(9.0, 9.0));
    left.on_filter_changed(&[ResourceKind::Agent], &[StatusBucket::Ready], "");

    assert!(right.locks().is_empty());
    assert_eq!(right.filter(), &FilterState::default());
    assert_ne!(
        right.graph().get_node(&agent_id).unwrap().position,
        Vec2::new(9.0, 9.0)
    );
}

#[test]
fn test_bus_routes_to_view() {
    let bus = EventBus::new();
    let sender = bus.sender();
    let mut view = GraphView::default();

    sender
        .send(Event::SnapshotReceived {
            resources: linear_chain(),
        })
        .unwrap();
    sender.send(Event::SetPositionsLocked(true)).unwrap();
    sender
        .send(Event::NodeDragStop {
            id: id(ResourceKind::Agent, "agent-1"),
            x: 1.0,
            y: 1.0,
        })
        .unwrap();
    bus.dispatch_to(&mut view);

    assert!(view.locks().is_locked());
    assert!(view.locks().is_empty());
    assert_eq!(view.snapshot().nodes.len(), 6);

    bus.publish(Event::SetPositionsLocked(false));
    bus.publish(Event::SetLayoutMethod(LayoutAlgorithm::Layered));
    bus.publish(Event::ReLayoutRequested);
    bus.dispatch_to(&mut view);
    assert_eq!(view.settings().algorithm, LayoutAlgorithm::Layered);
    assert!(!view.locks().is_locked());
}
