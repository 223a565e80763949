pub mod builder;
pub mod filter;
pub mod fingerprint;
pub mod graph;
pub mod layout;
pub mod locks;
pub mod settings;
pub mod style;
pub mod view;

pub use builder::GraphBuilder;
pub use filter::FilterState;
pub use fingerprint::{ChangeDetector, Fingerprint, structural_change};
pub use graph::{
    EdgeIndex, Graph, GraphEdge, GraphNode, GroupHeaderNode, NodeData, NodeIndex, ResourceNode,
    Vec2,
};
pub use layout::{
    HeaderPlacement, LayeredLayouter, Layouter, RankLayouter, assign_ranks, layout_graph,
};
pub use locks::PositionLocks;
pub use settings::{LayoutSettings, Viewport};
pub use style::{
    Color, EdgeStyle, NodeColors, edge_label_opacity, get_edge_style, get_edge_style_with_state,
    get_header_colors, get_kind_accent, get_node_colors_with_state, get_status_colors,
};
pub use view::{GraphSnapshot, GraphView};
