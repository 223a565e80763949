//! Graph View Style System
//!
//! Maps edge relations and node status buckets to colors and stroke styles.
//! The renderer consumes these; nothing here inspects resource internals.

use fleetgraph_core::{EdgeKind, ResourceKind, StatusBucket};
use serde::{Deserialize, Serialize};

/// RGBA color representation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Scale alpha by `opacity` in `[0, 1]`.
    pub fn with_opacity(&self, opacity: f32) -> Self {
        Self {
            a: ((self.a as f32) * opacity.clamp(0.0, 1.0)) as u8,
            ..*self
        }
    }

    pub fn lighten(&self, factor: f32) -> Self {
        Self {
            r: ((self.r as f32) + (255.0 - self.r as f32) * factor) as u8,
            g: ((self.g as f32) + (255.0 - self.g as f32) * factor) as u8,
            b: ((self.b as f32) + (255.0 - self.b as f32) * factor) as u8,
            a: self.a,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeColors {
    pub fill: Color,
    pub border: Color,
    pub text: Color,
}

/// Edge color and stroke
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeStyle {
    /// Style class the renderer keys its stroke on
    pub class: &'static str,
    pub color: Color,
    pub width: f32,
    pub dashed: bool,
    pub arrow_head: bool,
}

// ============================================================================
// Color Constants
// ============================================================================

// Status fills
pub const COLOR_READY_FILL: Color = Color::rgb(64, 145, 108);
pub const COLOR_READY_BORDER: Color = Color::rgb(45, 120, 88);
pub const COLOR_PENDING_FILL: Color = Color::rgb(214, 162, 64);
pub const COLOR_PENDING_BORDER: Color = Color::rgb(184, 136, 44);
pub const COLOR_ERROR_FILL: Color = Color::rgb(196, 72, 72);
pub const COLOR_ERROR_BORDER: Color = Color::rgb(166, 52, 52);
pub const COLOR_UNKNOWN_FILL: Color = Color::rgb(100, 100, 100);
pub const COLOR_UNKNOWN_BORDER: Color = Color::rgb(80, 80, 80);
pub const COLOR_NODE_TEXT: Color = Color::rgb(255, 255, 255);

// Kind accents, used for header labels
pub const COLOR_MODEL_API_ACCENT: Color = Color::rgb(130, 100, 160);
pub const COLOR_TOOL_SERVER_ACCENT: Color = Color::rgb(80, 130, 180);
pub const COLOR_AGENT_ACCENT: Color = Color::rgb(80, 150, 150);

// Edge colors
pub const COLOR_EDGE_MODEL: Color = Color::rgb(130, 100, 160);
pub const COLOR_EDGE_TOOL: Color = Color::rgb(80, 130, 180);
pub const COLOR_EDGE_PEER: Color = Color::rgb(140, 140, 140);

// Highlight
pub const COLOR_HIGHLIGHT_BORDER: Color = Color::rgb(255, 200, 100);

/// Opacity applied to edge labels once the edge is dimmed.
pub const DIMMED_LABEL_OPACITY: f32 = 0.3;
/// Opacity applied to dimmed nodes and edges as a whole.
pub const DIMMED_OPACITY: f32 = 0.25;

// ============================================================================
// Style Functions
// ============================================================================

pub fn get_edge_style(kind: EdgeKind) -> EdgeStyle {
    match kind {
        EdgeKind::ProvidesModel => EdgeStyle {
            class: "edge-model",
            color: COLOR_EDGE_MODEL,
            width: 2.0,
            dashed: false,
            arrow_head: true,
        },
        EdgeKind::ProvidesTool => EdgeStyle {
            class: "edge-tool",
            color: COLOR_EDGE_TOOL,
            width: 1.5,
            dashed: false,
            arrow_head: true,
        },
        EdgeKind::PeerLink => EdgeStyle {
            class: "edge-peer",
            color: COLOR_EDGE_PEER,
            width: 1.5,
            dashed: true,
            arrow_head: true,
        },
    }
}

/// Edge style after filter projection.
pub fn get_edge_style_with_state(kind: EdgeKind, dimmed: bool) -> EdgeStyle {
    let style = get_edge_style(kind);
    if dimmed {
        EdgeStyle {
            color: style.color.with_opacity(DIMMED_OPACITY),
            ..style
        }
    } else {
        style
    }
}

pub fn edge_label_opacity(dimmed: bool) -> f32 {
    if dimmed { DIMMED_LABEL_OPACITY } else { 1.0 }
}

pub fn get_status_colors(bucket: StatusBucket) -> NodeColors {
    match bucket {
        StatusBucket::Ready => NodeColors {
            fill: COLOR_READY_FILL,
            border: COLOR_READY_BORDER,
            text: COLOR_NODE_TEXT,
        },
        StatusBucket::Pending => NodeColors {
            fill: COLOR_PENDING_FILL,
            border: COLOR_PENDING_BORDER,
            text: COLOR_NODE_TEXT,
        },
        StatusBucket::Error => NodeColors {
            fill: COLOR_ERROR_FILL,
            border: COLOR_ERROR_BORDER,
            text: COLOR_NODE_TEXT,
        },
        StatusBucket::Unknown => NodeColors {
            fill: COLOR_UNKNOWN_FILL,
            border: COLOR_UNKNOWN_BORDER,
            text: COLOR_NODE_TEXT,
        },
    }
}

/// Node colors after filter projection.
pub fn get_node_colors_with_state(
    bucket: StatusBucket,
    dimmed: bool,
    highlighted: bool,
) -> NodeColors {
    let base = get_status_colors(bucket);
    if dimmed {
        faded(base)
    } else if highlighted {
        NodeColors {
            fill: base.fill.lighten(0.1),
            border: COLOR_HIGHLIGHT_BORDER,
            text: base.text,
        }
    } else {
        base
    }
}

fn faded(colors: NodeColors) -> NodeColors {
    NodeColors {
        fill: colors.fill.with_opacity(DIMMED_OPACITY),
        border: colors.border.with_opacity(DIMMED_OPACITY),
        text: colors.text.with_opacity(DIMMED_OPACITY),
    }
}

/// Group headers take their kind's accent and never highlight.
pub fn get_header_colors(kind: ResourceKind, dimmed: bool) -> NodeColors {
    let accent = get_kind_accent(kind);
    let colors = NodeColors {
        fill: accent.lighten(0.6),
        border: accent,
        text: accent,
    };
    if dimmed { faded(colors) } else { colors }
}

pub fn get_kind_accent(kind: ResourceKind) -> Color {
    match kind {
        ResourceKind::ModelApi => COLOR_MODEL_API_ACCENT,
        ResourceKind::ToolServer => COLOR_TOOL_SERVER_ACCENT,
        ResourceKind::Agent => COLOR_AGENT_ACCENT,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_each_relation_has_distinct_class() {
        let classes = [
            get_edge_style(EdgeKind::ProvidesModel).class,
            get_edge_style(EdgeKind::ProvidesTool).class,
            get_edge_style(EdgeKind::PeerLink).class,
        ];
        assert_ne!(classes[0], classes[1]);
        assert_ne!(classes[1], classes[2]);
        assert_ne!(classes[0], classes[2]);
    }

    #[test]
    fn test_peer_links_are_dashed() {
        assert!(get_edge_style(EdgeKind::PeerLink).dashed);
        assert!(!get_edge_style(EdgeKind::ProvidesModel).dashed);
    }

    #[test]
    fn test_dimmed_edge_fades() {
        let normal = get_edge_style_with_state(EdgeKind::ProvidesTool, false);
        let dimmed = get_edge_style_with_state(EdgeKind::ProvidesTool, true);
        assert!(dimmed.color.a < normal.color.a);
        assert_eq!(dimmed.class, normal.class);
        assert!(edge_label_opacity(true) < edge_label_opacity(false));
    }

    #[test]
    fn test_highlight_uses_highlight_border() {
        let colors = get_node_colors_with_state(StatusBucket::Ready, false, true);
        assert_eq!(colors.border, COLOR_HIGHLIGHT_BORDER);
        let dimmed = get_node_colors_with_state(StatusBucket::Ready, true, true);
        assert_ne!(dimmed.border, COLOR_HIGHLIGHT_BORDER);
    }

    #[test]
    fn test_kind_accents_are_distinct() {
        let accents: Vec<_> = ResourceKind::ALL.into_iter().map(get_kind_accent).collect();
        assert_ne!(accents[0], accents[1]);
        assert_ne!(accents[1], accents[2]);
        assert_eq!(get_kind_accent(ResourceKind::ToolServer), COLOR_EDGE_TOOL);
    }

    #[test]
    fn test_dimmed_header_fades_accent() {
        let normal = get_header_colors(ResourceKind::Agent, false);
        let dimmed = get_header_colors(ResourceKind::Agent, true);
        assert_eq!(normal.border, COLOR_AGENT_ACCENT);
        assert!(dimmed.border.a < normal.border.a);
        assert_eq!(dimmed.border.r, normal.border.r);
    }
}
