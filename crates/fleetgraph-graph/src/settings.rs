use crate::layout::{HeaderPlacement, LayeredLayouter, Layouter, RankLayouter};
use anyhow::{Context, Result};
use fleetgraph_core::LayoutDirection;
use fleetgraph_events::LayoutAlgorithm;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Pan/zoom state of the canvas. The only piece of view state a host is
/// expected to persist between sessions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub x: f32,
    pub y: f32,
    pub zoom: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            zoom: 1.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutSettings {
    pub algorithm: LayoutAlgorithm,
    /// Only the layered algorithm honours `Vertical`.
    pub direction: LayoutDirection,
    pub column_spacing: f32,
    pub node_width: f32,
    pub node_height: f32,
    pub vertical_gap: f32,
    pub header_offset: f32,
    pub layer_spacing: Option<f32>,
    pub node_spacing: Option<f32>,
    #[serde(default = "default_barycenter_passes")]
    pub barycenter_passes: usize,
    pub viewport: Viewport,
}

fn default_barycenter_passes() -> usize {
    LayeredLayouter::DEFAULT_BARYCENTER_PASSES
}

impl Default for LayoutSettings {
    fn default() -> Self {
        Self {
            algorithm: LayoutAlgorithm::Rank,
            direction: LayoutDirection::Horizontal,
            column_spacing: 280.0,
            node_width: 220.0,
            node_height: 72.0,
            vertical_gap: 24.0,
            header_offset: 56.0,
            layer_spacing: None,
            node_spacing: None,
            barycenter_passes: default_barycenter_passes(),
            viewport: Viewport::default(),
        }
    }
}

impl LayoutSettings {
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Failed to parse layout settings")
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        tracing::info!("Loading layout settings from {}", path.display());
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read layout settings from {}", path.display()))?;
        Self::from_json_str(&json)
    }

    /// Writes pretty JSON, creating the parent directory if needed.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write layout settings to {}", path.display()))
    }

    pub fn layouter(&self) -> Box<dyn Layouter> {
        match self.algorithm {
            LayoutAlgorithm::Rank => Box::new(RankLayouter {
                column_spacing: self.column_spacing,
                node_height: self.node_height,
                vertical_gap: self.vertical_gap,
            }),
            LayoutAlgorithm::Layered => Box::new(LayeredLayouter {
                direction: self.direction,
                layer_spacing: self.layer_spacing,
                node_spacing: self.node_spacing,
                barycenter_passes: self.barycenter_passes,
            }),
        }
    }

    pub fn header_placement(&self) -> HeaderPlacement {
        HeaderPlacement {
            offset: self.header_offset,
            column_spacing: self.column_spacing,
            gap: self.vertical_gap,
        }
    }
}
