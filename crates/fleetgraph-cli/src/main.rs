use anyhow::{Context, Result, anyhow};
use clap::{Parser, ValueEnum};
use fleetgraph_core::{LayoutDirection, ResourceKind, ResourceSet, StatusBucket};
use fleetgraph_events::LayoutAlgorithm;
use fleetgraph_graph::{GraphView, LayoutSettings};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Method {
    Rank,
    Layered,
}

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Lay out a resource snapshot and print the positioned graph",
    long_about = None
)]
struct Args {
    /// Snapshot JSON with `modelApis`, `toolServers` and `agents`
    snapshot: PathBuf,

    /// Follow-up snapshot applied to the same view, as a refresh would
    #[arg(long)]
    then: Option<PathBuf>,

    /// Layout settings JSON
    #[arg(short, long)]
    settings: Option<PathBuf>,

    #[arg(short, long, value_enum)]
    method: Option<Method>,

    /// Stack ranks top to bottom (layered method only)
    #[arg(long)]
    vertical: bool,

    /// Resource kinds to keep undimmed (repeatable)
    #[arg(short, long)]
    kind: Vec<String>,

    /// Status buckets to keep undimmed: unknown, pending, ready, error
    #[arg(long)]
    status: Vec<String>,

    /// Highlight resources whose name or namespace contains this text
    #[arg(short, long, default_value = "")]
    query: String,

    #[arg(long)]
    pretty: bool,
}

fn read_snapshot(path: &PathBuf) -> Result<ResourceSet> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read snapshot {}", path.display()))?;
    ResourceSet::from_json(&json).with_context(|| format!("Invalid snapshot {}", path.display()))
}

fn parse_status(raw: &str) -> Result<StatusBucket> {
    StatusBucket::ALL
        .into_iter()
        .find(|bucket| bucket.label().eq_ignore_ascii_case(raw))
        .ok_or_else(|| anyhow!("Unknown status bucket: {}", raw))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    let mut settings = match &args.settings {
        Some(path) => LayoutSettings::load(path)?,
        None => LayoutSettings::default(),
    };
    if let Some(method) = args.method {
        settings.algorithm = match method {
            Method::Rank => LayoutAlgorithm::Rank,
            Method::Layered => LayoutAlgorithm::Layered,
        };
    }
    if args.vertical {
        settings.direction = LayoutDirection::Vertical;
    }

    let kinds = args
        .kind
        .iter()
        .map(|raw| ResourceKind::try_from(raw.as_str()))
        .collect::<Result<Vec<_>, _>>()?;
    let statuses = args
        .status
        .iter()
        .map(|raw| parse_status(raw))
        .collect::<Result<Vec<_>>>()?;

    let mut view = GraphView::new(settings);
    let resources = read_snapshot(&args.snapshot)?;
    tracing::info!(resources = resources.len(), "Loaded snapshot");
    view.update(&resources);

    if let Some(path) = &args.then {
        let refreshed = read_snapshot(path)?;
        view.update(&refreshed);
    }

    let snapshot = view.on_filter_changed(&kinds, &statuses, &args.query);
    let output = if args.pretty {
        serde_json::to_string_pretty(&snapshot)?
    } else {
        serde_json::to_string(&snapshot)?
    };
    println!("{}", output);

    Ok(())
}
