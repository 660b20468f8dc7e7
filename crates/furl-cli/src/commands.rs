//! CLI command implementations.

use anyhow::{Context, Result};
use colored::Colorize;
use furl_engine::{Action, CollapseSession, EngineConfig, TransitionOutcome};
use furl_graph::{GraphDocument, GraphModel, MemoryGraph};
use serde::Serialize;
use std::fs;
use std::path::Path;
use tracing::info;

/// Loads a graph document from disk.
pub fn load_graph(path: &Path) -> Result<MemoryGraph> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let document: GraphDocument = serde_json::from_str(&text)
        .with_context(|| format!("{} is not a graph document", path.display()))?;
    let graph = MemoryGraph::from_document(document)
        .with_context(|| format!("{} is inconsistent", path.display()))?;
    info!(
        "Loaded {} nodes and {} edges from {}",
        graph.node_count(),
        graph.edge_count(),
        path.display()
    );
    Ok(graph)
}

fn load_script(path: &Path) -> Result<Vec<Action>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("{} is not an action list", path.display()))
}

fn load_config(path: &Path) -> Result<EngineConfig> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("{} is not an engine config", path.display()))
}

/// One replayed action.
#[derive(Debug, Serialize)]
pub struct Step {
    pub action: String,
    pub outcome: &'static str,
    pub hidden: Vec<String>,
    pub shown: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct ProxyView {
    pub id: String,
    pub source: String,
    pub target: String,
}

/// What a replay leaves on screen.
#[derive(Debug, Serialize)]
pub struct ReplaySummary {
    pub initial_collapses: usize,
    pub steps: Vec<Step>,
    pub nodes: Vec<String>,
    pub edges: Vec<String>,
    pub combos: Vec<String>,
    pub proxies: Vec<ProxyView>,
}

/// Runs `actions` against `graph` after the initial collapses.
pub async fn run_replay(
    graph: MemoryGraph,
    actions: Vec<Action>,
    config: EngineConfig,
) -> Result<ReplaySummary> {
    let session = CollapseSession::with_config(graph, config);
    let initial_collapses = session.apply_initial_collapses().await?;

    let mut steps = Vec::with_capacity(actions.len());
    for action in actions {
        let label = action.to_string();
        let outcome = session.apply(action).await?;
        let (hidden, shown) = match outcome.report() {
            Some(report) => (
                report.hidden.iter().cloned().collect(),
                report.shown.iter().cloned().collect(),
            ),
            None => (Vec::new(), Vec::new()),
        };
        steps.push(Step {
            action: label,
            outcome: match outcome {
                TransitionOutcome::Applied(_) => "applied",
                TransitionOutcome::Unchanged => "unchanged",
                TransitionOutcome::Rejected => "rejected",
            },
            hidden,
            shown,
        });
    }

    let model = session.into_model();
    Ok(ReplaySummary {
        initial_collapses,
        steps,
        nodes: model.visible_nodes().iter().map(|s| s.to_string()).collect(),
        edges: model.visible_edges().iter().map(|s| s.to_string()).collect(),
        combos: model
            .combos()
            .into_iter()
            .filter(|c| c.visibility.is_visible())
            .map(|c| match c.badge {
                Some(n) => format!("{} (+{})", c.id, n),
                None => c.id.clone(),
            })
            .collect(),
        proxies: model
            .proxy_edges()
            .into_iter()
            .map(|e| ProxyView {
                id: e.id.clone(),
                source: e.source.clone(),
                target: e.target.clone(),
            })
            .collect(),
    })
}

/// Replay a script and print the resulting view.
pub async fn replay(
    graph_path: &Path,
    script: Option<&Path>,
    config_path: Option<&Path>,
    json_output: bool,
) -> Result<()> {
    let graph = load_graph(graph_path)?;
    let actions = match script {
        Some(path) => load_script(path)?,
        None => Vec::new(),
    };
    let config = match config_path {
        Some(path) => load_config(path)?,
        None => EngineConfig::default(),
    };

    let summary = run_replay(graph, actions, config).await?;

    if json_output {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    if summary.initial_collapses > 0 {
        println!(
            "{} {} nodes collapsed on load",
            "•".dimmed(),
            summary.initial_collapses
        );
    }
    for step in &summary.steps {
        let marker = match step.outcome {
            "applied" => "✓".green(),
            "rejected" => "✗".red(),
            _ => "·".dimmed(),
        };
        println!("{} {}", marker, step.action.bold());
        if !step.hidden.is_empty() {
            println!("    {} {}", "hid".dimmed(), step.hidden.join(", "));
        }
        if !step.shown.is_empty() {
            println!("    {} {}", "showed".dimmed(), step.shown.join(", "));
        }
    }

    println!();
    println!("{}", "Visible".cyan().bold());
    println!("  {} {}", "Nodes:".dimmed(), summary.nodes.join(", "));
    println!("  {} {}", "Edges:".dimmed(), summary.edges.join(", "));
    println!("  {} {}", "Combos:".dimmed(), summary.combos.join(", "));
    if !summary.proxies.is_empty() {
        println!("  {}", "Proxies:".dimmed());
        for proxy in &summary.proxies {
            println!("    {} → {}", proxy.source.yellow(), proxy.target.yellow());
        }
    }

    Ok(())
}

/// List nodes that can be collapsed.
pub async fn check(graph_path: &Path) -> Result<()> {
    let graph = load_graph(graph_path)?;
    let ids: Vec<String> = graph.nodes().iter().map(|n| n.id.clone()).collect();
    let session = CollapseSession::new(graph);

    println!("{}", "Collapsible nodes".cyan().bold());
    let mut found = 0;
    for id in ids {
        if session.is_collapsible(&id).await {
            println!("  {}", id);
            found += 1;
        }
    }
    if found == 0 {
        println!("  {}", "none".dimmed());
    }
    Ok(())
}

/// Show how many edges use each port of a node.
pub async fn ports(graph_path: &Path, node_id: &str) -> Result<()> {
    let graph = load_graph(graph_path)?;
    let Some(node) = graph.node_data(node_id).cloned() else {
        anyhow::bail!("no node with id {}", node_id);
    };
    let session = CollapseSession::new(graph);
    let counts = session.query_port_connections(node_id).await;

    println!("{} {}", "Ports of".cyan().bold(), node_id.bold());
    if node.ports.is_empty() {
        println!("  {}", "none declared".dimmed());
    }
    for port in &node.ports {
        let used = counts.get(&port.key).copied().unwrap_or(0);
        let status = if port.at_capacity(used) {
            "full".red()
        } else {
            "open".green()
        };
        println!("  {} {} edges ({})", port.key, used, status);
    }
    Ok(())
}
