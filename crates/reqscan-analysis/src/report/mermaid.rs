//! Mermaid dependency graph: triggers, menus, routines and sheets.
//!
//! Trigger→routine and menu→routine edges come straight from the snapshot.
//! Routine→sheet edges are drawn when the routine name is similar to the
//! sheet name or one of its headers.

use reqscan_core::config::ReportConfig;
use reqscan_core::types::collections::FxHashSet;
use reqscan_core::types::ArtifactSnapshot;

use crate::text::{JaccardScorer, TokenCache};

/// Pruning threshold for routine→sheet comparisons.
const EDGE_PRUNE: f64 = 0.30;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GraphLimits {
    pub max_nodes: usize,
    pub max_edges: usize,
    pub similarity_threshold: f64,
}

impl Default for GraphLimits {
    fn default() -> Self {
        Self {
            max_nodes: 300,
            max_edges: 400,
            similarity_threshold: 0.60,
        }
    }
}

impl GraphLimits {
    pub fn from_config(config: &ReportConfig) -> Self {
        Self {
            max_nodes: config.effective_graph_max_nodes(),
            max_edges: config.effective_graph_max_edges(),
            similarity_threshold: config.effective_graph_similarity_threshold(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MermaidGraph {
    pub source: String,
    pub nodes: usize,
    pub edges: usize,
    /// Node or edge cap was hit.
    pub truncated: bool,
}

/// Node id safe for Mermaid: every char outside `[A-Za-z0-9_]` becomes `_`.
pub fn safe_id(raw: &str) -> String {
    let id: String = raw
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect();
    if id.is_empty() {
        "X".to_string()
    } else {
        id
    }
}

fn label(raw: &str) -> String {
    raw.replace('"', "'").replace(['\n', '\r'], " ")
}

struct GraphWriter {
    lines: Vec<String>,
    node_ids: FxHashSet<String>,
    edges: usize,
    limits: GraphLimits,
}

impl GraphWriter {
    fn node_budget_left(&self) -> bool {
        self.node_ids.len() < self.limits.max_nodes
    }

    fn edge_budget_left(&self) -> bool {
        self.edges < self.limits.max_edges
    }

    /// Returns false when the id already exists or the cap is reached.
    fn node(&mut self, id: String, shape: String) -> bool {
        if !self.node_budget_left() || self.node_ids.contains(&id) {
            return false;
        }
        self.lines.push(format!("    {id}{shape}"));
        self.node_ids.insert(id);
        true
    }

    fn edge(&mut self, from: &str, label: &str, to: &str) {
        if !self.edge_budget_left() {
            return;
        }
        if !self.node_ids.contains(from) || !self.node_ids.contains(to) {
            return;
        }
        self.lines.push(format!("    {from} -- \"{label}\" --> {to}"));
        self.edges += 1;
    }
}

/// Build the dependency graph. With more nodes than `max_nodes`, each
/// category is cut to its share: sheets 35 %, routines 35 %, triggers
/// 15 %, menus 15 %.
pub fn build_dependency_graph(
    snapshot: &ArtifactSnapshot,
    cache: &TokenCache,
    limits: GraphLimits,
) -> MermaidGraph {
    let mut sheets: Vec<_> = snapshot.tabular_sheets.iter().collect();
    let mut routines: Vec<_> = snapshot.routines.iter().collect();
    let mut jobs: Vec<_> = snapshot.scheduled_jobs.iter().collect();
    let mut menus: Vec<_> = snapshot.menu_bindings.iter().collect();

    let requested = sheets.len() + routines.len() + jobs.len() + menus.len();
    let mut truncated = false;
    if requested > limits.max_nodes {
        truncated = true;
        let share = |pct: usize| limits.max_nodes * pct / 100;
        sheets.truncate(share(35));
        routines.truncate(share(35));
        jobs.truncate(share(15));
        menus.truncate(share(15));
    }

    let mut w = GraphWriter {
        lines: vec!["graph LR".to_string()],
        node_ids: FxHashSet::default(),
        edges: 0,
        limits,
    };

    w.lines.push("  subgraph Triggers".to_string());
    for job in &jobs {
        if job.handler.is_empty() {
            continue;
        }
        let shape = format!(
            "[\"Trig: {}<br/>{}\"]:::trig",
            label(job.event_kind.label()),
            label(&job.handler)
        );
        w.node(safe_id(&format!("trig_{}", job.handler)), shape);
    }
    w.lines.push("  end".to_string());

    w.lines.push("  subgraph Menus".to_string());
    for menu in &menus {
        let title = if menu.title.is_empty() { &menu.handler } else { &menu.title };
        if title.is_empty() {
            continue;
        }
        let shape = format!("[\"Menu: {}\"]:::menu", label(title));
        w.node(safe_id(&format!("menu_{title}")), shape);
    }
    w.lines.push("  end".to_string());

    w.lines.push("  subgraph Routines".to_string());
    for routine in &routines {
        if routine.name.is_empty() {
            continue;
        }
        let shape = format!("((\"Fn: {}\")):::fn", label(&routine.name));
        w.node(safe_id(&format!("fn_{}", routine.name)), shape);
    }
    w.lines.push("  end".to_string());

    w.lines.push("  subgraph Sheets".to_string());
    for sheet in &sheets {
        if sheet.name.is_empty() {
            continue;
        }
        let shape = format!("[\"Sheet: {}\"]:::sheet", label(&sheet.name));
        w.node(safe_id(&format!("sheet_{}", sheet.name)), shape);
    }
    w.lines.push("  end".to_string());

    for job in &jobs {
        if !w.edge_budget_left() {
            break;
        }
        let from = safe_id(&format!("trig_{}", job.handler));
        let to = safe_id(&format!("fn_{}", job.handler));
        w.edge(&from, &label(job.event_kind.label()), &to);
    }

    for menu in &menus {
        if !w.edge_budget_left() {
            break;
        }
        let title = if menu.title.is_empty() { &menu.handler } else { &menu.title };
        let from = safe_id(&format!("menu_{title}"));
        let to = safe_id(&format!("fn_{}", menu.handler));
        w.edge(&from, "Menu", &to);
    }

    let scorer = JaccardScorer::new(cache);
    'routines: for routine in &routines {
        for sheet in &sheets {
            if !w.edge_budget_left() {
                break 'routines;
            }
            let mut sim = scorer.score_pruned(&routine.name, &sheet.name, EDGE_PRUNE);
            for header in &sheet.headers {
                if sim >= 0.999 {
                    break;
                }
                sim = sim.max(scorer.score_pruned(&routine.name, header, EDGE_PRUNE));
            }
            if sim >= limits.similarity_threshold {
                let from = safe_id(&format!("fn_{}", routine.name));
                let to = safe_id(&format!("sheet_{}", sheet.name));
                let lbl = format!("sim:{:.2}", sim);
                w.edge(&from, &lbl, &to);
            }
        }
    }

    w.lines.extend(
        [
            "  classDef sheet fill:#ECFCCB,stroke:#84CC16,color:#1a1a1a;",
            "  classDef fn fill:#E0F2FE,stroke:#38BDF8,color:#1a1a1a;",
            "  classDef trig fill:#FFE4E6,stroke:#FB7185,color:#1a1a1a;",
            "  classDef menu fill:#F3E8FF,stroke:#A78BFA,color:#1a1a1a;",
            "  classDef note fill:#F8FAFC,stroke:#94A3B8,color:#334155;",
        ]
        .map(String::from),
    );

    let nodes = w.node_ids.len();
    let edges = w.edges;
    if nodes >= limits.max_nodes || edges >= limits.max_edges {
        truncated = true;
    }
    if truncated {
        w.lines.push(format!(
            "  NoteTrunc[/\"Truncated<br/>nodes: {nodes} / {}<br/>edges: {edges} / {}\"/]:::note",
            limits.max_nodes, limits.max_edges
        ));
    }

    MermaidGraph {
        source: w.lines.join("\n"),
        nodes,
        edges,
        truncated,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqscan_core::types::{EventKind, MenuBinding, Routine, ScheduledJob, TabularSheet};

    fn snapshot() -> ArtifactSnapshot {
        ArtifactSnapshot {
            scheduled_jobs: vec![ScheduledJob {
                handler: "sendInvoiceReminder".into(),
                event_kind: EventKind::Clock,
                origin: "clock".into(),
            }],
            menu_bindings: vec![MenuBinding {
                title: "Importer budsjett".into(),
                handler: "importBudget".into(),
                ..Default::default()
            }],
            tabular_sheets: vec![TabularSheet {
                name: "Budget".into(),
                headers: vec!["Import budget".into()],
                ..Default::default()
            }],
            routines: vec![
                Routine::public("sendInvoiceReminder"),
                Routine::public("importBudget"),
            ],
            ..Default::default()
        }
    }

    #[test]
    fn safe_id_replaces_non_word_chars() {
        assert_eq!(safe_id("menu_Importer budsjett!"), "menu_Importer_budsjett_");
        assert_eq!(safe_id(""), "X");
    }

    #[test]
    fn renders_nodes_and_edges() {
        let cache = TokenCache::default();
        let graph = build_dependency_graph(&snapshot(), &cache, GraphLimits::default());
        assert!(graph.source.starts_with("graph LR"));
        assert_eq!(graph.nodes, 5);
        assert!(graph.source.contains("trig_sendInvoiceReminder -- \"CLOCK\" --> fn_sendInvoiceReminder"));
        assert!(graph.source.contains("menu_Importer_budsjett -- \"Menu\" --> fn_importBudget"));
        // "importBudget" tokens equal the header "Import budget".
        assert!(graph.source.contains("fn_importBudget -- \"sim:1.00\" --> sheet_Budget"));
        assert_eq!(graph.edges, 3);
        assert!(!graph.truncated);
    }

    #[test]
    fn caps_nodes_and_notes_truncation() {
        let cache = TokenCache::default();
        let mut snap = snapshot();
        snap.routines = (0..50).map(|i| Routine::public(format!("routine{i}"))).collect();
        let limits = GraphLimits {
            max_nodes: 20,
            max_edges: 1,
            similarity_threshold: 0.6,
        };
        let graph = build_dependency_graph(&snap, &cache, limits);
        assert!(graph.nodes <= 20);
        assert!(graph.edges <= 1);
        assert!(graph.truncated);
        assert!(graph.source.contains("NoteTrunc"));
    }
}
