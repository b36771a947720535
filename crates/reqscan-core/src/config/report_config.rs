//! Report rendering configuration.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportLanguage {
    #[default]
    No,
    En,
}

impl ReportLanguage {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "no" | "nb" | "nn" | "norwegian" => Some(Self::No),
            "en" | "english" => Some(Self::En),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ReportConfig {
    /// Template and label language. Default: `no`.
    pub language: Option<ReportLanguage>,
    /// Suggestions listed in the document. Default: 250.
    pub max_suggestions: Option<usize>,
    /// Include the Mermaid dependency graph. Default: true.
    pub include_graph: Option<bool>,
    /// Default: 300.
    pub graph_max_nodes: Option<usize>,
    /// Default: 400.
    pub graph_max_edges: Option<usize>,
    /// Routine→sheet similarity at which an edge is drawn. Default: 0.60.
    pub graph_similarity_threshold: Option<f64>,
    /// Title of the written document.
    pub title: Option<String>,
}

impl ReportConfig {
    pub fn effective_language(&self) -> ReportLanguage {
        self.language.unwrap_or_default()
    }

    pub fn effective_max_suggestions(&self) -> usize {
        self.max_suggestions.unwrap_or(250)
    }

    pub fn effective_include_graph(&self) -> bool {
        self.include_graph.unwrap_or(true)
    }

    pub fn effective_graph_max_nodes(&self) -> usize {
        self.graph_max_nodes.unwrap_or(300)
    }

    pub fn effective_graph_max_edges(&self) -> usize {
        self.graph_max_edges.unwrap_or(400)
    }

    pub fn effective_graph_similarity_threshold(&self) -> f64 {
        self.graph_similarity_threshold.unwrap_or(0.60)
    }

    pub fn effective_title(&self) -> String {
        self.title
            .clone()
            .unwrap_or_else(|| "Requirement Discovery Report".to_string())
    }
}
