//! Report rendering: Markdown document with an embedded Mermaid graph.

pub mod markdown;
pub mod mermaid;

pub use markdown::{escape_cell, MarkdownReport, ReportInput};
pub use mermaid::{build_dependency_graph, safe_id, GraphLimits, MermaidGraph};
