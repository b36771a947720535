//! V001: metrics_log and requirements.

pub const MIGRATION_SQL: &str = r#"
-- Append-only history of run summaries. The id is the run id and only
-- ever grows; "latest" is the highest id.
CREATE TABLE IF NOT EXISTS metrics_log (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    timestamp TEXT NOT NULL,
    version TEXT NOT NULL,
    commit_label TEXT NOT NULL DEFAULT '',
    sheets_scanned INTEGER NOT NULL,
    total_rows INTEGER NOT NULL,
    max_cols INTEGER NOT NULL,
    total_cells INTEGER NOT NULL,
    scan_duration_ms INTEGER NOT NULL,
    undocumented_count INTEGER NOT NULL,
    implemented_pct REAL NOT NULL,
    grade TEXT NOT NULL,
    score INTEGER NOT NULL
) STRICT;

CREATE INDEX IF NOT EXISTS idx_metrics_log_timestamp
    ON metrics_log(timestamp);

-- Requirement corpus. Columns mirror the tabular store:
-- KravID, Krav, Prioritet, Fremdrift %, Kapittel, Versjon, Kommentar, SistEndret.
-- progress is kept as entered and validated on read.
CREATE TABLE IF NOT EXISTS requirements (
    row_id INTEGER PRIMARY KEY AUTOINCREMENT,
    req_id TEXT NOT NULL,
    text TEXT NOT NULL,
    priority TEXT NOT NULL DEFAULT '',
    progress TEXT NOT NULL DEFAULT '0',
    chapter TEXT NOT NULL DEFAULT '',
    version TEXT NOT NULL DEFAULT '',
    comment TEXT NOT NULL DEFAULT '',
    last_modified TEXT NOT NULL DEFAULT ''
) STRICT;

CREATE INDEX IF NOT EXISTS idx_requirements_req_id ON requirements(req_id);
CREATE INDEX IF NOT EXISTS idx_requirements_text ON requirements(text);
"#;
