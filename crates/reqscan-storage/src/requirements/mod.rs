//! SQLite requirement store: validated reads and candidate ingest.

pub mod chapters;

use std::sync::Arc;

use rusqlite::Connection;

use reqscan_core::errors::{InputValidationError, PipelineResult, StorageError};
use reqscan_core::traits::{IngestOptions, IngestSummary, RequirementStore};
use reqscan_core::types::collections::{FxHashMap, FxHashSet};
use reqscan_core::types::{CandidateRecord, Priority, PriorityLabels, RequirementRecord};

use crate::connection::DatabaseManager;
use crate::queries::requirements::{self as queries, RequirementRow};
use crate::to_storage_err;

pub use chapters::{ChapterClassifier, IdAllocator, FALLBACK_CHAPTER};

pub struct SqliteRequirementStore {
    db: Arc<DatabaseManager>,
    classifier: ChapterClassifier,
}

impl SqliteRequirementStore {
    pub fn new(db: Arc<DatabaseManager>) -> Result<Self, StorageError> {
        Ok(Self {
            db,
            classifier: ChapterClassifier::new()?,
        })
    }

    pub fn open_in_memory() -> Result<Self, StorageError> {
        Self::new(Arc::new(DatabaseManager::open_in_memory()?))
    }

    pub fn classifier(&self) -> &ChapterClassifier {
        &self.classifier
    }

    /// Write confirmed requirements as-is. Returns the number of rows
    /// written.
    pub fn import(
        &self,
        records: &[RequirementRecord],
        labels: &PriorityLabels,
    ) -> Result<usize, StorageError> {
        self.db.with_writer(|conn| {
            let tx = conn.unchecked_transaction().map_err(to_storage_err)?;
            for r in records {
                queries::insert(
                    &tx,
                    &RequirementRow {
                        req_id: r.id.clone(),
                        text: r.text.clone(),
                        priority: labels.label(r.priority).to_string(),
                        progress: r.progress_percent.to_string(),
                        chapter: r.chapter.clone(),
                        ..Default::default()
                    },
                )?;
            }
            tx.commit().map_err(to_storage_err)?;
            Ok(records.len())
        })
    }

    /// Raw rows, including ones `read_all` would reject.
    pub fn rows(&self) -> Result<Vec<RequirementRow>, StorageError> {
        self.db.with_reader(queries::all)
    }
}

/// Accepts `40`, `40%`, `40 %` and `40,5`. Empty means no progress.
fn parse_progress(raw: &str) -> Option<f64> {
    let cleaned = raw.trim().trim_end_matches('%').trim().replace(',', ".");
    if cleaned.is_empty() {
        return Some(0.0);
    }
    cleaned
        .parse::<f64>()
        .ok()
        .filter(|p| p.is_finite() && (0.0..=100.0).contains(p))
}

fn validate_row(index: usize, row: RequirementRow) -> Result<RequirementRecord, InputValidationError> {
    let text = row.text.trim();
    if text.is_empty() {
        return Err(InputValidationError::MalformedRecord {
            row: index + 1,
            message: format!("requirement {:?} has no text", row.req_id),
        });
    }
    let progress_percent =
        parse_progress(&row.progress).ok_or_else(|| InputValidationError::InvalidProgress {
            id: row.req_id.clone(),
            raw: row.progress.clone(),
        })?;
    Ok(RequirementRecord {
        id: row.req_id.trim().to_string(),
        text: text.to_string(),
        priority: Priority::from_label(&row.priority).unwrap_or(Priority::Should),
        progress_percent,
        chapter: row.chapter.trim().to_string(),
    })
}

/// ` [source] [score:x]` appended to a comment.
fn annotation(candidate: &CandidateRecord) -> String {
    let mut note = format!("[{}]", candidate.source_kind.as_str());
    if let Some(score) = candidate.score {
        note.push_str(&format!(" [score:{score}]"));
    }
    note
}

fn flush(conn: &Connection, pending: &mut Vec<RequirementRow>) -> Result<usize, StorageError> {
    if pending.is_empty() {
        return Ok(0);
    }
    let tx = conn.unchecked_transaction().map_err(to_storage_err)?;
    let written = pending.len();
    for row in pending.drain(..) {
        queries::insert(&tx, &row)?;
    }
    tx.commit().map_err(to_storage_err)?;
    tracing::debug!(rows = written, "requirement batch committed");
    Ok(written)
}

impl RequirementStore for SqliteRequirementStore {
    fn read_all(&self) -> Result<PipelineResult<Vec<RequirementRecord>>, StorageError> {
        let rows = self.db.with_reader(queries::all)?;
        let mut result = PipelineResult::new(Vec::with_capacity(rows.len()));
        for (index, row) in rows.into_iter().enumerate() {
            match validate_row(index, row) {
                Ok(record) => result.data.push(record),
                Err(e) => {
                    tracing::warn!(error = %e, "skipping requirement row");
                    result.add_error(e);
                }
            }
        }
        Ok(result)
    }

    /// Exact text matches get their priority, stamp and comment updated;
    /// everything else is appended with an inferred chapter and the next
    /// identifier in that chapter.
    fn ingest(
        &self,
        candidates: &[CandidateRecord],
        options: &IngestOptions,
    ) -> Result<IngestSummary, StorageError> {
        let batch_size = options.batch_size.max(1);
        self.db.with_writer(|conn| {
            let rows = queries::all(conn)?;
            let mut ids =
                IdAllocator::seeded(&self.classifier, rows.iter().map(|r| r.req_id.as_str()));
            let mut by_text: FxHashMap<String, RequirementRow> = rows
                .into_iter()
                .filter(|r| !r.text.trim().is_empty())
                .map(|r| (r.text.trim().to_string(), r))
                .collect();

            let mut summary = IngestSummary::default();
            let mut pending: Vec<RequirementRow> = Vec::new();
            let mut pending_texts: FxHashSet<String> = FxHashSet::default();

            for candidate in candidates.iter().take(options.top_n) {
                let text = candidate.text.trim();
                if text.is_empty() || pending_texts.contains(text) {
                    summary.skipped += 1;
                    continue;
                }
                let priority = options.labels.label(candidate.auto_priority);
                let note = annotation(candidate);

                if let Some(existing) = by_text.get_mut(text) {
                    if existing.comment.is_empty() {
                        existing.comment = note;
                    } else {
                        existing.comment = format!("{} {note}", existing.comment);
                    }
                    queries::annotate(
                        conn,
                        existing.row_id,
                        priority,
                        &existing.comment,
                        &options.timestamp,
                    )?;
                    summary.updated += 1;
                    continue;
                }

                let chapter = self.classifier.infer(text);
                let req_id = ids.next(&chapter);
                pending.push(RequirementRow {
                    req_id,
                    text: text.to_string(),
                    priority: priority.to_string(),
                    progress: "0".to_string(),
                    chapter: if chapter == FALLBACK_CHAPTER {
                        String::new()
                    } else {
                        chapter
                    },
                    version: options.version.clone(),
                    comment: note,
                    last_modified: options.timestamp.clone(),
                    ..Default::default()
                });
                pending_texts.insert(text.to_string());
                if pending.len() >= batch_size {
                    summary.inserted += flush(conn, &mut pending)?;
                }
            }
            summary.inserted += flush(conn, &mut pending)?;

            summary.duplicate_ids = queries::duplicate_ids(conn)?;
            if !summary.duplicate_ids.is_empty() {
                tracing::warn!(ids = ?summary.duplicate_ids, "duplicate requirement ids after ingest");
            }
            tracing::info!(
                inserted = summary.inserted,
                updated = summary.updated,
                skipped = summary.skipped,
                "ingest finished"
            );
            Ok(summary)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_parsing() {
        assert_eq!(parse_progress("40"), Some(40.0));
        assert_eq!(parse_progress(" 40 % "), Some(40.0));
        assert_eq!(parse_progress("12,5"), Some(12.5));
        assert_eq!(parse_progress(""), Some(0.0));
        assert_eq!(parse_progress("abc"), None);
        assert_eq!(parse_progress("150"), None);
        assert_eq!(parse_progress("-1"), None);
    }

    #[test]
    fn annotation_includes_score_when_present() {
        use reqscan_core::types::{Evidence, SourceKind};
        let c = CandidateRecord::new(
            "t",
            SourceKind::ScheduledJob,
            Priority::Must,
            Evidence::Handler {
                handler: "h".into(),
                event: "CLOCK".into(),
            },
        );
        assert_eq!(annotation(&c), "[scheduledJob]");
        assert_eq!(annotation(&c.with_score(0.733)), "[scheduledJob] [score:0.733]");
    }
}
