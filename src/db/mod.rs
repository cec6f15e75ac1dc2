//! SQLite-based record store for prospect state.
//!
//! The database lives at `~/.pipeline-copilot/pipeline.db`. A prospect row
//! carries its embedded collections (contacts, conversations, next actions)
//! as JSON columns; every collection update reads the entity, produces the
//! new list, and writes the row back whole. Single caller, single connection —
//! `ProspectDb` is intentionally not `Clone` or `Sync`; wrap it in a mutex if
//! a host application needs sharing.

mod search;
mod stats;

use std::path::PathBuf;

use chrono::Utc;
use rusqlite::{params, Connection};

use crate::error::StoreError;
use crate::types::{
    Conversation, NextAction, Prospect, ProspectStatus, ProspectUpdate, Segment,
};

struct Migration {
    version: i32,
    sql: &'static str,
}

/// Numbered SQL migrations embedded at compile time. Each runs exactly once,
/// tracked by the `schema_version` table.
const MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    sql: include_str!("../migrations/001_baseline.sql"),
}];

const SELECT_COLS: &str = "id, company, website, segment, status, pain_points,
       decision_maker_accessibility, budget_authority, strategic_fit, overall_score,
       contacts, conversations, next_actions, deal_value, notes, dossier_url,
       created_at, updated_at";

/// Raw column values for one prospect row; JSON columns are decoded in a
/// second step so serde errors surface as `StoreError`, not SQLite errors.
pub(crate) struct ProspectRow {
    id: String,
    company: String,
    website: String,
    segment: String,
    status: String,
    pain_points: String,
    decision_maker_accessibility: f64,
    budget_authority: f64,
    strategic_fit: f64,
    overall_score: f64,
    contacts: String,
    conversations: String,
    next_actions: String,
    deal_value: Option<f64>,
    notes: Option<String>,
    dossier_url: Option<String>,
    created_at: String,
    updated_at: String,
}

pub struct ProspectDb {
    pub(crate) conn: Connection,
}

impl ProspectDb {
    /// Open (or create) the database at `~/.pipeline-copilot/pipeline.db`
    /// and apply pending migrations.
    pub fn open() -> Result<Self, StoreError> {
        let path = Self::db_path()?;
        Self::open_at(path)
    }

    /// Open a database at an explicit path. Useful for testing.
    pub fn open_at(path: PathBuf) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent() {
            if !parent.exists() {
                std::fs::create_dir_all(parent).map_err(StoreError::CreateDir)?;
            }
        }

        let conn = Connection::open(&path)?;

        // WAL for better concurrent read behavior while a host app holds writes
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;

        run_migrations(&conn)?;
        log::debug!("Prospect database ready at {}", path.display());

        Ok(Self { conn })
    }

    /// Resolve the default database path: `~/.pipeline-copilot/pipeline.db`.
    fn db_path() -> Result<PathBuf, StoreError> {
        let home = dirs::home_dir().ok_or(StoreError::HomeDirNotFound)?;
        Ok(home.join(".pipeline-copilot").join("pipeline.db"))
    }

    /// Execute a closure within a SQLite transaction.
    /// Commits on Ok, rolls back on Err.
    pub fn with_transaction<F, T>(&self, f: F) -> Result<T, StoreError>
    where
        F: FnOnce(&Self) -> Result<T, StoreError>,
    {
        self.conn.execute_batch("BEGIN IMMEDIATE")?;
        match f(self) {
            Ok(val) => {
                self.conn.execute_batch("COMMIT")?;
                Ok(val)
            }
            Err(e) => {
                let _ = self.conn.execute_batch("ROLLBACK");
                Err(e)
            }
        }
    }

    // =========================================================================
    // Prospect CRUD
    // =========================================================================

    /// All prospects in insertion order.
    pub fn get_all(&self) -> Result<Vec<Prospect>, StoreError> {
        let sql = format!("SELECT {SELECT_COLS} FROM prospects ORDER BY rowid");
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map([], Self::map_prospect_row)?;

        let mut prospects = Vec::new();
        for row in rows {
            prospects.push(decode_row(row?)?);
        }
        Ok(prospects)
    }

    /// Get a prospect by id.
    pub fn get_by_id(&self, id: &str) -> Result<Option<Prospect>, StoreError> {
        let sql = format!("SELECT {SELECT_COLS} FROM prospects WHERE id = ?1");
        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query_map(params![id], Self::map_prospect_row)?;
        match rows.next() {
            Some(row) => Ok(Some(decode_row(row?)?)),
            None => Ok(None),
        }
    }

    /// Prospects at a given pipeline stage, in insertion order.
    pub fn get_by_status(&self, status: ProspectStatus) -> Result<Vec<Prospect>, StoreError> {
        let sql = format!("SELECT {SELECT_COLS} FROM prospects WHERE status = ?1 ORDER BY rowid");
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params![status.as_str()], Self::map_prospect_row)?;

        let mut prospects = Vec::new();
        for row in rows {
            prospects.push(decode_row(row?)?);
        }
        Ok(prospects)
    }

    /// Prospects in a given industry segment, in insertion order.
    pub fn get_by_segment(&self, segment: Segment) -> Result<Vec<Prospect>, StoreError> {
        let sql = format!("SELECT {SELECT_COLS} FROM prospects WHERE segment = ?1 ORDER BY rowid");
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params![segment.as_str()], Self::map_prospect_row)?;

        let mut prospects = Vec::new();
        for row in rows {
            prospects.push(decode_row(row?)?);
        }
        Ok(prospects)
    }

    /// Insert a new prospect, keeping its provided timestamps.
    pub fn insert(&self, prospect: &Prospect) -> Result<(), StoreError> {
        validate_prospect(prospect)?;
        self.write_full(prospect)
    }

    /// Insert or replace a prospect, refreshing `updated_at`.
    pub fn upsert(&self, prospect: &Prospect) -> Result<(), StoreError> {
        validate_prospect(prospect)?;
        let mut p = prospect.clone();
        p.updated_at = Utc::now().to_rfc3339();
        self.write_full(&p)
    }

    /// Merge scalar fields into an existing prospect and refresh `updated_at`.
    /// A missing id is an error, never a silent no-op.
    pub fn update(&self, id: &str, update: ProspectUpdate) -> Result<Prospect, StoreError> {
        let mut prospect = self
            .get_by_id(id)?
            .ok_or_else(|| StoreError::ProspectNotFound(id.to_string()))?;

        if let Some(company) = update.company {
            if company.trim().is_empty() {
                return Err(StoreError::Validation("company name is required".into()));
            }
            prospect.company = company;
        }
        if let Some(website) = update.website {
            prospect.website = website;
        }
        if let Some(segment) = update.segment {
            prospect.segment = segment;
        }
        if let Some(status) = update.status {
            prospect.status = status;
        }
        if let Some(pain_points) = update.pain_points {
            prospect.pain_points = pain_points;
        }
        if let Some(v) = update.decision_maker_accessibility {
            prospect.decision_maker_accessibility = v.clamp(0.0, 10.0);
        }
        if let Some(v) = update.budget_authority {
            prospect.budget_authority = v.clamp(0.0, 10.0);
        }
        if let Some(v) = update.strategic_fit {
            prospect.strategic_fit = v.clamp(0.0, 10.0);
        }
        if let Some(v) = update.overall_score {
            prospect.overall_score = v.clamp(0.0, 10.0);
        }
        if let Some(v) = update.deal_value {
            prospect.deal_value = Some(v);
        }
        if let Some(notes) = update.notes {
            prospect.notes = Some(notes);
        }
        if let Some(url) = update.dossier_url {
            prospect.dossier_url = Some(url);
        }

        prospect.updated_at = Utc::now().to_rfc3339();
        self.write_full(&prospect)?;
        Ok(prospect)
    }

    /// Delete a prospect. Sub-entity deletion is not defined; removal is
    /// whole-prospect only.
    pub fn remove(&self, id: &str) -> Result<(), StoreError> {
        let affected = self
            .conn
            .execute("DELETE FROM prospects WHERE id = ?1", params![id])?;
        if affected == 0 {
            return Err(StoreError::ProspectNotFound(id.to_string()));
        }
        Ok(())
    }

    /// Delete every prospect. Used by dev reset and import-replace flows.
    pub fn clear(&self) -> Result<(), StoreError> {
        self.conn.execute("DELETE FROM prospects", [])?;
        log::info!("Prospect database cleared");
        Ok(())
    }

    /// Number of stored prospects.
    pub fn count(&self) -> Result<usize, StoreError> {
        let n: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM prospects", [], |row| row.get(0))?;
        Ok(n as usize)
    }

    // =========================================================================
    // Embedded collections (replace-on-write)
    // =========================================================================

    /// Append a conversation to a prospect's chronological log.
    ///
    /// The conversation's `contact_id` must reference a contact on the same
    /// prospect; the list is never reordered after append.
    pub fn append_conversation(
        &self,
        prospect_id: &str,
        conversation: Conversation,
    ) -> Result<(), StoreError> {
        if conversation.message.trim().is_empty() {
            return Err(StoreError::Validation(
                "conversation message is required".into(),
            ));
        }

        let mut prospect = self
            .get_by_id(prospect_id)?
            .ok_or_else(|| StoreError::ProspectNotFound(prospect_id.to_string()))?;

        if !prospect
            .contacts
            .iter()
            .any(|c| c.id == conversation.contact_id)
        {
            return Err(StoreError::Validation(format!(
                "contact {} is not on prospect {}",
                conversation.contact_id, prospect_id
            )));
        }

        prospect.conversations.push(conversation);
        prospect.updated_at = Utc::now().to_rfc3339();
        self.write_full(&prospect)
    }

    /// Append a next action to a prospect.
    pub fn append_next_action(
        &self,
        prospect_id: &str,
        action: NextAction,
    ) -> Result<(), StoreError> {
        let mut prospect = self
            .get_by_id(prospect_id)?
            .ok_or_else(|| StoreError::ProspectNotFound(prospect_id.to_string()))?;

        prospect.next_actions.push(action);
        prospect.updated_at = Utc::now().to_rfc3339();
        self.write_full(&prospect)
    }

    /// Mark a next action completed. One-way: an already-completed action
    /// stays completed and the call succeeds without changes.
    pub fn mark_action_complete(
        &self,
        prospect_id: &str,
        action_id: &str,
    ) -> Result<(), StoreError> {
        let mut prospect = self
            .get_by_id(prospect_id)?
            .ok_or_else(|| StoreError::ProspectNotFound(prospect_id.to_string()))?;

        let action = prospect
            .next_actions
            .iter_mut()
            .find(|a| a.id == action_id)
            .ok_or_else(|| StoreError::ActionNotFound {
                prospect_id: prospect_id.to_string(),
                action_id: action_id.to_string(),
            })?;

        if action.completed {
            return Ok(());
        }
        action.completed = true;

        prospect.updated_at = Utc::now().to_rfc3339();
        self.write_full(&prospect)
    }

    // =========================================================================
    // Export / import
    // =========================================================================

    /// Dump the whole store as pretty-printed JSON.
    pub fn export_json(&self) -> Result<String, StoreError> {
        let prospects = self.get_all()?;
        let json = serde_json::to_string_pretty(&prospects)?;
        log::info!("Exported {} prospects", prospects.len());
        Ok(json)
    }

    /// Load prospects from a JSON dump. Malformed input is a single error
    /// and nothing is applied; valid input upserts every record atomically.
    pub fn import_json(&self, json: &str) -> Result<usize, StoreError> {
        let prospects: Vec<Prospect> = serde_json::from_str(json)
            .map_err(|e| StoreError::Import(format!("invalid JSON: {e}")))?;

        for p in &prospects {
            if p.id.trim().is_empty() || p.company.trim().is_empty() {
                return Err(StoreError::Import(format!(
                    "prospect with empty id or company name (id: {:?})",
                    p.id
                )));
            }
        }

        self.with_transaction(|db| {
            for p in &prospects {
                db.write_full(p)?;
            }
            Ok(())
        })?;

        log::info!("Imported {} prospects", prospects.len());
        Ok(prospects.len())
    }

    // =========================================================================
    // Row plumbing
    // =========================================================================

    /// Write a full prospect row, inserting or replacing by id.
    pub(crate) fn write_full(&self, p: &Prospect) -> Result<(), StoreError> {
        let pain_points = serde_json::to_string(&p.pain_points)?;
        let contacts = serde_json::to_string(&p.contacts)?;
        let conversations = serde_json::to_string(&p.conversations)?;
        let next_actions = serde_json::to_string(&p.next_actions)?;

        self.conn.execute(
            "INSERT INTO prospects (
                id, company, website, segment, status, pain_points,
                decision_maker_accessibility, budget_authority, strategic_fit, overall_score,
                contacts, conversations, next_actions, deal_value, notes, dossier_url,
                created_at, updated_at
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18)
             ON CONFLICT(id) DO UPDATE SET
                company = excluded.company,
                website = excluded.website,
                segment = excluded.segment,
                status = excluded.status,
                pain_points = excluded.pain_points,
                decision_maker_accessibility = excluded.decision_maker_accessibility,
                budget_authority = excluded.budget_authority,
                strategic_fit = excluded.strategic_fit,
                overall_score = excluded.overall_score,
                contacts = excluded.contacts,
                conversations = excluded.conversations,
                next_actions = excluded.next_actions,
                deal_value = excluded.deal_value,
                notes = excluded.notes,
                dossier_url = excluded.dossier_url,
                updated_at = excluded.updated_at",
            params![
                p.id,
                p.company,
                p.website,
                p.segment.as_str(),
                p.status.as_str(),
                pain_points,
                p.decision_maker_accessibility,
                p.budget_authority,
                p.strategic_fit,
                p.overall_score,
                contacts,
                conversations,
                next_actions,
                p.deal_value,
                p.notes,
                p.dossier_url,
                p.created_at,
                p.updated_at,
            ],
        )?;
        Ok(())
    }

    /// Helper: map a row to raw column values.
    pub(crate) fn map_prospect_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<ProspectRow> {
        Ok(ProspectRow {
            id: row.get(0)?,
            company: row.get(1)?,
            website: row.get(2)?,
            segment: row.get(3)?,
            status: row.get(4)?,
            pain_points: row.get(5)?,
            decision_maker_accessibility: row.get(6)?,
            budget_authority: row.get(7)?,
            strategic_fit: row.get(8)?,
            overall_score: row.get(9)?,
            contacts: row.get(10)?,
            conversations: row.get(11)?,
            next_actions: row.get(12)?,
            deal_value: row.get(13)?,
            notes: row.get(14)?,
            dossier_url: row.get(15)?,
            created_at: row.get(16)?,
            updated_at: row.get(17)?,
        })
    }
}

/// Decode raw column values into a domain `Prospect`.
pub(crate) fn decode_row(row: ProspectRow) -> Result<Prospect, StoreError> {
    Ok(Prospect {
        id: row.id,
        company: row.company,
        website: row.website,
        segment: Segment::from_str_lossy(&row.segment),
        status: ProspectStatus::from_str_lossy(&row.status),
        pain_points: serde_json::from_str(&row.pain_points)?,
        decision_maker_accessibility: row.decision_maker_accessibility,
        budget_authority: row.budget_authority,
        strategic_fit: row.strategic_fit,
        overall_score: row.overall_score,
        contacts: serde_json::from_str(&row.contacts)?,
        conversations: serde_json::from_str(&row.conversations)?,
        next_actions: serde_json::from_str(&row.next_actions)?,
        deal_value: row.deal_value,
        notes: row.notes,
        dossier_url: row.dossier_url,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

fn validate_prospect(p: &Prospect) -> Result<(), StoreError> {
    if p.id.trim().is_empty() {
        return Err(StoreError::Validation("prospect id is required".into()));
    }
    if p.company.trim().is_empty() {
        return Err(StoreError::Validation("company name is required".into()));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Schema migrations
// ---------------------------------------------------------------------------

fn ensure_schema_version_table(conn: &Connection) -> Result<(), StoreError> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        );",
    )
    .map_err(|e| StoreError::Migration(format!("Failed to create schema_version table: {e}")))
}

fn current_version(conn: &Connection) -> Result<i32, StoreError> {
    conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |row| row.get(0),
    )
    .map_err(|e| StoreError::Migration(format!("Failed to read schema version: {e}")))
}

/// Apply any pending migrations, each inside its own transaction.
fn run_migrations(conn: &Connection) -> Result<(), StoreError> {
    ensure_schema_version_table(conn)?;
    let applied = current_version(conn)?;

    for migration in MIGRATIONS.iter().filter(|m| m.version > applied) {
        conn.execute_batch("BEGIN")
            .map_err(|e| StoreError::Migration(e.to_string()))?;
        let result = conn
            .execute_batch(migration.sql)
            .and_then(|_| {
                conn.execute(
                    "INSERT INTO schema_version (version) VALUES (?1)",
                    [migration.version],
                )
                .map(|_| ())
            });
        match result {
            Ok(()) => {
                conn.execute_batch("COMMIT")
                    .map_err(|e| StoreError::Migration(e.to_string()))?;
                log::info!("Applied schema migration v{}", migration.version);
            }
            Err(e) => {
                let _ = conn.execute_batch("ROLLBACK");
                return Err(StoreError::Migration(format!(
                    "migration v{} failed: {e}",
                    migration.version
                )));
            }
        }
    }
    Ok(())
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::types::{ActionType, Channel, Contact, Sentiment};

    /// Create a temporary database for testing.
    ///
    /// We leak the `TempDir` so the directory persists for the duration of the
    /// test. Test temp dirs are cleaned up by the OS.
    pub(crate) fn test_db() -> ProspectDb {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("test_pipeline.db");
        // Leak the TempDir so it is not deleted while the DB connection is open.
        std::mem::forget(dir);
        ProspectDb::open_at(path).expect("Failed to open test database")
    }

    pub(crate) fn sample_prospect(id: &str, company: &str) -> Prospect {
        let now = Utc::now().to_rfc3339();
        Prospect {
            id: id.to_string(),
            company: company.to_string(),
            website: format!("https://{}.example.com", id),
            segment: Segment::Energy,
            status: ProspectStatus::NotContacted,
            pain_points: vec!["Manual reporting eats two days a week".to_string()],
            decision_maker_accessibility: 6.0,
            budget_authority: 7.0,
            strategic_fit: 8.0,
            overall_score: 7.0,
            contacts: vec![Contact {
                id: format!("{id}-c1"),
                name: "Alex Morgan".to_string(),
                role: "VP of Operations".to_string(),
                email: format!("alex@{id}.example.com"),
                linkedin_url: "linkedin.com/in/alex-morgan".to_string(),
                engagement_score: 5.0,
                messaging_notes: String::new(),
                last_contacted: None,
            }],
            conversations: Vec::new(),
            next_actions: Vec::new(),
            deal_value: None,
            notes: None,
            dossier_url: None,
            created_at: now.clone(),
            updated_at: now,
        }
    }

    pub(crate) fn sample_conversation(prospect_id: &str, replied: bool) -> Conversation {
        Conversation {
            id: crate::util::generate_id(),
            contact_id: format!("{prospect_id}-c1"),
            date: Utc::now().to_rfc3339(),
            channel: Channel::Email,
            message: "Quick intro on how we cut reporting time in half.".to_string(),
            replied,
            reply_message: replied.then(|| "Sounds interesting, tell me more.".to_string()),
            sentiment: replied.then_some(Sentiment::Positive),
            insight: None,
        }
    }

    fn sample_action(id: &str) -> NextAction {
        NextAction {
            id: id.to_string(),
            action_type: ActionType::FollowUp,
            due_date: Utc::now().to_rfc3339(),
            completed: false,
            notes: "Check back in".to_string(),
            engine_suggested: false,
        }
    }

    #[test]
    fn test_open_creates_schema() {
        let db = test_db();
        assert_eq!(db.count().expect("count"), 0);
    }

    #[test]
    fn test_idempotent_schema_application() {
        // Opening the same DB twice must not re-run the baseline migration
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("idempotent.db");

        let _db1 = ProspectDb::open_at(path.clone()).expect("first open");
        let _db2 = ProspectDb::open_at(path).expect("second open should not fail");
    }

    #[test]
    fn test_insert_and_get_by_id() {
        let db = test_db();
        let p = sample_prospect("orsted", "Orsted Wind");
        db.insert(&p).expect("insert");

        let fetched = db.get_by_id("orsted").expect("get").expect("present");
        assert_eq!(fetched.company, "Orsted Wind");
        assert_eq!(fetched.segment, Segment::Energy);
        assert_eq!(fetched.contacts.len(), 1);
    }

    #[test]
    fn test_insert_empty_company_rejected() {
        let db = test_db();
        let p = sample_prospect("blank", "   ");
        let err = db.insert(&p).expect_err("validation should fail");
        assert!(matches!(err, StoreError::Validation(_)));
    }

    #[test]
    fn test_get_all_preserves_insertion_order() {
        let db = test_db();
        for (id, name) in [("a", "Alpha"), ("b", "Beta"), ("c", "Gamma")] {
            db.insert(&sample_prospect(id, name)).expect("insert");
        }
        let all = db.get_all().expect("get_all");
        let ids: Vec<&str> = all.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_upsert_replaces_and_refreshes_timestamp() {
        let db = test_db();
        let mut p = sample_prospect("acme", "Acme");
        db.insert(&p).expect("insert");

        p.company = "Acme Industrial".to_string();
        db.upsert(&p).expect("upsert");

        let fetched = db.get_by_id("acme").expect("get").expect("present");
        assert_eq!(fetched.company, "Acme Industrial");
        assert!(fetched.updated_at >= p.created_at);
        assert_eq!(db.count().expect("count"), 1);
    }

    #[test]
    fn test_update_merges_and_refreshes_timestamp() {
        let db = test_db();
        let p = sample_prospect("veolia", "Veolia Water");
        db.insert(&p).expect("insert");

        let updated = db
            .update(
                "veolia",
                ProspectUpdate {
                    status: Some(ProspectStatus::Replied),
                    deal_value: Some(320_000.0),
                    ..Default::default()
                },
            )
            .expect("update");

        assert_eq!(updated.status, ProspectStatus::Replied);
        assert_eq!(updated.deal_value, Some(320_000.0));
        // Untouched fields survive the merge
        assert_eq!(updated.company, "Veolia Water");
        assert!(updated.updated_at >= p.updated_at);
    }

    #[test]
    fn test_update_clamps_scores() {
        let db = test_db();
        db.insert(&sample_prospect("x", "X Corp")).expect("insert");
        let updated = db
            .update(
                "x",
                ProspectUpdate {
                    overall_score: Some(14.0),
                    strategic_fit: Some(-3.0),
                    ..Default::default()
                },
            )
            .expect("update");
        assert_eq!(updated.overall_score, 10.0);
        assert_eq!(updated.strategic_fit, 0.0);
    }

    #[test]
    fn test_update_missing_prospect_is_error() {
        let db = test_db();
        let err = db
            .update("ghost", ProspectUpdate::default())
            .expect_err("should be not found");
        assert!(matches!(err, StoreError::ProspectNotFound(_)));
    }

    #[test]
    fn test_append_conversation_round_trip() {
        let db = test_db();
        db.insert(&sample_prospect("jll", "JLL Tech")).expect("insert");

        let conv = sample_conversation("jll", true);
        let conv_id = conv.id.clone();
        db.append_conversation("jll", conv).expect("append");

        let fetched = db.get_by_id("jll").expect("get").expect("present");
        assert_eq!(fetched.conversations.len(), 1);
        let last = fetched.last_conversation().expect("conversation");
        assert_eq!(last.id, conv_id);
        assert_eq!(last.sentiment, Some(Sentiment::Positive));
        assert_eq!(
            last.reply_message.as_deref(),
            Some("Sounds interesting, tell me more.")
        );

        // Also visible at the end of the list via get_all
        let all = db.get_all().expect("get_all");
        assert_eq!(all[0].conversations.last().expect("last").id, conv_id);
    }

    #[test]
    fn test_append_conversation_keeps_order() {
        let db = test_db();
        db.insert(&sample_prospect("p", "P Inc")).expect("insert");
        for _ in 0..3 {
            db.append_conversation("p", sample_conversation("p", false))
                .expect("append");
        }
        let first_ids: Vec<String> = db
            .get_by_id("p")
            .expect("get")
            .expect("present")
            .conversations
            .iter()
            .map(|c| c.id.clone())
            .collect();

        db.append_conversation("p", sample_conversation("p", true))
            .expect("append");
        let after: Vec<String> = db
            .get_by_id("p")
            .expect("get")
            .expect("present")
            .conversations
            .iter()
            .map(|c| c.id.clone())
            .collect();

        assert_eq!(&after[..3], &first_ids[..]);
    }

    #[test]
    fn test_append_conversation_empty_message_rejected() {
        let db = test_db();
        db.insert(&sample_prospect("p", "P Inc")).expect("insert");
        let mut conv = sample_conversation("p", false);
        conv.message = "   ".to_string();
        let err = db.append_conversation("p", conv).expect_err("validation");
        assert!(matches!(err, StoreError::Validation(_)));
        // No partial state change
        let p = db.get_by_id("p").expect("get").expect("present");
        assert!(p.conversations.is_empty());
    }

    #[test]
    fn test_append_conversation_unknown_contact_rejected() {
        let db = test_db();
        db.insert(&sample_prospect("p", "P Inc")).expect("insert");
        let mut conv = sample_conversation("p", false);
        conv.contact_id = "someone-else".to_string();
        let err = db.append_conversation("p", conv).expect_err("validation");
        assert!(matches!(err, StoreError::Validation(_)));
    }

    #[test]
    fn test_mark_action_complete_one_way() {
        let db = test_db();
        db.insert(&sample_prospect("p", "P Inc")).expect("insert");
        db.append_next_action("p", sample_action("act-1"))
            .expect("append");

        db.mark_action_complete("p", "act-1").expect("complete");
        let p = db.get_by_id("p").expect("get").expect("present");
        assert!(p.next_actions[0].completed);

        // Completing again is a no-op success
        db.mark_action_complete("p", "act-1").expect("re-complete");
    }

    #[test]
    fn test_mark_action_complete_missing_action() {
        let db = test_db();
        db.insert(&sample_prospect("p", "P Inc")).expect("insert");
        let err = db
            .mark_action_complete("p", "ghost-action")
            .expect_err("should be not found");
        assert!(matches!(err, StoreError::ActionNotFound { .. }));
    }

    #[test]
    fn test_remove_and_remove_missing() {
        let db = test_db();
        db.insert(&sample_prospect("p", "P Inc")).expect("insert");
        db.remove("p").expect("remove");
        assert!(db.get_by_id("p").expect("get").is_none());

        let err = db.remove("p").expect_err("already gone");
        assert!(matches!(err, StoreError::ProspectNotFound(_)));
    }

    #[test]
    fn test_get_by_status_and_segment() {
        let db = test_db();
        let mut a = sample_prospect("a", "Alpha");
        a.status = ProspectStatus::Negotiating;
        a.segment = Segment::Water;
        db.insert(&a).expect("insert");
        db.insert(&sample_prospect("b", "Beta")).expect("insert");

        let negotiating = db
            .get_by_status(ProspectStatus::Negotiating)
            .expect("by status");
        assert_eq!(negotiating.len(), 1);
        assert_eq!(negotiating[0].id, "a");

        let water = db.get_by_segment(Segment::Water).expect("by segment");
        assert_eq!(water.len(), 1);
        assert_eq!(water[0].id, "a");
    }

    #[test]
    fn test_export_import_round_trip() {
        let db = test_db();
        let mut p = sample_prospect("exp", "Export Co");
        p.deal_value = Some(450_000.0);
        db.insert(&p).expect("insert");
        db.append_conversation("exp", sample_conversation("exp", true))
            .expect("append");

        let json = db.export_json().expect("export");

        let other = test_db();
        let imported = other.import_json(&json).expect("import");
        assert_eq!(imported, 1);
        let fetched = other.get_by_id("exp").expect("get").expect("present");
        assert_eq!(fetched.deal_value, Some(450_000.0));
        assert_eq!(fetched.conversations.len(), 1);
    }

    #[test]
    fn test_import_malformed_is_atomic() {
        let db = test_db();
        db.insert(&sample_prospect("keep", "Keeper")).expect("insert");

        let err = db.import_json("{not json").expect_err("bad json");
        assert!(matches!(err, StoreError::Import(_)));

        // Nothing was touched
        assert_eq!(db.count().expect("count"), 1);
    }

    #[test]
    fn test_import_rejects_empty_company() {
        let db = test_db();
        let mut p = sample_prospect("bad", "Bad Co");
        p.company = String::new();
        let json = serde_json::to_string(&vec![p]).expect("encode");

        let err = db.import_json(&json).expect_err("invalid record");
        assert!(matches!(err, StoreError::Import(_)));
        assert_eq!(db.count().expect("count"), 0);
    }
}
