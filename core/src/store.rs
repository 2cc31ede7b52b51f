//! SQLite persistence layer.
//!
//! RULE: Only store.rs talks to the database.
//! The engine goes through the CityRepository trait; it never
//! executes SQL directly.

use rusqlite::{params, Connection, OptionalExtension};
use serde::Serialize;

use crate::{
    error::{SimError, SimResult},
    event::{CityEvent, TurnLog},
    snapshot::CitySnapshot,
    types::Turn,
};

/// The persistence collaborator the engine saves to and loads from.
pub trait CityRepository: Send {
    /// Store a snapshot under its city name, replacing any earlier save.
    /// Returns the new save revision id.
    fn save_city(&self, snapshot: &CitySnapshot) -> SimResult<String>;

    /// Load the snapshot saved under `name`.
    /// Fails with `SimError::CityNotFound` if there is none.
    fn load_city(&self, name: &str) -> SimResult<CitySnapshot>;

    /// Keep the history of one turn. Recording a turn again replaces it.
    fn record_turn(&self, city_name: &str, log: &TurnLog) -> SimResult<()>;
}

#[derive(Debug, Clone, Serialize)]
pub struct SaveSummary {
    pub name:        String,
    pub save_id:     String,
    pub turn:        Turn,
    pub money:       f64,
    pub parts:       u64,
    pub robot_count: usize,
    /// Unix seconds.
    pub saved_at:    i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct TurnLogRow {
    pub turn:        Turn,
    pub seq:         u32,
    pub event_type:  String,
    pub description: String,
    pub event:       CityEvent,
}

pub struct SimStore {
    conn: Connection,
}

impl SimStore {
    /// Open (or create) the database at `path`.
    pub fn open(path: &str) -> SimResult<Self> {
        let conn = Connection::open(path)?;
        // WAL mode only matters for real files; :memory: ignores it.
        let _ = conn.execute_batch("PRAGMA journal_mode=WAL;");
        Ok(Self { conn })
    }

    /// Open an in-memory database (used in tests).
    pub fn in_memory() -> SimResult<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self { conn })
    }

    /// Apply all schema migrations in order.
    pub fn migrate(&self) -> SimResult<()> {
        self.conn
            .execute_batch(include_str!("../../migrations/001_foundation.sql"))?;
        Ok(())
    }

    // ── Saves ──────────────────────────────────────────────────

    pub fn list_saves(&self) -> SimResult<Vec<SaveSummary>> {
        let mut stmt = self.conn.prepare(
            "SELECT name, save_id, turn, money, parts, robot_count, saved_at
             FROM city_save ORDER BY name ASC",
        )?;
        let rows = stmt
            .query_map([], |row| {
                Ok(SaveSummary {
                    name:        row.get(0)?,
                    save_id:     row.get(1)?,
                    turn:        row.get::<_, i64>(2)? as u64,
                    money:       row.get(3)?,
                    parts:       row.get::<_, i64>(4)? as u64,
                    robot_count: row.get::<_, i64>(5)? as usize,
                    saved_at:    row.get(6)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Delete a save and its turn history. False if there was no save.
    pub fn delete_save(&self, name: &str) -> SimResult<bool> {
        let removed = self
            .conn
            .execute("DELETE FROM city_save WHERE name = ?1", params![name])?;
        self.conn
            .execute("DELETE FROM turn_log WHERE city_name = ?1", params![name])?;
        Ok(removed > 0)
    }

    // ── Turn log ───────────────────────────────────────────────

    pub fn events_for_turn(&self, city_name: &str, turn: Turn) -> SimResult<Vec<TurnLogRow>> {
        let mut stmt = self.conn.prepare(
            "SELECT turn, seq, event_type, description, payload
             FROM turn_log WHERE city_name = ?1 AND turn = ?2
             ORDER BY seq ASC",
        )?;
        let raw = stmt
            .query_map(params![city_name, turn as i64], |row| {
                Ok((
                    row.get::<_, i64>(0)? as u64,
                    row.get::<_, i64>(1)? as u32,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, String>(4)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        raw.into_iter()
            .map(|(turn, seq, event_type, description, payload)| -> SimResult<TurnLogRow> {
                Ok(TurnLogRow {
                    turn,
                    seq,
                    event_type,
                    description,
                    event: serde_json::from_str(&payload)?,
                })
            })
            .collect()
    }
}

impl CityRepository for SimStore {
    fn save_city(&self, snapshot: &CitySnapshot) -> SimResult<String> {
        let save_id = uuid::Uuid::new_v4().to_string();
        let state_json = serde_json::to_string(snapshot)?;
        let city = &snapshot.city;
        self.conn.execute(
            "INSERT INTO city_save (name, save_id, seed, turn, money, parts, robot_count, saved_at, state_json)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
             ON CONFLICT(name) DO UPDATE SET
                save_id = excluded.save_id,
                seed = excluded.seed,
                turn = excluded.turn,
                money = excluded.money,
                parts = excluded.parts,
                robot_count = excluded.robot_count,
                saved_at = excluded.saved_at,
                state_json = excluded.state_json",
            params![
                city.name,
                save_id,
                snapshot.seed as i64,
                city.turn() as i64,
                city.money(),
                city.parts() as i64,
                city.robots().len() as i64,
                chrono::Utc::now().timestamp(),
                state_json,
            ],
        )?;
        Ok(save_id)
    }

    fn load_city(&self, name: &str) -> SimResult<CitySnapshot> {
        let state_json: Option<String> = self
            .conn
            .query_row(
                "SELECT state_json FROM city_save WHERE name = ?1",
                params![name],
                |row| row.get(0),
            )
            .optional()?;
        let state_json = state_json.ok_or_else(|| SimError::CityNotFound {
            name: name.to_string(),
        })?;
        Ok(serde_json::from_str(&state_json)?)
    }

    fn record_turn(&self, city_name: &str, log: &TurnLog) -> SimResult<()> {
        let tx = self.conn.unchecked_transaction()?;
        tx.execute(
            "DELETE FROM turn_log WHERE city_name = ?1 AND turn = ?2",
            params![city_name, log.turn as i64],
        )?;
        for (seq, event) in log.events().iter().enumerate() {
            tx.execute(
                "INSERT INTO turn_log (city_name, turn, seq, event_type, description, payload)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    city_name,
                    log.turn as i64,
                    seq as i64,
                    event.type_name(),
                    event.describe(),
                    serde_json::to_string(event)?,
                ],
            )?;
        }
        tx.commit()?;
        Ok(())
    }
}
