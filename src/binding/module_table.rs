//! Legacy module table backed by SQLite.
//!
//! Older hosts do not register a typed handle. Instead they describe the
//! engine by name: which program to run and with which arguments. The
//! resolver looks the name up at startup and builds a [`ProcessBinding`].

use anyhow::{Context, Result};
use rusqlite::Connection;
use std::sync::{Arc, Mutex};

use super::process::ProcessBinding;
use super::{Binding, TransportPath};
use crate::resolver::CapabilitySource;

pub struct ModuleTable {
    conn: Mutex<Connection>,
    module: String,
}

impl ModuleTable {
    /// Open or create the module table in the given database.
    /// Use `":memory:"` for tests.
    pub fn open(path: &str, module: impl Into<String>) -> Result<Self> {
        let conn = Connection::open(path).context("failed to open module database")?;
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS modules (
                name    TEXT PRIMARY KEY,
                program TEXT NOT NULL,
                args    TEXT NOT NULL
            )",
        )
        .context("failed to create modules table")?;
        Ok(Self {
            conn: Mutex::new(conn),
            module: module.into(),
        })
    }

    /// Look a module up by name.
    pub fn get(&self, name: &str) -> Result<Option<ProcessBinding>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare("SELECT program, args FROM modules WHERE name = ?1")?;
        let mut rows = stmt.query([name])?;
        match rows.next()? {
            Some(row) => {
                let program: String = row.get(0)?;
                let args: String = row.get(1)?;
                let args: Vec<String> = serde_json::from_str(&args)
                    .with_context(|| format!("corrupt args for module {name}"))?;
                Ok(Some(ProcessBinding::new(program, args)))
            }
            None => Ok(None),
        }
    }

    /// Describe a module (upsert).
    pub fn set(&self, name: &str, binding: &ProcessBinding) -> Result<()> {
        let program = binding
            .program()
            .to_str()
            .context("program path is not valid UTF-8")?;
        let args = serde_json::to_string(binding.args())?;
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO modules (name, program, args) VALUES (?1, ?2, ?3)
             ON CONFLICT(name) DO UPDATE SET program = excluded.program, args = excluded.args",
            [name, program, &args],
        )?;
        Ok(())
    }

    pub fn remove(&self, name: &str) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute("DELETE FROM modules WHERE name = ?1", [name])?;
        Ok(())
    }
}

impl CapabilitySource for ModuleTable {
    fn path(&self) -> TransportPath {
        TransportPath::ModuleTable
    }

    fn probe(&self) -> Option<Arc<dyn Binding>> {
        match self.get(&self.module) {
            Ok(Some(binding)) => Some(Arc::new(binding)),
            Ok(None) => None,
            Err(e) => {
                tracing::warn!(module = %self.module, "module table lookup failed: {e:#}");
                None
            }
        }
    }
}
