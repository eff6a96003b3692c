//! The engine facade
//!
//! Owns the data directory, the table registry, the rule-file cache, and
//! the injected clock. Every entry point takes the registry mutex for its
//! whole duration, so commands are atomic, run-to-completion units: no
//! command ever observes another's partial result.

use crate::error::Result;
use crate::execution::{self, Command, CommandOutput};
use crate::registry::Registry;
use crate::rules::{RuleCache, ingress};
use crate::storage::files;
use crate::types::{Clock, SystemClock, Table};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::PathBuf;

pub struct Engine {
    data_dir: PathBuf,
    registry: Mutex<Registry>,
    rules: RuleCache,
    clock: Box<dyn Clock>,
}

impl Engine {
    /// Opens the engine over a data directory, loading every `*.csv` table
    /// in it.
    pub fn open(data_dir: impl Into<PathBuf>) -> Result<Engine> {
        Self::with_clock(data_dir, Box::new(SystemClock))
    }

    /// Opens the engine with an injected clock, for deterministic
    /// evaluation of date/time functions.
    pub fn with_clock(data_dir: impl Into<PathBuf>, clock: Box<dyn Clock>) -> Result<Engine> {
        let data_dir = data_dir.into();
        let mut registry = Registry::new();
        for table in files::load_dir(&data_dir)? {
            registry.insert(table)?;
        }
        tracing::info!(
            tables = registry.list().len(),
            "opened data directory {}",
            data_dir.display()
        );
        Ok(Engine {
            data_dir,
            registry: Mutex::new(registry),
            rules: RuleCache::new(),
            clock,
        })
    }

    /// Refreshes file-backed tables from disk, preserving in-memory-only
    /// tables (those whose source file no longer resolves).
    pub fn reload(&self) -> Result<()> {
        let loaded = files::load_dir(&self.data_dir)?;
        let mut registry = self.registry.lock();
        registry.reload(loaded, |file| self.data_dir.join(file).is_file());
        Ok(())
    }

    /// Executes one command against the registry.
    pub fn execute(&self, command: Command) -> Result<CommandOutput> {
        let mut registry = self.registry.lock();
        execution::execute(command, &mut registry, &self.data_dir, self.clock.as_ref())
    }

    /// The untyped command surface: a command name plus a JSON parameter
    /// object, as the transport layer receives them.
    pub fn execute_raw(&self, name: &str, params: serde_json::Value) -> Result<CommandOutput> {
        self.execute(Command::from_parts(name, params)?)
    }

    /// Adds a row built from user fields, running the table's INIT, FIXUP,
    /// and CHECK rules around it. Returns the updated table.
    pub fn add_row(&self, table_name: &str, fields: &HashMap<String, String>) -> Result<Table> {
        let table_name = files::strip_csv_suffix(table_name);
        let rules = self.rules.load(&self.data_dir, table_name)?;
        let mut registry = self.registry.lock();
        ingress::add_row(&mut registry, table_name, fields, &rules, self.clock.as_ref())
    }

    /// Updates a row in place, running FIXUP and CHECK rules (INIT fires on
    /// the add path only).
    pub fn update_row(
        &self,
        table_name: &str,
        row: usize,
        fields: &HashMap<String, String>,
    ) -> Result<Table> {
        let table_name = files::strip_csv_suffix(table_name);
        let rules = self.rules.load(&self.data_dir, table_name)?;
        let mut registry = self.registry.lock();
        ingress::update_row(
            &mut registry,
            table_name,
            row,
            fields,
            &rules,
            self.clock.as_ref(),
        )
    }

    /// A snapshot of one table.
    pub fn table(&self, name: &str) -> Result<Table> {
        let registry = self.registry.lock();
        registry
            .require(files::strip_csv_suffix(name))
            .map(Clone::clone)
    }

    /// The loaded table names, in registry order.
    pub fn tables(&self) -> Vec<String> {
        let registry = self.registry.lock();
        registry.list().into_iter().map(String::from).collect()
    }

    /// The read-only tag list from `commands.tag`.
    pub fn tags(&self) -> Result<Vec<String>> {
        files::read_tags(&self.data_dir)
    }
}
