//! The table registry
//!
//! A process-wide, insertion-ordered mapping from table name to table. The
//! registry is the sole owner of every table; commands that create tables
//! insert freshly owned values and never alias rows or schemas between
//! entries.

use crate::error::{Error, Result};
use crate::types::Table;

#[derive(Debug, Default, Clone)]
pub struct Registry {
    tables: Vec<Table>,
}

impl Registry {
    pub fn new() -> Self {
        Registry { tables: Vec::new() }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tables.iter().any(|t| t.name == name)
    }

    pub fn get(&self, name: &str) -> Option<&Table> {
        self.tables.iter().find(|t| t.name == name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Table> {
        self.tables.iter_mut().find(|t| t.name == name)
    }

    /// Looks up a table, or errors with NotFound.
    pub fn require(&self, name: &str) -> Result<&Table> {
        self.get(name)
            .ok_or_else(|| Error::TableNotFound(name.into()))
    }

    pub fn require_mut(&mut self, name: &str) -> Result<&mut Table> {
        self.tables
            .iter_mut()
            .find(|t| t.name == name)
            .ok_or_else(|| Error::TableNotFound(name.into()))
    }

    /// Inserts a table under its own name, which must not be taken.
    pub fn insert(&mut self, table: Table) -> Result<()> {
        if self.contains(&table.name) {
            return Err(Error::DuplicateTable(table.name));
        }
        self.tables.push(table);
        Ok(())
    }

    /// Removes and returns a table.
    pub fn remove(&mut self, name: &str) -> Result<Table> {
        let idx = self
            .tables
            .iter()
            .position(|t| t.name == name)
            .ok_or_else(|| Error::TableNotFound(name.into()))?;
        Ok(self.tables.remove(idx))
    }

    /// Renames a table in place, keeping its registry position. The new name
    /// must be free; the table's source file follows the new name.
    pub fn rename(&mut self, old: &str, new: &str) -> Result<()> {
        if self.contains(new) {
            return Err(Error::DuplicateTable(new.into()));
        }
        let table = self.require_mut(old)?;
        table.name = new.to_string();
        table.source_file = Some(format!("{}.CSV", new));
        Ok(())
    }

    /// Table names in insertion order.
    pub fn list(&self) -> Vec<&str> {
        self.tables.iter().map(|t| t.name.as_str()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Table> {
        self.tables.iter()
    }

    /// Replaces file-backed tables with a freshly loaded set, preserving
    /// in-memory-only tables: those whose source file does not resolve on
    /// disk any more (or that never had one).
    pub fn reload(&mut self, loaded: Vec<Table>, file_exists: impl Fn(&str) -> bool) {
        self.tables.retain(|t| match &t.source_file {
            Some(file) => !file_exists(file),
            None => true,
        });
        for table in loaded {
            if let Some(idx) = self.tables.iter().position(|t| t.name == table.name) {
                self.tables[idx] = table;
            } else {
                self.tables.push(table);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Column, DataType};

    fn table(name: &str) -> Table {
        Table::new(name, vec![Column::new("a", DataType::Int)]).unwrap()
    }

    #[test]
    fn test_insert_and_list_order() {
        let mut registry = Registry::new();
        registry.insert(table("b")).unwrap();
        registry.insert(table("a")).unwrap();
        registry.insert(table("c")).unwrap();
        assert_eq!(registry.list(), vec!["b", "a", "c"]);

        assert_eq!(
            registry.insert(table("a")).unwrap_err(),
            Error::DuplicateTable("a".into())
        );
    }

    #[test]
    fn test_rename() {
        let mut registry = Registry::new();
        registry.insert(table("old")).unwrap();
        registry.insert(table("other")).unwrap();

        assert_eq!(
            registry.rename("old", "other").unwrap_err(),
            Error::DuplicateTable("other".into())
        );
        registry.rename("old", "new").unwrap();
        assert!(registry.get("old").is_none());
        let renamed = registry.get("new").unwrap();
        assert_eq!(renamed.source_file.as_deref(), Some("new.CSV"));
        // Position is preserved
        assert_eq!(registry.list(), vec!["new", "other"]);
    }

    #[test]
    fn test_reload_preserves_in_memory_tables() {
        let mut registry = Registry::new();
        let mut on_disk = table("sales");
        on_disk.source_file = Some("sales.CSV".into());
        registry.insert(on_disk).unwrap();
        registry.insert(table("scratch")).unwrap(); // no source file

        let mut fresh = table("sales");
        fresh.source_file = Some("sales.CSV".into());
        fresh.rows.push(vec![crate::types::Value::Int(1)]);
        registry.reload(vec![fresh], |f| f == "sales.CSV");

        assert_eq!(registry.get("sales").unwrap().rows.len(), 1);
        assert!(registry.get("scratch").is_some());
    }
}
