//! Per-table rules
//!
//! A table's rule file (`<table>.rul` / `.RUL`) holds one rule per
//! non-blank line: `OPERATION column expression`, where the operation is
//! INIT, FIXUP, or CHECK and the expression extends to the end of the line.
//! Rules apply in file order around row ingress (see [`ingress`]).
//!
//! Rule files are consulted on every ingress event through an LRU cache
//! keyed by path and invalidated when the file's mtime changes, so editing
//! a rule file takes effect immediately without restarting.

pub mod ingress;

use crate::error::{Error, Result};
use crate::parsing::{ast::Expression, parse_expression};
use crate::types::schema::is_identifier;
use lru::LruCache;
use parking_lot::Mutex;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

/// Capacity of the rule-file cache.
const CACHE_CAPACITY: usize = 64;

/// Which phase of row ingress a rule runs in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleOp {
    /// Sets a column of the fresh row before user fields apply (add only).
    Init,
    /// Normalizes a column after user fields apply.
    Fixup,
    /// Validates; a zero/empty/error result marks the column as failed.
    Check,
}

/// One rule: an operation, the column it concerns, and its expression.
#[derive(Debug, Clone)]
pub struct Rule {
    pub op: RuleOp,
    pub column: String,
    pub expr: Expression,
}

/// All rules of one table, in file order.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    pub rules: Vec<Rule>,
}

impl RuleSet {
    /// Parses rule file content. Blank lines are skipped; anything else
    /// must be a well-formed rule.
    pub fn parse(content: &str) -> Result<RuleSet> {
        let mut rules = Vec::new();
        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            rules.push(Self::parse_rule(line)?);
        }
        Ok(RuleSet { rules })
    }

    fn parse_rule(line: &str) -> Result<Rule> {
        let (op, rest) = line
            .split_once(char::is_whitespace)
            .ok_or_else(|| Error::InvalidValue(format!("malformed rule '{}'", line)))?;
        let op = match op {
            "INIT" => RuleOp::Init,
            "FIXUP" => RuleOp::Fixup,
            "CHECK" => RuleOp::Check,
            other => {
                return Err(Error::InvalidValue(format!(
                    "unknown rule operation '{}'",
                    other
                )));
            }
        };
        let (column, expr_src) = rest
            .trim_start()
            .split_once(char::is_whitespace)
            .ok_or_else(|| Error::InvalidValue(format!("rule '{}' has no expression", line)))?;
        if !is_identifier(column) {
            return Err(Error::InvalidValue(format!(
                "'{}' is not a valid column name",
                column
            )));
        }
        Ok(Rule {
            op,
            column: column.to_string(),
            expr: parse_expression(expr_src)?,
        })
    }

    /// The rules of one phase, in file order.
    pub fn of(&self, op: RuleOp) -> impl Iterator<Item = &Rule> {
        self.rules.iter().filter(move |r| r.op == op)
    }
}

/// Cache of parsed rule files, revalidated against mtime on every lookup.
pub struct RuleCache {
    cache: Mutex<LruCache<PathBuf, (SystemTime, Arc<RuleSet>)>>,
}

impl RuleCache {
    pub fn new() -> Self {
        RuleCache {
            cache: Mutex::new(LruCache::new(NonZeroUsize::new(CACHE_CAPACITY).unwrap())),
        }
    }

    /// Loads the rule set for a table. A table without a rule file has the
    /// empty rule set, which is not cached.
    pub fn load(&self, data_dir: &Path, table_name: &str) -> Result<Arc<RuleSet>> {
        let Some(path) = crate::storage::files::rule_file(data_dir, table_name) else {
            return Ok(Arc::new(RuleSet::default()));
        };
        let modified = std::fs::metadata(&path)?.modified()?;

        let mut cache = self.cache.lock();
        if let Some((cached_mtime, rules)) = cache.get(&path) {
            if *cached_mtime == modified {
                return Ok(rules.clone());
            }
        }

        let rules = Arc::new(RuleSet::parse(&std::fs::read_to_string(&path)?)?);
        tracing::debug!(table = table_name, rules = rules.rules.len(), "loaded rule file");
        cache.put(path, (modified, rules.clone()));
        Ok(rules)
    }
}

impl Default for RuleCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rule_file() {
        let rules = RuleSet::parse(
            "INIT Date TODAY()\n\nFIXUP Name UPPER(Name)\nCHECK Amount Amount > 0\n",
        )
        .unwrap();
        assert_eq!(rules.rules.len(), 3);
        assert_eq!(rules.rules[0].op, RuleOp::Init);
        assert_eq!(rules.rules[0].column, "Date");
        assert_eq!(rules.rules[2].op, RuleOp::Check);
        assert_eq!(rules.of(RuleOp::Fixup).count(), 1);
    }

    #[test]
    fn test_expression_extends_to_end_of_line() {
        let rules = RuleSet::parse("CHECK Amount Amount > 0 && Amount < 100\n").unwrap();
        assert_eq!(rules.rules.len(), 1);
    }

    #[test]
    fn test_parse_errors() {
        assert!(RuleSet::parse("FROB Date TODAY()").is_err());
        assert!(RuleSet::parse("INIT Date").is_err());
        assert!(RuleSet::parse("INIT 9bad TODAY()").is_err());
        assert!(RuleSet::parse("CHECK Amount >>>").is_err());
    }
}
