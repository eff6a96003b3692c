//! An in-memory typed table engine.
//!
//! Tables live in a named registry and are loaded from (and saved to) a
//! comma-separated on-disk format whose header carries column types. A
//! library of commands transforms tables in place or derives new ones; a
//! typed expression language powers derived columns, row filters, and the
//! per-table rule files (INIT/FIXUP/CHECK) that run around row ingress.
//!
//! The transport layer and UI are external collaborators: they call
//! [`Engine::execute`] (or the untyped [`Engine::execute_raw`]) and read
//! back serialized tables.

mod engine;
mod error;
mod execution;
mod functions;
mod parsing;
mod registry;
mod rules;
mod storage;
mod types;

pub use engine::Engine;
pub use error::{Error, Result};
pub use execution::{Command, CommandOutput, SortOrder};
pub use parsing::{Expression, Literal, Operator, parse_expression};
pub use registry::Registry;
pub use rules::{Rule, RuleOp, RuleSet};
pub use types::{Clock, Column, DataType, FixedClock, Row, SystemClock, Table, Value};
