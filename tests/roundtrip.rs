//! Round-trip laws and command invariants.

mod common;

use common::{SALES_CSV, setup};
use serde_json::json;
use tabula::{Table, Value};

/// Rows as a sorted multiset, for order-insensitive comparison.
fn multiset(table: &Table) -> Vec<String> {
    let mut rows: Vec<String> = table.rows.iter().map(|r| format!("{:?}", r)).collect();
    rows.sort();
    rows
}

#[test]
fn test_save_load_round_trip() {
    let ctx = setup(&[(
        "t.CSV",
        "Name:TEXT,Amount:REAL,Count:INT\n\"quoted, comma\",1.5,3\nsay \"\"hi\"\",2.0,4\nplain,0.5,0\n",
    )]);
    let before = ctx.table("t");
    ctx.execute("SAVE_TABLE", json!({"tableName": "t"})).unwrap();
    ctx.engine.reload().unwrap();
    let after = ctx.table("t");
    // REAL values here are already one-fractional-digit, so the round trip
    // is exact
    assert_eq!(before.columns, after.columns);
    assert_eq!(before.rows, after.rows);
}

#[test]
fn test_copy_then_delete_leaves_everything_unchanged() {
    let ctx = setup(&[("sales.CSV", SALES_CSV)]);
    let before = ctx.table("sales");
    let names_before = ctx.engine.tables();

    ctx.execute("COPY_TABLE", json!({"tableName": "sales", "newName": "tmp"}))
        .unwrap();
    ctx.execute("DELETE_TABLE", json!({"tableName": "tmp"}))
        .unwrap();

    assert_eq!(ctx.table("sales"), before);
    assert_eq!(ctx.engine.tables(), names_before);
}

#[test]
fn test_rename_there_and_back_is_identity() {
    let ctx = setup(&[("sales.CSV", SALES_CSV)]);
    let before = ctx.table("sales");

    ctx.execute("RENAME_TABLE", json!({"tableName": "sales", "newName": "tmp"}))
        .unwrap();
    ctx.execute("RENAME_TABLE", json!({"tableName": "tmp", "newName": "sales"}))
        .unwrap();

    assert_eq!(ctx.table("sales"), before);
}

#[test]
fn test_sort_preserves_row_multiset() {
    let ctx = setup(&[(
        "t.CSV",
        "Name:TEXT,N:INT\ndelta,4\nalpha,1\ncharlie,3\nbravo,2\n",
    )]);
    let before = multiset(&ctx.table("t"));
    ctx.execute(
        "SORT_TABLE",
        json!({"tableName": "t", "columnName": "N", "order": "desc"}),
    )
    .unwrap();
    assert_eq!(multiset(&ctx.table("t")), before);
    assert_eq!(ctx.table("t").rows.len(), 4);
}

#[test]
fn test_delete_rows_constants() {
    // "0" keeps everything
    let ctx = setup(&[("sales.CSV", SALES_CSV)]);
    let before = ctx.table("sales");
    ctx.execute("DELETE_ROWS", json!({"tableName": "sales", "expression": "0"}))
        .unwrap();
    assert_eq!(ctx.table("sales"), before);

    // "1" empties the rows but keeps the schema
    ctx.execute("DELETE_ROWS", json!({"tableName": "sales", "expression": "1"}))
        .unwrap();
    let emptied = ctx.table("sales");
    assert!(emptied.rows.is_empty());
    assert_eq!(emptied.columns, before.columns);
}

#[test]
fn test_drop_then_add_keeps_row_count() {
    let ctx = setup(&[("sales.CSV", SALES_CSV)]);
    let count = ctx.table("sales").rows.len();

    ctx.execute("DROP_COLUMNS", json!({"tableName": "sales", "columns": ["Amount"]}))
        .unwrap();
    ctx.execute(
        "ADD_COLUMN",
        json!({
            "tableName": "sales",
            "columnName": "Amount",
            "expression": "LENGTH(Date)",
            "columnType": "INT",
        }),
    )
    .unwrap();

    let after = ctx.table("sales");
    assert_eq!(after.rows.len(), count);
    assert!(after.has_column("Amount"));
}

#[test]
fn test_splice_single_table_is_a_deep_copy() {
    let ctx = setup(&[("A.CSV", "Name:TEXT,Age:INT\nada,36\ngrace,85\n")]);
    ctx.execute("SPLICE_TABLES", json!({"newName": "B", "selectedTables": ["A"]}))
        .unwrap();

    let a = ctx.table("A");
    let b = ctx.table("B");
    assert_eq!(b.name, "B");
    assert_eq!(a.columns, b.columns);
    assert_eq!(a.rows, b.rows);

    // Mutating the copy leaves the source alone
    ctx.execute("DELETE_ROWS", json!({"tableName": "B", "expression": "1"}))
        .unwrap();
    assert_eq!(ctx.table("A").rows.len(), 2);
}

#[test]
fn test_schema_invariants_hold_after_commands() {
    let ctx = setup(&[("t.CSV", "a:INT,b:TEXT,c:REAL\n1,x,1.5\n2,y,2.5\n")]);
    for (name, params) in [
        ("REORDER_COLUMNS", json!({"tableName": "t", "columns": ["c"]})),
        ("RENAME_COLUMN", json!({"tableName": "t", "old": "b", "new": "label"})),
        ("DROP_COLUMNS", json!({"tableName": "t", "columns": ["a"]})),
        (
            "ADD_COLUMN",
            json!({"tableName": "t", "columnName": "d", "expression": "1", "columnType": "INT"}),
        ),
    ] {
        ctx.execute(name, params).unwrap();
        let table = ctx.table("t");
        // Column names stay unique and every row matches the schema width
        let mut names: Vec<_> = table.columns.iter().map(|c| c.name.clone()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), table.columns.len(), "after {}", name);
        for row in &table.rows {
            assert_eq!(row.len(), table.columns.len(), "after {}", name);
        }
    }
}

#[test]
fn test_reload_refreshes_file_backed_and_keeps_memory_tables() {
    let ctx = setup(&[("sales.CSV", SALES_CSV)]);
    // An in-memory table with no source file
    ctx.execute("COPY_TABLE", json!({"tableName": "sales", "newName": "scratch"}))
        .unwrap();

    // The engine's view of sales drifts from disk, then reload restores it
    ctx.execute("DELETE_ROWS", json!({"tableName": "sales", "expression": "1"}))
        .unwrap();
    assert!(ctx.table("sales").rows.is_empty());
    ctx.engine.reload().unwrap();
    assert_eq!(ctx.table("sales").rows.len(), 2);
    assert_eq!(ctx.table("scratch").rows.len(), 2);
}

#[test]
fn test_tags_file() {
    let ctx = setup(&[
        ("sales.CSV", SALES_CSV),
        ("commands.tag", "monthly\nquarterly\n\nyearly\n"),
    ]);
    assert_eq!(ctx.engine.tags().unwrap(), vec!["monthly", "quarterly", "yearly"]);

    let bare = setup(&[("sales.CSV", SALES_CSV)]);
    assert!(bare.engine.tags().unwrap().is_empty());
}

#[test]
fn test_real_cells_render_with_one_fractional_digit() {
    let ctx = setup(&[("t.CSV", "x:REAL\n1.25\n2.0\n0.05\n")]);
    ctx.execute("SAVE_TABLE", json!({"tableName": "t"})).unwrap();
    let written = std::fs::read_to_string(ctx.dir.path().join("t.CSV")).unwrap();
    assert_eq!(written, "x:REAL\n1.2\n2.0\n0.1\n");
}

#[test]
fn test_command_outputs_are_snapshots() {
    let ctx = setup(&[("sales.CSV", SALES_CSV)]);
    let output = ctx
        .execute("COPY_TABLE", json!({"tableName": "sales", "newName": "c"}))
        .unwrap();
    let snapshot = output.table.unwrap();

    ctx.execute("DELETE_ROWS", json!({"tableName": "c", "expression": "1"}))
        .unwrap();
    // The earlier return payload is untouched by later commands
    assert_eq!(snapshot.rows.len(), 2);
    assert_eq!(Value::text("2024-01-01"), snapshot.rows[0][0]);
}
