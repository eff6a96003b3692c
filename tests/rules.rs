//! Row ingress through the rules engine.

mod common;

use common::{SALES_CSV, setup};
use tabula::{Error, Value};

#[test]
fn test_add_row_init_and_check() {
    let ctx = setup(&[
        ("sales.CSV", SALES_CSV),
        ("sales.RUL", "INIT Date TODAY()\nCHECK Amount Amount > 0\n"),
    ]);

    // A failing CHECK rejects the row and names the column
    let err = ctx.add_row("sales", &[("Amount", "-5")]).unwrap_err();
    assert_eq!(
        err,
        Error::ValidationFailure {
            columns: vec!["Amount".into()]
        }
    );
    assert_eq!(ctx.table("sales").rows.len(), 2);

    // A passing row commits, with Date initialized from the clock
    let table = ctx.add_row("sales", &[("Amount", "50")]).unwrap();
    assert_eq!(table.rows.len(), 3);
    assert_eq!(ctx.cell("sales", 2, "Date"), Value::text("2024/03/07"));
    assert_eq!(ctx.cell("sales", 2, "Amount"), Value::Real(50.0));
}

#[test]
fn test_user_fields_override_init() {
    let ctx = setup(&[
        ("sales.CSV", SALES_CSV),
        ("sales.RUL", "INIT Date TODAY()\n"),
    ]);
    ctx.add_row("sales", &[("Date", "2023-12-31"), ("Amount", "1")])
        .unwrap();
    assert_eq!(ctx.cell("sales", 2, "Date"), Value::text("2023-12-31"));
}

#[test]
fn test_fixup_normalizes_on_add_and_update() {
    let ctx = setup(&[
        ("people.CSV", "Name:TEXT,Age:INT\nada,36\n"),
        ("people.RUL", "FIXUP Name UPPER(Name)\nCHECK Age Age > 0\n"),
    ]);

    ctx.add_row("people", &[("Name", "grace"), ("Age", "85")])
        .unwrap();
    assert_eq!(ctx.cell("people", 1, "Name"), Value::text("GRACE"));

    ctx.update_row("people", 0, &[("Name", "lovelace")]).unwrap();
    assert_eq!(ctx.cell("people", 0, "Name"), Value::text("LOVELACE"));
    // Untouched fields survive the update
    assert_eq!(ctx.cell("people", 0, "Age"), Value::Int(36));
}

#[test]
fn test_init_does_not_fire_on_update() {
    let ctx = setup(&[
        ("sales.CSV", SALES_CSV),
        ("sales.RUL", "INIT Date TODAY()\n"),
    ]);
    ctx.update_row("sales", 0, &[("Amount", "300")]).unwrap();
    // Date keeps its loaded value; only Amount changed
    assert_eq!(ctx.cell("sales", 0, "Date"), Value::text("2024-01-01"));
    assert_eq!(ctx.cell("sales", 0, "Amount"), Value::Real(300.0));
}

#[test]
fn test_type_conversion_failures_mark_columns() {
    let ctx = setup(&[("t.CSV", "Name:TEXT,Age:INT,Score:REAL\n")]);
    let err = ctx
        .add_row("t", &[("Name", "x"), ("Age", "not a number"), ("Score", "nope")])
        .unwrap_err();
    assert_eq!(
        err,
        Error::ValidationFailure {
            columns: vec!["Age".into(), "Score".into()]
        }
    );
    assert_eq!(ctx.table("t").rows.len(), 0);
}

#[test]
fn test_every_check_runs() {
    let ctx = setup(&[
        ("t.CSV", "A:INT,B:INT\n"),
        ("t.RUL", "CHECK A A > 0\nCHECK B B > 0\n"),
    ]);
    // Both checks fail and both columns are reported together
    let err = ctx.add_row("t", &[("A", "-1"), ("B", "-1")]).unwrap_err();
    assert_eq!(
        err,
        Error::ValidationFailure {
            columns: vec!["A".into(), "B".into()]
        }
    );
}

#[test]
fn test_check_failure_on_error_result() {
    // A CHECK whose expression errors (TEXT compared to a number) fails
    // that column rather than aborting the pipeline
    let ctx = setup(&[
        ("t.CSV", "Name:TEXT\n"),
        ("t.RUL", "CHECK Name Name > 0\n"),
    ]);
    let err = ctx.add_row("t", &[("Name", "x")]).unwrap_err();
    assert_eq!(
        err,
        Error::ValidationFailure {
            columns: vec!["Name".into()]
        }
    );
}

#[test]
fn test_defaults_without_rules() {
    // No rule file: a bare add fills type defaults from the schema
    let ctx = setup(&[("t.CSV", "Name:TEXT,Age:INT,Score:REAL\n")]);
    ctx.add_row("t", &[("Name", "ada")]).unwrap();
    assert_eq!(
        ctx.table("t").rows[0],
        vec![Value::text("ada"), Value::Int(0), Value::Real(0.0)]
    );
}

#[test]
fn test_rules_see_other_candidate_fields() {
    // FIXUP reads the user-supplied fields of the same candidate row
    let ctx = setup(&[
        ("t.CSV", "First:TEXT,Last:TEXT,Full:TEXT\n"),
        ("t.RUL", "FIXUP Full First + ' ' + Last\n"),
    ]);
    ctx.add_row("t", &[("First", "Ada"), ("Last", "Lovelace")])
        .unwrap();
    assert_eq!(ctx.cell("t", 0, "Full"), Value::text("Ada Lovelace"));
}

#[test]
fn test_rule_file_edits_take_effect() {
    let ctx = setup(&[
        ("t.CSV", "A:INT\n"),
        ("t.RUL", "CHECK A A > 0\n"),
    ]);
    assert!(ctx.add_row("t", &[("A", "-1")]).is_err());

    // Rewrite the rule file and push its mtime forward so the cache
    // revalidates even on coarse-grained filesystems
    let path = ctx.dir.path().join("t.RUL");
    std::fs::write(&path, "CHECK A A > -10\n").unwrap();
    let file = std::fs::OpenOptions::new().write(true).open(&path).unwrap();
    file.set_modified(std::time::SystemTime::now() + std::time::Duration::from_secs(5))
        .unwrap();

    ctx.add_row("t", &[("A", "-1")]).unwrap();
    assert_eq!(ctx.table("t").rows.len(), 1);
}

#[test]
fn test_update_row_out_of_range() {
    let ctx = setup(&[("sales.CSV", SALES_CSV)]);
    assert!(matches!(
        ctx.update_row("sales", 9, &[("Amount", "1")]).unwrap_err(),
        Error::InvalidParameter(_)
    ));
}

#[test]
fn test_ingress_rejects_unknown_table() {
    let ctx = setup(&[]);
    let err = ctx.add_row("ghost", &[]).unwrap_err();
    assert_eq!(err, Error::TableNotFound("ghost".into()));
}

#[test]
fn test_check_against_cross_table_total() {
    // Checks may consult other tables through TOTAL
    let ctx = setup(&[
        ("budget.CSV", "Limit:REAL\n100.0\n"),
        ("spend.CSV", "Amount:REAL\n40.0\n"),
        (
            "spend.RUL",
            "CHECK Amount TOTAL('spend', 'Amount') + Amount < TOTAL('budget', 'Limit')\n",
        ),
    ]);
    ctx.add_row("spend", &[("Amount", "30")]).unwrap();
    assert!(ctx.add_row("spend", &[("Amount", "50")]).is_err());
}
