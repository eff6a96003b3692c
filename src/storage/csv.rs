//! The on-disk table format
//!
//! A comma-separated text format whose header carries the schema: each
//! header field is `name` or `name:TYPE` (type matched case-insensitively,
//! missing or unknown types default to TEXT). Fields may be wrapped in
//! double quotes; inside a quoted field `""` encodes a literal quote, and
//! commas and newlines are ordinary characters. Unquoted fields are trimmed.

use crate::error::Result;
use crate::types::{Column, DataType, Table, Value};

/// Parses file content into a table with the given name.
pub fn parse(name: &str, content: &str) -> Result<Table> {
    let mut records = split_records(content).into_iter();

    let columns = match records.next() {
        Some(header) => header
            .iter()
            .map(|field| {
                match field.split_once(':') {
                    Some((name, data_type)) => {
                        Column::new(name.trim(), DataType::from_header(data_type))
                    }
                    None => Column::new(field.trim(), DataType::Text),
                }
            })
            .collect(),
        None => Vec::new(),
    };
    let mut table = Table::new(name, columns)?;

    for record in records {
        let row = table
            .columns
            .iter()
            .enumerate()
            .map(|(i, column)| match record.get(i) {
                // Extra fields past the schema are simply never read.
                Some(field) => parse_field(field, column.data_type),
                // Short rows pad with the type default.
                None => Value::default_for(column.data_type),
            })
            .collect();
        table.rows.push(row);
    }
    Ok(table)
}

/// Converts one raw field to a typed cell. Number parsing is forgiving:
/// REAL strips `$` and `,` first, and anything unparsable becomes the type
/// zero so a sloppy file still loads.
fn parse_field(field: &str, data_type: DataType) -> Value {
    match data_type {
        DataType::Text => Value::text(field),
        DataType::Int => Value::Int(field.trim().parse().unwrap_or(0)),
        DataType::Real => {
            let cleaned: String = field
                .trim()
                .chars()
                .filter(|c| *c != '$' && *c != ',')
                .collect();
            Value::Real(cleaned.parse().unwrap_or(0.0))
        }
    }
}

/// Splits file content into records of raw fields, honoring quoting.
/// Fully blank lines are dropped (the schema header is the first non-empty
/// line; blank separator lines in data are noise).
fn split_records(content: &str) -> Vec<Vec<String>> {
    let mut records = Vec::new();
    let mut record: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut quoted = false; // the current field had a quoted section
    let mut in_quotes = false;

    let mut chars = content.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes => {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    field.push('"');
                } else {
                    in_quotes = false;
                }
            }
            '"' => {
                in_quotes = true;
                quoted = true;
            }
            ',' if !in_quotes => {
                record.push(finish_field(&mut field, &mut quoted));
            }
            '\r' if !in_quotes && chars.peek() == Some(&'\n') => {}
            '\n' if !in_quotes => {
                record.push(finish_field(&mut field, &mut quoted));
                push_record(&mut records, &mut record);
            }
            _ => field.push(c),
        }
    }
    if !field.is_empty() || quoted || !record.is_empty() {
        record.push(finish_field(&mut field, &mut quoted));
        push_record(&mut records, &mut record);
    }
    records
}

fn finish_field(field: &mut String, quoted: &mut bool) -> String {
    let out = if *quoted {
        std::mem::take(field)
    } else {
        let trimmed = field.trim().to_string();
        field.clear();
        trimmed
    };
    *quoted = false;
    out
}

fn push_record(records: &mut Vec<Vec<String>>, record: &mut Vec<String>) {
    let done = std::mem::take(record);
    // A lone empty field is a blank line
    if done.len() == 1 && done[0].is_empty() {
        return;
    }
    records.push(done);
}

/// Serializes a table back to the text format. The header always carries
/// explicit types; REAL cells render with exactly one fractional digit.
pub fn serialize(table: &Table) -> String {
    let mut out = String::new();
    let header: Vec<String> = table
        .columns
        .iter()
        .map(|c| format!("{}:{}", c.name, c.data_type))
        .collect();
    out.push_str(&header.join(","));
    out.push('\n');

    for row in &table.rows {
        let fields: Vec<String> = row.iter().map(|cell| quote_field(render(cell))).collect();
        out.push_str(&fields.join(","));
        out.push('\n');
    }
    out
}

fn render(cell: &Value) -> String {
    match cell {
        Value::Text(s) => s.clone(),
        Value::Int(n) => n.to_string(),
        Value::Real(n) => format!("{:.1}", n),
    }
}

/// Quotes a field iff it needs it: embedded comma, quote, CR, or LF.
fn quote_field(field: String) -> String {
    if field.contains([',', '"', '\r', '\n']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_schema_header() {
        let table = parse("sales", "Date:TEXT,Amount:REAL,Count:INT\n").unwrap();
        assert_eq!(table.columns.len(), 3);
        assert_eq!(table.columns[0].data_type, DataType::Text);
        assert_eq!(table.columns[1].data_type, DataType::Real);
        assert_eq!(table.columns[2].data_type, DataType::Int);
        assert!(table.rows.is_empty());
    }

    #[test]
    fn test_header_type_defaults() {
        // Missing and unknown types default to TEXT; matching is
        // case-insensitive
        let table = parse("t", "a,b:int,c:Bogus,d:real\n").unwrap();
        let types: Vec<_> = table.columns.iter().map(|c| c.data_type).collect();
        assert_eq!(
            types,
            vec![DataType::Text, DataType::Int, DataType::Text, DataType::Real]
        );
    }

    #[test]
    fn test_parse_rows() {
        let table = parse("t", "Name,Amount:INT\n alice , 3\nbob,7\n").unwrap();
        assert_eq!(
            table.rows,
            vec![
                vec![Value::text("alice"), Value::Int(3)],
                vec![Value::text("bob"), Value::Int(7)],
            ]
        );
    }

    #[test]
    fn test_short_and_long_rows() {
        let table = parse("t", "a,b:INT,c:REAL\nx\n1,2,3.5,junk,more\n").unwrap();
        assert_eq!(
            table.rows,
            vec![
                vec![Value::text("x"), Value::Int(0), Value::Real(0.0)],
                vec![Value::text("1"), Value::Int(2), Value::Real(3.5)],
            ]
        );
    }

    #[test]
    fn test_numeric_cleanup() {
        let table = parse("t", "a:REAL,b:INT\n\"$1,234.5\",12\nnope,nope\n").unwrap();
        assert_eq!(
            table.rows,
            vec![
                vec![Value::Real(1234.5), Value::Int(12)],
                vec![Value::Real(0.0), Value::Int(0)],
            ]
        );
    }

    #[test]
    fn test_quoting() {
        let table = parse("t", "a,b\n\"x,y\",\"say \"\"hi\"\"\"\n").unwrap();
        assert_eq!(
            table.rows,
            vec![vec![Value::text("x,y"), Value::text("say \"hi\"")]]
        );
        // Quoted fields keep their whitespace
        let table = parse("t", "a\n\" padded \"\n").unwrap();
        assert_eq!(table.rows, vec![vec![Value::text(" padded ")]]);
    }

    #[test]
    fn test_quoted_newline() {
        let table = parse("t", "a,b\n\"line1\nline2\",x\n").unwrap();
        assert_eq!(
            table.rows,
            vec![vec![Value::text("line1\nline2"), Value::text("x")]]
        );
    }

    #[test]
    fn test_blank_lines_skipped() {
        let table = parse("t", "\n\na:INT\n\n1\n\n2\n").unwrap();
        assert_eq!(table.rows, vec![vec![Value::Int(1)], vec![Value::Int(2)]]);
    }

    #[test]
    fn test_serialize() {
        let mut table = parse("t", "Name:TEXT,Amount:REAL\n").unwrap();
        table.rows.push(vec![Value::text("a,b"), Value::Real(1.25)]);
        table.rows.push(vec![Value::text("plain"), Value::Real(2.0)]);
        assert_eq!(
            serialize(&table),
            "Name:TEXT,Amount:REAL\n\"a,b\",1.2\nplain,2.0\n"
        );
    }

    #[test]
    fn test_round_trip() {
        let input = "Name:TEXT,Amount:REAL,Count:INT\nal \"the\" pal,1.5,3\n\"x,y\",2.0,4\n";
        let table = parse("t", input).unwrap();
        let rendered = serialize(&table);
        let reparsed = parse("t", &rendered).unwrap();
        assert_eq!(table.columns, reparsed.columns);
        assert_eq!(table.rows, reparsed.rows);
    }
}
