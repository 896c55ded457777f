use core::fmt;
use serde_json::Value;

/// Wire format for insert bodies.
///
/// `JSONEachRow` is the safer default: it is self-describing, so column
/// order in the payload does not have to match the table definition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InsertFormat {
    Csv,
    JsonEachRow,
}

impl InsertFormat {
    /// The format name as it appears in the `FORMAT` clause.
    pub fn as_sql(&self) -> &'static str {
        match self {
            Self::Csv => "CSV",
            Self::JsonEachRow => "JSONEachRow",
        }
    }
}

impl fmt::Display for InsertFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

/// Serializes JSON object rows into an insert body.
///
/// For CSV the column order is taken from the first row; later rows are
/// emitted in that same order, with missing keys as empty fields. Errors
/// are returned as plain messages for the caller to fold into a
/// [`QueryOutcome`](crate::QueryOutcome).
pub(crate) fn encode_rows(rows: &[Value], format: InsertFormat) -> Result<String, String> {
    match format {
        InsertFormat::Csv => encode_csv(rows),
        InsertFormat::JsonEachRow => encode_json_each_row(rows),
    }
}

fn encode_json_each_row(rows: &[Value]) -> Result<String, String> {
    let mut lines = Vec::with_capacity(rows.len());
    for (i, row) in rows.iter().enumerate() {
        if !row.is_object() {
            return Err(format!("row {i} is not a JSON object"));
        }
        lines.push(row.to_string());
    }
    Ok(lines.join("\n"))
}

fn encode_csv(rows: &[Value]) -> Result<String, String> {
    let first = rows
        .first()
        .and_then(Value::as_object)
        .ok_or_else(|| "row 0 is not a JSON object".to_string())?;
    let columns: Vec<&str> = first.keys().map(String::as_str).collect();

    let mut out = String::new();
    for (i, row) in rows.iter().enumerate() {
        let obj = row
            .as_object()
            .ok_or_else(|| format!("row {i} is not a JSON object"))?;
        let mut fields = Vec::with_capacity(columns.len());
        for column in &columns {
            fields.push(csv_field(obj.get(*column).unwrap_or(&Value::Null)));
        }
        out.push_str(&fields.join(","));
        out.push('\n');
    }
    // Drop the trailing newline so the line count equals the row count.
    out.pop();
    Ok(out)
}

/// Renders one CSV field: every value is quoted, with backslash escaping
/// for quotes and backslashes inside. Nulls become empty quoted fields.
fn csv_field(value: &Value) -> String {
    let raw = match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    };
    let mut field = String::with_capacity(raw.len() + 2);
    field.push('"');
    for ch in raw.chars() {
        if ch == '"' || ch == '\\' {
            field.push('\\');
        }
        field.push(ch);
    }
    field.push('"');
    field
}
