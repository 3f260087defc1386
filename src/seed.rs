//! Bootstrap of the fixed-schema user table from a CSV file.
//!
//! Seeding is reported loudly (errors propagate) rather than following the
//! swallow-and-stop policy of the scans: a broken bootstrap should not look
//! like an empty store.

use std::path::Path;

use tracing::info;
use uuid::Uuid;

use crate::{
    catalog::{Column, TableSchema, TypeId},
    error::{DbResult, Error},
    row::Value,
    store::mem::MemStore,
};

/// Name of the seeded user table.
pub const USER_TABLE: &str = "user_data";

/// The fixed user table schema: `user_id` (primary), `name`, `email`, `age`.
pub fn user_schema() -> TableSchema {
    TableSchema {
        columns: vec![
            Column::new("user_id", TypeId::Text),
            Column::new("name", TypeId::Text),
            Column::new("email", TypeId::Text),
            Column::new("age", TypeId::Int),
        ],
    }
}

/// Creates the user table if needed and bulk-loads it from the given CSV file.
///
/// The load is skipped (returning 0) when the table already contains rows.
/// Rows missing a `user_id` field get a generated v4 UUID. Returns the number
/// of rows inserted.
pub async fn seed_from_csv(store: &MemStore, path: &Path) -> DbResult<usize> {
    store.create_table(USER_TABLE, user_schema());

    let existing = store.row_count(USER_TABLE).unwrap_or(0);
    if existing > 0 {
        info!(rows = existing, "user table already populated; skipping load");
        return Ok(0);
    }

    let contents = match tokio::fs::read_to_string(path).await {
        Ok(contents) => contents,
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
            return Err(Error::SourceNotFound(path.to_owned()));
        }
        Err(error) => return Err(Error::Io(error)),
    };

    let mut lines = contents.lines().enumerate();
    let header = loop {
        match lines.next() {
            Some((_, line)) if line.trim().is_empty() => continue,
            Some((_, line)) => break Header::parse(line),
            None => return Ok(0),
        }
    };

    let mut inserted = 0;
    for (index, line) in lines {
        if line.trim().is_empty() {
            continue;
        }
        let row = header.parse_record(line, index + 1)?;
        store.insert(USER_TABLE, row)?;
        inserted += 1;
    }

    info!(rows = inserted, "user table seeded");
    Ok(inserted)
}

/// Column positions within the CSV, resolved from the header line.
struct Header {
    user_id: Option<usize>,
    name: Option<usize>,
    email: Option<usize>,
    age: Option<usize>,
}

impl Header {
    fn parse(line: &str) -> Header {
        let fields = split_record(line);
        let position = |name: &str| fields.iter().position(|field| field.trim() == name);
        Header {
            user_id: position("user_id"),
            name: position("name"),
            email: position("email"),
            age: position("age"),
        }
    }

    /// Parses one CSV record into user table values, in schema order.
    fn parse_record(&self, line: &str, line_no: usize) -> DbResult<Vec<Value>> {
        let fields = split_record(line);
        let field = |index: Option<usize>| {
            index
                .and_then(|i| fields.get(i))
                .map(String::as_str)
                .unwrap_or_default()
        };

        let user_id = match field(self.user_id) {
            "" => Uuid::new_v4().to_string(),
            id => id.to_owned(),
        };
        let age_field = field(self.age);
        let age = if age_field.is_empty() {
            0
        } else {
            // Ages may be written with a decimal point; truncate.
            age_field.trim().parse::<f64>().map_err(|_| Error::Csv {
                line: line_no,
                reason: format!("invalid age `{age_field}`").into(),
            })? as i64
        };

        Ok(vec![
            Value::Text(user_id),
            Value::Text(field(self.name).to_owned()),
            Value::Text(field(self.email).to_owned()),
            Value::Int(age),
        ])
    }
}

/// Splits one CSV line into fields, honoring double-quoted fields with `""`
/// escapes.
fn split_record(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut quoted = false;
    let mut chars = line.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '"' if quoted => {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    field.push('"');
                } else {
                    quoted = false;
                }
            }
            '"' if field.is_empty() => quoted = true,
            ',' if !quoted => fields.push(std::mem::take(&mut field)),
            _ => field.push(ch),
        }
    }
    fields.push(field);
    fields
}
