//! Logical dump-stream generation.
//!
//! The dump is a sequence of newline-separated, semicolon-terminated SQL
//! statements: per table a CREATE rewritten to be idempotent followed by one
//! INSERT per row, then all index/trigger/view statements once at the end.
//! Row values are serialized by SQLite's own `quote()` function, so NULLs,
//! text escaping, blobs, and non-ASCII data all follow the engine's rules
//! rather than hand-rolled escaping.

use std::collections::HashSet;
use std::io::Write;

use rusqlite::Connection;
use tracing::debug;

use crate::error::ConnectorError;
use crate::spool::SpooledBuffer;

use super::schema::{self, ObjectKind, SchemaObject, quote_ident};

pub(crate) fn write_dump(
    conn: &Connection,
    exclude: &[String],
    out: &mut SpooledBuffer,
) -> Result<(), ConnectorError> {
    let excluded: HashSet<&str> = exclude.iter().map(String::as_str).collect();

    for table in schema::tables(conn)? {
        if table.name.starts_with(schema::RESERVED_PREFIX)
            || excluded.contains(table.name.as_str())
        {
            continue;
        }
        write_table(conn, &table, out)?;
    }

    // Index, trigger, and view statements go out once, after every table
    // exists, so forward references resolve on replay.
    for object in schema::support_objects(conn)? {
        if object.table.starts_with(schema::RESERVED_PREFIX)
            || excluded.contains(object.table.as_str())
            || excluded.contains(object.name.as_str())
        {
            continue;
        }
        let sql = match object.kind {
            ObjectKind::Index => idempotent_index(&object.sql),
            _ => object.sql.clone(),
        };
        writeln!(out, "{};", sql)?;
    }

    Ok(())
}

fn write_table(
    conn: &Connection,
    table: &SchemaObject,
    out: &mut SpooledBuffer,
) -> Result<(), ConnectorError> {
    // Virtual tables keep their original CREATE VIRTUAL TABLE statement.
    let create = if table.sql.starts_with("CREATE TABLE") {
        table
            .sql
            .replacen("CREATE TABLE", "CREATE TABLE IF NOT EXISTS", 1)
    } else {
        table.sql.clone()
    };
    writeln!(out, "{};", create)?;

    let columns = schema::column_names(conn, &table.name)?;
    if columns.is_empty() {
        return Ok(());
    }

    // Let SQLite render each row as a ready-made INSERT statement, quoting
    // every value itself.
    let ident = quote_ident(&table.name);
    let value_exprs: Vec<String> = columns
        .iter()
        .map(|col| format!(r#"'||quote("{}")||'"#, quote_ident(col)))
        .collect();
    let row_query = format!(
        r#"SELECT 'INSERT INTO "{0}" VALUES({1})' FROM "{0}""#,
        ident,
        value_exprs.join(","),
    );

    let mut stmt = conn.prepare(&row_query).map_err(|e| ConnectorError::Dump {
        table: table.name.clone(),
        source: e,
    })?;
    let rows = stmt
        .query_map([], |row| row.get::<_, String>(0))
        .map_err(|e| ConnectorError::Dump {
            table: table.name.clone(),
            source: e,
        })?;

    let mut row_count = 0usize;
    for row in rows {
        let insert = row.map_err(|e| ConnectorError::Dump {
            table: table.name.clone(),
            source: e,
        })?;
        writeln!(out, "{};", insert)?;
        row_count += 1;
    }
    debug!(table = %table.name, rows = row_count, "dumped table");

    Ok(())
}

fn idempotent_index(sql: &str) -> String {
    if sql.starts_with("CREATE INDEX") {
        sql.replacen("CREATE INDEX", "CREATE INDEX IF NOT EXISTS", 1)
    } else {
        sql.to_string()
    }
}
