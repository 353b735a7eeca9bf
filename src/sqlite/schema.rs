//! Typed introspection of the SQLite catalog.
//!
//! Every schema object the dumper cares about is one `sqlite_master` row:
//! name, kind, owning table, and the original creation statement. Rows with
//! a NULL `sql` (auto-indexes and the like) are filtered in the query.

use rusqlite::Connection;

use crate::error::ConnectorError;

/// Tables with this name prefix belong to SQLite itself and are never
/// dumped.
pub(crate) const RESERVED_PREFIX: &str = "sqlite_";

const TABLES_QUERY: &str = r#"
SELECT "name", "type", "tbl_name", "sql"
FROM "sqlite_master"
WHERE "sql" NOT NULL AND "type" == 'table'
ORDER BY "name"
"#;

const SUPPORT_QUERY: &str = r#"
SELECT "name", "type", "tbl_name", "sql"
FROM "sqlite_master"
WHERE "sql" NOT NULL AND "type" IN ('index', 'trigger', 'view')
"#;

/// Kind of a catalog object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectKind {
    Table,
    Index,
    Trigger,
    View,
}

impl ObjectKind {
    fn from_catalog(kind: &str) -> Option<Self> {
        match kind {
            "table" => Some(ObjectKind::Table),
            "index" => Some(ObjectKind::Index),
            "trigger" => Some(ObjectKind::Trigger),
            "view" => Some(ObjectKind::View),
            _ => None,
        }
    }
}

/// One row of `sqlite_master`.
#[derive(Debug, Clone)]
pub struct SchemaObject {
    pub name: String,
    pub kind: ObjectKind,
    /// Owning table (`tbl_name`); equals `name` for tables themselves.
    pub table: String,
    /// Original creation statement.
    pub sql: String,
}

fn query_objects(conn: &Connection, query: &str) -> Result<Vec<SchemaObject>, ConnectorError> {
    let mut stmt = conn
        .prepare(query)
        .map_err(|e| ConnectorError::Catalog { source: e })?;

    let rows = stmt
        .query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
            ))
        })
        .map_err(|e| ConnectorError::Catalog { source: e })?;

    let mut objects = Vec::new();
    for row in rows {
        let (name, kind, table, sql) = row.map_err(|e| ConnectorError::Catalog { source: e })?;
        if let Some(kind) = ObjectKind::from_catalog(&kind) {
            objects.push(SchemaObject {
                name,
                kind,
                table,
                sql,
            });
        }
    }
    Ok(objects)
}

/// All table definitions, ordered by name.
pub(crate) fn tables(conn: &Connection) -> Result<Vec<SchemaObject>, ConnectorError> {
    query_objects(conn, TABLES_QUERY)
}

/// All index, trigger, and view definitions.
pub(crate) fn support_objects(conn: &Connection) -> Result<Vec<SchemaObject>, ConnectorError> {
    query_objects(conn, SUPPORT_QUERY)
}

/// Column names of `table` in declaration order.
pub(crate) fn column_names(conn: &Connection, table: &str) -> Result<Vec<String>, ConnectorError> {
    let pragma = format!(r#"PRAGMA table_info("{}")"#, quote_ident(table));
    let mut stmt = conn
        .prepare(&pragma)
        .map_err(|e| ConnectorError::Dump {
            table: table.to_string(),
            source: e,
        })?;

    let rows = stmt
        .query_map([], |row| row.get::<_, String>(1))
        .map_err(|e| ConnectorError::Dump {
            table: table.to_string(),
            source: e,
        })?;

    let mut columns = Vec::new();
    for row in rows {
        columns.push(row.map_err(|e| ConnectorError::Dump {
            table: table.to_string(),
            source: e,
        })?);
    }
    Ok(columns)
}

/// Double embedded quote characters so an identifier stays valid inside a
/// double-quoted SQL string.
pub(crate) fn quote_ident(name: &str) -> String {
    name.replace('"', "\"\"")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn test_conn() -> (tempfile::TempDir, Connection) {
        let dir = tempdir().unwrap();
        let conn = Connection::open(dir.path().join("schema.db")).unwrap();
        (dir, conn)
    }

    #[test]
    fn tables_are_ordered_by_name() {
        let (_dir, conn) = test_conn();
        conn.execute_batch(
            "CREATE TABLE zebra (id INTEGER); CREATE TABLE apple (id INTEGER);",
        )
        .unwrap();

        let tables = tables(&conn).unwrap();
        let names: Vec<&str> = tables.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, ["apple", "zebra"]);
        assert!(tables.iter().all(|t| t.kind == ObjectKind::Table));
    }

    #[test]
    fn support_objects_carry_owning_table() {
        let (_dir, conn) = test_conn();
        conn.execute_batch(
            "CREATE TABLE t (a INTEGER); CREATE INDEX idx_a ON t (a);",
        )
        .unwrap();

        let objects = support_objects(&conn).unwrap();
        assert_eq!(objects.len(), 1);
        assert_eq!(objects[0].kind, ObjectKind::Index);
        assert_eq!(objects[0].table, "t");
    }

    #[test]
    fn column_names_preserve_declaration_order() {
        let (_dir, conn) = test_conn();
        conn.execute_batch("CREATE TABLE t (zulu TEXT, alpha INTEGER, mike BLOB);")
            .unwrap();

        let columns = column_names(&conn, "t").unwrap();
        assert_eq!(columns, ["zulu", "alpha", "mike"]);
    }

    #[test]
    fn quote_ident_doubles_embedded_quotes() {
        assert_eq!(quote_ident("plain"), "plain");
        assert_eq!(quote_ident(r#"we"ird"#), r#"we""ird"#);
    }
}
