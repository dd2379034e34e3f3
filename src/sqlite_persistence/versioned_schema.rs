use anyhow::{bail, Context, Result};
use rusqlite::Connection;

/// Offset added to schema versions when stamped into `PRAGMA user_version`,
/// so that a database created by something else is not mistaken for ours.
pub const BASE_DB_VERSION: usize = 4200;

#[macro_export]
macro_rules! sqlite_column {
    ($name:expr, $sql_type:expr $(, $field:ident = $value:expr)*) => {
        {
            #[allow(unused_mut)]
            let mut column = Column {
                name: $name,
                sql_type: $sql_type,
                is_primary_key: false,
                non_null: false,
            };
            $(
                column.$field = $value;
            )*
            column
        }
    };
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SqlType {
    Text,
    Integer,
}

impl SqlType {
    fn as_sql(&self) -> &'static str {
        match self {
            SqlType::Text => "TEXT",
            SqlType::Integer => "INTEGER",
        }
    }

    fn from_sql(s: &str) -> Option<SqlType> {
        match s.to_ascii_uppercase().as_str() {
            "TEXT" => Some(SqlType::Text),
            "INTEGER" => Some(SqlType::Integer),
            _ => None,
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct Column<S: AsRef<str>> {
    pub name: S,
    pub sql_type: SqlType,
    pub is_primary_key: bool,
    pub non_null: bool,
}

impl<S: AsRef<str>> Column<S> {
    fn definition(&self) -> String {
        let mut sql = format!("{} {}", self.name.as_ref(), self.sql_type.as_sql());
        if self.is_primary_key {
            sql.push_str(" PRIMARY KEY");
        }
        if self.non_null {
            sql.push_str(" NOT NULL");
        }
        sql
    }
}

pub struct Table {
    pub name: &'static str,
    pub columns: &'static [Column<&'static str>],
}

impl Table {
    pub fn create(&self, conn: &Connection) -> Result<()> {
        let definitions: Vec<String> = self.columns.iter().map(Column::definition).collect();
        conn.execute(
            &format!("CREATE TABLE {} ({})", self.name, definitions.join(", ")),
            [],
        )
        .with_context(|| format!("Failed to create table {}", self.name))?;
        Ok(())
    }

    /// Reads the live column layout of this table from `PRAGMA table_info`.
    fn read_columns(&self, conn: &Connection) -> Result<Vec<Column<String>>> {
        let mut stmt = conn.prepare(&format!("PRAGMA table_info({})", self.name))?;
        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, i32>(3)? == 1,
                    row.get::<_, i32>(5)? > 0,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter()
            .map(|(name, declared_type, non_null, is_primary_key)| {
                let sql_type = SqlType::from_sql(&declared_type).with_context(|| {
                    format!(
                        "Table {} Column {} has unsupported type {:?}",
                        self.name, name, declared_type
                    )
                })?;
                Ok(Column {
                    name,
                    sql_type,
                    is_primary_key,
                    non_null,
                })
            })
            .collect()
    }

    fn validate(&self, conn: &Connection) -> Result<()> {
        let actual_columns = self.read_columns(conn)?;

        if actual_columns.is_empty() {
            bail!("Table {} does not exist", self.name);
        }

        if actual_columns.len() != self.columns.len() {
            let names = |columns: Vec<&str>| columns.join(", ");
            bail!(
                "Table {} has {} columns, expected {}. Found: {}, expected: {}",
                self.name,
                actual_columns.len(),
                self.columns.len(),
                names(actual_columns.iter().map(|c| c.name.as_str()).collect()),
                names(self.columns.iter().map(|c| c.name).collect()),
            );
        }

        for (actual, expected) in actual_columns.iter().zip(self.columns.iter()) {
            if actual.name != expected.name {
                bail!(
                    "Table {} column name mismatch: expected {}, got {}",
                    self.name,
                    expected.name,
                    actual.name
                );
            }
            if actual.sql_type != expected.sql_type {
                bail!(
                    "Table {} Column {} type mismatch: expected {:?}, got {:?}",
                    self.name,
                    expected.name,
                    expected.sql_type,
                    actual.sql_type
                );
            }
            if actual.definition() != expected.definition() {
                bail!(
                    "Table {} Column {} constraint mismatch: expected `{}`, got `{}`",
                    self.name,
                    expected.name,
                    expected.definition(),
                    actual.definition()
                );
            }
        }
        Ok(())
    }
}

pub struct VersionedSchema {
    pub version: usize,
    pub tables: &'static [Table],
}

impl VersionedSchema {
    pub fn create(&self, conn: &Connection) -> Result<()> {
        for table in self.tables {
            table.create(conn)?;
        }
        conn.pragma_update(None, "user_version", BASE_DB_VERSION + self.version)?;
        Ok(())
    }

    pub fn validate(&self, conn: &Connection) -> Result<()> {
        for table in self.tables {
            table.validate(conn)?;
        }
        Ok(())
    }

    /// Reads the schema version stamped into the database, if it carries one of ours.
    pub fn read_version(conn: &Connection) -> Result<Option<usize>> {
        let db_version: i64 = conn.query_row("PRAGMA user_version", [], |r| r.get(0))?;
        if db_version < BASE_DB_VERSION as i64 {
            return Ok(None);
        }
        Ok(Some(db_version as usize - BASE_DB_VERSION))
    }
}
