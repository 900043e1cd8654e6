//! sqlx-backed schema inspector

use async_trait::async_trait;
use sqlx::mysql::{MySqlConnectOptions, MySqlPool, MySqlPoolOptions};
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::Row;
use std::collections::HashMap;
use std::path::Path;

use super::{split_qualified, validate_table_name, Column, SchemaInspector};
use crate::error::{PatternError, Result};

const MYSQL_COLUMNS: &str = "SELECT CAST(COLUMN_NAME AS CHAR) AS name, \
     CAST(COLUMN_TYPE AS CHAR) AS data_type, \
     CAST(IS_NULLABLE AS CHAR) AS nullable \
     FROM information_schema.COLUMNS \
     WHERE TABLE_SCHEMA = COALESCE(?, DATABASE()) AND TABLE_NAME = ? \
     ORDER BY ORDINAL_POSITION";

const POSTGRES_COLUMNS: &str = "SELECT column_name::text AS name, \
     data_type::text AS data_type, \
     is_nullable::text AS nullable \
     FROM information_schema.columns \
     WHERE table_schema::text = COALESCE($1, current_schema()::text) AND table_name::text = $2 \
     ORDER BY ordinal_position";

const SQLITE_COLUMNS: &str =
    "SELECT name, type AS data_type, \"notnull\" AS not_null FROM pragma_table_info(?1) ORDER BY cid";

const SQLITE_SCHEMA_COLUMNS: &str =
    "SELECT name, type AS data_type, \"notnull\" AS not_null FROM pragma_table_info(?1, ?2) ORDER BY cid";

/// Where the schema lives
#[derive(Debug, Clone)]
pub enum DatabaseTarget {
    /// Connection URL (`mysql://`, `mariadb://`, `postgres://`, `sqlite:`)
    Url(String),
    /// MySQL or MariaDB built from discrete settings
    MySql(MySqlConnectOptions),
    /// PostgreSQL built from discrete settings
    Postgres(PgConnectOptions),
    /// SQLite database file
    Sqlite(SqliteConnectOptions),
}

impl DatabaseTarget {
    /// Accept a URL with a supported scheme
    ///
    /// # Errors
    ///
    /// Returns [`PatternError::Database`] for unsupported schemes.
    pub fn from_url(url: &str) -> Result<Self> {
        match Driver::from_url(url) {
            Some(_) => Ok(Self::Url(url.to_string())),
            None => Err(PatternError::Database(format!(
                "unsupported database URL '{}': expected mysql://, mariadb://, postgres:// or sqlite:",
                redact(url)
            ))),
        }
    }

    /// Build a target from Laravel-style `DB_*` variables
    ///
    /// `DB_CONNECTION` defaults to `mysql`. Relative SQLite paths resolve
    /// against `root`.
    ///
    /// # Errors
    ///
    /// Returns [`PatternError::Database`] for an unknown driver, a missing
    /// `DB_DATABASE` (server drivers) or an unparsable `DB_PORT`.
    pub fn from_env_map(vars: &HashMap<String, String>, root: &Path) -> Result<Self> {
        let get = |key: &str| vars.get(key).map(String::as_str).filter(|v| !v.is_empty());
        let connection = get("DB_CONNECTION").unwrap_or("mysql");
        let port = |default: u16| -> Result<u16> {
            get("DB_PORT").map_or(Ok(default), |p| {
                p.parse()
                    .map_err(|_| PatternError::Database(format!("invalid DB_PORT '{p}'")))
            })
        };
        let database = || {
            get("DB_DATABASE")
                .ok_or_else(|| PatternError::Database("DB_DATABASE is not set".to_string()))
        };

        match connection {
            "mysql" | "mariadb" => {
                let mut options = MySqlConnectOptions::new()
                    .host(get("DB_HOST").unwrap_or("127.0.0.1"))
                    .port(port(3306)?)
                    .username(get("DB_USERNAME").unwrap_or("root"))
                    .database(database()?);
                if let Some(password) = get("DB_PASSWORD") {
                    options = options.password(password);
                }
                Ok(Self::MySql(options))
            }
            "pgsql" | "postgres" => {
                let mut options = PgConnectOptions::new()
                    .host(get("DB_HOST").unwrap_or("127.0.0.1"))
                    .port(port(5432)?)
                    .username(get("DB_USERNAME").unwrap_or("postgres"))
                    .database(database()?);
                if let Some(password) = get("DB_PASSWORD") {
                    options = options.password(password);
                }
                Ok(Self::Postgres(options))
            }
            "sqlite" => {
                let file = get("DB_DATABASE").map_or_else(
                    || root.join("database").join("database.sqlite"),
                    |db| root.join(db),
                );
                Ok(Self::Sqlite(SqliteConnectOptions::new().filename(file)))
            }
            other => Err(PatternError::Database(format!(
                "unsupported DB_CONNECTION '{other}'"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Driver {
    MySql,
    Postgres,
    Sqlite,
}

impl Driver {
    fn from_url(url: &str) -> Option<Self> {
        let scheme = url.split_once(':')?.0;
        match scheme {
            "mysql" | "mariadb" => Some(Self::MySql),
            "postgres" | "postgresql" => Some(Self::Postgres),
            "sqlite" => Some(Self::Sqlite),
            _ => None,
        }
    }
}

/// Hide credentials before a URL reaches a message
fn redact(url: &str) -> String {
    match (url.split_once("://"), url.rfind('@')) {
        (Some((scheme, _)), Some(at)) => format!("{scheme}://***{}", &url[at..]),
        _ => url.to_string(),
    }
}

/// Schema inspector over a sqlx connection pool
#[derive(Debug, Clone)]
pub enum SqlxInspector {
    /// MySQL or MariaDB
    MySql(MySqlPool),
    /// PostgreSQL
    Postgres(PgPool),
    /// SQLite
    Sqlite(SqlitePool),
}

impl SqlxInspector {
    /// Open a single-connection pool to `target`
    ///
    /// # Errors
    ///
    /// Returns [`PatternError::Database`] if the connection cannot be made.
    pub async fn connect(target: &DatabaseTarget) -> Result<Self> {
        let connect_err = |e: sqlx::Error| PatternError::Database(format!("failed to connect: {e}"));

        let inspector = match target {
            DatabaseTarget::Url(url) => match Driver::from_url(url) {
                Some(Driver::MySql) => {
                    let url = url.strip_prefix("mariadb").map_or_else(
                        || url.clone(),
                        |rest| format!("mysql{rest}"),
                    );
                    Self::MySql(
                        MySqlPoolOptions::new()
                            .max_connections(1)
                            .connect(&url)
                            .await
                            .map_err(connect_err)?,
                    )
                }
                Some(Driver::Postgres) => Self::Postgres(
                    PgPoolOptions::new()
                        .max_connections(1)
                        .connect(url)
                        .await
                        .map_err(connect_err)?,
                ),
                Some(Driver::Sqlite) => Self::Sqlite(
                    SqlitePoolOptions::new()
                        .max_connections(1)
                        .connect(url)
                        .await
                        .map_err(connect_err)?,
                ),
                None => {
                    return Err(PatternError::Database(format!(
                        "unsupported database URL '{}'",
                        redact(url)
                    )))
                }
            },
            DatabaseTarget::MySql(options) => Self::MySql(
                MySqlPoolOptions::new()
                    .max_connections(1)
                    .connect_with(options.clone())
                    .await
                    .map_err(connect_err)?,
            ),
            DatabaseTarget::Postgres(options) => Self::Postgres(
                PgPoolOptions::new()
                    .max_connections(1)
                    .connect_with(options.clone())
                    .await
                    .map_err(connect_err)?,
            ),
            DatabaseTarget::Sqlite(options) => Self::Sqlite(
                SqlitePoolOptions::new()
                    .max_connections(1)
                    .connect_with(options.clone())
                    .await
                    .map_err(connect_err)?,
            ),
        };

        tracing::debug!(driver = inspector.driver_name(), "database connected");
        Ok(inspector)
    }

    const fn driver_name(&self) -> &'static str {
        match self {
            Self::MySql(_) => "mysql",
            Self::Postgres(_) => "postgres",
            Self::Sqlite(_) => "sqlite",
        }
    }

    async fn query_columns(&self, schema: Option<&str>, table: &str) -> sqlx::Result<Vec<Column>> {
        let yes = |value: String| value.eq_ignore_ascii_case("YES");

        match self {
            Self::MySql(pool) => {
                let rows = sqlx::query(MYSQL_COLUMNS)
                    .bind(schema)
                    .bind(table)
                    .fetch_all(pool)
                    .await?;
                rows.iter()
                    .map(|row| {
                        Ok(Column::new(
                            row.try_get::<String, _>("name")?,
                            row.try_get::<String, _>("data_type")?,
                            yes(row.try_get("nullable")?),
                        ))
                    })
                    .collect()
            }
            Self::Postgres(pool) => {
                let rows = sqlx::query(POSTGRES_COLUMNS)
                    .bind(schema)
                    .bind(table)
                    .fetch_all(pool)
                    .await?;
                rows.iter()
                    .map(|row| {
                        Ok(Column::new(
                            row.try_get::<String, _>("name")?,
                            row.try_get::<String, _>("data_type")?,
                            yes(row.try_get("nullable")?),
                        ))
                    })
                    .collect()
            }
            Self::Sqlite(pool) => {
                let query = match schema {
                    Some(schema) => sqlx::query(SQLITE_SCHEMA_COLUMNS).bind(table).bind(schema),
                    None => sqlx::query(SQLITE_COLUMNS).bind(table),
                };
                let rows = query.fetch_all(pool).await?;
                rows.iter()
                    .map(|row| {
                        Ok(Column::new(
                            row.try_get::<String, _>("name")?,
                            row.try_get::<String, _>("data_type")?,
                            row.try_get::<i64, _>("not_null")? == 0,
                        ))
                    })
                    .collect()
            }
        }
    }
}

#[async_trait]
impl SchemaInspector for SqlxInspector {
    async fn columns(&self, table: &str) -> Result<Vec<Column>> {
        validate_table_name(table)?;
        let (schema, name) = split_qualified(table);

        let columns = self
            .query_columns(schema, name)
            .await
            .map_err(|source| PatternError::SchemaLookup {
                table: table.to_string(),
                source,
            })?;

        if columns.is_empty() {
            return Err(PatternError::TableNotFound(table.to_string()));
        }
        tracing::debug!(table, count = columns.len(), "columns loaded");
        Ok(columns)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn sqlite_with_users() -> SqlxInspector {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        sqlx::query(
            "CREATE TABLE users (
                id INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                email VARCHAR(255) NOT NULL,
                bio TEXT,
                created_at TIMESTAMP,
                updated_at TIMESTAMP
            )",
        )
        .execute(&pool)
        .await
        .unwrap();
        SqlxInspector::Sqlite(pool)
    }

    #[tokio::test]
    async fn test_sqlite_columns_in_order() {
        let inspector = sqlite_with_users().await;
        let columns = inspector.columns("users").await.unwrap();

        let names: Vec<_> = columns.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["id", "name", "email", "bio", "created_at", "updated_at"]);
        assert_eq!(columns[2].data_type, "VARCHAR(255)");
        assert!(!columns[1].nullable);
        assert!(columns[3].nullable);
    }

    #[tokio::test]
    async fn test_sqlite_schema_qualified_table() {
        let inspector = sqlite_with_users().await;
        let columns = inspector.columns("main.users").await.unwrap();
        assert_eq!(columns.len(), 6);
    }

    #[tokio::test]
    async fn test_sqlite_missing_table() {
        let inspector = sqlite_with_users().await;
        let err = inspector.columns("posts").await.unwrap_err();
        assert!(matches!(err, PatternError::TableNotFound(t) if t == "posts"));
    }

    #[tokio::test]
    async fn test_invalid_table_never_reaches_database() {
        let inspector = sqlite_with_users().await;
        let err = inspector.columns("users--").await.unwrap_err();
        assert!(matches!(err, PatternError::InvalidTable(_)));
    }

    #[tokio::test]
    async fn test_connect_sqlite_url() {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite://{}?mode=rwc", dir.path().join("app.db").display());
        let target = DatabaseTarget::from_url(&url).unwrap();
        let inspector = SqlxInspector::connect(&target).await.unwrap();
        assert_eq!(inspector.driver_name(), "sqlite");
    }

    #[test]
    fn test_from_url_rejects_unknown_scheme() {
        assert!(DatabaseTarget::from_url("mysql://root@localhost/shop").is_ok());
        assert!(DatabaseTarget::from_url("postgresql://localhost/shop").is_ok());
        assert!(DatabaseTarget::from_url("sqlite::memory:").is_ok());

        let err = DatabaseTarget::from_url("oracle://scott:tiger@db/orcl").unwrap_err();
        assert!(!err.to_string().contains("tiger"));
    }

    #[test]
    fn test_from_env_map() {
        let root = Path::new("/srv/shop");
        let vars = |pairs: &[(&str, &str)]| -> HashMap<String, String> {
            pairs
                .iter()
                .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                .collect()
        };

        let mysql = DatabaseTarget::from_env_map(
            &vars(&[("DB_DATABASE", "shop"), ("DB_PASSWORD", "secret")]),
            root,
        )
        .unwrap();
        assert!(matches!(mysql, DatabaseTarget::MySql(_)));

        let pg = DatabaseTarget::from_env_map(
            &vars(&[("DB_CONNECTION", "pgsql"), ("DB_DATABASE", "shop"), ("DB_PORT", "6432")]),
            root,
        )
        .unwrap();
        assert!(matches!(pg, DatabaseTarget::Postgres(_)));

        let sqlite =
            DatabaseTarget::from_env_map(&vars(&[("DB_CONNECTION", "sqlite")]), root).unwrap();
        match sqlite {
            DatabaseTarget::Sqlite(options) => assert_eq!(
                options.get_filename(),
                Path::new("/srv/shop/database/database.sqlite")
            ),
            other => panic!("expected sqlite target, got {other:?}"),
        }

        assert!(DatabaseTarget::from_env_map(&vars(&[]), root).is_err());
        assert!(DatabaseTarget::from_env_map(
            &vars(&[("DB_DATABASE", "shop"), ("DB_PORT", "abc")]),
            root
        )
        .is_err());
        assert!(DatabaseTarget::from_env_map(&vars(&[("DB_CONNECTION", "sqlsrv")]), root).is_err());
    }

    #[test]
    fn test_redact() {
        assert_eq!(redact("mysql://root:pw@db:3306/shop"), "mysql://***@db:3306/shop");
        assert_eq!(redact("sqlite://shop.db"), "sqlite://shop.db");
    }
}
