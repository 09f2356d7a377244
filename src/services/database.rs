use crate::models::{RowDump, User};
use anyhow::{Context, Result};
use rusqlite::types::Value;
use rusqlite::{params, Connection};
use std::path::Path;

/// 演示用的 SQLite 连接，生命周期与一次请求（或一次初始化）相同
pub struct Database {
    conn: Connection,
}

impl Database {
    /// 打开数据库文件，不存在时自动创建
    pub fn new(db_path: impl AsRef<Path>) -> Result<Self> {
        let db_path = db_path.as_ref();

        // 确保父目录存在
        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(db_path)
            .with_context(|| format!("Failed to open database {}", db_path.display()))?;

        Ok(Self { conn })
    }

    /// 建表并写入演示数据
    pub fn init_db(db_path: impl AsRef<Path>) -> Result<()> {
        let db = Self::new(db_path)?;
        db.initialize_schema()?;
        db.insert_user(&User::admin())?;
        db.close()
    }

    /// 初始化数据库架构
    ///
    /// `id` 上没有主键或唯一约束，`INSERT OR IGNORE` 因此不会去重。
    fn initialize_schema(&self) -> Result<()> {
        self.conn
            .execute("CREATE TABLE IF NOT EXISTS users (id TEXT, name TEXT)", [])
            .context("Failed to create users table")?;
        Ok(())
    }

    pub fn insert_user(&self, user: &User) -> Result<()> {
        self.conn.execute(
            "INSERT OR IGNORE INTO users (id, name) VALUES (?1, ?2)",
            params![user.id, user.name],
        )?;
        Ok(())
    }

    /// 执行一条原样传入的 SQL，只取第一行的全部列
    pub fn query_first_row(&self, sql: &str) -> Result<RowDump> {
        let mut stmt = self.conn.prepare(sql)?;
        let column_count = stmt.column_count();
        let mut rows = stmt.query([])?;

        match rows.next()? {
            Some(row) => {
                let values = (0..column_count)
                    .map(|i| row.get::<_, Value>(i))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(RowDump(Some(values)))
            }
            None => Ok(RowDump::empty()),
        }
    }

    #[cfg(test)]
    fn count_users(&self) -> Result<i64> {
        let count = self
            .conn
            .query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))?;
        Ok(count)
    }

    /// 显式关闭连接，暴露关闭时的错误
    pub fn close(self) -> Result<()> {
        self.conn
            .close()
            .map_err(|(_, e)| e)
            .context("Failed to close database")
    }
}
