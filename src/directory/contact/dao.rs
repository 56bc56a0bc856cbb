//! 本地键值数据访问层（DAO）
//!
//! 单键单值的字符串存储，写入是整值覆盖，删除即移除整行。

use anyhow::{Context, Result};
use sqlx::{Pool, Row, Sqlite};
use tracing::debug;

/// 键值 DAO（基于 sqlx）
#[derive(Clone)]
pub struct KvDao {
    db: Pool<Sqlite>,
}

impl KvDao {
    /// 创建新的键值 DAO，表结构由 sqlx migration 管理
    pub fn new(db: Pool<Sqlite>) -> Self {
        Self { db }
    }

    /// 读取键对应的值，不存在时返回 None
    pub async fn get_item(&self, key: &str) -> Result<Option<String>> {
        let row = sqlx::query(
            r#"
            SELECT value FROM local_kv WHERE key = ?
            "#,
        )
        .bind(key)
        .fetch_optional(&self.db)
        .await
        .context("查询本地键值失败")?;

        let value = row.map(|m| m.get::<String, _>("value"));
        debug!(
            "[KvDAO] 读取键 {}，{}",
            key,
            if value.is_some() { "命中" } else { "不存在" }
        );
        Ok(value)
    }

    /// 写入键值（单条语句 upsert，整值覆盖）
    pub async fn set_item(&self, key: &str, value: &str) -> Result<()> {
        let sql = r#"
            INSERT INTO local_kv (key, value) VALUES (?, ?)
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value
        "#;

        sqlx::query(sql)
            .bind(key)
            .bind(value)
            .execute(&self.db)
            .await
            .context("写入本地键值失败")?;
        debug!("[KvDAO] 写入键 {}: {}", key, value);
        Ok(())
    }

    /// 删除键
    pub async fn remove_item(&self, key: &str) -> Result<()> {
        sqlx::query(
            r#"
            DELETE FROM local_kv WHERE key = ?
            "#,
        )
        .bind(key)
        .execute(&self.db)
        .await
        .context("删除本地键值失败")?;
        debug!("[KvDAO] 删除键 {}", key);
        Ok(())
    }

    /// 键是否存在
    pub async fn contains_key(&self, key: &str) -> Result<bool> {
        Ok(self.get_item(key).await?.is_some())
    }
}
