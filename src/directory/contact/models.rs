//! 通讯录本地模型定义

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// 收藏夹在本地键值表中的固定键
pub const FAVORITES_KEY: &str = "@my_favorites_ids";

/// 默认远端目录服务地址
pub const DEFAULT_API_BASE_URL: &str = "https://jsonplaceholder.typicode.com";

/// 默认本地数据库 URL
pub const DEFAULT_DB_URL: &str = "sqlite://directory.db?mode=rwc";

/// 服务器未返回邮箱时，本地生成邮箱使用的域名
pub const DERIVED_EMAIL_DOMAIN: &str = "example.com";

/// 用户（来自远端目录服务）
///
/// 服务器返回的其余字段（address、phone、company 等）直接忽略。
/// 缺失或为 null 的 email 反序列化为空字符串，由 API 层按名称补齐。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    #[serde(default, deserialize_with = "deserialize_string_or_null")]
    pub email: String,
}

fn deserialize_string_or_null<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// 根据名称生成邮箱：小写，连续空白替换为单个 `.`，追加固定域名
///
/// 只是展示用的默认值，不做任何邮箱合法性校验。
pub fn derive_email(name: &str) -> String {
    let local = name
        .trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(".");
    format!("{}@{}", local, DERIVED_EMAIL_DOMAIN)
}

/// 收藏的用户 ID 集合
///
/// 序列化为升序整数数组，例如 `[1,3,7]`。允许包含已不在目录中的 ID。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FavoriteSet(BTreeSet<i64>);

impl FavoriteSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: i64) -> bool {
        self.0.contains(&id)
    }

    /// 切换收藏状态，返回切换后是否处于收藏
    pub fn toggle(&mut self, id: i64) -> bool {
        if self.0.remove(&id) {
            false
        } else {
            self.0.insert(id);
            true
        }
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = i64> + '_ {
        self.0.iter().copied()
    }
}

impl FromIterator<i64> for FavoriteSet {
    fn from_iter<I: IntoIterator<Item = i64>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// 加载阶段
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum LoadPhase {
    #[default]
    Idle,
    Loading,
    Ready,
    LoadFailed,
}

/// 目录状态（仅存在于进程生命周期内）
#[derive(Debug, Clone, Default)]
pub struct DirectoryState {
    /// 用户列表：新创建的在前，其余保持服务器顺序
    pub users: Vec<User>,
    pub favorites: FavoriteSet,
    /// 收藏的本地修改代数，每次切换或清空递增
    pub favorites_generation: u64,
    pub phase: LoadPhase,
    /// 首次加载指示
    pub is_loading: bool,
    /// 下拉刷新指示，与 `is_loading` 互相独立
    pub is_refreshing: bool,
    pub search_query: String,
    pub show_favorites_only: bool,
    /// 最近一次成功拉取的时间
    pub last_loaded_at: Option<DateTime<Utc>>,
}

/// 通讯录配置
#[derive(Debug, Clone)]
pub struct DirectoryConfig {
    /// 远端目录服务基础 URL
    pub api_base_url: String,
    /// 本地 SQLite 数据库 URL，例如 `sqlite://directory.db?mode=rwc`
    pub db_url: String,
    /// 收藏夹存储键
    pub favorites_key: String,
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            db_url: DEFAULT_DB_URL.to_string(),
            favorites_key: FAVORITES_KEY.to_string(),
        }
    }
}
