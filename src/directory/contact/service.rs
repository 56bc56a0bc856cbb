//! 通讯录状态控制层
//!
//! 持有内存中的用户列表与收藏集合，负责加载、刷新、收藏切换、清空收藏和添加用户，
//! 并通过监听器把状态变化和提示推给展示层。

use crate::directory::contact::api::{DirectoryApi, DirectoryRemote};
use crate::directory::contact::dao::KvDao;
use crate::directory::contact::listener::{DirectoryListener, EmptyDirectoryListener, Notice};
use crate::directory::contact::models::{DirectoryConfig, DirectoryState, LoadPhase, User};
use crate::directory::contact::projection::{self, DirectoryStats, EmptyReason};
use crate::directory::contact::store::{FavoritesStore, SqliteFavoritesStore};
use crate::directory::db::create_sqlite_pool_with_migration;
use crate::directory::error::{DirectoryError, DirectoryResult};
use anyhow::{Context, Result};
use chrono::Utc;
use sqlx::{Pool, Sqlite};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SyncKind {
    Initial,
    Refresh,
}

/// 通讯录控制器
///
/// 状态锁不会跨网络请求持有。收藏写入经过单独的写锁串行化，
/// 每次写入的都是拿到写锁那一刻的内存集合，因此存储最终与内存一致。
/// 远端请求之间不排队，最后完成的响应覆盖共享状态。
pub struct DirectoryController {
    remote: Arc<dyn DirectoryRemote>,
    store: Arc<dyn FavoritesStore>,
    listener: Arc<dyn DirectoryListener>,
    state: Mutex<DirectoryState>,
    writer: Mutex<()>,
}

impl DirectoryController {
    /// 创建新的控制器（使用默认空监听器）
    pub async fn new(config: DirectoryConfig) -> Result<Self> {
        Self::with_listener(config, Arc::new(EmptyDirectoryListener)).await
    }

    /// 创建新的控制器（带自定义监听器，内部创建连接池）
    pub async fn with_listener(
        config: DirectoryConfig,
        listener: Arc<dyn DirectoryListener>,
    ) -> Result<Self> {
        info!(
            "[DirectorySync] 创建通讯录控制器，API: {}, SQLite数据库: {}",
            config.api_base_url, config.db_url
        );
        let db = create_sqlite_pool_with_migration(&config.db_url).await?;
        Self::with_listener_and_db(config, listener, db)
    }

    /// 创建新的控制器（使用共享连接池）
    pub fn with_listener_and_db(
        config: DirectoryConfig,
        listener: Arc<dyn DirectoryListener>,
        db: Pool<Sqlite>,
    ) -> Result<Self> {
        let http_client = reqwest::ClientBuilder::new()
            .build()
            .context("创建 HTTP 客户端失败")?;

        let remote = DirectoryApi::new(http_client, config.api_base_url);
        let store = SqliteFavoritesStore::new(KvDao::new(db), config.favorites_key);

        Ok(Self::from_parts(Arc::new(remote), Arc::new(store), listener))
    }

    /// 用现成的远端与存储组装控制器
    pub fn from_parts(
        remote: Arc<dyn DirectoryRemote>,
        store: Arc<dyn FavoritesStore>,
        listener: Arc<dyn DirectoryListener>,
    ) -> Self {
        Self {
            remote,
            store,
            listener,
            state: Mutex::new(DirectoryState::default()),
            writer: Mutex::new(()),
        }
    }

    /// 启动加载：并发拉取用户列表与读取本地收藏
    pub async fn load(&self) -> DirectoryResult<()> {
        self.sync(SyncKind::Initial).await
    }

    /// 下拉刷新：新数据到达前保留当前列表
    pub async fn refresh(&self) -> DirectoryResult<()> {
        self.sync(SyncKind::Refresh).await
    }

    async fn sync(&self, kind: SyncKind) -> DirectoryResult<()> {
        info!("[DirectorySync] 🔄 开始同步通讯录 ({:?})", kind);

        let (loading, refreshing, generation) = {
            let mut state = self.state.lock().await;
            state.phase = LoadPhase::Loading;
            match kind {
                SyncKind::Initial => state.is_loading = true,
                SyncKind::Refresh => state.is_refreshing = true,
            }
            (
                state.is_loading,
                state.is_refreshing,
                state.favorites_generation,
            )
        };
        self.listener.on_loading_changed(loading, refreshing).await;

        let (fetched, stored) = tokio::join!(self.remote.fetch_all(), self.store.load());

        let (result, users_json, favorites_json, loading, refreshing) = {
            let mut state = self.state.lock().await;

            // 读取期间本地已切换/清空过收藏时，读到的是旧值，保留内存
            match stored {
                Ok(_) if state.favorites_generation != generation => debug!(
                    "[DirectorySync] 加载期间收藏已变更，忽略读取到的旧收藏"
                ),
                Ok(favorites) => state.favorites = favorites,
                Err(e) => warn!(
                    "[DirectorySync] 读取本地收藏失败，保留当前收藏({} 个): {}",
                    state.favorites.len(),
                    e
                ),
            }

            match kind {
                SyncKind::Initial => state.is_loading = false,
                SyncKind::Refresh => state.is_refreshing = false,
            }

            let result = match fetched {
                Ok(users) => {
                    info!(
                        "[DirectorySync] ✅ 通讯录同步完成，用户数: {}, 收藏数: {}",
                        users.len(),
                        state.favorites.len()
                    );
                    state.users = users;
                    state.phase = LoadPhase::Ready;
                    state.last_loaded_at = Some(Utc::now());
                    Ok(())
                }
                Err(e) => {
                    error!(
                        "[DirectorySync] 通讯录同步失败，保留当前列表({} 个): {}",
                        state.users.len(),
                        e
                    );
                    state.phase = LoadPhase::LoadFailed;
                    Err(e)
                }
            };

            (
                result,
                serde_json::to_string(&state.users),
                serde_json::to_string(&state.favorites),
                state.is_loading,
                state.is_refreshing,
            )
        };

        if result.is_ok() {
            if let Ok(json) = users_json {
                self.listener.on_user_list_changed(json).await;
            }
        }
        if let Ok(json) = favorites_json {
            self.listener.on_favorites_changed(json).await;
        }
        self.listener.on_loading_changed(loading, refreshing).await;
        if result.is_err() {
            self.listener.on_notice(Notice::LoadFailed).await;
        }

        result
    }

    /// 切换收藏，立即反映到内存，然后持久化；返回切换后是否为收藏
    ///
    /// 持久化失败不回滚内存状态，只提示用户。
    pub async fn toggle_favorite(&self, user_id: i64) -> bool {
        let (is_favorite, favorites_json) = {
            let mut state = self.state.lock().await;
            let is_favorite = state.favorites.toggle(user_id);
            state.favorites_generation += 1;
            (is_favorite, serde_json::to_string(&state.favorites))
        };
        debug!(
            "[DirectorySync] 切换收藏 {} -> {}",
            user_id,
            if is_favorite { "收藏" } else { "取消收藏" }
        );

        if let Ok(json) = favorites_json {
            self.listener.on_favorites_changed(json).await;
        }

        if let Err(e) = self.persist_favorites().await {
            error!("[DirectorySync] 收藏保存失败，内存状态保持不变: {}", e);
            self.listener.on_notice(Notice::SaveFailed).await;
        }

        is_favorite
    }

    async fn persist_favorites(&self) -> DirectoryResult<()> {
        let _writer = self.writer.lock().await;
        let snapshot = self.state.lock().await.favorites.clone();
        self.store.save(&snapshot).await
    }

    /// 清空全部收藏（需要用户二次确认）
    ///
    /// 返回 `Ok(false)` 表示用户取消。存储删除失败时内存仍然清空，并返回错误。
    pub async fn clear_all_favorites(&self) -> DirectoryResult<bool> {
        if !self.listener.confirm_clear_favorites().await {
            info!("[DirectorySync] 用户取消清空收藏");
            return Ok(false);
        }

        let result = {
            let _writer = self.writer.lock().await;
            let result = self.store.clear().await;
            let mut state = self.state.lock().await;
            state.favorites.clear();
            state.favorites_generation += 1;
            drop(state);
            result
        };
        self.listener.on_favorites_changed("[]".to_string()).await;

        match result {
            Ok(()) => {
                info!("[DirectorySync] ✅ 已清空全部收藏");
                self.listener.on_notice(Notice::FavoritesCleared).await;
                Ok(true)
            }
            Err(e) => {
                error!("[DirectorySync] 清空收藏失败（内存已清空）: {}", e);
                self.listener.on_notice(Notice::ClearFailed).await;
                Err(e)
            }
        }
    }

    /// 添加用户：成功后插入列表最前面，不重新拉取，不影响收藏
    pub async fn add_user(&self, name: &str) -> DirectoryResult<User> {
        if name.trim().is_empty() {
            debug!("[DirectorySync] 名称为空，拒绝添加");
            self.listener.on_notice(Notice::NameRequired).await;
            return Err(DirectoryError::Validation);
        }

        let user = match self.remote.create(name).await {
            Ok(user) => user,
            Err(DirectoryError::Validation) => {
                self.listener.on_notice(Notice::NameRequired).await;
                return Err(DirectoryError::Validation);
            }
            Err(e) => {
                error!("[DirectorySync] 添加用户失败: {}", e);
                self.listener.on_notice(Notice::AddFailed).await;
                return Err(e);
            }
        };

        let users_json = {
            let mut state = self.state.lock().await;
            state.users.insert(0, user.clone());
            serde_json::to_string(&state.users)
        };
        info!(
            "[DirectorySync] ✅ 新增用户: {} (ID: {}, 邮箱: {})",
            user.name, user.id, user.email
        );

        if let Ok(json) = users_json {
            self.listener.on_user_list_changed(json).await;
        }
        self.listener
            .on_notice(Notice::UserAdded {
                name: user.name.clone(),
            })
            .await;

        Ok(user)
    }

    pub async fn set_search_query(&self, query: impl Into<String>) {
        self.state.lock().await.search_query = query.into();
    }

    pub async fn set_show_favorites_only(&self, show: bool) {
        self.state.lock().await.show_favorites_only = show;
    }

    /// 切换“仅看收藏”，返回切换后的值
    pub async fn toggle_show_favorites_only(&self) -> bool {
        let mut state = self.state.lock().await;
        state.show_favorites_only = !state.show_favorites_only;
        state.show_favorites_only
    }

    pub async fn is_favorite(&self, user_id: i64) -> bool {
        self.state.lock().await.favorites.contains(user_id)
    }

    /// 当前状态快照
    pub async fn state(&self) -> DirectoryState {
        self.state.lock().await.clone()
    }

    /// 按当前过滤与搜索条件计算的展示列表
    pub async fn visible_users(&self) -> Vec<User> {
        let state = self.state.lock().await;
        projection::project(
            &state.users,
            &state.favorites,
            state.show_favorites_only,
            &state.search_query,
        )
        .into_iter()
        .cloned()
        .collect()
    }

    pub async fn stats(&self) -> DirectoryStats {
        let state = self.state.lock().await;
        projection::stats(
            &state.users,
            &state.favorites,
            state.show_favorites_only,
            &state.search_query,
        )
    }

    /// 展示列表为空时的原因
    pub async fn empty_reason(&self) -> Option<EmptyReason> {
        let state = self.state.lock().await;
        projection::empty_reason(
            &state.users,
            &state.favorites,
            state.show_favorites_only,
            &state.search_query,
        )
    }
}
