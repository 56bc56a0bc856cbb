//! 收藏夹持久化

use crate::directory::contact::dao::KvDao;
use crate::directory::contact::models::FavoriteSet;
use crate::directory::error::{DirectoryError, DirectoryResult};
use async_trait::async_trait;
use tracing::{debug, error, warn};

/// 收藏夹存储
#[async_trait]
pub trait FavoritesStore: Send + Sync {
    /// 读取收藏夹；键不存在或内容无法解析时返回空集合
    async fn load(&self) -> DirectoryResult<FavoriteSet>;

    /// 整值覆盖写入
    async fn save(&self, favorites: &FavoriteSet) -> DirectoryResult<()>;

    /// 删除键，之后 `load` 返回空集合
    async fn clear(&self) -> DirectoryResult<()>;
}

/// 基于本地键值表的收藏夹存储
pub struct SqliteFavoritesStore {
    dao: KvDao,
    key: String,
}

impl SqliteFavoritesStore {
    pub fn new(dao: KvDao, key: String) -> Self {
        Self { dao, key }
    }

    /// 存储键当前是否存在
    pub async fn has_value(&self) -> DirectoryResult<bool> {
        self.dao.contains_key(&self.key).await.map_err(persistence)
    }
}

fn persistence(e: anyhow::Error) -> DirectoryError {
    error!("[FavoritesDAO] 本地存储失败: {:#}", e);
    DirectoryError::Persistence(format!("{:#}", e))
}

#[async_trait]
impl FavoritesStore for SqliteFavoritesStore {
    async fn load(&self) -> DirectoryResult<FavoriteSet> {
        let Some(raw) = self.dao.get_item(&self.key).await.map_err(persistence)? else {
            debug!("[FavoritesDAO] 无收藏记录，使用空集合");
            return Ok(FavoriteSet::new());
        };

        match serde_json::from_str::<FavoriteSet>(&raw) {
            Ok(favorites) => {
                debug!("[FavoritesDAO] 读取收藏 {} 个", favorites.len());
                Ok(favorites)
            }
            Err(e) => {
                warn!(
                    "[FavoritesDAO] 收藏内容无法解析，按空集合处理: {:?}, 原始内容: {}",
                    e, raw
                );
                Ok(FavoriteSet::new())
            }
        }
    }

    async fn save(&self, favorites: &FavoriteSet) -> DirectoryResult<()> {
        let json = serde_json::to_string(favorites)
            .map_err(|e| DirectoryError::Persistence(e.to_string()))?;
        self.dao
            .set_item(&self.key, &json)
            .await
            .map_err(persistence)
    }

    async fn clear(&self) -> DirectoryResult<()> {
        self.dao.remove_item(&self.key).await.map_err(persistence)
    }
}
