//! 通讯录模块
//!
//! 远端用户目录 + 本地收藏夹 + 列表过滤/搜索

pub mod api;
pub mod dao;
pub mod listener;
pub mod models;
pub mod projection;
pub mod service;
pub mod store;
pub mod types;

// 重新导出主要类型和函数
pub use api::{DirectoryApi, DirectoryRemote};
pub use dao::KvDao;
pub use listener::{DirectoryListener, EmptyDirectoryListener, Notice};
pub use models::{
    derive_email, DirectoryConfig, DirectoryState, FavoriteSet, LoadPhase, User, FAVORITES_KEY,
};
pub use projection::{project, DirectoryStats, EmptyReason};
pub use service::DirectoryController;
pub use store::{FavoritesStore, SqliteFavoritesStore};
