pub mod directory;

// 重新导出常用类型，方便外部使用
pub use directory::contact::{
    DirectoryConfig, DirectoryController, DirectoryListener, FavoriteSet, Notice, User,
};
pub use directory::{DirectoryError, DirectoryResult};
