//! 通讯录监听器回调接口

use async_trait::async_trait;
use serde::Serialize;

/// 面向用户的提示（单按钮弹窗）
///
/// 只给出笼统的失败描述，原始错误只写日志。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Notice {
    /// 拉取用户列表失败
    LoadFailed,
    /// 添加用户时名称为空
    NameRequired,
    /// 用户添加成功
    UserAdded { name: String },
    /// 添加用户失败
    AddFailed,
    /// 收藏保存失败
    SaveFailed,
    /// 收藏已全部清空
    FavoritesCleared,
    /// 清空收藏失败
    ClearFailed,
}

impl Notice {
    pub fn title(&self) -> &'static str {
        match self {
            Self::UserAdded { .. } | Self::FavoritesCleared => "成功",
            _ => "错误",
        }
    }

    pub fn message(&self) -> String {
        match self {
            Self::LoadFailed => "无法加载数据".to_string(),
            Self::NameRequired => "请输入名称".to_string(),
            Self::UserAdded { name } => format!("用户“{}”添加成功！", name),
            Self::AddFailed => "无法添加用户".to_string(),
            Self::SaveFailed => "无法保存收藏".to_string(),
            Self::FavoritesCleared => "所有收藏已清空".to_string(),
            Self::ClearFailed => "无法清空收藏".to_string(),
        }
    }

    pub fn is_error(&self) -> bool {
        !matches!(self, Self::UserAdded { .. } | Self::FavoritesCleared)
    }
}

/// 通讯录监听器回调接口（由展示层实现）
#[async_trait]
pub trait DirectoryListener: Send + Sync {
    /// 用户列表发生变更，参数为 JSON 数组字符串
    async fn on_user_list_changed(&self, users_json: String);

    /// 收藏集合发生变更，参数为 JSON 数组字符串
    async fn on_favorites_changed(&self, favorites_json: String);

    /// 加载/刷新状态变更
    async fn on_loading_changed(&self, loading: bool, refreshing: bool);

    /// 需要向用户展示的提示
    async fn on_notice(&self, notice: Notice);

    /// 清空全部收藏前的二次确认（取消 / 确认清空），返回 true 才执行
    async fn confirm_clear_favorites(&self) -> bool;
}

/// 默认空实现（无操作，清空确认一律拒绝）
pub struct EmptyDirectoryListener;

#[async_trait]
impl DirectoryListener for EmptyDirectoryListener {
    async fn on_user_list_changed(&self, _users_json: String) {
        // 默认不做任何处理
    }

    async fn on_favorites_changed(&self, _favorites_json: String) {
        // 默认不做任何处理
    }

    async fn on_loading_changed(&self, _loading: bool, _refreshing: bool) {
        // 默认不做任何处理
    }

    async fn on_notice(&self, _notice: Notice) {
        // 默认不做任何处理
    }

    async fn confirm_clear_favorites(&self) -> bool {
        false
    }
}
