//! 目录模块错误类型

/// 通讯录各层对外暴露的错误
///
/// 内部细节只写日志，对用户展示的提示见 [`crate::directory::contact::Notice`]。
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum DirectoryError {
    /// 名称为空（去除首尾空白后），在任何网络请求之前拦截
    #[error("名称不能为空")]
    Validation,
    /// 拉取用户列表失败
    #[error("拉取用户列表失败: {0}")]
    RemoteFetch(String),
    /// 创建用户失败
    #[error("创建用户失败: {0}")]
    RemoteCreate(String),
    /// 本地存储读写失败
    #[error("本地存储失败: {0}")]
    Persistence(String),
}

impl From<sqlx::Error> for DirectoryError {
    fn from(e: sqlx::Error) -> Self {
        Self::Persistence(e.to_string())
    }
}

pub type DirectoryResult<T> = std::result::Result<T, DirectoryError>;
