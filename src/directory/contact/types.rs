//! 通讯录 API DTO（请求和响应结构体）

use serde::{Deserialize, Deserializer, Serialize};

/// 反序列化字符串字段，null 与缺失都视为 None，空字符串同样视为 None
pub(crate) fn deserialize_non_empty_string<'de, D>(
    deserializer: D,
) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|s| !s.trim().is_empty()))
}

/// 创建用户请求体
#[derive(Debug, Clone, Serialize)]
pub struct CreateUserReq<'a> {
    pub name: &'a str,
    pub email: &'a str,
}

/// 创建用户响应（服务器至少返回 id，email 可能不回显）
#[derive(Debug, Clone, Deserialize)]
pub struct CreateUserResp {
    pub id: i64,
    #[serde(default, deserialize_with = "deserialize_non_empty_string")]
    pub email: Option<String>,
}
