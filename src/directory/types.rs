use anyhow::Context;
use serde::de::DeserializeOwned;
use tracing::{debug, error, info};

/// 请求头：每个请求携带的操作 ID，便于日志关联
pub const OPERATION_ID_HEADER: &str = "operationID";

/// 通用 HTTP 响应处理函数：检查状态码并把 body 反序列化为 `T`
///
/// body 只能读取一次，先读成 bytes 再打印、再反序列化。
pub async fn handle_http_response<T: DeserializeOwned>(
    response: reqwest::Response,
    operation_name: &str,
) -> anyhow::Result<T> {
    let status = response.status();

    let body_bytes = response.bytes().await.context("读取响应 body 失败")?;
    let body_str = String::from_utf8_lossy(&body_bytes);
    debug!("[HTTP] {}响应 Body: {}", operation_name, body_str);

    if !status.is_success() {
        error!(
            "[HTTP] {}请求失败，HTTP状态: {}, 响应: {}",
            operation_name, status, body_str
        );
        return Err(anyhow::anyhow!("HTTP 错误 {}: {}", status, body_str));
    }
    info!("[HTTP] {}请求成功，HTTP状态: {}", operation_name, status);

    serde_json::from_slice(&body_bytes).map_err(|e| {
        error!(
            "[HTTP] {}反序列化失败: {:?}\n原始响应: {}",
            operation_name, e, body_str
        );
        anyhow::anyhow!("反序列化响应失败: {:?}", e)
    })
}
