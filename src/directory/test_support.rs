use std::sync::Once;

static INIT_LOGGER: Once = Once::new();

/// 测试日志：打开当前 crate 的 debug，关闭底层 HTTP 客户端的 debug 噪音
pub(crate) fn init_test_logger() {
    INIT_LOGGER.call_once(|| {
        use tracing_subscriber::prelude::*;
        use tracing_subscriber::EnvFilter;

        let filter_layer = EnvFilter::new(
            "info,contact_directory=debug,sqlx=warn,hyper_util::client=info,reqwest=info",
        );

        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_file(true)
            .with_line_number(true)
            .with_target(false)
            .with_test_writer();

        let _ = tracing_subscriber::registry()
            .with(filter_layer)
            .with(fmt_layer)
            .try_init();
    });
}
