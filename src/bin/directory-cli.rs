//! 通讯录 CLI 客户端
//!
//! 非交互式 CLI，用于演示通讯录功能：
//! 每次运行先加载远端用户列表与本地收藏，再执行子命令，最后输出当前展示列表

use anyhow::Result;
use clap::{Parser, Subcommand};
use contact_directory::directory::contact::models::{DEFAULT_API_BASE_URL, DEFAULT_DB_URL};
use contact_directory::directory::contact::{
    DirectoryConfig, DirectoryController, DirectoryListener, Notice,
};
use std::sync::Arc;
use tracing::{error, info, warn};

/// 通讯录 CLI 客户端
#[derive(Parser, Debug)]
#[command(name = "directory-cli")]
#[command(about = "通讯录 CLI 客户端 - 拉取、收藏、搜索、添加联系人", long_about = None)]
struct Args {
    /// 远端目录服务地址
    #[arg(long, default_value = DEFAULT_API_BASE_URL)]
    api_base_url: String,

    /// 本地 SQLite 数据库 URL
    #[arg(long, default_value = DEFAULT_DB_URL)]
    db_url: String,

    /// 日志级别（默认: info,contact_directory=debug）
    #[arg(long, default_value = "info,contact_directory=debug")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// 列出联系人
    List {
        /// 仅看收藏
        #[arg(short, long)]
        favorites: bool,
        /// 按名称或邮箱搜索
        #[arg(short, long)]
        search: Option<String>,
    },
    /// 切换某个用户的收藏状态
    Toggle { id: i64 },
    /// 添加用户
    Add { name: String },
    /// 清空全部收藏
    Clear {
        /// 确认清空（不加则视为取消）
        #[arg(long)]
        yes: bool,
    },
}

/// 初始化日志（同时输出到 stdout 和文件）
fn init_logger(log_level: &str) -> Result<()> {
    use std::fs::OpenOptions;
    use std::io;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    // 优先使用环境变量 RUST_LOG（如果设置了），否则使用命令行参数
    let filter_layer =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open("directory.log")?;

    let stdout_layer = tracing_subscriber::fmt::layer()
        .with_writer(io::stdout)
        .with_target(false)
        .with_ansi(true);

    // 文件不需要颜色
    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(log_file)
        .with_file(true)
        .with_line_number(true)
        .with_target(false)
        .with_ansi(false);

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(stdout_layer)
        .with(file_layer)
        .init();

    info!("[CLI] 📝 日志已同时输出到控制台和文件: directory.log");
    Ok(())
}

/// CLI 监听器：把提示输出到日志，清空确认取决于 `--yes`
struct CliDirectoryListener {
    confirm_clear: bool,
}

#[async_trait::async_trait]
impl DirectoryListener for CliDirectoryListener {
    async fn on_user_list_changed(&self, _users_json: String) {}

    async fn on_favorites_changed(&self, favorites_json: String) {
        info!("[CLI/Directory] ⭐ 收藏变更: {}", favorites_json);
    }

    async fn on_loading_changed(&self, loading: bool, refreshing: bool) {
        if loading || refreshing {
            info!("[CLI/Directory] ⏳ 正在加载联系人...");
        }
    }

    async fn on_notice(&self, notice: Notice) {
        if notice.is_error() {
            error!("[CLI/Directory] ❌ {}: {}", notice.title(), notice.message());
        } else {
            info!("[CLI/Directory] ✅ {}: {}", notice.title(), notice.message());
        }
    }

    async fn confirm_clear_favorites(&self) -> bool {
        if !self.confirm_clear {
            warn!("[CLI/Directory] ⚠️ 清空收藏需要 --yes 确认");
        }
        self.confirm_clear
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    init_logger(&args.log_level)?;

    info!("[CLI] 🚀 通讯录 CLI 客户端");
    info!("[CLI] 🌐 API: {}", args.api_base_url);

    let listener = CliDirectoryListener {
        confirm_clear: matches!(args.command, Command::Clear { yes: true }),
    };
    let config = DirectoryConfig {
        api_base_url: args.api_base_url,
        db_url: args.db_url,
        ..DirectoryConfig::default()
    };
    let controller = DirectoryController::with_listener(config, Arc::new(listener)).await?;

    // 加载失败已通过提示告知，继续执行本地操作
    let _ = controller.load().await;

    match args.command {
        Command::List { favorites, search } => {
            controller.set_show_favorites_only(favorites).await;
            if let Some(query) = search {
                controller.set_search_query(query).await;
            }
        }
        Command::Toggle { id } => {
            let is_favorite = controller.toggle_favorite(id).await;
            info!(
                "[CLI] {} 用户 {}",
                if is_favorite { "⭐ 已收藏" } else { "☆ 已取消收藏" },
                id
            );
        }
        Command::Add { name } => {
            let _ = controller.add_user(&name).await;
        }
        Command::Clear { .. } => {
            let _ = controller.clear_all_favorites().await;
        }
    }

    let stats = controller.stats().await;
    info!(
        "[CLI] 📊 {} 个收藏 | {} 个展示 / 共 {} 个",
        stats.favorite_count, stats.displayed_count, stats.total_count
    );

    let visible = controller.visible_users().await;
    if let Some(reason) = controller.empty_reason().await {
        info!("[CLI] {}", reason.message());
    }
    for user in visible {
        let star = if controller.is_favorite(user.id).await {
            "★"
        } else {
            "☆"
        };
        info!("[CLI]   {} #{} {} <{}>", star, user.id, user.name, user.email);
    }

    Ok(())
}
