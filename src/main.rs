// ==========================================
// 成员名册导入工具 - 命令行入口
// ==========================================
// 用法: member-import [文件路径]
// 未指定路径时使用 MEMBER_IMPORT_SOURCE 或默认文件名
// 退出码: 0 = 导入完成（可含行级失败）, 1 = 致命错误
// ==========================================

use anyhow::Context;
use member_import::{logging, ImportConfig};
use std::path::PathBuf;
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    logging::init();

    match run_cli().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("导入失败: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run_cli() -> anyhow::Result<()> {
    let config = ImportConfig::from_env().context("读取配置失败")?;

    let source = std::env::args()
        .nth(1)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| config.default_source_file.clone());
    let source = PathBuf::from(source);

    tracing::info!("==================================================");
    tracing::info!("{} v{}", member_import::APP_NAME, member_import::VERSION);
    tracing::info!("源文件: {}", source.display());
    tracing::info!("数据库: {}", config.db_path);
    tracing::info!("==================================================");

    let report = member_import::run(&source, &config)
        .await
        .with_context(|| format!("导入文件失败: {}", source.display()))?;

    println!("{}", report);
    Ok(())
}
