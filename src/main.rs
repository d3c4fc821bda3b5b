use anyhow::{Context, Result};
use mcq_experiment::utils::logging;
use mcq_experiment::{App, Config};

#[tokio::main]
async fn main() -> Result<()> {
    // 加载配置（缺少密钥或地址时直接退出）
    let config = Config::from_env().context("启动失败")?;

    // 初始化日志
    logging::init(&config.output_log_file)?;

    // 初始化并运行应用
    App::initialize(config).run().await?;

    Ok(())
}
