use anyhow::Result;
use easy_apply_submit::config::Config;
use easy_apply_submit::utils::logging;
use easy_apply_submit::App;

#[tokio::main]
async fn main() -> Result<()> {
    // 加载配置
    let config = Config::from_env();

    // 初始化日志
    logging::init(config.verbose_logging);

    // 初始化并运行应用
    let _summary = App::initialize(config).await?.run().await?;

    Ok(())
}
