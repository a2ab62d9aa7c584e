use std::path::Path;

use chromiumoxide::{Browser, BrowserConfig, Page};
use futures::StreamExt;
use tokio::time::sleep;
use tracing::{debug, error, info};

use crate::error::DriverError;

/// 启动新的浏览器进程
///
/// # 参数
/// - `headless`: 是否无头模式（无头模式下无法人工作答）
/// - `executable`: 浏览器路径，不设置时由 chromiumoxide 自动查找
pub async fn launch_browser(
    headless: bool,
    executable: Option<&str>,
) -> Result<(Browser, Page), DriverError> {
    info!(
        "🚀 启动浏览器 ({})",
        if headless { "无头模式" } else { "有界面模式" }
    );

    let mut builder = BrowserConfig::builder()
        .viewport(None)
        .args(vec!["--disable-gpu", "--no-sandbox", "--disable-dev-shm-usage"]);
    builder = if headless {
        builder.new_headless_mode()
    } else {
        builder.with_head()
    };
    if let Some(path) = executable {
        debug!("浏览器路径: {}", path);
        builder = builder.chrome_executable(Path::new(path));
    }

    let config = builder.build().map_err(|e| {
        error!("配置浏览器失败: {}", e);
        DriverError::LaunchFailed {
            message: format!("配置浏览器失败: {}", e),
        }
    })?;

    let (browser, mut handler) = Browser::launch(config).await.map_err(|e| {
        error!("启动浏览器失败: {}", e);
        DriverError::LaunchFailed {
            message: format!("启动浏览器失败: {}", e),
        }
    })?;
    debug!("浏览器启动成功");

    // 在后台处理浏览器事件
    tokio::spawn(async move {
        while let Some(h) = handler.next().await {
            if h.is_err() {
                break;
            }
        }
    });

    sleep(tokio::time::Duration::from_millis(300)).await;

    let page = browser.new_page("about:blank").await.map_err(|e| {
        error!("创建页面失败: {}", e);
        DriverError::LaunchFailed {
            message: format!("创建页面失败: {}", e),
        }
    })?;

    Ok((browser, page))
}
