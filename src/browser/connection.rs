use chromiumoxide::{Browser, Page};
use futures::StreamExt;
use tokio::time::sleep;
use tracing::{debug, error, info};

use crate::error::DriverError;

/// 连接到已打开的浏览器（`--remote-debugging-port`）并打开一个空白页
pub async fn connect_to_browser(port: u16) -> Result<(Browser, Page), DriverError> {
    let browser_url = format!("http://localhost:{}", port);
    info!("正在连接到浏览器: {}", browser_url);

    let (browser, mut handler) = Browser::connect(&browser_url).await.map_err(|e| {
        error!("连接浏览器失败: {}", e);
        DriverError::LaunchFailed {
            message: format!("连接 {} 失败: {}", browser_url, e),
        }
    })?;
    debug!("浏览器连接成功");

    // 在后台处理浏览器事件
    tokio::spawn(async move {
        while let Some(h) = handler.next().await {
            if h.is_err() {
                break;
            }
        }
    });

    // 等待浏览器状态同步
    sleep(tokio::time::Duration::from_millis(300)).await;

    let page = browser.new_page("about:blank").await.map_err(|e| {
        error!("创建空白页面失败: {}", e);
        DriverError::LaunchFailed {
            message: format!("创建页面失败: {}", e),
        }
    })?;

    Ok((browser, page))
}
