//! chromiumoxide 驱动实现 - 基础设施层
//!
//! 持有唯一的 page 资源，把 `UiDriver` 能力映射到 CDP 调用

use std::path::PathBuf;

use async_trait::async_trait;
use chromiumoxide::element::Element;
use chromiumoxide::page::ScreenshotParams;
use chromiumoxide::Page;
use serde_json::Value as JsonValue;
use tracing::{debug, warn};

use crate::error::DriverError;
use crate::infrastructure::driver::{DiagnosticRef, Selector, UiDriver};

/// 读取元素当前值
///
/// 兼容三种控件：select 返回选中项文字，单选组返回已勾选项对应 label 文字，
/// 普通输入框返回 value
const READ_VALUE_JS: &str = r#"
function() {
    if (this.tagName === 'SELECT') {
        const opt = this.options[this.selectedIndex];
        return opt ? opt.textContent.trim() : '';
    }
    if (this.tagName === 'INPUT' || this.tagName === 'TEXTAREA') {
        return this.value || '';
    }
    const checked = this.querySelector('input[type="radio"]:checked');
    if (!checked) {
        return '';
    }
    const label = this.querySelector(`label[for="${checked.id}"]`) || checked.closest('label');
    return label ? label.textContent.trim() : (checked.value || '');
}
"#;

/// 清空输入框
const CLEAR_VALUE_JS: &str = r#"
function() {
    this.value = '';
    this.dispatchEvent(new Event('input', { bubbles: true }));
    return '';
}
"#;

/// chromiumoxide 驱动
pub struct ChromiumDriver {
    page: Page,
    diagnostics_dir: PathBuf,
}

impl ChromiumDriver {
    /// 创建新的驱动
    pub fn new(page: Page, diagnostics_dir: impl Into<PathBuf>) -> Self {
        Self {
            page,
            diagnostics_dir: diagnostics_dir.into(),
        }
    }

    /// 在元素上执行 JS 函数并取回字符串结果
    async fn call_on(&self, handle: &Element, function: String) -> Result<String, DriverError> {
        let returns = handle
            .call_js_fn(function, true)
            .await
            .map_err(DriverError::script)?;

        Ok(match returns.result.value {
            Some(JsonValue::String(s)) => s,
            Some(JsonValue::Null) | None => String::new(),
            Some(other) => other.to_string(),
        })
    }
}

#[async_trait]
impl UiDriver for ChromiumDriver {
    type Handle = Element;

    async fn navigate(&self, url: &str) -> Result<(), DriverError> {
        debug!("导航到: {}", url);
        self.page
            .goto(url)
            .await
            .map_err(|e| DriverError::NavigationFailed {
                url: url.to_string(),
                message: e.to_string(),
            })?;
        Ok(())
    }

    async fn locate(&self, selector: &Selector) -> Result<Option<Element>, DriverError> {
        // querySelector 找不到节点时 CDP 返回错误，这里统一视为"不存在"
        match self.page.find_element(selector.as_str()).await {
            Ok(element) => Ok(Some(element)),
            Err(e) => {
                debug!("未定位到 {}: {}", selector, e);
                Ok(None)
            }
        }
    }

    async fn locate_all(&self, selector: &Selector) -> Result<Vec<Element>, DriverError> {
        self.page
            .find_elements(selector.as_str())
            .await
            .map_err(|e| DriverError::action(format!("locate_all {}", selector), e))
    }

    async fn locate_within(
        &self,
        parent: &Element,
        selector: &Selector,
    ) -> Result<Option<Element>, DriverError> {
        match parent.find_element(selector.as_str()).await {
            Ok(element) => Ok(Some(element)),
            Err(e) => {
                debug!("父元素内未定位到 {}: {}", selector, e);
                Ok(None)
            }
        }
    }

    async fn locate_all_within(
        &self,
        parent: &Element,
        selector: &Selector,
    ) -> Result<Vec<Element>, DriverError> {
        parent
            .find_elements(selector.as_str())
            .await
            .map_err(|e| DriverError::action(format!("locate_all_within {}", selector), e))
    }

    async fn fill(&self, handle: &Element, text: &str) -> Result<(), DriverError> {
        handle
            .click()
            .await
            .map_err(|e| DriverError::action("fill/focus", e))?;
        self.call_on(handle, CLEAR_VALUE_JS.to_string()).await?;
        handle
            .type_str(text)
            .await
            .map_err(|e| DriverError::action("fill/type", e))?;
        Ok(())
    }

    async fn click(&self, handle: &Element) -> Result<(), DriverError> {
        handle
            .click()
            .await
            .map_err(|e| DriverError::action("click", e))?;
        Ok(())
    }

    async fn press_enter(&self, handle: &Element) -> Result<(), DriverError> {
        handle
            .press_key("Enter")
            .await
            .map_err(|e| DriverError::action("press_enter", e))?;
        Ok(())
    }

    async fn select(&self, handle: &Element, label: &str) -> Result<(), DriverError> {
        let js_code = format!(
            r#"
            function() {{
                const wanted = {};
                const text = el => (el.innerText || el.textContent || '').trim();
                if (this.tagName === 'SELECT') {{
                    const opt = Array.from(this.options).find(o => text(o) === wanted);
                    if (!opt) {{ return 'missing'; }}
                    this.value = opt.value;
                    this.dispatchEvent(new Event('change', {{ bubbles: true }}));
                    return 'ok';
                }}
                const label = Array.from(this.querySelectorAll('label')).find(l => text(l) === wanted);
                if (!label) {{ return 'missing'; }}
                label.click();
                return 'ok';
            }}
            "#,
            serde_json::to_string(label).map_err(DriverError::script)?
        );

        match self.call_on(handle, js_code).await?.as_str() {
            "ok" => Ok(()),
            _ => {
                warn!("选项不存在: {}", label);
                Err(DriverError::OptionNotFound {
                    label: label.to_string(),
                })
            }
        }
    }

    async fn is_select(&self, handle: &Element) -> Result<bool, DriverError> {
        let tag = self
            .call_on(handle, "function() { return this.tagName; }".to_string())
            .await?;
        Ok(tag.eq_ignore_ascii_case("select"))
    }

    async fn read_value(&self, handle: &Element) -> Result<String, DriverError> {
        self.call_on(handle, READ_VALUE_JS.to_string()).await
    }

    async fn read_text(&self, handle: &Element) -> Result<String, DriverError> {
        let text = handle
            .inner_text()
            .await
            .map_err(|e| DriverError::action("read_text", e))?;
        Ok(text.unwrap_or_default().trim().to_string())
    }

    async fn snapshot(&self, label: &str) -> Result<DiagnosticRef, DriverError> {
        let file_name = format!(
            "{}_{}.png",
            chrono::Local::now().format("%Y%m%d_%H%M%S"),
            label
        );
        let path = self.diagnostics_dir.join(file_name);
        let path_display = path.display().to_string();

        tokio::fs::create_dir_all(&self.diagnostics_dir)
            .await
            .map_err(|e| DriverError::SnapshotFailed {
                path: path_display.clone(),
                message: e.to_string(),
            })?;

        self.page
            .save_screenshot(ScreenshotParams::builder().full_page(true).build(), &path)
            .await
            .map_err(|e| DriverError::SnapshotFailed {
                path: path_display.clone(),
                message: e.to_string(),
            })?;

        debug!("已保存诊断截图: {}", path_display);
        Ok(DiagnosticRef::new(path_display))
    }
}
