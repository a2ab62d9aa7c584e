//! 浏览器驱动能力接口 - 基础设施层
//!
//! 上层只依赖这里定义的能力集合，不认识任何具体网站的选择器词汇，
//! 选择器本身作为数据由 `SiteLayout` 提供

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::time::{sleep, Instant};

use crate::error::DriverError;

/// `wait_for` 的默认轮询间隔
pub const WAIT_POLL_INTERVAL: Duration = Duration::from_millis(250);

/// 元素选择器
///
/// 可以包含 `{page}` 占位符（例如翻页按钮），由 [`Selector::for_page`] 展开
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Selector(String);

impl Selector {
    pub fn new(selector: impl Into<String>) -> Self {
        Self(selector.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// 展开 `{page}` 占位符
    pub fn for_page(&self, page: usize) -> Selector {
        Selector(self.0.replace("{page}", &page.to_string()))
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Selector {
    fn from(value: &str) -> Self {
        Selector::new(value)
    }
}

/// 等待条件
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Condition {
    /// 元素出现
    Present(Selector),
    /// 元素消失
    Absent(Selector),
    /// 任一元素出现
    AnyPresent(Vec<Selector>),
}

/// 诊断快照引用（截图文件路径）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DiagnosticRef(String);

impl DiagnosticRef {
    pub fn new(reference: impl Into<String>) -> Self {
        Self(reference.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DiagnosticRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// 浏览器驱动
///
/// 职责：
/// - 唯一持有页面资源
/// - 暴露导航、定位、读写、点击、等待、截图能力
/// - 不认识职位 / 筛选问题
/// - 不处理业务流程
///
/// 所有方法都是挂起点，调用方按顺序逐个 await
#[async_trait]
pub trait UiDriver: Send + Sync {
    /// 元素句柄
    type Handle: Send + Sync;

    async fn navigate(&self, url: &str) -> Result<(), DriverError>;

    /// 定位单个元素，不存在时返回 `None`
    async fn locate(&self, selector: &Selector) -> Result<Option<Self::Handle>, DriverError>;

    async fn locate_all(&self, selector: &Selector) -> Result<Vec<Self::Handle>, DriverError>;

    /// 在父元素内部定位
    async fn locate_within(
        &self,
        parent: &Self::Handle,
        selector: &Selector,
    ) -> Result<Option<Self::Handle>, DriverError>;

    async fn locate_all_within(
        &self,
        parent: &Self::Handle,
        selector: &Selector,
    ) -> Result<Vec<Self::Handle>, DriverError>;

    /// 清空并输入文本
    async fn fill(&self, handle: &Self::Handle, text: &str) -> Result<(), DriverError>;

    async fn click(&self, handle: &Self::Handle) -> Result<(), DriverError>;

    async fn press_enter(&self, handle: &Self::Handle) -> Result<(), DriverError>;

    /// 单选：下拉框按选项文字选择，单选组点击对应选项
    /// 选项不存在时返回 [`DriverError::OptionNotFound`]
    async fn select(&self, handle: &Self::Handle, label: &str) -> Result<(), DriverError>;

    /// 控件是否为下拉框（需要 `select` 而不是 `fill`）
    async fn is_select(&self, handle: &Self::Handle) -> Result<bool, DriverError>;

    /// 读取当前值
    ///
    /// 下拉框返回选中项文字，单选组返回已勾选项文字（未勾选时为空），输入框返回输入值
    async fn read_value(&self, handle: &Self::Handle) -> Result<String, DriverError>;

    async fn read_text(&self, handle: &Self::Handle) -> Result<String, DriverError>;

    /// 截图并返回诊断引用
    async fn snapshot(&self, label: &str) -> Result<DiagnosticRef, DriverError>;

    /// 等待条件满足，超时返回 `false`
    async fn wait_for(&self, condition: &Condition, timeout: Duration) -> Result<bool, DriverError> {
        let deadline = Instant::now() + timeout;
        loop {
            if self.condition_holds(condition).await? {
                return Ok(true);
            }
            if Instant::now() >= deadline {
                return Ok(false);
            }
            sleep(WAIT_POLL_INTERVAL).await;
        }
    }

    /// 单次检查条件是否满足
    async fn condition_holds(&self, condition: &Condition) -> Result<bool, DriverError> {
        match condition {
            Condition::Present(selector) => Ok(self.locate(selector).await?.is_some()),
            Condition::Absent(selector) => Ok(self.locate(selector).await?.is_none()),
            Condition::AnyPresent(selectors) => {
                for selector in selectors {
                    if self.locate(selector).await?.is_some() {
                        return Ok(true);
                    }
                }
                Ok(false)
            }
        }
    }
}
