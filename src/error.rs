use thiserror::Error;

use crate::infrastructure::DiagnosticRef;
use crate::models::session::RunSummary;

/// 浏览器驱动错误
///
/// 只描述"驱动层面"的失败（连接断开、脚本执行失败等），
/// 元素不存在不属于驱动错误，由 `locate` 返回 `None` 表达
#[derive(Debug, Error)]
pub enum DriverError {
    /// 启动或连接浏览器失败
    #[error("浏览器启动失败: {message}")]
    LaunchFailed { message: String },
    /// 导航失败
    #[error("导航到 {url} 失败: {message}")]
    NavigationFailed { url: String, message: String },
    /// 元素操作失败（点击、输入、选择）
    #[error("元素操作失败 ({action}): {message}")]
    ActionFailed { action: String, message: String },
    /// 控件里没有要选的选项
    #[error("选项不存在: {label}")]
    OptionNotFound { label: String },
    /// 执行脚本失败
    #[error("执行脚本失败: {message}")]
    ScriptExecutionFailed { message: String },
    /// 截图失败
    #[error("截图失败 ({path}): {message}")]
    SnapshotFailed { path: String, message: String },
}

impl DriverError {
    pub fn action(action: impl Into<String>, err: impl std::fmt::Display) -> Self {
        DriverError::ActionFailed {
            action: action.into(),
            message: err.to_string(),
        }
    }

    pub fn script(err: impl std::fmt::Display) -> Self {
        DriverError::ScriptExecutionFailed {
            message: err.to_string(),
        }
    }
}

/// 答案缓存错误
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("读取答案缓存失败 ({path}): {message}")]
    ReadFailed { path: String, message: String },
    #[error("写入答案缓存失败 ({path}): {message}")]
    WriteFailed { path: String, message: String },
    #[error("答案缓存格式错误 ({path}): {message}")]
    ParseFailed { path: String, message: String },
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 用户资料缺少必填字段
    #[error("用户资料缺少必填字段: {field}")]
    MissingField { field: String },
    /// 字段取值非法
    #[error("字段 {field} 取值非法: {reason}")]
    InvalidValue { field: String, reason: String },
    /// 页面布局文件解析失败
    #[error("页面布局文件解析失败 ({path}): {message}")]
    LayoutParseFailed { path: String, message: String },
}

/// 用户数据提供方错误
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("请求用户数据失败 ({endpoint}): {message}")]
    RequestFailed { endpoint: String, message: String },
    #[error("用户数据接口返回错误状态 ({endpoint}): {status}")]
    BadResponse { endpoint: String, status: u16 },
    #[error("用户 {user_id} 不存在")]
    UserNotFound { user_id: u64 },
    #[error("用户数据解析失败 ({source_name}): {message}")]
    ParseFailed { source_name: String, message: String },
}

/// 自动化流程错误
///
/// 按影响范围分为三类：
/// - 职位级：`ElementNotFound` / `UnresolvedQuestion` / `AnswerTimeout`，当前职位记为失败，继续下一个
/// - 运行级：`Authentication` / `Driver` / `Cache`，交给 Supervisor 重试
/// - 终止级：`FilterUnavailable` / `Config`，页面结构变化或输入非法，重试无意义
#[derive(Debug, Error)]
pub enum AutomationError {
    #[error("登录失败: {reason}")]
    Authentication { reason: String },
    #[error("筛选控件不可用: {filter}")]
    FilterUnavailable { filter: String },
    #[error("未找到元素: {element}")]
    ElementNotFound { element: String },
    #[error("筛选问题没有可用答案: {question}")]
    UnresolvedQuestion { question: String },
    #[error("等待人工作答超时 ({waited_ms}ms): {question}")]
    AnswerTimeout { question: String, waited_ms: u64 },
    #[error(transparent)]
    Driver(#[from] DriverError),
    #[error(transparent)]
    Cache(#[from] CacheError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl AutomationError {
    pub fn element_not_found(element: impl Into<String>) -> Self {
        AutomationError::ElementNotFound {
            element: element.into(),
        }
    }

    /// 是否只影响当前职位
    pub fn is_listing_scoped(&self) -> bool {
        matches!(
            self,
            AutomationError::ElementNotFound { .. }
                | AutomationError::UnresolvedQuestion { .. }
                | AutomationError::AnswerTimeout { .. }
        )
    }

    /// Supervisor 是否可以重新执行整个会话
    pub fn is_retryable(&self) -> bool {
        !matches!(
            self,
            AutomationError::FilterUnavailable { .. } | AutomationError::Config(_)
        )
    }
}

/// 运行失败：重试次数耗尽或遇到不可重试的错误
#[derive(Debug, Error)]
#[error("运行失败（共尝试 {attempts} 次）: {cause}")]
pub struct RunFailedError {
    pub attempts: usize,
    /// 最后一次尝试失败前的计数
    pub last_summary: RunSummary,
    pub last_diagnostic: Option<DiagnosticRef>,
    #[source]
    pub cause: AutomationError,
}

pub type AutomationResult<T> = Result<T, AutomationError>;
