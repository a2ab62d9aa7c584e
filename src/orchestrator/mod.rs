//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层负责一次完整运行的调度，是整个系统的"指挥中心"。
//!
//! ## 模块划分
//!
//! ### `app` - 应用入口
//! - 管理应用生命周期（初始化、运行）
//! - 加载答案缓存、用户资料、页面布局
//! - 管理浏览器资源（Browser、ChromiumDriver）
//! - 输出全局统计信息
//!
//! ### `supervisor` - 重试 / 恢复监督器
//! - 状态：Idle → Running → (Retrying → Running)* → Terminated
//! - 显式循环 + 尝试计数，最多运行 `max_retries + 1` 次
//! - 失败时采集诊断截图
//!
//! ### `session_controller` - 单轮会话
//! - 登录、设置搜索条件和筛选
//! - 遍历职位（ListingIterator），逐个交给 FormNavigator
//! - 统计 Applied / Skipped / Failed
//!
//! ## 层次关系
//!
//! ```text
//! app (持有 Browser / ChromiumDriver)
//!     ↓
//! supervisor (重试循环)
//!     ↓
//! session_controller (处理一轮运行)
//!     ↓
//! workflow::FormNavigator (处理单个职位)
//!     ↓
//! services (能力层：answer cache / resolver / profile)
//!     ↓
//! infrastructure (基础设施：UiDriver)
//! ```

pub mod app;
pub mod session_controller;
pub mod supervisor;

// 重新导出主要类型
pub use app::App;
pub use session_controller::SessionController;
pub use supervisor::{SessionRunner, Supervisor, SupervisorState};
