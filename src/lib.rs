//! # Easy Apply Submit
//!
//! 自动在招聘网站上完成站内"Easy Apply"申请的 Rust 应用程序
//!
//! ## 架构设计
//!
//! 本系统采用严格的四层架构：
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 持有稀缺资源（Page），只暴露能力
//! - `UiDriver` - 导航 / 定位 / 读写 / 等待 / 截图能力接口
//! - `ChromiumDriver` - 基于 chromiumoxide 的唯一实现
//! - `SiteLayout` - 目标网站的 URL 和选择器，作为数据提供
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"，只处理单个问题
//! - `AnswerCache` - 问题 → 答案缓存，每次变更立即落盘
//! - `QuestionResolver` - 查缓存，未命中时等待人工选择
//! - `ProfileProvider` - 获取用户资料（HTTP / TOML）
//! - `UnresolvedWriter` - 写 unanswered.txt 能力
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一个职位"的完整处理流程
//! - `ListingCtx` - 上下文封装（序号 + 页码 + 职位名）
//! - `ListingIterator` - 跨页的职位序列
//! - `FormNavigator` - 多步申请表单（身份字段 → 筛选问题 → 下一步 / 提交）
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/app` - 应用入口，管理资源
//! - `orchestrator/supervisor` - 整轮运行的重试循环
//! - `orchestrator/session_controller` - 登录、筛选、遍历职位
//!
//! ## 模块结构

pub mod browser;
pub mod config;
pub mod error;
pub mod infrastructure;

pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use config::{Config, Timeouts};
pub use error::{AutomationError, AutomationResult, RunFailedError};
pub use infrastructure::{ChromiumDriver, SiteLayout, UiDriver};
pub use models::session::{RunSummary, SessionConfig};
pub use orchestrator::{App, SessionController, Supervisor};
pub use workflow::{FormNavigator, ListingCtx, ListingIterator};
