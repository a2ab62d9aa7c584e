//! 筛选问题作答 - 业务能力层
//!
//! 先查答案缓存；查不到时，单选类问题挂起等待用户在浏览器里手动选择，
//! 文本 / 数值类问题没有交互通道，直接报错

use std::time::Duration;

use async_trait::async_trait;
use tokio::time::{sleep, timeout};
use tracing::{debug, info, warn};

use crate::error::{AutomationError, DriverError};
use crate::infrastructure::UiDriver;
use crate::models::question::ScreeningQuestion;
use crate::services::answer_cache::{AnswerCache, AnswerStore};
use crate::services::unresolved_writer::UnresolvedWriter;

/// 读取控件当前选择的能力
#[async_trait]
pub trait SelectionSource: Send + Sync {
    async fn current_selection(&self) -> Result<String, DriverError>;
}

/// 通过驱动读取页面控件的当前值
pub struct ControlSelection<'a, D: UiDriver> {
    driver: &'a D,
    control: &'a D::Handle,
}

impl<'a, D: UiDriver> ControlSelection<'a, D> {
    pub fn new(driver: &'a D, control: &'a D::Handle) -> Self {
        Self { driver, control }
    }
}

#[async_trait]
impl<'a, D: UiDriver> SelectionSource for ControlSelection<'a, D> {
    async fn current_selection(&self) -> Result<String, DriverError> {
        self.driver.read_value(self.control).await
    }
}

/// 答案来源
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerSource {
    /// 来自缓存，需要写入页面
    Cache,
    /// 用户已在页面上选择，无需再写
    Interactive,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub answer: String,
    pub source: AnswerSource,
}

/// 作答参数
#[derive(Debug, Clone)]
pub struct ResolverSettings {
    /// 轮询用户选择的间隔
    pub poll_interval: Duration,
    /// 等待用户选择的总时长
    pub answer_timeout: Duration,
    /// 是否允许人工选择（无头模式下没人能操作页面）
    pub interactive: bool,
    /// 下拉框占位文字
    pub placeholder: String,
}

impl Default for ResolverSettings {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(500),
            answer_timeout: Duration::from_secs(300),
            interactive: true,
            placeholder: "Select an option".to_string(),
        }
    }
}

/// 筛选问题作答服务
///
/// 职责：
/// - 查缓存、校验缓存答案是否仍然可用
/// - 缓存未命中时挂起等待人工选择，并把结果写回缓存
/// - 只处理单个问题，不关心表单流程
pub struct QuestionResolver<S> {
    cache: AnswerCache<S>,
    settings: ResolverSettings,
    unresolved_writer: Option<UnresolvedWriter>,
}

impl<S: AnswerStore> QuestionResolver<S> {
    pub fn new(cache: AnswerCache<S>, settings: ResolverSettings) -> Self {
        Self {
            cache,
            settings,
            unresolved_writer: None,
        }
    }

    /// 记录无法作答的问题
    pub fn with_unresolved_writer(mut self, writer: UnresolvedWriter) -> Self {
        self.unresolved_writer = Some(writer);
        self
    }

    pub fn cache(&self) -> &AnswerCache<S> {
        &self.cache
    }

    pub fn cache_mut(&mut self) -> &mut AnswerCache<S> {
        &mut self.cache
    }

    /// 为一个问题找到答案
    ///
    /// # 参数
    /// - `question`: 当前问题
    /// - `listing`: 职位名称（仅用于日志和未答记录）
    /// - `selection`: 读取页面当前选择的通道
    pub async fn resolve(
        &mut self,
        question: &ScreeningQuestion,
        listing: &str,
        selection: &dyn SelectionSource,
    ) -> Result<Resolution, AutomationError> {
        if let Some(cached) = self.cache.lookup(&question.normalized_text) {
            if question.accepts(&cached) {
                debug!("缓存命中: {} => {}", question.normalized_text, cached);
                return Ok(Resolution {
                    answer: cached,
                    source: AnswerSource::Cache,
                });
            }
            warn!(
                "⚠️ 缓存答案 '{}' 不在当前选项中，按未命中处理: {}",
                cached, question.text
            );
        }

        if !question.kind.is_choice() || !self.settings.interactive {
            self.record_unresolved(listing, question).await;
            return Err(AutomationError::UnresolvedQuestion {
                question: question.text.clone(),
            });
        }

        info!(
            "🙋 请在浏览器中为问题选择答案: \"{}\" (选项: {})",
            question.text,
            question.options.join(" / ")
        );

        let answer = match self.await_selection(selection).await {
            Ok(answer) => answer,
            Err(AutomationError::AnswerTimeout { waited_ms, .. }) => {
                self.record_unresolved(listing, question).await;
                return Err(AutomationError::AnswerTimeout {
                    question: question.text.clone(),
                    waited_ms,
                });
            }
            Err(e) => return Err(e),
        };

        self.cache
            .remember(&question.normalized_text, &answer)
            .await?;
        info!("✓ 已记住答案: \"{}\" => {}", question.text, answer);

        Ok(Resolution {
            answer,
            source: AnswerSource::Interactive,
        })
    }

    /// 轮询页面选择，直到出现非占位值或超时
    async fn await_selection(
        &self,
        selection: &dyn SelectionSource,
    ) -> Result<String, AutomationError> {
        let poll_interval = self.settings.poll_interval;
        let placeholder = self.settings.placeholder.as_str();

        let polling = async {
            loop {
                let value = selection.current_selection().await?;
                let value = value.trim();
                if !value.is_empty() && value != placeholder {
                    return Ok::<String, DriverError>(value.to_string());
                }
                sleep(poll_interval).await;
            }
        };

        match timeout(self.settings.answer_timeout, polling).await {
            Ok(result) => Ok(result?),
            Err(_) => Err(AutomationError::AnswerTimeout {
                question: String::new(),
                waited_ms: self.settings.answer_timeout.as_millis() as u64,
            }),
        }
    }

    async fn record_unresolved(&self, listing: &str, question: &ScreeningQuestion) {
        if let Some(writer) = &self.unresolved_writer {
            if let Err(e) = writer.write(listing, question).await {
                warn!("写入 {} 失败: {}", writer.path(), e);
            }
        }
    }
}
