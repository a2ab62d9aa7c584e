//! 重试 / 恢复监督器 - 编排层
//!
//! 包住整轮会话：失败时截图、计数，在重试预算内从头重新执行
//! （重新登录、重新设置筛选），不在职位中途续跑

use std::time::Duration;

use async_trait::async_trait;
use tokio::time::sleep;
use tracing::{debug, error, info, warn};

use crate::error::{AutomationError, RunFailedError};
use crate::infrastructure::DiagnosticRef;
use crate::models::session::{RunSummary, SessionConfig};

/// 可被监督的一轮会话
#[async_trait]
pub trait SessionRunner: Send {
    /// 从头执行一轮，`attempt` 从 1 开始
    async fn run(
        &mut self,
        config: &SessionConfig,
        attempt: usize,
    ) -> Result<RunSummary, AutomationError>;

    /// 失败后采集诊断信息
    async fn capture_diagnostic(&self, label: &str) -> Option<DiagnosticRef>;

    /// 当前（或刚失败的）这一轮已有的计数
    fn progress(&self) -> RunSummary {
        RunSummary::default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SupervisorState {
    Idle,
    Running,
    Retrying,
    Terminated,
}

pub struct Supervisor {
    max_retries: usize,
    retry_delay: Duration,
    state: SupervisorState,
    attempts: usize,
}

impl Supervisor {
    pub fn new(max_retries: usize, retry_delay: Duration) -> Self {
        Self {
            max_retries,
            retry_delay,
            state: SupervisorState::Idle,
            attempts: 0,
        }
    }

    pub fn state(&self) -> SupervisorState {
        self.state
    }

    /// 最近一次 `supervise` 调用的尝试次数
    pub fn attempts(&self) -> usize {
        self.attempts
    }

    /// 监督执行，最多调用 `runner.run` `max_retries + 1` 次
    pub async fn supervise<R: SessionRunner>(
        &mut self,
        runner: &mut R,
        config: &SessionConfig,
    ) -> Result<RunSummary, RunFailedError> {
        self.attempts = 0;
        self.transition(SupervisorState::Idle);
        let mut last_diagnostic = None;

        loop {
            self.attempts += 1;
            self.transition(SupervisorState::Running);
            info!("▶️ 第 {} 次运行", self.attempts);

            let err = match runner.run(config, self.attempts).await {
                Ok(mut summary) => {
                    summary.attempts = self.attempts;
                    self.transition(SupervisorState::Terminated);
                    return Ok(summary);
                }
                Err(err) => err,
            };

            error!("❌ 第 {} 次运行失败: {}", self.attempts, err);
            let label = format!("run_error_attempt_{}", self.attempts);
            if let Some(reference) = runner.capture_diagnostic(&label).await {
                info!("📸 诊断截图: {}", reference);
                last_diagnostic = Some(reference);
            }

            if !err.is_retryable() {
                warn!("错误不可重试，终止运行");
                return Err(self.terminate(err, runner.progress(), last_diagnostic));
            }
            if self.attempts > self.max_retries {
                warn!("已达到最大重试次数 {}", self.max_retries);
                return Err(self.terminate(err, runner.progress(), last_diagnostic));
            }

            self.transition(SupervisorState::Retrying);
            warn!(
                "🔁 {} 秒后重试 ({}/{})",
                self.retry_delay.as_secs(),
                self.attempts,
                self.max_retries
            );
            sleep(self.retry_delay).await;
        }
    }

    fn terminate(
        &mut self,
        cause: AutomationError,
        mut last_summary: RunSummary,
        last_diagnostic: Option<DiagnosticRef>,
    ) -> RunFailedError {
        self.transition(SupervisorState::Terminated);
        last_summary.attempts = self.attempts;
        RunFailedError {
            attempts: self.attempts,
            last_summary,
            last_diagnostic,
            cause,
        }
    }

    fn transition(&mut self, next: SupervisorState) {
        debug!("监督器状态: {:?} -> {:?}", self.state, next);
        self.state = next;
    }
}
