//! 会话控制器 - 编排层
//!
//! 一轮运行：登录 → 设置搜索条件和筛选 → 遍历职位直到申请数达到上限
//!
//! 每次调用 `run` 都从头开始，计数器随之重置；
//! 答案缓存跨重试保留（学到的答案不会因为重试而丢失）

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::config::Timeouts;
use crate::error::AutomationError;
use crate::infrastructure::{Condition, DiagnosticRef, Selector, SiteLayout, UiDriver};
use crate::models::listing::{AttemptOutcome, SkipReason};
use crate::models::session::{RunState, RunSummary, SessionConfig};
use crate::orchestrator::supervisor::SessionRunner;
use crate::services::{AnswerStore, QuestionResolver};
use crate::workflow::{ExclusionFilter, FormNavigator, ListingCtx, ListingIterator, NavigatorSettings};

pub struct SessionController<'a, D: UiDriver, S: AnswerStore> {
    driver: &'a D,
    layout: &'a SiteLayout,
    timeouts: Timeouts,
    max_form_steps: usize,
    resolver: QuestionResolver<S>,
    state: RunState,
}

impl<'a, D: UiDriver, S: AnswerStore> SessionController<'a, D, S> {
    pub fn new(
        driver: &'a D,
        layout: &'a SiteLayout,
        timeouts: Timeouts,
        max_form_steps: usize,
        resolver: QuestionResolver<S>,
    ) -> Self {
        Self {
            driver,
            layout,
            timeouts,
            max_form_steps,
            resolver,
            state: RunState::default(),
        }
    }

    pub fn resolver(&self) -> &QuestionResolver<S> {
        &self.resolver
    }

    /// 最近一轮运行的计数
    pub fn state(&self) -> &RunState {
        &self.state
    }

    /// 登录并等待登录后的标志元素
    async fn authenticate(&self, config: &SessionConfig) -> Result<(), AutomationError> {
        info!("🔐 正在登录: {}", config.credentials.email);
        self.driver.navigate(&self.layout.login_url).await?;

        let username = self.require_login_control(&self.layout.username_input).await?;
        self.driver
            .fill(&username, &config.credentials.email)
            .await?;
        let password = self.require_login_control(&self.layout.password_input).await?;
        self.driver
            .fill(&password, &config.credentials.password)
            .await?;
        let submit = self.require_login_control(&self.layout.login_submit).await?;
        self.driver.click(&submit).await?;

        let landed = self
            .driver
            .wait_for(
                &Condition::Present(self.layout.login_landmark.clone()),
                self.timeouts.landmark,
            )
            .await?;
        if !landed {
            if let Some(reference) = self.capture_diagnostic("login_error").await {
                warn!("📸 登录失败截图: {}", reference);
            }
            return Err(AutomationError::Authentication {
                reason: format!(
                    "{} 秒内未出现登录后的页面",
                    self.timeouts.landmark.as_secs()
                ),
            });
        }

        info!("✅ 登录成功");
        Ok(())
    }

    async fn require_login_control(&self, selector: &Selector) -> Result<D::Handle, AutomationError> {
        let visible = self
            .driver
            .wait_for(
                &Condition::Present(selector.clone()),
                self.timeouts.element,
            )
            .await?;
        let handle = if visible {
            self.driver.locate(selector).await?
        } else {
            None
        };
        handle.ok_or_else(|| AutomationError::Authentication {
            reason: format!("登录页缺少控件 {}", selector),
        })
    }

    /// 输入搜索条件并打开筛选
    async fn configure_search(&self, config: &SessionConfig) -> Result<(), AutomationError> {
        info!("🔍 搜索职位: {}", config.job_title);
        self.driver.navigate(&self.layout.jobs_url).await?;

        let title = self
            .require_filter(&self.layout.search_title_input, "job-title")
            .await?;
        self.driver.fill(&title, &config.job_title).await?;
        self.driver.press_enter(&title).await?;

        if let Some(location) = &config.job_location {
            let input = self
                .require_filter(&self.layout.search_location_input, "job-location")
                .await?;
            self.driver.fill(&input, location).await?;
            self.driver.press_enter(&input).await?;
            debug!("已设置地点: {}", location);
        }

        let easy_apply = self
            .require_filter(&self.layout.easy_apply_filter, "easy-apply")
            .await?;
        self.driver.click(&easy_apply).await?;
        debug!("已打开 Easy Apply 筛选");

        if config.posted_within_week {
            let steps = [
                (&self.layout.date_posted_filter, "date-posted"),
                (&self.layout.date_posted_past_week, "date-posted-past-week"),
                (&self.layout.date_posted_apply, "date-posted-apply"),
            ];
            for (selector, name) in steps {
                let control = self.require_filter(selector, name).await?;
                self.driver.click(&control).await?;
            }
            debug!("已限定最近一周发布");
        }

        let listed = self
            .driver
            .wait_for(
                &Condition::Present(self.layout.job_card.clone()),
                self.timeouts.element,
            )
            .await?;
        if !listed {
            warn!("⚠️ 搜索结果未在超时内出现");
        }
        Ok(())
    }

    async fn require_filter(
        &self,
        selector: &Selector,
        name: &str,
    ) -> Result<D::Handle, AutomationError> {
        let visible = self
            .driver
            .wait_for(
                &Condition::Present(selector.clone()),
                self.timeouts.element,
            )
            .await?;
        let handle = if visible {
            self.driver.locate(selector).await?
        } else {
            None
        };
        handle.ok_or_else(|| AutomationError::FilterUnavailable {
            filter: name.to_string(),
        })
    }

    /// 遍历职位直到达到申请上限或列表结束
    async fn process_listings(&mut self, config: &SessionConfig) -> Result<(), AutomationError> {
        let exclusion = ExclusionFilter::new(&config.exclusion_keywords)?;
        let navigator = FormNavigator::new(
            self.driver,
            self.layout,
            NavigatorSettings::new(self.max_form_steps, &self.timeouts),
        );
        let mut listings = ListingIterator::new(self.driver, self.layout, &self.timeouts);
        let mut seq = 0;

        while self.state.applied < config.max_applications {
            let Some(listing) = listings.next().await? else {
                info!("📭 没有更多职位");
                break;
            };
            seq += 1;
            self.state.current_page = listing.page;
            let ctx = ListingCtx::new(seq, listing.page, listing.display_name());

            let outcome = if listing.already_applied {
                AttemptOutcome::Skipped(SkipReason::AlreadyApplied)
            } else if let Some(keyword) = exclusion.matched(&listing.display_name()) {
                AttemptOutcome::Skipped(SkipReason::ExcludedKeyword(keyword))
            } else {
                navigator
                    .apply(&listing, &config.identity, &mut self.resolver, &ctx)
                    .await?
            };

            match &outcome {
                AttemptOutcome::Applied => info!(
                    "{} ✅ 已申请 ({}/{})",
                    ctx,
                    self.state.applied + 1,
                    config.max_applications
                ),
                AttemptOutcome::Skipped(_) => info!("{} ⏭️ {}", ctx, outcome),
                AttemptOutcome::Failed(_) => warn!("{} ❌ {}", ctx, outcome),
            }
            self.state.record(&outcome);
        }

        if self.state.applied >= config.max_applications {
            info!("🎯 已达到申请上限 {}", config.max_applications);
        }
        Ok(())
    }
}

#[async_trait]
impl<'a, D: UiDriver, S: AnswerStore> SessionRunner for SessionController<'a, D, S> {
    async fn run(
        &mut self,
        config: &SessionConfig,
        attempt: usize,
    ) -> Result<RunSummary, AutomationError> {
        config.validate()?;
        self.state = RunState::new(attempt);

        self.authenticate(config).await?;
        self.configure_search(config).await?;
        self.process_listings(config).await?;

        let summary = self.state.summary();
        info!(
            "本轮结束: 已申请 {} / 跳过 {} / 失败 {}",
            summary.applied, summary.skipped, summary.failed
        );
        Ok(summary)
    }

    async fn capture_diagnostic(&self, label: &str) -> Option<DiagnosticRef> {
        match self.driver.snapshot(label).await {
            Ok(reference) => Some(reference),
            Err(e) => {
                warn!("截图失败: {}", e);
                None
            }
        }
    }

    fn progress(&self) -> RunSummary {
        self.state.summary()
    }
}
