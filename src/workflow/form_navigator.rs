//! 申请表单流程 - 流程层
//!
//! 核心职责：定义"一个职位"的完整申请流程
//!
//! 流程顺序：
//! 1. 打开职位 → 点击申请按钮（没有则跳过）
//! 2. 每一步：填身份字段 → 逐个回答筛选问题 → 下一步 / 提交
//! 3. 关闭确认弹窗
//!
//! 不做内部重试：提交了一半的表单不能盲目续填，重试由 Supervisor 在整轮运行层面负责

use std::time::Duration;

use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::config::Timeouts;
use crate::error::{AutomationError, DriverError};
use crate::infrastructure::{Condition, SiteLayout, UiDriver};
use crate::models::listing::{AttemptOutcome, FailReason, JobListing, SkipReason};
use crate::models::question::{QuestionKind, ScreeningQuestion};
use crate::models::session::Identity;
use crate::services::{AnswerSource, AnswerStore, ControlSelection, QuestionResolver};
use crate::utils::logging::truncate_text;
use crate::workflow::listing_ctx::ListingCtx;

/// 表单流程参数
#[derive(Debug, Clone, Copy)]
pub struct NavigatorSettings {
    /// 单个职位最多推进的步数
    pub max_steps: usize,
    pub element_timeout: Duration,
    pub settle: Duration,
}

impl NavigatorSettings {
    pub fn new(max_steps: usize, timeouts: &Timeouts) -> Self {
        Self {
            max_steps,
            element_timeout: timeouts.element,
            settle: timeouts.settle,
        }
    }
}

/// 申请表单流程
///
/// - 编排单个职位的多步表单
/// - 不持有任何资源，只借用驱动和布局
/// - 问题答案全部委托给 `QuestionResolver`
pub struct FormNavigator<'a, D: UiDriver> {
    driver: &'a D,
    layout: &'a SiteLayout,
    settings: NavigatorSettings,
}

impl<'a, D: UiDriver> FormNavigator<'a, D> {
    pub fn new(driver: &'a D, layout: &'a SiteLayout, settings: NavigatorSettings) -> Self {
        Self {
            driver,
            layout,
            settings,
        }
    }

    /// 申请一个职位
    ///
    /// 职位级错误（缺元素、问题无答案）转换为 `Failed`，
    /// 驱动或缓存错误向上传播给 Supervisor
    pub async fn apply<S: AnswerStore>(
        &self,
        listing: &JobListing<D::Handle>,
        identity: &Identity,
        resolver: &mut QuestionResolver<S>,
        ctx: &ListingCtx,
    ) -> Result<AttemptOutcome, AutomationError> {
        info!("{} 打开职位", ctx);
        self.driver.click(&listing.handle).await?;

        let apply_visible = self
            .driver
            .wait_for(
                &Condition::Present(self.layout.apply_button.clone()),
                self.settings.element_timeout,
            )
            .await?;
        let apply_button = if apply_visible {
            self.driver.locate(&self.layout.apply_button).await?
        } else {
            None
        };
        let Some(apply_button) = apply_button else {
            warn!("{} ⚠️ 没有站内申请按钮，跳过", ctx);
            return Ok(AttemptOutcome::Skipped(SkipReason::NoApplyControl));
        };

        self.driver.click(&apply_button).await?;
        self.driver
            .wait_for(
                &Condition::AnyPresent(vec![
                    self.layout.next_step_button.clone(),
                    self.layout.review_button.clone(),
                    self.layout.submit_button.clone(),
                    self.layout.question_group.clone(),
                ]),
                self.settings.element_timeout,
            )
            .await?;

        let outcome = match self.run_steps(identity, resolver, ctx).await {
            Ok(outcome) => outcome,
            Err(e) if e.is_listing_scoped() => {
                warn!("{} ❌ {}", ctx, e);
                self.capture(ctx, "listing_failed").await;
                AttemptOutcome::Failed(listing_failure(&e))
            }
            Err(e) => return Err(e),
        };

        self.close_dialog(ctx).await?;
        Ok(outcome)
    }

    /// 逐步推进表单
    async fn run_steps<S: AnswerStore>(
        &self,
        identity: &Identity,
        resolver: &mut QuestionResolver<S>,
        ctx: &ListingCtx,
    ) -> Result<AttemptOutcome, AutomationError> {
        for step in 1..=self.settings.max_steps {
            debug!("{} 表单第 {} 步", ctx, step);

            self.fill_identity(identity).await?;
            self.answer_questions(resolver, ctx).await?;

            if let Some(advance) = self.find_advance_control().await? {
                self.driver.click(&advance).await?;
                debug!("{} ➡️ 进入下一步", ctx);
                sleep(self.settings.settle).await;
                continue;
            }

            if let Some(submit) = self.driver.locate(&self.layout.submit_button).await? {
                self.driver.click(&submit).await?;
                sleep(self.settings.settle).await;
                info!("{} ✅ 申请已提交", ctx);
                return Ok(AttemptOutcome::Applied);
            }

            warn!("{} ⚠️ 既没有下一步也没有提交按钮", ctx);
            self.capture(ctx, "no_submit_or_next").await;
            return Ok(AttemptOutcome::Failed(FailReason::NoSubmitOrNext));
        }

        warn!(
            "{} ⚠️ 超过 {} 步仍未提交，放弃该职位",
            ctx, self.settings.max_steps
        );
        self.capture(ctx, "step_limit").await;
        Ok(AttemptOutcome::Failed(FailReason::StepLimit))
    }

    /// "下一步"或"检查申请"按钮
    async fn find_advance_control(&self) -> Result<Option<D::Handle>, AutomationError> {
        if let Some(next) = self.driver.locate(&self.layout.next_step_button).await? {
            return Ok(Some(next));
        }
        Ok(self.driver.locate(&self.layout.review_button).await?)
    }

    /// 填写身份字段，字段不存在或已有值时不处理
    async fn fill_identity(&self, identity: &Identity) -> Result<(), AutomationError> {
        if let Some(email) = self.driver.locate(&self.layout.email_field).await? {
            let current = self.driver.read_value(&email).await?;
            if self.layout.is_placeholder(&current) {
                if self.driver.is_select(&email).await? {
                    self.select_option(&email, &identity.email).await?;
                } else {
                    self.driver.fill(&email, &identity.email).await?;
                }
                debug!("已填写邮箱");
            }
        }

        if let Some(phone_number) = &identity.phone {
            if let Some(phone) = self.driver.locate(&self.layout.phone_field).await? {
                let current = self.driver.read_value(&phone).await?;
                if current.trim().is_empty() {
                    self.driver.fill(&phone, phone_number).await?;
                    debug!("已填写电话");
                }
            }
        }
        Ok(())
    }

    /// 回答当前步骤上的全部筛选问题
    async fn answer_questions<S: AnswerStore>(
        &self,
        resolver: &mut QuestionResolver<S>,
        ctx: &ListingCtx,
    ) -> Result<(), AutomationError> {
        let groups = self
            .driver
            .locate_all(&self.layout.question_group)
            .await?;

        for group in &groups {
            if self.is_identity_group(group).await? {
                continue;
            }
            let Some((question, control)) = self.read_question(group).await? else {
                continue;
            };

            let selection = ControlSelection::new(self.driver, &control);
            let resolution = resolver.resolve(&question, &ctx.name, &selection).await?;

            if resolution.source == AnswerSource::Cache {
                self.write_answer(&question, &control, &resolution.answer)
                    .await?;
            }
            info!(
                "{} ✓ \"{}\" => {}",
                ctx,
                truncate_text(&question.text, 60),
                resolution.answer
            );
        }
        Ok(())
    }

    /// 身份字段所在的表单项由 `fill_identity` 负责
    async fn is_identity_group(&self, group: &D::Handle) -> Result<bool, AutomationError> {
        if self
            .driver
            .locate_within(group, &self.layout.email_field)
            .await?
            .is_some()
        {
            return Ok(true);
        }
        Ok(self
            .driver
            .locate_within(group, &self.layout.phone_field)
            .await?
            .is_some())
    }

    /// 识别问题类型、文本和选项
    async fn read_question(
        &self,
        group: &D::Handle,
    ) -> Result<Option<(ScreeningQuestion, D::Handle)>, AutomationError> {
        let candidates = [
            (QuestionKind::Dropdown, &self.layout.dropdown_input),
            (QuestionKind::Binary, &self.layout.binary_input),
            (QuestionKind::Numeric, &self.layout.numeric_input),
            (QuestionKind::FreeText, &self.layout.text_input),
        ];

        let mut found = None;
        for (kind, selector) in candidates {
            if let Some(control) = self.driver.locate_within(group, selector).await? {
                found = Some((kind, control));
                break;
            }
        }
        let Some((kind, control)) = found else {
            debug!("跳过无法识别的表单项");
            return Ok(None);
        };

        let label = self
            .driver
            .locate_within(group, &self.layout.question_label)
            .await?
            .ok_or_else(|| AutomationError::element_not_found("question-label"))?;
        let text = self.driver.read_text(&label).await?;
        if text.trim().is_empty() {
            return Err(AutomationError::element_not_found("question-label"));
        }

        let options = match kind {
            QuestionKind::Dropdown => {
                self.option_labels(&control, &self.layout.dropdown_option)
                    .await?
            }
            QuestionKind::Binary => {
                self.option_labels(&control, &self.layout.binary_option)
                    .await?
            }
            QuestionKind::Numeric | QuestionKind::FreeText => Vec::new(),
        };

        Ok(Some((ScreeningQuestion::new(text, kind, options), control)))
    }

    async fn option_labels(
        &self,
        control: &D::Handle,
        selector: &crate::infrastructure::Selector,
    ) -> Result<Vec<String>, AutomationError> {
        let mut labels = Vec::new();
        for option in self.driver.locate_all_within(control, selector).await? {
            let label = self.driver.read_text(&option).await?;
            if !self.layout.is_placeholder(&label) {
                labels.push(label.trim().to_string());
            }
        }
        Ok(labels)
    }

    /// 按问题类型写入答案
    async fn write_answer(
        &self,
        question: &ScreeningQuestion,
        control: &D::Handle,
        answer: &str,
    ) -> Result<(), AutomationError> {
        match question.kind {
            QuestionKind::FreeText | QuestionKind::Numeric => {
                self.driver.fill(control, answer).await?
            }
            QuestionKind::Binary | QuestionKind::Dropdown => {
                self.select_option(control, answer).await?
            }
        }
        Ok(())
    }

    /// 页面上找不到选项只影响当前职位
    async fn select_option(&self, control: &D::Handle, label: &str) -> Result<(), AutomationError> {
        match self.driver.select(control, label).await {
            Ok(()) => Ok(()),
            Err(DriverError::OptionNotFound { label }) => {
                Err(AutomationError::element_not_found(format!("option:{}", label)))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// 关闭弹窗；填了一半的申请会弹出"放弃"确认
    async fn close_dialog(&self, ctx: &ListingCtx) -> Result<(), AutomationError> {
        let Some(dismiss) = self.driver.locate(&self.layout.dismiss_button).await? else {
            return Ok(());
        };
        self.driver.click(&dismiss).await?;
        sleep(self.settings.settle).await;

        if let Some(discard) = self.driver.locate(&self.layout.discard_button).await? {
            self.driver.click(&discard).await?;
            debug!("{} 已放弃未完成的申请", ctx);
        }

        let closed = self
            .driver
            .wait_for(
                &Condition::Absent(self.layout.dismiss_button.clone()),
                self.settings.element_timeout,
            )
            .await?;
        if !closed {
            warn!("{} ⚠️ 申请弹窗未关闭", ctx);
            self.capture(ctx, "dialog_still_open").await;
        }
        Ok(())
    }

    /// 截图失败不影响流程
    async fn capture(&self, ctx: &ListingCtx, label: &str) {
        let label = format!("p{}_{}_{}", ctx.page, ctx.seq, label);
        match self.driver.snapshot(&label).await {
            Ok(reference) => info!("{} 📸 诊断截图: {}", ctx, reference),
            Err(e) => warn!("{} 截图失败: {}", ctx, e),
        }
    }
}

fn listing_failure(err: &AutomationError) -> FailReason {
    match err {
        AutomationError::ElementNotFound { element } => FailReason::ElementNotFound(element.clone()),
        AutomationError::UnresolvedQuestion { question } => {
            FailReason::UnresolvedQuestion(question.clone())
        }
        AutomationError::AnswerTimeout { question, .. } => {
            FailReason::AnswerTimeout(question.clone())
        }
        other => FailReason::ElementNotFound(other.to_string()),
    }
}
