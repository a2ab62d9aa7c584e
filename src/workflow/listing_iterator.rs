//! 职位列表遍历 - 流程层
//!
//! 惰性、有限、不可重启的职位序列：先逐个产出当前页的卡片，
//! 当前页用完后点击翻页按钮；没有卡片或没有翻页按钮时序列结束

use std::collections::VecDeque;
use std::time::Duration;

use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::config::Timeouts;
use crate::error::AutomationResult;
use crate::infrastructure::{Condition, SiteLayout, UiDriver};
use crate::models::listing::JobListing;

/// 翻页结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PageAdvance {
    Advanced,
    End,
}

pub struct ListingIterator<'a, D: UiDriver> {
    driver: &'a D,
    layout: &'a SiteLayout,
    element_timeout: Duration,
    settle: Duration,
    page: usize,
    position: usize,
    pending: VecDeque<D::Handle>,
    page_loaded: bool,
    finished: bool,
}

impl<'a, D: UiDriver> ListingIterator<'a, D> {
    pub fn new(driver: &'a D, layout: &'a SiteLayout, timeouts: &Timeouts) -> Self {
        Self {
            driver,
            layout,
            element_timeout: timeouts.element,
            settle: timeouts.settle,
            page: 1,
            position: 0,
            pending: VecDeque::new(),
            page_loaded: false,
            finished: false,
        }
    }

    /// 当前页码
    pub fn current_page(&self) -> usize {
        self.page
    }

    /// 取下一个职位，序列结束时返回 `None`
    pub async fn next(&mut self) -> AutomationResult<Option<JobListing<D::Handle>>> {
        loop {
            if self.finished {
                return Ok(None);
            }

            if let Some(card) = self.pending.pop_front() {
                self.position += 1;
                return Ok(Some(self.describe(card).await?));
            }

            if !self.page_loaded {
                self.load_page().await?;
                continue;
            }

            if self.advance_page().await? == PageAdvance::End {
                self.finished = true;
            }
        }
    }

    /// 枚举当前页的职位卡片
    async fn load_page(&mut self) -> AutomationResult<()> {
        let cards = self.driver.locate_all(&self.layout.job_card).await?;
        self.page_loaded = true;

        if cards.is_empty() {
            info!("📭 第 {} 页没有职位卡片，列表结束", self.page);
            self.finished = true;
            return Ok(());
        }

        info!("📄 第 {} 页找到 {} 个职位", self.page, cards.len());
        self.pending = cards.into();
        self.position = 0;
        Ok(())
    }

    /// 点击下一页
    async fn advance_page(&mut self) -> AutomationResult<PageAdvance> {
        let target = self.page + 1;
        let selector = self.layout.next_page.for_page(target);

        let Some(button) = self.driver.locate(&selector).await? else {
            info!("没有第 {} 页，列表结束", target);
            return Ok(PageAdvance::End);
        };

        self.driver.click(&button).await?;
        info!("➡️ 翻到第 {} 页", target);
        sleep(self.settle).await;

        let rendered = self
            .driver
            .wait_for(
                &Condition::Present(self.layout.job_card.clone()),
                self.element_timeout,
            )
            .await?;
        if !rendered {
            warn!("⚠️ 第 {} 页的职位卡片未在超时内出现", target);
        }

        self.page = target;
        self.page_loaded = false;
        Ok(PageAdvance::Advanced)
    }

    /// 读取卡片上的标题、公司和"已申请"标记
    async fn describe(&self, card: D::Handle) -> AutomationResult<JobListing<D::Handle>> {
        let title = self
            .text_within(&card, &self.layout.job_card_title)
            .await?
            .unwrap_or_else(|| format!("未知职位 #{}", self.position));
        let company = self
            .text_within(&card, &self.layout.job_card_company)
            .await?
            .unwrap_or_default();
        let already_applied = self
            .driver
            .locate_within(&card, &self.layout.job_card_applied)
            .await?
            .is_some();

        debug!(
            "卡片 {}-{}: {} | {} | 已申请: {}",
            self.page, self.position, title, company, already_applied
        );

        Ok(JobListing {
            page: self.page,
            position: self.position,
            title,
            company,
            already_applied,
            handle: card,
        })
    }

    async fn text_within(
        &self,
        card: &D::Handle,
        selector: &crate::infrastructure::Selector,
    ) -> AutomationResult<Option<String>> {
        match self.driver.locate_within(card, selector).await? {
            Some(element) => {
                let text = self.driver.read_text(&element).await?;
                Ok(Some(text).filter(|t| !t.is_empty()))
            }
            None => Ok(None),
        }
    }
}
