use std::fmt;

/// 结果页上的一个职位
///
/// 只在一次列表循环内有效，处理完即丢弃
#[derive(Debug)]
pub struct JobListing<H> {
    /// 所在页码（从 1 开始）
    pub page: usize,
    /// 在当前页中的序号（从 1 开始）
    pub position: usize,
    pub title: String,
    pub company: String,
    /// 目标网站已标记为"已申请"
    pub already_applied: bool,
    /// 职位卡片元素
    pub handle: H,
}

impl<H> JobListing<H> {
    pub fn display_name(&self) -> String {
        if self.company.is_empty() {
            self.title.clone()
        } else {
            format!("{} @ {}", self.title, self.company)
        }
    }
}

/// 跳过原因
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    AlreadyApplied,
    NoApplyControl,
    ExcludedKeyword(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::AlreadyApplied => f.write_str("already-applied"),
            SkipReason::NoApplyControl => f.write_str("no-apply-control"),
            SkipReason::ExcludedKeyword(keyword) => write!(f, "excluded-keyword: {}", keyword),
        }
    }
}

/// 失败原因
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailReason {
    NoSubmitOrNext,
    StepLimit,
    ElementNotFound(String),
    UnresolvedQuestion(String),
    AnswerTimeout(String),
}

impl fmt::Display for FailReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailReason::NoSubmitOrNext => f.write_str("no-submit-or-next"),
            FailReason::StepLimit => f.write_str("step-limit"),
            FailReason::ElementNotFound(element) => write!(f, "element-not-found: {}", element),
            FailReason::UnresolvedQuestion(q) => write!(f, "unresolved-question: {}", q),
            FailReason::AnswerTimeout(q) => write!(f, "answer-timeout: {}", q),
        }
    }
}

/// 单个职位的处理结果，只用于日志和计数
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptOutcome {
    Applied,
    Skipped(SkipReason),
    Failed(FailReason),
}

impl fmt::Display for AttemptOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttemptOutcome::Applied => f.write_str("Applied"),
            AttemptOutcome::Skipped(reason) => write!(f, "Skipped({})", reason),
            AttemptOutcome::Failed(reason) => write!(f, "Failed({})", reason),
        }
    }
}
