//! 内存中的假招聘网站，实现 `UiDriver`
//!
//! 选择器都是简单的记号（见 `fake_layout`），页面状态保存在 Mutex 里，
//! 每个测试自己拼装页面、职位和筛选问题

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use easy_apply_submit::config::Timeouts;
use easy_apply_submit::error::DriverError;
use easy_apply_submit::infrastructure::{DiagnosticRef, Selector, SiteLayout, UiDriver};
use easy_apply_submit::models::question::QuestionKind;
use easy_apply_submit::models::session::{Credentials, Identity, SessionConfig};
use easy_apply_submit::services::{
    AnswerCache, AnswerStore, QuestionResolver, ResolverSettings,
};

pub const PLACEHOLDER: &str = "Select an option";

pub fn fake_layout() -> SiteLayout {
    SiteLayout {
        login_url: "fake://login".to_string(),
        username_input: "username".into(),
        password_input: "password".into(),
        login_submit: "login-submit".into(),
        login_landmark: "landmark".into(),
        jobs_url: "fake://jobs".to_string(),
        search_title_input: "search-title".into(),
        search_location_input: "search-location".into(),
        easy_apply_filter: "easy-apply".into(),
        date_posted_filter: "date-posted".into(),
        date_posted_past_week: "past-week".into(),
        date_posted_apply: "date-posted-apply".into(),
        job_card: "card".into(),
        job_card_title: "card-title".into(),
        job_card_company: "card-company".into(),
        job_card_applied: "card-applied".into(),
        next_page: "page-{page}".into(),
        apply_button: "apply".into(),
        email_field: "email".into(),
        phone_field: "phone".into(),
        question_group: "group".into(),
        question_label: "label".into(),
        dropdown_input: "dropdown".into(),
        binary_input: "radio".into(),
        numeric_input: "numeric".into(),
        text_input: "text".into(),
        dropdown_option: "dropdown-option".into(),
        binary_option: "radio-option".into(),
        placeholder_option: PLACEHOLDER.to_string(),
        next_step_button: "next-step".into(),
        review_button: "review".into(),
        submit_button: "submit".into(),
        dismiss_button: "dismiss".into(),
        discard_button: "discard".into(),
    }
}

/// 所有等待都很短，配合 `start_paused` 或真实时间都可以
pub fn fast_timeouts() -> Timeouts {
    Timeouts {
        landmark: Duration::from_millis(300),
        element: Duration::from_millis(200),
        answer: Duration::from_secs(5),
        poll_interval: Duration::from_millis(20),
        settle: Duration::from_millis(5),
    }
}

pub fn resolver_settings(timeouts: &Timeouts) -> ResolverSettings {
    ResolverSettings {
        poll_interval: timeouts.poll_interval,
        answer_timeout: timeouts.answer,
        interactive: true,
        placeholder: PLACEHOLDER.to_string(),
    }
}

pub fn resolver<S: AnswerStore>(store: S, timeouts: &Timeouts) -> QuestionResolver<S> {
    QuestionResolver::new(AnswerCache::new(store), resolver_settings(timeouts))
}

pub fn session_config(max_applications: usize) -> SessionConfig {
    SessionConfig {
        credentials: Credentials {
            email: "dev@example.com".into(),
            password: "hunter2".into(),
        },
        identity: Identity {
            email: "dev@example.com".into(),
            phone: None,
        },
        job_title: "Rust Engineer".into(),
        job_location: None,
        exclusion_keywords: Vec::new(),
        max_applications,
        headless: false,
        posted_within_week: false,
    }
}

// ---------- 页面内容 ----------

#[derive(Debug, Clone)]
pub struct FakeQuestion {
    pub label: String,
    pub kind: QuestionKind,
    pub options: Vec<String>,
    /// 人工在第 n 次读取后选择的答案
    pub human: Option<(String, usize)>,
    /// 选项能读到，但按文字选择时找不到
    pub rejects_select: bool,
}

impl FakeQuestion {
    fn new(label: &str, kind: QuestionKind, options: &[&str]) -> Self {
        Self {
            label: label.to_string(),
            kind,
            options: options.iter().map(|o| o.to_string()).collect(),
            human: None,
            rejects_select: false,
        }
    }

    pub fn binary(label: &str) -> Self {
        Self::new(label, QuestionKind::Binary, &["Yes", "No"])
    }

    /// 下拉框，第一个选项固定是占位文字
    pub fn dropdown(label: &str, options: &[&str]) -> Self {
        let mut all = vec![PLACEHOLDER];
        all.extend_from_slice(options);
        Self::new(label, QuestionKind::Dropdown, &all)
    }

    pub fn free_text(label: &str) -> Self {
        Self::new(label, QuestionKind::FreeText, &[])
    }

    pub fn numeric(label: &str) -> Self {
        Self::new(label, QuestionKind::Numeric, &[])
    }

    pub fn human_picks(mut self, answer: &str, after_reads: usize) -> Self {
        self.human = Some((answer.to_string(), after_reads));
        self
    }

    pub fn rejecting_select(mut self) -> Self {
        self.rejects_select = true;
        self
    }
}

#[derive(Debug, Clone)]
pub struct FakeListing {
    pub title: String,
    pub company: String,
    pub applied: bool,
    pub has_apply: bool,
    pub has_submit: bool,
    pub steps: Vec<Vec<FakeQuestion>>,
}

impl FakeListing {
    pub fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
            company: "Acme".to_string(),
            applied: false,
            has_apply: true,
            has_submit: true,
            steps: Vec::new(),
        }
    }

    pub fn at(mut self, company: &str) -> Self {
        self.company = company.to_string();
        self
    }

    pub fn already_applied(mut self) -> Self {
        self.applied = true;
        self
    }

    pub fn without_apply(mut self) -> Self {
        self.has_apply = false;
        self
    }

    pub fn without_submit(mut self) -> Self {
        self.has_submit = false;
        self
    }

    /// 追加一步表单
    pub fn step(mut self, questions: Vec<FakeQuestion>) -> Self {
        self.steps.push(questions);
        self
    }

    fn step_count(&self) -> usize {
        self.steps.len().max(1)
    }

    fn questions(&self, step: usize) -> &[FakeQuestion] {
        self.steps.get(step).map(Vec::as_slice).unwrap_or(&[])
    }
}

// ---------- 句柄 ----------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListingRef {
    pub page: usize,
    pub index: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct QuestionRef {
    pub listing: ListingRef,
    pub step: usize,
    pub index: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FakeHandle {
    Username,
    Password,
    LoginSubmit,
    Landmark,
    SearchTitle,
    SearchLocation,
    Filter(&'static str),
    Card(ListingRef),
    CardTitle(ListingRef),
    CardCompany(ListingRef),
    CardApplied(ListingRef),
    PageButton(usize),
    Apply,
    Email,
    Group(QuestionRef),
    Label(QuestionRef),
    Control(QuestionRef),
    Choice(QuestionRef, usize),
    NextStep,
    Submit,
    Dismiss,
    Discard,
}

const FILTERS: [&str; 4] = ["easy-apply", "date-posted", "past-week", "date-posted-apply"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Screen {
    Blank,
    Login,
    Jobs,
}

#[derive(Debug)]
struct SiteState {
    pages: Vec<Vec<FakeListing>>,
    screen: Screen,
    authenticated: bool,
    failing_logins: usize,
    missing: HashSet<String>,
    current_page: usize,
    open: Option<ListingRef>,
    dialog_open: bool,
    step: usize,
    submitted_current: bool,
    discard_pending: bool,
    email_value: String,
    /// 邮箱是下拉框时的可选项
    email_options: Option<Vec<String>>,
    sticky_dialog: bool,
    values: HashMap<QuestionRef, String>,
    reads: HashMap<QuestionRef, usize>,
    // 计数
    logins: usize,
    snapshots: Vec<String>,
    submitted: Vec<String>,
    opened: Vec<String>,
    filters_clicked: Vec<String>,
    polls: usize,
    discarded: usize,
}

pub struct FakeSite {
    pub layout: SiteLayout,
    state: Mutex<SiteState>,
}

impl FakeSite {
    pub fn new(pages: Vec<Vec<FakeListing>>) -> Self {
        Self {
            layout: fake_layout(),
            state: Mutex::new(SiteState {
                pages,
                screen: Screen::Blank,
                authenticated: false,
                failing_logins: 0,
                missing: HashSet::new(),
                current_page: 0,
                open: None,
                dialog_open: false,
                step: 0,
                submitted_current: false,
                discard_pending: false,
                email_value: String::new(),
                email_options: None,
                sticky_dialog: false,
                values: HashMap::new(),
                reads: HashMap::new(),
                logins: 0,
                snapshots: Vec::new(),
                submitted: Vec::new(),
                opened: Vec::new(),
                filters_clicked: Vec::new(),
                polls: 0,
                discarded: 0,
            }),
        }
    }

    pub fn single(listing: FakeListing) -> Self {
        Self::new(vec![vec![listing]])
    }

    /// 前 n 次登录失败（`usize::MAX` 表示永远失败）
    pub fn failing_logins(self, n: usize) -> Self {
        self.state.lock().unwrap().failing_logins = n;
        self
    }

    pub fn without_control(self, token: &str) -> Self {
        self.state.lock().unwrap().missing.insert(token.to_string());
        self
    }

    /// 邮箱以下拉框呈现，未选择时无法进入下一步
    pub fn email_as_dropdown(self, options: &[&str]) -> Self {
        self.state.lock().unwrap().email_options =
            Some(options.iter().map(|o| o.to_string()).collect());
        self
    }

    /// 点击关闭按钮后弹窗仍然留在页面上
    pub fn sticky_dialog(self) -> Self {
        self.state.lock().unwrap().sticky_dialog = true;
        self
    }

    pub fn logins(&self) -> usize {
        self.state.lock().unwrap().logins
    }

    pub fn snapshots(&self) -> Vec<String> {
        self.state.lock().unwrap().snapshots.clone()
    }

    pub fn submitted(&self) -> Vec<String> {
        self.state.lock().unwrap().submitted.clone()
    }

    /// 打开过的职位
    pub fn opened(&self) -> Vec<String> {
        self.state.lock().unwrap().opened.clone()
    }

    pub fn filters_clicked(&self) -> Vec<String> {
        self.state.lock().unwrap().filters_clicked.clone()
    }

    /// 人工作答通道被读取的次数
    pub fn polls(&self) -> usize {
        self.state.lock().unwrap().polls
    }

    pub fn discarded(&self) -> usize {
        self.state.lock().unwrap().discarded
    }

    pub fn email_value(&self) -> String {
        self.state.lock().unwrap().email_value.clone()
    }

    /// 按问题文字查找写入页面的值
    pub fn value_of(&self, label: &str) -> Option<String> {
        let state = self.state.lock().unwrap();
        state.values.iter().find_map(|(q, value)| {
            let listing = &state.pages[q.listing.page][q.listing.index];
            (listing.questions(q.step)[q.index].label == label).then(|| value.clone())
        })
    }

    fn email_blocks(state: &SiteState) -> bool {
        state.email_options.is_some() && state.email_value.is_empty()
    }

    fn question<'s>(state: &'s SiteState, q: QuestionRef) -> &'s FakeQuestion {
        &state.pages[q.listing.page][q.listing.index].questions(q.step)[q.index]
    }

    fn open_listing<'s>(state: &'s SiteState) -> Option<&'s FakeListing> {
        state
            .open
            .map(|l| &state.pages[l.page][l.index])
    }

    fn query(state: &SiteState, token: &str) -> Vec<FakeHandle> {
        if state.missing.contains(token) {
            return Vec::new();
        }
        let on_jobs = state.screen == Screen::Jobs && state.authenticated;
        let one = |present: bool, handle: FakeHandle| if present { vec![handle] } else { Vec::new() };

        match token {
            "username" => one(state.screen == Screen::Login, FakeHandle::Username),
            "password" => one(state.screen == Screen::Login, FakeHandle::Password),
            "login-submit" => one(state.screen == Screen::Login, FakeHandle::LoginSubmit),
            "landmark" => one(state.authenticated, FakeHandle::Landmark),
            "search-title" => one(on_jobs, FakeHandle::SearchTitle),
            "search-location" => one(on_jobs, FakeHandle::SearchLocation),
            "card" if on_jobs => state
                .pages
                .get(state.current_page)
                .map(|cards| {
                    (0..cards.len())
                        .map(|index| {
                            FakeHandle::Card(ListingRef {
                                page: state.current_page,
                                index,
                            })
                        })
                        .collect()
                })
                .unwrap_or_default(),
            "apply" => one(
                !state.dialog_open && Self::open_listing(state).is_some_and(|l| l.has_apply),
                FakeHandle::Apply,
            ),
            "email" => one(state.dialog_open && state.step == 0, FakeHandle::Email),
            "group" if state.dialog_open => {
                let Some(listing) = state.open else {
                    return Vec::new();
                };
                let count = Self::open_listing(state).map_or(0, |l| l.questions(state.step).len());
                (0..count)
                    .map(|index| {
                        FakeHandle::Group(QuestionRef {
                            listing,
                            step: state.step,
                            index,
                        })
                    })
                    .collect()
            }
            "next-step" | "submit" if state.dialog_open && !state.submitted_current => {
                let Some(listing) = Self::open_listing(state) else {
                    return Vec::new();
                };
                let last = state.step + 1 >= listing.step_count();
                match token {
                    "next-step" => one(!last, FakeHandle::NextStep),
                    _ => one(last && listing.has_submit, FakeHandle::Submit),
                }
            }
            "dismiss" => one(state.dialog_open, FakeHandle::Dismiss),
            "discard" => one(state.discard_pending, FakeHandle::Discard),
            filter if on_jobs => {
                if let Some(name) = FILTERS.iter().find(|f| **f == filter) {
                    return vec![FakeHandle::Filter(*name)];
                }
                match filter.strip_prefix("page-").and_then(|n| n.parse::<usize>().ok()) {
                    // 页码从 1 开始
                    Some(n) if n >= 1 && n <= state.pages.len() => vec![FakeHandle::PageButton(n)],
                    _ => Vec::new(),
                }
            }
            _ => Vec::new(),
        }
    }

    fn query_within(state: &SiteState, parent: &FakeHandle, token: &str) -> Vec<FakeHandle> {
        match (parent, token) {
            (FakeHandle::Card(l), "card-title") => vec![FakeHandle::CardTitle(*l)],
            (FakeHandle::Card(l), "card-company") => vec![FakeHandle::CardCompany(*l)],
            (FakeHandle::Card(l), "card-applied") => {
                if state.pages[l.page][l.index].applied {
                    vec![FakeHandle::CardApplied(*l)]
                } else {
                    Vec::new()
                }
            }
            (FakeHandle::Group(q), "label") => vec![FakeHandle::Label(*q)],
            (FakeHandle::Group(q), control) => {
                let kind = Self::question(state, *q).kind;
                let matches = matches!(
                    (kind, control),
                    (QuestionKind::Dropdown, "dropdown")
                        | (QuestionKind::Binary, "radio")
                        | (QuestionKind::Numeric, "numeric")
                        | (QuestionKind::FreeText, "text")
                );
                if matches {
                    vec![FakeHandle::Control(*q)]
                } else {
                    Vec::new()
                }
            }
            (FakeHandle::Control(q), "dropdown-option" | "radio-option") => {
                let count = Self::question(state, *q).options.len();
                (0..count).map(|i| FakeHandle::Choice(*q, i)).collect()
            }
            _ => Vec::new(),
        }
    }
}

#[async_trait]
impl UiDriver for FakeSite {
    type Handle = FakeHandle;

    async fn navigate(&self, url: &str) -> Result<(), DriverError> {
        let mut state = self.state.lock().unwrap();
        state.screen = if url == self.layout.login_url {
            Screen::Login
        } else if url == self.layout.jobs_url {
            state.current_page = 0;
            state.open = None;
            state.dialog_open = false;
            Screen::Jobs
        } else {
            return Err(DriverError::NavigationFailed {
                url: url.to_string(),
                message: "unknown page".into(),
            });
        };
        Ok(())
    }

    async fn locate(&self, selector: &Selector) -> Result<Option<FakeHandle>, DriverError> {
        let state = self.state.lock().unwrap();
        Ok(Self::query(&state, selector.as_str()).into_iter().next())
    }

    async fn locate_all(&self, selector: &Selector) -> Result<Vec<FakeHandle>, DriverError> {
        let state = self.state.lock().unwrap();
        Ok(Self::query(&state, selector.as_str()))
    }

    async fn locate_within(
        &self,
        parent: &FakeHandle,
        selector: &Selector,
    ) -> Result<Option<FakeHandle>, DriverError> {
        let state = self.state.lock().unwrap();
        Ok(Self::query_within(&state, parent, selector.as_str())
            .into_iter()
            .next())
    }

    async fn locate_all_within(
        &self,
        parent: &FakeHandle,
        selector: &Selector,
    ) -> Result<Vec<FakeHandle>, DriverError> {
        let state = self.state.lock().unwrap();
        Ok(Self::query_within(&state, parent, selector.as_str()))
    }

    async fn fill(&self, handle: &FakeHandle, text: &str) -> Result<(), DriverError> {
        let mut state = self.state.lock().unwrap();
        match handle {
            // 在下拉框上打字不会选中任何选项
            FakeHandle::Email if state.email_options.is_some() => {}
            FakeHandle::Email => state.email_value = text.to_string(),
            FakeHandle::Control(q) => {
                state.values.insert(*q, text.to_string());
            }
            _ => {}
        }
        Ok(())
    }

    async fn click(&self, handle: &FakeHandle) -> Result<(), DriverError> {
        let mut state = self.state.lock().unwrap();
        match *handle {
            FakeHandle::LoginSubmit => {
                state.logins += 1;
                if state.failing_logins > 0 {
                    state.failing_logins -= 1;
                } else {
                    state.authenticated = true;
                }
            }
            FakeHandle::Filter(name) => state.filters_clicked.push(name.to_string()),
            FakeHandle::Card(l) => {
                let title = state.pages[l.page][l.index].title.clone();
                state.opened.push(title);
                state.open = Some(l);
                state.dialog_open = false;
            }
            FakeHandle::PageButton(n) => {
                state.current_page = n - 1;
                state.open = None;
            }
            FakeHandle::Apply => {
                state.dialog_open = true;
                state.step = 0;
                state.submitted_current = false;
            }
            FakeHandle::NextStep | FakeHandle::Submit if Self::email_blocks(&state) => {}
            FakeHandle::NextStep => state.step += 1,
            FakeHandle::Submit => {
                if let Some(l) = state.open {
                    let listing = &mut state.pages[l.page][l.index];
                    listing.applied = true;
                    let title = listing.title.clone();
                    state.submitted.push(title);
                }
                state.submitted_current = true;
            }
            FakeHandle::Dismiss => {
                state.dialog_open = state.sticky_dialog;
                state.discard_pending = !state.submitted_current;
            }
            FakeHandle::Discard => {
                state.discard_pending = false;
                state.discarded += 1;
            }
            _ => {}
        }
        Ok(())
    }

    async fn press_enter(&self, _handle: &FakeHandle) -> Result<(), DriverError> {
        Ok(())
    }

    async fn select(&self, handle: &FakeHandle, label: &str) -> Result<(), DriverError> {
        let mut state = self.state.lock().unwrap();
        let missing = || DriverError::OptionNotFound {
            label: label.to_string(),
        };
        match *handle {
            FakeHandle::Email => {
                let offered = state
                    .email_options
                    .as_ref()
                    .is_some_and(|options| options.iter().any(|o| o == label));
                if !offered {
                    return Err(missing());
                }
                state.email_value = label.to_string();
                Ok(())
            }
            FakeHandle::Control(q) => {
                let question = Self::question(&state, q);
                if question.rejects_select || !question.options.iter().any(|o| o == label) {
                    return Err(missing());
                }
                state.values.insert(q, label.to_string());
                Ok(())
            }
            _ => Err(DriverError::action("select", "not a choice control")),
        }
    }

    async fn is_select(&self, handle: &FakeHandle) -> Result<bool, DriverError> {
        let state = self.state.lock().unwrap();
        Ok(match *handle {
            FakeHandle::Email => state.email_options.is_some(),
            FakeHandle::Control(q) => Self::question(&state, q).kind == QuestionKind::Dropdown,
            _ => false,
        })
    }

    async fn read_value(&self, handle: &FakeHandle) -> Result<String, DriverError> {
        let mut state = self.state.lock().unwrap();
        match *handle {
            FakeHandle::Email if state.email_options.is_some() && state.email_value.is_empty() => {
                Ok(PLACEHOLDER.to_string())
            }
            FakeHandle::Email => Ok(state.email_value.clone()),
            FakeHandle::Control(q) => {
                state.polls += 1;
                let reads = {
                    let counter = state.reads.entry(q).or_insert(0);
                    *counter += 1;
                    *counter
                };
                if let Some(value) = state.values.get(&q) {
                    return Ok(value.clone());
                }
                let question = Self::question(&state, q).clone();
                if let Some((answer, after)) = question.human {
                    if reads > after {
                        state.values.insert(q, answer.clone());
                        return Ok(answer);
                    }
                }
                Ok(match question.kind {
                    QuestionKind::Dropdown => PLACEHOLDER.to_string(),
                    _ => String::new(),
                })
            }
            _ => Ok(String::new()),
        }
    }

    async fn read_text(&self, handle: &FakeHandle) -> Result<String, DriverError> {
        let state = self.state.lock().unwrap();
        Ok(match *handle {
            FakeHandle::CardTitle(l) => state.pages[l.page][l.index].title.clone(),
            FakeHandle::CardCompany(l) => state.pages[l.page][l.index].company.clone(),
            FakeHandle::Label(q) => Self::question(&state, q).label.clone(),
            FakeHandle::Choice(q, i) => Self::question(&state, q).options[i].clone(),
            _ => String::new(),
        })
    }

    async fn snapshot(&self, label: &str) -> Result<DiagnosticRef, DriverError> {
        let mut state = self.state.lock().unwrap();
        state.snapshots.push(label.to_string());
        Ok(DiagnosticRef::new(format!("fake/{}.png", label)))
    }
}
