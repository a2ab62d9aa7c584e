//! 页面布局
//!
//! 目标网站的 URL 和全部选择器都集中在这里，作为数据而不是代码。
//! 网站改版时只需要提供新的布局 TOML 文件（见 `LAYOUT_FILE`），
//! 缺省字段沿用默认值

use serde::Deserialize;

use crate::infrastructure::driver::Selector;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SiteLayout {
    // --- 登录 ---
    pub login_url: String,
    pub username_input: Selector,
    pub password_input: Selector,
    pub login_submit: Selector,
    /// 登录成功后才会出现的标志元素
    pub login_landmark: Selector,

    // --- 搜索与筛选 ---
    pub jobs_url: String,
    pub search_title_input: Selector,
    pub search_location_input: Selector,
    pub easy_apply_filter: Selector,
    pub date_posted_filter: Selector,
    pub date_posted_past_week: Selector,
    pub date_posted_apply: Selector,

    // --- 职位列表 ---
    pub job_card: Selector,
    pub job_card_title: Selector,
    pub job_card_company: Selector,
    /// 职位卡片上的"已申请"标记
    pub job_card_applied: Selector,
    /// 翻页按钮，`{page}` 会被替换为目标页码
    pub next_page: Selector,

    // --- 申请表单 ---
    pub apply_button: Selector,
    pub email_field: Selector,
    pub phone_field: Selector,
    pub question_group: Selector,
    pub question_label: Selector,
    pub dropdown_input: Selector,
    pub binary_input: Selector,
    pub numeric_input: Selector,
    pub text_input: Selector,
    pub dropdown_option: Selector,
    pub binary_option: Selector,
    /// 下拉框未选择时显示的占位文字
    pub placeholder_option: String,
    pub next_step_button: Selector,
    pub review_button: Selector,
    pub submit_button: Selector,
    pub dismiss_button: Selector,
    pub discard_button: Selector,
}

impl Default for SiteLayout {
    fn default() -> Self {
        Self {
            login_url: "https://www.linkedin.com/login".to_string(),
            username_input: r#"input[name="session_key"]"#.into(),
            password_input: r#"input[name="session_password"]"#.into(),
            login_submit: r#"button[type="submit"]"#.into(),
            login_landmark: "a.global-nav__primary-link--active".into(),

            jobs_url: "https://www.linkedin.com/jobs/".to_string(),
            search_title_input: r#"input[aria-label="Search by title, skill, or company"]"#
                .into(),
            search_location_input: r#"input[aria-label="City, state, or zip code"]"#.into(),
            easy_apply_filter: r#"button[aria-label="Easy Apply filter."]"#.into(),
            date_posted_filter: r#"button[aria-label^="Date posted filter"]"#.into(),
            date_posted_past_week: r#"label[for="timePostedRange-r604800"]"#.into(),
            date_posted_apply: r#"button[aria-label^="Apply current filter to show"]"#.into(),

            job_card: "div.job-card-container".into(),
            job_card_title: ".job-card-list__title, .job-card-container__link".into(),
            job_card_company: ".artdeco-entity-lockup__subtitle".into(),
            job_card_applied: ".job-card-container__footer-job-state".into(),
            next_page: r#"button[aria-label="Page {page}"]"#.into(),

            apply_button: "button.jobs-apply-button".into(),
            email_field: r#"select[id*="email"], input[id*="email"]"#.into(),
            phone_field: r#"input[id*="phoneNumber"]"#.into(),
            question_group: "div.jobs-easy-apply-form-section__grouping".into(),
            question_label: "label, legend".into(),
            dropdown_input: "select".into(),
            binary_input: "fieldset[data-test-form-builder-radio-button-form-component]".into(),
            numeric_input: r#"input[type="number"], input[id*="numeric"]"#.into(),
            text_input: r#"input[type="text"], textarea"#.into(),
            dropdown_option: "option".into(),
            binary_option: "label".into(),
            placeholder_option: "Select an option".to_string(),
            next_step_button: r#"button[aria-label="Continue to next step"]"#.into(),
            review_button: r#"button[aria-label="Review your application"]"#.into(),
            submit_button: r#"button[aria-label="Submit application"]"#.into(),
            dismiss_button: r#"button[aria-label="Dismiss"]"#.into(),
            discard_button: r#"button[data-control-name="discard_application_confirm_btn"]"#
                .into(),
        }
    }
}

impl SiteLayout {
    /// 判断是否为未选择状态
    pub fn is_placeholder(&self, value: &str) -> bool {
        let value = value.trim();
        value.is_empty() || value == self.placeholder_option
    }
}
