use std::time::Duration;

use crate::models::session::RunSettings;

/// 各挂起点的超时设置
#[derive(Clone, Copy, Debug)]
pub struct Timeouts {
    /// 登录后等待标志元素
    pub landmark: Duration,
    /// 等待普通元素出现
    pub element: Duration,
    /// 等待用户手动选择答案
    pub answer: Duration,
    /// 轮询用户选择的间隔
    pub poll_interval: Duration,
    /// 点击后等待页面稳定
    pub settle: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            landmark: Duration::from_secs(20),
            element: Duration::from_secs(10),
            answer: Duration::from_secs(300),
            poll_interval: Duration::from_millis(500),
            settle: Duration::from_secs(3),
        }
    }
}

/// 程序配置文件
#[derive(Clone, Debug)]
pub struct Config {
    /// 浏览器调试端口，设置后连接已打开的浏览器而不是启动新浏览器
    pub browser_debug_port: Option<u16>,
    /// 浏览器可执行文件路径（不设置则由 chromiumoxide 自动查找）
    pub chrome_executable: Option<String>,
    /// 无头模式
    pub headless: bool,
    /// 答案缓存文件
    pub answer_cache_file: String,
    /// 未答问题记录文件
    pub unresolved_file: String,
    /// 诊断截图目录
    pub diagnostics_dir: String,
    /// 输出日志文件
    pub output_log_file: String,
    /// 页面布局 TOML 文件（可选）
    pub layout_file: Option<String>,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    // --- 用户数据 ---
    pub user_id: u64,
    /// 用户数据接口地址，设置后优先使用
    pub profile_api_base_url: Option<String>,
    /// 本地用户资料目录（`<user_id>.toml`）
    pub profile_folder: String,
    // --- 运行参数 ---
    pub max_applications: usize,
    pub max_retries: usize,
    pub max_form_steps: usize,
    pub retry_delay: Duration,
    pub exclusion_keywords: Vec<String>,
    pub posted_within_week: bool,
    pub timeouts: Timeouts,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            browser_debug_port: None,
            chrome_executable: None,
            headless: false,
            answer_cache_file: "dropdown_response.json".to_string(),
            unresolved_file: "unanswered.txt".to_string(),
            diagnostics_dir: "diagnostics".to_string(),
            output_log_file: "output.txt".to_string(),
            layout_file: None,
            verbose_logging: false,
            user_id: 1,
            profile_api_base_url: None,
            profile_folder: "profiles".to_string(),
            max_applications: 10,
            max_retries: 3,
            max_form_steps: 10,
            retry_delay: Duration::from_secs(5),
            exclusion_keywords: Vec::new(),
            posted_within_week: false,
            timeouts: Timeouts::default(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let default = Self::default();
        let secs = |var: &str, fallback: Duration| {
            std::env::var(var).ok().and_then(|v| v.parse().ok()).map(Duration::from_secs).unwrap_or(fallback)
        };
        let millis = |var: &str, fallback: Duration| {
            std::env::var(var).ok().and_then(|v| v.parse().ok()).map(Duration::from_millis).unwrap_or(fallback)
        };

        Self {
            browser_debug_port: std::env::var("BROWSER_DEBUG_PORT").ok().and_then(|v| v.parse().ok()),
            chrome_executable: std::env::var("CHROME_EXECUTABLE").ok().filter(|v| !v.is_empty()),
            headless: std::env::var("HEADLESS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.headless),
            answer_cache_file: std::env::var("ANSWER_CACHE_FILE").unwrap_or(default.answer_cache_file),
            unresolved_file: std::env::var("UNRESOLVED_FILE").unwrap_or(default.unresolved_file),
            diagnostics_dir: std::env::var("DIAGNOSTICS_DIR").unwrap_or(default.diagnostics_dir),
            output_log_file: std::env::var("OUTPUT_LOG_FILE").unwrap_or(default.output_log_file),
            layout_file: std::env::var("LAYOUT_FILE").ok().filter(|v| !v.is_empty()),
            verbose_logging: std::env::var("VERBOSE_LOGGING").ok().and_then(|v| v.parse().ok()).unwrap_or(default.verbose_logging),
            user_id: std::env::var("USER_ID").ok().and_then(|v| v.parse().ok()).unwrap_or(default.user_id),
            profile_api_base_url: std::env::var("PROFILE_API_BASE_URL").ok().filter(|v| !v.is_empty()),
            profile_folder: std::env::var("PROFILE_FOLDER").unwrap_or(default.profile_folder),
            max_applications: std::env::var("MAX_APPLICATIONS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.max_applications),
            max_retries: std::env::var("MAX_RETRIES").ok().and_then(|v| v.parse().ok()).unwrap_or(default.max_retries),
            max_form_steps: std::env::var("MAX_FORM_STEPS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.max_form_steps),
            retry_delay: secs("RETRY_DELAY_SECS", default.retry_delay),
            exclusion_keywords: std::env::var("EXCLUDE_KEYWORDS")
                .map(|v| v.split(',').map(|k| k.trim().to_string()).filter(|k| !k.is_empty()).collect())
                .unwrap_or(default.exclusion_keywords),
            posted_within_week: std::env::var("POSTED_WITHIN_WEEK").ok().and_then(|v| v.parse().ok()).unwrap_or(default.posted_within_week),
            timeouts: Timeouts {
                landmark: secs("LANDMARK_TIMEOUT_SECS", default.timeouts.landmark),
                element: secs("ELEMENT_TIMEOUT_SECS", default.timeouts.element),
                answer: secs("ANSWER_TIMEOUT_SECS", default.timeouts.answer),
                poll_interval: millis("POLL_INTERVAL_MS", default.timeouts.poll_interval),
                settle: millis("SETTLE_MS", default.timeouts.settle),
            },
        }
    }

    /// 本次运行参数
    pub fn run_settings(&self) -> RunSettings {
        RunSettings {
            exclusion_keywords: self.exclusion_keywords.clone(),
            max_applications: self.max_applications,
            headless: self.headless,
            posted_within_week: self.posted_within_week,
        }
    }
}
