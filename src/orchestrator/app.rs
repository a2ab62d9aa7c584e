//! 应用入口 - 编排层
//!
//! ## 职责
//!
//! 1. **应用初始化**：日志文件、答案缓存、用户资料、页面布局、浏览器
//! 2. **资源管理**：唯一持有 Browser 和 ChromiumDriver 的模块
//! 3. **运行**：交给 Supervisor 监督 SessionController
//! 4. **全局统计**：输出并记录 RunSummary

use std::path::Path;

use anyhow::{Context, Result};
use chromiumoxide::{Browser, Page};
use tracing::{info, warn};

use crate::browser;
use crate::config::Config;
use crate::infrastructure::{ChromiumDriver, SiteLayout};
use crate::models::loaders::load_layout_toml;
use crate::models::session::{RunSummary, SessionConfig};
use crate::orchestrator::session_controller::SessionController;
use crate::orchestrator::supervisor::Supervisor;
use crate::services::{
    AnswerCache, HttpProfileProvider, JsonFileStore, ProfileProvider, QuestionResolver,
    ResolverSettings, TomlProfileProvider, UnresolvedWriter,
};
use crate::utils::logging;

/// 应用主结构
pub struct App {
    config: Config,
    session: SessionConfig,
    layout: SiteLayout,
    resolver: QuestionResolver<JsonFileStore>,
    driver: ChromiumDriver,
    _browser: Browser,
}

impl App {
    /// 初始化应用
    pub async fn initialize(config: Config) -> Result<Self> {
        logging::init_log_file(&config.output_log_file)
            .with_context(|| format!("无法写入日志文件 {}", config.output_log_file))?;

        let store = JsonFileStore::open(&config.answer_cache_file).await?;
        let mut cache = AnswerCache::new(store);
        info!("📚 已加载 {} 条缓存答案", cache.len());

        let profile = profile_provider(&config)
            .fetch_session_config(config.user_id)
            .await
            .with_context(|| format!("获取用户 {} 的资料失败", config.user_id))?;
        let seeded = cache.seed(&profile.screening_answers).await?;
        if seeded > 0 {
            info!("🌱 从用户资料预置了 {} 条答案", seeded);
        }

        let session = SessionConfig::from_profile(&profile, config.run_settings())
            .context("用户资料不完整")?;

        let layout = match &config.layout_file {
            Some(path) => load_layout_toml(Path::new(path)).await?,
            None => SiteLayout::default(),
        };

        let (browser, page) = open_browser(&config).await?;
        let driver = ChromiumDriver::new(page, &config.diagnostics_dir);

        let settings = ResolverSettings {
            poll_interval: config.timeouts.poll_interval,
            answer_timeout: config.timeouts.answer,
            interactive: !session.headless,
            placeholder: layout.placeholder_option.clone(),
        };
        if !settings.interactive {
            warn!("⚠️ 无头模式下无法人工作答，缓存未命中的问题将直接失败");
        }
        let resolver = QuestionResolver::new(cache, settings)
            .with_unresolved_writer(UnresolvedWriter::with_path(&config.unresolved_file));

        Ok(Self {
            config,
            session,
            layout,
            resolver,
            driver,
            _browser: browser,
        })
    }

    /// 运行应用主逻辑
    pub async fn run(self) -> Result<RunSummary> {
        let Self {
            config,
            session,
            layout,
            resolver,
            driver,
            _browser,
        } = self;

        logging::log_startup(
            &session.job_title,
            session.max_applications,
            config.max_retries,
        );

        let mut controller = SessionController::new(
            &driver,
            &layout,
            config.timeouts,
            config.max_form_steps,
            resolver,
        );
        let mut supervisor = Supervisor::new(config.max_retries, config.retry_delay);
        let summary = match supervisor.supervise(&mut controller, &session).await {
            Ok(summary) => summary,
            Err(e) => {
                logging::print_final_stats(&e.last_summary, &config.output_log_file);
                logging::append_summary(&config.output_log_file, &e.last_summary)?;
                return Err(e.into());
            }
        };

        logging::print_final_stats(&summary, &config.output_log_file);
        logging::append_summary(&config.output_log_file, &summary)?;

        Ok(summary)
    }
}

/// 配置了接口地址时用 HTTP，否则读本地 TOML
fn profile_provider(config: &Config) -> Box<dyn ProfileProvider> {
    match &config.profile_api_base_url {
        Some(base_url) => {
            info!("👤 从接口获取用户资料: {}", base_url);
            Box::new(HttpProfileProvider::new(base_url.as_str()))
        }
        None => {
            info!("👤 从本地目录读取用户资料: {}", config.profile_folder);
            Box::new(TomlProfileProvider::new(config.profile_folder.as_str()))
        }
    }
}

async fn open_browser(config: &Config) -> Result<(Browser, Page)> {
    let opened = match config.browser_debug_port {
        Some(port) => browser::connect_to_browser(port).await?,
        None => {
            browser::launch_browser(config.headless, config.chrome_executable.as_deref()).await?
        }
    };
    Ok(opened)
}
