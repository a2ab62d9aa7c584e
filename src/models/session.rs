use std::fmt;

use serde::Serialize;

use crate::error::ConfigError;
use crate::models::listing::AttemptOutcome;
use crate::models::profile::UserProfile;

/// 登录凭据
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"******")
            .finish()
    }
}

/// 申请表中的身份字段
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub email: String,
    pub phone: Option<String>,
}

/// 本次运行的参数（不来自用户资料的部分）
#[derive(Debug, Clone)]
pub struct RunSettings {
    pub exclusion_keywords: Vec<String>,
    pub max_applications: usize,
    pub headless: bool,
    pub posted_within_week: bool,
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            exclusion_keywords: Vec::new(),
            max_applications: 10,
            headless: false,
            posted_within_week: false,
        }
    }
}

/// 一次运行的不可变输入
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub credentials: Credentials,
    pub identity: Identity,
    pub job_title: String,
    pub job_location: Option<String>,
    pub exclusion_keywords: Vec<String>,
    pub max_applications: usize,
    pub headless: bool,
    /// 只看最近一周发布的职位
    pub posted_within_week: bool,
}

impl SessionConfig {
    /// 从用户资料构建，缺字段或取值非法时拒绝
    pub fn from_profile(profile: &UserProfile, settings: RunSettings) -> Result<Self, ConfigError> {
        let config = Self {
            credentials: Credentials {
                email: profile.email.trim().to_string(),
                password: profile.password.clone(),
            },
            identity: Identity {
                email: profile.email.trim().to_string(),
                phone: profile.phone.clone(),
            },
            job_title: profile.job_title.trim().to_string(),
            job_location: profile
                .job_location
                .as_deref()
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .map(str::to_string),
            exclusion_keywords: settings
                .exclusion_keywords
                .into_iter()
                .map(|k| k.trim().to_string())
                .filter(|k| !k.is_empty())
                .collect(),
            max_applications: settings.max_applications,
            headless: settings.headless,
            posted_within_week: settings.posted_within_week,
        };
        config.validate()?;
        Ok(config)
    }

    /// 运行前置条件
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.credentials.email.is_empty() {
            return Err(ConfigError::MissingField {
                field: "email".to_string(),
            });
        }
        if self.credentials.password.is_empty() {
            return Err(ConfigError::MissingField {
                field: "password".to_string(),
            });
        }
        if self.job_title.is_empty() {
            return Err(ConfigError::MissingField {
                field: "job_title".to_string(),
            });
        }
        if self.max_applications < 1 {
            return Err(ConfigError::InvalidValue {
                field: "max_applications".to_string(),
                reason: "至少为 1".to_string(),
            });
        }
        Ok(())
    }
}

/// 运行统计，返回给调用方
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub applied: usize,
    pub skipped: usize,
    pub failed: usize,
    pub attempts: usize,
}

/// 会话控制器独占的计数器，每次重试都会重置
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunState {
    pub applied: usize,
    pub skipped: usize,
    pub failed: usize,
    pub current_page: usize,
    pub attempt: usize,
}

impl RunState {
    pub fn new(attempt: usize) -> Self {
        Self {
            current_page: 1,
            attempt,
            ..Default::default()
        }
    }

    pub fn record(&mut self, outcome: &AttemptOutcome) {
        match outcome {
            AttemptOutcome::Applied => self.applied += 1,
            AttemptOutcome::Skipped(_) => self.skipped += 1,
            AttemptOutcome::Failed(_) => self.failed += 1,
        }
    }

    pub fn summary(&self) -> RunSummary {
        RunSummary {
            applied: self.applied,
            skipped: self.skipped,
            failed: self.failed,
            attempts: self.attempt,
        }
    }
}
