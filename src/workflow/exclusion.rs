//! 排除关键词

use regex::{Regex, RegexBuilder};

use crate::error::ConfigError;

/// 职位标题 / 公司名命中任一关键词（整词、忽略大小写）即排除
#[derive(Debug, Clone)]
pub struct ExclusionFilter {
    pattern: Option<Regex>,
}

impl ExclusionFilter {
    pub fn new(keywords: &[String]) -> Result<Self, ConfigError> {
        let escaped: Vec<String> = keywords
            .iter()
            .map(|k| k.trim())
            .filter(|k| !k.is_empty())
            .map(regex::escape)
            .collect();

        if escaped.is_empty() {
            return Ok(Self { pattern: None });
        }

        let pattern = RegexBuilder::new(&format!(r"(?:^|\W)({})(?:\W|$)", escaped.join("|")))
            .case_insensitive(true)
            .build()
            .map_err(|e| ConfigError::InvalidValue {
                field: "exclusion_keywords".to_string(),
                reason: e.to_string(),
            })?;

        Ok(Self {
            pattern: Some(pattern),
        })
    }

    /// 返回命中的关键词
    pub fn matched(&self, text: &str) -> Option<String> {
        self.pattern
            .as_ref()?
            .captures(text)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
    }
}
