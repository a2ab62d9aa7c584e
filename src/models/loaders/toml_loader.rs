use std::path::{Path, PathBuf};

use tokio::fs;

use crate::error::{ConfigError, ProviderError};
use crate::infrastructure::SiteLayout;
use crate::models::profile::UserProfile;

/// 从 TOML 文件加载用户资料
pub async fn load_profile_toml(toml_file_path: &Path) -> Result<UserProfile, ProviderError> {
    let source_name = toml_file_path.display().to_string();

    let content =
        fs::read_to_string(toml_file_path)
            .await
            .map_err(|e| ProviderError::ParseFailed {
                source_name: source_name.clone(),
                message: format!("无法读取TOML文件: {}", e),
            })?;

    let profile: UserProfile = toml::from_str(&content).map_err(|e| ProviderError::ParseFailed {
        source_name: source_name.clone(),
        message: format!("无法解析TOML文件: {}", e),
    })?;

    tracing::info!(
        "成功加载用户资料: {} (预置问答 {} 条)",
        source_name,
        profile.screening_answers.len()
    );

    Ok(profile)
}

/// 按用户 ID 定位资料文件：`<folder>/<user_id>.toml`
pub fn profile_path(folder: &str, user_id: u64) -> PathBuf {
    PathBuf::from(folder).join(format!("{}.toml", user_id))
}

/// 从 TOML 文件加载页面布局，未写出的字段使用默认值
pub async fn load_layout_toml(toml_file_path: &Path) -> Result<SiteLayout, ConfigError> {
    let path = toml_file_path.display().to_string();

    let content = fs::read_to_string(toml_file_path)
        .await
        .map_err(|e| ConfigError::LayoutParseFailed {
            path: path.clone(),
            message: e.to_string(),
        })?;

    let layout: SiteLayout =
        toml::from_str(&content).map_err(|e| ConfigError::LayoutParseFailed {
            path: path.clone(),
            message: e.to_string(),
        })?;

    tracing::info!("已加载页面布局: {}", path);
    Ok(layout)
}
