//! 未答问题记录 - 业务能力层
//!
//! 只负责"写 unanswered.txt"能力，不关心流程。
//! 用户可以据此补充预置问答，下次运行就能自动作答

use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use crate::models::question::ScreeningQuestion;

/// 未答问题记录
pub struct UnresolvedWriter {
    file_path: String,
}

impl UnresolvedWriter {
    pub fn new() -> Self {
        Self {
            file_path: "unanswered.txt".to_string(),
        }
    }

    /// 使用自定义文件路径创建
    pub fn with_path(path: impl Into<String>) -> Self {
        Self {
            file_path: path.into(),
        }
    }

    pub fn path(&self) -> &str {
        &self.file_path
    }

    /// 追加一条记录
    ///
    /// # 参数
    /// - `listing`: 职位名称（用于定位）
    /// - `question`: 没有答案的问题
    pub async fn write(&self, listing: &str, question: &ScreeningQuestion) -> std::io::Result<()> {
        debug!(
            "记录未答问题: {} | {:?} | {}",
            listing, question.kind, question.text
        );

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.file_path)
            .await?;

        let line = format!(
            "{} | {} | {:?} | {}\n",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
            listing,
            question.kind,
            question.text.trim()
        );

        file.write_all(line.as_bytes()).await?;
        file.flush().await?;
        Ok(())
    }
}

impl Default for UnresolvedWriter {
    fn default() -> Self {
        Self::new()
    }
}
