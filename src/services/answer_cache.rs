//! 答案缓存 - 业务能力层
//!
//! 归一化问题文本 → 答案。进程启动时加载一次，每次学到新答案后立刻整体写回，
//! 崩溃最多丢失正在处理的那一个答案

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::error::CacheError;
use crate::models::question::{normalize_question, ScreeningAnswer};

/// 答案存储能力
///
/// key 必须是归一化后的问题文本，由 [`AnswerCache`] 保证
#[async_trait]
pub trait AnswerStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;

    /// 写入，返回值表示内容是否发生变化
    fn set(&mut self, key: &str, value: &str) -> bool;

    /// 把全部内容写回后端存储
    async fn flush(&mut self) -> Result<(), CacheError>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// JSON 文件存储
///
/// 写回时先写临时文件再 rename，保证文件内容始终完整
pub struct JsonFileStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl JsonFileStore {
    /// 打开缓存文件，不存在时创建空文件
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, CacheError> {
        let path = path.as_ref().to_path_buf();
        let path_display = path.display().to_string();

        if !tokio::fs::try_exists(&path).await.unwrap_or(false) {
            info!("答案缓存文件不存在，创建新文件: {}", path_display);
            let mut store = Self {
                path,
                entries: BTreeMap::new(),
            };
            store.flush().await?;
            return Ok(store);
        }

        let content =
            tokio::fs::read_to_string(&path)
                .await
                .map_err(|e| CacheError::ReadFailed {
                    path: path_display.clone(),
                    message: e.to_string(),
                })?;

        let raw: HashMap<String, String> = if content.trim().is_empty() {
            HashMap::new()
        } else {
            serde_json::from_str(&content).map_err(|e| CacheError::ParseFailed {
                path: path_display.clone(),
                message: e.to_string(),
            })?
        };

        // 手工编辑过的文件可能有未归一化的 key
        let entries: BTreeMap<String, String> = raw
            .into_iter()
            .map(|(question, answer)| (normalize_question(&question), answer))
            .collect();

        info!("✓ 已加载答案缓存: {} 条 ({})", entries.len(), path_display);
        Ok(Self { path, entries })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl AnswerStore for JsonFileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> bool {
        match self.entries.insert(key.to_string(), value.to_string()) {
            Some(previous) => previous != value,
            None => true,
        }
    }

    async fn flush(&mut self) -> Result<(), CacheError> {
        let path_display = self.path.display().to_string();
        let content =
            serde_json::to_string_pretty(&self.entries).map_err(|e| CacheError::WriteFailed {
                path: path_display.clone(),
                message: e.to_string(),
            })?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| CacheError::WriteFailed {
                    path: path_display.clone(),
                    message: e.to_string(),
                })?;
        }

        let tmp_path = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp_path, content)
            .await
            .map_err(|e| CacheError::WriteFailed {
                path: tmp_path.display().to_string(),
                message: e.to_string(),
            })?;
        tokio::fs::rename(&tmp_path, &self.path)
            .await
            .map_err(|e| CacheError::WriteFailed {
                path: path_display.clone(),
                message: e.to_string(),
            })?;

        debug!("答案缓存已写回: {} 条", self.entries.len());
        Ok(())
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}

/// 内存存储，记录 flush 次数
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
    flushes: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn flush_count(&self) -> usize {
        self.flushes
    }
}

#[async_trait]
impl AnswerStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> bool {
        match self.entries.insert(key.to_string(), value.to_string()) {
            Some(previous) => previous != value,
            None => true,
        }
    }

    async fn flush(&mut self) -> Result<(), CacheError> {
        self.flushes += 1;
        Ok(())
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}

/// 答案缓存
///
/// 负责 key 归一化和"变更即写回"，具体存储由 `AnswerStore` 提供
///
/// 写回失败时内存已经改变，`dirty` 保证下一次写入或 `remember` 会补写
pub struct AnswerCache<S> {
    store: S,
    dirty: bool,
}

impl<S: AnswerStore> AnswerCache<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            dirty: false,
        }
    }

    pub fn lookup(&self, question_text: &str) -> Option<String> {
        self.store.get(&normalize_question(question_text))
    }

    /// 记住一个答案，有变化时立刻写回
    ///
    /// 返回值表示是否为新学到的内容
    pub async fn remember(&mut self, question_text: &str, answer: &str) -> Result<bool, CacheError> {
        let key = normalize_question(question_text);
        let changed = self.store.set(&key, answer);
        if !changed && !self.dirty {
            return Ok(false);
        }
        self.flush().await?;
        debug!("已记住答案: {} => {}", key, answer);
        Ok(true)
    }

    /// 写回后端存储，失败时保留未写回标记
    async fn flush(&mut self) -> Result<(), CacheError> {
        self.dirty = true;
        self.store.flush().await?;
        self.dirty = false;
        Ok(())
    }

    /// 是否有尚未写回的内容
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// 用用户预置的问答填充缓存，已有的 key 不覆盖
    ///
    /// 返回新增条数
    pub async fn seed(&mut self, answers: &[ScreeningAnswer]) -> Result<usize, CacheError> {
        let mut added = 0;
        for qa in answers {
            let key = normalize_question(&qa.question);
            if key.is_empty() {
                warn!("忽略空白的预置问题");
                continue;
            }
            if self.store.get(&key).is_none() && self.store.set(&key, qa.answer.trim()) {
                added += 1;
            }
        }

        if added > 0 || self.dirty {
            self.flush().await?;
        }
        info!("预置问答: 新增 {} 条，缓存共 {} 条", added, self.store.len());
        Ok(added)
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}
