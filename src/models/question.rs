use serde::{Deserialize, Serialize};

/// 筛选问题类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuestionKind {
    FreeText,
    Binary,
    Numeric,
    Dropdown,
}

impl QuestionKind {
    /// 单选类问题（答案必须是给定选项之一，可以走人工选择通道）
    pub fn is_choice(self) -> bool {
        matches!(self, QuestionKind::Binary | QuestionKind::Dropdown)
    }
}

/// 筛选问题
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreeningQuestion {
    /// 页面上显示的原文（用于日志）
    pub text: String,
    /// 归一化后的文本，作为答案缓存的 key
    pub normalized_text: String,
    pub kind: QuestionKind,
    /// 当前提供的选项（单选类问题），不含占位项
    pub options: Vec<String>,
}

impl ScreeningQuestion {
    pub fn new(text: impl Into<String>, kind: QuestionKind, options: Vec<String>) -> Self {
        let text = text.into();
        Self {
            normalized_text: normalize_question(&text),
            text,
            kind,
            options,
        }
    }

    /// 判断一个答案对当前问题是否仍然可用
    ///
    /// - 单选类：必须是当前选项之一（选项集合可能已经变化）
    /// - 文本和数值类：非空即可，页面自己校验格式
    pub fn accepts(&self, answer: &str) -> bool {
        let answer = answer.trim();
        match self.kind {
            QuestionKind::Binary | QuestionKind::Dropdown => {
                self.options.iter().any(|option| option.trim() == answer)
            }
            QuestionKind::Numeric | QuestionKind::FreeText => !answer.is_empty(),
        }
    }
}

/// 问题文本归一化：去首尾空白、合并连续空白、转小写
pub fn normalize_question(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// 用户预先提供的问答
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreeningAnswer {
    pub question: String,
    pub answer: String,
}
