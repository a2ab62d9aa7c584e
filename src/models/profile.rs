use std::collections::HashSet;
use std::fmt;

use serde::Deserialize;

use crate::models::question::ScreeningAnswer;

/// 用户资料（由外部数据提供方给出）
///
/// 必填字段缺失时反序列化不会报错，而是留空，
/// 统一由 `SessionConfig::from_profile` 校验并给出明确的字段名
#[derive(Clone, Default, Deserialize)]
pub struct UserProfile {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub job_title: String,
    #[serde(default)]
    pub job_location: Option<String>,
    #[serde(default)]
    pub screening_answers: Vec<ScreeningAnswer>,
}

impl fmt::Debug for UserProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserProfile")
            .field("email", &self.email)
            .field("password", &"******")
            .field("phone", &self.phone)
            .field("job_title", &self.job_title)
            .field("job_location", &self.job_location)
            .field("screening_answers", &self.screening_answers.len())
            .finish()
    }
}

/// 用户数据接口返回的一行
///
/// 接口把用户、求职偏好、筛选问答三张表 LEFT JOIN 在一起，
/// 每个问答一行，用户字段在每行重复
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileRow {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub job_title: Option<String>,
    #[serde(default)]
    pub job_location: Option<String>,
    #[serde(default)]
    pub question: Option<String>,
    #[serde(default)]
    pub answer: Option<String>,
}

impl UserProfile {
    /// 把 JOIN 结果折叠成一份资料，没有任何行时返回 `None`
    pub fn from_rows(rows: Vec<ProfileRow>) -> Option<Self> {
        let first = rows.first()?.clone();
        let mut seen = HashSet::new();

        let screening_answers = rows
            .into_iter()
            .filter_map(|row| match (row.question, row.answer) {
                (Some(question), Some(answer))
                    if !question.trim().is_empty() && !answer.trim().is_empty() =>
                {
                    Some(ScreeningAnswer { question, answer })
                }
                _ => None,
            })
            .filter(|qa| seen.insert(qa.question.clone()))
            .collect();

        Some(Self {
            email: first.email.unwrap_or_default(),
            password: first.password.unwrap_or_default(),
            phone: first.phone.filter(|p| !p.trim().is_empty()),
            job_title: first.job_title.unwrap_or_default(),
            job_location: first.job_location.filter(|l| !l.trim().is_empty()),
            screening_answers,
        })
    }
}
