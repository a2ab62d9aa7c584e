//! 职位处理上下文
//!
//! 封装"我正在处理第几页的第几个职位"这一信息

use std::fmt::Display;

/// 职位处理上下文
#[derive(Debug, Clone)]
pub struct ListingCtx {
    /// 本次运行中的序号（从1开始，仅用于日志）
    pub seq: usize,

    /// 页码
    pub page: usize,

    /// 职位名称
    pub name: String,
}

impl ListingCtx {
    pub fn new(seq: usize, page: usize, name: impl Into<String>) -> Self {
        Self {
            seq,
            page,
            name: name.into(),
        }
    }
}

impl Display for ListingCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[职位 #{} 第{}页 {}]", self.seq, self.page, self.name)
    }
}
