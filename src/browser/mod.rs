//! 浏览器进程管理
//!
//! 连接已打开的浏览器或启动新的浏览器，返回 `Browser` 和一个空白 `Page`

pub mod connection;
pub mod launch;

pub use connection::connect_to_browser;
pub use launch::launch_browser;
