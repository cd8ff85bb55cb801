//! # 工具模块集合
//!
//! 应用程序的辅助模块：错误处理、帮助信息、键盘事件和日志记录。
//!
//! ```text
//! utils/
//! ├── errors.rs     - 错误处理和 Panic Hook 配置
//! ├── help_msg.rs   - 帮助信息显示系统
//! ├── key_events.rs - 键盘事件处理工具
//! └── logging.rs    - 日志记录配置
//! ```
//!
//! `errors` 与 `logging` 在代码覆盖率测试时被排除
//! (`#[cfg(not(tarpaulin_include))]`)。

#[cfg(not(tarpaulin_include))]
pub(crate) mod errors;
pub(crate) mod help_msg;
pub(crate) mod key_events;
#[cfg(not(tarpaulin_include))]
pub(crate) mod logging;
