//! vixtts - 越南语段落语音合成
//!
//! 架构设计: Hexagonal Architecture
//!
//! 领域层 (domain/):
//! - 分段、数字规范化、合成参数计算、尾部静音裁剪（纯函数）
//!
//! 应用层 (application/):
//! - Ports: TtsEngine, AudioEncoder
//! - Pipeline: 段落合成编排
//!
//! 基础设施层 (infrastructure/):
//! - Adapters: HTTP/Fake 合成引擎、WAV 编码、数字读法
//! - HTTP: 段落合成 API

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::{load_config, AppConfig};
