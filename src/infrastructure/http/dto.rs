//! Data Transfer Objects

use serde::{Deserialize, Serialize};

/// 段落合成请求（JSON 请求体或查询参数）
#[derive(Debug, Default, Deserialize)]
pub struct SynthesizeRequest {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
}

impl SynthesizeRequest {
    /// 请求体优先，缺失的字段从查询参数补齐
    pub fn merge(self, fallback: SynthesizeRequest) -> Self {
        Self {
            text: non_blank(self.text).or_else(|| non_blank(fallback.text)),
            language: non_blank(self.language).or_else(|| non_blank(fallback.language)),
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// 健康检查响应
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}
