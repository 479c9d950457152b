//! Paragraph Synthesis Handler
//!
//! 合成段落，每个片段一个 WAV，打包为 ZIP 返回

use axum::{
    extract::{Query, State},
    http::{header, HeaderMap, HeaderValue},
    response::{IntoResponse, Response},
    Json,
};
use std::io::{Cursor, Write};
use std::sync::Arc;
use zip::result::ZipError;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::infrastructure::http::dto::SynthesizeRequest;
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

/// 下载文件名
pub const ARCHIVE_NAME: &str = "audio_files.zip";

/// 失败片段下标（逗号分隔）
pub const FAILED_CHUNKS_HEADER: &str = "x-failed-chunks";

/// 清理文件名：只保留字母数字、`-`、`_` 和空格，截断到 `max_chars` 个字符
pub fn sanitize_file_name(key: &str, max_chars: usize) -> String {
    let cleaned: String = key
        .chars()
        .filter(|c| c.is_alphanumeric() || matches!(c, '-' | '_' | ' '))
        .collect();
    let cleaned = cleaned.trim();
    let name = if cleaned.is_empty() { "audio" } else { cleaned };
    name.chars().take(max_chars).collect()
}

/// 在内存中构建 ZIP（deflate）
pub fn build_zip(files: &[(String, Vec<u8>)]) -> Result<Vec<u8>, ZipError> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for (name, data) in files {
        writer.start_file(name.as_str(), options)?;
        writer.write_all(data)?;
    }

    Ok(writer.finish()?.into_inner())
}

/// POST /paragraph_to_sentence_audios
pub async fn paragraph_to_sentence_audios(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SynthesizeRequest>,
    body: Option<Json<SynthesizeRequest>>,
) -> Result<Response, ApiError> {
    let request = body.map(|Json(b)| b).unwrap_or_default().merge(query);

    let text = request.text.ok_or_else(|| {
        ApiError::BadRequest(
            "No text provided. Send JSON with {\"text\": \"...\"}".to_string(),
        )
    })?;
    let language = request
        .language
        .unwrap_or_else(|| state.default_language.clone());

    tracing::info!(
        text_len = text.chars().count(),
        language = %language,
        "Processing paragraph"
    );

    let audio_map = state.pipeline.run(&text, &language).await?;

    if audio_map.is_empty() {
        return Err(ApiError::Internal("No audio generated".to_string()));
    }

    let key_len = state.pipeline.config().output_key_len;
    let mut files = Vec::with_capacity(audio_map.len());
    for entry in audio_map.iter() {
        let encoded = state.encoder.encode(&entry.audio)?;
        let name = format!(
            "{}.{}",
            sanitize_file_name(&entry.key, key_len),
            encoded.extension
        );
        files.push((name, encoded.data));
    }

    let archive = build_zip(&files)?;

    let mut headers = HeaderMap::new();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/zip"));
    headers.insert(
        header::CONTENT_DISPOSITION,
        HeaderValue::from_static("attachment; filename=\"audio_files.zip\""),
    );
    headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-cache"));

    if !audio_map.failures().is_empty() {
        let indices = audio_map
            .failures()
            .iter()
            .map(|f| f.index.to_string())
            .collect::<Vec<_>>()
            .join(",");
        let value = HeaderValue::from_str(&indices)
            .map_err(|e| ApiError::Internal(e.to_string()))?;
        headers.insert(FAILED_CHUNKS_HEADER, value);
    }

    tracing::info!(
        files = files.len(),
        failed = audio_map.failures().len(),
        archive_size = archive.len(),
        archive = ARCHIVE_NAME,
        "Paragraph synthesized"
    );

    Ok((headers, archive).into_response())
}

#[cfg(test)]
mod tests {
    use super::*;
    use zip::ZipArchive;

    #[test]
    fn test_sanitize_file_name() {
        assert_eq!(sanitize_file_name("0_Tôi có 2 con mèo.", 50), "0_Tôi có 2 con mèo");
        assert_eq!(sanitize_file_name("1_\"Đi thôi!\" / ?", 50), "1_Đi thôi");
        assert_eq!(sanitize_file_name("...", 50), "audio");
        assert_eq!(sanitize_file_name("3_abcdef", 4), "3_ab");
    }

    #[test]
    fn test_build_zip() {
        let files = vec![
            ("0_a.wav".to_string(), vec![1u8; 100]),
            ("1_b.wav".to_string(), vec![2u8; 10]),
        ];
        let bytes = build_zip(&files).unwrap();

        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        assert_eq!(archive.len(), 2);
        let first = archive.by_index(0).unwrap();
        assert_eq!(first.name(), "0_a.wav");
        assert_eq!(first.size(), 100);
        assert_eq!(first.compression(), CompressionMethod::Deflated);
    }
}
