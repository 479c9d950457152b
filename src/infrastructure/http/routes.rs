//! HTTP Routes
//!
//! API Endpoints:
//! - /health                          GET   健康检查
//! - /paragraph_to_sentence_audios    POST  段落合成，返回 ZIP

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use super::handlers;
use super::state::AppState;

/// 创建所有路由
pub fn create_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(handlers::health))
        .route(
            "/paragraph_to_sentence_audios",
            post(handlers::paragraph_to_sentence_audios),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::{
        SynthesisOutput, SynthesisRequest, TtsEnginePort, TtsError,
    };
    use crate::application::{ChunkPipeline, FailurePolicy, PipelineConfig};
    use crate::infrastructure::adapters::{default_speller_registry, FakeTtsClient, WavEncoder};
    use crate::infrastructure::http::handlers::FAILED_CHUNKS_HEADER;
    use async_trait::async_trait;
    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
    };
    use std::io::Cursor;
    use tower::util::ServiceExt;
    use zip::ZipArchive;

    /// 文本包含 "hỏng" 时失败，其余委托给 FakeTtsClient
    struct FlakyEngine(FakeTtsClient);

    #[async_trait]
    impl TtsEnginePort for FlakyEngine {
        async fn synthesize(&self, request: SynthesisRequest) -> Result<SynthesisOutput, TtsError> {
            if request.text.contains("hỏng") {
                return Err(TtsError::ServiceError("engine crashed".to_string()));
            }
            self.0.synthesize(request).await
        }
    }

    fn app_with(policy: FailurePolicy) -> Router {
        let engine = Arc::new(FlakyEngine(FakeTtsClient::with_defaults()));
        let config = PipelineConfig {
            failure_policy: policy,
            ..PipelineConfig::default()
        };
        let pipeline =
            ChunkPipeline::new(engine, default_speller_registry("vi"), config).unwrap();
        let state = AppState::new(Arc::new(pipeline), Arc::new(WavEncoder::new()), "vi");
        create_routes().with_state(Arc::new(state))
    }

    fn app() -> Router {
        app_with(FailurePolicy::Abort)
    }

    fn post_json(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn zip_names(bytes: &[u8]) -> Vec<String> {
        let mut archive = ZipArchive::new(Cursor::new(bytes.to_vec())).unwrap();
        (0..archive.len())
            .map(|i| archive.by_index(i).unwrap().name().to_string())
            .collect()
    }

    #[tokio::test]
    async fn test_health() {
        let response = app()
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["status"], "ok");
    }

    #[tokio::test]
    async fn test_paragraph_returns_zip() {
        let response = app()
            .oneshot(post_json(
                "/paragraph_to_sentence_audios",
                r#"{"text": "Tôi có 2 con mèo. Chúng rất dễ thương!", "language": "vi"}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/zip");
        assert!(response.headers()[header::CONTENT_DISPOSITION]
            .to_str()
            .unwrap()
            .contains("audio_files.zip"));

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(
            zip_names(&body),
            vec!["0_Tôi có 2 con mèo.wav", "1_Chúng rất dễ thương.wav"]
        );
    }

    #[tokio::test]
    async fn test_query_string_fallback() {
        let request = Request::builder()
            .method("POST")
            .uri("/paragraph_to_sentence_audios?text=Xin%20ch%C3%A0o.")
            .body(Body::empty())
            .unwrap();
        let response = app().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(zip_names(&body), vec!["0_Xin chào.wav"]);
    }

    #[tokio::test]
    async fn test_empty_text_is_bad_request() {
        let response = app()
            .oneshot(post_json("/paragraph_to_sentence_audios", r#"{"text": "   "}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["errno"], 400);
    }

    #[tokio::test]
    async fn test_engine_failure_is_service_unavailable() {
        let response = app()
            .oneshot(post_json(
                "/paragraph_to_sentence_audios",
                r#"{"text": "Câu một. Câu hỏng."}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_partial_failure_header() {
        let response = app_with(FailurePolicy::Partial)
            .oneshot(post_json(
                "/paragraph_to_sentence_audios",
                r#"{"text": "Câu một. Câu hỏng. Câu ba."}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[FAILED_CHUNKS_HEADER], "1");
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(zip_names(&body), vec!["0_Câu một.wav", "2_Câu ba.wav"]);
    }

    #[tokio::test]
    async fn test_all_chunks_failed_is_internal_error() {
        let response = app_with(FailurePolicy::Partial)
            .oneshot(post_json(
                "/paragraph_to_sentence_audios",
                r#"{"text": "Câu hỏng."}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
