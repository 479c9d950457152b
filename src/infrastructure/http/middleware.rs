//! HTTP Middleware
//!
//! 响应日志中间件：4xx 记 warn，5xx 记 error，部分成功的合成结果记 warn

use axum::{extract::Request, middleware::Next, response::Response};
use std::time::Instant;

use super::handlers::FAILED_CHUNKS_HEADER;

/// 响应日志中间件
///
/// 业务错误详情在 ApiError::into_response() 中记录，这里只记录状态与耗时
pub async fn error_logging_middleware(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let started = Instant::now();

    let response = next.run(request).await;
    let status = response.status();
    let elapsed_ms = started.elapsed().as_millis() as u64;

    if status.is_server_error() {
        tracing::error!(
            method = %method,
            uri = %uri,
            status = %status.as_u16(),
            elapsed_ms,
            "HTTP server error"
        );
    } else if status.is_client_error() {
        tracing::warn!(
            method = %method,
            uri = %uri,
            status = %status.as_u16(),
            elapsed_ms,
            "HTTP client error"
        );
    } else if let Some(failed) = response.headers().get(FAILED_CHUNKS_HEADER) {
        tracing::warn!(
            method = %method,
            uri = %uri,
            failed_chunks = ?failed,
            elapsed_ms,
            "Partial synthesis result"
        );
    }

    response
}
