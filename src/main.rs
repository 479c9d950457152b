//! vixtts - 越南语段落合成服务
//!
//! 段落 → 分段 → 数字规范化 → 参数计算 → 合成 → 尾部静音裁剪 → ZIP

use std::sync::Arc;

use vixtts::application::{ChunkPipeline, TtsEnginePort};
use vixtts::config::{load_config, print_config, TtsBackend};
use vixtts::infrastructure::adapters::{
    default_speller_registry, FakeTtsClient, HttpTtsClient, HttpTtsClientConfig, WavEncoder,
};
use vixtts::infrastructure::http::{AppState, HttpServer};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 加载配置（优先级：环境变量 > 配置文件 > 默认值）
    let config = load_config().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

    // 初始化日志
    let log_filter = format!(
        "{},vixtts={},tower_http=debug",
        config.log.level, config.log.level
    );
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_filter)),
        )
        .init();

    tracing::info!("vixtts - Vietnamese paragraph synthesis service");
    print_config(&config);

    // 创建合成引擎
    let engine: Arc<dyn TtsEnginePort> = match config.tts.backend {
        TtsBackend::Http => {
            let tts_config = HttpTtsClientConfig::new(&config.tts.url)
                .with_timeout(config.tts.timeout_secs)
                .with_sampling(config.tts.top_k, config.tts.top_p, config.tts.do_sample);
            Arc::new(HttpTtsClient::new(tts_config)?)
        }
        TtsBackend::Fake => Arc::new(FakeTtsClient::with_defaults()),
    };

    if !engine.health_check().await {
        tracing::warn!(url = %config.tts.url, "TTS engine is not reachable yet");
    }

    let spellers = default_speller_registry(&config.tts.default_language);
    let pipeline = ChunkPipeline::new(engine, spellers, config.pipeline_config())?;

    let state = AppState::new(
        Arc::new(pipeline),
        Arc::new(WavEncoder::new()),
        config.tts.default_language.clone(),
    );
    let server = HttpServer::new(config.server.addr(), state);

    // 启动服务器（带优雅关闭）
    server
        .run_with_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for ctrl-c");
                std::future::pending::<()>().await;
            }
            tracing::info!("Received shutdown signal");
        })
        .await?;

    tracing::info!("Server shutdown complete");

    Ok(())
}
