//! Chunk Pipeline - 段落合成编排
//!
//! 分段 → (每个片段) 数字规范化 → 参数计算 → 引擎合成 → 尾部静音裁剪 → 汇总。
//! 分段作用于原始文本，数字展开放在分段之后，避免影响标点边界。

use serde::Deserialize;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::{AbortHandle, JoinSet};
use tracing::Instrument;
use uuid::Uuid;

use crate::application::error::PipelineError;
use crate::application::ports::{SynthesisOutput, SynthesisRequest, TtsEnginePort, TtsError};
use crate::domain::audio::{find_trim_point, AudioBuffer, AudioError, TrimConfig};
use crate::domain::{
    calculate_inference_params, normalize_numbers, segment_text, SegmentConfig, SpellerRegistry,
    DEFAULT_MAX_CHARS,
};

/// 输出 key 中保留的片段字符数
pub const DEFAULT_OUTPUT_KEY_LEN: usize = 50;

/// 片段失败时的处理策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// 任一片段失败则整个段落失败
    #[default]
    Abort,
    /// 跳过失败片段，返回其余结果并附带失败列表
    Partial,
}

/// 流水线配置
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// 单个片段的最大字符数
    pub max_chars: usize,
    /// 尾部静音裁剪配置
    pub trim: TrimConfig,
    /// 输出 key 中保留的片段字符数
    pub output_key_len: usize,
    /// 同时进行的引擎调用数
    pub max_concurrent: usize,
    /// 失败策略
    pub failure_policy: FailurePolicy,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_chars: DEFAULT_MAX_CHARS,
            trim: TrimConfig::default(),
            output_key_len: DEFAULT_OUTPUT_KEY_LEN,
            max_concurrent: 1,
            failure_policy: FailurePolicy::Abort,
        }
    }
}

impl PipelineConfig {
    pub fn validate(&self) -> Result<(), PipelineError> {
        if self.max_chars == 0 {
            return Err(PipelineError::invalid_configuration(
                "max_chars must be greater than 0",
            ));
        }
        if self.output_key_len == 0 {
            return Err(PipelineError::invalid_configuration(
                "output_key_len must be greater than 0",
            ));
        }
        if self.max_concurrent == 0 {
            return Err(PipelineError::invalid_configuration(
                "max_concurrent must be greater than 0",
            ));
        }
        self.trim.validate()?;
        Ok(())
    }
}

/// 一个已完成的片段
#[derive(Debug, Clone)]
pub struct AudioEntry {
    /// `"{index}_{片段前 K 个字符}"`
    pub key: String,
    /// 片段在分段结果中的位置
    pub index: usize,
    /// 原始片段文本（规范化之前）
    pub text: String,
    pub audio: AudioBuffer,
    /// 音频全程低于阈值，未裁剪
    pub untrimmed: bool,
}

/// 失败的片段（仅 Partial 策略）
#[derive(Debug)]
pub struct ChunkFailure {
    pub index: usize,
    pub text: String,
    pub error: TtsError,
}

/// 流水线输出，按片段顺序排列
#[derive(Debug, Default)]
pub struct AudioMap {
    entries: Vec<AudioEntry>,
    failures: Vec<ChunkFailure>,
}

impl AudioMap {
    pub fn get(&self, key: &str) -> Option<&AudioEntry> {
        self.entries.iter().find(|entry| entry.key == key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.key.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &AudioEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn failures(&self) -> &[ChunkFailure] {
        &self.failures
    }

}

/// 生成输出 key
pub fn chunk_key(index: usize, text: &str, max_chars: usize) -> String {
    let prefix: String = text.chars().take(max_chars).collect();
    format!("{}_{}", index, prefix)
}

/// 待合成的片段
struct PendingChunk {
    index: usize,
    text: String,
    key: String,
}

/// 段落合成流水线
///
/// 引擎调用由信号量限流，同一个流水线上并发的多个 `run` 共享这些槽位。
pub struct ChunkPipeline {
    engine: Arc<dyn TtsEnginePort>,
    spellers: SpellerRegistry,
    config: PipelineConfig,
    slots: Arc<Semaphore>,
}

impl ChunkPipeline {
    pub fn new(
        engine: Arc<dyn TtsEnginePort>,
        spellers: SpellerRegistry,
        config: PipelineConfig,
    ) -> Result<Self, PipelineError> {
        config.validate()?;
        let slots = Arc::new(Semaphore::new(config.max_concurrent));
        Ok(Self {
            engine,
            spellers,
            config,
            slots,
        })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// 合成一个段落
    ///
    /// 返回的 future 被丢弃时，尚未完成的片段任务会一并取消。
    pub async fn run(&self, paragraph: &str, language: &str) -> Result<AudioMap, PipelineError> {
        let request_id = Uuid::new_v4();
        let span = tracing::info_span!("pipeline", %request_id, language = %language);
        self.run_inner(paragraph, language).instrument(span).await
    }

    async fn run_inner(&self, paragraph: &str, language: &str) -> Result<AudioMap, PipelineError> {
        if paragraph.trim().is_empty() {
            return Err(PipelineError::EmptyInput);
        }

        let segment_config = SegmentConfig::new(self.config.max_chars, language);
        let chunks = segment_text(paragraph, &segment_config);
        let speller = self.spellers.get(language);

        tracing::info!(
            paragraph_len = paragraph.chars().count(),
            chunk_count = chunks.len(),
            speller = speller.locale(),
            "Paragraph segmented"
        );

        let mut pending = Vec::with_capacity(chunks.len());
        let mut handles = Vec::with_capacity(chunks.len());
        let mut tasks = JoinSet::new();

        for (index, chunk) in chunks.into_iter().enumerate() {
            let text = normalize_numbers(&chunk, speller.as_ref());
            if text.trim().is_empty() {
                tracing::debug!(chunk_index = index, "Chunk normalized to empty text, skipping");
                continue;
            }

            let params = calculate_inference_params(&text);
            tracing::debug!(
                chunk_index = index,
                text = %text,
                params = ?params,
                "Chunk prepared"
            );

            let request = SynthesisRequest {
                text,
                language: language.to_string(),
                params,
            };
            let position = pending.len();
            let engine = self.engine.clone();
            let slots = self.slots.clone();

            let handle = tasks.spawn(
                async move {
                    let result = match slots.acquire_owned().await {
                        Ok(_permit) => engine.synthesize(request).await,
                        Err(_) => Err(TtsError::ServiceError(
                            "engine slots closed".to_string(),
                        )),
                    };
                    (position, result)
                }
                .in_current_span(),
            );
            handles.push(handle);

            pending.push(PendingChunk {
                index,
                key: chunk_key(index, &chunk, self.config.output_key_len),
                text: chunk,
            });
        }

        if pending.is_empty() {
            return Err(PipelineError::EmptyInput);
        }

        let results = self.collect_results(&mut tasks, &handles).await?;
        self.assemble(pending, results)
    }

    /// 按完成顺序收集结果，放回片段原有位置
    ///
    /// Abort 策略下，片段失败时只取消位置在其之后的任务；
    /// 之前的片段继续执行，保证返回的是按顺序的第一个失败。
    async fn collect_results(
        &self,
        tasks: &mut JoinSet<(usize, Result<SynthesisOutput, TtsError>)>,
        handles: &[AbortHandle],
    ) -> Result<Vec<Option<Result<SynthesisOutput, TtsError>>>, PipelineError> {
        let mut results: Vec<Option<Result<SynthesisOutput, TtsError>>> =
            (0..handles.len()).map(|_| None).collect();
        let mut first_failure = handles.len();

        while let Some(joined) = tasks.join_next().await {
            let (position, result) = match joined {
                Ok(done) => done,
                Err(e) if e.is_cancelled() => continue,
                Err(e) => return Err(PipelineError::internal(format!("chunk task failed: {}", e))),
            };

            if result.is_err()
                && self.config.failure_policy == FailurePolicy::Abort
                && position < first_failure
            {
                for handle in &handles[position + 1..first_failure] {
                    handle.abort();
                }
                first_failure = position;
            }
            results[position] = Some(result);
        }

        Ok(results)
    }

    /// 按片段顺序裁剪并组装输出
    fn assemble(
        &self,
        pending: Vec<PendingChunk>,
        results: Vec<Option<Result<SynthesisOutput, TtsError>>>,
    ) -> Result<AudioMap, PipelineError> {
        let mut map = AudioMap::default();

        for (chunk, result) in pending.into_iter().zip(results) {
            let output = match result {
                Some(Ok(output)) => output,
                Some(Err(error)) => {
                    tracing::error!(
                        chunk_index = chunk.index,
                        text = %chunk.text,
                        error = %error,
                        "Chunk synthesis failed"
                    );
                    match self.config.failure_policy {
                        FailurePolicy::Abort => {
                            return Err(PipelineError::SynthesisFailure {
                                index: chunk.index,
                                text: chunk.text,
                                source: error,
                            });
                        }
                        FailurePolicy::Partial => {
                            map.failures.push(ChunkFailure {
                                index: chunk.index,
                                text: chunk.text,
                                error,
                            });
                            continue;
                        }
                    }
                }
                // 在 Abort 策略下被取消
                None => continue,
            };

            let (audio, untrimmed) = self.trim(chunk.index, output.audio)?;
            tracing::info!(
                chunk_index = chunk.index,
                duration_ms = audio.duration_ms(),
                untrimmed,
                "Chunk completed"
            );

            map.entries.push(AudioEntry {
                key: chunk.key,
                index: chunk.index,
                text: chunk.text,
                audio,
                untrimmed,
            });
        }

        Ok(map)
    }

    /// 全静音的音频原样保留并标记
    fn trim(&self, index: usize, audio: AudioBuffer) -> Result<(AudioBuffer, bool), PipelineError> {
        match find_trim_point(&audio, &self.config.trim) {
            Ok(end) => Ok((audio.truncate(end), false)),
            Err(AudioError::SilentAudio { threshold }) => {
                tracing::warn!(
                    chunk_index = index,
                    threshold,
                    samples = audio.len(),
                    "No frame above threshold, keeping audio untrimmed"
                );
                Ok((audio, true))
            }
            Err(e) => Err(e.into()),
        }
    }
}
