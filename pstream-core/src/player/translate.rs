//! Caption translation pipeline
//!
//! Single-flight: one translation task at a time, cancellable at every
//! stage. Batches are translated sequentially with a delay between them to
//! stay inside the translation API's informal rate limits; once cancelled,
//! in-flight results are discarded rather than applied.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::models::Caption;
use crate::{Error, Result};

use super::source::PlayerSource;
use super::srt;

/// External translation API client. Retry/backoff policy lives inside the
/// implementation; this layer only batches and cancels.
#[async_trait]
pub trait CaptionTranslator: Send + Sync {
    async fn translate(&self, text: &str, target_language: &str) -> Result<String>;
}

/// Fetches raw subtitle text by URL.
#[async_trait]
pub trait SubtitleFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TranslateStatus {
    Running,
    Done,
    Failed,
    Cancelled,
}

struct TranslateTask {
    status: Arc<RwLock<TranslateStatus>>,
    token: CancellationToken,
    handle: Option<JoinHandle<()>>,
}

pub struct CaptionTranslationService {
    fetcher: Arc<dyn SubtitleFetcher>,
    translator: Arc<dyn CaptionTranslator>,
    batch_size: usize,
    batch_delay: Duration,
    task: Mutex<Option<TranslateTask>>,
}

impl CaptionTranslationService {
    #[must_use]
    pub fn new(fetcher: Arc<dyn SubtitleFetcher>, translator: Arc<dyn CaptionTranslator>) -> Self {
        Self {
            fetcher,
            translator,
            batch_size: 10,
            batch_delay: Duration::from_millis(1000),
            task: Mutex::new(None),
        }
    }

    #[must_use]
    pub fn with_batching(mut self, batch_size: usize, batch_delay: Duration) -> Self {
        self.batch_size = batch_size.max(1);
        self.batch_delay = batch_delay;
        self
    }

    /// Translate `caption` into `target_language` and select the result on
    /// `player` when done.
    ///
    /// Single-flight: while a task is in progress, further calls are
    /// rejected (returns `false`) without touching the running task.
    pub fn translate_caption(
        &self,
        player: &Arc<PlayerSource>,
        caption: Caption,
        target_language: &str,
    ) -> bool {
        let mut slot = self.task.lock();
        if let Some(task) = slot.as_ref() {
            if *task.status.read() == TranslateStatus::Running {
                tracing::warn!("Translation already in progress, ignoring request");
                return false;
            }
        }

        let status = Arc::new(RwLock::new(TranslateStatus::Running));
        let token = CancellationToken::new();

        let handle = tokio::spawn(run_translation(
            Arc::clone(&self.fetcher),
            Arc::clone(&self.translator),
            Arc::clone(player),
            caption,
            target_language.to_string(),
            self.batch_size,
            self.batch_delay,
            token.clone(),
            Arc::clone(&status),
        ));

        *slot = Some(TranslateTask {
            status,
            token,
            handle: Some(handle),
        });
        true
    }

    #[must_use]
    pub fn status(&self) -> Option<TranslateStatus> {
        self.task.lock().as_ref().map(|task| *task.status.read())
    }

    /// Abort the in-flight task, if any. Already-fetched or already-translated
    /// intermediate results are discarded, never applied.
    pub fn cancel(&self) {
        if let Some(task) = self.task.lock().as_ref() {
            task.token.cancel();
        }
    }

    /// Wait for the current task to finish. Mostly useful in tests and
    /// teardown paths.
    pub async fn wait(&self) {
        let handle = self.task.lock().as_mut().and_then(|task| task.handle.take());
        if let Some(handle) = handle {
            let _ = handle.await;
        }
    }
}

#[allow(clippy::too_many_arguments)]
async fn run_translation(
    fetcher: Arc<dyn SubtitleFetcher>,
    translator: Arc<dyn CaptionTranslator>,
    player: Arc<PlayerSource>,
    caption: Caption,
    target_language: String,
    batch_size: usize,
    batch_delay: Duration,
    token: CancellationToken,
    status: Arc<RwLock<TranslateStatus>>,
) {
    let outcome = translate_pipeline(
        fetcher.as_ref(),
        translator.as_ref(),
        caption,
        &target_language,
        batch_size,
        batch_delay,
        &token,
    )
    .await;

    let new_status = match outcome {
        Ok(Some(translated)) if !token.is_cancelled() => {
            player.set_caption(Some(translated));
            TranslateStatus::Done
        }
        Ok(_) => TranslateStatus::Cancelled,
        Err(e) => {
            tracing::warn!("Caption translation failed: {e}");
            TranslateStatus::Failed
        }
    };
    *status.write() = new_status;
}

/// The fetch → parse → translate pipeline.
///
/// `Ok(None)` means the task was cancelled; the caller must not apply
/// anything. Cancellation is checked after every await boundary.
async fn translate_pipeline(
    fetcher: &dyn SubtitleFetcher,
    translator: &dyn CaptionTranslator,
    caption: Caption,
    target_language: &str,
    batch_size: usize,
    batch_delay: Duration,
    token: &CancellationToken,
) -> Result<Option<Caption>> {
    let srt_text = if caption.srt_data.is_empty() {
        let url = caption
            .url
            .as_deref()
            .ok_or_else(|| Error::InvalidInput("Caption has neither data nor url".to_string()))?;
        fetcher.fetch(url).await?
    } else {
        caption.srt_data.clone()
    };
    if token.is_cancelled() {
        return Ok(None);
    }

    let mut cues = srt::parse(&srt_text)?;

    let total = cues.len();
    for (batch_no, batch) in cues.chunks_mut(batch_size).enumerate() {
        if batch_no > 0 {
            tokio::time::sleep(batch_delay).await;
        }
        if token.is_cancelled() {
            return Ok(None);
        }

        let texts: Vec<String> = batch.iter().map(|cue| cue.lines.join("\n")).collect();
        let results = futures::future::join_all(
            texts
                .iter()
                .map(|text| translator.translate(text, target_language)),
        )
        .await;
        if token.is_cancelled() {
            return Ok(None);
        }

        let mut failures = 0usize;
        let mut successes = 0usize;
        for (cue, result) in batch.iter_mut().zip(results) {
            match result {
                Ok(translated) => {
                    successes += 1;
                    cue.lines = translated.lines().map(str::to_string).collect();
                }
                Err(e) => {
                    // Single-item failures keep the original text.
                    failures += 1;
                    tracing::debug!(index = cue.index, "Cue translation failed: {e}");
                }
            }
        }
        if failures > successes {
            return Err(Error::Internal(format!(
                "Translation batch {batch_no} failed ({failures}/{} items)",
                failures + successes
            )));
        }
        tracing::debug!(
            batch = batch_no,
            translated = (batch_no * batch_size + batch.len()),
            total,
            "Translated caption batch"
        );
    }

    Ok(Some(Caption {
        id: caption.id,
        language: target_language.to_string(),
        url: caption.url,
        srt_data: srt::serialize(&cues),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::Semaphore;

    struct StaticFetcher(String);

    #[async_trait]
    impl SubtitleFetcher for StaticFetcher {
        async fn fetch(&self, _url: &str) -> Result<String> {
            Ok(self.0.clone())
        }
    }

    /// Translator gated on a semaphore so tests control when work finishes.
    struct GatedTranslator {
        gate: Arc<Semaphore>,
    }

    #[async_trait]
    impl CaptionTranslator for GatedTranslator {
        async fn translate(&self, text: &str, target_language: &str) -> Result<String> {
            let _permit = self
                .gate
                .acquire()
                .await
                .map_err(|_| Error::Internal("gate closed".to_string()))?;
            Ok(format!("[{target_language}] {text}"))
        }
    }

    /// Fails for any text containing "bad".
    struct FlakyTranslator;

    #[async_trait]
    impl CaptionTranslator for FlakyTranslator {
        async fn translate(&self, text: &str, target_language: &str) -> Result<String> {
            if text.contains("bad") {
                return Err(Error::Internal("upstream rejected".to_string()));
            }
            Ok(format!("[{target_language}] {text}"))
        }
    }

    fn srt_with(lines: &[&str]) -> String {
        let mut out = String::new();
        for (i, line) in lines.iter().enumerate() {
            out.push_str(&format!(
                "{}\n00:00:0{},000 --> 00:00:0{},500\n{line}\n\n",
                i + 1,
                i + 1,
                i + 1
            ));
        }
        out
    }

    fn caption(srt_data: String) -> Caption {
        Caption {
            id: "cap-1".to_string(),
            language: "en".to_string(),
            url: None,
            srt_data,
        }
    }

    fn service(translator: Arc<dyn CaptionTranslator>) -> CaptionTranslationService {
        CaptionTranslationService::new(
            Arc::new(StaticFetcher(String::new())),
            translator,
        )
        .with_batching(2, Duration::ZERO)
    }

    #[tokio::test]
    async fn test_translation_applies_result() {
        let svc = service(Arc::new(FlakyTranslator));
        let player = Arc::new(PlayerSource::new());

        assert!(svc.translate_caption(&player, caption(srt_with(&["hello", "world", "again"])), "de"));
        svc.wait().await;

        assert_eq!(svc.status(), Some(TranslateStatus::Done));
        let selected = player.selected_caption().unwrap();
        assert_eq!(selected.language, "de");
        assert!(selected.srt_data.contains("[de] hello"));
        assert!(selected.srt_data.contains("[de] again"));
    }

    #[tokio::test]
    async fn test_second_call_while_running_is_rejected() {
        let gate = Arc::new(Semaphore::new(0));
        let svc = service(Arc::new(GatedTranslator { gate: Arc::clone(&gate) }));
        let player = Arc::new(PlayerSource::new());

        assert!(svc.translate_caption(&player, caption(srt_with(&["one"])), "de"));
        assert_eq!(svc.status(), Some(TranslateStatus::Running));

        // Second request bounces off; the running task is untouched.
        assert!(!svc.translate_caption(&player, caption(srt_with(&["two"])), "fr"));
        assert_eq!(svc.status(), Some(TranslateStatus::Running));

        gate.add_permits(16);
        svc.wait().await;
        assert_eq!(svc.status(), Some(TranslateStatus::Done));
        assert!(player.selected_caption().unwrap().srt_data.contains("[de] one"));
    }

    #[tokio::test]
    async fn test_cancel_discards_results() {
        let gate = Arc::new(Semaphore::new(0));
        let svc = service(Arc::new(GatedTranslator { gate: Arc::clone(&gate) }));
        let player = Arc::new(PlayerSource::new());

        assert!(svc.translate_caption(&player, caption(srt_with(&["one", "two"])), "de"));
        svc.cancel();
        gate.add_permits(16);
        svc.wait().await;

        assert_eq!(svc.status(), Some(TranslateStatus::Cancelled));
        assert!(player.selected_caption().is_none());
    }

    #[tokio::test]
    async fn test_batch_fails_when_failures_outnumber_successes() {
        // One batch of two cues, both bad: 2 failures vs 0 successes.
        let svc = service(Arc::new(FlakyTranslator));
        let player = Arc::new(PlayerSource::new());

        assert!(svc.translate_caption(&player, caption(srt_with(&["bad one", "bad two"])), "de"));
        svc.wait().await;

        assert_eq!(svc.status(), Some(TranslateStatus::Failed));
        assert!(player.selected_caption().is_none());
    }

    #[tokio::test]
    async fn test_minority_failures_keep_original_text() {
        // Batch of two: one bad, one good — 1 failure does not sink the batch.
        let svc = service(Arc::new(FlakyTranslator));
        let player = Arc::new(PlayerSource::new());

        assert!(svc.translate_caption(&player, caption(srt_with(&["bad line", "good line"])), "de"));
        svc.wait().await;

        assert_eq!(svc.status(), Some(TranslateStatus::Done));
        let selected = player.selected_caption().unwrap();
        assert!(selected.srt_data.contains("bad line"));
        assert!(selected.srt_data.contains("[de] good line"));
    }

    #[tokio::test]
    async fn test_fetch_stage_feeds_pipeline() {
        let svc = CaptionTranslationService::new(
            Arc::new(StaticFetcher(srt_with(&["fetched"]))),
            Arc::new(FlakyTranslator),
        )
        .with_batching(2, Duration::ZERO);
        let player = Arc::new(PlayerSource::new());

        let remote = Caption {
            id: "cap-2".to_string(),
            language: "en".to_string(),
            url: Some("https://subs.example.com/cap-2.srt".to_string()),
            srt_data: String::new(),
        };
        assert!(svc.translate_caption(&player, remote, "fr"));
        svc.wait().await;

        assert_eq!(svc.status(), Some(TranslateStatus::Done));
        assert!(player.selected_caption().unwrap().srt_data.contains("[fr] fetched"));
    }

    #[tokio::test]
    async fn test_retranslate_allowed_after_completion() {
        let svc = service(Arc::new(FlakyTranslator));
        let player = Arc::new(PlayerSource::new());

        assert!(svc.translate_caption(&player, caption(srt_with(&["one"])), "de"));
        svc.wait().await;
        assert!(svc.translate_caption(&player, caption(srt_with(&["two"])), "fr"));
        svc.wait().await;
        assert_eq!(svc.status(), Some(TranslateStatus::Done));
    }
}
