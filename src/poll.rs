use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, warn};

use crate::catalog::GifCatalog;
use crate::config::{ConfigError, FacegifConfig};
use crate::detector::ExpressionDetector;
use crate::display::DisplayUpdater;
use crate::expression::{Expression, classify};
use crate::sampler::{SampleError, sample};
use crate::video::VideoSource;

/// Lifecycle of the polling loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollState {
    Idle,
    Loading,
    Streaming,
    Detecting,
    Stopped,
}

/// Why one tick produced no display update.
///
/// Every variant is recoverable: the tick is skipped, the previous imagery
/// stays on the slots and the next timer firing proceeds normally.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TickError {
    #[error("no gif catalog is available")]
    CatalogUnavailable,
    #[error("catalog has no bucket for {0}")]
    MissingExpressionBucket(Expression),
    #[error(transparent)]
    Sample(#[from] SampleError),
}

/// Handle for asking a running [`PollLoop`] to stop.
#[derive(Clone)]
pub struct StopHandle {
    tx: Arc<watch::Sender<bool>>,
}

impl StopHandle {
    /// Request the loop to stop after the current tick settles.
    pub fn stop(&self) {
        let _ = self.tx.send(true);
    }
}

/// Orchestrator driving the detect, classify, sample, display cycle.
///
/// [`run`](PollLoop::run) walks the loop through
/// `Idle -> Loading -> Streaming -> Detecting -> Stopped`: the catalog
/// load and camera negotiation run concurrently, the detector models load
/// next, and the play signal from the video source arms a fixed-interval
/// timer. Ticks are single-flight: a tick's whole chain is awaited before
/// the next timer firing is honored, so display updates apply in program
/// order even when inference is slower than the cadence.
///
/// Every failure past startup is per-tick and non-fatal; the loop only
/// ends through its [`StopHandle`].
pub struct PollLoop {
    config: FacegifConfig,
    catalog_path: PathBuf,
    detector: Arc<dyn ExpressionDetector>,
    video: Box<dyn VideoSource>,
    display: Box<dyn DisplayUpdater>,
    catalog: Option<Arc<GifCatalog>>,
    current_expression: Expression,
    state: PollState,
    stop_tx: Arc<watch::Sender<bool>>,
    stop_rx: watch::Receiver<bool>,
}

impl PollLoop {
    /// Wire a new loop from its collaborators.
    ///
    /// Fails if `config` violates the startup invariants, e.g. a slot
    /// count that does not match the sample count.
    pub fn new(
        config: FacegifConfig,
        catalog_path: impl Into<PathBuf>,
        detector: Arc<dyn ExpressionDetector>,
        video: Box<dyn VideoSource>,
        display: Box<dyn DisplayUpdater>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let (stop_tx, stop_rx) = watch::channel(false);
        Ok(Self {
            config,
            catalog_path: catalog_path.into(),
            detector,
            video,
            display,
            catalog: None,
            current_expression: Expression::Neutral,
            state: PollState::Idle,
            stop_tx: Arc::new(stop_tx),
            stop_rx,
        })
    }

    pub fn state(&self) -> PollState {
        self.state
    }

    /// The expression classified on the most recent successful detection.
    pub fn current_expression(&self) -> Expression {
        self.current_expression
    }

    pub fn catalog_loaded(&self) -> bool {
        self.catalog.is_some()
    }

    /// A handle that stops the loop from another task.
    pub fn stop_handle(&self) -> StopHandle {
        StopHandle {
            tx: self.stop_tx.clone(),
        }
    }

    /// Drive the loop until it is stopped.
    ///
    /// A missing catalog or a failing detector never end the loop; a
    /// camera that cannot start leaves the pipeline inert and returns
    /// `Ok` with the state at [`PollState::Stopped`].
    pub async fn run(&mut self) -> anyhow::Result<()> {
        self.state = PollState::Loading;
        let path = self.catalog_path.clone();
        let (catalog, started) = tokio::join!(GifCatalog::load(&path), self.video.start());
        match catalog {
            Ok(catalog) => self.catalog = Some(Arc::new(catalog)),
            // the pipeline keeps going; ticks surface CatalogUnavailable
            Err(e) => error!(%e, "could not load the expressions gifs"),
        }
        if let Err(e) = started {
            error!(%e, "something went wrong with the video streaming");
            self.state = PollState::Stopped;
            return Ok(());
        }
        if let Err(e) = self.detector.load_models().await {
            error!(%e, "could not load the detector models");
            self.state = PollState::Stopped;
            return Ok(());
        }

        self.state = PollState::Streaming;
        let mut stop_rx = self.stop_rx.clone();
        tokio::select! {
            playing = self.video.playing() => {
                if let Err(e) = playing {
                    error!(%e, "video never started playing");
                    self.state = PollState::Stopped;
                    return Ok(());
                }
            }
            _ = stop_rx.changed() => {
                self.state = PollState::Stopped;
                return Ok(());
            }
        }

        info!(interval = ?self.config.interval, "video playing, detection armed");
        self.state = PollState::Detecting;
        let mut ticker = tokio::time::interval(self.config.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // the first firing is immediate; swallow it so the first
        // detection happens one full interval after the play signal
        ticker.tick().await;
        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if let Err(e) = self.tick().await {
                        warn!(%e, "tick skipped");
                    }
                }
                _ = stop_rx.changed() => break,
            }
        }
        self.state = PollState::Stopped;
        info!("poll loop stopped");
        Ok(())
    }

    /// One detection tick. A tick that sees no frame, no face or a failed
    /// detection is skipped silently; catalog and sampling problems come
    /// back as typed errors so the caller can log them.
    async fn tick(&mut self) -> Result<(), TickError> {
        let Some(frame) = self.video.current_frame() else {
            debug!("no frame available yet");
            return Ok(());
        };
        let reading = match self.detector.detect(&frame, &self.config.detector).await {
            Ok(Some(reading)) if !reading.expressions.is_empty() => reading,
            Ok(_) => {
                debug!(seq = frame.seq, "no face in frame");
                return Ok(());
            }
            Err(e) => {
                warn!(%e, seq = frame.seq, "detection failed");
                return Ok(());
            }
        };

        let expression = classify(&reading.expressions);
        self.current_expression = expression;

        let catalog = self.catalog.as_ref().ok_or(TickError::CatalogUnavailable)?;
        let bucket = catalog
            .bucket(expression)
            .ok_or(TickError::MissingExpressionBucket(expression))?;
        let gifs = sample(bucket, self.config.sample_count, &mut rand::thread_rng())?;

        debug!(%expression, gifs = gifs.len(), "updating display");
        self.display.update(&gifs);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detector::{FaceReading, ScriptedDetector};
    use crate::display::SlotDisplay;
    use crate::expression::ConfidenceMap;
    use crate::video::TestPatternSource;
    use std::collections::HashMap;

    fn happy_reading() -> FaceReading {
        let scores: ConfidenceMap = [(Expression::Happy, 0.9), (Expression::Neutral, 0.1)]
            .into_iter()
            .collect();
        FaceReading::new(scores)
    }

    fn happy_catalog() -> GifCatalog {
        let mut buckets = HashMap::new();
        buckets.insert(
            Expression::Happy,
            vec![
                "a.gif".to_string(),
                "b.gif".to_string(),
                "c.gif".to_string(),
                "d.gif".to_string(),
            ],
        );
        GifCatalog::from_buckets(buckets)
    }

    async fn loop_with(
        detector: ScriptedDetector,
        catalog: Option<GifCatalog>,
    ) -> PollLoop {
        let mut video = TestPatternSource::new();
        video.start().await.unwrap();
        let mut poll = PollLoop::new(
            FacegifConfig::default(),
            "unused.json",
            Arc::new(detector),
            Box::new(video),
            Box::new(SlotDisplay::new(3)),
        )
        .unwrap();
        poll.catalog = catalog.map(Arc::new);
        poll
    }

    #[tokio::test]
    async fn tick_without_catalog_is_catalog_unavailable() {
        let detector = ScriptedDetector::new(vec![Some(happy_reading())]);
        let mut poll = loop_with(detector, None).await;
        assert_eq!(poll.tick().await.unwrap_err(), TickError::CatalogUnavailable);
        // classification still ran, so the runtime state reflects it
        assert_eq!(poll.current_expression(), Expression::Happy);
    }

    #[tokio::test]
    async fn tick_with_missing_bucket_is_typed() {
        let sad: ConfidenceMap = [(Expression::Sad, 0.8)].into_iter().collect();
        let detector = ScriptedDetector::new(vec![Some(FaceReading::new(sad))]);
        let mut poll = loop_with(detector, Some(happy_catalog())).await;
        assert_eq!(
            poll.tick().await.unwrap_err(),
            TickError::MissingExpressionBucket(Expression::Sad)
        );
    }

    #[tokio::test]
    async fn tick_with_undersized_bucket_is_typed() {
        let mut buckets = HashMap::new();
        buckets.insert(Expression::Happy, vec!["only.gif".to_string()]);
        let detector = ScriptedDetector::new(vec![Some(happy_reading())]);
        let mut poll = loop_with(detector, Some(GifCatalog::from_buckets(buckets))).await;
        assert_eq!(
            poll.tick().await.unwrap_err(),
            TickError::Sample(SampleError::InsufficientGifs { have: 1, want: 3 })
        );
    }

    #[tokio::test]
    async fn faceless_tick_is_skipped_silently() {
        let mut poll = loop_with(ScriptedDetector::blind(), None).await;
        poll.tick().await.unwrap();
        assert_eq!(poll.current_expression(), Expression::Neutral);
    }

    #[tokio::test]
    async fn successful_tick_records_expression() {
        let detector = ScriptedDetector::new(vec![Some(happy_reading())]);
        let mut poll = loop_with(detector, Some(happy_catalog())).await;
        poll.tick().await.unwrap();
        assert_eq!(poll.current_expression(), Expression::Happy);
        assert!(poll.catalog_loaded());
    }

    #[test]
    fn mismatched_config_is_rejected_at_construction() {
        let config = FacegifConfig {
            slot_count: 5,
            ..FacegifConfig::default()
        };
        let result = PollLoop::new(
            config,
            "unused.json",
            Arc::new(ScriptedDetector::blind()),
            Box::new(TestPatternSource::new()),
            Box::new(SlotDisplay::new(5)),
        );
        assert!(matches!(
            result,
            Err(ConfigError::SlotSampleMismatch { slots: 5, samples: 3 })
        ));
    }
}
