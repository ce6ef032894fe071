use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::expression::ConfidenceMap;
use crate::video::VideoFrame;

/// Tuning knobs passed to every detection call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DetectorOptions {
    /// Square input size the frame is scaled to before inference.
    pub input_size: u32,
    /// Minimum face score for a detection to count.
    pub score_threshold: f32,
}

impl Default for DetectorOptions {
    fn default() -> Self {
        Self {
            input_size: 416,
            score_threshold: 0.5,
        }
    }
}

/// Expression confidences for the most prominent face in a frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FaceReading {
    pub expressions: ConfidenceMap,
}

impl FaceReading {
    pub fn new(expressions: ConfidenceMap) -> Self {
        Self { expressions }
    }
}

/// Expression inference over single video frames.
///
/// Implementations load their model resources once via
/// [`load_models`](ExpressionDetector::load_models) before any `detect`
/// call is issued.
#[async_trait]
pub trait ExpressionDetector: Send + Sync {
    /// Fetch and prepare the detector's model resources.
    async fn load_models(&self) -> anyhow::Result<()>;

    /// Detect the most prominent face in `frame`.
    ///
    /// `Ok(None)` means no face met the threshold in `options`; that is a
    /// normal, frequent outcome and not an error.
    async fn detect(
        &self,
        frame: &VideoFrame,
        options: &DetectorOptions,
    ) -> anyhow::Result<Option<FaceReading>>;
}

/// A scripted detector used by the demo binary and tests. It replays a
/// fixed sequence of readings, wrapping around at the end.
pub struct ScriptedDetector {
    script: Vec<Option<FaceReading>>,
    cursor: AtomicUsize,
}

impl ScriptedDetector {
    pub fn new(script: Vec<Option<FaceReading>>) -> Self {
        Self {
            script,
            cursor: AtomicUsize::new(0),
        }
    }

    /// A detector that never sees a face.
    pub fn blind() -> Self {
        Self::new(Vec::new())
    }
}

#[async_trait]
impl ExpressionDetector for ScriptedDetector {
    async fn load_models(&self) -> anyhow::Result<()> {
        Ok(())
    }

    async fn detect(
        &self,
        _frame: &VideoFrame,
        _options: &DetectorOptions,
    ) -> anyhow::Result<Option<FaceReading>> {
        if self.script.is_empty() {
            return Ok(None);
        }
        let i = self.cursor.fetch_add(1, Ordering::Relaxed) % self.script.len();
        Ok(self.script[i].clone())
    }
}
