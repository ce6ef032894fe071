use std::sync::Arc;

use async_trait::async_trait;

/// One captured frame handed to the detector. Opaque to the pipeline.
#[derive(Debug, Clone)]
pub struct VideoFrame {
    /// Monotonic capture sequence number.
    pub seq: u64,
    /// Raw pixel data as the capture layer produced it.
    pub data: Arc<[u8]>,
}

#[derive(Debug, thiserror::Error)]
pub enum VideoError {
    #[error("camera access denied: {0}")]
    AccessDenied(String),
    #[error("no capture device available")]
    NoDevice,
    #[error("video stream ended")]
    StreamEnded,
}

/// A live camera feed.
///
/// `start` negotiates device access and attaches the stream; `playing`
/// resolves once frames actually flow, which is the signal that arms the
/// poll loop. A denied or absent camera is reported through [`VideoError`]
/// and leaves the pipeline inert rather than crashing it.
#[async_trait]
pub trait VideoSource: Send {
    /// Request camera access and attach the stream.
    async fn start(&mut self) -> Result<(), VideoError>;

    /// Resolves once the stream is playing.
    async fn playing(&mut self) -> Result<(), VideoError>;

    /// The most recent captured frame, if any.
    fn current_frame(&mut self) -> Option<VideoFrame>;
}

/// A synthetic video source used by the demo binary and tests. Starts
/// immediately and hands out numbered blank frames.
#[derive(Debug, Default)]
pub struct TestPatternSource {
    seq: u64,
    started: bool,
}

impl TestPatternSource {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl VideoSource for TestPatternSource {
    async fn start(&mut self) -> Result<(), VideoError> {
        self.started = true;
        Ok(())
    }

    async fn playing(&mut self) -> Result<(), VideoError> {
        if self.started {
            Ok(())
        } else {
            Err(VideoError::NoDevice)
        }
    }

    fn current_frame(&mut self) -> Option<VideoFrame> {
        if !self.started {
            return None;
        }
        self.seq += 1;
        Some(VideoFrame {
            seq: self.seq,
            data: Arc::from(&[][..]),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_pattern_plays_after_start() {
        let mut source = TestPatternSource::new();
        assert!(source.current_frame().is_none());
        source.start().await.unwrap();
        source.playing().await.unwrap();
        let a = source.current_frame().unwrap();
        let b = source.current_frame().unwrap();
        assert!(b.seq > a.seq);
    }

    #[tokio::test]
    async fn unstarted_source_is_not_playing() {
        let mut source = TestPatternSource::new();
        assert!(matches!(
            source.playing().await,
            Err(VideoError::NoDevice)
        ));
    }
}
