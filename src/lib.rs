//! Expression-driven gif display pipeline.
//!
//! The crate samples a live camera feed on a fixed cadence, classifies the
//! dominant facial expression of the most prominent detected face and
//! rotates a small set of expression-matched gifs through a fixed number of
//! display slots. The camera, the inference engine and the render surface
//! sit behind the [`VideoSource`], [`ExpressionDetector`] and
//! [`DisplayUpdater`] seams so the whole pipeline runs headless in tests.

pub mod catalog;
pub mod config;
pub mod detector;
pub mod display;
pub mod expression;
pub mod poll;
pub mod sampler;
pub mod video;

pub use catalog::{CatalogError, GifCatalog};
pub use config::{ConfigError, FacegifConfig};
pub use detector::{DetectorOptions, ExpressionDetector, FaceReading, ScriptedDetector};
pub use display::{DisplayUpdater, SlotDisplay};
pub use expression::{ConfidenceMap, Expression, classify};
pub use poll::{PollLoop, PollState, StopHandle, TickError};
pub use sampler::{SampleError, sample};
pub use video::{TestPatternSource, VideoError, VideoFrame, VideoSource};
