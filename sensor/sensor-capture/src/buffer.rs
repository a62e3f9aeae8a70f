//! Bounded buffer for captured frames.

use mesh_types::IndexedMesh;
use tracing::{debug, warn};

use crate::aggregate::aggregate_frames;
use crate::error::CaptureResult;
use crate::frame::FrameSample;

/// Default maximum number of frames held by a [`CaptureBuffer`].
///
/// About ten seconds of tracking at 30 updates per second.
pub const DEFAULT_CAPTURE_CAPACITY: usize = 300;

/// Outcome of offering a frame to a [`CaptureBuffer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushOutcome {
    /// The frame was stored.
    Accepted,
    /// The buffer is at capacity; the frame was dropped.
    Full,
}

/// A bounded, insertion-ordered buffer of captured frames.
///
/// Unlike a ring buffer, a full `CaptureBuffer` keeps the frames it already
/// holds and drops new ones. Reaching the cap is not an error; it simply
/// ends the capture.
///
/// # Example
///
/// ```
/// use sensor_capture::{CaptureBuffer, FrameSample, PushOutcome, Topology};
/// use nalgebra::Point3;
///
/// let topology = Topology::new(vec![[0, 1, 2]]);
/// let frame = FrameSample::new(vec![Point3::origin(); 3], topology);
///
/// let mut buffer = CaptureBuffer::new(2);
/// assert_eq!(buffer.push(frame.clone()), PushOutcome::Accepted);
/// assert_eq!(buffer.push(frame.clone()), PushOutcome::Accepted);
/// assert_eq!(buffer.push(frame), PushOutcome::Full);
///
/// assert_eq!(buffer.len(), 2);
/// assert_eq!(buffer.dropped_count(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct CaptureBuffer {
    /// Maximum number of frames.
    capacity: usize,

    /// Frames in arrival order.
    frames: Vec<FrameSample>,

    /// Frames offered after the buffer filled up.
    dropped: usize,
}

impl CaptureBuffer {
    /// Creates a new buffer with the given capacity.
    ///
    /// A capacity of zero is raised to one.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            frames: Vec::with_capacity(capacity.min(1024)),
            dropped: 0,
        }
    }

    /// Returns the capacity of the buffer.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the number of frames in the buffer.
    #[must_use]
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Returns true if the buffer is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Returns true if the buffer is at capacity.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.frames.len() >= self.capacity
    }

    /// Number of frames dropped because the buffer was full.
    #[must_use]
    pub const fn dropped_count(&self) -> usize {
        self.dropped
    }

    /// Offers a frame to the buffer.
    pub fn push(&mut self, frame: FrameSample) -> PushOutcome {
        if self.is_full() {
            if self.dropped == 0 {
                warn!(
                    capacity = self.capacity,
                    "Capture buffer full, dropping further frames"
                );
            }
            self.dropped += 1;
            return PushOutcome::Full;
        }

        self.frames.push(frame);
        debug!(len = self.frames.len(), "Buffered frame");
        PushOutcome::Accepted
    }

    /// Returns the buffered frames in arrival order.
    #[must_use]
    pub fn frames(&self) -> &[FrameSample] {
        &self.frames
    }

    /// Returns an iterator over the buffered frames.
    pub fn iter(&self) -> impl Iterator<Item = &FrameSample> {
        self.frames.iter()
    }

    /// Takes ownership of all buffered frames, leaving the buffer empty.
    pub fn take(&mut self) -> Vec<FrameSample> {
        self.dropped = 0;
        std::mem::take(&mut self.frames)
    }

    /// Clears all frames from the buffer.
    pub fn clear(&mut self) {
        self.frames.clear();
        self.dropped = 0;
    }

    /// Averages the buffered frames into one mesh.
    ///
    /// # Errors
    ///
    /// See [`aggregate_frames`].
    pub fn aggregate(&self) -> CaptureResult<IndexedMesh> {
        aggregate_frames(&self.frames)
    }
}

impl Default for CaptureBuffer {
    fn default() -> Self {
        Self::new(DEFAULT_CAPTURE_CAPACITY)
    }
}
