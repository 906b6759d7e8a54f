//! Practice clip capture.
//!
//! The camera and microphone live outside this service; a [`CaptureDevice`]
//! hands out a stream and a [`Recording`] guard owns it until release. The
//! stream is released exactly once, whether the recording is stopped or
//! abandoned.

use std::fmt;

use crate::errors::AppError;

/// Message shown when the user refuses camera access.
#[allow(dead_code)]
pub const PERMISSION_DENIED_MESSAGE: &str = "Please allow camera access to record your movement.";

/// Reference to a recorded clip, stored on a submission as `videoBlobUrl`.
///
/// Only meaningful for the client session that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClipRef(String);

impl ClipRef {
    /// Wrap a client-supplied clip reference; empty references are rejected.
    pub fn new(reference: impl Into<String>) -> Result<Self, AppError> {
        let reference = reference.into();
        if reference.trim().is_empty() {
            return Err(AppError::Validation(
                "A recorded clip is required".to_string(),
            ));
        }
        Ok(Self(reference))
    }

    #[allow(dead_code)]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

// The device seam below is driven by client-side recorders; the service itself
// only receives finished clip references.
#[allow(dead_code)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureError {
    PermissionDenied,
    Unavailable(String),
}

impl fmt::Display for CaptureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CaptureError::PermissionDenied => f.write_str(PERMISSION_DENIED_MESSAGE),
            CaptureError::Unavailable(reason) => write!(f, "Camera unavailable: {}", reason),
        }
    }
}

impl std::error::Error for CaptureError {}

impl From<CaptureError> for AppError {
    fn from(err: CaptureError) -> Self {
        AppError::Unauthorized(err.to_string())
    }
}

/// A live audio/video stream.
#[allow(dead_code)]
pub trait CaptureStream: Send {
    /// Finish recording and produce the clip.
    fn finish(&mut self) -> Result<ClipRef, CaptureError>;

    /// Stop every track and give the hardware back.
    fn release(&mut self);
}

/// Source of capture streams; opening may prompt for permission.
#[allow(dead_code)]
pub trait CaptureDevice {
    fn open(&self) -> Result<Box<dyn CaptureStream>, CaptureError>;
}

/// An in-progress recording. Dropping it without [`Recording::stop`] discards
/// the clip and still releases the stream.
#[allow(dead_code)]
pub struct Recording {
    stream: Option<Box<dyn CaptureStream>>,
}

#[allow(dead_code)]
impl Recording {
    pub fn start(device: &dyn CaptureDevice) -> Result<Self, CaptureError> {
        let stream = device.open().inspect_err(|e| {
            tracing::warn!("Could not start recording: {}", e);
        })?;
        Ok(Self {
            stream: Some(stream),
        })
    }

    /// Stop recording, release the stream and return the clip.
    pub fn stop(mut self) -> Result<ClipRef, CaptureError> {
        let Some(mut stream) = self.stream.take() else {
            return Err(CaptureError::Unavailable("recording already released".to_string()));
        };
        let clip = stream.finish();
        stream.release();
        clip
    }
}

impl Drop for Recording {
    fn drop(&mut self) {
        if let Some(mut stream) = self.stream.take() {
            tracing::debug!("Recording abandoned, releasing capture stream");
            stream.release();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[derive(Default)]
    struct Counters {
        opened: AtomicUsize,
        released: AtomicUsize,
    }

    struct FakeStream {
        counters: Arc<Counters>,
        fail_finish: bool,
    }

    impl CaptureStream for FakeStream {
        fn finish(&mut self) -> Result<ClipRef, CaptureError> {
            if self.fail_finish {
                return Err(CaptureError::Unavailable("encoder stopped".to_string()));
            }
            ClipRef::new("blob:local/clip-1").map_err(|e| CaptureError::Unavailable(e.to_string()))
        }

        fn release(&mut self) {
            self.counters.released.fetch_add(1, Ordering::SeqCst);
        }
    }

    struct FakeDevice {
        counters: Arc<Counters>,
        allow: bool,
        fail_finish: bool,
    }

    impl FakeDevice {
        fn new(allow: bool, fail_finish: bool) -> Self {
            Self {
                counters: Arc::new(Counters::default()),
                allow,
                fail_finish,
            }
        }

        fn released(&self) -> usize {
            self.counters.released.load(Ordering::SeqCst)
        }
    }

    impl CaptureDevice for FakeDevice {
        fn open(&self) -> Result<Box<dyn CaptureStream>, CaptureError> {
            if !self.allow {
                return Err(CaptureError::PermissionDenied);
            }
            self.counters.opened.fetch_add(1, Ordering::SeqCst);
            Ok(Box::new(FakeStream {
                counters: self.counters.clone(),
                fail_finish: self.fail_finish,
            }))
        }
    }

    #[test]
    fn test_stop_returns_clip_and_releases_once() {
        let device = FakeDevice::new(true, false);
        let recording = Recording::start(&device).unwrap();

        let clip = recording.stop().unwrap();
        assert_eq!(clip.as_str(), "blob:local/clip-1");
        assert_eq!(device.released(), 1);
    }

    #[test]
    fn test_abandoned_recording_releases() {
        let device = FakeDevice::new(true, false);
        {
            let _recording = Recording::start(&device).unwrap();
        }
        assert_eq!(device.counters.opened.load(Ordering::SeqCst), 1);
        assert_eq!(device.released(), 1);
    }

    #[test]
    fn test_failed_finish_still_releases() {
        let device = FakeDevice::new(true, true);
        let recording = Recording::start(&device).unwrap();

        assert!(recording.stop().is_err());
        assert_eq!(device.released(), 1);
    }

    #[test]
    fn test_permission_denied_is_user_facing() {
        let device = FakeDevice::new(false, false);
        let err = Recording::start(&device).err().unwrap();
        assert_eq!(err, CaptureError::PermissionDenied);

        let app_err: AppError = err.into();
        assert_eq!(app_err.message(), PERMISSION_DENIED_MESSAGE);
        assert_eq!(device.released(), 0);
    }

    #[test]
    fn test_clip_ref_rejects_empty() {
        assert!(ClipRef::new("  ").is_err());
        assert_eq!(ClipRef::new("blob:x").unwrap().into_string(), "blob:x");
    }
}
