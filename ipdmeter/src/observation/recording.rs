//! JSON Lines landmark recordings.
//!
//! One object per line:
//!
//! ```text
//! {"width": 1280, "height": 720, "landmarks": [[0.51, 0.47], ...]}
//! {"width": 1280, "height": 720, "landmarks": null}
//! ```
//!
//! `null` landmarks mark a frame where no face was detected. Blank lines
//! are skipped.

use std::io::{BufRead, Write};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::landmarks::LandmarkFrame;

/// Errors reading or writing a recording.
#[derive(Debug, Error)]
pub enum RecordingError {
    /// The underlying reader or writer failed.
    #[error("Recording I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A line is not a valid frame record.
    #[error("Invalid frame record on line {line}: {source}")]
    Json {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    /// A frame could not be encoded.
    #[error("Failed to encode frame record: {0}")]
    Encode(#[source] serde_json::Error),
}

/// One line of a recording.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordedFrame {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Normalized landmarks, or `None` when no face was detected.
    pub landmarks: Option<Vec<[f64; 2]>>,
}

impl RecordedFrame {
    /// Convert to a frame; `None` when no face was detected.
    pub fn into_frame(self) -> Option<LandmarkFrame> {
        let landmarks = self.landmarks?;
        Some(LandmarkFrame::new(self.width, self.height, landmarks))
    }
}

impl From<&LandmarkFrame> for RecordedFrame {
    fn from(frame: &LandmarkFrame) -> Self {
        Self {
            width: frame.width,
            height: frame.height,
            landmarks: Some(frame.landmarks.clone()),
        }
    }
}

/// Read every frame of a recording.
pub fn read_recording<R: BufRead>(reader: R) -> Result<Vec<Option<LandmarkFrame>>, RecordingError> {
    let mut frames = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let record: RecordedFrame =
            serde_json::from_str(&line).map_err(|source| RecordingError::Json {
                line: index + 1,
                source,
            })?;
        frames.push(record.into_frame());
    }

    tracing::debug!(frames = frames.len(), "Recording loaded");
    Ok(frames)
}

/// Append one frame record to a writer.
pub fn write_frame<W: Write>(
    writer: &mut W,
    frame: Option<&LandmarkFrame>,
    width: u32,
    height: u32,
) -> Result<(), RecordingError> {
    let record = match frame {
        Some(frame) => RecordedFrame::from(frame),
        None => RecordedFrame {
            width,
            height,
            landmarks: None,
        },
    };
    serde_json::to_writer(&mut *writer, &record).map_err(RecordingError::Encode)?;
    writeln!(writer)?;
    Ok(())
}
