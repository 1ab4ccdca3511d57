//! Structured diagnostics for recoverable failures.
//!
//! Parsing and rendering tolerate damage at part, slide, and shape
//! granularity. Whenever something is skipped or substituted, a
//! [`Diagnostic`] is recorded so callers can report "N slides had warnings"
//! without the failures ever surfacing as errors. Records are also mirrored
//! to the `log` facade.

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Category of a recoverable failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiagKind {
    /// A referenced part is absent from the container
    MissingPart,
    /// A part exists but its XML could not be parsed
    MalformedXml,
    /// A whole slide was replaced by an error placeholder
    SlideExtractionFailed,
    /// An embedded image failed to decode within the allotted time
    ImageDecodeTimeout,
}

/// How consequential the failure is for the produced output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    /// A fallback was taken; output content may be reduced
    Warning,
    /// Informational only; output is unaffected
    Info,
}

/// A single recoverable-failure record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Failure category
    pub kind: DiagKind,
    /// Failure severity
    pub severity: Severity,
    /// Slide index the failure belongs to, if slide-scoped
    pub slide: Option<usize>,
    /// Package part the failure belongs to, if part-scoped
    pub part: Option<String>,
    /// Human-readable description
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.slide, &self.part) {
            (Some(idx), Some(part)) => {
                write!(f, "slide {}: {} ({})", idx + 1, self.message, part)
            },
            (Some(idx), None) => write!(f, "slide {}: {}", idx + 1, self.message),
            (None, Some(part)) => write!(f, "{} ({})", self.message, part),
            (None, None) => write!(f, "{}", self.message),
        }
    }
}

/// Shared accumulator for diagnostics.
///
/// Cheap to clone; clones append to the same record list, so a single sink
/// can be handed to parallel slide-extraction tasks.
#[derive(Debug, Clone, Default)]
pub struct DiagSink {
    records: Arc<Mutex<Vec<Diagnostic>>>,
}

impl DiagSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a warning-severity diagnostic and mirror it to `log::warn!`.
    pub fn warn(
        &self,
        kind: DiagKind,
        slide: Option<usize>,
        part: Option<&str>,
        message: impl Into<String>,
    ) {
        let diag = Diagnostic {
            kind,
            severity: Severity::Warning,
            slide,
            part: part.map(str::to_string),
            message: message.into(),
        };
        log::warn!("{}", diag);
        self.records.lock().push(diag);
    }

    /// Record an info-severity diagnostic and mirror it to `log::debug!`.
    pub fn info(
        &self,
        kind: DiagKind,
        slide: Option<usize>,
        part: Option<&str>,
        message: impl Into<String>,
    ) {
        let diag = Diagnostic {
            kind,
            severity: Severity::Info,
            slide,
            part: part.map(str::to_string),
            message: message.into(),
        };
        log::debug!("{}", diag);
        self.records.lock().push(diag);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }

    /// Take all accumulated records, ordered package-level first, then by
    /// slide index. Parallel extraction appends in completion order, so the
    /// sort keeps the output stable across runs.
    pub fn drain(&self) -> Vec<Diagnostic> {
        let mut records = std::mem::take(&mut *self.records.lock());
        records.sort_by_key(|d| d.slide.map_or((0, 0), |idx| (1, idx)));
        records
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sink_accumulates_across_clones() {
        let sink = DiagSink::new();
        let clone = sink.clone();
        sink.warn(DiagKind::MissingPart, None, Some("/ppt/media/image9.png"), "media part not found");
        clone.warn(DiagKind::SlideExtractionFailed, Some(2), None, "slide part missing");

        assert_eq!(sink.len(), 2);
        let records = sink.drain();
        assert_eq!(records.len(), 2);
        assert!(sink.is_empty());
    }

    #[test]
    fn test_drain_orders_package_records_first() {
        let sink = DiagSink::new();
        sink.warn(DiagKind::SlideExtractionFailed, Some(4), None, "bad xml");
        sink.warn(DiagKind::MissingPart, None, Some("/ppt/theme/theme1.xml"), "no theme");
        sink.warn(DiagKind::SlideExtractionFailed, Some(1), None, "bad xml");

        let records = sink.drain();
        assert_eq!(records[0].slide, None);
        assert_eq!(records[1].slide, Some(1));
        assert_eq!(records[2].slide, Some(4));
    }

    #[test]
    fn test_display_numbers_slides_from_one() {
        let diag = Diagnostic {
            kind: DiagKind::SlideExtractionFailed,
            severity: Severity::Warning,
            slide: Some(0),
            part: None,
            message: "slide part missing".to_string(),
        };
        assert_eq!(diag.to_string(), "slide 1: slide part missing");
    }
}
