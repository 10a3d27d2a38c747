use crate::bridge::Helper;
use crate::envelope::Envelope;

/// What happened to one unload notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportOutcome {
    /// Progress was reported upstream.
    Reported,
    /// Not enough of the file was watched.
    BelowThreshold,
    /// Playback position or duration was unusable.
    NoPosition,
    /// The helper answered `error` or `tokenupdate`; logged, not retried.
    Rejected,
    /// The helper could not be run or understood; worth a notice upstream.
    HelperFailed(String),
}

/// Parse a user-typed score. Whitespace is trimmed; non-numeric, negative
/// and non-finite input is rejected. The scale itself is the helper's
/// business.
pub fn parse_score(input: &str) -> Option<f64> {
    let value = input.trim().parse::<f64>().ok()?;
    (value.is_finite() && value >= 0.0).then_some(value)
}

/// Reports watch progress when enough of a file has been played.
#[derive(Debug, Clone, Copy)]
pub struct Reporter {
    threshold: f64,
}

impl Reporter {
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    /// Fraction of the file watched, `None` without a usable duration.
    pub fn watched_fraction(position: f64, duration: f64) -> Option<f64> {
        if duration <= 0.0 || position < 0.0 {
            return None;
        }
        Some(position / duration)
    }

    /// Handle an unload event for `path`.
    ///
    /// Below the threshold this is a no-op and the helper is not invoked.
    /// `error` and `tokenupdate` replies are logged and otherwise ignored;
    /// nothing in this path retries.
    pub fn on_unload(
        &self,
        helper: &Helper,
        path: &str,
        position: f64,
        duration: f64,
    ) -> ReportOutcome {
        let Some(fraction) = Self::watched_fraction(position, duration) else {
            tracing::debug!(path, position, duration, "no usable playback position");
            return ReportOutcome::NoPosition;
        };

        if fraction < self.threshold {
            tracing::debug!(
                path,
                fraction = format!("{fraction:.2}"),
                threshold = self.threshold,
                "below mark threshold, not reporting"
            );
            return ReportOutcome::BelowThreshold;
        }

        match helper.invoke(&["report", path]) {
            Ok(Envelope::Ok { .. }) => {
                tracing::info!(path, "progress reported");
                ReportOutcome::Reported
            }
            Ok(Envelope::Error { message }) => {
                tracing::warn!(path, message = ?message, "helper rejected report");
                ReportOutcome::Rejected
            }
            Ok(Envelope::TokenUpdate { message }) => {
                tracing::warn!(path, message = ?message, "report needs a token update");
                ReportOutcome::Rejected
            }
            Err(e) => {
                tracing::warn!(path, error = %e, "report failed");
                ReportOutcome::HelperFailed(e.to_string())
            }
        }
    }
}
