//! Frame rate extraction and frame duration computation.
//!
//! ffprobe reports the average frame rate as a `num/den` string. GIFs are
//! frequently reported with degenerate values such as `0/0`, so anything that
//! does not describe a positive rate falls back to 25 fps.

use crate::error::{CoreError, CoreResult};
use crate::external::FfprobeExecutor;
use serde::Serialize;
use std::fmt;
use std::path::Path;
use thiserror::Error;

/// Units per second of every frame duration handed to the encoder.
pub const TIMESCALE: u32 = 1000;

/// Average frame rate of an animation. Both parts are always non-zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FrameRate {
    pub numerator: u32,
    pub denominator: u32,
}

impl FrameRate {
    /// Rate used whenever the source does not report a usable one.
    pub const DEFAULT: FrameRate = FrameRate {
        numerator: 25,
        denominator: 1,
    };

    /// Returns `None` if either part is zero.
    pub fn new(numerator: u32, denominator: u32) -> Option<Self> {
        (numerator > 0 && denominator > 0).then_some(Self {
            numerator,
            denominator,
        })
    }

    pub fn as_f64(&self) -> f64 {
        f64::from(self.numerator) / f64::from(self.denominator)
    }
}

impl Default for FrameRate {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for FrameRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.numerator, self.denominator)
    }
}

/// Why a `num/den` string did not yield a usable rate.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FrameRateParseError {
    #[error("empty frame rate")]
    Empty,

    #[error("frame rate '{0}' has no denominator")]
    MissingDenominator(String),

    #[error("frame rate '{0}' is not a ratio of unsigned integers")]
    InvalidNumber(String),

    #[error("frame rate '{0}' is degenerate")]
    Degenerate(String),
}

/// Parses an ffprobe `num/den` rate. Pure; no fallback is applied here.
pub fn parse_frame_rate(raw: &str) -> Result<FrameRate, FrameRateParseError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(FrameRateParseError::Empty);
    }

    let (num, den) = raw
        .split_once('/')
        .ok_or_else(|| FrameRateParseError::MissingDenominator(raw.to_string()))?;

    let parse = |part: &str| {
        part.trim()
            .parse::<u32>()
            .map_err(|_| FrameRateParseError::InvalidNumber(raw.to_string()))
    };
    let (num, den) = (parse(num)?, parse(den)?);

    FrameRate::new(num, den).ok_or_else(|| FrameRateParseError::Degenerate(raw.to_string()))
}

/// Display time of one frame in [`TIMESCALE`] units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct FrameDuration(u32);

impl FrameDuration {
    /// `floor(1000 * den / num)`, never below 1.
    pub fn from_rate(rate: FrameRate) -> Self {
        let units = u64::from(TIMESCALE) * u64::from(rate.denominator) / u64::from(rate.numerator);
        let clamped = units.clamp(1, u64::from(u32::MAX));
        Self(u32::try_from(clamped).unwrap_or(u32::MAX))
    }

    pub fn units(self) -> u32 {
        self.0
    }
}

impl fmt::Display for FrameDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Probes the average frame rate of `source`.
///
/// Unusable probe output always falls back to [`FrameRate::DEFAULT`]. A probe
/// that cannot run or exits unsuccessfully falls back too, unless `strict` is
/// set, in which case it is a [`CoreError::ProbeFailure`].
pub fn extract_frame_rate<P: FfprobeExecutor>(
    probe: &P,
    source: &Path,
    strict: bool,
) -> CoreResult<FrameRate> {
    let raw = match probe.get_average_frame_rate(source) {
        Ok(Some(raw)) => raw,
        Ok(None) => {
            log::warn!(
                "No video stream reported for {}, assuming {} fps",
                source.display(),
                FrameRate::DEFAULT
            );
            return Ok(FrameRate::DEFAULT);
        }
        Err(CoreError::JsonParseError(msg)) => {
            log::warn!("Unreadable probe output ({msg}), assuming {} fps", FrameRate::DEFAULT);
            return Ok(FrameRate::DEFAULT);
        }
        Err(e) if strict => return Err(CoreError::ProbeFailure(e.to_string())),
        Err(e) => {
            if e.is_tool_unavailable() {
                log::warn!("ffprobe unavailable ({e}), assuming {} fps", FrameRate::DEFAULT);
            } else {
                log::warn!("Frame rate probe failed ({e}), assuming {} fps", FrameRate::DEFAULT);
            }
            return Ok(FrameRate::DEFAULT);
        }
    };

    match parse_frame_rate(&raw) {
        Ok(rate) => Ok(rate),
        Err(e) => {
            log::warn!("Unusable frame rate for {}: {e}, assuming {} fps", source.display(), FrameRate::DEFAULT);
            Ok(FrameRate::DEFAULT)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::external::mocks::MockFfprobeExecutor;
    use std::io;

    fn duration_of(raw: &str) -> u32 {
        FrameDuration::from_rate(parse_frame_rate(raw).unwrap_or_default()).units()
    }

    #[test]
    fn parses_valid_rates() {
        assert_eq!(parse_frame_rate("25/1"), Ok(FrameRate::DEFAULT));
        assert_eq!(parse_frame_rate(" 30000/1001 "), Ok(FrameRate::new(30000, 1001).unwrap()));
    }

    #[test]
    fn rejects_degenerate_rates() {
        assert!(matches!(parse_frame_rate("0/0"), Err(FrameRateParseError::Degenerate(_))));
        assert!(matches!(parse_frame_rate("10/0"), Err(FrameRateParseError::Degenerate(_))));
        assert!(matches!(parse_frame_rate("0/1"), Err(FrameRateParseError::Degenerate(_))));
        assert!(matches!(parse_frame_rate("25"), Err(FrameRateParseError::MissingDenominator(_))));
        assert!(matches!(parse_frame_rate("a/b"), Err(FrameRateParseError::InvalidNumber(_))));
        assert!(matches!(parse_frame_rate("-5/1"), Err(FrameRateParseError::InvalidNumber(_))));
        assert_eq!(parse_frame_rate(""), Err(FrameRateParseError::Empty));
    }

    #[test]
    fn durations_from_rates() {
        assert_eq!(duration_of("25/1"), 40);
        assert_eq!(duration_of("30/1"), 33);
        assert_eq!(duration_of("1/1"), 1000);
        assert_eq!(duration_of("10/1"), 100);
        assert_eq!(duration_of("2000/1"), 1);
        assert_eq!(duration_of("30000/1001"), 33);
        assert_eq!(duration_of("1/4294967295"), u32::MAX);
    }

    #[test]
    fn degenerate_rates_use_default_duration() {
        assert_eq!(duration_of("0/0"), 40);
        assert_eq!(duration_of("garbage"), 40);
    }

    #[test]
    fn extraction_falls_back_on_bad_output() {
        let probe = MockFfprobeExecutor::new();
        let path = Path::new("a.gif");

        probe.set_result(Ok(Some("0/0".to_string())));
        assert_eq!(extract_frame_rate(&probe, path, true).unwrap(), FrameRate::DEFAULT);

        probe.set_result(Ok(None));
        assert_eq!(extract_frame_rate(&probe, path, true).unwrap(), FrameRate::DEFAULT);

        probe.set_result(Err(CoreError::JsonParseError("bad".into())));
        assert_eq!(extract_frame_rate(&probe, path, true).unwrap(), FrameRate::DEFAULT);

        probe.set_result(Ok(Some("12/1".to_string())));
        assert_eq!(extract_frame_rate(&probe, path, false).unwrap(), FrameRate::new(12, 1).unwrap());
    }

    #[test]
    fn probe_failure_is_fatal_only_when_strict() {
        let probe = MockFfprobeExecutor::new();
        let path = Path::new("a.gif");
        let missing = || {
            CoreError::CommandStart(
                "ffprobe".into(),
                io::Error::new(io::ErrorKind::NotFound, "not found"),
            )
        };

        probe.set_result(Err(missing()));
        assert_eq!(extract_frame_rate(&probe, path, false).unwrap(), FrameRate::DEFAULT);

        probe.set_result(Err(missing()));
        let err = extract_frame_rate(&probe, path, true).unwrap_err();
        assert!(matches!(err, CoreError::ProbeFailure(_)));
    }
}
