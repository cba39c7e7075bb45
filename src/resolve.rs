use tracing::{debug, info};

use crate::codec::{Charset, charset_for_label};
use crate::detect::Detector;
use crate::error::{Error, Result};

/// How the input encoding is chosen.
///
/// There is no variant without both detection and a hint, so a request
/// that could never resolve an encoding cannot be built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EncodingPolicy {
    /// Statistical detection only.
    Detect,
    /// Detection, falling back to the hint when detection is inconclusive.
    DetectOr(String),
    /// The hint, without running detection.
    Hint(String),
}

impl EncodingPolicy {
    pub fn new(detect: bool, hint: Option<String>) -> Result<Self> {
        match (detect, hint) {
            (true, None) => Ok(Self::Detect),
            (true, Some(hint)) => Ok(Self::DetectOr(hint)),
            (false, Some(hint)) => Ok(Self::Hint(hint)),
            (false, None) => Err(Error::MissingEncodingHint),
        }
    }

    pub fn detects(&self) -> bool {
        !matches!(self, Self::Hint(_))
    }

    pub fn hint(&self) -> Option<&str> {
        match self {
            Self::Detect => None,
            Self::DetectOr(hint) | Self::Hint(hint) => Some(hint),
        }
    }
}

/// Picks the character set `input` should be decoded with.
///
/// The detector is only consulted when `policy` enables detection. A
/// confident detection wins over the hint; otherwise the hint is used, and
/// without one the encoding is undetermined.
pub fn resolve_encoding(
    input: &[u8],
    policy: &EncodingPolicy,
    detector: &mut dyn Detector,
) -> Result<Charset> {
    if policy.detects() {
        detector.feed(input);
        let detection = detector.finish();
        debug!(
            detector = detector.detector_name(),
            %detection,
            "encoding detection finished"
        );
        if let Some(encoding) = detection.encoding() {
            if detection.is_confident() {
                info!(encoding = encoding.name(), "detected input encoding");
                return Ok(encoding.into());
            }
            debug!(guess = encoding.name(), "ignoring low-confidence guess");
        }
    }

    let hint = policy.hint().ok_or(Error::UndeterminedEncoding)?;
    let charset = charset_for_label(hint)?;
    info!(hint, encoding = charset.name(), "using encoding hint");
    Ok(charset)
}
