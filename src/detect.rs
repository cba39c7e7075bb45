use chardetng::EncodingDetector;
use encoding_rs::Encoding;

/// Outcome of a statistical encoding guess.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Detection {
    Confident(&'static Encoding),
    /// The detector finished without a trustworthy answer. `guess` is its
    /// best candidate, if it has one.
    Inconclusive {
        guess: Option<&'static Encoding>,
    },
}

impl Detection {
    pub fn encoding(&self) -> Option<&'static Encoding> {
        match self {
            Self::Confident(encoding) => Some(*encoding),
            Self::Inconclusive { guess } => *guess,
        }
    }

    pub fn is_confident(&self) -> bool {
        matches!(self, Self::Confident(_))
    }
}

impl std::fmt::Display for Detection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Confident(encoding) => write!(f, "{}", encoding.name()),
            Self::Inconclusive { guess: Some(encoding) } => {
                write!(f, "inconclusive (best guess {})", encoding.name())
            }
            Self::Inconclusive { guess: None } => write!(f, "inconclusive"),
        }
    }
}

/// A statistical encoding detector.
///
/// Input may be fed in any number of pieces; `finish` is called once after
/// the last piece.
pub trait Detector {
    fn feed(&mut self, input: &[u8]);
    fn finish(&mut self) -> Detection;
    fn detector_name(&self) -> &'static str;
}

/// [`Detector`] backed by `chardetng`, the detector used by Firefox.
pub struct ChardetDetector {
    inner: EncodingDetector,
    finished: Option<Detection>,
}

impl ChardetDetector {
    pub fn new() -> Self {
        Self {
            inner: EncodingDetector::new(),
            finished: None,
        }
    }
}

impl Default for ChardetDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl Detector for ChardetDetector {
    fn detector_name(&self) -> &'static str {
        "chardetng"
    }

    fn feed(&mut self, input: &[u8]) {
        // chardetng panics on input after the final chunk.
        if self.finished.is_none() {
            self.inner.feed(input, false);
        }
    }

    fn finish(&mut self) -> Detection {
        if let Some(detection) = self.finished {
            return detection;
        }

        self.inner.feed(&[], true);
        let (encoding, confident) = self.inner.guess_assess(None, true);
        let detection = if confident {
            Detection::Confident(encoding)
        } else {
            Detection::Inconclusive {
                guess: Some(encoding),
            }
        };
        self.finished = Some(detection);
        detection
    }
}
