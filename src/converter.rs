use tracing::debug;

use crate::codec;
use crate::detect::{ChardetDetector, Detector};
use crate::error::Result;
use crate::report::Reporter;
use crate::resolve::{EncodingPolicy, resolve_encoding};
use crate::target::{Sink, Source};

/// Decodes `input` under the encoding chosen by `policy` and returns it as
/// UTF-8 bytes.
pub fn transcode(
    input: &[u8],
    policy: &EncodingPolicy,
    detector: &mut dyn Detector,
) -> Result<Vec<u8>> {
    let encoding = resolve_encoding(input, policy, detector)?;
    let text = codec::decode(input, encoding)?;
    debug!(encoding = encoding.name(), bytes = text.len(), "decoded input");
    Ok(codec::reencode(text))
}

/// One read → resolve → decode → re-encode → write run.
///
/// The sink is only touched once the complete output is in memory, so a
/// failed run never creates or truncates the destination.
pub struct Converter {
    source: Source,
    sink: Sink,
    policy: EncodingPolicy,
    detector: Box<dyn Detector>,
}

impl Converter {
    pub fn new(source: Source, sink: Sink, policy: EncodingPolicy) -> Self {
        Self {
            source,
            sink,
            policy,
            detector: Box::new(ChardetDetector::new()),
        }
    }

    /// Replaces the default `chardetng` detector.
    pub fn with_detector(mut self, detector: impl Detector + 'static) -> Self {
        self.detector = Box::new(detector);
        self
    }

    /// Runs the conversion, handing any failure to `reporter` before
    /// returning it.
    pub fn convert(self, reporter: &dyn Reporter) -> Result<()> {
        let result = self.run();
        if let Err(err) = &result {
            reporter.report(err);
        }
        result
    }

    fn run(mut self) -> Result<()> {
        let input = self.source.read()?;
        let output = transcode(&input, &self.policy, self.detector.as_mut())?;
        self.sink.write(&output)
    }
}
