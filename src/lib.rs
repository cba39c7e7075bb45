//! Convert plaintext of any encoding to UTF-8.
//!
//! The input encoding is either detected statistically, given as a hint, or
//! both (the hint then serves as the fallback for an inconclusive guess).

pub mod codec;
pub mod converter;
pub mod detect;
pub mod error;
pub mod report;
pub mod resolve;
pub mod target;

pub use codec::{Charset, charset_for_label};
pub use converter::{Converter, transcode};
pub use detect::{ChardetDetector, Detection, Detector};
pub use error::{Error, ErrorKind, Result};
pub use report::{LogReporter, MemoryReporter, Reporter};
pub use resolve::EncodingPolicy;
pub use target::{Sink, Source};
