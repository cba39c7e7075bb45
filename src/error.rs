use miette::Diagnostic;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Diagnostic, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    #[diagnostic(code(utf8ify::io))]
    Io(#[from] std::io::Error),

    #[error("Could not determine the input encoding.")]
    #[diagnostic(
        code(utf8ify::undetermined_encoding),
        help("Give the input encoding with --encoding.")
    )]
    UndeterminedEncoding,

    #[error("Unknown encoding: {0}")]
    #[diagnostic(
        code(utf8ify::unknown_encoding),
        help("Use an encoding label such as utf-8, ascii, latin-1, shift_jis or windows-1251.")
    )]
    UnknownEncoding(String),

    #[error("Could not convert the input: {encoding} can't decode {bytes} at offset {offset}")]
    #[diagnostic(code(utf8ify::decode))]
    Decode {
        encoding: &'static str,
        offset: usize,
        bytes: String,
    },

    #[error("Could not convert the input: {0} bytes is too large to decode")]
    #[diagnostic(code(utf8ify::input_too_large))]
    InputTooLarge(usize),

    #[error("No hint for input encoding is given.")]
    #[diagnostic(
        code(utf8ify::missing_encoding_hint),
        help("Specify the input encoding or remove the --nochardet option.")
    )]
    MissingEncodingHint,

    #[error("The {0} path is empty.")]
    #[diagnostic(code(utf8ify::empty_path))]
    EmptyPath(&'static str),
}

/// Coarse classification of [`Error`], used when reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Io,
    UndeterminedEncoding,
    Decode,
    InvalidArguments,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Io(_) => ErrorKind::Io,
            Self::UndeterminedEncoding => ErrorKind::UndeterminedEncoding,
            Self::UnknownEncoding(_) | Self::Decode { .. } | Self::InputTooLarge(_) => {
                ErrorKind::Decode
            }
            Self::MissingEncodingHint | Self::EmptyPath(_) => ErrorKind::InvalidArguments,
        }
    }
}
