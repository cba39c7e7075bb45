use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;

use tracing::debug;

use crate::error::{Error, Result};

/// Where the input bytes come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Stdin,
    File(PathBuf),
}

impl Source {
    pub fn file(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if path.as_os_str().is_empty() {
            return Err(Error::EmptyPath("input"));
        }
        Ok(Self::File(path))
    }

    /// Reads the whole input as raw bytes.
    pub fn read(&self) -> Result<Vec<u8>> {
        let data = match self {
            Self::Stdin => {
                let mut buf = Vec::new();
                io::stdin().lock().read_to_end(&mut buf)?;
                buf
            }
            Self::File(path) => fs::read(path)?,
        };
        debug!(source = %self, bytes = data.len(), "read input");
        Ok(data)
    }
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Stdin => write!(f, "<stdin>"),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Where the converted bytes go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sink {
    Stdout,
    File(PathBuf),
}

impl Sink {
    pub fn file(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if path.as_os_str().is_empty() {
            return Err(Error::EmptyPath("output"));
        }
        Ok(Self::File(path))
    }

    /// Writes all of `data`, creating or truncating a file destination.
    pub fn write(&self, data: &[u8]) -> Result<()> {
        match self {
            Self::Stdout => {
                let mut stdout = io::stdout().lock();
                stdout.write_all(data)?;
                stdout.flush()?;
            }
            Self::File(path) => fs::write(path, data)?,
        }
        debug!(sink = %self, bytes = data.len(), "wrote output");
        Ok(())
    }
}

impl std::fmt::Display for Sink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Stdout => write!(f, "<stdout>"),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    fn test_empty_paths_rejected() {
        assert!(matches!(Source::file(""), Err(Error::EmptyPath("input"))));
        assert!(matches!(Sink::file(""), Err(Error::EmptyPath("output"))));
    }

    #[rstest]
    fn test_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.bin");

        Sink::file(&path).unwrap().write(b"\x00\xff raw").unwrap();
        assert_eq!(Source::file(&path).unwrap().read().unwrap(), b"\x00\xff raw");
    }

    #[rstest]
    fn test_sink_truncates_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.txt");
        fs::write(&path, b"a much longer previous content").unwrap();

        Sink::file(&path).unwrap().write(b"short").unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"short");
    }

    #[rstest]
    fn test_missing_source_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Source::file(dir.path().join("missing")).unwrap().read().unwrap_err();
        assert!(matches!(err, Error::Io(ref e) if e.kind() == io::ErrorKind::NotFound));
    }

    #[rstest]
    fn test_sink_into_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("no/such/dir/out.txt");
        let err = Sink::file(&path).unwrap().write(b"data").unwrap_err();
        assert!(matches!(err, Error::Io(_)));
        assert!(!path.exists());
    }

    #[rstest]
    #[case::stdin(Source::Stdin, "<stdin>")]
    #[case::file(Source::File("in.txt".into()), "in.txt")]
    fn test_source_display(#[case] source: Source, #[case] expected: &str) {
        assert_eq!(source.to_string(), expected);
    }
}
