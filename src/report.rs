use std::cell::RefCell;

use miette::Diagnostic;
use tracing::error;

use crate::error::{Error, ErrorKind};

/// Receives the errors that end a conversion.
pub trait Reporter {
    fn report(&self, error: &Error);
}

/// Logs each error at error level, followed by its help text if any.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogReporter;

impl Reporter for LogReporter {
    fn report(&self, err: &Error) {
        error!("{err}");
        if let Some(help) = err.help() {
            error!("{help}");
        }
    }
}

/// Keeps reported errors in memory.
#[derive(Debug, Default)]
pub struct MemoryReporter {
    reports: RefCell<Vec<(ErrorKind, String)>>,
}

impl MemoryReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn kinds(&self) -> Vec<ErrorKind> {
        self.reports.borrow().iter().map(|(kind, _)| *kind).collect()
    }

    pub fn messages(&self) -> Vec<String> {
        self.reports
            .borrow()
            .iter()
            .map(|(_, message)| message.clone())
            .collect()
    }
}

impl Reporter for MemoryReporter {
    fn report(&self, err: &Error) {
        self.reports.borrow_mut().push((err.kind(), err.to_string()));
    }
}
