
use std::fs;
use std::path::PathBuf;

use tracing::debug;

use crate::{RagError, Result};

/// One physical page of input text, numbered from 1 in reading order. Empty
/// page text is permitted.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub number: u32,
    pub text: String,
}

/// Capability for producing the ordered pages of a document. How the text
/// got out of its container (PDF extraction, OCR, plain files) is the
/// implementation's business; failures surface unchanged as `Source` errors.
pub trait PageSource {
    fn pages(&mut self) -> Result<Vec<Page>>;
}

/// Pages already held in memory. Used by tests and by library callers that
/// extract text themselves.
#[derive(Debug, Clone)]
pub struct StaticPages {
    pages: Vec<Page>,
}

impl StaticPages {
    #[inline]
    pub fn new(pages: Vec<Page>) -> Self {
        Self { pages }
    }

    /// Number the given texts 1..=n in order.
    #[inline]
    pub fn from_texts<I>(texts: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let pages = texts
            .into_iter()
            .enumerate()
            .map(|(i, text)| Page {
                number: i as u32 + 1,
                text,
            })
            .collect();
        Self { pages }
    }
}

impl PageSource for StaticPages {
    #[inline]
    fn pages(&mut self) -> Result<Vec<Page>> {
        Ok(self.pages.clone())
    }
}

/// A UTF-8 text file with pages delimited by form feeds (`\x0c`), the page
/// break convention of `pdftotext` and friends. A file without form feeds is
/// a single page.
#[derive(Debug, Clone)]
pub struct TextFile {
    path: PathBuf,
}

impl TextFile {
    #[inline]
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }
}

impl PageSource for TextFile {
    fn pages(&mut self) -> Result<Vec<Page>> {
        let raw = fs::read_to_string(&self.path).map_err(|e| {
            RagError::Source(format!("failed to read {}: {}", self.path.display(), e))
        })?;

        let pages: Vec<Page> = raw
            .split('\u{c}')
            .enumerate()
            .map(|(i, text)| Page {
                number: i as u32 + 1,
                text: text.to_string(),
            })
            .collect();

        debug!("Read {} pages from {}", pages.len(), self.path.display());
        Ok(pages)
    }
}
