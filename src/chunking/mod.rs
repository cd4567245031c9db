#[cfg(test)]
mod tests;

use fancy_regex::Regex;
use tracing::debug;

use crate::config::ConfigError;
use crate::source::Page;

/// Validated parameters for fixed-window chunking.
///
/// Sizes are counted in characters, not bytes, so windows never split a
/// UTF-8 code point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowConfig {
    chunk_size: usize,
    overlap: usize,
}

impl WindowConfig {
    /// Create a window configuration, rejecting parameters that would make
    /// the slide fail to advance (`overlap >= chunk_size`) or produce empty
    /// windows (`chunk_size == 0`).
    #[inline]
    pub fn new(chunk_size: usize, overlap: usize) -> Result<Self, ConfigError> {
        if chunk_size == 0 {
            return Err(ConfigError::InvalidChunkSize(chunk_size));
        }
        if overlap >= chunk_size {
            return Err(ConfigError::OverlapTooLarge {
                overlap,
                chunk_size,
            });
        }
        Ok(Self {
            chunk_size,
            overlap,
        })
    }

    #[inline]
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    #[inline]
    pub fn overlap(&self) -> usize {
        self.overlap
    }

    /// Characters the window start advances between chunks. At least 1 by
    /// construction.
    #[inline]
    pub fn stride(&self) -> usize {
        self.chunk_size - self.overlap
    }
}

/// Split `text` into overlapping fixed-size character windows.
///
/// The returned iterator is lazy, pure, and deterministic: iterating it
/// twice yields identical chunks. Text no longer than one window produces
/// exactly one chunk; empty text produces none.
#[inline]
pub fn chunk_text<'a>(text: &'a str, config: &WindowConfig) -> CharWindows<'a> {
    CharWindows {
        text,
        start: 0,
        config: *config,
    }
}

/// Iterator over the character windows of a text. See [`chunk_text`].
#[derive(Debug, Clone)]
pub struct CharWindows<'a> {
    text: &'a str,
    /// Byte offset of the next window, always on a char boundary.
    start: usize,
    config: WindowConfig,
}

impl<'a> Iterator for CharWindows<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        if self.start >= self.text.len() {
            return None;
        }
        let rest = &self.text[self.start..];
        let chunk = &rest[..byte_len_of_chars(rest, self.config.chunk_size())];
        self.start += byte_len_of_chars(rest, self.config.stride());
        Some(chunk)
    }
}

/// Byte length of the first `chars` characters of `s`, clamped to the whole
/// string when it is shorter.
fn byte_len_of_chars(s: &str, chars: usize) -> usize {
    s.char_indices().nth(chars).map_or(s.len(), |(i, _)| i)
}

/// Compiled boundary patterns for structural chunking.
///
/// A marker line opens with a literal token, a number, and an optional
/// trailing token, with arbitrary text after. The tokens are a localization
/// concern carried by configuration: `Chapter 3` for English documents,
/// `제 3 장` for Korean regulatory text.
#[derive(Debug, Clone)]
pub struct SectionMarkers {
    chapter: Regex,
    article: Regex,
}

impl SectionMarkers {
    /// Build markers from raw regex patterns.
    #[inline]
    pub fn new(chapter_pattern: &str, article_pattern: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            chapter: compile_marker(chapter_pattern)?,
            article: compile_marker(article_pattern)?,
        })
    }

    /// Build markers from literal prefix/suffix tokens. Either suffix may be
    /// empty for languages that put nothing after the number.
    #[inline]
    pub fn from_tokens(
        chapter_prefix: &str,
        chapter_suffix: &str,
        article_prefix: &str,
        article_suffix: &str,
    ) -> Result<Self, ConfigError> {
        Self::new(
            &token_pattern(chapter_prefix, chapter_suffix),
            &token_pattern(article_prefix, article_suffix),
        )
    }

    #[inline]
    pub fn is_chapter(&self, line: &str) -> bool {
        self.chapter.is_match(line).unwrap_or(false)
    }

    #[inline]
    pub fn is_article(&self, line: &str) -> bool {
        self.article.is_match(line).unwrap_or(false)
    }
}

fn token_pattern(prefix: &str, suffix: &str) -> String {
    format!(
        r"^{}\s*\d+\s*{}",
        fancy_regex::escape(prefix),
        fancy_regex::escape(suffix)
    )
}

fn compile_marker(pattern: &str) -> Result<Regex, ConfigError> {
    Regex::new(pattern).map_err(|_| ConfigError::InvalidMarkerPattern(pattern.to_string()))
}

/// A span of document text with its section and page provenance.
///
/// `chapter` and `article` are the most recently seen marker lines at the
/// time the chunk was closed. Immutable once emitted.
#[derive(Debug, Clone, PartialEq)]
pub struct SectionChunk {
    pub text: String,
    pub chapter: Option<String>,
    pub article: Option<String>,
    pub page_start: u32,
    pub page_end: u32,
}

impl SectionChunk {
    /// Human-readable provenance label, `"chapter / article (p.1-3)"`.
    /// Chunks with neither label use `fallback` in their place.
    #[inline]
    pub fn location(&self, fallback: &str) -> String {
        let mut parts: Vec<&str> = Vec::new();
        if let Some(chapter) = &self.chapter {
            parts.push(chapter);
        }
        if let Some(article) = &self.article {
            parts.push(article);
        }
        let label = if parts.is_empty() {
            fallback.to_string()
        } else {
            parts.join(" / ")
        };
        format!("{} (p.{}-{})", label, self.page_start, self.page_end)
    }
}

/// Accumulator threaded through the structural scan.
///
/// Flush ordering is load-bearing: a chunk is emitted BEFORE the marker that
/// closed it updates `chapter`/`article`, so the closed chunk keeps the
/// labels that were active while its lines accumulated.
#[derive(Debug, Default)]
struct SectionScanner {
    chapter: Option<String>,
    article: Option<String>,
    lines: Vec<String>,
    page_start: Option<u32>,
    page_end: Option<u32>,
    chunks: Vec<SectionChunk>,
}

impl SectionScanner {
    fn line(&mut self, page: u32, raw: &str, markers: &SectionMarkers) {
        let line = raw.trim();
        if line.is_empty() {
            return;
        }

        if markers.is_chapter(line) {
            self.flush();
            self.chapter = Some(line.to_string());
            // The chapter heading itself is not part of any chunk text.
            return;
        }

        if markers.is_article(line) {
            self.flush();
            self.article = Some(line.to_string());
            self.page_start = Some(page);
            self.page_end = Some(page);
            // The article heading opens the new chunk's text.
            self.lines.push(line.to_string());
            return;
        }

        if self.page_start.is_none() {
            self.page_start = Some(page);
        }
        self.page_end = Some(page);
        self.lines.push(line.to_string());
    }

    /// Emit the pending buffer as a chunk. A flush with nothing accumulated
    /// is a no-op and resets nothing.
    fn flush(&mut self) {
        if self.lines.is_empty() {
            return;
        }
        let text = self.lines.join("\n").trim().to_string();
        if text.is_empty() {
            return;
        }
        self.lines.clear();
        let page_start = self.page_start.take().unwrap_or(1);
        let page_end = self.page_end.take().unwrap_or(page_start);
        self.chunks.push(SectionChunk {
            text,
            chapter: self.chapter.clone(),
            article: self.article.clone(),
            page_start,
            page_end,
        });
    }

    fn finish(mut self) -> Vec<SectionChunk> {
        self.flush();
        self.chunks
    }
}

/// Scan pages line by line and split them into section-bounded chunks with
/// chapter/article/page provenance. See [`SectionMarkers`] for the boundary
/// patterns.
#[inline]
pub fn extract_section_chunks(pages: &[Page], markers: &SectionMarkers) -> Vec<SectionChunk> {
    let mut scanner = SectionScanner::default();

    for page in pages {
        for line in page.text.lines() {
            scanner.line(page.number, line, markers);
        }
    }

    let chunks = scanner.finish();
    debug!(
        "Extracted {} section chunks from {} pages",
        chunks.len(),
        pages.len()
    );
    chunks
}

/// Turn section chunks into embedding-ready documents: over-long chunk texts
/// are re-split through the window chunker and every piece is prefixed with
/// a bracketed location line so provenance survives embedding.
#[inline]
pub fn expand_section_chunks(
    chunks: &[SectionChunk],
    window: &WindowConfig,
    fallback_label: &str,
) -> Vec<String> {
    let mut docs = Vec::new();

    for chunk in chunks {
        let location = chunk.location(fallback_label);
        for piece in chunk_text(&chunk.text, window) {
            docs.push(format!("[{}]\n{}", location, piece));
        }
    }

    debug!(
        "Expanded {} section chunks into {} documents",
        chunks.len(),
        docs.len()
    );
    docs
}
