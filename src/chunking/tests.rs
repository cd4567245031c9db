use super::*;
use crate::config::ConfigError;
use crate::source::Page;

fn markers() -> SectionMarkers {
    SectionMarkers::from_tokens("Chapter", "", "Article", "").expect("valid marker tokens")
}

fn page(number: u32, text: &str) -> Page {
    Page {
        number,
        text: text.to_string(),
    }
}

#[test]
fn window_rejects_zero_chunk_size() {
    let err = WindowConfig::new(0, 0).expect_err("zero chunk size must fail");
    assert!(matches!(err, ConfigError::InvalidChunkSize(0)));
}

#[test]
fn window_rejects_overlap_not_smaller_than_size() {
    assert!(matches!(
        WindowConfig::new(4, 4),
        Err(ConfigError::OverlapTooLarge { .. })
    ));
    assert!(matches!(
        WindowConfig::new(4, 7),
        Err(ConfigError::OverlapTooLarge { .. })
    ));
}

#[test]
fn window_offsets_for_length_ten() {
    // length 10, chunk_size 4, overlap 1 -> windows at offsets 0, 3, 6, 9
    let config = WindowConfig::new(4, 1).expect("valid config");
    let chunks: Vec<&str> = chunk_text("0123456789", &config).collect();

    assert_eq!(chunks, vec!["0123", "3456", "6789", "9"]);
}

#[test]
fn window_short_text_is_single_chunk() {
    let config = WindowConfig::new(300, 50).expect("valid config");
    let chunks: Vec<&str> = chunk_text("short text", &config).collect();

    assert_eq!(chunks, vec!["short text"]);
}

#[test]
fn window_empty_text_yields_nothing() {
    let config = WindowConfig::new(4, 1).expect("valid config");
    assert_eq!(chunk_text("", &config).count(), 0);
}

#[test]
fn window_covers_every_character() {
    let text = "The quick brown fox jumps over the lazy dog, twice over.";
    let config = WindowConfig::new(10, 3).expect("valid config");

    let chunks: Vec<&str> = chunk_text(text, &config).collect();
    assert!(!chunks.is_empty());

    // Dropping each chunk's overlap with its predecessor reconstructs the
    // original text exactly.
    let mut rebuilt = String::new();
    rebuilt.push_str(chunks[0]);
    for chunk in &chunks[1..] {
        let skip: usize = chunk.chars().take(config.overlap()).map(char::len_utf8).sum();
        rebuilt.push_str(&chunk[skip.min(chunk.len())..]);
    }
    assert_eq!(rebuilt, text);
}

#[test]
fn window_is_repeatable() {
    let config = WindowConfig::new(7, 2).expect("valid config");
    let text = "determinism matters for reproducible retrieval tests";

    let first: Vec<&str> = chunk_text(text, &config).collect();
    let second: Vec<&str> = chunk_text(text, &config).collect();
    assert_eq!(first, second);
}

#[test]
fn window_counts_characters_not_bytes() {
    // Multibyte text must never split a code point.
    let text = "제1조 목적과 범위를 정한다";
    let config = WindowConfig::new(5, 2).expect("valid config");

    let chunks: Vec<&str> = chunk_text(text, &config).collect();
    assert!(chunks.iter().all(|c| c.chars().count() <= 5));
    assert_eq!(chunks[0], "제1조 목");
}

#[test]
fn structural_basic_article_split() {
    let pages = vec![page(
        1,
        "Chapter 1 General Provisions\nArticle 1 Purpose\nThis establishes the purpose.\nArticle 2 Scope\nThis defines the scope.",
    )];

    let chunks = extract_section_chunks(&pages, &markers());

    assert_eq!(chunks.len(), 2);
    assert_eq!(chunks[0].text, "Article 1 Purpose\nThis establishes the purpose.");
    assert_eq!(chunks[0].chapter.as_deref(), Some("Chapter 1 General Provisions"));
    assert_eq!(chunks[0].article.as_deref(), Some("Article 1 Purpose"));
    assert_eq!(chunks[1].article.as_deref(), Some("Article 2 Scope"));
}

#[test]
fn structural_chapter_line_is_not_chunk_text() {
    let pages = vec![page(1, "Chapter 1 General\nArticle 1 Purpose\nBody line.")];

    let chunks = extract_section_chunks(&pages, &markers());

    assert_eq!(chunks.len(), 1);
    assert!(!chunks[0].text.contains("Chapter 1"));
    assert!(chunks[0].text.starts_with("Article 1"));
}

#[test]
fn structural_flush_keeps_labels_active_while_accumulating() {
    // Lines gathered under chapter 1 are flushed by the chapter 2 marker and
    // must keep the OLD chapter label; the new label applies only to text
    // gathered afterwards.
    let pages = vec![page(
        1,
        "Chapter 1 Old\nArticle 1 First\nUnder the old chapter.\nChapter 2 New\nArticle 2 Second\nUnder the new chapter.",
    )];

    let chunks = extract_section_chunks(&pages, &markers());

    assert_eq!(chunks.len(), 2);
    assert_eq!(chunks[0].chapter.as_deref(), Some("Chapter 1 Old"));
    assert_eq!(chunks[1].chapter.as_deref(), Some("Chapter 2 New"));
}

#[test]
fn structural_chapter_does_not_reset_article() {
    // A chapter heading with no intervening article leaves the previous
    // article label in effect for the following text.
    let pages = vec![page(
        1,
        "Article 1 Carried\nBefore the break.\nChapter 2 Interlude\nAfter the break.",
    )];

    let chunks = extract_section_chunks(&pages, &markers());

    assert_eq!(chunks.len(), 2);
    assert_eq!(chunks[1].text, "After the break.");
    assert_eq!(chunks[1].chapter.as_deref(), Some("Chapter 2 Interlude"));
    assert_eq!(chunks[1].article.as_deref(), Some("Article 1 Carried"));
}

#[test]
fn structural_blank_lines_are_skipped() {
    let pages = vec![page(1, "Article 1 Sparse\n\n   \nOnly real line.\n\n")];

    let chunks = extract_section_chunks(&pages, &markers());

    assert_eq!(chunks.len(), 1);
    assert_eq!(chunks[0].text, "Article 1 Sparse\nOnly real line.");
}

#[test]
fn structural_page_range_spans_pages() {
    let pages = vec![
        page(1, "Article 1 Long\nStarts on page one."),
        page(2, "Continues on page two."),
        page(3, "Article 2 Next\nAll on page three."),
    ];

    let chunks = extract_section_chunks(&pages, &markers());

    assert_eq!(chunks.len(), 2);
    assert_eq!((chunks[0].page_start, chunks[0].page_end), (1, 2));
    assert_eq!((chunks[1].page_start, chunks[1].page_end), (3, 3));
    for chunk in &chunks {
        assert!(chunk.page_start <= chunk.page_end);
    }
}

#[test]
fn structural_text_before_any_marker_has_no_labels() {
    let pages = vec![page(1, "Preamble line.\nArticle 1 Start\nBody.")];

    let chunks = extract_section_chunks(&pages, &markers());

    assert_eq!(chunks.len(), 2);
    assert_eq!(chunks[0].text, "Preamble line.");
    assert_eq!(chunks[0].chapter, None);
    assert_eq!(chunks[0].article, None);
}

#[test]
fn structural_empty_pages_yield_nothing() {
    let pages = vec![page(1, ""), page(2, "\n\n")];
    assert!(extract_section_chunks(&pages, &markers()).is_empty());
}

#[test]
fn structural_korean_marker_tokens() {
    let korean = SectionMarkers::from_tokens("제", "장", "제", "조").expect("valid marker tokens");
    let pages = vec![page(1, "제 1 장 총칙\n제 1 조 목적\n이 규정의 목적을 정한다.")];

    let chunks = extract_section_chunks(&pages, &korean);

    assert_eq!(chunks.len(), 1);
    assert_eq!(chunks[0].chapter.as_deref(), Some("제 1 장 총칙"));
    assert!(chunks[0].text.starts_with("제 1 조 목적"));
}

#[test]
fn marker_pattern_rejects_invalid_regex() {
    assert!(matches!(
        SectionMarkers::new(r"^Chapter (\d+", r"^Article \d+"),
        Err(ConfigError::InvalidMarkerPattern(_))
    ));
}

#[test]
fn location_label_formats() {
    let chunk = SectionChunk {
        text: "body".to_string(),
        chapter: Some("Chapter 1 General".to_string()),
        article: Some("Article 3 Terms".to_string()),
        page_start: 2,
        page_end: 4,
    };
    assert_eq!(
        chunk.location("document"),
        "Chapter 1 General / Article 3 Terms (p.2-4)"
    );

    let bare = SectionChunk {
        text: "body".to_string(),
        chapter: None,
        article: None,
        page_start: 1,
        page_end: 1,
    };
    assert_eq!(bare.location("document"), "document (p.1-1)");
}

#[test]
fn expand_prefixes_location_and_resplits() {
    let chunks = vec![SectionChunk {
        text: "a".repeat(10),
        chapter: None,
        article: Some("Article 1 Long".to_string()),
        page_start: 1,
        page_end: 1,
    }];
    let window = WindowConfig::new(4, 1).expect("valid config");

    let docs = expand_section_chunks(&chunks, &window, "document");

    assert_eq!(docs.len(), 4);
    for doc in &docs {
        assert!(doc.starts_with("[Article 1 Long (p.1-1)]\n"));
    }
}
