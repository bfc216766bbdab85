//! Extraction options and configuration.

use std::ops::RangeInclusive;

/// Options for extracting page text from PDF documents.
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// Error handling mode for per-page failures
    pub error_mode: ErrorMode,

    /// Which pages to extract
    pub pages: PageSelection,

    /// Whether to extract several documents in parallel
    pub parallel: bool,
}

impl ExtractOptions {
    /// Create new extract options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set error mode.
    pub fn with_error_mode(mut self, mode: ErrorMode) -> Self {
        self.error_mode = mode;
        self
    }

    /// Fail the whole document on the first page error.
    pub fn strict(mut self) -> Self {
        self.error_mode = ErrorMode::Strict;
        self
    }

    /// Set page selection.
    pub fn with_pages(mut self, pages: PageSelection) -> Self {
        self.pages = pages;
        self
    }

    /// Enable or disable parallel processing.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Disable parallel processing.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            error_mode: ErrorMode::Lenient,
            pages: PageSelection::All,
            parallel: true,
        }
    }
}

/// Error handling mode during extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorMode {
    /// Fail the document on any page error
    Strict,
    /// Skip unreadable pages and continue
    #[default]
    Lenient,
}

/// Most pages a comma-separated selection may list.
pub const MAX_LISTED_PAGES: u32 = 100_000;

/// Page selection for extraction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PageSelection {
    /// All pages
    #[default]
    All,
    /// A range of pages (inclusive, 1-indexed)
    Range(RangeInclusive<u32>),
    /// Specific pages (1-indexed)
    Pages(Vec<u32>),
}

impl PageSelection {
    /// Check if a page number should be included.
    pub fn includes(&self, page: u32) -> bool {
        match self {
            PageSelection::All => true,
            PageSelection::Range(range) => range.contains(&page),
            PageSelection::Pages(pages) => pages.contains(&page),
        }
    }

    /// Highest page number the selection names explicitly.
    pub fn last_page(&self) -> Option<u32> {
        match self {
            PageSelection::All => None,
            PageSelection::Range(range) => Some(*range.end()),
            PageSelection::Pages(pages) => pages.iter().copied().max(),
        }
    }

    /// Parse a page selection string (e.g., "1-10", "1,3,5,7-10").
    ///
    /// A list naming more than [`MAX_LISTED_PAGES`] pages is rejected; a
    /// single range has no such limit.
    pub fn parse(s: &str) -> Result<Self, String> {
        let s = s.trim();

        if s.is_empty() || s.eq_ignore_ascii_case("all") {
            return Ok(PageSelection::All);
        }

        if let Some((start, end)) = s.split_once('-') {
            if !start.contains(',') && !end.contains(',') {
                let (start, end) = parse_bounds(start, end)?;
                return Ok(PageSelection::Range(start..=end));
            }
        }

        let mut pages = Vec::new();
        let mut listed: u64 = 0;
        for part in s.split(',') {
            let part = part.trim();
            let (start, end) = match part.split_once('-') {
                Some((start, end)) => parse_bounds(start, end)?,
                None => {
                    let page = parse_page(part)?;
                    (page, page)
                }
            };
            listed += u64::from(end - start) + 1;
            if listed > u64::from(MAX_LISTED_PAGES) {
                return Err(format!("Page list too long: more than {MAX_LISTED_PAGES} pages"));
            }
            pages.extend(start..=end);
        }

        pages.sort_unstable();
        pages.dedup();
        Ok(PageSelection::Pages(pages))
    }
}

fn parse_page(s: &str) -> Result<u32, String> {
    match s.trim().parse::<u32>() {
        Ok(0) => Err("Page numbers start at 1".to_string()),
        Ok(p) => Ok(p),
        Err(_) => Err(format!("Invalid page number: {}", s.trim())),
    }
}

fn parse_bounds(start: &str, end: &str) -> Result<(u32, u32), String> {
    let start = parse_page(start)?;
    let end = parse_page(end)?;
    if start > end {
        return Err(format!("Invalid page range: {start}-{end}"));
    }
    Ok((start, end))
}
