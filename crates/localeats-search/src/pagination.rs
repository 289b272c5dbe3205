//! Offset-based pagination over upstream results.
//!
//! The upstream returns at most [`PAGE_SIZE`] businesses per request and a
//! `total` hit count. Page `n` (1-indexed) is fetched with
//! `offset = (n - 1) * 50`.
//!
//! ## Page-jump input
//!
//! The jump field accepts free text. Input is read the way a user means it:
//! `"3"`, `" 3 "`, `"3.9"` and `"-3"` all mean page 3. `"0"` and blank
//! input mean page 1.
//! Anything past the last page is rejected rather than clamped so the field
//! can show an error.

use localeats_core::{MAX_PAGE, PAGE_SIZE};

use crate::error::JumpError;

/// Pages needed to show `total_hits` results. Zero hits need zero pages.
#[must_use]
pub fn required_pages(total_hits: u32) -> u32 {
    total_hits.div_ceil(PAGE_SIZE)
}

/// Offset of the first result on a 1-indexed page, clamped to
/// [`MAX_PAGE`].
#[must_use]
pub fn offset_for_page(page: u32) -> u32 {
    (page.clamp(1, MAX_PAGE) - 1) * PAGE_SIZE
}

/// Validates a page-jump entry against the number of available pages.
///
/// # Errors
///
/// - [`JumpError::NotANumber`] if `raw` does not parse as a number
///   (`NaN` included).
/// - [`JumpError::OutOfRange`] if the page is past `required_pages`.
pub fn validate_jump(required_pages: u32, raw: &str) -> Result<u32, JumpError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(1);
    }
    let value = trimmed
        .parse::<f64>()
        .ok()
        .filter(|v| !v.is_nan())
        .ok_or_else(|| JumpError::NotANumber {
            input: raw.to_owned(),
        })?;

    let page = value.abs().trunc();
    if page < 1.0 {
        return Ok(1);
    }
    if page > f64::from(required_pages) {
        return Err(JumpError::OutOfRange { required_pages });
    }

    // Bounded by `required_pages`, so the cast is exact.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let page = page as u32;
    Ok(page)
}

/// Where the user is within a result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationPlan {
    /// Always at least 1.
    pub required_pages: u32,
    /// 1-indexed.
    pub current_page: u32,
}

impl PaginationPlan {
    /// Plans pagination for a search that started at `offset`.
    ///
    /// Returns `None` for zero hits, where no pagination is shown at all.
    #[must_use]
    pub fn new(total_hits: u32, offset: u32) -> Option<Self> {
        let required_pages = required_pages(total_hits);
        if required_pages == 0 {
            return None;
        }
        Some(Self {
            required_pages,
            current_page: (offset / PAGE_SIZE + 1).min(required_pages),
        })
    }

    /// Page buttons are only worth rendering with two or more pages.
    #[must_use]
    pub fn shows_controls(&self) -> bool {
        self.required_pages >= 2
    }

    /// The free-text jump field only appears with more than two pages.
    #[must_use]
    pub fn shows_jump_field(&self) -> bool {
        self.required_pages > 2
    }

    #[must_use]
    pub fn validate_jump(&self, raw: &str) -> Result<u32, JumpError> {
        validate_jump(self.required_pages, raw)
    }
}
