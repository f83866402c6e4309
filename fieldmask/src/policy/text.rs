//! Character-level masking primitives shared by every masking rule.
//!
//! Everything here is a pure string transformation: no traversal and no
//! decisions about which field is sensitive. Lengths are counted in Unicode
//! scalar values, so a CJK character counts as one position.

/// Character substituted for every hidden position.
pub const MASK_CHAR: char = '*';

/// First and last code points of the CJK Unified Ideographs block used to
/// pick the name-masking branch.
pub const CJK_RANGE: std::ops::RangeInclusive<char> = '\u{4E00}'..='\u{9FA5}';

/// Keeps a leading and a trailing window visible and masks what lies between.
///
/// Position `i` of an `n`-character value is masked when
/// `visible_prefix <= i < n - visible_suffix`. When the two windows cover the
/// whole value nothing is masked. The output always has as many characters as
/// the input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KeepConfig {
    /// Number of leading characters to keep visible.
    visible_prefix: usize,
    /// Number of trailing characters to keep visible.
    visible_suffix: usize,
    /// Symbol used to mask the middle.
    mask_char: char,
}

impl KeepConfig {
    /// Keeps `visible_prefix` leading and `visible_suffix` trailing characters.
    #[must_use]
    pub fn both(visible_prefix: usize, visible_suffix: usize) -> Self {
        Self {
            visible_prefix,
            visible_suffix,
            mask_char: MASK_CHAR,
        }
    }

    /// Splits a value of `len` characters into thirds.
    ///
    /// Lengths divisible by three show `len / 3` characters on each side.
    /// Otherwise the leading window gets one extra character.
    #[must_use]
    pub fn thirds(len: usize) -> Self {
        let third = len / 3;
        if len % 3 == 0 {
            Self::both(third, third)
        } else {
            Self::both(third + 1, third)
        }
    }

    /// Uses a specific masking character.
    #[must_use]
    pub fn with_mask_char(mut self, mask_char: char) -> Self {
        self.mask_char = mask_char;
        self
    }

    pub fn visible_prefix(&self) -> usize {
        self.visible_prefix
    }

    pub fn visible_suffix(&self) -> usize {
        self.visible_suffix
    }

    /// Applies the window to `value`. Empty input yields an empty string.
    #[must_use]
    pub fn apply_to(&self, value: &str) -> String {
        let mut chars: Vec<char> = value.chars().collect();
        let total = chars.len();

        if self.visible_prefix.saturating_add(self.visible_suffix) >= total {
            return value.to_string();
        }

        for ch in &mut chars[self.visible_prefix..(total - self.visible_suffix)] {
            *ch = self.mask_char;
        }
        chars.into_iter().collect()
    }
}

/// Masks every character outside the leading `first` and trailing `last` ones.
#[must_use]
pub fn hide_char(value: &str, first: usize, last: usize) -> String {
    KeepConfig::both(first, last).apply_to(value)
}

/// Returns `true` for characters in [`CJK_RANGE`].
#[must_use]
pub fn is_cjk(ch: char) -> bool {
    CJK_RANGE.contains(&ch)
}
