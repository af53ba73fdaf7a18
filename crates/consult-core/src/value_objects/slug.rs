//! Slugs - URL-safe room ids derived from display names
//!
//! `"Bác sĩ A"` becomes `"bac-si-a"`; collisions probe `-2`, `-3`, ...

use std::collections::HashSet;
use std::sync::atomic::{AtomicI64, Ordering};

use chrono::Utc;

/// Fold a lowercase Vietnamese letter to its base Latin letter
fn fold_accent(c: char) -> Option<char> {
    let base = match c {
        'à' | 'á' | 'ạ' | 'ả' | 'ã' | 'â' | 'ầ' | 'ấ' | 'ậ' | 'ẩ' | 'ẫ' | 'ă' | 'ằ' | 'ắ' | 'ặ'
        | 'ẳ' | 'ẵ' => 'a',
        'è' | 'é' | 'ẹ' | 'ẻ' | 'ẽ' | 'ê' | 'ề' | 'ế' | 'ệ' | 'ể' | 'ễ' => 'e',
        'ì' | 'í' | 'ị' | 'ỉ' | 'ĩ' => 'i',
        'ò' | 'ó' | 'ọ' | 'ỏ' | 'õ' | 'ô' | 'ồ' | 'ố' | 'ộ' | 'ổ' | 'ỗ' | 'ơ' | 'ờ' | 'ớ' | 'ợ'
        | 'ở' | 'ỡ' => 'o',
        'ù' | 'ú' | 'ụ' | 'ủ' | 'ũ' | 'ư' | 'ừ' | 'ứ' | 'ự' | 'ử' | 'ữ' => 'u',
        'ỳ' | 'ý' | 'ỵ' | 'ỷ' | 'ỹ' => 'y',
        'đ' => 'd',
        _ => return None,
    };
    Some(base)
}

/// Transliterate text into a slug; may return an empty string
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());

    for c in text.chars().flat_map(char::to_lowercase) {
        let mapped = if let Some(base) = fold_accent(c) {
            base
        } else if c.is_whitespace() || matches!(c, '.' | ',' | '/') {
            '-'
        } else {
            c
        };

        if !(mapped.is_ascii_lowercase() || mapped.is_ascii_digit() || mapped == '-') {
            continue;
        }
        // collapse hyphen runs as we go
        if mapped == '-' && slug.ends_with('-') {
            continue;
        }
        slug.push(mapped);
    }

    slug.trim_matches('-').to_string()
}

/// Allocates unique room slugs
///
/// The fallback token for names that slugify to nothing is time-derived and
/// strictly increasing within the process.
#[derive(Debug, Default)]
pub struct SlugAllocator {
    last_fallback_ms: AtomicI64,
}

impl SlugAllocator {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            last_fallback_ms: AtomicI64::new(0),
        }
    }

    /// Base slug for a display name (before collision probing)
    pub fn base_slug(&self, display_name: &str) -> String {
        let slug = slugify(display_name);
        if slug.is_empty() {
            self.fallback_token()
        } else {
            slug
        }
    }

    fn fallback_token(&self) -> String {
        let now = Utc::now().timestamp_millis();
        let mut prev = self.last_fallback_ms.load(Ordering::Relaxed);
        loop {
            let next = now.max(prev + 1);
            match self.last_fallback_ms.compare_exchange_weak(
                prev,
                next,
                Ordering::AcqRel,
                Ordering::Relaxed,
            ) {
                Ok(_) => return format!("room-{next}"),
                Err(actual) => prev = actual,
            }
        }
    }

    /// Allocate against a snapshot of existing ids
    pub fn allocate(&self, display_name: &str, existing: &HashSet<String>) -> String {
        self.allocate_with(display_name, |candidate| !existing.contains(candidate))
    }

    /// Allocate by offering candidates to `try_claim` in order
    ///
    /// `try_claim` must atomically check the candidate and register it,
    /// returning `true` once it owns the id. The first claimed candidate is
    /// returned: the base slug, then `base-2`, `base-3`, ...
    pub fn allocate_with(&self, display_name: &str, mut try_claim: impl FnMut(&str) -> bool) -> String {
        let base = self.base_slug(display_name);
        if try_claim(&base) {
            return base;
        }

        let mut suffix: u64 = 2;
        loop {
            let candidate = format!("{base}-{suffix}");
            if try_claim(&candidate) {
                return candidate;
            }
            suffix += 1;
        }
    }
}
