// SPDX-License-Identifier: MIT

//! Slugify a proposal title into a branch name component.

/// Default max length used for `proposals/<slug>` branch names.
pub const BRANCH_SLUG_MAX_LEN: usize = 40;

/// Lowercase, collapse runs of non-`[a-z0-9]` to a single hyphen, trim
/// leading/trailing hyphens, then truncate to `max_len` characters.
///
/// Deliberately simpler than a full title-slugger: no stop-word removal, no
/// word-boundary-aware truncation. `branch_name` only needs to stay short,
/// predictable and collision-wary, not a readable phrase.
pub fn slugify(input: &str, max_len: usize) -> String {
    let lower = input.to_lowercase();

    let mut slug = String::with_capacity(lower.len());
    let mut last_was_hyphen = false;
    for ch in lower.chars() {
        if ch.is_ascii_alphanumeric() {
            slug.push(ch);
            last_was_hyphen = false;
        } else if !last_was_hyphen {
            slug.push('-');
            last_was_hyphen = true;
        }
    }

    let trimmed = slug.trim_matches('-');
    let mut result = trimmed.to_string();

    if result.len() > max_len {
        result.truncate(max_len);
    }

    result
}

/// Build the `proposals/<slug>` branch name for an approved winner.
pub fn branch_name_for(title: &str) -> String {
    format!("proposals/{}", slugify(title, BRANCH_SLUG_MAX_LEN))
}

#[cfg(test)]
#[path = "slug_tests.rs"]
mod tests;
