//! Stable identity derivation from natural keys
//!
//! The same real-world job or paper must map to the same id across runs even
//! when the source HTML shifts its casing or whitespace, so every natural-key
//! field is lower-cased, trimmed, and whitespace-collapsed before slugging.

use sha2::{Digest, Sha256};

/// Longest slug kept verbatim; anything longer is truncated and suffixed
/// with a content hash so distinct long titles stay distinct.
const MAX_SLUG_LEN: usize = 64;

/// Collapse a free-form string into a lower-case hyphen slug.
///
/// Runs of non-alphanumeric characters become a single `-`; leading and
/// trailing separators are dropped.
pub fn slug(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut pending_sep = false;
    for ch in input.trim().chars() {
        if ch.is_alphanumeric() {
            if pending_sep && !out.is_empty() {
                out.push('-');
            }
            pending_sep = false;
            for lower in ch.to_lowercase() {
                out.push(lower);
            }
        } else {
            pending_sep = true;
        }
    }
    out
}

/// Bound a slug's length, keeping determinism via a short hash suffix.
fn bounded(full: String, natural_key: &str) -> String {
    if full.len() <= MAX_SLUG_LEN {
        return full;
    }
    let digest = Sha256::digest(natural_key.as_bytes());
    let short = format!("{:x}", digest);
    let mut cut = MAX_SLUG_LEN;
    while !full.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}-{}", &full[..cut].trim_end_matches('-'), &short[..8])
}

/// Identity for a job posting: organization plus title.
pub fn job_id(organization: &str, title: &str) -> String {
    let key = format!("{} {}", organization, title);
    bounded(format!("{}-{}", slug(organization), slug(title)), &key)
}

/// Identity for a paper: DOI when available, else title + first author + year.
pub fn paper_id(
    doi: Option<&str>,
    title: &str,
    first_author: Option<&str>,
    year: Option<i32>,
) -> String {
    if let Some(doi) = doi {
        let normalized = doi
            .trim()
            .trim_start_matches("https://doi.org/")
            .trim_start_matches("http://doi.org/")
            .trim_start_matches("doi:");
        if !normalized.is_empty() {
            return slug(normalized);
        }
    }
    let mut parts = vec![slug(title)];
    if let Some(author) = first_author {
        let s = slug(author);
        if !s.is_empty() {
            parts.push(s);
        }
    }
    if let Some(year) = year {
        parts.push(year.to_string());
    }
    let key = parts.join(" ");
    bounded(parts.join("-"), &key)
}
