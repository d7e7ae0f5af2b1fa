//! Filename sanitization for downloaded files.
//!
//! Every downloaded file is named `[a-z0-9_]+.pdf`, derived deterministically
//! from the file reference's display name (or its URL when the name is blank).

use crate::api::FileRef;

/// Extension appended to every output file, including the dot.
pub const OUTPUT_EXTENSION: &str = ".pdf";

/// Extension word preceded by the separator, stripped to avoid `report_pdf.pdf`.
const EXTENSION_ARTIFACT: &str = "_pdf";

/// Name used when the input contains no usable characters.
const FALLBACK_STEM: &str = "document";

/// Converts an arbitrary name or URL into a filesystem-safe `.pdf` filename.
///
/// Lowercases, maps everything outside `[a-z0-9]` to `_`, collapses and trims
/// separators, strips `_pdf` artifacts, then appends `.pdf`. The function is
/// pure and idempotent: `sanitize_filename(&sanitize_filename(x)) == sanitize_filename(x)`.
#[must_use]
pub fn sanitize_filename(raw: &str) -> String {
    let mut stem = String::with_capacity(raw.len());
    let mut prev_sep = true;
    for ch in raw.chars().flat_map(char::to_lowercase) {
        if ch.is_ascii_lowercase() || ch.is_ascii_digit() {
            stem.push(ch);
            prev_sep = false;
        } else if !prev_sep {
            stem.push('_');
            prev_sep = true;
        }
    }

    // Removing one artifact can expose another (e.g. `x_p_pdfdf`).
    while stem.contains(EXTENSION_ARTIFACT) {
        stem = stem.replace(EXTENSION_ARTIFACT, "");
    }
    let stem = stem.trim_matches('_');

    if stem.is_empty() {
        format!("{FALLBACK_STEM}{OUTPUT_EXTENSION}")
    } else {
        format!("{stem}{OUTPUT_EXTENSION}")
    }
}

/// Picks the output filename for a file reference.
#[must_use]
pub fn filename_for(file: &FileRef) -> String {
    if file.name.trim().is_empty() {
        sanitize_filename(&file.location)
    } else {
        sanitize_filename(&file.name)
    }
}
