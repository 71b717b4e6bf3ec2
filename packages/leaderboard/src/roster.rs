//! Parsing of raw name-list blobs into participant names.
//!
//! A distribution stores its recipients as one newline-separated text blob,
//! exactly as entered by the organizer. Lines are trimmed and blank lines are
//! dropped; a trailing `\r` from Windows line endings disappears with the
//! trim. Order is preserved and duplicates are kept: a name listed twice in
//! one blob is credited twice.

/// Iterate the participant names contained in a raw name-list blob.
///
/// The iterator borrows the blob, so it is lazy and restartable: calling
/// `names(blob)` again yields the same sequence.
pub fn names(blob: &str) -> impl Iterator<Item = &str> {
    blob.split('\n').map(str::trim).filter(|n| !n.is_empty())
}

/// Returns true if the blob contains at least one participant name.
pub fn has_names(blob: &str) -> bool {
    names(blob).next().is_some()
}
