//! Atomic chapter-document writer.

use crate::error::AcquireError;
use crate::request::ChapterRequest;
use scriptura_model::{chapter_path, ChapterDocument};
use std::fs;
use std::path::{Path, PathBuf};

/// Serialize a chapter document to its canonical location under `dest_root`:
/// `<dest>/<VERSION>/<order>_<code>/<code>.<chapter>.json`.
///
/// The document is fully serialized before anything touches disk, written to
/// a sibling `.tmp` path, then renamed into place. A failed write can leave
/// a stray temp file but never a truncated document at the final path.
/// Re-writing an identical document yields byte-identical content.
pub fn write_chapter(
    dest_root: &Path,
    request: &ChapterRequest,
    document: &ChapterDocument,
) -> Result<PathBuf, AcquireError> {
    let path = chapter_path(
        dest_root,
        &request.version,
        request.book.order,
        request.book.code,
        request.chapter,
    );
    let dir = path.parent().expect("chapter path has a parent");
    fs::create_dir_all(dir)?;

    let json = serde_json::to_string_pretty(document)?;

    // Each work unit writes a distinct path, so the temp name cannot collide
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, &json)?;
    fs::rename(&tmp, &path)?;

    tracing::debug!(
        path = %path.display(),
        verses = document.verses.len(),
        "Wrote chapter document"
    );
    Ok(path)
}
