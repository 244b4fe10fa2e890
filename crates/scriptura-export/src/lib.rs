//! Reshaping stage: folds a tree of on-disk chapter documents into one
//! consolidated FreeShow export file per version.
//!
//! Consumes the acquisition pipeline's path contract
//! (`<root>/<VERSION>/<order>_<code>/<code>.<chapter>.json`) and the
//! ChapterDocument invariants; a version that violates them is skipped
//! with a warning, never aborting the other versions.

use anyhow::{Context, Result};
use regex::Regex;
use scriptura_model::{book_by_code, ChapterDocument};
use std::fs;
use std::path::{Path, PathBuf};

pub mod format;

pub use format::{ExportBible, ExportBook, ExportChapter, ExportMetadata, ExportVerse};

/// Detect version directories under `root`: any subdirectory that contains
/// a Genesis book directory (`NN_gen`) is treated as a version tree.
pub fn detect_version_dirs(root: &Path) -> Result<Vec<PathBuf>> {
    let gen_dir = Regex::new(r"^\d{2}_gen$").unwrap();

    let mut versions = Vec::new();
    for entry in fs::read_dir(root)
        .with_context(|| format!("Failed to read export root {}", root.display()))?
    {
        let dir = entry?.path();
        if !dir.is_dir() {
            continue;
        }
        let has_genesis = fs::read_dir(&dir)?.any(|sub| {
            sub.ok()
                .filter(|s| s.path().is_dir())
                .and_then(|s| s.file_name().into_string().ok())
                .is_some_and(|name| gen_dir.is_match(&name))
        });
        if has_genesis {
            versions.push(dir);
        }
    }
    versions.sort();
    Ok(versions)
}

/// Fold one version directory into its export document.
///
/// Books and chapters come back sorted in canonical order; chapters with no
/// usable verses and books with no chapters are skipped with a warning.
pub fn convert_version(version_dir: &Path) -> Result<ExportBible> {
    let book_dir = Regex::new(r"^(\d{2})_([a-z0-9]+)$").unwrap();

    let rev = version_dir
        .file_name()
        .and_then(|n| n.to_str())
        .map(str::to_uppercase)
        .with_context(|| format!("Bad version directory name {}", version_dir.display()))?;

    let mut books = Vec::new();
    let mut book_dirs: Vec<PathBuf> = fs::read_dir(version_dir)?
        .filter_map(|e| e.ok().map(|e| e.path()))
        .filter(|p| p.is_dir())
        .collect();
    book_dirs.sort();

    for dir in book_dirs {
        let Some(name) = dir.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        let Some(captures) = book_dir.captures(name) else {
            continue;
        };
        let order: u32 = captures[1].parse().expect("two digits");
        let code = captures[2].to_string();
        let book_name = book_by_code(&code)
            .map(|b| b.name.to_string())
            .unwrap_or_else(|| capitalize(&code));

        let chapters = convert_book_dir(&dir, &code)?;
        if chapters.is_empty() {
            tracing::warn!(book = %book_name, version = %rev, "No usable chapters, skipping book");
            continue;
        }
        books.push(ExportBook {
            number: order,
            name: book_name,
            chapters,
        });
    }

    books.sort_by_key(|b| b.number);
    Ok(ExportBible {
        name: format!("Bible {rev}"),
        metadata: ExportMetadata {
            source: "scriptura".to_string(),
            revision: rev,
        },
        books,
    })
}

fn convert_book_dir(dir: &Path, code: &str) -> Result<Vec<ExportChapter>> {
    let chapter_file = Regex::new(&format!(r"^{}\.(\d+)\.json$", regex::escape(code))).unwrap();

    let mut files: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|e| e.ok().map(|e| e.path()))
        .collect();
    files.sort();

    let mut chapters = Vec::new();
    for file in files {
        let Some(name) = file.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        let Some(captures) = chapter_file.captures(name) else {
            continue;
        };
        // The digit run can overflow u32 on a stray file
        let Ok(number) = captures[1].parse::<u32>() else {
            tracing::warn!(path = %file.display(), "Chapter number out of range, skipping file");
            continue;
        };

        let contents = fs::read_to_string(&file)?;
        let document: ChapterDocument = match serde_json::from_str(&contents) {
            Ok(doc) => doc,
            Err(e) => {
                tracing::warn!(path = %file.display(), error = %e, "Unreadable chapter document, skipping");
                continue;
            }
        };

        let verses = convert_verses(&document, &file);
        if verses.is_empty() {
            tracing::warn!(path = %file.display(), "No usable verses, skipping chapter");
            continue;
        }
        chapters.push(ExportChapter { number, verses });
    }
    chapters.sort_by_key(|c| c.number);
    Ok(chapters)
}

fn convert_verses(document: &ChapterDocument, path: &Path) -> Vec<ExportVerse> {
    let mut verses = Vec::new();
    for verse in &document.verses {
        // "3a" and "4-5" count as 3 and 4; labels with no leading digits
        // cannot be numbered in this format and are skipped
        let digits: String = verse
            .verse
            .chars()
            .take_while(|c| c.is_ascii_digit())
            .collect();
        let Ok(number) = digits.parse::<u32>() else {
            tracing::warn!(
                path = %path.display(),
                label = %verse.verse,
                "Verse label has no leading number, skipping verse"
            );
            continue;
        };

        let text = if verse.readable_text.trim().is_empty() {
            verse.text.trim()
        } else {
            verse.readable_text.trim()
        };
        verses.push(ExportVerse {
            number,
            text: text.to_string(),
        });
    }
    verses
}

fn capitalize(code: &str) -> String {
    let mut chars = code.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Export every requested version under `root` into `<outdir>/<VERSION>.fsb.json`.
///
/// With an empty `versions` filter, all detected versions are exported.
/// Returns the paths written. A version that fails to convert is reported
/// and skipped; the others still export.
pub fn export_tree(root: &Path, outdir: &Path, versions: &[String]) -> Result<Vec<PathBuf>> {
    let mut version_dirs = detect_version_dirs(root)?;

    if !versions.is_empty() {
        let wanted: Vec<String> = versions.iter().map(|v| v.to_uppercase()).collect();
        for want in &wanted {
            let found = version_dirs
                .iter()
                .any(|d| d.file_name().and_then(|n| n.to_str()) == Some(want.as_str()));
            if !found {
                tracing::warn!(version = %want, "Requested version not found under export root");
            }
        }
        version_dirs.retain(|d| {
            d.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|name| wanted.iter().any(|w| w == name))
        });
    }

    if version_dirs.is_empty() {
        anyhow::bail!("No Bible versions found under {}", root.display());
    }

    fs::create_dir_all(outdir)?;
    tracing::info!(versions = version_dirs.len(), outdir = %outdir.display(), "Exporting");

    let mut written = Vec::new();
    for dir in version_dirs {
        let bible = match convert_version(&dir) {
            Ok(bible) => bible,
            Err(e) => {
                tracing::warn!(version = %dir.display(), error = %e, "Failed to convert version, skipping");
                continue;
            }
        };
        if bible.books.is_empty() {
            tracing::warn!(version = %bible.metadata.revision, "No book data, skipping export");
            continue;
        }

        let verse_count: usize = bible
            .books
            .iter()
            .flat_map(|b| &b.chapters)
            .map(|c| c.verses.len())
            .sum();
        let outfile = outdir.join(format!("{}.fsb.json", bible.metadata.revision));
        let json = serde_json::to_string_pretty(&bible)?;
        fs::write(&outfile, &json)?;
        tracing::info!(
            path = %outfile.display(),
            books = bible.books.len(),
            verses = verse_count,
            "Wrote export"
        );
        written.push(outfile);
    }
    Ok(written)
}
