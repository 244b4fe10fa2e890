//! Destination-tree verification.
//!
//! Walks `<root>/<VERSION>/<order>_<code>/<code>.<chapter>.json` and checks
//! every chapter document against the invariants the downstream export
//! stage depends on: parseability, path/field consistency, non-empty
//! verses. All issues are collected; the caller decides whether to fail.

use anyhow::{Context, Result};
use regex::Regex;
use scriptura_model::{book_by_code, ChapterDocument};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TreeIssue {
    #[error("{path}: does not parse as a chapter document: {reason}")]
    Unparseable { path: PathBuf, reason: String },

    #[error("{path}: book '{found}' does not match directory code '{expected}'")]
    BookMismatch {
        path: PathBuf,
        found: String,
        expected: String,
    },

    #[error("{path}: rev '{found}' does not match version directory '{expected}'")]
    RevisionMismatch {
        path: PathBuf,
        found: String,
        expected: String,
    },

    #[error("{path}: chapter '{found}' does not match file name chapter {expected}")]
    ChapterMismatch {
        path: PathBuf,
        found: String,
        expected: u32,
    },

    #[error("{path}: document has no verses")]
    EmptyVerses { path: PathBuf },

    #[error("{path}: verse '{verse}' has an empty text field")]
    EmptyVerseText { path: PathBuf, verse: String },

    #[error("{path}: file name does not follow <code>.<NNN>.json")]
    UnexpectedFile { path: PathBuf },

    #[error("{path}: order prefix {found:02} does not match catalog order {expected:02} for '{code}'")]
    OrderMismatch {
        path: PathBuf,
        code: String,
        found: u32,
        expected: u32,
    },

    #[error("{path}: directory code '{code}' is not a catalog book code")]
    UnknownBookCode { path: PathBuf, code: String },
}

/// Verify every chapter document under `root`. Filesystem errors abort;
/// contract violations are logged and collected.
pub fn verify_tree(root: &Path) -> Result<Vec<TreeIssue>> {
    let book_dir = Regex::new(r"^(\d{2})_([a-z0-9]+)$").unwrap();
    let chapter_file = Regex::new(r"^([a-z0-9]+)\.(\d{3})\.json$").unwrap();

    let mut issues = Vec::new();
    let mut documents = 0usize;

    for version_entry in fs::read_dir(root)
        .with_context(|| format!("Failed to read tree root {}", root.display()))?
    {
        let version_dir = version_entry?.path();
        if !version_dir.is_dir() {
            continue;
        }
        let Some(version) = version_dir.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        let version = version.to_string();

        for book_entry in fs::read_dir(&version_dir)? {
            let dir = book_entry?.path();
            if !dir.is_dir() {
                continue;
            }
            let Some(name) = dir.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            let Some(captures) = book_dir.captures(name) else {
                continue;
            };
            let order: u32 = captures[1].parse().expect("two digits");
            let code = captures[2].to_string();

            // The order prefix is what the export stage numbers books by
            match book_by_code(&code) {
                Some(book) if book.order != order => {
                    issues.push(TreeIssue::OrderMismatch {
                        path: dir.clone(),
                        code: code.clone(),
                        found: order,
                        expected: book.order,
                    });
                }
                None => {
                    issues.push(TreeIssue::UnknownBookCode {
                        path: dir.clone(),
                        code: code.clone(),
                    });
                }
                Some(_) => {}
            }

            for file_entry in fs::read_dir(&dir)? {
                let file = file_entry?.path();
                if !file.is_file() {
                    continue;
                }
                let Some(file_name) = file.file_name().and_then(|n| n.to_str()) else {
                    continue;
                };
                let Some(captures) = chapter_file.captures(file_name) else {
                    issues.push(TreeIssue::UnexpectedFile { path: file });
                    continue;
                };
                if &captures[1] != code {
                    issues.push(TreeIssue::UnexpectedFile { path: file });
                    continue;
                }
                let chapter: u32 = captures[2].parse().expect("three digits");

                documents += 1;
                verify_document(&file, &version, &code, chapter, &mut issues);
            }
        }
    }

    for issue in &issues {
        tracing::warn!("{issue}");
    }
    tracing::info!(
        documents,
        issues = issues.len(),
        root = %root.display(),
        "Verified chapter tree"
    );
    Ok(issues)
}

fn verify_document(
    path: &Path,
    version: &str,
    code: &str,
    chapter: u32,
    issues: &mut Vec<TreeIssue>,
) {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) => {
            issues.push(TreeIssue::Unparseable {
                path: path.to_path_buf(),
                reason: e.to_string(),
            });
            return;
        }
    };
    let document: ChapterDocument = match serde_json::from_str(&contents) {
        Ok(document) => document,
        Err(e) => {
            issues.push(TreeIssue::Unparseable {
                path: path.to_path_buf(),
                reason: e.to_string(),
            });
            return;
        }
    };

    if document.book != code.to_uppercase() {
        issues.push(TreeIssue::BookMismatch {
            path: path.to_path_buf(),
            found: document.book.clone(),
            expected: code.to_string(),
        });
    }
    if document.rev != version {
        issues.push(TreeIssue::RevisionMismatch {
            path: path.to_path_buf(),
            found: document.rev.clone(),
            expected: version.to_string(),
        });
    }
    if document.chapter != chapter.to_string() {
        issues.push(TreeIssue::ChapterMismatch {
            path: path.to_path_buf(),
            found: document.chapter.clone(),
            expected: chapter,
        });
    }
    if document.verses.is_empty() {
        issues.push(TreeIssue::EmptyVerses {
            path: path.to_path_buf(),
        });
    }
    for verse in &document.verses {
        if verse.text.trim().is_empty() || verse.readable_text.trim().is_empty() {
            issues.push(TreeIssue::EmptyVerseText {
                path: path.to_path_buf(),
                verse: verse.verse.clone(),
            });
        }
    }
}
