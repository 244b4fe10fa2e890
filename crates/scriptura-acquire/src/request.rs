//! Request expansion: one user request becomes a list of work units.

use scriptura_model::{all_books, resolve_book, resolve_chapters, BookEntry};
use scriptura_model::{RangeError, UnknownBookError};
use thiserror::Error;

/// One (version, book, chapter) acquisition task. Immutable once expanded;
/// consumed exactly once by the Fetch→Extract→Write pipeline.
#[derive(Debug, Clone)]
pub struct ChapterRequest {
    /// Uppercase version code, e.g. `RVR60`.
    pub version: String,
    pub book: &'static BookEntry,
    pub chapter: u32,
}

impl std::fmt::Display for ChapterRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} ({})", self.book.name, self.chapter, self.version)
    }
}

/// The user-facing request: a version, optionally narrowed to one book and
/// a chapter selector. No book means the whole Bible.
#[derive(Debug, Clone)]
pub struct AcquirePlan {
    pub version: String,
    pub book: Option<String>,
    pub chapters: String,
}

impl AcquirePlan {
    pub fn new(version: &str, book: Option<&str>, chapters: &str) -> Self {
        Self {
            version: version.to_string(),
            book: book.map(str::to_string),
            chapters: chapters.to_string(),
        }
    }
}

/// Request-shape errors. Fatal: surfaced before any work unit is scheduled.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PlanError {
    #[error(transparent)]
    UnknownBook(#[from] UnknownBookError),

    #[error(transparent)]
    Range(#[from] RangeError),
}

/// Expand a plan into the full ordered list of work units.
///
/// With a book, the selector is resolved against that book's chapter count.
/// Without one, every chapter of all 66 books is selected; a non-`all`
/// selector makes no sense in that mode and is ignored with a warning.
pub fn expand(plan: &AcquirePlan) -> Result<Vec<ChapterRequest>, PlanError> {
    let version = plan.version.to_uppercase();

    match plan.book.as_deref() {
        Some(name) => {
            let book = resolve_book(name)?;
            let chapters = resolve_chapters(&plan.chapters, book.chapters)?;
            Ok(chapters
                .into_iter()
                .map(|chapter| ChapterRequest {
                    version: version.clone(),
                    book,
                    chapter,
                })
                .collect())
        }
        None => {
            if !plan.chapters.trim().eq_ignore_ascii_case("all") {
                tracing::warn!(
                    selector = %plan.chapters,
                    "Chapter selector ignored without --book; fetching all chapters"
                );
            }
            let mut units = Vec::new();
            for book in all_books() {
                for chapter in 1..=book.chapters {
                    units.push(ChapterRequest {
                        version: version.clone(),
                        book,
                        chapter,
                    });
                }
            }
            Ok(units)
        }
    }
}
