use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// A single verse as extracted from a chapter page.
///
/// `verse` preserves the label printed on the page. That label is usually a
/// plain number but not always: combined verses can carry labels like
/// "22-23" and sub-verses like "3a", so it stays a string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerseRecord {
    pub verse: String,
    /// Raw extracted text, newline-terminated.
    pub text: String,
    /// Whitespace-collapsed variant for display, terminated with a blank line.
    #[serde(rename = "readableText")]
    pub readable_text: String,
}

/// The canonical per-chapter document written to disk.
///
/// The serialized shape is a contract with downstream consumers: `book` is
/// the uppercase short code, `rev` the uppercase version code, `chapter` a
/// string, and `verses` keeps page order (duplicate labels included).
/// Struct field order here is the field order in the file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChapterDocument {
    pub book: String,
    pub rev: String,
    pub chapter: String,
    pub verses: Vec<VerseRecord>,
}

impl ChapterDocument {
    /// Assemble a document from extracted verses.
    pub fn new(book_code: &str, version: &str, chapter: u32, verses: Vec<VerseRecord>) -> Self {
        Self {
            book: book_code.to_uppercase(),
            rev: version.to_uppercase(),
            chapter: chapter.to_string(),
            verses,
        }
    }
}

/// Directory name for a book inside a version tree (e.g. `01_gen`).
pub fn book_dir_name(order: u32, code: &str) -> String {
    format!("{order:02}_{code}")
}

/// File name for a chapter document (e.g. `gen.001.json`).
pub fn chapter_file_name(code: &str, chapter: u32) -> String {
    format!("{code}.{chapter:03}.json")
}

/// Canonical path of a chapter document under a destination root:
/// `<dest>/<VERSION>/<order>_<code>/<code>.<chapter>.json`, version
/// uppercased, order padded to two digits, chapter to three.
pub fn chapter_path(dest: &Path, version: &str, order: u32, code: &str, chapter: u32) -> PathBuf {
    dest.join(version.to_uppercase())
        .join(book_dir_name(order, code))
        .join(chapter_file_name(code, chapter))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_document() -> ChapterDocument {
        ChapterDocument::new(
            "jud",
            "rvr60",
            1,
            vec![
                VerseRecord {
                    verse: "1".to_string(),
                    text: "Judas, siervo de Jesucristo,\ny hermano de Jacobo\n".to_string(),
                    readable_text: "Judas, siervo de Jesucristo, y hermano de Jacobo\n\n"
                        .to_string(),
                },
                VerseRecord {
                    verse: "2".to_string(),
                    text: "Misericordia y paz\n".to_string(),
                    readable_text: "Misericordia y paz\n\n".to_string(),
                },
            ],
        )
    }

    #[test]
    fn test_new_uppercases_identifiers() {
        let doc = sample_document();
        assert_eq!(doc.book, "JUD");
        assert_eq!(doc.rev, "RVR60");
        assert_eq!(doc.chapter, "1");
    }

    #[test]
    fn test_serialized_field_names_and_order() {
        let doc = sample_document();
        let json = serde_json::to_string_pretty(&doc).unwrap();

        // Downstream readers depend on these exact keys.
        assert!(json.contains("\"book\": \"JUD\""));
        assert!(json.contains("\"rev\": \"RVR60\""));
        assert!(json.contains("\"chapter\": \"1\""));
        assert!(json.contains("\"readableText\""));
        assert!(!json.contains("readable_text"));

        let book_pos = json.find("\"book\"").unwrap();
        let rev_pos = json.find("\"rev\"").unwrap();
        let chapter_pos = json.find("\"chapter\"").unwrap();
        let verses_pos = json.find("\"verses\"").unwrap();
        assert!(book_pos < rev_pos && rev_pos < chapter_pos && chapter_pos < verses_pos);
    }

    #[test]
    fn test_json_roundtrip() {
        let doc = sample_document();
        let json = serde_json::to_string_pretty(&doc).unwrap();
        let parsed: ChapterDocument = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.book, "JUD");
        assert_eq!(parsed.verses.len(), 2);
        assert_eq!(parsed.verses[1].readable_text, "Misericordia y paz\n\n");
    }

    #[test]
    fn test_serialization_is_deterministic() {
        let doc = sample_document();
        let first = serde_json::to_string_pretty(&doc).unwrap();
        let second = serde_json::to_string_pretty(&doc).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_path_contract() {
        let path = chapter_path(Path::new("dest"), "PDT", 1, "gen", 1);
        assert_eq!(path, PathBuf::from("dest/PDT/01_gen/gen.001.json"));
    }

    #[test]
    fn test_path_contract_uppercases_version() {
        let path = chapter_path(Path::new("data"), "rvr60", 66, "rev", 22);
        assert_eq!(path, PathBuf::from("data/RVR60/66_rev/rev.022.json"));
    }

    #[test]
    fn test_chapter_padding() {
        assert_eq!(chapter_file_name("psa", 3), "psa.003.json");
        assert_eq!(chapter_file_name("psa", 119), "psa.119.json");
        assert_eq!(book_dir_name(9, "1sa"), "09_1sa");
    }
}
