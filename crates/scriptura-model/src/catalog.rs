use thiserror::Error;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// One book of the 66-book canon.
#[derive(Debug)]
pub struct BookEntry {
    /// Canonical position, 1 (Genesis) through 66 (Revelation).
    pub order: u32,
    /// Lowercase short code used in directory and file names.
    pub code: &'static str,
    /// Display name, also used to build passage search queries.
    pub name: &'static str,
    /// Canonical chapter count.
    pub chapters: u32,
    /// Accepted lookup aliases, stored lowercase and accent-folded.
    aliases: &'static [&'static str],
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown book '{0}'")]
pub struct UnknownBookError(pub String);

const fn book(
    order: u32,
    code: &'static str,
    name: &'static str,
    chapters: u32,
    aliases: &'static [&'static str],
) -> BookEntry {
    BookEntry {
        order,
        code,
        name,
        chapters,
        aliases,
    }
}

/// English and Spanish names are both accepted; aliases are pre-folded so
/// lookup only has to fold the query side.
static BOOKS: [BookEntry; 66] = [
    book(1, "gen", "Genesis", 50, &["genesis", "gen"]),
    book(2, "exo", "Exodus", 40, &["exodus", "exodo", "exo"]),
    book(3, "lev", "Leviticus", 27, &["leviticus", "levitico", "lev"]),
    book(4, "num", "Numbers", 36, &["numbers", "numeros", "num"]),
    book(5, "deu", "Deuteronomy", 34, &["deuteronomy", "deuteronomio", "deu"]),
    book(6, "jos", "Joshua", 24, &["joshua", "josue", "jos"]),
    book(7, "jdg", "Judges", 21, &["judges", "jueces", "jdg"]),
    book(8, "rut", "Ruth", 4, &["ruth", "rut"]),
    book(9, "1sa", "1 Samuel", 31, &["1 samuel", "first samuel", "1sa"]),
    book(10, "2sa", "2 Samuel", 24, &["2 samuel", "second samuel", "2sa"]),
    book(11, "1ki", "1 Kings", 22, &["1 kings", "1 reyes", "1ki"]),
    book(12, "2ki", "2 Kings", 25, &["2 kings", "2 reyes", "2ki"]),
    book(13, "1ch", "1 Chronicles", 29, &["1 chronicles", "1 cronicas", "1ch"]),
    book(14, "2ch", "2 Chronicles", 36, &["2 chronicles", "2 cronicas", "2ch"]),
    book(15, "ezr", "Ezra", 10, &["ezra", "esdras", "ezr"]),
    book(16, "neh", "Nehemiah", 13, &["nehemiah", "nehemias", "neh"]),
    book(17, "est", "Esther", 10, &["esther", "ester", "est"]),
    book(18, "job", "Job", 42, &["job"]),
    book(19, "psa", "Psalms", 150, &["psalms", "salmos", "psa"]),
    book(20, "pro", "Proverbs", 31, &["proverbs", "proverbios", "pro"]),
    book(21, "ecc", "Ecclesiastes", 12, &["ecclesiastes", "eclesiastes", "ecc"]),
    book(
        22,
        "sng",
        "Song of Solomon",
        8,
        &["song of solomon", "song of songs", "cantares", "cantar de los cantares", "sng"],
    ),
    book(23, "isa", "Isaiah", 66, &["isaiah", "isaias", "isa"]),
    book(24, "jer", "Jeremiah", 52, &["jeremiah", "jeremias", "jer"]),
    book(25, "lam", "Lamentations", 5, &["lamentations", "lamentaciones", "lam"]),
    book(26, "ezk", "Ezekiel", 48, &["ezekiel", "ezequiel", "ezk"]),
    book(27, "dan", "Daniel", 12, &["daniel", "dan"]),
    book(28, "hos", "Hosea", 14, &["hosea", "oseas", "hos"]),
    book(29, "jol", "Joel", 3, &["joel", "jol"]),
    book(30, "amo", "Amos", 9, &["amos", "amo"]),
    book(31, "oba", "Obadiah", 1, &["obadiah", "abdias", "oba"]),
    book(32, "jon", "Jonah", 4, &["jonah", "jonas", "jon"]),
    book(33, "mic", "Micah", 7, &["micah", "miqueas", "mic"]),
    book(34, "nam", "Nahum", 3, &["nahum", "nam"]),
    book(35, "hab", "Habakkuk", 3, &["habakkuk", "habacuc", "hab"]),
    book(36, "zep", "Zephaniah", 3, &["zephaniah", "sofonias", "zep"]),
    book(37, "hag", "Haggai", 2, &["haggai", "hageo", "hag"]),
    book(38, "zec", "Zechariah", 14, &["zechariah", "zacarias", "zec"]),
    book(39, "mal", "Malachi", 4, &["malachi", "malaquias", "mal"]),
    book(40, "mat", "Matthew", 28, &["matthew", "mateo", "mat"]),
    book(41, "mrk", "Mark", 16, &["mark", "marcos", "mrk"]),
    book(42, "luk", "Luke", 24, &["luke", "lucas", "luk"]),
    book(43, "jhn", "John", 21, &["john", "juan", "jhn"]),
    book(44, "act", "Acts", 28, &["acts", "hechos", "act"]),
    book(45, "rom", "Romans", 16, &["romans", "romanos", "rom"]),
    book(46, "1co", "1 Corinthians", 16, &["1 corinthians", "1 corintios", "1co"]),
    book(47, "2co", "2 Corinthians", 13, &["2 corinthians", "2 corintios", "2co"]),
    book(48, "gal", "Galatians", 6, &["galatians", "galatas", "gal"]),
    book(49, "eph", "Ephesians", 6, &["ephesians", "efesios", "eph"]),
    book(50, "php", "Philippians", 4, &["philippians", "filipenses", "php"]),
    book(51, "col", "Colossians", 4, &["colossians", "colosenses", "col"]),
    book(
        52,
        "1th",
        "1 Thessalonians",
        5,
        &["1 thessalonians", "1 tesalonicenses", "1th"],
    ),
    book(
        53,
        "2th",
        "2 Thessalonians",
        3,
        &["2 thessalonians", "2 tesalonicenses", "2th"],
    ),
    book(54, "1ti", "1 Timothy", 6, &["1 timothy", "1 timoteo", "1ti"]),
    book(55, "2ti", "2 Timothy", 4, &["2 timothy", "2 timoteo", "2ti"]),
    book(56, "tit", "Titus", 3, &["titus", "tito", "tit"]),
    book(57, "phm", "Philemon", 1, &["philemon", "filemon", "phm"]),
    book(58, "heb", "Hebrews", 13, &["hebrews", "hebreos", "heb"]),
    book(59, "jas", "James", 5, &["james", "santiago", "jas"]),
    book(60, "1pe", "1 Peter", 5, &["1 peter", "1 pedro", "1pe"]),
    book(61, "2pe", "2 Peter", 3, &["2 peter", "2 pedro", "2pe"]),
    book(62, "1jn", "1 John", 5, &["1 john", "1 juan", "1jn"]),
    book(63, "2jn", "2 John", 1, &["2 john", "2 juan", "2jn"]),
    book(64, "3jn", "3 John", 1, &["3 john", "3 juan", "3jn"]),
    book(65, "jud", "Jude", 1, &["jude", "judas", "jud"]),
    book(66, "rev", "Revelation", 22, &["revelation", "apocalipsis", "revelacion", "rev"]),
];

/// All 66 books in canonical order.
pub fn all_books() -> &'static [BookEntry] {
    &BOOKS
}

/// Case- and accent-insensitive book lookup by name, alias, or code.
pub fn resolve_book(name: &str) -> Result<&'static BookEntry, UnknownBookError> {
    let key = fold(name);
    BOOKS
        .iter()
        .find(|b| b.aliases.iter().any(|a| *a == key))
        .ok_or_else(|| UnknownBookError(name.to_string()))
}

/// Look up a book by its lowercase short code (e.g. "gen").
pub fn book_by_code(code: &str) -> Option<&'static BookEntry> {
    BOOKS.iter().find(|b| b.code == code)
}

/// Lowercase and strip accents so "GÉNESIS" and "genesis" compare equal.
fn fold(name: &str) -> String {
    name.trim()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(|c| c.to_lowercase())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fold_strips_accents_and_case() {
        assert_eq!(fold("GÉNESIS"), "genesis");
        assert_eq!(fold("  Éxodo "), "exodo");
        assert_eq!(fold("Cantar de los Cantares"), "cantar de los cantares");
    }

    #[test]
    fn test_resolve_book_case_and_accent_insensitive() {
        let a = resolve_book("Genesis").unwrap();
        let b = resolve_book("genesis").unwrap();
        let c = resolve_book("GÉNESIS").unwrap();
        assert_eq!(a.code, "gen");
        assert!(std::ptr::eq(a, b));
        assert!(std::ptr::eq(a, c));
    }

    #[test]
    fn test_resolve_book_spanish_aliases() {
        assert_eq!(resolve_book("1 Reyes").unwrap().code, "1ki");
        assert_eq!(resolve_book("Apocalipsis").unwrap().code, "rev");
        assert_eq!(resolve_book("Revelación").unwrap().code, "rev");
        assert_eq!(resolve_book("cantares").unwrap().code, "sng");
    }

    #[test]
    fn test_resolve_book_by_code() {
        assert_eq!(resolve_book("jud").unwrap().order, 65);
        assert_eq!(resolve_book("2ch").unwrap().name, "2 Chronicles");
    }

    #[test]
    fn test_resolve_book_unknown() {
        let err = resolve_book("Nowhere").unwrap_err();
        assert_eq!(err, UnknownBookError("Nowhere".to_string()));
    }

    #[test]
    fn test_book_by_code() {
        assert_eq!(book_by_code("psa").unwrap().chapters, 150);
        assert!(book_by_code("xyz").is_none());
    }

    #[test]
    fn test_catalog_shape() {
        let books = all_books();
        assert_eq!(books.len(), 66);
        for (i, b) in books.iter().enumerate() {
            assert_eq!(b.order, i as u32 + 1);
            assert!(b.chapters >= 1);
            // Every code doubles as an alias so users can pass it directly.
            assert!(b.aliases.contains(&b.code), "code {} not in aliases", b.code);
        }
        let total: u32 = books.iter().map(|b| b.chapters).sum();
        assert_eq!(total, 1189);
    }

    #[test]
    fn test_codes_unique() {
        let mut codes: Vec<&str> = all_books().iter().map(|b| b.code).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), 66);
    }

    #[test]
    fn test_aliases_are_pre_folded() {
        for b in all_books() {
            for a in b.aliases {
                assert_eq!(*a, fold(a), "alias '{a}' must already be folded");
            }
        }
    }
}
