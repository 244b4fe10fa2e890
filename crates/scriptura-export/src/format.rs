//! The FreeShow `.fsb.json` export shape.

use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct ExportBible {
    pub name: String,
    pub metadata: ExportMetadata,
    pub books: Vec<ExportBook>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ExportMetadata {
    pub source: String,
    pub revision: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ExportBook {
    pub number: u32,
    pub name: String,
    pub chapters: Vec<ExportChapter>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ExportChapter {
    pub number: u32,
    pub verses: Vec<ExportVerse>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ExportVerse {
    pub number: u32,
    pub text: String,
}
