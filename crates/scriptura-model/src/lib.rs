pub mod catalog;
pub mod document;
pub mod range;

pub use catalog::*;
pub use document::*;
pub use range::*;
