//! Ranking services.

pub mod reader;
pub mod writer;

pub use reader::{RankingReader, FORMAT_RESET, PAGE_SIZE};
pub use writer::RankingWriter;
