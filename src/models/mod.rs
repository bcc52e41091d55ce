pub mod candidate;

pub use candidate::{parse_identifier, CandidateFile, IDENTIFIER_WIDTH};
