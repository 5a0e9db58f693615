//! Text processing for the playback pipeline.
//!
//! Raw input text goes through three stages before it reaches the speech
//! engine:
//!
//! 1. [`normalize`](normalize::normalize) collapses whitespace and fixes
//!    punctuation spacing.
//! 2. [`split_into_segments`](segment::split_into_segments) cuts the
//!    normalized text into bounded-length speakable chunks.
//! 3. [`tokenize`](token::tokenize) produces the word/whitespace token
//!    sequence that highlighting operates over.
//!
//! Offsets throughout this module are counted in characters (Unicode scalar
//! values), matching the character indices reported by synthesis boundary
//! events.
//!
//! [`preprocess`] holds the optional pronunciation cleanup pass
//! (abbreviations, digits, symbols) applied before normalization when the
//! caller asks for it.

pub mod normalize;
pub mod preprocess;
pub mod segment;
pub mod token;

pub use normalize::normalize;
pub use preprocess::TextPreprocessor;
pub use segment::{split_into_segments, Segment, SegmentOptions};
pub use token::{find_token_index_at_char_index, tokenize, Token};
