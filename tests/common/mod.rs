//! Shared fixtures for integration tests
//!
//! Writes a small site (blog series, a page, a reading list, a draft and a
//! broken file) into a temporary directory.

pub mod corpus;

pub use corpus::{FixtureSite, BOOK_IDS, POST_IDS};
