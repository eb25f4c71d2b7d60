//! Integration test crate for the eMTC backend.
//!
//! This crate has no library code. It only contains integration tests
//! that exercise end-to-end submission and sync flows across the
//! workspace crates.
//!
//! Run all integration tests:
//! ```sh
//! cargo test -p emtc-integration-tests
//! ```
