//! Integration tests for `jaae-rs` project files and ROM insertion

mod common;
mod insertion;
mod project;
