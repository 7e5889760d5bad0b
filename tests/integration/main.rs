//! Integration tests against mock wiki servers

mod crawl_tests;
mod fetch_tests;
