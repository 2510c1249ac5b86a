pub mod classify;
pub mod panel;
pub mod scrape;
pub mod summarize;
pub mod utils;
pub mod watch;

#[cfg(test)]
#[path = "../commands_test.rs"]
mod commands_test;
