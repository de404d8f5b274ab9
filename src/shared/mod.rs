pub mod geo;
pub mod time;

pub use geo::*;
pub use time::*;

/// Collapses every run of whitespace into a single space and trims the ends.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[test]
fn collapse_whitespace_test() {
    assert_eq!(collapse_whitespace("  4  Division \t to  Gresham "), "4 Division to Gresham");
}
