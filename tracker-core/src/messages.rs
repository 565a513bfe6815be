//! User-facing message text.
//!
//! The only strings the presentation boundary ever sees; typed errors from
//! the client never cross it. Connectivity failures get the specific
//! message, every other failure shares the generic one for its operation.

pub const NO_CONNECTION: &str =
    "No network connection. Please check your internet and try again.";

pub const FETCH_FAILED: &str = "Failed to fetch weather. Please try again.";

pub const SEARCH_FAILED: &str = "Failed to perform search. Please try again.";

/// Empty-result message for a search; not an error, only an empty state.
pub fn no_results(search_text: &str) -> String {
    format!("No results found for '{search_text}'.")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_results_quotes_the_search_text() {
        assert_eq!(no_results("Atlantis"), "No results found for 'Atlantis'.");
    }
}
