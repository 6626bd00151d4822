//! Input sanitizing for player-provided text.

/// Longest player name kept; longer input is cut.
pub const MAX_NAME_LEN: usize = 32;

/// Longest slice of player text written to the log.
const MAX_LOG_LEN: usize = 64;

/// Name used when the player enters nothing usable.
pub const DEFAULT_NAME: &str = "Anonymous";

/// Clean up a name typed at the prompt: trim it, drop control characters and
/// cap the length. Nothing left means [`DEFAULT_NAME`].
pub fn sanitize_player_name(input: &str) -> String {
    let cleaned: String = input
        .trim()
        .chars()
        .filter(|c| !c.is_control())
        .take(MAX_NAME_LEN)
        .collect();
    let cleaned = cleaned.trim_end().to_string();
    if cleaned.is_empty() {
        DEFAULT_NAME.to_string()
    } else {
        cleaned
    }
}

/// Escape text before it reaches the log so it cannot forge extra log lines.
pub fn escape_for_log(input: &str) -> String {
    input
        .chars()
        .take(MAX_LOG_LEN)
        .flat_map(char::escape_debug)
        .collect()
}
