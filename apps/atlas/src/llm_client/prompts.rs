// Fixed instructions sent alongside every dataset prompt.

/// System message for `ask`. The dataset prompt itself goes in the user turn.
pub const ROLE_PLAY_SYSTEM: &str = "You are a helpful assistant. \
    The user will give you a role-play instruction from a curated prompt collection. \
    Follow it faithfully and stay in role for the whole reply.";

/// Joins a dataset prompt with an optional follow-up message from the user.
pub fn build_user_message(prompt: &str, message: Option<&str>) -> String {
    match message.map(str::trim).filter(|m| !m.is_empty()) {
        Some(message) => format!("{prompt}\n\n{message}"),
        None => prompt.to_string(),
    }
}
