//! Request classification
//!
//! A decoded request payload is either one of a small set of control
//! commands or plain text to synthesize. Matching is exact for `PING` and
//! `QUIT` and prefix-based for the session mutators; everything else is
//! speech.

/// A classified request payload
///
/// Borrows from the decoded request text; argument slices are trimmed of
/// surrounding whitespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command<'a> {
    /// Health check, answered with raw `PONG\n` outside the frame format
    Ping,
    /// Orderly shutdown, no response
    Quit,
    /// Change the active voice (re-resolves the voice style)
    SetVoice(&'a str),
    /// Change the language code, unvalidated
    SetLanguage(&'a str),
    /// Change the speed factor; parsing happens at execution time
    SetSpeed(&'a str),
    /// Synthesize the text with the current session state
    Speak(&'a str),
}

impl<'a> Command<'a> {
    /// Classify a request payload
    pub fn classify(text: &'a str) -> Self {
        if text == "PING" {
            Command::Ping
        } else if text == "QUIT" {
            Command::Quit
        } else if let Some(rest) = text.strip_prefix("VOICE:") {
            Command::SetVoice(rest.trim())
        } else if let Some(rest) = text.strip_prefix("LANG:") {
            Command::SetLanguage(rest.trim())
        } else if let Some(rest) = text.strip_prefix("SPEED:") {
            Command::SetSpeed(rest.trim())
        } else {
            Command::Speak(text)
        }
    }
}
