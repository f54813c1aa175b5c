//! System prompt assembly
//!
//! Layout:
//! ```text
//! <locale instructions>
//!
//!  Context: <stitched context>
//!  History: <rendered history>      (only when history is non-empty)
//! ```

use crate::locale::Locale;
use crate::types::HistoryEntry;
use std::fmt::Write;

/// Build the system prompt for one request
pub fn build_system_prompt(locale: Locale, context: &str, history: &[HistoryEntry]) -> String {
    let mut prompt = format!("{}\n\n Context: {}", locale.instructions(), context);

    if !history.is_empty() {
        prompt.push_str(" \n History: ");
        prompt.push_str(&render_history(history));
    }

    prompt
}

/// Render prior turns oldest first, one question/answer pair per block
pub fn render_history(history: &[HistoryEntry]) -> String {
    let mut out = String::new();
    for (i, entry) in history.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        // Writing into a String cannot fail
        let _ = write!(out, "\nQ: {}\nA: {}", entry.question(), entry.answer());
    }
    out
}

/// Trim the question and fold newlines into spaces before embedding
pub fn sanitize_question(question: &str) -> String {
    question.trim().replace("\r\n", " ").replace('\n', " ")
}
