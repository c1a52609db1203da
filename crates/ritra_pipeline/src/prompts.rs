//! Prompt templates for the text units.
//!
//! Kept in one place so callers (and test doubles) can recognise each unit's
//! request by value.

/// Trailer-style narration for a book title.
pub fn narrative(title: &str) -> String {
    format!(
        "Write a gripping narration of about 120 words that introduces the book \"{title}\" \
         to someone who has never read it. Speak directly to the listener, avoid spoilers \
         past the opening, and end on a hook. Return only the narration."
    )
}

/// Polish raw narration for reading aloud.
pub fn refinement(text: &str) -> String {
    format!(
        "Polish the following narration so it reads naturally aloud. Keep the meaning and \
         length, use short sentences, and return only the revised text.\n\n{text}"
    )
}

/// Ask for a short voice-tone description.
pub fn tone(text: &str) -> String {
    format!(
        "In two to four words, describe the voice tone best suited to narrate the following \
         text. Return only the tone.\n\n{text}"
    )
}

/// Ask for structured title and author.
pub fn metadata(title: &str, text: &str) -> String {
    format!(
        "Identify the book described below. Answer on a single line exactly as \
         title=<title>&author=<author>, replacing spaces with underscores.\n\n\
         Working title: {title}\n\n{text}"
    )
}

/// Ask for a short video description.
pub fn description(text: &str) -> String {
    format!(
        "Write a two or three sentence description for a short video built from the \
         following narration. No hashtags. Return only the description.\n\n{text}"
    )
}

/// Wrap one section of narration in the illustration style.
pub fn image(style: &str, section: &str) -> String {
    format!("{} {}", style.trim(), section.trim())
}

/// Tidy a free-form tone answer, falling back when nothing usable remains.
pub fn clean_tone(raw: &str, fallback: &str) -> String {
    let cleaned = raw
        .lines()
        .next()
        .unwrap_or_default()
        .trim()
        .trim_matches(|c: char| c == '"' || c == '\'' || c == '.' || c == '*')
        .trim();
    if cleaned.is_empty() {
        fallback.to_string()
    } else {
        cleaned.to_lowercase()
    }
}
