//! Duet prompts: SSML that leaves a rest after every sung line.
//!
//! A duet track gives a second, human singer room to answer each line. The
//! synthesizer is asked to read each lyric line as its own paragraph and then
//! stay silent for [`DUET_PAUSE`].

use std::borrow::Cow;

use crate::lyrics::LyricDocument;

/// Rest inserted after every line of a duet.
pub const DUET_PAUSE: &str = "2s";

/// Build the duet SSML document for `lyrics`.
///
/// Line text is escaped, so lyrics containing `<` or `&` still yield
/// well-formed markup.
pub fn duet_markup(lyrics: &str) -> String {
    let doc = LyricDocument::parse(lyrics);
    let mut out = String::with_capacity(lyrics.len() + doc.len() * 32 + 16);
    out.push_str("<speak>");
    for line in doc.lines() {
        out.push_str("<p>");
        out.push_str(&escape_markup(line));
        out.push_str("</p><break time=\"");
        out.push_str(DUET_PAUSE);
        out.push_str("\"/>");
    }
    out.push_str("</speak>");
    out
}

/// Prompt sent to the speech model: duet markup when requested, otherwise the
/// lyrics untouched.
pub fn synthesis_prompt(lyrics: &str, make_duet: bool) -> Cow<'_, str> {
    if make_duet {
        Cow::Owned(duet_markup(lyrics))
    } else {
        Cow::Borrowed(lyrics)
    }
}

/// Escape the five XML-reserved characters.
pub fn escape_markup(text: &str) -> Cow<'_, str> {
    if !text.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(text);
    }

    let mut escaped = String::with_capacity(text.len() + 8);
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(ch),
        }
    }
    Cow::Owned(escaped)
}
