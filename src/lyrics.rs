use serde::Serialize;

/// Lyric text split into the lines that are displayed and sung.
///
/// Lines are trimmed and blank lines are dropped. The karaoke view and the
/// duet transform both go through this type, so the line count used for
/// highlighting always matches what is rendered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LyricDocument<'a> {
    lines: Vec<&'a str>,
}

impl<'a> LyricDocument<'a> {
    pub fn parse(text: &'a str) -> Self {
        let lines = text
            .split('\n')
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();
        Self { lines }
    }

    pub fn lines(&self) -> &[&'a str] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&'a str> {
        self.lines.get(index).copied()
    }
}

/// Number of displayable lines in `text`.
pub fn line_count(text: &str) -> usize {
    LyricDocument::parse(text).len()
}
