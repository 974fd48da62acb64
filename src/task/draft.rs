#![forbid(unsafe_code)]

/// Uncommitted text of the new-task input, with a char-indexed cursor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Draft {
    text: String,
    cursor: usize,
}

impl Draft {
    pub fn new(initial: impl Into<String>) -> Self {
        let text = initial.into();
        let cursor = text.chars().count();
        Self { text, cursor }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.cursor = 0;
    }

    pub fn insert_char(&mut self, c: char) {
        let mut chars: Vec<char> = self.text.chars().collect();
        let cur = self.cursor.min(chars.len());
        chars.insert(cur, c);
        self.text = chars.into_iter().collect();
        self.cursor = cur + 1;
    }

    pub fn backspace(&mut self) {
        let mut chars: Vec<char> = self.text.chars().collect();
        let cur = self.cursor.min(chars.len());
        if cur == 0 {
            return;
        }
        chars.remove(cur - 1);
        self.text = chars.into_iter().collect();
        self.cursor = cur - 1;
    }

    pub fn delete(&mut self) {
        let mut chars: Vec<char> = self.text.chars().collect();
        let cur = self.cursor.min(chars.len());
        if cur >= chars.len() {
            return;
        }
        chars.remove(cur);
        self.text = chars.into_iter().collect();
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        let len = self.text.chars().count();
        self.cursor = (self.cursor + 1).min(len);
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.text.chars().count();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edits_at_cursor_with_multibyte_chars() {
        let mut d = Draft::new("café");
        assert_eq!(d.cursor(), 4);
        d.move_left();
        d.insert_char('x');
        assert_eq!(d.as_str(), "cafxé");
        d.move_end();
        d.backspace();
        assert_eq!(d.as_str(), "cafx");
        d.move_home();
        d.delete();
        assert_eq!(d.as_str(), "afx");
        assert_eq!(d.cursor(), 0);
    }

    #[test]
    fn cursor_stays_in_bounds() {
        let mut d = Draft::default();
        d.backspace();
        d.delete();
        d.move_left();
        d.move_right();
        assert_eq!(d.cursor(), 0);
        d.insert_char('a');
        d.move_right();
        assert_eq!(d.cursor(), 1);
        d.clear();
        assert_eq!(d, Draft::default());
    }
}
