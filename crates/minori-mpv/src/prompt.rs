/// Maximum completion rows rendered on the OSD at once.
const VISIBLE_COMPLETIONS: usize = 8;

/// What a forwarded key did to the prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptEvent {
    /// The query text changed; completions should be refreshed.
    Changed,
    /// The completion selection moved; re-render only.
    Moved,
    /// The prompt was submitted with this text.
    Submitted(String),
    /// The prompt was dismissed without submitting.
    Cancelled,
    /// The key meant nothing here.
    Ignored,
}

/// OSD line editor with an optional completion list.
///
/// Pure state plus a `render` method; the caller owns the mpv side
/// (key-section capture and `show-text`). Keys arrive under their mpv
/// input names, so `SPACE`, `BS`, `ENTER` and friends are spelled out.
#[derive(Debug)]
pub struct Prompt {
    label: String,
    query: String,
    completions: Vec<String>,
    selected: Option<usize>,
}

impl Prompt {
    pub fn new(label: impl Into<String>, initial: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            query: initial.into(),
            completions: Vec::new(),
            selected: None,
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// Replace the completion list; the selection resets to the typed text.
    pub fn set_completions(&mut self, items: Vec<String>) {
        self.completions = items;
        self.selected = None;
    }

    /// Text a submission would use: the selected completion when one is
    /// highlighted, the typed query otherwise.
    pub fn current(&self) -> &str {
        match self.selected {
            Some(i) => &self.completions[i],
            None => &self.query,
        }
    }

    pub fn handle_key(&mut self, key: &str) -> PromptEvent {
        match key {
            "ENTER" => PromptEvent::Submitted(self.current().to_string()),
            "ESC" => PromptEvent::Cancelled,
            "SPACE" => self.insert(' '),
            "BS" => {
                if self.query.pop().is_some() {
                    self.selected = None;
                    PromptEvent::Changed
                } else {
                    PromptEvent::Ignored
                }
            }
            "DOWN" | "TAB" => {
                if self.completions.is_empty() {
                    return PromptEvent::Ignored;
                }
                self.selected = Some(match self.selected {
                    None => 0,
                    Some(i) => (i + 1).min(self.completions.len() - 1),
                });
                PromptEvent::Moved
            }
            "UP" => match self.selected {
                None => PromptEvent::Ignored,
                Some(0) => {
                    self.selected = None;
                    PromptEvent::Moved
                }
                Some(i) => {
                    self.selected = Some(i - 1);
                    PromptEvent::Moved
                }
            },
            _ => {
                let mut chars = key.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) if !c.is_control() => self.insert(c),
                    _ => PromptEvent::Ignored,
                }
            }
        }
    }

    fn insert(&mut self, c: char) -> PromptEvent {
        self.query.push(c);
        self.selected = None;
        PromptEvent::Changed
    }

    /// Render the prompt as OSD text. The completion list scrolls so the
    /// selected row is always in view.
    pub fn render(&self) -> String {
        let mut out = format!("{}: {}_", self.label, self.query);
        let total = self.completions.len();
        let start = match self.selected {
            Some(i) if i >= VISIBLE_COMPLETIONS => i + 1 - VISIBLE_COMPLETIONS,
            _ => 0,
        };
        let end = (start + VISIBLE_COMPLETIONS).min(total);
        if start > 0 {
            out.push_str(&format!("\n  ({start} more)"));
        }
        for (offset, item) in self.completions[start..end].iter().enumerate() {
            let marker = if self.selected == Some(start + offset) {
                ">"
            } else {
                " "
            };
            out.push_str(&format!("\n{marker} {item}"));
        }
        if end < total {
            out.push_str(&format!("\n  ({} more)", total - end));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn typed(prompt: &mut Prompt, text: &str) {
        for c in text.chars() {
            let key = if c == ' ' { "SPACE".to_string() } else { c.to_string() };
            assert_eq!(prompt.handle_key(&key), PromptEvent::Changed);
        }
    }

    #[test]
    fn test_typing_builds_query() {
        let mut prompt = Prompt::new("Anime title", "");
        typed(&mut prompt, "Show A");
        assert_eq!(prompt.query(), "Show A");
        assert_eq!(prompt.current(), "Show A");
    }

    #[test]
    fn test_prefill_and_backspace() {
        let mut prompt = Prompt::new("Anime title", "Frieren");
        assert_eq!(prompt.handle_key("BS"), PromptEvent::Changed);
        assert_eq!(prompt.query(), "Friere");

        let mut empty = Prompt::new("Anime title", "");
        assert_eq!(empty.handle_key("BS"), PromptEvent::Ignored);
    }

    #[test]
    fn test_selection_cycle() {
        let mut prompt = Prompt::new("Anime title", "show");
        prompt.set_completions(vec!["Show A (Shou A)".into(), "Show B (Shou B)".into()]);

        assert_eq!(prompt.current(), "show");
        assert_eq!(prompt.handle_key("DOWN"), PromptEvent::Moved);
        assert_eq!(prompt.current(), "Show A (Shou A)");
        assert_eq!(prompt.handle_key("DOWN"), PromptEvent::Moved);
        assert_eq!(prompt.current(), "Show B (Shou B)");
        // Saturates at the end.
        assert_eq!(prompt.handle_key("DOWN"), PromptEvent::Moved);
        assert_eq!(prompt.current(), "Show B (Shou B)");

        assert_eq!(prompt.handle_key("UP"), PromptEvent::Moved);
        assert_eq!(prompt.handle_key("UP"), PromptEvent::Moved);
        // Back on the typed text.
        assert_eq!(prompt.current(), "show");
        assert_eq!(prompt.handle_key("UP"), PromptEvent::Ignored);
    }

    #[test]
    fn test_typing_clears_selection() {
        let mut prompt = Prompt::new("Anime title", "show");
        prompt.set_completions(vec!["Show A".into()]);
        prompt.handle_key("DOWN");
        assert_eq!(prompt.current(), "Show A");

        prompt.handle_key("s");
        assert_eq!(prompt.current(), "shows");
    }

    #[test]
    fn test_submit_uses_selection() {
        let mut prompt = Prompt::new("Anime title", "show");
        prompt.set_completions(vec!["Show A (Shou A)".into()]);
        prompt.handle_key("DOWN");
        assert_eq!(
            prompt.handle_key("ENTER"),
            PromptEvent::Submitted("Show A (Shou A)".to_string())
        );
    }

    #[test]
    fn test_submit_without_selection_uses_typed_text() {
        let mut prompt = Prompt::new("Score", "8.5");
        assert_eq!(
            prompt.handle_key("ENTER"),
            PromptEvent::Submitted("8.5".to_string())
        );
    }

    #[test]
    fn test_escape_cancels() {
        let mut prompt = Prompt::new("Anime title", "");
        assert_eq!(prompt.handle_key("ESC"), PromptEvent::Cancelled);
    }

    #[test]
    fn test_unknown_named_keys_ignored() {
        let mut prompt = Prompt::new("Anime title", "x");
        assert_eq!(prompt.handle_key("PGUP"), PromptEvent::Ignored);
        assert_eq!(prompt.query(), "x");
    }

    #[test]
    fn test_render_shows_query_and_completions() {
        let mut prompt = Prompt::new("Anime title", "show");
        prompt.set_completions(vec!["Show A".into(), "Show B".into()]);
        prompt.handle_key("DOWN");

        let osd = prompt.render();
        assert!(osd.starts_with("Anime title: show_"));
        assert!(osd.contains("> Show A"));
        assert!(osd.contains("  Show B"));
    }

    #[test]
    fn test_render_truncates_long_lists() {
        let mut prompt = Prompt::new("Anime title", "a");
        prompt.set_completions((0..12).map(|i| format!("Result {i}")).collect());
        let osd = prompt.render();
        assert!(osd.contains("Result 7"));
        assert!(!osd.contains("Result 8"));
        assert!(osd.contains("(4 more)"));
    }

    #[test]
    fn test_render_scrolls_to_selection() {
        let mut prompt = Prompt::new("Anime title", "a");
        prompt.set_completions((0..12).map(|i| format!("Result {i}")).collect());
        for _ in 0..10 {
            prompt.handle_key("DOWN");
        }

        let osd = prompt.render();
        // The selected row is visible and marked, even past the first page.
        assert!(osd.contains("> Result 9"));
        assert!(!osd.contains("Result 0"));
        // Overflow counts on both ends of the window.
        assert!(osd.contains("(2 more)"));

        // Scrolling back up brings the head of the list back into view.
        for _ in 0..9 {
            prompt.handle_key("UP");
        }
        let osd = prompt.render();
        assert!(osd.contains("> Result 0"));
        assert!(!osd.contains("Result 9"));
    }
}
