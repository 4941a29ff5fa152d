/// Characters kept before the first match
pub const CONTEXT_BEFORE: usize = 60;

/// Characters kept from the start of the first match
pub const CONTEXT_AFTER: usize = 140;

/// Appended to every non-empty snippet
pub const ELLIPSIS: &str = "...";

/// Lower-case `text` one char at a time.
///
/// Queries, titles and bodies all go through this so they fold identically.
pub fn fold(text: &str) -> String {
    text.chars().flat_map(char::to_lowercase).collect()
}

/// Lower-cased view of a text that can map match positions back to the original.
///
/// Folding may change byte lengths (`İ` becomes two chars), so offsets found
/// in the folded text are not valid in the original.
#[derive(Debug)]
pub struct FoldedText<'a> {
    original: &'a str,
    folded: String,
    /// (folded byte offset, original byte offset) per folded char
    offsets: Vec<(usize, usize)>,
}

impl<'a> FoldedText<'a> {
    pub fn new(original: &'a str) -> Self {
        let mut folded = String::with_capacity(original.len());
        let mut offsets = Vec::with_capacity(original.len());
        for (position, ch) in original.char_indices() {
            for lower in ch.to_lowercase() {
                offsets.push((folded.len(), position));
                folded.push(lower);
            }
        }
        Self {
            original,
            folded,
            offsets,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.folded
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.folded.contains(needle)
    }

    /// Non-overlapping occurrences of `needle`
    pub fn count(&self, needle: &str) -> usize {
        if needle.is_empty() {
            return 0;
        }
        self.folded.matches(needle).count()
    }

    /// Byte offset in the original text where the first match of `needle` starts
    pub fn find(&self, needle: &str) -> Option<usize> {
        let folded_pos = self.folded.find(needle)?;
        let idx = self.offsets.partition_point(|(folded, _)| *folded < folded_pos);
        Some(
            self.offsets
                .get(idx)
                .map_or(self.original.len(), |(_, original)| *original),
        )
    }
}

/// Excerpt of `text` around the match starting at byte offset `pos`
pub fn snippet_at(text: &str, pos: usize) -> String {
    let start = text[..pos]
        .char_indices()
        .rev()
        .take(CONTEXT_BEFORE)
        .last()
        .map_or(pos, |(i, _)| i);
    let end = text[pos..]
        .char_indices()
        .nth(CONTEXT_AFTER)
        .map_or(text.len(), |(i, _)| pos + i);

    format!("{}{ELLIPSIS}", text[start..end].replace('\n', " "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_text_uses_whole_string() {
        let text = "abc query xyz";
        let folded = FoldedText::new(text);
        let pos = folded.find("query").unwrap();
        assert_eq!(pos, 4);
        assert_eq!(snippet_at(text, pos), "abc query xyz...");
    }

    #[test]
    fn test_window_is_clamped_to_60_before_and_140_after() {
        let text = format!("{}needle{}", "a".repeat(100), "b".repeat(200));
        let pos = FoldedText::new(&text).find("needle").unwrap();
        let snippet = snippet_at(&text, pos);

        let body = snippet.strip_suffix(ELLIPSIS).unwrap();
        assert_eq!(body.chars().count(), CONTEXT_BEFORE + CONTEXT_AFTER);
        assert!(body.starts_with(&"a".repeat(60)));
        assert!(body[60..].starts_with("needle"));
    }

    #[test]
    fn test_newlines_become_spaces() {
        let text = "line one\nline two";
        assert_eq!(snippet_at(text, 0), "line one line two...");
    }

    #[test]
    fn test_count_is_non_overlapping() {
        let folded = FoldedText::new("aaaa");
        assert_eq!(folded.count("aa"), 2);
        assert_eq!(folded.count(""), 0);
    }

    #[test]
    fn test_case_insensitive_find() {
        let folded = FoldedText::new("Sparkly THINGS");
        assert_eq!(folded.as_str(), "sparkly things");
        assert_eq!(folded.find("things"), Some(8));
        assert!(folded.contains("sparkly"));
    }

    #[test]
    fn test_find_maps_back_through_length_changing_fold() {
        // 'İ' folds to two chars, shifting every later folded offset
        let text = "İstanbul gallery";
        let folded = FoldedText::new(text);
        let pos = folded.find("gallery").unwrap();
        assert_eq!(&text[pos..], "gallery");
        assert!(snippet_at(text, pos).starts_with("İstanbul gallery"));
    }

    #[test]
    fn test_multibyte_window_stays_on_char_boundaries() {
        let text = format!("{}検索{}", "日本".repeat(50), "語".repeat(200));
        let pos = FoldedText::new(&text).find("検索").unwrap();
        let snippet = snippet_at(&text, pos);
        assert!(snippet.starts_with("日本"));
        assert_eq!(
            snippet.strip_suffix(ELLIPSIS).unwrap().chars().count(),
            CONTEXT_BEFORE + CONTEXT_AFTER
        );
    }
}
