//! Sentence extraction over fragmented inline text
//!
//! Markup splits prose into many small pieces: a sentence may start in plain
//! text, continue inside emphasis and end after a link. The compiler feeds
//! those pieces as [`CandidateSpan`]s and the extractor stitches them back
//! into [`Sentence`]s.

use crate::model::Sentence;

/// A small unit of inline text in document order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateSpan {
    pub line: usize,
    pub text: String,
    pub link: Option<String>,
}

impl CandidateSpan {
    pub fn new(line: usize, text: impl Into<String>) -> Self {
        Self {
            line,
            text: text.into(),
            link: None,
        }
    }

    pub fn with_link(line: usize, text: impl Into<String>, link: impl Into<String>) -> Self {
        Self {
            line,
            text: text.into(),
            link: Some(link.into()),
        }
    }
}

/// Closing quotes and brackets that stay with the terminator before them
const CLOSERS: &[char] = &[
    '"', '\'', ')', ']', '\u{201D}', '\u{2019}', '\u{300D}', '\u{300F}', '\u{FF09}',
];

/// Characters that end a sentence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Terminators {
    chars: Vec<char>,
}

impl Default for Terminators {
    fn default() -> Self {
        Self { chars: vec!['.'] }
    }
}

impl Terminators {
    pub fn new(chars: impl IntoIterator<Item = char>) -> Self {
        let mut set = Self { chars: Vec::new() };
        set.extend(chars);
        set
    }

    /// The default set plus additional characters
    pub fn with_extra(extra: impl IntoIterator<Item = char>) -> Self {
        let mut set = Self::default();
        set.extend(extra);
        set
    }

    /// Full stops and question/exclamation marks, ASCII and full-width
    pub fn japanese() -> Self {
        Self::with_extra(['?', '!', '。', '？', '！'])
    }

    pub fn contains(&self, c: char) -> bool {
        self.chars.contains(&c)
    }

    pub fn chars(&self) -> &[char] {
        &self.chars
    }

    /// Byte offset just past the first run of terminators that ends a
    /// sentence, including any closing quotes or brackets right after it.
    /// An ASCII run only counts when whitespace or the end of the text
    /// follows, so `example.org` and `3.14` stay whole. Full-width
    /// terminators always count.
    pub fn first_end(&self, text: &str) -> Option<usize> {
        let mut in_run = false;
        let mut closing = false;
        let mut wide = false;
        for (i, c) in text.char_indices() {
            if self.contains(c) && !closing {
                if !in_run {
                    in_run = true;
                    wide = false;
                }
                wide |= !c.is_ascii();
            } else if in_run && CLOSERS.contains(&c) {
                closing = true;
            } else if in_run {
                if wide || c.is_whitespace() {
                    return Some(i);
                }
                in_run = false;
                closing = false;
                if self.contains(c) {
                    in_run = true;
                    wide = !c.is_ascii();
                }
            }
        }
        if in_run {
            Some(text.len())
        } else {
            None
        }
    }

    fn extend(&mut self, chars: impl IntoIterator<Item = char>) {
        for c in chars {
            if !self.chars.contains(&c) {
                self.chars.push(c);
            }
        }
    }
}

/// Stateless entry point; each call to [`session`](Self::session) starts a
/// fresh accumulation.
#[derive(Debug, Clone, Default)]
pub struct SentenceExtractor {
    terminators: Terminators,
}

impl SentenceExtractor {
    pub fn new(terminators: Terminators) -> Self {
        Self { terminators }
    }

    pub fn terminators(&self) -> &Terminators {
        &self.terminators
    }

    pub fn session(&self) -> ExtractionSession<'_> {
        ExtractionSession {
            terminators: &self.terminators,
            finished: Vec::new(),
            open: None,
            after_close: false,
        }
    }

    /// Push every span and flush at the end
    pub fn extract<I>(&self, spans: I) -> Vec<Sentence>
    where
        I: IntoIterator<Item = CandidateSpan>,
    {
        let mut session = self.session();
        for span in spans {
            session.push(&span);
        }
        session.flush()
    }
}

/// Finalized sentences plus at most one open sentence
#[derive(Debug)]
pub struct ExtractionSession<'a> {
    terminators: &'a Terminators,
    finished: Vec<Sentence>,
    open: Option<Sentence>,
    /// The previous span ended exactly where a sentence closed
    after_close: bool,
}

impl<'a> ExtractionSession<'a> {
    pub fn push(&mut self, span: &CandidateSpan) {
        if span.text.is_empty() {
            return;
        }

        let mut rest = span.text.as_str();
        if self.after_close {
            // closing quotes that markup split off from their sentence
            let closers = rest
                .find(|c: char| !CLOSERS.contains(&c))
                .unwrap_or(rest.len());
            if let Some(last) = self.finished.last_mut() {
                last.content.push_str(&rest[..closers]);
            }
            rest = &rest[closers..];
            if rest.is_empty() {
                return;
            }
        }

        // Which sentence got the last piece of this span: true = open one,
        // false = last finished one.
        let mut last_target: Option<bool> = None;

        while let Some(end) = self.terminators.first_end(rest) {
            let (segment, tail) = rest.split_at(end);
            if self.merge(segment, span.line) {
                self.close();
                last_target = Some(false);
            }
            rest = tail;
        }
        let mut closed_at_end = rest.is_empty() && last_target == Some(false);

        if self.merge(rest, span.line) {
            last_target = Some(true);
            if self.open_is_terminated() {
                self.close();
                last_target = Some(false);
                closed_at_end = true;
            }
        }
        self.after_close = closed_at_end;

        if let Some(link) = &span.link {
            let target = match last_target {
                Some(true) => self.open.as_mut(),
                Some(false) => self.finished.last_mut(),
                None => None,
            };
            if let Some(sentence) = target {
                sentence.links.push(link.clone());
            }
        }
    }

    pub fn has_open_sentence(&self) -> bool {
        self.open.is_some()
    }

    /// Close the open sentence, if any, and hand over everything finalized
    pub fn flush(&mut self) -> Vec<Sentence> {
        self.close();
        self.after_close = false;
        std::mem::take(&mut self.finished)
    }

    /// Returns false when the fragment contributed nothing
    fn merge(&mut self, fragment: &str, line: usize) -> bool {
        match self.open.as_mut() {
            Some(open) => {
                if fragment.is_empty() {
                    return false;
                }
                open.content.push_str(fragment);
                true
            }
            None => {
                let trimmed = fragment.trim_start();
                if trimmed.is_empty() {
                    return false;
                }
                self.open = Some(Sentence::new(trimmed, line));
                true
            }
        }
    }

    fn open_is_terminated(&self) -> bool {
        self.open
            .as_ref()
            .map_or(false, |s| self.terminators.first_end(&s.content).is_some())
    }

    fn close(&mut self) {
        if let Some(mut sentence) = self.open.take() {
            let trimmed_len = sentence.content.trim_end().len();
            sentence.content.truncate(trimmed_len);
            if !sentence.content.is_empty() {
                self.finished.push(sentence);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn contents(sentences: &[Sentence]) -> Vec<&str> {
        sentences.iter().map(|s| s.content.as_str()).collect()
    }

    #[test]
    fn test_two_sentences_in_one_span() {
        let extractor = SentenceExtractor::default();
        let sentences = extractor.extract(vec![CandidateSpan::new(1, "A. B.")]);
        assert_eq!(contents(&sentences), vec!["A.", "B."]);
        assert!(sentences.iter().all(|s| s.line == 1));
    }

    #[test]
    fn test_sentence_spanning_inline_markup() {
        let extractor = SentenceExtractor::default();
        let sentences = extractor.extract(vec![
            CandidateSpan::new(1, "It is "),
            CandidateSpan::new(1, "bold"),
            CandidateSpan::new(1, " text."),
        ]);
        assert_eq!(contents(&sentences), vec!["It is bold text."]);
        assert_eq!(sentences[0].line, 1);
    }

    #[test]
    fn test_open_sentence_keeps_first_line() {
        let extractor = SentenceExtractor::default();
        let sentences = extractor.extract(vec![
            CandidateSpan::new(3, "This runs over"),
            CandidateSpan::new(3, " "),
            CandidateSpan::new(4, "two lines. Then"),
            CandidateSpan::new(4, " more"),
        ]);
        assert_eq!(
            contents(&sentences),
            vec!["This runs over two lines.", "Then more"]
        );
        assert_eq!(sentences[0].line, 3);
        assert_eq!(sentences[1].line, 4);
    }

    #[test]
    fn test_flush_keeps_unterminated_tail() {
        let extractor = SentenceExtractor::default();
        let mut session = extractor.session();
        session.push(&CandidateSpan::new(1, "no full stop here"));
        assert!(session.has_open_sentence());
        let sentences = session.flush();
        assert_eq!(contents(&sentences), vec!["no full stop here"]);
        assert!(!session.has_open_sentence());
    }

    #[test]
    fn test_empty_and_blank_fragments_are_ignored() {
        let extractor = SentenceExtractor::default();
        let sentences = extractor.extract(vec![
            CandidateSpan::new(1, ""),
            CandidateSpan::new(1, "   "),
            CandidateSpan::new(2, "Real."),
        ]);
        assert_eq!(contents(&sentences), vec!["Real."]);
        assert_eq!(sentences[0].line, 2);
    }

    #[test]
    fn test_link_attaches_to_receiving_sentence() {
        let extractor = SentenceExtractor::default();
        let sentences = extractor.extract(vec![
            CandidateSpan::new(1, "See "),
            CandidateSpan::with_link(1, "the docs", "https://example.com"),
            CandidateSpan::new(1, ". Next one."),
        ]);
        assert_eq!(contents(&sentences), vec!["See the docs.", "Next one."]);
        assert_eq!(sentences[0].links, vec!["https://example.com".to_string()]);
        assert!(sentences[1].links.is_empty());
    }

    #[test]
    fn test_terminator_runs_close_once() {
        let extractor = SentenceExtractor::new(Terminators::with_extra(['?', '!']));
        let sentences = extractor.extract(vec![CandidateSpan::new(1, "Really?! Yes... ok")]);
        assert_eq!(contents(&sentences), vec!["Really?!", "Yes...", "ok"]);
    }

    #[test]
    fn test_japanese_terminators() {
        let extractor = SentenceExtractor::new(Terminators::japanese());
        let sentences = extractor.extract(vec![CandidateSpan::new(1, "これは文です。次の文")]);
        assert_eq!(contents(&sentences), vec!["これは文です。", "次の文"]);
    }

    #[test]
    fn test_first_end_on_multibyte_text() {
        let terminators = Terminators::japanese();
        assert_eq!(terminators.first_end("あ。い"), Some("あ。".len()));
        assert_eq!(terminators.first_end("なし"), None);
    }

    #[test]
    fn test_inner_full_stops_do_not_split() {
        let extractor = SentenceExtractor::default();
        let sentences = extractor.extract(vec![CandidateSpan::new(
            1,
            "Pi is 3.14 and the site is example.org today. Done.",
        )]);
        assert_eq!(
            contents(&sentences),
            vec!["Pi is 3.14 and the site is example.org today.", "Done."]
        );
    }

    #[test]
    fn test_closing_quotes_and_brackets_stay_with_terminator() {
        let extractor = SentenceExtractor::default();
        let sentences = extractor.extract(vec![CandidateSpan::new(
            1,
            "He said \"Stop.\" Then he left. (See above.) Done.",
        )]);
        assert_eq!(
            contents(&sentences),
            vec!["He said \"Stop.\"", "Then he left.", "(See above.)", "Done."]
        );

        let curly = extractor.extract(vec![CandidateSpan::new(
            1,
            "She wrote \u{201C}Yes.\u{201D} It was 'final.' [Ref.] End",
        )]);
        assert_eq!(
            contents(&curly),
            vec!["She wrote \u{201C}Yes.\u{201D}", "It was 'final.'", "[Ref.]", "End"]
        );
    }

    #[test]
    fn test_closing_quote_in_next_span_joins_closed_sentence() {
        let extractor = SentenceExtractor::default();
        let sentences = extractor.extract(vec![
            CandidateSpan::new(1, "He said "),
            CandidateSpan::new(1, "\u{201C}"),
            CandidateSpan::new(1, "Stop."),
            CandidateSpan::new(1, "\u{201D}"),
            CandidateSpan::new(1, " Then he left."),
        ]);
        assert_eq!(
            contents(&sentences),
            vec!["He said \u{201C}Stop.\u{201D}", "Then he left."]
        );
    }

    #[test]
    fn test_closer_without_terminator_does_not_end_sentence() {
        let terminators = Terminators::default();
        assert_eq!(terminators.first_end("a (b) c"), None);
        assert_eq!(terminators.first_end("f(x.y) is odd"), None);
        assert_eq!(terminators.first_end("\"ok.\"x"), None);
    }

    #[test]
    fn test_full_width_terminator_keeps_closing_bracket() {
        let extractor = SentenceExtractor::new(Terminators::japanese());
        let sentences =
            extractor.extract(vec![CandidateSpan::new(1, "\u{300C}はい。\u{300D}次の文")]);
        assert_eq!(
            contents(&sentences),
            vec!["\u{300C}はい。\u{300D}", "次の文"]
        );
    }

    proptest! {
        #[test]
        fn prop_finalized_sentences_are_never_empty(
            fragments in proptest::collection::vec("[a-z .]{0,12}", 0..8)
        ) {
            let extractor = SentenceExtractor::default();
            let spans = fragments
                .into_iter()
                .enumerate()
                .map(|(i, text)| CandidateSpan::new(i + 1, text));
            for sentence in extractor.extract(spans) {
                prop_assert!(!sentence.content.trim().is_empty());
                prop_assert_eq!(sentence.content.trim_end(), sentence.content.as_str());
            }
        }

        #[test]
        fn prop_non_whitespace_text_is_preserved(
            fragments in proptest::collection::vec("[a-z .]{0,12}", 0..8)
        ) {
            let extractor = SentenceExtractor::default();
            let expected: String = fragments.concat().chars().filter(|c| !c.is_whitespace()).collect();
            let spans = fragments.into_iter().map(|text| CandidateSpan::new(1, text));
            let joined: String = extractor
                .extract(spans)
                .iter()
                .flat_map(|s| s.content.chars())
                .filter(|c| !c.is_whitespace())
                .collect();
            prop_assert_eq!(joined, expected);
        }
    }
}
