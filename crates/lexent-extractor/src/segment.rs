//! Text segmentation
//!
//! Splits raw text into trimmed, bounded chunks on sentence ends,
//! semicolons and line breaks. Chunks borrow from the input and the
//! iterator is `Clone`, so a segmentation can be replayed cheaply.

/// Words whose trailing period does not end a sentence
const ABBREVIATIONS: &[&str] = &[
    "mr", "mrs", "ms", "dr", "smt", "shri", "sh", "m/s", "pvt", "no", "st", "jr", "sr", "messrs",
    "kum", "late",
];

/// Legal suffixes that often close a sentence ("... works at Tata Steel Ltd.")
///
/// Their period is a boundary unless the next word is lowercase or another
/// suffix ("Kapoor & Co. Ltd.").
const SUFFIX_ABBREVIATIONS: &[&str] = &["ltd", "co", "corp", "inc", "llp"];

/// Segment `text` into chunks of at most `max_chars` characters
///
/// A `max_chars` of zero disables the length bound.
pub fn segment(text: &str, max_chars: usize) -> Segments<'_> {
    Segments {
        rest: text,
        overflow: "",
        max_chars,
    }
}

/// Lazy iterator over the chunks of a text
#[derive(Debug, Clone)]
pub struct Segments<'a> {
    /// Text not yet scanned for a boundary
    rest: &'a str,
    /// Remainder of a sentence longer than `max_chars`
    overflow: &'a str,
    max_chars: usize,
}

impl<'a> Iterator for Segments<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        loop {
            if !self.overflow.is_empty() {
                let (head, tail) = bound(self.overflow, self.max_chars);
                self.overflow = tail;
                if !head.is_empty() {
                    return Some(head);
                }
                continue;
            }

            if self.rest.is_empty() {
                return None;
            }

            let end = sentence_end(self.rest);
            let (sentence, rest) = self.rest.split_at(end);
            self.rest = rest;
            self.overflow = sentence.trim_matches(|c: char| c.is_whitespace() || c == ';');
        }
    }
}

/// Byte offset just past the first sentence boundary in `text`
fn sentence_end(text: &str) -> usize {
    let mut chars = text.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        let at_break = chars.peek().map_or(true, |(_, next)| next.is_whitespace());
        match c {
            '\n' | ';' => return i + c.len_utf8(),
            '!' | '?' if at_break => return i + 1,
            '.' if at_break && !is_abbreviation(&text[..i], &text[i + 1..]) => return i + 1,
            _ => {}
        }
    }

    text.len()
}

/// Whether the word ending at the end of `before` is an abbreviation
/// rather than the last word of a sentence; `after` follows its period
fn is_abbreviation(before: &str, after: &str) -> bool {
    let word = before
        .rsplit(char::is_whitespace)
        .next()
        .unwrap_or("")
        .trim_start_matches(|c: char| !c.is_alphanumeric());

    if word.is_empty() {
        return false;
    }

    // Initials ("R. K. Sharma") and dotted forms ("U.P."), but not dates
    let alphabetic = word.chars().any(char::is_alphabetic);
    if alphabetic && (word.contains('.') || word.chars().count() == 1) {
        return true;
    }

    let lower = word.to_lowercase();
    if SUFFIX_ABBREVIATIONS.contains(&lower.as_str()) {
        return sentence_continues(after);
    }
    ABBREVIATIONS.contains(&lower.as_str())
}

/// The next word is lowercase or another legal suffix
fn sentence_continues(after: &str) -> bool {
    let next = after
        .split_whitespace()
        .next()
        .unwrap_or("")
        .trim_matches(|c: char| !c.is_alphanumeric());

    let Some(first) = next.chars().next() else {
        return false;
    };
    first.is_lowercase() || SUFFIX_ABBREVIATIONS.contains(&next.to_lowercase().as_str())
}

/// Split off a head of at most `max_chars` characters, breaking on whitespace
fn bound(text: &str, max_chars: usize) -> (&str, &str) {
    if max_chars == 0 {
        return (text, "");
    }

    let Some((limit, ch)) = text.char_indices().nth(max_chars) else {
        return (text, "");
    };

    let cut = text[..limit + ch.len_utf8()]
        .rfind(char::is_whitespace)
        .filter(|&pos| pos > 0)
        .or_else(|| text[limit..].find(char::is_whitespace).map(|pos| limit + pos));

    match cut {
        Some(pos) => (text[..pos].trim_end(), text[pos..].trim_start()),
        None => (text, ""),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunks(text: &str, max_chars: usize) -> Vec<&str> {
        segment(text, max_chars).collect()
    }

    #[test]
    fn test_sentence_split() {
        let text = "The deponent is Anita Verma. She resides in Pune!\nWitness: Rajesh Sharma";
        assert_eq!(
            chunks(text, 0),
            vec![
                "The deponent is Anita Verma.",
                "She resides in Pune!",
                "Witness: Rajesh Sharma"
            ]
        );
    }

    #[test]
    fn test_semicolons_and_blank_lines() {
        let text = "first clause; second clause\n\n   \n;;third";
        assert_eq!(chunks(text, 0), vec!["first clause", "second clause", "third"]);
    }

    #[test]
    fn test_abbreviations_do_not_split() {
        let text = "Notice served on Mr. R. K. Sharma of M/s. Bharat Cement Pvt. Ltd. on 1.5.2023 today.";
        assert_eq!(chunks(text, 0), vec![text]);
    }

    #[test]
    fn test_legal_suffix_ends_sentence() {
        let text = "The deponent works at Tata Steel Ltd. Rajesh Sharma signed the notice.";
        assert_eq!(
            chunks(text, 0),
            vec![
                "The deponent works at Tata Steel Ltd.",
                "Rajesh Sharma signed the notice."
            ]
        );
    }

    #[test]
    fn test_legal_suffix_inside_sentence() {
        let text = "Goods from M/s. Kapoor & Co. Ltd. were received by Anand Exports Inc. in March.";
        assert_eq!(chunks(text, 0), vec![text]);
    }

    #[test]
    fn test_date_ends_sentence() {
        let text = "Order dated 12.03.2023. Next hearing fixed.";
        assert_eq!(
            chunks(text, 0),
            vec!["Order dated 12.03.2023.", "Next hearing fixed."]
        );
    }

    #[test]
    fn test_empty_input() {
        assert!(chunks("", 100).is_empty());
        assert!(chunks(" \n\t ; ", 100).is_empty());
    }

    #[test]
    fn test_bounded_chunks() {
        let text = "alpha beta gamma delta epsilon";
        let parts = chunks(text, 11);
        assert_eq!(parts, vec!["alpha beta", "gamma delta", "epsilon"]);
        assert!(parts.iter().all(|p| p.chars().count() <= 11));
    }

    #[test]
    fn test_overlong_token_kept_whole() {
        let text = "abcdefghijklmnop qr";
        assert_eq!(chunks(text, 5), vec!["abcdefghijklmnop", "qr"]);
    }

    #[test]
    fn test_restartable() {
        let segments = segment("One. Two. Three.", 0);
        let first: Vec<_> = segments.clone().collect();
        let second: Vec<_> = segments.collect();
        assert_eq!(first, second);
        assert_eq!(first.len(), 3);
    }
}
