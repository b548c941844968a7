use regex::Regex;
use std::collections::BTreeMap;
use std::sync::OnceLock;

const STOP_WORDS: &[&str] = &[
    "the", "a", "an", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "as", "by",
    "from", "up", "about", "into", "through", "i", "you", "he", "she", "it", "we", "they", "my",
    "your", "his", "her", "its", "our", "their", "me", "him", "us", "them", "is", "am", "are",
    "was", "were", "be", "been", "being", "have", "has", "had", "do", "does", "did", "will",
    "would", "should", "could", "may", "might", "must", "can", "that", "this", "these", "those",
    "what", "which", "who", "when", "where", "why", "how", "if", "so", "then", "all", "u", "ur",
];

fn emoji_re() -> &'static Regex {
    static EMOJI_RE: OnceLock<Regex> = OnceLock::new();
    EMOJI_RE.get_or_init(|| Regex::new(r"\p{Emoji}").expect("valid emoji regex"))
}

fn non_word_re() -> &'static Regex {
    static NON_WORD_RE: OnceLock<Regex> = OnceLock::new();
    NON_WORD_RE.get_or_init(|| Regex::new(r"[^\p{L}\p{N}]").expect("valid non-word regex"))
}

fn letter_re() -> &'static Regex {
    static LETTER_RE: OnceLock<Regex> = OnceLock::new();
    LETTER_RE.get_or_init(|| Regex::new(r"\p{L}").expect("valid letter regex"))
}

/// Words in a message body, split on single spaces (so runs of spaces and
/// an empty body still count as words).
pub fn word_count(body: &str) -> usize {
    body.split(' ').count()
}

/// Adds the words and emoji of one message body to `frequency`.
///
/// Emoji are counted one code point at a time, digits excluded. Words are
/// lowercased, stripped down to letters and digits, and kept only if they
/// contain a letter and are not stop words.
pub fn tally_words(body: &str, frequency: &mut BTreeMap<String, usize>) {
    for original in body.split(' ') {
        for emoji in emoji_re().find_iter(original) {
            let emoji = emoji.as_str();
            if emoji.contains('\u{FE0F}') || emoji.contains('\u{20E3}') {
                continue;
            }
            if emoji.chars().all(|c| c.is_ascii_digit()) {
                continue;
            }
            *frequency.entry(emoji.to_string()).or_insert(0) += 1;
        }

        let word = non_word_re()
            .replace_all(&original.to_lowercase(), "")
            .into_owned();
        if word.is_empty() {
            continue;
        }

        if letter_re().is_match(&word) && !STOP_WORDS.contains(&word.as_str()) {
            *frequency.entry(word).or_insert(0) += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tally(bodies: &[&str]) -> BTreeMap<String, usize> {
        let mut frequency = BTreeMap::new();
        for body in bodies {
            tally_words(body, &mut frequency);
        }
        frequency
    }

    #[test]
    fn test_word_count_splits_on_single_spaces() {
        assert_eq!(word_count("hi there"), 2);
        assert_eq!(word_count("hi  there"), 3);
        assert_eq!(word_count(""), 1);
    }

    #[test]
    fn test_stop_words_and_punctuation() {
        let frequency = tally(&["The hike was GREAT!", "great, let's go"]);

        assert_eq!(frequency.get("great"), Some(&2));
        assert_eq!(frequency.get("hike"), Some(&1));
        assert_eq!(frequency.get("lets"), Some(&1));
        assert_eq!(frequency.get("go"), Some(&1));
        assert!(!frequency.contains_key("the"));
        assert!(!frequency.contains_key("was"));
    }

    #[test]
    fn test_numbers_need_a_letter() {
        let frequency = tally(&["meet at 7 or 7pm"]);
        assert!(!frequency.contains_key("7"));
        assert_eq!(frequency.get("7pm"), Some(&1));
    }

    #[test]
    fn test_emoji_counted_separately() {
        let frequency = tally(&["coffee☕ sounds good 😀😀"]);

        assert_eq!(frequency.get("😀"), Some(&2));
        assert_eq!(frequency.get("☕"), Some(&1));
        assert_eq!(frequency.get("coffee"), Some(&1));
        assert_eq!(frequency.get("sounds"), Some(&1));
    }

    #[test]
    fn test_non_latin_letters_kept() {
        let frequency = tally(&["Café ¿qué tal?"]);
        assert_eq!(frequency.get("café"), Some(&1));
        assert_eq!(frequency.get("qué"), Some(&1));
    }
}
