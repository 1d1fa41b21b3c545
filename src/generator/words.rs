use rand::SeedableRng;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;

use crate::generator::TextGenerator;
use crate::generator::dictionary::Dictionary;

/// Random words from the dictionary, joined by single spaces.
pub struct WordGenerator {
    dictionary: Dictionary,
    rng: SmallRng,
}

impl WordGenerator {
    pub fn new(dictionary: Dictionary) -> Self {
        Self::with_rng(dictionary, SmallRng::from_entropy())
    }

    pub fn with_rng(dictionary: Dictionary, rng: SmallRng) -> Self {
        Self { dictionary, rng }
    }
}

impl TextGenerator for WordGenerator {
    fn generate(&mut self, word_count: usize) -> String {
        let words = self.dictionary.words();
        let mut picked: Vec<&str> = Vec::with_capacity(word_count);
        let mut last: Option<&str> = None;
        while picked.len() < word_count {
            let Some(word) = words.choose(&mut self.rng).map(String::as_str) else {
                break;
            };
            // Avoid the same word twice in a row when there is a choice.
            if words.len() > 1 && last == Some(word) {
                continue;
            }
            picked.push(word);
            last = Some(word);
        }
        picked.join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded(words: &[&str]) -> WordGenerator {
        let dictionary = Dictionary::from_words(words.iter().map(|w| w.to_string()).collect());
        WordGenerator::with_rng(dictionary, SmallRng::seed_from_u64(7))
    }

    #[test]
    fn test_generates_requested_word_count() {
        let mut generator = WordGenerator::new(Dictionary::load());
        let text = generator.generate(12);
        assert_eq!(text.split(' ').count(), 12);
        assert!(!text.contains("  "));
    }

    #[test]
    fn test_zero_words_is_empty() {
        assert_eq!(seeded(&["alpha", "beta"]).generate(0), "");
    }

    #[test]
    fn test_no_immediate_repeats() {
        let text = seeded(&["ab", "cd"]).generate(50);
        let words: Vec<&str> = text.split(' ').collect();
        assert!(words.windows(2).all(|w| w[0] != w[1]));
    }

    #[test]
    fn test_single_word_dictionary_repeats() {
        assert_eq!(seeded(&["solo"]).generate(3), "solo solo solo");
    }

    #[test]
    fn test_empty_dictionary_yields_empty_text() {
        assert_eq!(seeded(&[]).generate(5), "");
    }
}
