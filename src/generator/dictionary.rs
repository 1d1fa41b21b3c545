const WORDS_EN: &str = include_str!("../../assets/words-en.json");

pub struct Dictionary {
    words: Vec<String>,
}

impl Dictionary {
    pub fn load() -> Self {
        let words: Vec<String> = serde_json::from_str(WORDS_EN).unwrap_or_default();
        Self::from_words(words)
    }

    /// Keep lowercase ASCII words of two letters or more.
    pub fn from_words(words: Vec<String>) -> Self {
        let words = words
            .into_iter()
            .filter(|w| w.len() >= 2 && w.chars().all(|c| c.is_ascii_lowercase()))
            .collect();
        Self { words }
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}
