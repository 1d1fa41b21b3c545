pub mod dictionary;
pub mod words;

pub trait TextGenerator {
    fn generate(&mut self, word_count: usize) -> String;
}
