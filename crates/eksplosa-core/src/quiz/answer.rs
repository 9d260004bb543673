//! Answer checking for word-ordering questions.
//!
//! The submitted words are joined with single spaces and compared with the
//! correct sentence after lowercasing both sides. Order matters; there is no
//! partial credit.

use crate::model::Question;

fn fold(words: impl IntoIterator<Item = impl AsRef<str>>) -> String {
    words
        .into_iter()
        .map(|w| w.as_ref().to_lowercase())
        .collect::<Vec<_>>()
        .join(" ")
}

/// True when `selected` spells the correct answer of `question` in order.
pub fn is_correct(question: &Question, selected: &[String]) -> bool {
    if selected.len() != question.answer_len() {
        return false;
    }
    fold(selected.iter().flat_map(|w| w.split_whitespace())) == fold(question.answer_tokens())
}
