//! Question sampling
//!
//! Picks the session's question set from the knowledge base: a uniform
//! sample without replacement when the bank is larger than the target
//! length, the whole bank in file order otherwise.

use rand::seq::SliceRandom;

use crate::models::question::Question;

/// Sample `length` questions from the bank without repeats.
pub fn sample_questions(bank: &[Question], length: usize) -> Vec<Question> {
    if bank.len() <= length {
        return bank.to_vec();
    }

    let mut rng = rand::thread_rng();
    bank.choose_multiple(&mut rng, length).cloned().collect()
}
