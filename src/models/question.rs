use serde::{Deserialize, Serialize};

/// One interview question from the knowledge base
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    pub id: String,
    pub topic: String,
    pub difficulty: Difficulty,
    /// Prompt text shown to the candidate
    pub question: String,
    /// Scoring guideline handed to the evaluator
    pub rubric: String,
    /// Shown when a weak answer earns a second attempt
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

/// Difficulty label carried by every question
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Basic,
    Intermediate,
    Advanced,
}

/// Rank table for sorting and display, keyed by the serialized label
static DIFFICULTY_RANKS: phf::Map<&'static str, u8> = phf::phf_map! {
    "basic" => 1,
    "intermediate" => 2,
    "advanced" => 3,
};

impl Difficulty {
    pub fn label(&self) -> &'static str {
        match self {
            Difficulty::Basic => "basic",
            Difficulty::Intermediate => "intermediate",
            Difficulty::Advanced => "advanced",
        }
    }

    pub fn rank(&self) -> u8 {
        DIFFICULTY_RANKS.get(self.label()).copied().unwrap_or(0)
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// The evaluator's verdict on one answer
///
/// Scores run 1..=5 per the rubric; 0 is reserved for answers whose
/// evaluation failed outright.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Evaluation {
    #[serde(deserialize_with = "deserialize_score")]
    pub score: u8,
    pub justification: String,
}

impl Evaluation {
    /// Placeholder evaluation recorded when the API call fails, so the
    /// session can continue and the report still covers the answer.
    pub fn failed(reason: &str) -> Self {
        Self {
            score: 0,
            justification: format!("Error during evaluation. Details: {}", reason),
        }
    }
}

// Models return the score as either a JSON number or a numeric string.
fn deserialize_score<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::Visitor;
    use std::fmt;

    struct ScoreVisitor;

    impl<'de> Visitor<'de> for ScoreVisitor {
        type Value = u8;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a number or numeric string between 0 and 5")
        }

        fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(value.min(5) as u8)
        }

        fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(value.clamp(0, 5) as u8)
        }

        fn visit_f64<E>(self, value: f64) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(value.clamp(0.0, 5.0).round() as u8)
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            value
                .trim()
                .parse::<f64>()
                .map(|v| v.clamp(0.0, 5.0).round() as u8)
                .map_err(|_| E::custom(format!("not a numeric score: {value:?}")))
        }
    }

    deserializer.deserialize_any(ScoreVisitor)
}

/// One answered question: the question, the candidate's answer, and the
/// evaluator's verdict. Exactly one evaluation per accepted answer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerRecord {
    pub question: Question,
    pub answer: String,
    pub evaluation: Evaluation,
}

/// Running statistics for a session
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionStats {
    pub answered: usize,
    pub total: usize,
    pub average_score: f64,
}

impl SessionStats {
    pub fn from_records(records: &[AnswerRecord], total: usize) -> Self {
        let answered = records.len();
        let average_score = if answered == 0 {
            0.0
        } else {
            records.iter().map(|r| r.evaluation.score as f64).sum::<f64>() / answered as f64
        };
        Self {
            answered,
            total,
            average_score,
        }
    }
}

impl std::fmt::Display for SessionStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "question {}/{}, average {:.2}/5.0",
            self.answered, self.total, self.average_score
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn question_deserializes_from_bank_json() {
        let json = r#"{
            "id": "xl-001",
            "topic": "lookup functions",
            "difficulty": "intermediate",
            "question": "Explain the difference between VLOOKUP and INDEX/MATCH.",
            "rubric": "Full marks for naming the left-column limitation and column fragility of VLOOKUP.",
            "hint": "Think about what happens when you insert a column."
        }"#;

        let q: Question = serde_json::from_str(json).unwrap();
        assert_eq!(q.id, "xl-001");
        assert_eq!(q.difficulty, Difficulty::Intermediate);
        assert_eq!(q.difficulty.rank(), 2);
        assert!(q.hint.is_some());
    }

    #[test]
    fn hint_is_optional() {
        let json = r#"{
            "id": "xl-002",
            "topic": "pivot tables",
            "difficulty": "basic",
            "question": "What is a pivot table used for?",
            "rubric": "Mentions summarizing/aggregating data."
        }"#;

        let q: Question = serde_json::from_str(json).unwrap();
        assert!(q.hint.is_none());
    }

    #[test]
    fn score_accepts_number_and_string() {
        let from_number: Evaluation =
            serde_json::from_str(r#"{"score": 4, "justification": "solid"}"#).unwrap();
        assert_eq!(from_number.score, 4);

        let from_string: Evaluation =
            serde_json::from_str(r#"{"score": "4", "justification": "solid"}"#).unwrap();
        assert_eq!(from_string.score, 4);

        let from_float: Evaluation =
            serde_json::from_str(r#"{"score": 3.6, "justification": "ok"}"#).unwrap();
        assert_eq!(from_float.score, 4);
    }

    #[test]
    fn out_of_range_scores_clamp_to_the_band() {
        let high: Evaluation =
            serde_json::from_str(r#"{"score": 11, "justification": "overshoot"}"#).unwrap();
        assert_eq!(high.score, 5);

        let negative: Evaluation =
            serde_json::from_str(r#"{"score": -2, "justification": "undershoot"}"#).unwrap();
        assert_eq!(negative.score, 0);
    }

    #[test]
    fn stats_average_over_recorded_answers() {
        let question: Question = serde_json::from_str(
            r#"{"id":"q","topic":"t","difficulty":"basic","question":"?","rubric":"r"}"#,
        )
        .unwrap();
        let records: Vec<AnswerRecord> = [5, 2]
            .iter()
            .map(|&score| AnswerRecord {
                question: question.clone(),
                answer: "a".to_string(),
                evaluation: Evaluation {
                    score,
                    justification: String::new(),
                },
            })
            .collect();

        let stats = SessionStats::from_records(&records, 3);
        assert_eq!(stats.answered, 2);
        assert_eq!(stats.total, 3);
        assert!((stats.average_score - 3.5).abs() < f64::EPSILON);
    }

    #[test]
    fn empty_session_has_zero_average() {
        let stats = SessionStats::from_records(&[], 3);
        assert_eq!(stats.average_score, 0.0);
    }
}
