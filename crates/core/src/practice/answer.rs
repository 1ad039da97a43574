/// Normalizes an answer for comparison: surrounding whitespace trimmed, case folded.
#[must_use]
pub fn normalize_answer(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Interprets raw answer bytes as text.
///
/// Input that is not valid UTF-8 counts as an empty answer.
#[must_use]
pub fn answer_from_bytes(raw: &[u8]) -> &str {
    std::str::from_utf8(raw).unwrap_or_default()
}

/// How a single submission was graded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnswerOutcome {
    /// Answer matched; the cursor advances.
    Correct,
    /// First miss on this word; the same word is asked again.
    IncorrectRetry { hint: String },
    /// Second miss; the word is recorded as missed and the cursor advances.
    IncorrectFinal { answer: String },
}

impl AnswerOutcome {
    /// Grades `raw` against `expected` given how many misses the word already has.
    #[must_use]
    pub fn grade(expected: &str, raw: &str, retry_count: u8) -> Self {
        let expected_norm = normalize_answer(expected);
        if normalize_answer(raw) == expected_norm {
            return Self::Correct;
        }
        if retry_count == 0 {
            let hint = expected_norm.chars().next().map(String::from).unwrap_or_default();
            Self::IncorrectRetry { hint }
        } else {
            Self::IncorrectFinal {
                answer: expected.to_owned(),
            }
        }
    }

    #[must_use]
    pub fn is_correct(&self) -> bool {
        matches!(self, Self::Correct)
    }

    /// Whether this outcome moves the cursor to the next word.
    #[must_use]
    pub fn advances(&self) -> bool {
        !matches!(self, Self::IncorrectRetry { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalization_ignores_case_and_padding() {
        for raw in ["Ola", " ola ", "OLA", "\tola\n"] {
            assert_eq!(AnswerOutcome::grade("ola", raw, 0), AnswerOutcome::Correct);
        }
    }

    #[test]
    fn expected_answer_is_normalized_too() {
        assert_eq!(AnswerOutcome::grade("  Gato ", "gato", 1), AnswerOutcome::Correct);
    }

    #[test]
    fn first_miss_gives_hint_from_normalized_answer() {
        let outcome = AnswerOutcome::grade(" Ola", "wrong", 0);
        assert_eq!(
            outcome,
            AnswerOutcome::IncorrectRetry {
                hint: "o".into()
            }
        );
        assert!(!outcome.advances());
    }

    #[test]
    fn second_miss_reveals_stored_answer() {
        let outcome = AnswerOutcome::grade("Ola", "y", 1);
        assert_eq!(
            outcome,
            AnswerOutcome::IncorrectFinal {
                answer: "Ola".into()
            }
        );
        assert!(outcome.advances());
    }

    #[test]
    fn hint_handles_multibyte_first_char() {
        let outcome = AnswerOutcome::grade("Élan", "x", 0);
        assert_eq!(
            outcome,
            AnswerOutcome::IncorrectRetry {
                hint: "é".into()
            }
        );
    }

    #[test]
    fn invalid_utf8_is_an_empty_answer() {
        assert_eq!(answer_from_bytes(&[0xff, 0xfe]), "");
        assert_eq!(answer_from_bytes(b"gato"), "gato");
        assert_eq!(
            AnswerOutcome::grade("gato", answer_from_bytes(&[0xc3]), 0),
            AnswerOutcome::IncorrectRetry {
                hint: "g".into()
            }
        );
    }
}
