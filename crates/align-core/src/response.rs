//! Response templates.
//!
//! The engine does not generate language. It picks one of a small set of
//! templates by path, tone and, for refusals, the principle most at stake.
//!
//! | Situation | Template |
//! |-----------|----------|
//! | fast, decision question | decision |
//! | fast, "why"/"how" | explanation |
//! | fast, "what"/"who"/"when"/"where" | factual |
//! | fast, anything else | statement |
//! | deep, refusal | principle-specific refusal |
//! | deep, cautious | cautious |
//! | deep, normal | normal |

use align_signals::PrincipleKey;

use crate::record::ResponseTone;

const CLARIFICATION: &str =
    "I could not find a request to evaluate. Could you rephrase it in a sentence or two?";

const FALLBACK: &str = "This request needs careful consideration and I cannot assess it reliably right now. \
     Please treat any answer with caution, or give me more context.";

const EXPLANATION_WORDS: &[&str] = &["warum", "wieso", "weshalb", "wie", "why", "how"];
const FACTUAL_WORDS: &[&str] = &[
    "was", "wer", "wann", "wo", "welche", "what", "who", "when", "where", "which",
];
const DECISION_PHRASES: &[&str] = &["soll ich", "sollte ich", "should i", "shall i"];

/// Kind of fast-path request, judged by its first words.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum QuestionKind {
    Decision,
    Explanation,
    Factual,
    Statement,
}

fn question_kind(text: &str) -> QuestionKind {
    let lower = text.trim().to_lowercase();
    if DECISION_PHRASES.iter().any(|p| lower.starts_with(p)) {
        return QuestionKind::Decision;
    }
    let first = lower
        .split(|c: char| !c.is_alphanumeric())
        .find(|w| !w.is_empty())
        .unwrap_or_default();
    if EXPLANATION_WORDS.contains(&first) {
        QuestionKind::Explanation
    } else if FACTUAL_WORDS.contains(&first) {
        QuestionKind::Factual
    } else {
        QuestionKind::Statement
    }
}

/// First `max_chars` characters of the trimmed text, with an ellipsis if cut.
pub fn snippet(text: &str, max_chars: usize) -> String {
    let text = text.trim();
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

/// Template response for a fast-path request.
pub fn fast_response(text: &str, max_chars: usize) -> String {
    let quoted = snippet(text, max_chars);
    match question_kind(text) {
        QuestionKind::Decision => format!(
            "For \"{quoted}\" the decision is yours. I am happy to lay out the options."
        ),
        QuestionKind::Explanation => format!("Here is a short explanation for \"{quoted}\"."),
        QuestionKind::Factual => format!("Here is what I know about \"{quoted}\"."),
        QuestionKind::Statement => format!("Understood: \"{quoted}\". How can I help with that?"),
    }
}

/// Template response for a deep-path request.
pub fn deep_response(
    text: &str,
    max_chars: usize,
    tone: ResponseTone,
    main_violation: Option<PrincipleKey>,
) -> String {
    let quoted = snippet(text, max_chars);
    match tone {
        ResponseTone::Refusal => {
            let reason = match main_violation {
                Some(PrincipleKey::Integrity) => {
                    "Honesty is one of my core principles, and I cannot assist with deception."
                }
                Some(PrincipleKey::Nurturing) | Some(PrincipleKey::Awareness) => {
                    "I do not want to contribute to anyone being harmed."
                }
                Some(PrincipleKey::Governance) => {
                    "That would undermine oversight and control, which I want to keep intact."
                }
                Some(PrincipleKey::Learning) => {
                    "That would take away a decision that should stay with you."
                }
                None => "That conflicts with my ethical principles.",
            };
            format!("Sorry, I cannot help with \"{quoted}\". {reason} Can I help you find an alternative?")
        }
        ResponseTone::Cautious => format!(
            "\"{quoted}\" touches on ethical concerns. I will answer carefully and point out what to weigh."
        ),
        ResponseTone::Normal => format!("I looked at \"{quoted}\" carefully and see no ethical concerns."),
        ResponseTone::Clarification => clarification().to_string(),
    }
}

/// Response for empty or unreadable input.
pub fn clarification() -> &'static str {
    CLARIFICATION
}

/// Response for a failed deep path.
pub fn fallback() -> &'static str {
    FALLBACK
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snippet_is_char_safe() {
        let text = "ä".repeat(60);
        let cut = snippet(&text, 50);
        assert_eq!(cut.chars().count(), 53);
        assert!(cut.ends_with("..."));
        assert_eq!(snippet("  kurz  ", 50), "kurz");
    }

    #[test]
    fn test_question_kinds() {
        assert_eq!(question_kind("Soll ich gehen?"), QuestionKind::Decision);
        assert_eq!(question_kind("Warum ist der Himmel blau?"), QuestionKind::Explanation);
        assert_eq!(question_kind("Wie spät ist es?"), QuestionKind::Explanation);
        assert_eq!(question_kind("Wer war Kant?"), QuestionKind::Factual);
        assert_eq!(question_kind("Mach das Licht an"), QuestionKind::Statement);
        assert_eq!(question_kind("???"), QuestionKind::Statement);
    }

    #[test]
    fn test_fast_response_quotes_request() {
        let response = fast_response("Wer war Kant?", 50);
        assert!(response.contains("\"Wer war Kant?\""));
    }

    #[test]
    fn test_refusal_names_principle() {
        let text = deep_response("lügen", 50, ResponseTone::Refusal, Some(PrincipleKey::Integrity));
        assert!(text.contains("Honesty"));
        let text = deep_response("x", 50, ResponseTone::Refusal, None);
        assert!(text.contains("ethical principles"));
    }
}
