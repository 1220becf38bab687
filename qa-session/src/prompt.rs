//! Prompt builder: short system message + compact context and history blocks.

use crate::history::Turn;
use chunk_store::ChunkHit;

/// Default system instructions for grounded answers.
///
/// Keep this short: it consistently improves steering without wasting tokens.
pub const DEFAULT_SYSTEM: &str = r#"
You are a precise assistant answering questions over a private knowledge base.
Use the provided context as ground truth; if it is insufficient, say so.
"#;

/// Placeholder emitted when the conversation has no prior turns.
pub(crate) const NO_HISTORY: &str = "no prior conversation";

/// Canned user-facing answer when the model call fails.
pub(crate) const FALLBACK_ANSWER: &str =
    "I'm sorry, I couldn't generate an answer right now. Please try again in a moment.";

/// Build the final user prompt: labeled context section (char budget),
/// recent history, then the question.
///
/// Context chunks are joined by a blank line, preserving the ranking order.
/// History is rendered as alternating speaker-labeled lines, oldest-first;
/// an empty history renders the fixed placeholder instead.
pub fn build_user_prompt<'a>(
    question: &str,
    hits: &[ChunkHit],
    history: impl Iterator<Item = &'a Turn>,
    max_ctx_chars: usize,
) -> String {
    let mut out = String::new();

    out.push_str("Context:\n");
    if hits.is_empty() {
        out.push_str("(no matching documents)\n");
    } else {
        let mut budget = max_ctx_chars;
        for (i, h) in hits.iter().enumerate() {
            let text = h.content.trim();
            if i > 0 {
                out.push('\n');
            }
            if text.len() > budget {
                out.push_str(safe_truncate(text, budget));
                out.push('\n');
                break;
            }
            out.push_str(text);
            out.push('\n');
            budget -= text.len();
        }
    }
    out.push('\n');

    out.push_str("Conversation so far:\n");
    let mut any = false;
    for turn in history {
        for (speaker, text) in turn.messages() {
            out.push_str(speaker.label());
            out.push_str(": ");
            out.push_str(text);
            out.push('\n');
        }
        any = true;
    }
    if !any {
        out.push_str(NO_HISTORY);
        out.push('\n');
    }
    out.push('\n');

    out.push_str("Question:\n");
    out.push_str(question.trim());
    out.push('\n');
    out.push('\n');
    out.push_str("Answer using only the context above when possible.\n");

    out
}

fn safe_truncate(s: &str, max: usize) -> &str {
    if s.len() <= max {
        s
    } else {
        let mut end = max;
        while end > 0 && !s.is_char_boundary(end) {
            end -= 1;
        }
        &s[..end]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::ConversationLog;

    fn hit(content: &str, source: &str) -> ChunkHit {
        ChunkHit {
            score: 0.5,
            content: content.to_string(),
            source: source.to_string(),
        }
    }

    #[test]
    fn empty_history_uses_placeholder() {
        let log = ConversationLog::default();
        let p = build_user_prompt("why?", &[], log.recent(3), 2000);
        assert!(p.contains(NO_HISTORY));
        assert!(p.contains("Question:\nwhy?"));
    }

    #[test]
    fn context_chunks_joined_with_blank_line() {
        let log = ConversationLog::default();
        let hits = [hit("first chunk", "a.txt"), hit("second chunk", "a.txt")];
        let p = build_user_prompt("q", &hits, log.recent(3), 2000);
        assert!(p.contains("first chunk\n\nsecond chunk"));
    }

    #[test]
    fn history_lines_alternate_labels_oldest_first() {
        let mut log = ConversationLog::default();
        log.append(Turn {
            question: "older q".into(),
            answer: "older a".into(),
        });
        log.append(Turn {
            question: "newer q".into(),
            answer: "newer a".into(),
        });
        let p = build_user_prompt("q", &[], log.recent(3), 2000);
        let older = p.find("User: older q").unwrap();
        let older_a = p.find("Assistant: older a").unwrap();
        let newer = p.find("User: newer q").unwrap();
        assert!(older < older_a && older_a < newer);
        assert!(!p.contains(NO_HISTORY));
    }

    #[test]
    fn context_respects_char_budget() {
        let log = ConversationLog::default();
        let hits = [hit(&"x".repeat(100), "a.txt"), hit("never shown", "a.txt")];
        let p = build_user_prompt("q", &hits, log.recent(3), 40);
        assert!(!p.contains("never shown"));
        assert!(p.contains(&"x".repeat(40)));
        assert!(!p.contains(&"x".repeat(41)));
    }
}
