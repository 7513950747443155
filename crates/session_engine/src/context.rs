//! Context assembly
//!
//! Pure functions rendering the material handed to the knowledge backend:
//! profile block first, then the ordered transcript, then the
//! operation-specific instruction. Deterministic for identical inputs so
//! every template is testable without a live backend.

use session_core::{Speaker, Turn};

/// Rendered material for one generation call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub context: String,
    pub instruction: String,
}

fn render_profile(profile_name: &str, portrait: &str) -> String {
    format!("Customer: {}\nCustomer portrait:\n{}", profile_name, portrait)
}

fn render_transcript(turns: &[Turn]) -> String {
    turns
        .iter()
        .map(|turn| {
            let label = match turn.speaker {
                Speaker::User => "User",
                Speaker::Assistant => "Assistant",
            };
            format!("{}: {}", label, turn.text)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Context for answering a question during an active discussion.
pub fn answer_request(
    profile_name: &str,
    portrait: &str,
    turns: &[Turn],
    question: &str,
) -> GenerationRequest {
    let mut context = render_profile(profile_name, portrait);
    if !turns.is_empty() {
        context.push_str("\n\nDiscussion so far:\n");
        context.push_str(&render_transcript(turns));
    }

    GenerationRequest {
        context,
        instruction: format!(
            "You are assisting the team with an objective analysis of this \
             customer. Using the portrait (personality, priorities, current \
             allocations) and the discussion so far, answer concisely and \
             impartially, without preamble: {}",
            question
        ),
    }
}

/// Context for summarizing a finished discussion.
pub fn summary_request(profile_name: &str, portrait: &str, turns: &[Turn]) -> GenerationRequest {
    let mut context = render_profile(profile_name, portrait);
    context.push_str("\n\nFull discussion transcript:\n");
    context.push_str(&render_transcript(turns));

    GenerationRequest {
        context,
        instruction: "Condense the entire discussion, questions, answers and \
                      team remarks alike, into a bullet-point recap of the \
                      team's findings, key open issues, and conclusions."
            .to_string(),
    }
}

/// Context for revising a pending draft summary in place.
pub fn revision_request(draft: &str, instruction: &str) -> GenerationRequest {
    GenerationRequest {
        context: format!("Current draft summary:\n{}", draft),
        instruction: format!(
            "Apply this revision to the draft and return the full updated \
             summary, nothing else: {}",
            instruction
        ),
    }
}

/// Query string for a product search grounded in the discussion so far.
pub fn search_query(turns: &[Turn], question: &str) -> String {
    if turns.is_empty() {
        return question.to_string();
    }
    format!(
        "Team discussion so far:\n---\n{}\n---\nBased on the discussion \
         above, search the product corpus and answer: {}",
        render_transcript(turns),
        question
    )
}
