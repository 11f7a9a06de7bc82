// Shared prompt fragments. Each service that needs LLM calls defines its own
// prompts.rs alongside it; this file holds the cross-cutting pieces.

/// System prompt fragment for single-word classification replies.
pub const YES_NO_SYSTEM: &str = "You are a document classifier. \
    Reply with exactly one word: 'yes' or 'no'. \
    Do NOT include punctuation or explanations.";
