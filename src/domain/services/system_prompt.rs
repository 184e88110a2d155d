/// Persona and knowledge base sent as the `system` field of every upstream call.
pub const SYSTEM_PROMPT: &str = include_str!("system_prompt.md");
