// Feedback generation: class levels, prompt building, the sequential
// generation loop and report export.
// Every model call goes through llm_client.

pub mod export;
pub mod generator;
pub mod handlers;
pub mod level;
pub mod prompts;
