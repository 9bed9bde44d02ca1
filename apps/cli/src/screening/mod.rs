// CV screening pipeline: prompt construction, response validation,
// report rendering, and the sequential batch loop.
// All LLM calls go through llm_client — no direct Gemini calls here.

pub mod pipeline;
pub mod prompts;
pub mod report;
pub mod validator;
