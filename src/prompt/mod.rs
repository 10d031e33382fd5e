//! Sources of answers for the interactive session.

mod provider;
mod scripted;
mod stdin;

pub use provider::InputProvider;
pub use scripted::ScriptedInput;
pub use stdin::StdinPrompt;
