use std::collections::VecDeque;
use std::io;
use std::path::Path;
use tracing::debug;

use super::provider::InputProvider;

/// Replays a fixed list of answers, one per prompt.
#[derive(Debug, Default, Clone)]
pub struct ScriptedInput {
    answers: VecDeque<String>,
    prompts: Vec<String>,
}

impl ScriptedInput {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ScriptedInput {
            answers: answers.into_iter().map(Into::into).collect(),
            prompts: Vec::new(),
        }
    }

    /// Reads answers from a text file, one per line.
    pub fn from_file(path: &Path) -> io::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(Self::new(content.lines().map(str::to_string)))
    }

    /// Every prompt asked so far, in order.
    pub fn prompts(&self) -> &[String] {
        &self.prompts
    }

    pub fn remaining(&self) -> usize {
        self.answers.len()
    }
}

impl InputProvider for ScriptedInput {
    fn ask(&mut self, prompt: &str) -> io::Result<Option<String>> {
        self.prompts.push(prompt.to_string());
        let answer = self.answers.pop_front();
        debug!(prompt, answer = ?answer, "Scripted answer");
        Ok(answer)
    }
}
