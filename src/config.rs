use heapless::String;

use crate::PROMPT_CAPACITY;

/// Settings for a [`crate::Session`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    prompt: String<PROMPT_CAPACITY>,
}

impl Config {
    pub const DEFAULT_PROMPT: &'static str = ">";

    /// A configuration using `prompt`, cut to [`PROMPT_CAPACITY`] bytes.
    pub fn with_prompt(prompt: &str) -> Self {
        let mut ret = Self::default();
        ret.set_prompt(prompt);
        ret
    }

    #[inline(always)]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn set_prompt(&mut self, prompt: &str) {
        self.prompt.clear();
        for c in prompt.chars() {
            if self.prompt.push(c).is_err() {
                log::trace!("prompt truncated at {} bytes", self.prompt.len());
                break;
            }
        }
    }

    /// Width of the prompt in terminal columns.
    pub(crate) fn prompt_width(&self) -> usize {
        self.prompt.chars().count()
    }
}

impl Default for Config {
    fn default() -> Self {
        let mut prompt = String::new();
        let _ = prompt.push_str(Self::DEFAULT_PROMPT);
        Self { prompt }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_prompt() {
        assert_eq!(Config::default().prompt(), ">");
    }

    #[test]
    fn long_prompt_is_cut() {
        let long = "p".repeat(PROMPT_CAPACITY + 5);
        let config = Config::with_prompt(&long);
        assert_eq!(config.prompt().len(), PROMPT_CAPACITY);
        assert_eq!(config.prompt_width(), PROMPT_CAPACITY);
    }
}
