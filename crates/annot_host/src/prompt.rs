use std::collections::VecDeque;

/// Source of text for the text tool.
///
/// Called synchronously on pointer-down. Returning `None` (or blank text)
/// cancels the label without recording anything.
pub trait TextPrompt {
    fn prompt(&mut self, x: f32, y: f32) -> Option<String>;
}

/// Always cancels.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoTextPrompt;

impl TextPrompt for NoTextPrompt {
    fn prompt(&mut self, _x: f32, _y: f32) -> Option<String> {
        None
    }
}

/// Hands out pre-seeded answers in order, then cancels.
#[derive(Debug, Default, Clone)]
pub struct QueuedTextPrompt {
    answers: VecDeque<String>,
}

impl QueuedTextPrompt {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
        }
    }

    pub fn push(&mut self, answer: impl Into<String>) {
        self.answers.push_back(answer.into());
    }

    pub fn remaining(&self) -> usize {
        self.answers.len()
    }
}

impl TextPrompt for QueuedTextPrompt {
    fn prompt(&mut self, _x: f32, _y: f32) -> Option<String> {
        self.answers.pop_front()
    }
}

impl<F> TextPrompt for F
where
    F: FnMut(f32, f32) -> Option<String>,
{
    fn prompt(&mut self, x: f32, y: f32) -> Option<String> {
        self(x, y)
    }
}

#[cfg(test)]
mod tests {
    use super::TextPrompt;

    #[test]
    fn test_queued_prompt_drains_in_order() {
        let mut prompt = super::QueuedTextPrompt::new(["one", "two"]);
        assert_eq!(prompt.prompt(0.0, 0.0).as_deref(), Some("one"));
        assert_eq!(prompt.prompt(0.0, 0.0).as_deref(), Some("two"));
        assert_eq!(prompt.prompt(0.0, 0.0), None);
        assert_eq!(super::NoTextPrompt.prompt(1.0, 1.0), None);
    }

    #[test]
    fn test_closure_prompt() {
        let mut prompt = |x: f32, _y: f32| Some(format!("at {x}"));
        assert_eq!(prompt.prompt(3.0, 0.0).as_deref(), Some("at 3"));
    }
}
