//! One tutor conversation: `idle -> awaiting reply -> idle`.

use crate::models::AssistantTurn;

/// Outcome of submitting a question.
#[derive(Debug, PartialEq, Eq)]
pub enum Submission {
    /// Blank input; nothing recorded, nothing sent
    Ignored,
    /// A reply is still outstanding
    Busy,
    /// The user turn was recorded; send this transcript
    Accepted(Vec<AssistantTurn>),
}

#[derive(Debug, Clone)]
pub struct Conversation {
    transcript: Vec<AssistantTurn>,
    awaiting: bool,
}

impl Conversation {
    pub fn new(greeting: impl Into<String>) -> Self {
        Self {
            transcript: vec![AssistantTurn::model(greeting)],
            awaiting: false,
        }
    }

    pub fn transcript(&self) -> &[AssistantTurn] {
        &self.transcript
    }

    pub fn is_awaiting(&self) -> bool {
        self.awaiting
    }

    pub fn begin(&mut self, text: &str) -> Submission {
        if text.trim().is_empty() {
            return Submission::Ignored;
        }
        if self.awaiting {
            return Submission::Busy;
        }
        self.transcript.push(AssistantTurn::user(text));
        self.awaiting = true;
        Submission::Accepted(self.transcript.clone())
    }

    /// Record the reply to the outstanding question and return to idle.
    pub fn finish(&mut self, reply: impl Into<String>) -> AssistantTurn {
        let turn = AssistantTurn::model(reply);
        self.transcript.push(turn.clone());
        self.awaiting = false;
        turn
    }
}
