//! Which page is on screen, as an immutable value with pure transitions.

use serde::{Deserialize, Serialize};

use crate::models::PageId;

/// Active page plus the subject opened on the subjects page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Navigation {
    pub page: PageId,
    pub selected_subject: Option<String>,
}

impl Default for Navigation {
    fn default() -> Self {
        Self {
            page: PageId::Disciplinas,
            selected_subject: None,
        }
    }
}

/// One step requested by the client.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum NavigationAction {
    GoTo {
        page: PageId,
    },
    #[serde(rename_all = "camelCase")]
    SelectSubject {
        subject_id: String,
    },
    BackToSubjects,
    ConsultAssistant,
}

impl Navigation {
    pub fn step(&self, action: NavigationAction) -> Self {
        match action {
            NavigationAction::GoTo { page } => self.go_to(page),
            NavigationAction::SelectSubject { subject_id } => self.select_subject(subject_id),
            NavigationAction::BackToSubjects => self.back_to_subjects(),
            NavigationAction::ConsultAssistant => self.consult_assistant(),
        }
    }

    /// Switch pages. Any open subject is closed.
    pub fn go_to(&self, page: PageId) -> Self {
        Self {
            page,
            selected_subject: None,
        }
    }

    /// Open a subject on the subjects page.
    pub fn select_subject(&self, subject_id: impl Into<String>) -> Self {
        Self {
            page: PageId::Disciplinas,
            selected_subject: Some(subject_id.into()),
        }
    }

    pub fn back_to_subjects(&self) -> Self {
        self.go_to(PageId::Disciplinas)
    }

    /// The call-to-action on a subject page.
    pub fn consult_assistant(&self) -> Self {
        self.go_to(PageId::Agente)
    }
}
