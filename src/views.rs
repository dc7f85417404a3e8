//! View router: turns the portal state and the current navigation into page content.

use serde::Serialize;

use crate::assistant::{greeting, ASSISTANT_NAME};
use crate::content::{
    internship_page, InternshipPage, Placeholder, EMPTY_BOARD_MESSAGE, EMPTY_FEED_MESSAGE,
    SYLLABUS_PLACEHOLDER,
};
use crate::models::{BoardMessage, Material, PageId, Post, Subject};
use crate::portal::{Navigation, PortalState};

/// Who is looking at the page.
#[derive(Debug, Clone, Default)]
pub struct Viewer {
    pub is_admin: bool,
    /// Display name remembered by the client for the message board
    pub name: Option<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SubjectSummary {
    pub id: String,
    pub name: String,
    pub material_count: usize,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct YearGroup {
    pub year: i32,
    pub subjects: Vec<SubjectSummary>,
}

/// Icon hint derived from a material's free-text type.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MaterialIcon {
    Pdf,
    Doc,
    Link,
}

impl MaterialIcon {
    pub fn for_kind(kind: &str) -> Self {
        let kind = kind.to_uppercase();
        if kind.contains("PDF") {
            MaterialIcon::Pdf
        } else if kind.contains("DOC") {
            MaterialIcon::Doc
        } else {
            MaterialIcon::Link
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct MaterialEntry {
    #[serde(flatten)]
    pub material: Material,
    pub icon: MaterialIcon,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct BoardEntry {
    #[serde(flatten)]
    pub message: BoardMessage,
    /// Sent under the viewer's display name
    pub own: bool,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum PageView {
    #[serde(rename_all = "camelCase")]
    SubjectsIndex {
        groups: Vec<YearGroup>,
        can_edit: bool,
    },
    #[serde(rename_all = "camelCase")]
    SubjectDetail {
        subject: SubjectSummary,
        description: Option<String>,
        year: i32,
        placeholder: Placeholder,
        materials: Vec<MaterialEntry>,
        can_edit: bool,
        assistant_page: PageId,
    },
    #[serde(rename_all = "camelCase")]
    Feed {
        page: PageId,
        title: &'static str,
        posts: Vec<Post>,
        can_edit: bool,
        empty_message: &'static str,
    },
    #[serde(rename_all = "camelCase")]
    Board {
        messages: Vec<BoardEntry>,
        viewer_name: Option<String>,
        empty_message: &'static str,
    },
    Internship {
        content: InternshipPage,
    },
    #[serde(rename_all = "camelCase")]
    Assistant {
        assistant_name: &'static str,
        greeting: String,
    },
}

/// Produce the content for `nav` as seen by `viewer`.
pub fn render(state: &PortalState, nav: &Navigation, viewer: &Viewer) -> PageView {
    match nav.page {
        PageId::Disciplinas => match nav.selected_subject.as_deref().and_then(|id| state.subject(id)) {
            Some(subject) => subject_detail(subject, viewer),
            None => subjects_index(state, viewer),
        },
        PageId::Chat => board(state, viewer),
        PageId::Estagio => PageView::Internship {
            content: internship_page(),
        },
        PageId::Agente => PageView::Assistant {
            assistant_name: ASSISTANT_NAME,
            greeting: greeting(),
        },
        page @ (PageId::Tcc | PageId::Extensao | PageId::Avisos) => PageView::Feed {
            page,
            title: page.label(),
            posts: state.posts_in(page).cloned().collect(),
            can_edit: viewer.is_admin,
            empty_message: EMPTY_FEED_MESSAGE,
        },
    }
}

/// Subjects grouped by year, newest year first. Within a year, insertion order is kept.
pub fn group_by_year(subjects: &[Subject]) -> Vec<YearGroup> {
    let mut years: Vec<i32> = subjects.iter().map(|s| s.year).collect();
    years.sort_unstable_by(|a, b| b.cmp(a));
    years.dedup();

    years
        .into_iter()
        .map(|year| YearGroup {
            year,
            subjects: subjects
                .iter()
                .filter(|s| s.year == year)
                .map(summary)
                .collect(),
        })
        .collect()
}

fn summary(subject: &Subject) -> SubjectSummary {
    SubjectSummary {
        id: subject.id.clone(),
        name: subject.name.clone(),
        material_count: subject.materials.len(),
    }
}

fn subjects_index(state: &PortalState, viewer: &Viewer) -> PageView {
    PageView::SubjectsIndex {
        groups: group_by_year(&state.subjects),
        can_edit: viewer.is_admin,
    }
}

fn subject_detail(subject: &Subject, viewer: &Viewer) -> PageView {
    PageView::SubjectDetail {
        subject: summary(subject),
        description: subject.description.clone(),
        year: subject.year,
        placeholder: SYLLABUS_PLACEHOLDER,
        materials: subject
            .materials
            .iter()
            .map(|material| MaterialEntry {
                icon: MaterialIcon::for_kind(&material.kind),
                material: material.clone(),
            })
            .collect(),
        can_edit: viewer.is_admin,
        assistant_page: PageId::Agente,
    }
}

fn board(state: &PortalState, viewer: &Viewer) -> PageView {
    let name = viewer.name.as_deref().map(str::trim).filter(|n| !n.is_empty());
    PageView::Board {
        messages: state
            .board
            .iter()
            .map(|message| BoardEntry {
                own: name == Some(message.sender.as_str()),
                message: message.clone(),
            })
            .collect(),
        viewer_name: name.map(str::to_string),
        empty_message: EMPTY_BOARD_MESSAGE,
    }
}
