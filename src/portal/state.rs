//! The portal's mirrored collections and the pure transitions over them.
//!
//! Every transition borrows the current value and returns a new one; nothing here touches
//! storage or the clock. Callers pass `now` in and persist the result.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::{
    seed_subjects, BoardMessage, CreateMaterialRequest, CreatePostRequest, CreateSubjectRequest,
    Material, PageId, Post, SendBoardMessageRequest, Subject,
};

/// Posts, subjects and board messages as last saved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortalState {
    /// Newest first
    pub posts: Vec<Post>,
    pub subjects: Vec<Subject>,
    /// Insertion order
    pub board: Vec<BoardMessage>,
}

impl Default for PortalState {
    fn default() -> Self {
        Self {
            posts: Vec::new(),
            subjects: seed_subjects(),
            board: Vec::new(),
        }
    }
}

/// What a transition produced.
#[derive(Debug)]
pub enum Transition<T> {
    /// New state and the entity created or removed
    Applied(PortalState, T),
    /// Blank input; nothing changes and nothing is saved
    Ignored,
}

/// A post request plus the author stamped on it.
pub struct PostDraft<'a> {
    pub request: &'a CreatePostRequest,
    pub author: &'a str,
}

impl PortalState {
    pub fn subject(&self, id: &str) -> Option<&Subject> {
        self.subjects.iter().find(|s| s.id == id)
    }

    /// Posts of one category, newest first.
    pub fn posts_in(&self, category: PageId) -> impl Iterator<Item = &Post> {
        self.posts.iter().filter(move |p| p.category == category)
    }

    pub fn add_post(
        &self,
        draft: PostDraft<'_>,
        now: DateTime<FixedOffset>,
    ) -> Result<Transition<Post>, AppError> {
        let request = draft.request;
        let category = PageId::parse(request.category.trim())
            .filter(PageId::is_feed)
            .ok_or_else(|| {
                AppError::Validation(format!("Page {} does not accept posts", request.category))
            })?;
        let (Some(title), Some(content)) = (filled(&request.title), filled(&request.content))
        else {
            return Ok(Transition::Ignored);
        };

        let post = Post {
            id: next_id(now, |id| self.posts.iter().any(|p| p.id == id)),
            category,
            title: title.to_string(),
            content: content.to_string(),
            image_url: request
                .image_url
                .as_deref()
                .and_then(filled)
                .map(str::to_string),
            date: now.format("%d/%m/%Y").to_string(),
            author: draft.author.to_string(),
        };

        let mut next = self.clone();
        next.posts.insert(0, post.clone());
        Ok(Transition::Applied(next, post))
    }

    pub fn remove_post(&self, post_id: &str) -> Result<Transition<Post>, AppError> {
        let index = self
            .posts
            .iter()
            .position(|p| p.id == post_id)
            .ok_or_else(|| AppError::NotFound(format!("Post {} not found", post_id)))?;

        let mut next = self.clone();
        let removed = next.posts.remove(index);
        Ok(Transition::Applied(next, removed))
    }

    /// Append a subject tagged with `year`.
    pub fn add_subject(
        &self,
        request: &CreateSubjectRequest,
        year: i32,
        now: DateTime<FixedOffset>,
    ) -> Transition<Subject> {
        let Some(name) = filled(&request.name) else {
            return Transition::Ignored;
        };

        let subject = Subject {
            id: next_id(now, |id| self.subjects.iter().any(|s| s.id == id)),
            year,
            name: name.to_string(),
            description: request
                .description
                .as_deref()
                .and_then(filled)
                .map(str::to_string),
            materials: Vec::new(),
        };

        let mut next = self.clone();
        next.subjects.push(subject.clone());
        Transition::Applied(next, subject)
    }

    pub fn add_material(
        &self,
        subject_id: &str,
        request: &CreateMaterialRequest,
        now: DateTime<FixedOffset>,
    ) -> Result<Transition<Material>, AppError> {
        let index = self.subject_index(subject_id)?;
        let Some(name) = filled(&request.name) else {
            return Ok(Transition::Ignored);
        };

        let materials = &self.subjects[index].materials;
        let material = Material {
            id: next_id(now, |id| materials.iter().any(|m| m.id == id)),
            name: name.to_string(),
            kind: request
                .kind
                .as_deref()
                .and_then(filled)
                .unwrap_or("Link")
                .to_string(),
            url: Some(
                request
                    .url
                    .as_deref()
                    .and_then(filled)
                    .unwrap_or("#")
                    .to_string(),
            ),
        };

        let mut next = self.clone();
        next.subjects[index].materials.push(material.clone());
        Ok(Transition::Applied(next, material))
    }

    pub fn remove_material(
        &self,
        subject_id: &str,
        material_id: &str,
    ) -> Result<Transition<Material>, AppError> {
        let index = self.subject_index(subject_id)?;
        let position = self.subjects[index]
            .materials
            .iter()
            .position(|m| m.id == material_id)
            .ok_or_else(|| AppError::NotFound(format!("Material {} not found", material_id)))?;

        let mut next = self.clone();
        let removed = next.subjects[index].materials.remove(position);
        Ok(Transition::Applied(next, removed))
    }

    pub fn post_board_message(
        &self,
        request: &SendBoardMessageRequest,
        now: DateTime<FixedOffset>,
    ) -> Transition<BoardMessage> {
        let (Some(sender), Some(text)) = (filled(&request.sender), filled(&request.text)) else {
            return Transition::Ignored;
        };

        let message = BoardMessage {
            id: next_id(now, |id| self.board.iter().any(|m| m.id == id)),
            sender: sender.to_string(),
            text: text.to_string(),
            time: now.format("%H:%M").to_string(),
        };

        let mut next = self.clone();
        next.board.push(message.clone());
        Transition::Applied(next, message)
    }

    fn subject_index(&self, subject_id: &str) -> Result<usize, AppError> {
        self.subjects
            .iter()
            .position(|s| s.id == subject_id)
            .ok_or_else(|| AppError::NotFound(format!("Subject {} not found", subject_id)))
    }
}

/// Trimmed text, or `None` when only whitespace remains.
fn filled(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

/// Creation-time id: epoch milliseconds, bumped until no sibling holds it.
fn next_id(now: DateTime<FixedOffset>, taken: impl Fn(&str) -> bool) -> String {
    let mut candidate = now.timestamp_millis();
    loop {
        let id = candidate.to_string();
        if !taken(&id) {
            return id;
        }
        candidate += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(hour: u32, minute: u32) -> DateTime<FixedOffset> {
        FixedOffset::west_opt(3 * 3600)
            .unwrap()
            .with_ymd_and_hms(2026, 3, 9, hour, minute, 0)
            .unwrap()
    }

    fn post_request(category: PageId, title: &str, content: &str) -> CreatePostRequest {
        CreatePostRequest {
            category: category.as_str().to_string(),
            title: title.into(),
            content: content.into(),
            image_url: None,
        }
    }

    impl<T> Transition<T> {
        fn is_ignored(&self) -> bool {
            matches!(self, Transition::Ignored)
        }
    }

    fn applied<T>(transition: Transition<T>) -> (PortalState, T) {
        match transition {
            Transition::Applied(state, value) => (state, value),
            Transition::Ignored => panic!("transition was ignored"),
        }
    }

    #[test]
    fn test_default_state_is_seeded() {
        let state = PortalState::default();
        assert!(state.posts.is_empty());
        assert!(state.board.is_empty());
        assert_eq!(state.subjects.len(), 5);
    }

    #[test]
    fn test_posts_are_newest_first() {
        let state = PortalState::default();
        let first = post_request(PageId::Avisos, "Prova", "Dia 10");
        let second = post_request(PageId::Avisos, "Aula cancelada", "Sexta");

        let (state, a) = applied(
            state
                .add_post(PostDraft { request: &first, author: "Prof. Téo" }, at(9, 0))
                .unwrap(),
        );
        let (state, b) = applied(
            state
                .add_post(PostDraft { request: &second, author: "Prof. Téo" }, at(9, 1))
                .unwrap(),
        );

        let ids: Vec<_> = state.posts_in(PageId::Avisos).map(|p| p.id.clone()).collect();
        assert_eq!(ids, vec![b.id, a.id]);
        assert_eq!(b.date, "09/03/2026");
        assert_eq!(b.author, "Prof. Téo");
        assert_eq!(state.posts_in(PageId::Tcc).count(), 0);
    }

    #[test]
    fn test_blank_post_is_ignored() {
        let state = PortalState::default();
        let request = post_request(PageId::Tcc, "  ", "conteúdo");
        let result = state
            .add_post(PostDraft { request: &request, author: "x" }, at(9, 0))
            .unwrap();
        assert!(result.is_ignored());
    }

    #[test]
    fn test_post_on_non_feed_page_is_rejected() {
        let state = PortalState::default();
        let request = post_request(PageId::Chat, "t", "c");
        let err = state
            .add_post(PostDraft { request: &request, author: "x" }, at(9, 0))
            .unwrap_err();
        assert_eq!(err.error_code(), "VALIDATION_ERROR");
    }

    #[test]
    fn test_post_with_unknown_category_is_rejected() {
        let state = PortalState::default();
        let mut request = post_request(PageId::Avisos, "t", "c");
        for category in ["forum", "", "AVISOS"] {
            request.category = category.to_string();
            let err = state
                .add_post(PostDraft { request: &request, author: "x" }, at(9, 0))
                .unwrap_err();
            assert_eq!(err.error_code(), "VALIDATION_ERROR");
        }
    }

    #[test]
    fn test_blank_image_url_is_dropped() {
        let state = PortalState::default();
        let mut request = post_request(PageId::Extensao, "Projeto", "Inscrições");
        request.image_url = Some("   ".into());
        let (_, post) = applied(
            state
                .add_post(PostDraft { request: &request, author: "x" }, at(9, 0))
                .unwrap(),
        );
        assert!(post.image_url.is_none());
    }

    #[test]
    fn test_remove_post() {
        let state = PortalState::default();
        let request = post_request(PageId::Tcc, "Normas", "ABNT");
        let (state, post) = applied(
            state
                .add_post(PostDraft { request: &request, author: "x" }, at(9, 0))
                .unwrap(),
        );
        let (after, removed) = applied(state.remove_post(&post.id).unwrap());
        assert_eq!(removed, post);
        assert!(after.posts.is_empty());
        assert!(after.remove_post(&post.id).is_err());
    }

    #[test]
    fn test_ids_are_unique_within_collection() {
        let state = PortalState::default();
        let request = post_request(PageId::Tcc, "t", "c");
        let now = at(10, 0);
        let (state, a) = applied(
            state
                .add_post(PostDraft { request: &request, author: "x" }, now)
                .unwrap(),
        );
        let (_, b) = applied(
            state
                .add_post(PostDraft { request: &request, author: "x" }, now)
                .unwrap(),
        );
        assert_ne!(a.id, b.id);
        assert_eq!(
            b.id.parse::<i64>().unwrap(),
            a.id.parse::<i64>().unwrap() + 1
        );
    }

    #[test]
    fn test_add_subject_uses_given_year() {
        let state = PortalState::default();
        let request = CreateSubjectRequest {
            name: "Biomecânica".into(),
            description: None,
        };
        let (next, subject) = applied(state.add_subject(&request, 2026, at(8, 0)));
        assert_eq!(subject.year, 2026);
        assert_eq!(next.subjects.last(), Some(&subject));
        assert_eq!(state.subjects.len(), 5);

        let blank = CreateSubjectRequest {
            name: "".into(),
            description: None,
        };
        assert!(state.add_subject(&blank, 2026, at(8, 0)).is_ignored());
    }

    #[test]
    fn test_material_defaults_and_removal() {
        let state = PortalState::default();
        let request = CreateMaterialRequest {
            name: "Slides aula 1".into(),
            kind: None,
            url: None,
        };
        let (state, material) = applied(state.add_material("2", &request, at(8, 0)).unwrap());
        assert_eq!(material.kind, "Link");
        assert_eq!(material.url.as_deref(), Some("#"));
        assert_eq!(state.subject("2").unwrap().materials.len(), 1);

        let (state, removed) = applied(state.remove_material("2", &material.id).unwrap());
        assert_eq!(removed.id, material.id);
        assert!(state.subject("2").unwrap().materials.is_empty());

        assert!(state.remove_material("2", &material.id).is_err());
        assert!(state.add_material("404", &request, at(8, 0)).is_err());
    }

    #[test]
    fn test_board_messages_append_in_order() {
        let state = PortalState::default();
        let hello = SendBoardMessageRequest {
            sender: "Ana".into(),
            text: "Oi turma".into(),
        };
        let reply = SendBoardMessageRequest {
            sender: "Bruno".into(),
            text: "Oi Ana".into(),
        };
        let (state, first) = applied(state.post_board_message(&hello, at(14, 7)));
        let (state, _) = applied(state.post_board_message(&reply, at(14, 8)));
        assert_eq!(first.time, "14:07");
        let senders: Vec<_> = state.board.iter().map(|m| m.sender.as_str()).collect();
        assert_eq!(senders, vec!["Ana", "Bruno"]);
    }

    #[test]
    fn test_blank_board_message_is_ignored() {
        let state = PortalState::default();
        for (sender, text) in [("Ana", "   "), ("", "Oi"), ("  ", "\n")] {
            let request = SendBoardMessageRequest {
                sender: sender.into(),
                text: text.into(),
            };
            assert!(state.post_board_message(&request, at(9, 0)).is_ignored());
        }
    }
}
