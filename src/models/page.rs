//! Page identifiers matching the frontend PageID union.

use serde::{Deserialize, Serialize};

/// One of the portal's fixed pages.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum PageId {
    /// Subjects browser
    Disciplinas,
    Tcc,
    Extensao,
    /// Static internship information
    Estagio,
    Avisos,
    /// Student message board
    Chat,
    /// AI tutor
    Agente,
}

impl PageId {
    pub const ALL: [PageId; 7] = [
        PageId::Disciplinas,
        PageId::Tcc,
        PageId::Extensao,
        PageId::Estagio,
        PageId::Avisos,
        PageId::Chat,
        PageId::Agente,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PageId::Disciplinas => "disciplinas",
            PageId::Tcc => "tcc",
            PageId::Extensao => "extensao",
            PageId::Estagio => "estagio",
            PageId::Avisos => "avisos",
            PageId::Chat => "chat",
            PageId::Agente => "agente",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|page| page.as_str() == s)
    }

    /// Sidebar label.
    pub fn label(&self) -> &'static str {
        match self {
            PageId::Disciplinas => "Disciplinas",
            PageId::Tcc => "TCC",
            PageId::Extensao => "Extensão",
            PageId::Estagio => "Estágio",
            PageId::Avisos => "Avisos",
            PageId::Chat => "Chat Alunos",
            PageId::Agente => "Agente IA",
        }
    }

    /// Whether the page renders the post list of its own category.
    pub fn is_feed(&self) -> bool {
        matches!(self, PageId::Tcc | PageId::Extensao | PageId::Avisos)
    }
}

impl std::fmt::Display for PageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A sidebar entry.
#[derive(Debug, Clone, Serialize)]
pub struct MenuItem {
    pub id: PageId,
    pub label: &'static str,
}

/// The sidebar, in display order.
pub fn menu() -> Vec<MenuItem> {
    PageId::ALL
        .into_iter()
        .map(|id| MenuItem {
            id,
            label: id.label(),
        })
        .collect()
}
