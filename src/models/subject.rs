//! Subject and material models matching the frontend Subject/Material interfaces.

use serde::{Deserialize, Serialize};

/// A course subject with its downloadable materials.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Subject {
    pub id: String,
    pub year: i32,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub materials: Vec<Material>,
}

/// A file or link attached to a subject.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Material {
    pub id: String,
    pub name: String,
    /// Free-text label such as PDF, DOCX or Link
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// Request body for creating a subject.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSubjectRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Request body for attaching a material to a subject.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMaterialRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

/// Subjects every fresh portal starts with.
pub fn seed_subjects() -> Vec<Subject> {
    [
        ("1", "Esportes de Invasão 1"),
        ("2", "Didática"),
        ("3", "Educação Física para o Ensino Médio"),
        ("4", "Recursos Pedagógicos"),
        ("5", "Introdução ao Currículo"),
    ]
    .into_iter()
    .map(|(id, name)| Subject {
        id: id.to_string(),
        year: 2026,
        name: name.to_string(),
        description: None,
        materials: Vec::new(),
    })
    .collect()
}
