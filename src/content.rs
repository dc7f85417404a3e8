//! Fixed page content that never touches the mirror.

use serde::Serialize;

pub const PORTAL_NAME: &str = "Prof. Téo";

/// Entry shown above the dynamic materials of every subject.
pub const SYLLABUS_PLACEHOLDER: Placeholder = Placeholder {
    name: "Plano de Ensino",
    kind: "PDF",
};

pub const EMPTY_FEED_MESSAGE: &str = "Nenhuma informação postada nesta seção ainda.";
pub const EMPTY_BOARD_MESSAGE: &str = "Seja o primeiro a enviar uma mensagem!";

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct Placeholder {
    pub name: &'static str,
    #[serde(rename = "type")]
    pub kind: &'static str,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct InfoCard {
    pub title: &'static str,
    pub description: &'static str,
}

/// The internship information page.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct InternshipPage {
    pub title: &'static str,
    pub intro: &'static str,
    pub modalities: Vec<InfoCard>,
    pub regulation_title: &'static str,
    pub regulations: Vec<&'static str>,
    pub roadmap_title: &'static str,
    pub roadmap: Vec<InfoCard>,
    pub roadmap_note: &'static str,
    pub documents: Vec<&'static str>,
    pub contact: &'static str,
}

pub fn internship_page() -> InternshipPage {
    InternshipPage {
        title: "Estágio Supervisionado",
        intro: "Recursos e informações essenciais para a realização e regulamentação do seu estágio em Educação Física.",
        modalities: vec![
            InfoCard {
                title: "Estágio Obrigatório",
                description: "Parte das exigências do curso. Verifique a quantidade de horas necessárias e o módulo inicial via Portal do Aluno.",
            },
            InfoCard {
                title: "Não Obrigatório",
                description: "Opcional para experiência extra. Exige bolsa-auxílio, transporte e seguro. Pode contar como Atividades Complementares.",
            },
        ],
        regulation_title: "Regulamentação (Lei 11.788)",
        regulations: vec![
            "O TCE deve ser assinado ANTES do início do estágio.",
            "Jornada máxima de 6 horas por dia (30 horas por semana).",
            "Estágios sem documentação são irregulares e as horas não contam.",
        ],
        roadmap_title: "Licenciatura UNASP-HT",
        roadmap: vec![
            InfoCard {
                title: "Etapas de Estágio",
                description: "100h cada (Infantil, Fund I, Fund II e Médio)",
            },
            InfoCard {
                title: "Relatório de Campo",
                description: "Preencher para cada aula ou dia de estágio",
            },
            InfoCard {
                title: "Portfólio",
                description: "Entregar via portal no relatório final",
            },
            InfoCard {
                title: "Ficha de Horas",
                description: "Antiga ficha de horas com registros oficiais",
            },
        ],
        roadmap_note: "Toda a documentação deve ser organizada via Portal do Aluno. Em caso de irregularidade, você será acionado pelo sistema.",
        documents: vec!["Relatório de Campo", "Portfólio de Estágio", "Ficha de Horas"],
        contact: "Professor Téo",
    }
}
