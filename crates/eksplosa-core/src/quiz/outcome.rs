//! Feedback kinds handed to the modal layer.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutcomeKind {
    Success,
    Failure,
    Information,
}

/// Text shown by the feedback modal for an outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OutcomeCopy {
    pub title: &'static str,
    pub description: &'static str,
    /// Label of the primary button that acknowledges the outcome.
    pub action_label: &'static str,
    /// Label of the button that leaves the quiz, if the modal offers one.
    pub exit_label: Option<&'static str>,
}

impl OutcomeKind {
    pub fn copy(self) -> OutcomeCopy {
        match self {
            OutcomeKind::Success => OutcomeCopy {
                title: "Wah Selamat!",
                description: "Kamu telah menyelesaikan level ini dengan sangat baik, Gaca ikut bangga sama kamu, terus belajar di level selanjutnya ya!",
                action_label: "Selanjutnya",
                exit_label: Some("Keluar"),
            },
            OutcomeKind::Failure => OutcomeCopy {
                title: "Tetap Semangat!",
                description: "Jangan menyerah! Coba lagi dan raih hasil terbaikmu. Gaca selalu ada untuk mendukungmu!",
                action_label: "Ulangi Kuis",
                exit_label: Some("Keluar"),
            },
            OutcomeKind::Information => OutcomeCopy {
                title: "Ngapunten Nggih!",
                description: "Selesaikan level ini dengan baik, dan lanjutkan perjalananmu ke level selanjutnya!",
                action_label: "Baiklah",
                exit_label: None,
            },
        }
    }
}
