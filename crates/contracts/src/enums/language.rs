use serde::{Deserialize, Serialize};

/// Display language of the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Language {
    #[default]
    English,
    Kannada,
}

impl Language {
    /// Short code used in URLs and settings ("en" / "kn")
    pub fn code(&self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Kannada => "kn",
        }
    }

    /// Label of the toggle button: always the name of the *other* language
    pub fn toggle_label(&self) -> &'static str {
        match self {
            Language::English => "ಕನ್ನಡ",
            Language::Kannada => "English",
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            Language::English => Language::Kannada,
            Language::Kannada => Language::English,
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "en" => Some(Language::English),
            "kn" => Some(Language::Kannada),
            _ => None,
        }
    }
}
