use serde::{Deserialize, Deserializer, Serialize};

/// Bilingual text: the primary language (Arabic in the dashboard) and an
/// optional secondary translation (English).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct LocalizedText {
    pub primary: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secondary: Option<String>,
}

impl LocalizedText {
    pub fn new(primary: impl Into<String>) -> Self {
        Self {
            primary: primary.into(),
            secondary: None,
        }
    }

    pub fn with_secondary(primary: impl Into<String>, secondary: impl Into<String>) -> Self {
        Self {
            primary: primary.into(),
            secondary: Some(secondary.into()),
        }
    }

    /// Both variants that carry text, primary first
    pub fn variants(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.primary.as_str()).chain(self.secondary.as_deref())
    }

    /// Text for display: primary, or secondary when primary is blank
    pub fn display(&self) -> &str {
        match &self.secondary {
            Some(secondary) if self.primary.trim().is_empty() => secondary,
            _ => &self.primary,
        }
    }
}

impl std::fmt::Display for LocalizedText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display())
    }
}

/// Wire shapes accepted for a name: `"text"`, `{primary, secondary}` or `{ar, en}`
#[derive(Deserialize)]
#[serde(untagged)]
enum LocalizedTextWire {
    Plain(String),
    Pair {
        #[serde(alias = "ar")]
        primary: Option<String>,
        #[serde(default, alias = "en")]
        secondary: Option<String>,
    },
}

impl<'de> Deserialize<'de> for LocalizedText {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match LocalizedTextWire::deserialize(deserializer)? {
            LocalizedTextWire::Plain(primary) => Ok(LocalizedText::new(primary)),
            LocalizedTextWire::Pair { primary, secondary } => {
                let secondary = secondary.filter(|s| !s.trim().is_empty());
                match (primary, secondary) {
                    (Some(primary), secondary) => Ok(LocalizedText { primary, secondary }),
                    (None, Some(secondary)) => Ok(LocalizedText {
                        primary: String::new(),
                        secondary: Some(secondary),
                    }),
                    (None, None) => Err(serde::de::Error::custom(
                        "name has neither primary nor secondary text",
                    )),
                }
            }
        }
    }
}
