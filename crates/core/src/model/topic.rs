use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum TopicError {
    #[error("topic name cannot be empty")]
    EmptyName,

    #[error("topic catalog cannot be empty")]
    EmptyCatalog,

    #[error("unknown topic: {0}")]
    Unknown(String),
}

/// Validated topic identifier (trimmed, lowercase, non-empty).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Topic(String);

impl Topic {
    /// # Errors
    ///
    /// Returns `TopicError::EmptyName` if the name is empty after trimming.
    pub fn new(value: impl Into<String>) -> Result<Self, TopicError> {
        let raw = value.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(TopicError::EmptyName);
        }
        Ok(Self(trimmed.to_lowercase()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Topic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Fixed set of topics offered before a quiz starts, with the current selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicCatalog {
    topics: Vec<Topic>,
    selected: usize,
}

impl TopicCatalog {
    pub const DEFAULT_TOPICS: [&'static str; 6] = [
        "general",
        "climate-change",
        "waste-management",
        "water-conservation",
        "biodiversity",
        "renewable-energy",
    ];

    /// Build a catalog; duplicates are dropped and the first topic is selected.
    ///
    /// # Errors
    ///
    /// Returns `TopicError::EmptyCatalog` if no topics are given.
    pub fn new(topics: impl IntoIterator<Item = Topic>) -> Result<Self, TopicError> {
        let mut unique: Vec<Topic> = Vec::new();
        for topic in topics {
            if !unique.contains(&topic) {
                unique.push(topic);
            }
        }
        if unique.is_empty() {
            return Err(TopicError::EmptyCatalog);
        }
        Ok(Self {
            topics: unique,
            selected: 0,
        })
    }

    /// Parse a comma separated list such as `general, biodiversity`.
    ///
    /// # Errors
    ///
    /// Returns `TopicError::EmptyCatalog` if the list contains no names.
    pub fn parse_list(raw: &str) -> Result<Self, TopicError> {
        let topics = raw
            .split(',')
            .filter(|part| !part.trim().is_empty())
            .map(Topic::new)
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(topics)
    }

    #[must_use]
    pub fn topics(&self) -> &[Topic] {
        &self.topics
    }

    #[must_use]
    pub fn selected(&self) -> &Topic {
        &self.topics[self.selected]
    }

    /// # Errors
    ///
    /// Returns `TopicError::Unknown` if the topic is not part of the catalog.
    pub fn select(&mut self, topic: &Topic) -> Result<(), TopicError> {
        let position = self
            .topics
            .iter()
            .position(|candidate| candidate == topic)
            .ok_or_else(|| TopicError::Unknown(topic.to_string()))?;
        self.selected = position;
        Ok(())
    }
}

impl Default for TopicCatalog {
    fn default() -> Self {
        Self {
            topics: Self::DEFAULT_TOPICS
                .iter()
                .map(|name| Topic(name.to_string()))
                .collect(),
            selected: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn topic_is_normalized() {
        let topic = Topic::new("  General ").unwrap();
        assert_eq!(topic.as_str(), "general");
        assert_eq!(Topic::new(" ").unwrap_err(), TopicError::EmptyName);
    }

    #[test]
    fn default_catalog_selects_first() {
        let catalog = TopicCatalog::default();
        assert_eq!(catalog.selected().as_str(), "general");
        assert_eq!(catalog.topics().len(), TopicCatalog::DEFAULT_TOPICS.len());
    }

    #[test]
    fn select_rejects_unknown_topic() {
        let mut catalog = TopicCatalog::default();
        let err = catalog.select(&Topic::new("astrology").unwrap()).unwrap_err();
        assert_eq!(err, TopicError::Unknown("astrology".into()));
        assert_eq!(catalog.selected().as_str(), "general");

        catalog.select(&Topic::new("biodiversity").unwrap()).unwrap();
        assert_eq!(catalog.selected().as_str(), "biodiversity");
    }

    #[test]
    fn parse_list_skips_blanks_and_duplicates() {
        let catalog = TopicCatalog::parse_list("general, ,Biodiversity,general").unwrap();
        let names: Vec<_> = catalog.topics().iter().map(Topic::as_str).collect();
        assert_eq!(names, ["general", "biodiversity"]);
        assert_eq!(
            TopicCatalog::parse_list(" , ").unwrap_err(),
            TopicError::EmptyCatalog
        );
    }
}
