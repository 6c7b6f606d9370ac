//! The catalog of roleplay scenarios.
//!
//! A catalog maps each topic to the ordered list of situations (subtopics) the
//! learner can practice within it. The built-in catalog is fixed at build
//! time; a replacement can be loaded from YAML:
//!
//! ```yaml
//! topics:
//!   - name: 공항에서 체크인하기
//!     icon: ✈️
//!     subtopics: [수하물 맡기기, 탑승권 발급 받기]
//! ```

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A top-level roleplay scenario.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topic {
    /// The topic name, also used in the request label.
    pub name: String,

    /// Optional glyph shown next to the name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,

    /// The situations offered under this topic, in display order.
    pub subtopics: Vec<String>,
}

impl Topic {
    /// Create a new `Topic`.
    pub fn new<S: Into<String>>(
        name: impl Into<String>,
        icon: Option<&str>,
        subtopics: impl IntoIterator<Item = S>,
    ) -> Self {
        Self {
            name: name.into(),
            icon: icon.map(String::from),
            subtopics: subtopics.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns true if `subtopic` is offered under this topic.
    pub fn has_subtopic(&self, subtopic: &str) -> bool {
        self.subtopics.iter().any(|s| s == subtopic)
    }

    /// The name prefixed with the icon, if any.
    pub fn display_name(&self) -> String {
        match &self.icon {
            Some(icon) => format!("{icon} {}", self.name),
            None => self.name.clone(),
        }
    }
}

/// An ordered, validated set of topics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Catalog {
    topics: Vec<Topic>,
}

#[derive(Deserialize)]
struct CatalogFile {
    topics: Vec<Topic>,
}

impl Catalog {
    /// The scenarios shipped with the application.
    pub fn builtin() -> Self {
        Self {
            topics: vec![
                Topic::new(
                    "병원에서 의사와 환자",
                    Some("🏥"),
                    ["기침이 날 때", "복통이 있을 때", "처방 받기"],
                ),
                Topic::new(
                    "레스토랑에서 주문하기",
                    Some("🍽️"),
                    ["음식 주문하기", "채식 메뉴 요청", "계산 요청"],
                ),
                Topic::new(
                    "공항에서 체크인하기",
                    Some("✈️"),
                    ["수하물 맡기기", "탑승권 발급 받기", "지연 안내 받기"],
                ),
                Topic::new(
                    "호텔에서 체크인하기",
                    Some("🏨"),
                    ["예약 확인하기", "방 업그레이드 요청", "조식 문의"],
                ),
            ],
        }
    }

    /// Builds a catalog, rejecting empty or duplicate names.
    pub fn from_topics(topics: Vec<Topic>) -> Result<Self> {
        if topics.is_empty() {
            return Err(Error::config("catalog has no topics"));
        }
        let mut seen = HashSet::new();
        for topic in &topics {
            if topic.name.trim().is_empty() {
                return Err(Error::config("catalog has a topic with an empty name"));
            }
            if !seen.insert(topic.name.as_str()) {
                return Err(Error::config(format!(
                    "catalog lists topic {:?} twice",
                    topic.name
                )));
            }
            if topic.subtopics.is_empty() {
                return Err(Error::config(format!(
                    "topic {:?} has no subtopics",
                    topic.name
                )));
            }
            let mut subs = HashSet::new();
            for sub in &topic.subtopics {
                if sub.trim().is_empty() {
                    return Err(Error::config(format!(
                        "topic {:?} has a subtopic with an empty name",
                        topic.name
                    )));
                }
                if !subs.insert(sub.as_str()) {
                    return Err(Error::config(format!(
                        "topic {:?} lists subtopic {sub:?} twice",
                        topic.name
                    )));
                }
            }
        }
        Ok(Self { topics })
    }

    /// Parses and validates a YAML catalog.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let file: CatalogFile = serde_yaml::from_str(yaml)
            .map_err(|err| Error::config(format!("failed to parse catalog: {err}")))?;
        Self::from_topics(file.topics)
    }

    /// Loads a YAML catalog from disk.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let yaml = fs::read_to_string(path.as_ref())
            .map_err(|err| Error::io("failed to read catalog file", err))?;
        Self::from_yaml_str(&yaml)
    }

    /// All topics in display order.
    pub fn topics(&self) -> &[Topic] {
        &self.topics
    }

    /// Looks up a topic by exact name.
    pub fn topic(&self, name: &str) -> Option<&Topic> {
        self.topics.iter().find(|t| t.name == name)
    }

    /// Returns true if `name` is a topic in this catalog.
    pub fn contains_topic(&self, name: &str) -> bool {
        self.topic(name).is_some()
    }

    /// Returns true if `subtopic` is offered under `topic`.
    pub fn contains_subtopic(&self, topic: &str, subtopic: &str) -> bool {
        self.topic(topic).is_some_and(|t| t.has_subtopic(subtopic))
    }

    /// Resolves user input to a topic: a 1-based index or an exact name.
    pub fn resolve_topic(&self, input: &str) -> Option<&Topic> {
        let input = input.trim();
        pick(&self.topics, input, |t| t.name.as_str())
    }

    /// Resolves user input to a subtopic of `topic`: a 1-based index or an exact name.
    pub fn resolve_subtopic(&self, topic: &str, input: &str) -> Option<&str> {
        let topic = self.topic(topic)?;
        let input = input.trim();
        pick(&topic.subtopics, input, String::as_str).map(String::as_str)
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

fn pick<'a, T>(items: &'a [T], input: &str, name: impl Fn(&T) -> &str) -> Option<&'a T> {
    if let Ok(index) = input.parse::<usize>() {
        return index.checked_sub(1).and_then(|i| items.get(i));
    }
    items.iter().find(|item| name(item) == input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_has_four_topics_with_three_subtopics() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.topics().len(), 4);
        for topic in catalog.topics() {
            assert_eq!(topic.subtopics.len(), 3, "{}", topic.name);
            assert!(topic.icon.is_some());
        }
        assert!(Catalog::from_topics(catalog.topics().to_vec()).is_ok());
    }

    #[test]
    fn membership() {
        let catalog = Catalog::builtin();
        assert!(catalog.contains_topic("공항에서 체크인하기"));
        assert!(catalog.contains_subtopic("공항에서 체크인하기", "수하물 맡기기"));
        assert!(!catalog.contains_subtopic("공항에서 체크인하기", "조식 문의"));
        assert!(!catalog.contains_subtopic("수영장", "조식 문의"));
    }

    #[test]
    fn resolve_by_index_or_name() {
        let catalog = Catalog::builtin();
        assert_eq!(
            catalog.resolve_topic("2").map(|t| t.name.as_str()),
            Some("레스토랑에서 주문하기")
        );
        assert_eq!(
            catalog.resolve_topic(" 호텔에서 체크인하기 ").map(|t| t.name.as_str()),
            Some("호텔에서 체크인하기")
        );
        assert!(catalog.resolve_topic("0").is_none());
        assert!(catalog.resolve_topic("5").is_none());
        assert_eq!(
            catalog.resolve_subtopic("병원에서 의사와 환자", "3"),
            Some("처방 받기")
        );
        assert!(catalog.resolve_subtopic("병원에서 의사와 환자", "조식 문의").is_none());
    }

    #[test]
    fn display_name_includes_icon() {
        let topic = Topic::new("Airport", Some("✈️"), ["Check in"]);
        assert_eq!(topic.display_name(), "✈️ Airport");
        let topic = Topic::new("Airport", None, ["Check in"]);
        assert_eq!(topic.display_name(), "Airport");
    }

    #[test]
    fn yaml_catalog() {
        let catalog = Catalog::from_yaml_str(
            "topics:\n  - name: Bank\n    subtopics: [Open an account, Exchange money]\n  - name: Taxi\n    icon: \"🚕\"\n    subtopics: [Give directions]\n",
        )
        .unwrap();
        assert_eq!(catalog.topics().len(), 2);
        assert_eq!(catalog.topic("Bank").unwrap().icon, None);
        assert_eq!(catalog.topic("Taxi").unwrap().subtopics, vec!["Give directions"]);
    }

    #[test]
    fn invalid_catalogs_rejected() {
        assert!(Catalog::from_topics(Vec::new()).unwrap_err().is_config());
        let dup = vec![
            Topic::new("Bank", None, ["a"]),
            Topic::new("Bank", None, ["b"]),
        ];
        assert!(Catalog::from_topics(dup).unwrap_err().is_config());
        let no_subs = vec![Topic::new("Bank", None, Vec::<String>::new())];
        assert!(Catalog::from_topics(no_subs).unwrap_err().is_config());
        let dup_sub = vec![Topic::new("Bank", None, ["a", "a"])];
        assert!(Catalog::from_topics(dup_sub).unwrap_err().is_config());
        assert!(Catalog::from_yaml_str("topics: 3").unwrap_err().is_config());
    }
}
