use serde::{Deserialize, Deserializer, Serialize};

/// Editor contents used when a question ships without starter code.
pub const DEFAULT_STARTER_CODE: &str = "// Write your code here\n";

#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, strum_macros::Display,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    /// Case-insensitive parse; anything unrecognized falls back to Medium,
    /// matching how imported question sets treat a missing difficulty.
    pub fn parse_lenient(raw: &str) -> Self {
        match raw.to_lowercase().as_str() {
            "easy" => Difficulty::Easy,
            "hard" => Difficulty::Hard,
            _ => Difficulty::Medium,
        }
    }
}

fn lenient_difficulty<'de, D>(deserializer: D) -> Result<Difficulty, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw
        .map(|s| Difficulty::parse_lenient(&s))
        .unwrap_or_default())
}

#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, strum_macros::Display,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "snake_case")]
pub enum QuestionKind {
    #[default]
    Coding,
    Theory,
    SystemDesign,
}

/// Worked example shown alongside a question; display-only.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Example {
    pub input: String,
    pub output: String,
    #[serde(default)]
    pub explanation: Option<String>,
}

/// A single interview question as produced by a question bank.
///
/// The id is stable for the lifetime of a session; the session never
/// mutates questions after it has started.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    #[serde(default)]
    pub id: String,
    pub prompt: String,
    #[serde(rename = "type", default)]
    pub kind: QuestionKind,
    #[serde(default, deserialize_with = "lenient_difficulty")]
    pub difficulty: Difficulty,
    #[serde(default)]
    pub starter_code: Option<String>,
    #[serde(default)]
    pub examples: Vec<Example>,
    #[serde(default)]
    pub constraints: Vec<String>,
}

impl Question {
    /// Initial editor contents for this question.
    pub fn initial_draft(&self) -> String {
        self.starter_code
            .clone()
            .unwrap_or_else(|| DEFAULT_STARTER_CODE.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> Question {
        serde_json::from_str(json).expect("question should deserialize")
    }

    #[test]
    fn test_parse_full_question() {
        let q = parse(
            r#"{
                "id": "q1",
                "prompt": "Reverse a linked list.",
                "type": "CODING",
                "difficulty": "HARD",
                "starterCode": "fn reverse() {}\n",
                "examples": [{"input": "1->2", "output": "2->1"}],
                "constraints": ["O(n) time"]
            }"#,
        );

        assert_eq!(q.id, "q1");
        assert_eq!(q.kind, QuestionKind::Coding);
        assert_eq!(q.difficulty, Difficulty::Hard);
        assert_eq!(q.starter_code.as_deref(), Some("fn reverse() {}\n"));
        assert_eq!(q.examples.len(), 1);
        assert_eq!(q.constraints.len(), 1);
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let q = parse(r#"{"prompt": "What is a deadlock?"}"#);

        assert_eq!(q.id, "");
        assert_eq!(q.kind, QuestionKind::Coding);
        assert_eq!(q.difficulty, Difficulty::Medium);
        assert_eq!(q.starter_code, None);
        assert!(q.examples.is_empty());
        assert!(q.constraints.is_empty());
    }

    #[test]
    fn test_unknown_difficulty_falls_back_to_medium() {
        let q = parse(r#"{"prompt": "x", "difficulty": "IMPOSSIBLE"}"#);
        assert_eq!(q.difficulty, Difficulty::Medium);
    }

    #[test]
    fn test_difficulty_parse_is_case_insensitive() {
        assert_eq!(Difficulty::parse_lenient("EASY"), Difficulty::Easy);
        assert_eq!(Difficulty::parse_lenient("easy"), Difficulty::Easy);
        assert_eq!(Difficulty::parse_lenient("Hard"), Difficulty::Hard);
        assert_eq!(Difficulty::parse_lenient("medium"), Difficulty::Medium);
    }

    #[test]
    fn test_initial_draft_uses_starter_code() {
        let q = parse(r#"{"prompt": "x", "starterCode": "def solve():\n"}"#);
        assert_eq!(q.initial_draft(), "def solve():\n");
    }

    #[test]
    fn test_initial_draft_placeholder_when_absent() {
        let q = parse(r#"{"prompt": "x"}"#);
        assert_eq!(q.initial_draft(), DEFAULT_STARTER_CODE);
    }

    #[test]
    fn test_kind_variants_deserialize() {
        let q = parse(r#"{"prompt": "x", "type": "SYSTEM_DESIGN"}"#);
        assert_eq!(q.kind, QuestionKind::SystemDesign);
        let q = parse(r#"{"prompt": "x", "type": "THEORY"}"#);
        assert_eq!(q.kind, QuestionKind::Theory);
    }

    #[test]
    fn test_display_labels() {
        assert_eq!(Difficulty::Easy.to_string(), "easy");
        assert_eq!(QuestionKind::SystemDesign.to_string(), "system_design");
    }
}
