//! Prompt templates for JSON analysis requests

use crate::provider::LlmRequest;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors from building an analysis request
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Invalid analysis type: {0}")]
    InvalidKind(String),

    #[error("A question is required for query analysis")]
    MissingQuery,

    #[error("Failed to serialize JSON document: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// What the model should produce for a JSON document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisKind {
    /// Plain-English explanation for non-technical readers
    Explain,
    /// Developer documentation of the structure
    Docs,
    /// Concise summary with key insights
    Summary,
    /// Answer a free-form question about the data
    Query,
}

impl AnalysisKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisKind::Explain => "explain",
            AnalysisKind::Docs => "docs",
            AnalysisKind::Summary => "summary",
            AnalysisKind::Query => "query",
        }
    }

    fn system_prompt(&self) -> &'static str {
        match self {
            AnalysisKind::Explain => {
                "You are a JSON expert that explains JSON structures in clear, plain English. \
                 Make it understandable for non-technical users."
            }
            AnalysisKind::Docs => {
                "You are a technical documentation writer. \
                 Generate detailed developer documentation for JSON structures."
            }
            AnalysisKind::Summary => {
                "You are a data analyst that creates concise summaries. \
                 Focus on key insights and patterns."
            }
            AnalysisKind::Query => {
                "You are a JSON query assistant. \
                 Answer questions about JSON data accurately and concisely."
            }
        }
    }
}

impl fmt::Display for AnalysisKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AnalysisKind {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "explain" => Ok(AnalysisKind::Explain),
            "docs" => Ok(AnalysisKind::Docs),
            "summary" => Ok(AnalysisKind::Summary),
            "query" => Ok(AnalysisKind::Query),
            other => Err(AnalysisError::InvalidKind(other.to_string())),
        }
    }
}

/// Build the system/user prompt pair for analyzing `document`.
///
/// The document is embedded pretty-printed. `query` is only consulted for
/// [`AnalysisKind::Query`], where it must be present and non-blank.
pub fn build_request(
    kind: AnalysisKind,
    document: &Value,
    query: Option<&str>,
) -> Result<LlmRequest, AnalysisError> {
    let pretty = serde_json::to_string_pretty(document)?;

    let user = match kind {
        AnalysisKind::Explain => {
            format!("Explain this JSON structure and its data in plain English:\n\n{pretty}")
        }
        AnalysisKind::Docs => format!(
            "Generate comprehensive documentation for this JSON structure. \
             Include object descriptions, field meanings, expected types, and relationships:\n\n{pretty}"
        ),
        AnalysisKind::Summary => format!(
            "Provide a concise summary of this JSON data. \
             Include key statistics, patterns, and important insights:\n\n{pretty}"
        ),
        AnalysisKind::Query => {
            let question = query
                .map(str::trim)
                .filter(|q| !q.is_empty())
                .ok_or(AnalysisError::MissingQuery)?;
            format!("Based on this JSON data:\n\n{pretty}\n\nAnswer this question: {question}")
        }
    };

    Ok(LlmRequest::new(kind.system_prompt(), user))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_kind_parsing() {
        assert_eq!("explain".parse::<AnalysisKind>().unwrap(), AnalysisKind::Explain);
        assert_eq!("docs".parse::<AnalysisKind>().unwrap(), AnalysisKind::Docs);
        assert_eq!("summary".parse::<AnalysisKind>().unwrap(), AnalysisKind::Summary);
        assert_eq!("query".parse::<AnalysisKind>().unwrap(), AnalysisKind::Query);
        assert!(matches!(
            "graph".parse::<AnalysisKind>(),
            Err(AnalysisError::InvalidKind(k)) if k == "graph"
        ));
    }

    #[test]
    fn test_explain_embeds_pretty_document() {
        let request = build_request(AnalysisKind::Explain, &json!({"a": [1, 2]}), None).unwrap();
        assert!(request.system.contains("plain English"));
        assert!(request.prompt.ends_with("{\n  \"a\": [\n    1,\n    2\n  ]\n}"));
        assert!(request.temperature.is_none());
    }

    #[test]
    fn test_query_appends_question() {
        let request =
            build_request(AnalysisKind::Query, &json!({"n": 3}), Some("What is n?")).unwrap();
        assert!(request.prompt.starts_with("Based on this JSON data:"));
        assert!(request.prompt.ends_with("Answer this question: What is n?"));
    }

    #[test]
    fn test_query_requires_question() {
        assert!(matches!(
            build_request(AnalysisKind::Query, &json!({}), None),
            Err(AnalysisError::MissingQuery)
        ));
        assert!(matches!(
            build_request(AnalysisKind::Query, &json!({}), Some("   ")),
            Err(AnalysisError::MissingQuery)
        ));
    }

    #[test]
    fn test_query_ignored_for_other_kinds() {
        let request = build_request(AnalysisKind::Summary, &json!([]), Some("ignored")).unwrap();
        assert!(!request.prompt.contains("ignored"));
    }
}
