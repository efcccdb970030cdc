//! Best-effort splitting of an enhancement reply into JSON and comparison text
//!
//! The model is asked for a fenced ```json block followed by a `COMPARISON:`
//! section, but nothing enforces that. Anything that does not parse degrades
//! to `{"raw_response": <reply>}` instead of failing.

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::LazyLock;
use tracing::warn;

/// Used when the reply has no `COMPARISON:` section
pub const DEFAULT_COMPARISON: &str =
    "Enhanced prompt provides more structure and detail for better AI generation results.";

static JSON_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```json\r?\n(.*?)\r?\n```").expect("valid JSON block regex"));

static COMPARISON: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)COMPARISON:\r?\n(.*)\z").expect("valid comparison regex"));

/// Enhanced prompt plus an explanation of what changed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enhancement {
    pub enhanced: Value,
    pub comparison: String,
}

/// Split a model reply into the enhanced JSON and the comparison text
pub fn parse_enhancement(content: &str) -> Enhancement {
    let enhanced = match JSON_BLOCK.captures(content) {
        Some(caps) => serde_json::from_str(&caps[1]).unwrap_or_else(|e| {
            warn!(error = %e, "Failed to parse enhanced JSON block");
            raw_response(content)
        }),
        None => serde_json::from_str(content).unwrap_or_else(|_| raw_response(content)),
    };

    let comparison = COMPARISON
        .captures(content)
        .map(|caps| caps[1].trim().to_string())
        .unwrap_or_else(|| DEFAULT_COMPARISON.to_string());

    Enhancement {
        enhanced,
        comparison,
    }
}

fn raw_response(content: &str) -> Value {
    json!({ "raw_response": content })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_and_comparison() {
        let reply = "Here you go:\n```json\n{\"subject\": \"cat\", \"style\": [\"oil\"]}\n```\n\nCOMPARISON:\n  Added style and subject.\nMore detail now.  \n";
        let result = parse_enhancement(reply);
        assert_eq!(result.enhanced, json!({"subject": "cat", "style": ["oil"]}));
        assert_eq!(result.comparison, "Added style and subject.\nMore detail now.");
    }

    #[test]
    fn test_first_block_wins() {
        let reply = "```json\n{\"a\": 1}\n```\n```json\n{\"b\": 2}\n```";
        assert_eq!(parse_enhancement(reply).enhanced, json!({"a": 1}));
    }

    #[test]
    fn test_whole_reply_parsed_when_no_block() {
        let result = parse_enhancement("{\"scene\": \"beach\"}");
        assert_eq!(result.enhanced, json!({"scene": "beach"}));
        assert_eq!(result.comparison, DEFAULT_COMPARISON);
    }

    #[test]
    fn test_plain_text_falls_back_to_raw_response() {
        let reply = "Sorry, I can't produce JSON today.";
        let result = parse_enhancement(reply);
        assert_eq!(result.enhanced, json!({"raw_response": reply}));
        assert_eq!(result.comparison, DEFAULT_COMPARISON);
    }

    #[test]
    fn test_broken_block_falls_back_to_raw_response() {
        let reply = "```json\n{\"a\": \n```\nCOMPARISON:\nbetter";
        let result = parse_enhancement(reply);
        assert_eq!(result.enhanced, json!({"raw_response": reply}));
        assert_eq!(result.comparison, "better");
    }

    #[test]
    fn test_crlf_line_endings() {
        let reply = "```json\r\n{\"a\": 1}\r\n```\r\nCOMPARISON:\r\nclearer\r\n";
        let result = parse_enhancement(reply);
        assert_eq!(result.enhanced, json!({"a": 1}));
        assert_eq!(result.comparison, "clearer");
    }
}
