//! Loading, validating, formatting and saving JSON documents

use serde_json::Value;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File name used when saving an enhanced prompt without an explicit path
pub const DEFAULT_DOWNLOAD_NAME: &str = "enhanced-prompt.json";

#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("Invalid JSON at line {line}, column {column}: {message}")]
    InvalidJson {
        line: usize,
        column: usize,
        message: String,
    },

    #[error("Not a .json file: {0}")]
    NotJsonFile(PathBuf),

    #[error("Failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to serialize JSON: {0}")]
    Serialize(serde_json::Error),
}

impl DocumentError {
    fn io(path: &Path, source: std::io::Error) -> Self {
        DocumentError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

impl From<serde_json::Error> for DocumentError {
    fn from(err: serde_json::Error) -> Self {
        if err.is_syntax() || err.is_eof() || err.is_data() {
            // serde_json appends " at line X column Y" to its Display output
            let message = err.to_string();
            let message = match message.rfind(" at line ") {
                Some(idx) => message[..idx].to_string(),
                None => message,
            };
            DocumentError::InvalidJson {
                line: err.line(),
                column: err.column(),
                message,
            }
        } else {
            DocumentError::Serialize(err)
        }
    }
}

/// Parse editor text into a JSON value
pub fn parse_document(text: &str) -> Result<Value, DocumentError> {
    Ok(serde_json::from_str(text)?)
}

/// Pretty-print JSON text with two-space indentation.
///
/// Object keys keep their original order and floats parse to the exact f64
/// they were printed from, so formatting already formatted text returns it
/// unchanged.
pub fn format_json(text: &str) -> Result<String, DocumentError> {
    let value = parse_document(text)?;
    to_pretty(&value)
}

pub fn to_pretty(value: &Value) -> Result<String, DocumentError> {
    serde_json::to_string_pretty(value).map_err(DocumentError::Serialize)
}

/// Read a `.json` file as text without validating its contents
pub fn load_json_file(path: &Path) -> Result<String, DocumentError> {
    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    if !is_json {
        return Err(DocumentError::NotJsonFile(path.to_path_buf()));
    }
    std::fs::read_to_string(path).map_err(|e| DocumentError::io(path, e))
}

/// Write `value` pretty-printed to `path`, or to [`DEFAULT_DOWNLOAD_NAME`] inside
/// `path` when it is a directory. Returns the file that was written.
pub fn save_json_file(path: &Path, value: &Value) -> Result<PathBuf, DocumentError> {
    let target = if path.is_dir() {
        path.join(DEFAULT_DOWNLOAD_NAME)
    } else {
        path.to_path_buf()
    };
    let mut contents = to_pretty(value)?;
    contents.push('\n');
    std::fs::write(&target, contents).map_err(|e| DocumentError::io(&target, e))?;
    Ok(target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_format_is_idempotent() {
        let inputs = [
            r#"{"b":1,"a":[1,2,{"c":null}],"s":"x\ny"}"#,
            "[ ]",
            "  3.5 ",
            r#"{"nested":{"deep":{"deeper":[true,false]}}}"#,
            "1.07156603914658259e-75",
            "[4.42516040271433752e284]",
            "18446744073709551616",
            "[-0, -0.0, 0.1, 1e-320, 1.7976931348623157e308]",
            r#"{"\u00e9t\u00e9": "\ud83d\ude00 \u0000 \t"}"#,
            "null",
        ];
        for input in inputs {
            let once = format_json(input).unwrap();
            assert_eq!(format_json(&once).unwrap(), once, "input: {input}");
        }
    }

    #[test]
    fn test_format_is_idempotent_for_arbitrary_floats() {
        // xorshift64 over raw bit patterns reaches subnormals and extreme exponents
        let mut state: u64 = 0x9E37_79B9_7F4A_7C15;
        let mut checked = 0;
        while checked < 5000 {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            let float = f64::from_bits(state);
            if !float.is_finite() {
                continue;
            }
            checked += 1;

            let input = format!("{{\"n\": [{float:e}, {float}]}}");
            let once = format_json(&input).unwrap();
            assert_eq!(format_json(&once).unwrap(), once, "input: {input}");
        }
    }

    #[test]
    fn test_format_keeps_key_order() {
        let formatted = format_json(r#"{"zeta":1,"alpha":2}"#).unwrap();
        assert_eq!(formatted, "{\n  \"zeta\": 1,\n  \"alpha\": 2\n}");
    }

    #[test]
    fn test_invalid_json_reports_position() {
        let err = parse_document("{\n  \"a\": 1,\n  \"b\": }").unwrap_err();
        match err {
            DocumentError::InvalidJson {
                line,
                column,
                message,
            } => {
                assert_eq!(line, 3);
                assert!(column > 0);
                assert!(!message.contains("at line"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_empty_input_is_invalid() {
        assert!(matches!(
            parse_document(""),
            Err(DocumentError::InvalidJson { .. })
        ));
    }

    #[test]
    fn test_load_rejects_other_extensions() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.txt");
        std::fs::write(&path, "{}").unwrap();
        assert!(matches!(
            load_json_file(&path),
            Err(DocumentError::NotJsonFile(_))
        ));
    }

    #[test]
    fn test_load_reads_text_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Data.JSON");
        std::fs::write(&path, "{ not validated").unwrap();
        assert_eq!(load_json_file(&path).unwrap(), "{ not validated");
    }

    #[test]
    fn test_save_into_directory_uses_default_name() {
        let dir = tempfile::tempdir().unwrap();
        let written = save_json_file(dir.path(), &json!({"k": "v"})).unwrap();
        assert_eq!(written, dir.path().join(DEFAULT_DOWNLOAD_NAME));
        let text = std::fs::read_to_string(written).unwrap();
        assert_eq!(text, "{\n  \"k\": \"v\"\n}\n");
    }
}
