//! Client-side state for the explainer and enhancer tools
//!
//! The editor text must parse before anything is sent to the proxy; a parse
//! failure is returned with line and column and no request is made.

use super::{ClientError, ProxyApi};
use crate::analysis::AnalysisKind;
use crate::document::{self, DocumentError};
use crate::enhance::{Enhancement, PromptCategory};
use crate::graph::{build_graph, JsonGraph};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

/// Questions and answers about the loaded document, in order
#[derive(Debug, Clone, Default)]
pub struct ChatTranscript {
    messages: Vec<ChatMessage>,
}

impl ChatTranscript {
    pub fn push(&mut self, role: Role, content: impl Into<String>) {
        self.messages.push(ChatMessage {
            role,
            content: content.into(),
        });
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

/// JSON editor plus the analysis results produced for it
pub struct Workbench<A> {
    api: A,
    text: String,
    explanation: Option<String>,
    documentation: Option<String>,
    summary: Option<String>,
    transcript: ChatTranscript,
}

impl<A: ProxyApi> Workbench<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            text: "{}".to_string(),
            explanation: None,
            documentation: None,
            summary: None,
            transcript: ChatTranscript::default(),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    /// Replace the editor text with the contents of a `.json` file
    pub fn load_file(&mut self, path: &Path) -> Result<(), ClientError> {
        self.text = document::load_json_file(path)?;
        info!(path = %path.display(), bytes = self.text.len(), "Loaded JSON file");
        Ok(())
    }

    /// Pretty-print the editor text in place
    pub fn format(&mut self) -> Result<&str, ClientError> {
        self.text = document::format_json(&self.text)?;
        Ok(self.text.as_str())
    }

    /// Parse the editor text
    pub fn document(&self) -> Result<Value, DocumentError> {
        document::parse_document(&self.text)
    }

    /// Build the node/edge graph for the current document
    pub fn graph(&self) -> Result<JsonGraph, ClientError> {
        Ok(build_graph(&self.document()?))
    }

    async fn analyze(&self, kind: AnalysisKind, query: Option<&str>) -> Result<String, ClientError> {
        let document = self.document()?;
        self.api.analyze(&document, kind, query).await
    }

    pub async fn explain(&mut self) -> Result<&str, ClientError> {
        let result = self.analyze(AnalysisKind::Explain, None).await?;
        Ok(self.explanation.insert(result).as_str())
    }

    pub async fn generate_docs(&mut self) -> Result<&str, ClientError> {
        let result = self.analyze(AnalysisKind::Docs, None).await?;
        Ok(self.documentation.insert(result).as_str())
    }

    pub async fn summarize(&mut self) -> Result<&str, ClientError> {
        let result = self.analyze(AnalysisKind::Summary, None).await?;
        Ok(self.summary.insert(result).as_str())
    }

    /// Ask a question about the document.
    ///
    /// Blank questions are ignored and return `Ok(None)`. The question is
    /// recorded before the request; the answer only when the request succeeds.
    pub async fn ask(&mut self, question: &str) -> Result<Option<&str>, ClientError> {
        if question.trim().is_empty() {
            return Ok(None);
        }

        self.transcript.push(Role::User, question);
        let answer = self.analyze(AnalysisKind::Query, Some(question)).await?;
        self.transcript.push(Role::Assistant, answer);
        Ok(self.transcript.messages().last().map(|m| m.content.as_str()))
    }

    pub fn explanation(&self) -> Option<&str> {
        self.explanation.as_deref()
    }

    pub fn documentation(&self) -> Option<&str> {
        self.documentation.as_deref()
    }

    pub fn summary(&self) -> Option<&str> {
        self.summary.as_deref()
    }

    pub fn transcript(&self) -> &ChatTranscript {
        &self.transcript
    }
}

/// Prompt enhancer holding the most recent result
pub struct Enhancer<A> {
    api: A,
    result: Option<Enhancement>,
}

impl<A: ProxyApi> Enhancer<A> {
    pub fn new(api: A) -> Self {
        Self { api, result: None }
    }

    pub async fn enhance(
        &mut self,
        prompt: &str,
        category: PromptCategory,
    ) -> Result<&Enhancement, ClientError> {
        if prompt.trim().is_empty() {
            return Err(ClientError::EmptyPrompt);
        }
        let enhancement = self.api.enhance(prompt, category).await?;
        Ok(&*self.result.insert(enhancement))
    }

    pub fn result(&self) -> Option<&Enhancement> {
        self.result.as_ref()
    }

    /// The enhanced JSON as shown to the user
    pub fn enhanced_json(&self) -> Option<Result<String, DocumentError>> {
        self.result.as_ref().map(|r| document::to_pretty(&r.enhanced))
    }

    /// Save the enhanced JSON; returns `Ok(None)` when nothing has been enhanced yet
    pub fn download(&self, path: &Path) -> Result<Option<PathBuf>, ClientError> {
        match &self.result {
            Some(result) => Ok(Some(document::save_json_file(path, &result.enhanced)?)),
            None => Ok(None),
        }
    }
}
