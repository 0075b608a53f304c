//! Project starter templates selected by framework
//!
//! The LLM classifies a free-form prompt into one of the known frameworks;
//! the matching `<keyword>.json` file is then read from the templates
//! directory.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

/// Frameworks a template exists for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Framework {
    Next,
    React,
    Node,
}

impl Framework {
    pub fn keyword(self) -> &'static str {
        match self {
            Framework::Next => "next",
            Framework::React => "react",
            Framework::Node => "node",
        }
    }
}

impl fmt::Display for Framework {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

impl FromStr for Framework {
    type Err = TemplateError;

    /// Parse a model reply such as `next`, ` React.` or `` `node` ``
    fn from_str(reply: &str) -> Result<Self, Self::Err> {
        let word = reply
            .trim()
            .trim_matches(|c: char| c == '`' || c == '"' || c == '\'' || c == '.')
            .trim()
            .to_ascii_lowercase();

        match word.as_str() {
            "next" => Ok(Framework::Next),
            "react" => Ok(Framework::React),
            "node" => Ok(Framework::Node),
            _ => Err(TemplateError::UnknownFramework(reply.trim().to_string())),
        }
    }
}

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("No template for framework '{0}'")]
    UnknownFramework(String),

    #[error("Failed to read template {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Template {path} is not valid JSON: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Instruction sent to the model to classify `prompt`
pub fn framework_prompt(prompt: &str) -> String {
    format!(
        "Please return either nextjs, vite or node based on the prompt. Important! Return only one word\n\
         Example: Create a todo app in nextjs Output: next\n\
         Example: Create a todo app in vite Output: react\n\
         Example: Create a todo app in node Output: node\n\
         {prompt}\n"
    )
}

/// Directory of `<framework>.json` template files
#[derive(Debug, Clone)]
pub struct TemplateLibrary {
    dir: PathBuf,
}

impl TemplateLibrary {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, framework: Framework) -> PathBuf {
        self.dir.join(format!("{}.json", framework.keyword()))
    }

    /// Read and parse the template for `framework`
    pub async fn load(&self, framework: Framework) -> Result<serde_json::Value, TemplateError> {
        let path = self.path_for(framework);
        let raw = tokio::fs::read_to_string(&path)
            .await
            .map_err(|source| TemplateError::Read {
                path: path.clone(),
                source,
            })?;

        serde_json::from_str(&raw).map_err(|source| TemplateError::Parse { path, source })
    }
}
