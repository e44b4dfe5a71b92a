//! Test doubles for the extraction pipeline.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{Map, Value};
use tempfile::NamedTempFile;

use crate::extraction::pdf::{PageExtractor, PdfError};
use crate::extraction::record::{CHILDREN_COUNT_FIELD, FIELD_NAMES};
use crate::llm_client::{CompletionModel, LlmError, ModelOutput};

/// Reads the "PDF" as UTF-8 text, one page per form feed, and remembers every path
/// it was asked to read.
#[derive(Default)]
pub struct FileTextExtractor {
    seen: Mutex<Vec<PathBuf>>,
}

impl FileTextExtractor {
    pub fn seen_paths(&self) -> Vec<PathBuf> {
        self.seen.lock().unwrap().clone()
    }
}

impl PageExtractor for FileTextExtractor {
    fn extract_pages(&self, path: &Path) -> Result<Vec<String>, PdfError> {
        self.seen.lock().unwrap().push(path.to_path_buf());
        let text =
            std::fs::read_to_string(path).map_err(|e| PdfError::Extraction(e.to_string()))?;
        Ok(text.split('\u{c}').map(String::from).collect())
    }
}

/// Writes `text` to a temp file in the format `FileTextExtractor` understands.
pub fn pdf_file(text: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(text.as_bytes()).unwrap();
    file
}

type Reply = Box<dyn Fn(&str) -> Result<ModelOutput, LlmError> + Send + Sync>;

pub struct ScriptedModel {
    reply: Reply,
    calls: AtomicUsize,
    last_prompt: Mutex<Option<String>>,
}

impl ScriptedModel {
    pub fn new(
        reply: impl Fn(&str) -> Result<ModelOutput, LlmError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            reply: Box::new(reply),
            calls: AtomicUsize::new(0),
            last_prompt: Mutex::new(None),
        }
    }

    /// Always answers with `content`.
    pub fn replying(content: &str) -> Self {
        let content = content.to_string();
        Self::new(move |_| {
            Ok(ModelOutput {
                text: None,
                content: Some(content.clone()),
            })
        })
    }

    pub fn failing(error: impl Fn() -> LlmError + Send + Sync + 'static) -> Self {
        Self::new(move |_| Err(error()))
    }

    /// Answers with a fenced JSON object built from `Field: value` pairs found in
    /// the prompt.
    pub fn form_filler() -> Self {
        Self::new(|prompt| {
            let body = Value::Object(fields_in(prompt)).to_string();
            Ok(ModelOutput {
                text: None,
                content: Some(format!("```json\n{body}\n```")),
            })
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.last_prompt.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionModel for ScriptedModel {
    fn model_name(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, prompt: &str) -> Result<ModelOutput, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_prompt.lock().unwrap() = Some(prompt.to_string());
        (self.reply)(prompt)
    }
}

fn fields_in(text: &str) -> Map<String, Value> {
    let mut fields = Map::new();
    for name in FIELD_NAMES {
        let label = format!("{name}: ");
        let found = text.match_indices(&label).find(|(at, _)| {
            text[..*at]
                .chars()
                .next_back()
                .map_or(true, |c| !c.is_alphanumeric())
        });
        let Some((at, _)) = found else { continue };

        let rest = &text[at + label.len()..];
        let end = rest.find([',', '\n']).unwrap_or(rest.len());
        let value = rest[..end].trim().trim_end_matches('.');

        let value = if name == CHILDREN_COUNT_FIELD {
            value.parse::<u64>().map(Value::from).unwrap_or(Value::Null)
        } else {
            Value::from(value)
        };
        fields.insert(name.to_string(), value);
    }
    fields
}
