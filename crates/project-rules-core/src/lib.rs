pub mod error;
mod lenient;
pub mod rules;
pub mod validate;

pub use error::{LoadError, Result};

use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Location of the rules document, relative to the project root.
pub const RULES_FILE: &str = ".vscode/rules.json";

/// Returned by [`RuleStore::quick_prompt`] when the document has no prompt.
pub const DEFAULT_QUICK_PROMPT: &str = "🚨 CRITICAL PROJECT RULES: Use Vue 3 Composition API only, Vuetify utilities for styling, extend existing components.";

// --- Types ---

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RuleSection {
    #[serde(default, deserialize_with = "lenient::string")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient::strings")]
    pub rules: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CodeExample {
    #[serde(default, deserialize_with = "lenient::string")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub good: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub bad: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub code: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidatorSettings {
    /// When set, `<style>` blocks must declare `lang="<style_lang>"`
    /// instead of being rejected for `scoped`/`module`.
    #[serde(default, deserialize_with = "lenient::string")]
    pub style_lang: Option<String>,
}

/// The rules configuration, normalised from either accepted file shape.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleDocument {
    pub sections: BTreeMap<String, RuleSection>,
    pub quick_prompt: Option<String>,
    pub code_examples: BTreeMap<String, CodeExample>,
    pub validator: ValidatorSettings,
}

impl RuleDocument {
    pub fn from_json(raw: &str) -> Result<Self> {
        let raw: RawDocument = serde_json::from_str(raw)?;
        Ok(raw.into())
    }
}

// --- File shapes ---

/// On-disk layout. Accepts the keyed-section layout at the top level and the
/// older `projectRules` layout (rules grouped by category) side by side.
///
/// A wrong-typed value drops only itself (or the entry holding it), so the
/// rest of the document is still served.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawDocument {
    #[serde(default, deserialize_with = "lenient::entries")]
    sections: BTreeMap<String, RuleSection>,
    #[serde(default, deserialize_with = "lenient::string")]
    quick_prompt: Option<String>,
    #[serde(default, deserialize_with = "lenient::entries")]
    code_examples: BTreeMap<String, CodeExample>,
    #[serde(default, deserialize_with = "lenient::record")]
    validator: ValidatorSettings,
    #[serde(default, deserialize_with = "lenient::record")]
    project_rules: Option<LegacyProjectRules>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LegacyProjectRules {
    #[serde(default, deserialize_with = "lenient::record")]
    quick_reference_prompt: Option<LegacyPrompt>,
    #[serde(default, deserialize_with = "lenient::record")]
    vue3_development: Option<LegacyDevelopment>,
    #[serde(default, deserialize_with = "lenient::entries")]
    code_examples: BTreeMap<String, CodeExample>,
}

#[derive(Debug, Default, Deserialize)]
struct LegacyPrompt {
    #[serde(default, deserialize_with = "lenient::string")]
    prompt: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct LegacyDevelopment {
    #[serde(default, deserialize_with = "lenient::items")]
    rules: Vec<LegacyCategory>,
}

#[derive(Debug, Deserialize)]
struct LegacyCategory {
    category: String,
    #[serde(default, deserialize_with = "lenient::strings")]
    rules: Vec<String>,
}

impl From<RawDocument> for RuleDocument {
    fn from(raw: RawDocument) -> Self {
        let mut doc = RuleDocument {
            validator: raw.validator,
            ..Default::default()
        };

        if let Some(legacy) = raw.project_rules {
            doc.quick_prompt = legacy.quick_reference_prompt.and_then(|p| p.prompt);
            let categories = legacy.vue3_development.map(|d| d.rules).unwrap_or_default();
            for category in categories {
                doc.sections.insert(
                    legacy_section_key(&category.category),
                    RuleSection {
                        title: Some(category.category),
                        rules: category.rules,
                    },
                );
            }
            doc.code_examples = legacy.code_examples;
        }

        // Top-level entries override anything folded in from `projectRules`.
        doc.sections.extend(raw.sections);
        doc.code_examples.extend(raw.code_examples);
        if raw.quick_prompt.is_some() {
            doc.quick_prompt = raw.quick_prompt;
        }
        // These keys are selectors in their own right and could never be
        // requested as sections.
        for reserved in [rules::ALL_SECTIONS, rules::EXAMPLES_SECTION] {
            if doc.sections.remove(reserved).is_some() {
                warn!(key = reserved, "ignoring section with a reserved key");
            }
        }
        doc
    }
}

/// Map a legacy category name onto a section key.
fn legacy_section_key(category: &str) -> String {
    match category {
        "Composition API" => "composition-api".to_string(),
        "Styling and CSS Guidelines" => "styling".to_string(),
        "Reusable Techniques" => "reusability".to_string(),
        other => slug(other),
    }
}

fn slug(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for c in name.chars() {
        if c.is_alphanumeric() {
            out.extend(c.to_lowercase());
        } else if !out.is_empty() && !out.ends_with('-') {
            out.push('-');
        }
    }
    while out.ends_with('-') {
        out.pop();
    }
    out
}

// --- Storage ---

/// Resolve the rules document for a project root.
pub fn rules_path(root: &Path) -> PathBuf {
    root.join(RULES_FILE)
}

/// Read-only view over the rules document, loaded once per process.
#[derive(Debug, Clone, Default)]
pub struct RuleStore {
    document: RuleDocument,
}

impl RuleStore {
    pub fn new(document: RuleDocument) -> Self {
        Self { document }
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        RuleDocument::from_json(raw).map(Self::new)
    }

    /// Load the document at `path`. A missing file is an empty store, not an error.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no rules file, serving empty rules");
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(LoadError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        let raw: RawDocument = serde_json::from_str(&raw).map_err(|source| LoadError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::new(raw.into()))
    }

    /// Like [`RuleStore::load`], but any failure is logged and replaced by an
    /// empty document.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(store) => store,
            Err(e) => {
                warn!(error = %e, "falling back to empty rules");
                Self::default()
            }
        }
    }

    pub fn document(&self) -> &RuleDocument {
        &self.document
    }

    /// Rules for `key`, or an empty slice when the section is absent.
    pub fn section(&self, key: &str) -> &[String] {
        self.document
            .sections
            .get(key)
            .map(|s| s.rules.as_slice())
            .unwrap_or_default()
    }

    pub fn section_title(&self, key: &str) -> Option<&str> {
        self.document
            .sections
            .get(key)
            .and_then(|s| s.title.as_deref())
            .filter(|t| !t.is_empty())
    }

    /// Configured section keys in lexical order.
    pub fn section_keys(&self) -> impl Iterator<Item = &str> {
        self.document.sections.keys().map(String::as_str)
    }

    pub fn quick_prompt(&self) -> &str {
        self.document
            .quick_prompt
            .as_deref()
            .filter(|p| !p.is_empty())
            .unwrap_or(DEFAULT_QUICK_PROMPT)
    }

    pub fn examples(&self) -> &BTreeMap<String, CodeExample> {
        &self.document.code_examples
    }

    pub fn validator_settings(&self) -> &ValidatorSettings {
        &self.document.validator
    }
}
