use project_rules_core::validate::{self, Violation};
use project_rules_core::{rules, RuleStore};
use rmcp::model::ErrorData as McpError;
use serde_json::{json, Map, Value};

use crate::protocol::method_not_found;

pub const GET_PROJECT_RULES: &str = "get_project_rules";
pub const VALIDATE_CODE: &str = "validate_code";
pub const GET_QUICK_PROMPT: &str = "get_quick_prompt";

const QUICK_FIXES: &str = "\
**Quick fixes:**\n\
• Use `<script setup>` instead of Options API\n\
• Replace custom CSS with Vuetify classes: `ma-4`, `pa-2`, `text-h5`, etc.\n\
• Extend existing components with props instead of creating new files\n";

// --- Catalog ---

/// The `tools/list` result. Static for the life of the process.
pub fn tool_list() -> Value {
    json!({
        "tools": [
            {
                "name": GET_PROJECT_RULES,
                "description": "Get Vue 3 + Vuetify project development rules and guidelines",
                "inputSchema": {
                    "type": "object",
                    "properties": {
                        "section": {
                            "type": "string",
                            "description": "Specific section to retrieve (composition-api, styling, reusability, all)",
                            "enum": ["composition-api", "styling", "reusability", "examples", "all"]
                        }
                    }
                }
            },
            {
                "name": VALIDATE_CODE,
                "description": "Validate code against project rules and provide suggestions",
                "inputSchema": {
                    "type": "object",
                    "properties": {
                        "code": {
                            "type": "string",
                            "description": "The code to validate"
                        },
                        "type": {
                            "type": "string",
                            "description": "Type of code (vue, css, js)",
                            "enum": ["vue", "css", "js"],
                            "default": "vue"
                        }
                    },
                    "required": ["code"]
                }
            },
            {
                "name": GET_QUICK_PROMPT,
                "description": "Get the quick reference prompt for immediate use",
                "inputSchema": {
                    "type": "object",
                    "properties": {}
                }
            }
        ]
    })
}

// --- Calls ---

/// A `tools/call` with its arguments resolved to their defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolCall<'a> {
    GetProjectRules { section: &'a str },
    ValidateCode { code: &'a str, kind: &'a str },
    GetQuickPrompt,
}

impl<'a> ToolCall<'a> {
    /// `None` for tool names outside the catalog. Missing, empty or
    /// non-string arguments fall back to their defaults.
    pub fn parse(name: &str, args: Option<&'a Map<String, Value>>) -> Option<Self> {
        match name {
            GET_PROJECT_RULES => Some(ToolCall::GetProjectRules {
                section: string_arg(args, "section").unwrap_or(rules::ALL_SECTIONS),
            }),
            VALIDATE_CODE => Some(ToolCall::ValidateCode {
                code: string_arg(args, "code").unwrap_or(""),
                kind: string_arg(args, "type").unwrap_or(validate::VUE),
            }),
            GET_QUICK_PROMPT => Some(ToolCall::GetQuickPrompt),
            _ => None,
        }
    }

    pub fn run(&self, store: &RuleStore) -> String {
        match *self {
            ToolCall::GetProjectRules { section } => rules::build(store, section),
            ToolCall::ValidateCode { code, kind } => {
                let violations = validate::validate(code, kind, store.validator_settings());
                validation_report(&violations)
            }
            ToolCall::GetQuickPrompt => store.quick_prompt().to_string(),
        }
    }
}

fn string_arg<'a>(args: Option<&'a Map<String, Value>>, key: &str) -> Option<&'a str> {
    args.and_then(|a| a.get(key))
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}

/// Resolve and run a `tools/call`, producing the `result` payload.
pub fn call_tool(
    store: &RuleStore,
    name: &str,
    args: Option<&Map<String, Value>>,
) -> Result<Value, McpError> {
    let call = ToolCall::parse(name, args).ok_or_else(method_not_found)?;
    Ok(text_result(call.run(store)))
}

/// Wrap text as a single text content block.
pub fn text_result(text: String) -> Value {
    json!({ "content": [{ "type": "text", "text": text }] })
}

pub fn validation_report(violations: &[Violation]) -> String {
    let mut out = String::from("## CODE VALIDATION RESULTS:\n\n");
    if violations.is_empty() {
        out.push_str("✅ **Code follows project rules!**\n\n");
    } else {
        let lines: Vec<String> = violations.iter().map(ToString::to_string).collect();
        out.push_str(&format!("**Issues found:**\n{}\n\n", lines.join("\n")));
    }
    out.push_str(QUICK_FIXES);
    out
}
