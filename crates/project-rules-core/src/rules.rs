//! Text rendering for `get_project_rules`.
//!
//! Output is a pure function of the store and the selector, so the same
//! request against the same document always yields the same text.

use std::collections::BTreeMap;

use crate::{CodeExample, RuleStore};

/// Selector that renders every section with at least one rule.
pub const ALL_SECTIONS: &str = "all";

/// Selector that renders the code-examples block.
pub const EXAMPLES_SECTION: &str = "examples";

/// Sections rendered first, in this order, by [`ALL_SECTIONS`]. Any other
/// configured section follows in lexical order.
pub const KNOWN_SECTIONS: [&str; 3] = ["composition-api", "styling", "reusability"];

/// Returned when a selector renders nothing.
pub const NO_RULES_FOUND: &str = "No rules found for the specified section.";

pub fn build(store: &RuleStore, selector: &str) -> String {
    let content = match selector {
        ALL_SECTIONS => render_all(store),
        EXAMPLES_SECTION => render_examples(store.examples()),
        key => render_section(store, key).unwrap_or_default(),
    };
    if content.is_empty() {
        NO_RULES_FOUND.to_string()
    } else {
        content
    }
}

fn render_all(store: &RuleStore) -> String {
    let extra = store.section_keys().filter(|k| !KNOWN_SECTIONS.contains(k));
    KNOWN_SECTIONS
        .into_iter()
        .chain(extra)
        .filter_map(|key| render_section(store, key))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// `## <heading>` followed by one bullet per rule. `None` for an empty section.
fn render_section(store: &RuleStore, key: &str) -> Option<String> {
    let rules = store.section(key);
    if rules.is_empty() {
        return None;
    }
    let heading = store
        .section_title(key)
        .map(str::to_string)
        .unwrap_or_else(|| key.to_uppercase());
    let mut out = format!("## {}", heading);
    for rule in rules {
        out.push_str("\n- ");
        out.push_str(rule);
    }
    Some(out)
}

fn render_examples(examples: &BTreeMap<String, CodeExample>) -> String {
    if examples.is_empty() {
        return String::new();
    }
    let mut out = String::from("## CODE EXAMPLES\n");
    for (key, example) in examples {
        out.push_str(&format!("\n### {}\n", key));
        if let Some(description) = example.description.as_deref().filter(|d| !d.is_empty()) {
            out.push_str(&format!("{}\n", description));
        }
        let blocks = [
            ("✅ GOOD:", &example.good),
            ("❌ BAD:", &example.bad),
            ("CODE:", &example.code),
        ];
        for (label, body) in blocks {
            if let Some(body) = body {
                out.push_str(&format!("{}\n```\n{}\n```\n", label, body));
            }
        }
    }
    out.truncate(out.trim_end().len());
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn store() -> RuleStore {
        RuleStore::from_json(
            r#"{
                "sections": {
                    "styling": { "title": "Styling", "rules": ["Use utilities"] },
                    "composition-api": { "rules": ["Use <script setup>", "Prefer composables"] },
                    "reusability": { "title": "Reuse", "rules": [] },
                    "backend": { "rules": ["Validate input"] }
                },
                "codeExamples": {
                    "button": { "description": "Reuse VBtn", "good": "<v-btn />", "bad": "<button class=\"x\" />" },
                    "composable": { "description": "Extract logic", "code": "useThing()" }
                }
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_single_section_uses_title() {
        let text = build(&store(), "styling");
        assert_eq!(text, "## Styling\n- Use utilities");
    }

    #[test]
    fn test_untitled_section_uses_upper_cased_key() {
        let text = build(&store(), "composition-api");
        assert_eq!(
            text,
            "## COMPOSITION-API\n- Use <script setup>\n- Prefer composables"
        );
    }

    #[test]
    fn test_all_orders_known_sections_first_and_skips_empty() {
        let text = build(&store(), ALL_SECTIONS);
        assert_eq!(
            text,
            "## COMPOSITION-API\n- Use <script setup>\n- Prefer composables\n\n\
             ## Styling\n- Use utilities\n\n\
             ## BACKEND\n- Validate input"
        );
        assert!(!text.contains("Reuse"));
    }

    #[test_case("reusability" ; "known but empty")]
    #[test_case("nope" ; "unknown key")]
    #[test_case("" ; "empty selector")]
    fn test_sentinel(selector: &str) {
        assert_eq!(build(&store(), selector), NO_RULES_FOUND);
    }

    #[test]
    fn test_empty_store() {
        let store = RuleStore::default();
        assert_eq!(build(&store, ALL_SECTIONS), NO_RULES_FOUND);
        assert_eq!(build(&store, EXAMPLES_SECTION), NO_RULES_FOUND);
    }

    #[test]
    fn test_examples_render_present_blocks_only() {
        let text = build(&store(), EXAMPLES_SECTION);
        assert!(text.starts_with("## CODE EXAMPLES\n\n### button\nReuse VBtn\n"));
        assert!(text.contains("✅ GOOD:\n```\n<v-btn />\n```"));
        assert!(text.contains("❌ BAD:\n```\n<button class=\"x\" />\n```"));
        assert!(text.contains("### composable\nExtract logic\nCODE:\n```\nuseThing()\n```"));
        assert_eq!(text.matches("GOOD:").count(), 1);
        assert!(!text.ends_with('\n'));
    }

    #[test]
    fn test_example_without_description() {
        let store =
            RuleStore::from_json(r#"{"codeExamples": {"x": {"description": null, "code": "a()"}}}"#)
                .unwrap();
        assert_eq!(
            build(&store, EXAMPLES_SECTION),
            "## CODE EXAMPLES\n\n### x\nCODE:\n```\na()\n```"
        );
    }

    #[test]
    fn test_build_is_idempotent() {
        let store = store();
        assert_eq!(build(&store, ALL_SECTIONS), build(&store, ALL_SECTIONS));
        assert_eq!(build(&store, "styling"), build(&store, "styling"));
    }
}
