//! Heuristic snippet checks for `validate_code`.
//!
//! Nothing here parses the snippet. Each check is a substring or regex test
//! over the raw text, so false positives and misses are expected. Only
//! `vue` snippets are checked; every other declared type passes.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;

use crate::ValidatorSettings;

/// The only code type the checks apply to.
pub const VUE: &str = "vue";

const OPTIONS_API_MARKER: &str = "export default {";
const SCRIPT_SETUP_MARKER: &str = "<script setup>";
const STYLE_MARKER: &str = "<style";
const CLASS_MARKER: &str = "class=";

const UTILITY_CLASS_PATTERN: &str = r#"class=['"][^'"]*(?:ma-|pa-|mt-|pt-|ml-|pl-|mr-|pr-|mb-|pb-|d-|text-|primary|secondary|success|error|elevation-)"#;

fn utility_class_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(UTILITY_CLASS_PATTERN).expect("valid regex"))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Advisory,
}

impl Severity {
    pub fn marker(self) -> &'static str {
        match self {
            Severity::Error => "❌",
            Severity::Advisory => "⚠️",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Check {
    OptionsApi,
    CustomCss,
    MissingUtilityClasses,
}

impl Check {
    pub fn severity(self) -> Severity {
        match self {
            Check::OptionsApi | Check::CustomCss => Severity::Error,
            Check::MissingUtilityClasses => Severity::Advisory,
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Check::OptionsApi => "Using Options API instead of Composition API",
            Check::CustomCss => "Using custom CSS instead of Vuetify utilities",
            Check::MissingUtilityClasses => "Consider using Vuetify utility classes for styling",
        }
    }
}

/// A single finding. Displays as `<marker> <message>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Violation {
    pub check: Check,
}

impl Violation {
    pub fn severity(&self) -> Severity {
        self.check.severity()
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.severity().marker(), self.check.message())
    }
}

/// How the custom-CSS check treats `<style>` blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StylePolicy<'a> {
    /// Flag style blocks marked `scoped` or `module`.
    RejectScoped,
    /// Flag style blocks that don't declare `lang="<lang>"`.
    RequireLang(&'a str),
}

impl<'a> StylePolicy<'a> {
    pub fn from_settings(settings: &'a ValidatorSettings) -> Self {
        match settings.style_lang.as_deref().filter(|l| !l.is_empty()) {
            Some(lang) => StylePolicy::RequireLang(lang),
            None => StylePolicy::RejectScoped,
        }
    }

    fn flags(self, code: &str) -> bool {
        match self {
            StylePolicy::RejectScoped => code.contains("scoped") || code.contains("module"),
            StylePolicy::RequireLang(lang) => {
                !code.contains(&format!("lang=\"{}\"", lang))
                    && !code.contains(&format!("lang='{}'", lang))
            }
        }
    }
}

/// Run every check against `code`. Results follow check order, unranked and
/// not deduplicated.
pub fn validate(code: &str, kind: &str, settings: &ValidatorSettings) -> Vec<Violation> {
    let mut violations = Vec::new();
    if kind != VUE {
        return violations;
    }

    if code.contains(OPTIONS_API_MARKER) && !code.contains(SCRIPT_SETUP_MARKER) {
        violations.push(Violation {
            check: Check::OptionsApi,
        });
    }

    if code.contains(STYLE_MARKER) && StylePolicy::from_settings(settings).flags(code) {
        violations.push(Violation {
            check: Check::CustomCss,
        });
    }

    if code.contains(CLASS_MARKER) && !utility_class_regex().is_match(code) {
        violations.push(Violation {
            check: Check::MissingUtilityClasses,
        });
    }

    violations
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn checks(code: &str) -> Vec<Check> {
        validate(code, VUE, &ValidatorSettings::default())
            .into_iter()
            .map(|v| v.check)
            .collect()
    }

    #[test]
    fn test_options_api_flagged() {
        assert_eq!(checks("export default { }"), vec![Check::OptionsApi]);
    }

    #[test]
    fn test_script_setup_is_not_options_api() {
        assert!(checks("<script setup>").is_empty());
        assert!(checks("<script setup>\nexport default {}\n</script>").is_empty());
    }

    #[test_case("<style scoped>.a{}</style>" ; "scoped")]
    #[test_case("<style module>.a{}</style>" ; "module")]
    fn test_scoped_style_flagged(code: &str) {
        assert_eq!(checks(code), vec![Check::CustomCss]);
    }

    #[test]
    fn test_plain_style_passes_default_policy() {
        assert!(checks("<style>.a{}</style>").is_empty());
    }

    #[test]
    fn test_require_lang_policy() {
        let settings = ValidatorSettings {
            style_lang: Some("scss".to_string()),
        };
        let flagged = validate("<style>.a{}</style>", VUE, &settings);
        assert_eq!(flagged.len(), 1);
        assert_eq!(flagged[0].check, Check::CustomCss);

        assert!(validate(r#"<style lang="scss" scoped></style>"#, VUE, &settings).is_empty());
        assert!(validate("<style lang='scss'></style>", VUE, &settings).is_empty());
    }

    #[test_case(r#"<div class="ma-4">"# ; "spacing")]
    #[test_case(r#"<div class='d-flex'>"# ; "display")]
    #[test_case(r#"<v-btn class="big primary">"# ; "semantic colour")]
    #[test_case(r#"<v-card class="elevation-2">"# ; "elevation")]
    fn test_utility_classes_pass(code: &str) {
        assert!(checks(code).is_empty());
    }

    #[test]
    fn test_missing_utility_classes_is_advisory() {
        let found = validate(r#"<div class="card">"#, VUE, &ValidatorSettings::default());
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].severity(), Severity::Advisory);
        assert_eq!(
            found[0].to_string(),
            "⚠️ Consider using Vuetify utility classes for styling"
        );
    }

    #[test]
    fn test_all_checks_run_in_order() {
        let code = "<template><div class=\"card\"></div></template>\n\
                    <script>export default { name: 'X' }</script>\n\
                    <style scoped>.card{}</style>";
        assert_eq!(
            checks(code),
            vec![
                Check::OptionsApi,
                Check::CustomCss,
                Check::MissingUtilityClasses
            ]
        );
        let rendered: Vec<String> = validate(code, VUE, &ValidatorSettings::default())
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(rendered[0], "❌ Using Options API instead of Composition API");
        assert_eq!(rendered[1], "❌ Using custom CSS instead of Vuetify utilities");
    }

    #[test_case("css" ; "css")]
    #[test_case("js" ; "js")]
    #[test_case("Vue" ; "case sensitive")]
    fn test_other_types_never_flag(kind: &str) {
        let code = "export default { }\n<style scoped></style><div class=\"x\">";
        assert!(validate(code, kind, &ValidatorSettings::default()).is_empty());
    }
}
