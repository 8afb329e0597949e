//! Versioned pattern tables for the stability classifier
//!
//! Tables are plain serde data ([`PatternTableSpec`]) compiled once into
//! [`PatternTable`]. The built-in table is shared; hosts derive their own
//! with [`PatternOverrides`].

use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::{Regex, RegexSet};
use serde::{Deserialize, Serialize};

use crate::errors::{SynthError, SynthResult};

/// Bumped whenever a built-in rule changes meaning.
pub const PATTERN_TABLE_VERSION: u32 = 3;

/// Allow / block rules for one identifier kind.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PatternRules {
    pub stable_allow: Vec<String>,
    pub blocklist: Vec<String>,
}

/// Uncompiled pattern table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PatternTableSpec {
    pub version: u32,
    pub id: PatternRules,
    pub class: PatternRules,
    /// Rules over data-attribute *names*
    pub data_attr: PatternRules,
    /// Rules over data-attribute *values*
    pub data_value_blocklist: Vec<String>,
    /// Data-attribute names that are test / automation hooks
    pub test_attributes: Vec<String>,
    /// Exact class/id words that never distinguish an element
    pub generic_words: Vec<String>,
}

impl Default for PatternTableSpec {
    fn default() -> Self {
        Self::builtin()
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl PatternTableSpec {
    /// The built-in rule set.
    pub fn builtin() -> Self {
        Self {
            version: PATTERN_TABLE_VERSION,
            id: PatternRules {
                stable_allow: strings(&[r"^[a-zA-Z][a-zA-Z0-9]*(?:[-_][a-zA-Z0-9]+)*$"]),
                blocklist: strings(&[
                    // react useId / radix
                    r"^:r[0-9a-z]*:$",
                    r"^radix-",
                    r"^react-select-\d+",
                    r"^headlessui-",
                    r"^(?:ember|mui|mat-|cdk-|ng-|yui_|ext-|gwt-|jQuery)\d*[-_]?\d",
                    r"^__next",
                    r"^[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}$",
                    r"\d{4,}",
                    r"^\d+$",
                    r"^[a-z]{1,3}\d+$",
                    r"^(?:uid|id|el|elem|node|comp|auto)[-_]?\d+",
                ]),
            },
            class: PatternRules {
                stable_allow: strings(&[
                    // BEM block__element--modifier
                    r"^[a-z][a-z0-9]*(?:-[a-z0-9]+)*__[a-z0-9]+(?:-[a-z0-9]+)*(?:--[a-z0-9-]+)?$",
                    r"^[a-z][a-z0-9]*(?:-[a-z0-9]+)*--[a-z0-9]+(?:-[a-z0-9]+)*$",
                    // kebab / camel words
                    r"^[a-z][a-z0-9]*(?:-[a-z0-9]+)+$",
                    r"^[a-z]+(?:[A-Z][a-z0-9]+)+$",
                ]),
                blocklist: strings(&[
                    // CSS-in-JS hashes
                    r"^css-[a-z0-9]+(?:-[A-Za-z0-9]+)*$",
                    r"^sc-[a-zA-Z0-9]+$",
                    r"^jsx-\d+$",
                    r"^emotion-\d+$",
                    r"^svelte-[a-z0-9]+$",
                    r"^astro-[a-zA-Z0-9]+$",
                    r"^_[a-zA-Z0-9]{5,}$",
                    r"^[a-zA-Z]+_[a-zA-Z0-9-]+__[a-zA-Z0-9_-]{5}$",
                    // UI library auto prefixes
                    r"^Mui[A-Z]",
                    r"^mui-",
                    r"^ant-",
                    r"^chakra-",
                    r"^mat-mdc-",
                    r"^mdc-",
                    r"^cdk-",
                    r"^ng-(?:tns|star|untouched|touched|pristine|dirty|valid|invalid|pending)",
                    r"^v-(?:application|btn|list|card)",
                    r"^el-",
                    r"^bp\d-",
                    r"^rc-",
                    r"^q-",
                    r"^tw-",
                    // utility atoms (tailwind / bootstrap style)
                    r"^-?(?:m|p)[trblxyse]?-",
                    r"^-?(?:mt|mb|ml|mr|mx|my|pt|pb|pl|pr|px|py)-",
                    r"^(?:flex|grid|block|inline|inline-block|inline-flex|hidden|table|contents|relative|absolute|fixed|sticky|static|truncate|uppercase|lowercase|capitalize|italic|underline|container|clearfix|sr-only|visible|invisible)$",
                    r"^(?:items|justify|self|place|space|min-w|min-h|max-w|max-h|text|font|leading|tracking|bg|border|rounded|shadow|opacity|overflow|cursor|transition|duration|ease|delay|basis|grow|shrink|fw|fs|lh|ring|outline|fill|stroke|object|aspect|divide|translate|rotate|scale|skew|origin|pointer-events|whitespace|break|line-clamp|animate|backdrop|blur|decoration)-",
                    r"^-?(?:w|h|z|size|top|right|bottom|left|inset|gap|order|col|row|flex|grid|d|content|align|float|from|via|to|columns|select)-(?:\d|px|full|auto|screen|none|min|max|fit|flex|block|inline|grid|start|end|center|between|around|stretch|baseline|span|wrap|nowrap|col|row|\[)",
                    r"^col-(?:xs|sm|md|lg|xl|xxl)-\d+$",
                    r":",
                    r"^\[",
                    // state markers
                    r"^(?:is|has)-(?:active|open|selected|hover|focus|focused|visible|hidden|disabled|loading|loaded|expanded|collapsed|checked|playing|paused|current)$",
                    r"^(?:active|hover|focus|focused|selected|current|open|opened|closed|expanded|collapsed|disabled|loading|loaded|checked|playing|paused|show|fade|in|out)$",
                ]),
            },
            data_attr: PatternRules {
                stable_allow: strings(&[
                    r"^data-(?:rpc|role|hook|js|component|section|region|element|action|name|field|type|slot|purpose|target-id|uia)$",
                ]),
                blocklist: strings(&[
                    r"^data-reactid$",
                    r"^data-reactroot$",
                    r"^data-react-",
                    r"^data-v-[0-9a-f]+$",
                    r"^data-vue-",
                    r"^data-emotion",
                    r"^data-styled",
                    r"^data-svelte",
                    r"^data-astro-",
                    r"^data-n-head",
                    r"^data-rh$",
                    r"^data-server-rendered$",
                    r"^data-hydrat",
                    r"^data-(?:ssr|csr|rsc)(?:[-_]|$)",
                    r"^data-turbo",
                    r"^data-(?:time|timestamp|ts|date|datetime|created|updated|modified|expires|last)(?:[-_]|$)",
                    r"^data-(?:token|nonce|csrf|session|sessionid|auth|signature|sig|hash|key|checksum)(?:[-_]|$)",
                    r"^data-(?:track|tracking|trackid|analytics|ga|gtm|gtag|ved|ei|clickid|click-id|impression|beacon|pixel|event|telemetry|log|metric|metrics)(?:[-_]|$)",
                    r"^data-(?:index|idx|position|pos|offset|row-index|item-index|count|random|uuid|guid|cache|nonce)(?:[-_]|$)",
                    r"^data-(?:state|status|active|selected|open|expanded|focused|hover|loading|visible|orientation|highlighted|disabled|checked)$",
                    r"^data-(?:headlessui|radix|aria|floating|popper|tippy)(?:[-_]|$)",
                ]),
            },
            data_value_blocklist: strings(&[
                // epoch seconds / millis
                r"^\d{10}(?:\d{3})?$",
                r"^[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}$",
                r"^[0-9a-fA-F]{16,}$",
                r"^\s*[\[{]",
                r"^\d{4}-\d{2}-\d{2}",
            ]),
            test_attributes: strings(&[
                "data-testid",
                "data-test-id",
                "data-test",
                "data-qa",
                "data-qa-id",
                "data-cy",
                "data-e2e",
                "data-automation",
                "data-automation-id",
                "data-selenium",
                "data-pw",
                "data-test-selector",
            ]),
            generic_words: strings(&[
                "container",
                "wrapper",
                "wrap",
                "row",
                "col",
                "column",
                "columns",
                "content",
                "inner",
                "outer",
                "main",
                "box",
                "block",
                "panel",
                "section",
                "group",
                "holder",
                "layout",
                "grid",
                "flex",
                "clearfix",
                "component",
                "element",
                "module",
                "widget",
                "left",
                "right",
                "top",
                "bottom",
                "center",
                "small",
                "large",
                "big",
                "new",
                "root",
                "app",
                "page",
                "body",
                "text",
                "label",
                "icon",
                "img",
                "image",
                "link",
                "btn",
                "button",
            ]),
        }
    }

    /// Apply host overrides: extend by default, replace per-list on request.
    pub fn apply(&mut self, overrides: &PatternOverrides) {
        fn merge(target: &mut Vec<String>, extra: &[String], replace: bool) {
            if replace && !extra.is_empty() {
                target.clear();
            }
            for item in extra {
                if !target.contains(item) {
                    target.push(item.clone());
                }
            }
        }

        let replace = overrides.replace;
        merge(&mut self.id.stable_allow, &overrides.id.stable_allow, replace);
        merge(&mut self.id.blocklist, &overrides.id.blocklist, replace);
        merge(
            &mut self.class.stable_allow,
            &overrides.class.stable_allow,
            replace,
        );
        merge(&mut self.class.blocklist, &overrides.class.blocklist, replace);
        merge(
            &mut self.data_attr.stable_allow,
            &overrides.data_attr.stable_allow,
            replace,
        );
        merge(
            &mut self.data_attr.blocklist,
            &overrides.data_attr.blocklist,
            replace,
        );
        merge(
            &mut self.data_value_blocklist,
            &overrides.data_value_blocklist,
            replace,
        );
        merge(
            &mut self.test_attributes,
            &overrides.test_attributes,
            replace,
        );
        merge(&mut self.generic_words, &overrides.generic_words, replace);
        if let Some(version) = overrides.version {
            self.version = version;
        }
    }
}

/// Host-provided additions to the built-in table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PatternOverrides {
    /// Non-empty override lists replace the built-in list instead of extending it
    pub replace: bool,
    pub version: Option<u32>,
    pub id: PatternRules,
    pub class: PatternRules,
    pub data_attr: PatternRules,
    pub data_value_blocklist: Vec<String>,
    pub test_attributes: Vec<String>,
    pub generic_words: Vec<String>,
}

impl PatternOverrides {
    pub fn is_empty(&self) -> bool {
        *self == PatternOverrides::default()
    }
}

/// Compiled allow / block sets for one identifier kind.
#[derive(Debug, Clone)]
pub struct CompiledRules {
    pub stable_allow: RegexSet,
    pub blocklist: RegexSet,
}

impl CompiledRules {
    fn compile(rules: &PatternRules, table: &str) -> SynthResult<Self> {
        Ok(Self {
            stable_allow: compile_set(&rules.stable_allow, &format!("{table}.stable_allow"))?,
            blocklist: compile_set(&rules.blocklist, &format!("{table}.blocklist"))?,
        })
    }
}

/// Immutable, compiled pattern table.
#[derive(Debug, Clone)]
pub struct PatternTable {
    spec: PatternTableSpec,
    pub id: CompiledRules,
    pub class: CompiledRules,
    pub data_attr: CompiledRules,
    pub data_value_blocklist: RegexSet,
}

static BUILTIN: Lazy<Arc<PatternTable>> = Lazy::new(|| {
    Arc::new(
        PatternTable::compile(PatternTableSpec::builtin())
            .expect("built-in pattern table compiles"),
    )
});

impl PatternTable {
    pub fn compile(spec: PatternTableSpec) -> SynthResult<Self> {
        Ok(Self {
            id: CompiledRules::compile(&spec.id, "id")?,
            class: CompiledRules::compile(&spec.class, "class")?,
            data_attr: CompiledRules::compile(&spec.data_attr, "data_attr")?,
            data_value_blocklist: compile_set(
                &spec.data_value_blocklist,
                "data_value_blocklist",
            )?,
            spec,
        })
    }

    /// Shared handle to the built-in table.
    pub fn builtin() -> Arc<PatternTable> {
        Arc::clone(&BUILTIN)
    }

    /// Built-in table with host overrides applied.
    pub fn with_overrides(overrides: &PatternOverrides) -> SynthResult<Arc<PatternTable>> {
        if overrides.is_empty() {
            return Ok(Self::builtin());
        }
        let mut spec = PatternTableSpec::builtin();
        spec.apply(overrides);
        Ok(Arc::new(Self::compile(spec)?))
    }

    pub fn version(&self) -> u32 {
        self.spec.version
    }

    pub fn spec(&self) -> &PatternTableSpec {
        &self.spec
    }

    pub fn is_test_attribute(&self, name: &str) -> bool {
        self.spec
            .test_attributes
            .iter()
            .any(|attr| attr.eq_ignore_ascii_case(name))
    }

    pub fn is_generic_word(&self, token: &str) -> bool {
        self.spec
            .generic_words
            .iter()
            .any(|word| word.eq_ignore_ascii_case(token))
    }
}

fn compile_set(patterns: &[String], table: &str) -> SynthResult<RegexSet> {
    // compile one by one first so the error names the offending rule
    for pattern in patterns {
        Regex::new(pattern).map_err(|err| SynthError::InvalidPattern {
            table: table.to_string(),
            pattern: pattern.clone(),
            reason: err.to_string(),
        })?;
    }
    RegexSet::new(patterns).map_err(|err| SynthError::InvalidPattern {
        table: table.to_string(),
        pattern: patterns.join(" | "),
        reason: err.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_table_compiles() {
        let table = PatternTable::builtin();
        assert_eq!(table.version(), PATTERN_TABLE_VERSION);
        assert!(table.class.blocklist.is_match("css-a1b2c3"));
        assert!(table.class.blocklist.is_match("mt-4"));
        assert!(table.class.blocklist.is_match("md:flex"));
        assert!(table.class.blocklist.is_match("MuiButton-root"));
        assert!(table.class.blocklist.is_match("Player_title__x8F2k"));
        assert!(!table.class.blocklist.is_match("player__title"));
        assert!(!table.class.blocklist.is_match("now-playing"));
        assert!(table.id.blocklist.is_match(":r1:"));
        assert!(table.id.blocklist.is_match("ember1234"));
        assert!(!table.id.blocklist.is_match("checkout-button"));
        assert!(table.is_test_attribute("data-testid"));
        assert!(table.is_generic_word("Wrapper"));
    }

    #[test]
    fn overrides_extend_or_replace() {
        let overrides = PatternOverrides {
            class: PatternRules {
                blocklist: vec!["^legacy-".into()],
                ..Default::default()
            },
            test_attributes: vec!["data-hook-id".into()],
            ..Default::default()
        };
        let table = PatternTable::with_overrides(&overrides).unwrap();
        assert!(table.class.blocklist.is_match("legacy-header"));
        assert!(table.class.blocklist.is_match("css-a1b2c3"));
        assert!(table.is_test_attribute("data-hook-id"));
        assert!(table.is_test_attribute("data-testid"));

        let replacing = PatternOverrides {
            replace: true,
            test_attributes: vec!["data-hook-id".into()],
            ..Default::default()
        };
        let table = PatternTable::with_overrides(&replacing).unwrap();
        assert!(!table.is_test_attribute("data-testid"));
        assert!(table.class.blocklist.is_match("css-a1b2c3"));
    }

    #[test]
    fn invalid_override_names_the_rule() {
        let overrides = PatternOverrides {
            id: PatternRules {
                blocklist: vec!["(unclosed".into()],
                ..Default::default()
            },
            ..Default::default()
        };
        match PatternTable::with_overrides(&overrides) {
            Err(SynthError::InvalidPattern { table, pattern, .. }) => {
                assert_eq!(table, "id.blocklist");
                assert_eq!(pattern, "(unclosed");
            }
            other => panic!("expected invalid pattern, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn overrides_deserialize_from_yaml() {
        let yaml = "class:\n  blocklist: ['^x-']\ntest_attributes: [data-spec]\n";
        let overrides: PatternOverrides = serde_yaml::from_str(yaml).unwrap();
        assert!(!overrides.replace);
        assert_eq!(overrides.class.blocklist, vec!["^x-".to_string()]);
        assert_eq!(overrides.test_attributes, vec!["data-spec".to_string()]);
    }
}
