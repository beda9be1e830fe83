//! Unknown-key detection for strict loading.
//!
//! Strict mode rejects any key the model does not know, at every nesting
//! level. The check runs on the raw YAML value before it is deserialized, so
//! the model types themselves stay lenient.

use serde_yaml::Value;

const APPLICATION_KEYS: &[&str] = &[
    "id",
    "name",
    "title",
    "summary",
    "description",
    "team",
    "group",
    "technology",
    "category",
    "status",
    "properties",
    "provided-services",
    "infrastructure-dependencies",
    "dependencies",
    "display",
];

const SERVICE_KEYS: &[&str] = &[
    "name",
    "title",
    "summary",
    "description",
    "type",
    "isPublic",
    "isOpenHost",
    "securityLevel",
    "dependencies",
    "status",
    "properties",
];

const DEPENDENCY_KEYS: &[&str] = &[
    "reference",
    "relationship",
    "isSameLevel",
    "resilience",
    "isBrowserBased",
    "status",
];

const INFRASTRUCTURE_KEYS: &[&str] = &["type"];

const DISPLAY_KEYS: &[&str] = &["rotate", "bordercolor", "color"];

const CONFIG_KEYS: &[&str] = &["projectName", "appDefinitionsPaths", "subViews", "appOverrides"];

const SUB_VIEW_KEYS: &[&str] = &["name", "included-applications"];

const OVERRIDE_KEYS: &[&str] = &[
    "name",
    "title",
    "summary",
    "description",
    "group",
    "technology",
    "category",
    "team",
    "add-dependencies",
    "add-provided-services",
    "properties",
];

/// Collects `location: unknown field` messages.
#[derive(Debug, Default)]
struct UnknownKeys(Vec<String>);

impl UnknownKeys {
    fn check(&mut self, value: &Value, known: &[&str], location: &str) {
        let Value::Mapping(mapping) = value else {
            return;
        };
        for key in mapping.keys() {
            let name = key.as_str().unwrap_or_default();
            if !known.contains(&name) {
                self.0.push(format!("{location}: unknown field '{}'", describe(key)));
            }
        }
    }

    /// Run `check` on every item of the sequence under `key`, if there is one.
    fn each(
        &mut self,
        value: &Value,
        key: &str,
        location: &str,
        check: fn(&mut Self, &Value, &str),
    ) {
        if let Some(Value::Sequence(items)) = value.get(key) {
            for (index, item) in items.iter().enumerate() {
                check(self, item, &format!("{location}.{key}[{index}]"));
            }
        }
    }

    fn application(&mut self, value: &Value, location: &str) {
        self.check(value, APPLICATION_KEYS, location);
        self.each(value, "dependencies", location, Self::dependency);
        self.each(value, "provided-services", location, Self::service);
        self.each(value, "infrastructure-dependencies", location, |this, item, at| {
            this.check(item, INFRASTRUCTURE_KEYS, at);
        });
        if let Some(display) = value.get("display") {
            self.check(display, DISPLAY_KEYS, &format!("{location}.display"));
        }
    }

    fn service(&mut self, value: &Value, location: &str) {
        self.check(value, SERVICE_KEYS, location);
        self.each(value, "dependencies", location, Self::dependency);
    }

    fn dependency(&mut self, value: &Value, location: &str) {
        self.check(value, DEPENDENCY_KEYS, location);
    }

    fn config(&mut self, value: &Value) {
        self.check(value, CONFIG_KEYS, "config");
        self.each(value, "subViews", "config", |this, item, at| {
            this.check(item, SUB_VIEW_KEYS, at);
        });
        self.each(value, "appOverrides", "config", |this, item, at| {
            this.check(item, OVERRIDE_KEYS, at);
            this.each(item, "add-dependencies", at, Self::dependency);
            this.each(item, "add-provided-services", at, Self::service);
        });
    }
}

fn describe(key: &Value) -> String {
    match key {
        Value::String(s) => s.clone(),
        other => serde_yaml::to_string(other)
            .map(|s| s.trim_end().to_string())
            .unwrap_or_default(),
    }
}

/// Unknown keys in an application document.
pub(crate) fn unknown_application_keys(value: &Value, location: &str) -> Vec<String> {
    let mut unknown = UnknownKeys::default();
    unknown.application(value, location);
    unknown.0
}

/// Unknown keys in a project configuration document.
pub(crate) fn unknown_config_keys(value: &Value) -> Vec<String> {
    let mut unknown = UnknownKeys::default();
    unknown.config(value);
    unknown.0
}
