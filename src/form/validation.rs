use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;

use super::controller::FieldKey;

pub type ErrorMessage = Cow<'static, str>;

/// One `@`, then dot-separated domain labels that neither start nor end
/// with a hyphen, ending in an alphabetic top-level label.
static EMAIL_PATTERN: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(
        r"^[^@\s]+@[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?)*\.[A-Za-z]{2,}$",
    )
    .ok()
});

pub trait FieldLens<T>: Copy + Send + Sync + 'static {
    fn key(self) -> FieldKey;
    fn get<'a>(self, model: &'a T) -> &'a str;
    fn set(self, model: &mut T, value: String);
}

/// A struct of string fields that a form edits.
///
/// Usually derived with `#[derive(FormModel)]`; the derive fills `KEYS` in
/// declaration order and routes the name-based accessors to the fields.
pub trait FormModel: Clone + Default + Send + Sync + 'static {
    type Fields;

    const KEYS: &'static [FieldKey];

    fn fields() -> Self::Fields;
    fn value(&self, key: FieldKey) -> Option<&str>;
    fn value_mut(&mut self, key: FieldKey) -> Option<&mut String>;

    fn key_for(name: &str) -> Option<FieldKey> {
        Self::KEYS.iter().copied().find(|key| key.as_str() == name)
    }
}

#[derive(Clone, Debug)]
pub enum Rule {
    Required,
    MinLength(usize),
    MaxLength(usize),
    Pattern(AnchoredPattern),
    Email,
    Equals(FieldKey),
}

impl Rule {
    pub fn references(&self) -> Option<FieldKey> {
        match self {
            Rule::Equals(other) => Some(*other),
            _ => None,
        }
    }

    fn passes<T: FormModel>(&self, value: &str, values: &T) -> bool {
        match self {
            Rule::Required => !value.trim().is_empty(),
            Rule::MinLength(min) => value.trim().chars().count() >= *min,
            Rule::MaxLength(max) => value.trim().chars().count() <= *max,
            Rule::Pattern(pattern) => pattern.matches(value),
            Rule::Email => is_valid_email(value),
            Rule::Equals(other) => values.value(*other) == Some(value),
        }
    }
}

/// A regex that only accepts values it matches from the first character to
/// the last.
#[derive(Clone, Debug)]
pub struct AnchoredPattern {
    source: String,
    regex: Regex,
}

impl AnchoredPattern {
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            source: pattern.to_string(),
            regex: Regex::new(&format!("^(?:{pattern})$"))?,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn matches(&self, value: &str) -> bool {
        self.regex.is_match(value)
    }
}

#[derive(Clone, Debug)]
pub struct FieldRule {
    pub rule: Rule,
    pub message: ErrorMessage,
}

impl FieldRule {
    pub fn new(rule: Rule, message: impl Into<ErrorMessage>) -> Self {
        Self {
            rule,
            message: message.into(),
        }
    }
}

/// Runs `rules` in order against `value` and returns the first failing
/// rule's message. `values` supplies the other fields for `Equals`.
pub fn validate<T: FormModel>(rules: &[FieldRule], value: &str, values: &T) -> Option<ErrorMessage> {
    rules
        .iter()
        .find(|rule| !rule.rule.passes(value, values))
        .map(|rule| rule.message.clone())
}

pub fn is_valid_email(value: &str) -> bool {
    EMAIL_PATTERN
        .as_ref()
        .is_some_and(|regex| regex.is_match(value))
}
