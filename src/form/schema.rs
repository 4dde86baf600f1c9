use std::collections::{BTreeMap, BTreeSet};
use std::marker::PhantomData;

use thiserror::Error;

use super::controller::FieldKey;
use super::validation::{
    AnchoredPattern, ErrorMessage, FieldLens, FieldRule, FormModel, Rule, validate,
};

#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum SchemaError {
    #[error("form `{form}` declares field `{field}` which its model does not have")]
    UnknownField { form: &'static str, field: FieldKey },
    #[error("form `{form}` declares field `{field}` more than once")]
    DuplicateField { form: &'static str, field: FieldKey },
    #[error("form `{form}` has no rules for model field `{field}`")]
    MissingField { form: &'static str, field: FieldKey },
    #[error("field `{field}` of form `{form}` has an empty rule list")]
    EmptyRules { form: &'static str, field: FieldKey },
    #[error("field `{field}` of form `{form}` must equal undeclared field `{target}`")]
    UnknownReference {
        form: &'static str,
        field: FieldKey,
        target: FieldKey,
    },
    #[error("field `{field}` of form `{form}` has an invalid pattern: {reason}")]
    InvalidPattern {
        form: &'static str,
        field: FieldKey,
        reason: String,
    },
}

/// One field's name and its ordered rules.
#[derive(Clone, Debug)]
pub struct FieldSpec {
    key: FieldKey,
    optional: bool,
    rules: Vec<FieldRule>,
    invalid_pattern: Option<String>,
}

impl FieldSpec {
    pub fn new(key: FieldKey) -> Self {
        Self {
            key,
            optional: false,
            rules: Vec::new(),
            invalid_pattern: None,
        }
    }

    pub fn key(&self) -> FieldKey {
        self.key
    }

    pub fn rules(&self) -> &[FieldRule] {
        &self.rules
    }

    pub fn is_optional(&self) -> bool {
        self.optional
    }

    /// An empty optional field skips all of its rules.
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    pub fn rule(mut self, rule: FieldRule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn required(self, message: impl Into<ErrorMessage>) -> Self {
        self.rule(FieldRule::new(Rule::Required, message))
    }

    pub fn min_length(self, min: usize, message: impl Into<ErrorMessage>) -> Self {
        self.rule(FieldRule::new(Rule::MinLength(min), message))
    }

    pub fn max_length(self, max: usize, message: impl Into<ErrorMessage>) -> Self {
        self.rule(FieldRule::new(Rule::MaxLength(max), message))
    }

    pub fn pattern(mut self, pattern: &str, message: impl Into<ErrorMessage>) -> Self {
        match AnchoredPattern::new(pattern) {
            Ok(pattern) => self.rule(FieldRule::new(Rule::Pattern(pattern), message)),
            Err(error) => {
                self.invalid_pattern.get_or_insert_with(|| error.to_string());
                self
            }
        }
    }

    pub fn email(self, message: impl Into<ErrorMessage>) -> Self {
        self.rule(FieldRule::new(Rule::Email, message))
    }

    pub fn equals(self, other: FieldKey, message: impl Into<ErrorMessage>) -> Self {
        self.rule(FieldRule::new(Rule::Equals(other), message))
    }

    pub fn check<T: FormModel>(&self, values: &T) -> Option<ErrorMessage> {
        let value = values.value(self.key).unwrap_or_default();
        if self.optional && value.trim().is_empty() {
            return None;
        }
        validate(&self.rules, value, values)
    }
}

/// The immutable rule table of one form.
#[derive(Clone, Debug)]
pub struct FormSchema<T> {
    name: &'static str,
    fields: Vec<FieldSpec>,
    dependents: BTreeMap<FieldKey, Vec<FieldKey>>,
    _model: PhantomData<fn() -> T>,
}

impl<T: FormModel> FormSchema<T> {
    pub fn builder(name: &'static str) -> FormSchemaBuilder<T> {
        FormSchemaBuilder {
            name,
            fields: Vec::new(),
            _model: PhantomData,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    pub fn keys(&self) -> impl Iterator<Item = FieldKey> + '_ {
        self.fields.iter().map(FieldSpec::key)
    }

    pub fn field(&self, key: FieldKey) -> Option<&FieldSpec> {
        self.fields.iter().find(|spec| spec.key == key)
    }

    pub fn key(&self, name: &str) -> Option<FieldKey> {
        self.keys().find(|key| key.as_str() == name)
    }

    /// Fields whose rules read `source` and must be rechecked when it changes.
    pub fn dependents(&self, source: FieldKey) -> &[FieldKey] {
        self.dependents
            .get(&source)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn validate_field(&self, key: FieldKey, values: &T) -> Option<ErrorMessage> {
        self.field(key).and_then(|spec| spec.check(values))
    }

    pub fn validate_all(&self, values: &T) -> Vec<(FieldKey, ErrorMessage)> {
        self.fields
            .iter()
            .filter_map(|spec| spec.check(values).map(|error| (spec.key, error)))
            .collect()
    }
}

pub struct FormSchemaBuilder<T> {
    name: &'static str,
    fields: Vec<FieldSpec>,
    _model: PhantomData<fn() -> T>,
}

impl<T: FormModel> FormSchemaBuilder<T> {
    pub fn field<L>(mut self, lens: L, configure: impl FnOnce(FieldSpec) -> FieldSpec) -> Self
    where
        L: FieldLens<T>,
    {
        self.fields.push(configure(FieldSpec::new(lens.key())));
        self
    }

    pub fn spec(mut self, spec: FieldSpec) -> Self {
        self.fields.push(spec);
        self
    }

    pub fn build(self) -> Result<FormSchema<T>, SchemaError> {
        let form = self.name;
        let mut declared = BTreeSet::new();
        for spec in &self.fields {
            let field = spec.key;
            if !T::KEYS.contains(&field) {
                return Err(SchemaError::UnknownField { form, field });
            }
            if !declared.insert(field) {
                return Err(SchemaError::DuplicateField { form, field });
            }
            if let Some(reason) = &spec.invalid_pattern {
                return Err(SchemaError::InvalidPattern {
                    form,
                    field,
                    reason: reason.clone(),
                });
            }
            if spec.rules.is_empty() {
                return Err(SchemaError::EmptyRules { form, field });
            }
        }

        if let Some(field) = T::KEYS.iter().find(|key| !declared.contains(*key)) {
            return Err(SchemaError::MissingField {
                form,
                field: *field,
            });
        }

        let mut dependents = BTreeMap::<FieldKey, Vec<FieldKey>>::new();
        for spec in &self.fields {
            for target in spec.rules.iter().filter_map(|rule| rule.rule.references()) {
                if !declared.contains(&target) {
                    return Err(SchemaError::UnknownReference {
                        form,
                        field: spec.key,
                        target,
                    });
                }
                let entry = dependents.entry(target).or_default();
                if !entry.contains(&spec.key) {
                    entry.push(spec.key);
                }
            }
        }

        Ok(FormSchema {
            name: form,
            fields: self.fields,
            dependents,
            _model: PhantomData,
        })
    }
}
