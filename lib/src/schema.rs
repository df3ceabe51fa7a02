//! Declarative per-record-type schemas and the validation engine that applies
//! them to raw field-name to value mappings read from the source files.
//!
//! A [`Schema`] is a list of [`FieldSpec`]s plus cross-field rules: pairs of
//! mutually exclusive fields, dependency pairs (field B is required once
//! field A is given) and one-of pairs (at least one of the two must be
//! present). Validation either yields a normalized [`ValidatedRow`] or the
//! full set of [`FieldError`]s, never a partial mix.

use std::collections::BTreeMap;
use std::fmt;

use regex::Regex;

/// Trailing marker character on column names that flags "visually required"
/// columns in the source spreadsheet. Stripped before validation.
pub const REQUIRED_MARKER: char = '*';

#[derive(Debug, Clone, PartialEq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

type Coercion = fn(&str) -> String;

pub struct FieldSpec {
    name: &'static str,
    required: bool,
    pattern: Option<Regex>,
    allowed: Option<&'static [&'static str]>,
    coerce: Option<Coercion>,
}

impl FieldSpec {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            required: false,
            pattern: None,
            allowed: None,
            coerce: None,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn pattern(mut self, pattern: &str) -> Self {
        self.pattern = Some(Regex::new(pattern).expect("field pattern must be a valid regex"));
        self
    }

    pub fn allowed(mut self, values: &'static [&'static str]) -> Self {
        self.allowed = Some(values);
        self
    }

    pub fn coerce(mut self, coercion: Coercion) -> Self {
        self.coerce = Some(coercion);
        self
    }
}

/// The outcome of a successful validation: coerced values for the fields the
/// schema knows about, and (for schemas with `allow_unknown`) whatever other
/// columns the source carried.
#[derive(Debug, Default)]
pub struct ValidatedRow {
    pub values: BTreeMap<String, String>,
    pub extras: BTreeMap<String, String>,
}

impl ValidatedRow {
    pub fn get(&self, field: &str) -> Option<&str> {
        self.values.get(field).map(String::as_str)
    }

    pub fn take(&mut self, field: &str) -> Option<String> {
        self.values.remove(field)
    }
}

pub struct Schema {
    name: &'static str,
    fields: Vec<FieldSpec>,
    exclusive: Vec<(&'static str, &'static str)>,
    dependent: Vec<(&'static str, &'static str)>,
    one_of: Vec<(&'static str, &'static str)>,
    allow_unknown: bool,
}

impl Schema {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            fields: Vec::new(),
            exclusive: Vec::new(),
            dependent: Vec::new(),
            one_of: Vec::new(),
            allow_unknown: false,
        }
    }

    pub fn field(mut self, spec: FieldSpec) -> Self {
        self.fields.push(spec);
        self
    }

    /// At most one of the two fields may be present.
    pub fn exclusive(mut self, a: &'static str, b: &'static str) -> Self {
        self.exclusive.push((a, b));
        self
    }

    /// `then_required` must be present whenever `if_present` is.
    pub fn dependent(mut self, if_present: &'static str, then_required: &'static str) -> Self {
        self.dependent.push((if_present, then_required));
        self
    }

    /// At least one of the two fields must be present.
    pub fn one_required(mut self, a: &'static str, b: &'static str) -> Self {
        self.one_of.push((a, b));
        self
    }

    pub fn allow_unknown(mut self) -> Self {
        self.allow_unknown = true;
        self
    }

    pub fn name(&self) -> &str {
        self.name
    }

    /// Validates a preprocessed row against this schema. All constraint
    /// violations are collected before returning, so a single bad record
    /// reports every problem it has at once.
    pub fn validate(&self, row: &BTreeMap<String, String>) -> Result<ValidatedRow, Vec<FieldError>> {
        let mut errors = Vec::new();
        let mut validated = ValidatedRow::default();

        for (name, value) in row {
            if self.fields.iter().any(|spec| spec.name == name) {
                continue;
            }
            if self.allow_unknown {
                validated.extras.insert(name.clone(), value.clone());
            } else {
                errors.push(FieldError {
                    field: name.clone(),
                    message: "unknown field".to_string(),
                });
            }
        }

        for spec in &self.fields {
            let value = match row.get(spec.name) {
                Some(value) => value,
                None => {
                    if spec.required {
                        errors.push(FieldError {
                            field: spec.name.to_string(),
                            message: "required field is missing".to_string(),
                        });
                    }
                    continue;
                }
            };
            let value = match spec.coerce {
                Some(coerce) => coerce(value),
                None => value.clone(),
            };
            if let Some(pattern) = &spec.pattern {
                if !pattern.is_match(&value) {
                    errors.push(FieldError {
                        field: spec.name.to_string(),
                        message: format!("value '{}' does not match '{}'", value, pattern),
                    });
                    continue;
                }
            }
            if let Some(allowed) = spec.allowed {
                if !allowed.contains(&value.as_str()) {
                    errors.push(FieldError {
                        field: spec.name.to_string(),
                        message: format!("value '{}' is not one of {:?}", value, allowed),
                    });
                    continue;
                }
            }
            validated.values.insert(spec.name.to_string(), value);
        }

        for (a, b) in &self.exclusive {
            if row.contains_key(*a) && row.contains_key(*b) {
                errors.push(FieldError {
                    field: a.to_string(),
                    message: format!("'{}' and '{}' are mutually exclusive", a, b),
                });
            }
        }
        for (given, required) in &self.dependent {
            if row.contains_key(*given) && !row.contains_key(*required) {
                errors.push(FieldError {
                    field: required.to_string(),
                    message: format!("'{}' is required when '{}' is given", required, given),
                });
            }
        }
        for (a, b) in &self.one_of {
            if !row.contains_key(*a) && !row.contains_key(*b) {
                errors.push(FieldError {
                    field: a.to_string(),
                    message: format!("one of '{}' or '{}' is required", a, b),
                });
            }
        }

        if errors.is_empty() {
            Ok(validated)
        } else {
            Err(errors)
        }
    }
}

/// Turns raw header/cell pairs into the mapping the validator operates on:
/// the trailing required-marker is stripped from column names, surrounding
/// whitespace is trimmed, and cells with an empty trimmed value are dropped.
pub fn preprocess<'a, I>(cells: I) -> BTreeMap<String, String>
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut row = BTreeMap::new();
    for (name, value) in cells {
        let name = name.trim();
        // at most one marker is stripped
        let name = name.strip_suffix(REQUIRED_MARKER).unwrap_or(name).trim_end();
        let value = value.trim();
        if name.is_empty() || value.is_empty() {
            continue;
        }
        row.insert(name.to_string(), value.to_string());
    }
    row
}

/// Lower-cases the extension of a filename, leaving the stem untouched.
pub fn lower_extension(value: &str) -> String {
    match value.rsplit_once('.') {
        Some((stem, ext)) => format!("{}.{}", stem, ext.to_ascii_lowercase()),
        None => value.to_string(),
    }
}

/// Lower-cases the whole value; used for closed enumerations.
pub fn lower(value: &str) -> String {
    value.to_ascii_lowercase()
}
