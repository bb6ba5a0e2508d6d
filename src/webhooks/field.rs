//! Structured field errors.
//!
//! Mirrors the Kubernetes apimachinery field error model: every error names
//! the offending field path, a kind, the bad value and a detail message, so
//! the API server can show users exactly which field was rejected.

use std::fmt;

/// Dotted path to a field inside an admitted object.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldPath {
    segments: Vec<String>,
}

impl FieldPath {
    /// Create a path with a single root segment.
    pub fn new(root: &str) -> Self {
        Self {
            segments: vec![root.to_string()],
        }
    }

    /// Return a new path extended by `name`.
    pub fn child(&self, name: &str) -> Self {
        let mut segments = self.segments.clone();
        segments.push(name.to_string());
        Self { segments }
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join("."))
    }
}

/// Kind of a field error.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldErrorType {
    /// A list holds more items than allowed.
    TooMany,
    /// The value could not be interpreted.
    Invalid,
    /// A required field is missing.
    Required,
}

impl fmt::Display for FieldErrorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FieldErrorType::TooMany => "Too many",
            FieldErrorType::Invalid => "Invalid value",
            FieldErrorType::Required => "Required value",
        };
        f.write_str(s)
    }
}

/// FieldError represents a field-level validation failure.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldError {
    pub error_type: FieldErrorType,
    pub field: String,
    /// Rendered bad value; empty when the kind carries none.
    pub value: String,
    pub detail: String,
}

impl FieldError {
    /// A list at `path` has `actual` items where at most `max` are allowed.
    pub fn too_many(path: &FieldPath, actual: usize, max: usize) -> Self {
        Self {
            error_type: FieldErrorType::TooMany,
            field: path.to_string(),
            value: actual.to_string(),
            detail: format!("must have at most {} items", max),
        }
    }

    /// The value at `path` could not be interpreted.
    ///
    /// The value is rendered as a quoted string with embedded quotes escaped.
    pub fn invalid(path: &FieldPath, value: &str, detail: &str) -> Self {
        Self {
            error_type: FieldErrorType::Invalid,
            field: path.to_string(),
            value: format!("{:?}", value),
            detail: detail.to_string(),
        }
    }

    /// The field at `path` must be set.
    pub fn required(path: &FieldPath, detail: &str) -> Self {
        Self {
            error_type: FieldErrorType::Required,
            field: path.to_string(),
            value: String::new(),
            detail: detail.to_string(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.error_type)?;
        if !self.value.is_empty() {
            write!(f, ": {}", self.value)?;
        }
        if !self.detail.is_empty() {
            write!(f, ": {}", self.detail)?;
        }
        Ok(())
    }
}

impl std::error::Error for FieldError {}

/// Ordered collection of field errors reported for one object.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FieldErrorList(Vec<FieldError>);

impl FieldErrorList {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn push(&mut self, error: FieldError) {
        self.0.push(error);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn first(&self) -> Option<&FieldError> {
        self.0.first()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }

    /// Whether any error in the list is of the given kind.
    pub fn contains_type(&self, error_type: FieldErrorType) -> bool {
        self.0.iter().any(|e| e.error_type == error_type)
    }

    /// `Ok(())` when empty, the list itself otherwise.
    pub fn into_result(self) -> Result<(), FieldErrorList> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl From<FieldError> for FieldErrorList {
    fn from(error: FieldError) -> Self {
        Self(vec![error])
    }
}

impl From<Vec<FieldError>> for FieldErrorList {
    fn from(errors: Vec<FieldError>) -> Self {
        Self(errors)
    }
}

impl fmt::Display for FieldErrorList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.as_slice() {
            [single] => write!(f, "{}", single),
            errors => {
                let rendered: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
                write!(f, "[{}]", rendered.join(", "))
            }
        }
    }
}

impl std::error::Error for FieldErrorList {}
