//! Parameter schemas and validated argument maps.
//!
//! A filter declares its inputs as an ordered schema of typed
//! parameters; callers supply an [`Arguments`] map which
//! [`ParameterSchema::validate`] checks against the schema and the
//! current store. All problems are reported as [`Diagnostic`] values
//! with stable codes so that a configuration layer can surface them
//! without parsing messages.

use indexmap::IndexMap;
use trellis_core::{DataPath, Diagnostic, ElementKind};
use trellis_store::DataStructure;

/// Diagnostic code: a schema parameter has no supplied argument.
pub const CODE_MISSING_ARGUMENT: i32 = -100;
/// Diagnostic code: an argument key is not in the schema.
pub const CODE_UNKNOWN_ARGUMENT: i32 = -101;
/// Diagnostic code: an argument has the wrong value kind.
pub const CODE_WRONG_VALUE_KIND: i32 = -102;
/// Diagnostic code: an integer argument is outside its declared range.
pub const CODE_INT_OUT_OF_RANGE: i32 = -103;
/// Diagnostic code: a choice index is outside its label set.
pub const CODE_CHOICE_OUT_OF_BOUNDS: i32 = -104;
/// Diagnostic code: an input path does not resolve to an array.
pub const CODE_INPUT_NOT_FOUND: i32 = -110;
/// Diagnostic code: an input array has a disallowed element kind.
pub const CODE_INPUT_KIND_DISALLOWED: i32 = -111;
/// Diagnostic code: an output path is empty or already occupied.
pub const CODE_OUTPUT_COLLISION: i32 = -120;
/// Diagnostic code: an output path's parent does not resolve.
pub const CODE_OUTPUT_PARENT_MISSING: i32 = -121;

/// A concrete argument value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ParamValue {
    /// A bounded integer.
    Int(i64),
    /// An index into a choice parameter's label set.
    Choice(usize),
    /// A store path (input selection or output creation).
    Path(DataPath),
}

impl ParamValue {
    /// Short value-kind name for diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Int(_) => "integer",
            Self::Choice(_) => "choice index",
            Self::Path(_) => "path",
        }
    }
}

/// The validator attached to one parameter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ParamKind {
    /// An integer constrained to an inclusive range.
    Int {
        /// Smallest accepted value.
        min: i64,
        /// Largest accepted value.
        max: i64,
    },
    /// An index into a fixed label set, valid in `[0, labels.len())`.
    Choice {
        /// The label set, in display order.
        labels: Vec<String>,
    },
    /// A path that must resolve to an existing array of one of the
    /// allowed element kinds.
    InputArray {
        /// Accepted element kinds.
        allowed: Vec<ElementKind>,
    },
    /// A path at which commit will create a new array: the parent
    /// must resolve and the final name must not collide.
    OutputArray,
}

/// One declared parameter: key, presentation strings, default, and
/// validator.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParamSpec {
    key: String,
    label: String,
    help: String,
    default: ParamValue,
    kind: ParamKind,
}

impl ParamSpec {
    /// A bounded integer parameter.
    pub fn int(
        key: impl Into<String>,
        label: impl Into<String>,
        help: impl Into<String>,
        default: i64,
        min: i64,
        max: i64,
    ) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            help: help.into(),
            default: ParamValue::Int(default),
            kind: ParamKind::Int { min, max },
        }
    }

    /// A choice parameter over a fixed label set.
    pub fn choice(
        key: impl Into<String>,
        label: impl Into<String>,
        help: impl Into<String>,
        default: usize,
        labels: Vec<String>,
    ) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            help: help.into(),
            default: ParamValue::Choice(default),
            kind: ParamKind::Choice { labels },
        }
    }

    /// An existing-array selection parameter.
    pub fn input_array(
        key: impl Into<String>,
        label: impl Into<String>,
        help: impl Into<String>,
        allowed: Vec<ElementKind>,
    ) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            help: help.into(),
            default: ParamValue::Path(DataPath::default()),
            kind: ParamKind::InputArray { allowed },
        }
    }

    /// A new-array creation parameter.
    pub fn output_array(
        key: impl Into<String>,
        label: impl Into<String>,
        help: impl Into<String>,
    ) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            help: help.into(),
            default: ParamValue::Path(DataPath::default()),
            kind: ParamKind::OutputArray,
        }
    }

    /// The argument key.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The human-readable label.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// The help text.
    pub fn help(&self) -> &str {
        &self.help
    }

    /// The default value.
    pub fn default(&self) -> &ParamValue {
        &self.default
    }

    /// The attached validator.
    pub fn kind(&self) -> &ParamKind {
        &self.kind
    }
}

/// An ordered set of parameter declarations.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ParameterSchema {
    params: IndexMap<String, ParamSpec>,
}

impl ParameterSchema {
    /// An empty schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a parameter. A later insert with the same key replaces
    /// the earlier one.
    pub fn insert(&mut self, spec: ParamSpec) {
        self.params.insert(spec.key().to_owned(), spec);
    }

    /// Look up a parameter by key.
    pub fn get(&self, key: &str) -> Option<&ParamSpec> {
        self.params.get(key)
    }

    /// Iterate declarations in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &ParamSpec> {
        self.params.values()
    }

    /// Number of declared parameters.
    pub fn len(&self) -> usize {
        self.params.len()
    }

    /// Whether the schema declares no parameters.
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Check an argument map against this schema and the current
    /// store. Returns every problem found; an empty list means valid.
    pub fn validate(&self, structure: &DataStructure, args: &Arguments) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();

        for spec in self.iter() {
            let Some(value) = args.get(spec.key()) else {
                diagnostics.push(Diagnostic::new(
                    CODE_MISSING_ARGUMENT,
                    format!("no argument supplied for parameter '{}'", spec.key()),
                ));
                continue;
            };
            self.validate_value(structure, spec, value, &mut diagnostics);
        }

        for key in args.keys() {
            if !self.params.contains_key(key) {
                diagnostics.push(Diagnostic::new(
                    CODE_UNKNOWN_ARGUMENT,
                    format!("argument '{key}' is not declared by the filter"),
                ));
            }
        }

        diagnostics
    }

    fn validate_value(
        &self,
        structure: &DataStructure,
        spec: &ParamSpec,
        value: &ParamValue,
        diagnostics: &mut Vec<Diagnostic>,
    ) {
        match (spec.kind(), value) {
            (ParamKind::Int { min, max }, ParamValue::Int(v)) => {
                if v < min || v > max {
                    diagnostics.push(Diagnostic::new(
                        CODE_INT_OUT_OF_RANGE,
                        format!(
                            "parameter '{}' is {v}, outside [{min}, {max}]",
                            spec.key()
                        ),
                    ));
                }
            }
            (ParamKind::Choice { labels }, ParamValue::Choice(index)) => {
                if *index >= labels.len() {
                    diagnostics.push(Diagnostic::new(
                        CODE_CHOICE_OUT_OF_BOUNDS,
                        format!(
                            "parameter '{}' index {index} outside choice set of {}",
                            spec.key(),
                            labels.len()
                        ),
                    ));
                }
            }
            (ParamKind::InputArray { allowed }, ParamValue::Path(path)) => {
                let array = structure
                    .resolve_path(path)
                    .and_then(|id| structure.get_array(id));
                match array {
                    None => diagnostics.push(Diagnostic::new(
                        CODE_INPUT_NOT_FOUND,
                        format!(
                            "parameter '{}': no array at path '{path}'",
                            spec.key()
                        ),
                    )),
                    Some(node) => {
                        let kind = node.kind();
                        if !allowed.contains(&kind) {
                            diagnostics.push(Diagnostic::new(
                                CODE_INPUT_KIND_DISALLOWED,
                                format!(
                                    "parameter '{}': array at '{path}' has kind {kind}, \
                                     which this filter does not accept",
                                    spec.key()
                                ),
                            ));
                        }
                    }
                }
            }
            (ParamKind::OutputArray, ParamValue::Path(path)) => {
                if path.name().is_none() {
                    diagnostics.push(Diagnostic::new(
                        CODE_OUTPUT_COLLISION,
                        format!("parameter '{}': empty output path", spec.key()),
                    ));
                    return;
                }
                if let Some(parent) = path.parent() {
                    if structure.resolve_path(&parent).is_none() {
                        diagnostics.push(Diagnostic::new(
                            CODE_OUTPUT_PARENT_MISSING,
                            format!(
                                "parameter '{}': output parent '{parent}' does not resolve",
                                spec.key()
                            ),
                        ));
                        return;
                    }
                }
                if structure.resolve_path(path).is_some() {
                    diagnostics.push(Diagnostic::new(
                        CODE_OUTPUT_COLLISION,
                        format!(
                            "parameter '{}': an object already exists at '{path}'",
                            spec.key()
                        ),
                    ));
                }
            }
            (_, value) => {
                diagnostics.push(Diagnostic::new(
                    CODE_WRONG_VALUE_KIND,
                    format!(
                        "parameter '{}' was given a {} value",
                        spec.key(),
                        value.kind_name()
                    ),
                ));
            }
        }
    }
}

/// A key→value argument map supplied by the caller.
///
/// Arguments carry no validation state of their own; they are checked
/// by [`ParameterSchema::validate`] at the start of every plan.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Arguments {
    values: IndexMap<String, ParamValue>,
}

impl Arguments {
    /// An empty argument map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a value.
    pub fn insert(&mut self, key: impl Into<String>, value: ParamValue) {
        self.values.insert(key.into(), value);
    }

    /// The raw value for a key.
    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.values.get(key)
    }

    /// Argument keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.values.keys()
    }

    /// The integer value for a key, `None` if absent or another kind.
    pub fn int(&self, key: &str) -> Option<i64> {
        match self.values.get(key) {
            Some(ParamValue::Int(v)) => Some(*v),
            _ => None,
        }
    }

    /// The choice index for a key, `None` if absent or another kind.
    pub fn choice(&self, key: &str) -> Option<usize> {
        match self.values.get(key) {
            Some(ParamValue::Choice(v)) => Some(*v),
            _ => None,
        }
    }

    /// The path value for a key, `None` if absent or another kind.
    pub fn path(&self, key: &str) -> Option<&DataPath> {
        match self.values.get(key) {
            Some(ParamValue::Path(p)) => Some(p),
            _ => None,
        }
    }
}
