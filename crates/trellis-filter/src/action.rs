//! The declarative action vocabulary produced by planning and
//! interpreted by commit.

use trellis_core::{DataPath, Diagnostic, ElementKind, Shape};
use trellis_store::DataStructure;

/// Diagnostic code: applying a planned action failed.
///
/// Unreachable when commit re-plans against the same store state it
/// mutates; reaching it means the contract between planning and
/// application was violated.
pub const CODE_ACTION_FAILED: i32 = -130;

/// One pending structural mutation.
///
/// Actions are plain values: a plan can be logged, diffed, or
/// replayed before anything touches the store. The vocabulary is open
/// to extension; commit interprets exactly the actions its own plan
/// emitted, in order.
#[derive(Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum Action {
    /// Create a zero-initialized array at `path`.
    CreateArray {
        /// Element kind of the new array.
        kind: ElementKind,
        /// Tuple shape of the new array.
        tuple_shape: Shape,
        /// Component shape of the new array.
        component_shape: Shape,
        /// Where to create it; the parent must already resolve.
        path: DataPath,
    },
}

/// Apply a planned action list to the store, in order.
///
/// Stops at the first failure and reports it as a
/// [`CODE_ACTION_FAILED`] diagnostic. Actions already applied stay
/// applied; callers treat any failure here as fatal to the
/// invocation.
pub fn apply_actions(
    structure: &mut DataStructure,
    actions: &[Action],
) -> Result<(), Diagnostic> {
    for action in actions {
        match action {
            Action::CreateArray {
                kind,
                tuple_shape,
                component_shape,
                path,
            } => {
                let Some(name) = path.name() else {
                    return Err(Diagnostic::new(
                        CODE_ACTION_FAILED,
                        "create-array action with an empty path".to_owned(),
                    ));
                };
                let parent = match path.parent() {
                    None => None,
                    Some(parent_path) => match structure.resolve_path(&parent_path) {
                        Some(id) => Some(id),
                        None => {
                            return Err(Diagnostic::new(
                                CODE_ACTION_FAILED,
                                format!("parent '{parent_path}' vanished before commit"),
                            ))
                        }
                    },
                };
                structure
                    .create_array(
                        parent,
                        name,
                        *kind,
                        tuple_shape.clone(),
                        component_shape.clone(),
                    )
                    .map_err(|e| {
                        Diagnostic::new(
                            CODE_ACTION_FAILED,
                            format!("could not create array at '{path}': {e}"),
                        )
                    })?;
            }
        }
    }
    Ok(())
}
