//! The [`Filter`] trait and the two-phase execution protocol.

use trellis_core::CancelToken;
use trellis_store::DataStructure;
use uuid::Uuid;

use crate::action::apply_actions;
use crate::outcome::{CommitOutcome, PlanOutcome};
use crate::param::{Arguments, ParameterSchema};

/// How many elements a per-element loop may process between
/// cancellation polls.
///
/// Loops at or under one chunk never observe a mid-loop cancel;
/// longer loops stop between whole elements only.
pub const CANCEL_CHECK_INTERVAL: usize = 1024;

/// A stateless, two-phase dataset transformation.
///
/// # Contract
///
/// - Filters hold no configuration state: everything flows through
///   [`Arguments`] and the [`DataStructure`] passed per call, and
///   [`Filter::clone_filter`] is identity construction.
/// - [`Filter::plan`] never mutates the store and is deterministic:
///   repeated calls against an unchanged store yield identical
///   outcomes.
/// - [`Filter::commit`] re-plans internally against the store it is
///   about to mutate, so an earlier plan outcome held by the caller
///   is advisory only. Given the derived action list, commit is
///   deterministic: same arguments and store state produce the same
///   outputs regardless of unrelated prior runs.
///
/// # Object safety
///
/// The trait is object-safe; pipeline runners hold filters as
/// `Box<dyn Filter>`.
pub trait Filter: Send + Sync + 'static {
    /// Short machine name, unique within a filter collection.
    fn name(&self) -> &str;

    /// Qualified implementation name for registries and logs.
    fn class_name(&self) -> &str;

    /// Stable identity that survives renames.
    fn uuid(&self) -> Uuid;

    /// Human-readable display label.
    fn human_name(&self) -> &str;

    /// The declared parameter schema.
    fn schema(&self) -> ParameterSchema;

    /// A fresh, default-configured instance.
    fn clone_filter(&self) -> Box<dyn Filter>;

    /// Structural checks and action derivation, called after the
    /// schema has validated `args` against the current store.
    ///
    /// Implementations must not allocate into or mutate the store;
    /// cheap existence/shape/precondition checks only.
    fn plan_impl(&self, structure: &DataStructure, args: &Arguments) -> PlanOutcome;

    /// The per-element computation, called after this commit's own
    /// plan was applied to the store.
    ///
    /// Implementations dispatch on the input's runtime element kind,
    /// write into the arrays the actions created, and poll `cancel`
    /// every [`CANCEL_CHECK_INTERVAL`] elements.
    fn execute_impl(
        &self,
        structure: &mut DataStructure,
        args: &Arguments,
        cancel: &CancelToken,
    ) -> CommitOutcome;

    /// Validate and plan against the current store.
    ///
    /// On any validation failure the outcome is invalid, carries an
    /// empty action list, and reports every diagnostic found.
    fn plan(&self, structure: &DataStructure, args: &Arguments) -> PlanOutcome {
        let diagnostics = self.schema().validate(structure, args);
        if !diagnostics.is_empty() {
            return PlanOutcome::invalid(diagnostics);
        }
        self.plan_impl(structure, args)
    }

    /// Re-plan, apply the fresh action list, and run the computation.
    fn commit(
        &self,
        structure: &mut DataStructure,
        args: &Arguments,
        cancel: &CancelToken,
    ) -> CommitOutcome {
        let plan = self.plan(structure, args);
        if !plan.valid {
            return CommitOutcome::failed(plan.diagnostics);
        }
        if let Err(diagnostic) = apply_actions(structure, &plan.actions) {
            return CommitOutcome::failed(vec![diagnostic]);
        }
        self.execute_impl(structure, args, cancel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::Action;
    use crate::outcome::CommitStatus;
    use crate::param::{ParamSpec, ParamValue};
    use smallvec::smallvec;
    use trellis_core::{DataPath, ElementKind};

    /// Creates a fixed-size uint8 array at the path given by its one
    /// parameter; the computation fills element zero with 1.
    struct MarkerFilter;

    impl Filter for MarkerFilter {
        fn name(&self) -> &str {
            "marker"
        }
        fn class_name(&self) -> &str {
            "trellis::test::MarkerFilter"
        }
        fn uuid(&self) -> Uuid {
            Uuid::from_u128(0x9c1f_83a0_5c5e_4c8a_b1de_07d3c3a1d001)
        }
        fn human_name(&self) -> &str {
            "Marker"
        }
        fn schema(&self) -> ParameterSchema {
            let mut schema = ParameterSchema::new();
            schema.insert(ParamSpec::output_array("output", "Output", "where to mark"));
            schema
        }
        fn clone_filter(&self) -> Box<dyn Filter> {
            Box::new(MarkerFilter)
        }
        fn plan_impl(&self, _structure: &DataStructure, args: &Arguments) -> PlanOutcome {
            let path = args.path("output").expect("validated").clone();
            PlanOutcome::valid(vec![Action::CreateArray {
                kind: ElementKind::UInt8,
                tuple_shape: smallvec![4],
                component_shape: smallvec![1],
                path,
            }])
        }
        fn execute_impl(
            &self,
            structure: &mut DataStructure,
            args: &Arguments,
            _cancel: &CancelToken,
        ) -> CommitOutcome {
            let path = args.path("output").expect("validated");
            let id = structure.resolve_path(path).expect("created by commit");
            structure.write_typed::<u8>(id).expect("created kind").set(0, 1);
            CommitOutcome::succeeded()
        }
    }

    fn args() -> Arguments {
        let mut args = Arguments::new();
        args.insert("output", ParamValue::Path(DataPath::parse("mark")));
        args
    }

    #[test]
    fn plan_is_idempotent_and_non_mutating() {
        let structure = DataStructure::new();
        let filter = MarkerFilter;
        let first = filter.plan(&structure, &args());
        let second = filter.plan(&structure, &args());
        assert!(first.valid);
        assert_eq!(first, second);
        assert!(structure.is_empty());
    }

    #[test]
    fn schema_failure_yields_invalid_plan_with_no_actions() {
        let structure = DataStructure::new();
        let outcome = MarkerFilter.plan(&structure, &Arguments::new());
        assert!(!outcome.valid);
        assert!(outcome.actions.is_empty());
        assert!(!outcome.diagnostics.is_empty());
    }

    #[test]
    fn commit_replans_applies_and_computes() {
        let mut structure = DataStructure::new();
        let outcome = MarkerFilter.commit(&mut structure, &args(), &CancelToken::new());
        assert_eq!(outcome.status, CommitStatus::Succeeded);

        let id = structure.resolve_path(&DataPath::parse("mark")).unwrap();
        let guard = structure.read_typed::<u8>(id).unwrap();
        assert_eq!(guard.as_slice(), &[1, 0, 0, 0]);
    }

    #[test]
    fn second_commit_fails_on_output_collision() {
        let mut structure = DataStructure::new();
        let token = CancelToken::new();
        assert_eq!(
            MarkerFilter.commit(&mut structure, &args(), &token).status,
            CommitStatus::Succeeded
        );
        // Re-planning inside commit sees the freshly created output.
        let outcome = MarkerFilter.commit(&mut structure, &args(), &token);
        assert_eq!(outcome.status, CommitStatus::Failed);
        assert!(!outcome.diagnostics.is_empty());
    }

    #[test]
    fn clone_filter_yields_fresh_instance() {
        let boxed = MarkerFilter.clone_filter();
        assert_eq!(boxed.name(), "marker");
        assert_eq!(boxed.uuid(), MarkerFilter.uuid());
    }
}
