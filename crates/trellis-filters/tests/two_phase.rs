//! Cross-filter behavior of the two-phase protocol: plan idempotence,
//! commit determinism, and independence from unrelated runs.

use smallvec::smallvec;
use trellis_core::{CancelToken, DataPath, ElementKind};
use trellis_filter::{Arguments, CommitStatus, Filter, ParamValue};
use trellis_filters::{constant_fill, scalar_arithmetic, ConstantFill, ScalarArithmetic};
use trellis_store::DataStructure;
use trellis_test_utils::ramp_store;

fn arithmetic_args(choice: usize, value: i64) -> Arguments {
    let mut args = Arguments::new();
    args.insert(scalar_arithmetic::K_OPERATOR, ParamValue::Choice(choice));
    args.insert(scalar_arithmetic::K_VALUE, ParamValue::Int(value));
    args.insert(
        scalar_arithmetic::K_INPUT_ARRAY,
        ParamValue::Path(DataPath::parse("input")),
    );
    args.insert(
        scalar_arithmetic::K_OUTPUT_ARRAY,
        ParamValue::Path(DataPath::parse("output")),
    );
    args
}

fn output_values(structure: &DataStructure) -> Vec<i32> {
    let id = structure
        .resolve_path(&DataPath::parse("output"))
        .expect("output created by commit");
    structure
        .read_typed::<i32>(id)
        .expect("output is int32")
        .as_slice()
        .to_vec()
}

#[test]
fn plan_is_idempotent_and_leaves_id_table_unchanged() {
    let (structure, _) = ramp_store(10);
    let filter = ScalarArithmetic;
    let args = arithmetic_args(0, 1);

    let ids_before: Vec<_> = structure.object_ids().collect();
    let first = filter.plan(&structure, &args);
    let second = filter.plan(&structure, &args);
    let ids_after: Vec<_> = structure.object_ids().collect();

    assert!(first.valid);
    assert_eq!(first.actions, second.actions);
    assert_eq!(first.diagnostics, second.diagnostics);
    assert_eq!(ids_before, ids_after);
}

#[test]
fn commit_is_deterministic_across_fresh_stores() {
    let run = || {
        let (mut structure, _) = ramp_store(10);
        let outcome =
            ScalarArithmetic.commit(&mut structure, &arithmetic_args(0, 1), &CancelToken::new());
        assert_eq!(outcome.status, CommitStatus::Succeeded);
        output_values(&structure)
    };
    assert_eq!(run(), run());
    assert_eq!(run(), (1..=10).collect::<Vec<_>>());
}

#[test]
fn commit_is_independent_of_unrelated_prior_runs() {
    // Baseline: arithmetic alone.
    let (mut baseline, _) = ramp_store(10);
    ScalarArithmetic.commit(&mut baseline, &arithmetic_args(1, 1), &CancelToken::new());

    // Same arithmetic after an unrelated filter touched another array.
    let (mut structure, _) = ramp_store(10);
    structure
        .create_array(
            None,
            "scratch",
            ElementKind::Float64,
            smallvec![64],
            smallvec![1],
        )
        .unwrap();
    let mut fill_args = Arguments::new();
    fill_args.insert(constant_fill::K_VALUE, ParamValue::Int(9));
    fill_args.insert(
        constant_fill::K_ARRAY,
        ParamValue::Path(DataPath::parse("scratch")),
    );
    assert_eq!(
        ConstantFill
            .commit(&mut structure, &fill_args, &CancelToken::new())
            .status,
        CommitStatus::Succeeded
    );
    ScalarArithmetic.commit(&mut structure, &arithmetic_args(1, 1), &CancelToken::new());

    assert_eq!(output_values(&baseline), output_values(&structure));
}

#[test]
fn caller_plan_then_commit_round_trip() {
    let (mut structure, _) = ramp_store(10);
    let filter = ScalarArithmetic;
    let args = arithmetic_args(3, 1);

    // The caller inspects the plan, then commits; commit re-plans
    // internally and, with the store unchanged, derives the same
    // actions it applies.
    let plan = filter.plan(&structure, &args);
    assert!(plan.valid);
    assert_eq!(plan.actions.len(), 1);

    let outcome = filter.commit(&mut structure, &args, &CancelToken::new());
    assert_eq!(outcome.status, CommitStatus::Succeeded);
    assert_eq!(output_values(&structure), (0..=9).collect::<Vec<_>>());
}

#[test]
fn invalid_plan_blocks_commit_without_mutation() {
    let (mut structure, _) = ramp_store(10);
    let args = arithmetic_args(3, 0);

    let plan = ScalarArithmetic.plan(&structure, &args);
    assert!(!plan.valid);

    let ids_before: Vec<_> = structure.object_ids().collect();
    let outcome = ScalarArithmetic.commit(&mut structure, &args, &CancelToken::new());
    assert_eq!(outcome.status, CommitStatus::Failed);
    let ids_after: Vec<_> = structure.object_ids().collect();
    assert_eq!(ids_before, ids_after);
    assert!(structure.resolve_path(&DataPath::parse("output")).is_none());
}

#[test]
fn cloned_filters_share_identity_but_no_state() {
    let filter = ScalarArithmetic;
    let clone = filter.clone_filter();
    assert_eq!(clone.name(), filter.name());
    assert_eq!(clone.uuid(), filter.uuid());
    assert_eq!(clone.class_name(), filter.class_name());

    // The clone behaves identically on a fresh store.
    let (mut structure, _) = ramp_store(4);
    let outcome = clone.commit(&mut structure, &arithmetic_args(2, 3), &CancelToken::new());
    assert_eq!(outcome.status, CommitStatus::Succeeded);
    assert_eq!(output_values(&structure), vec![0, 3, 6, 9]);
}
