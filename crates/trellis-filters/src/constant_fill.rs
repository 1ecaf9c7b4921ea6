//! In-place constant fill of an existing numeric array.
//!
//! Overwrites every element of the selected array with a scalar
//! converted to the array's native kind. Plans no structural actions;
//! the filter exists to exercise the in-place write path and the
//! cooperative cancellation loop.

use trellis_core::{CancelToken, Diagnostic, ElementKind, NumericElement, ObjectId};
use trellis_filter::{
    Arguments, CommitOutcome, Filter, ParamSpec, ParameterSchema, PlanOutcome,
    CANCEL_CHECK_INTERVAL,
};
use trellis_store::{DataStructure, StoreElement};
use uuid::Uuid;

/// Argument key for the scalar fill value.
pub const K_VALUE: &str = "value";
/// Argument key for the target array path.
pub const K_ARRAY: &str = "array";

/// Diagnostic code: the target array vanished between plan and
/// commit. Unreachable through [`Filter::commit`], which re-plans
/// immediately before executing.
pub const CODE_COMMIT_CONTRACT: i32 = -66701;

/// Constant-fill filter.
#[derive(Clone, Copy, Debug, Default)]
pub struct ConstantFill;

impl ConstantFill {
    const UUID: Uuid = Uuid::from_u128(0x51e8_02bb_76c0_4f0e_8d2a_40f9ce5b7a19);
}

fn contract(detail: String) -> Diagnostic {
    Diagnostic::new(CODE_COMMIT_CONTRACT, detail)
}

fn fill<T: StoreElement + NumericElement>(
    structure: &DataStructure,
    array: ObjectId,
    value: i64,
    cancel: &CancelToken,
) -> CommitOutcome {
    let scalar = T::from_i64(value);
    let mut guard = match structure.write_typed::<T>(array) {
        Ok(guard) => guard,
        Err(e) => return CommitOutcome::failed(vec![contract(e.to_string())]),
    };
    for (index, chunk) in guard
        .as_mut_slice()
        .chunks_mut(CANCEL_CHECK_INTERVAL)
        .enumerate()
    {
        if index > 0 && cancel.is_cancelled() {
            return CommitOutcome::cancelled();
        }
        chunk.fill(scalar);
    }
    CommitOutcome::succeeded()
}

impl Filter for ConstantFill {
    fn name(&self) -> &str {
        "constant_fill"
    }

    fn class_name(&self) -> &str {
        "trellis::filters::ConstantFill"
    }

    fn uuid(&self) -> Uuid {
        Self::UUID
    }

    fn human_name(&self) -> &str {
        "Constant Fill"
    }

    fn schema(&self) -> ParameterSchema {
        let mut schema = ParameterSchema::new();
        schema.insert(ParamSpec::int(
            K_VALUE,
            "Value",
            "Scalar written to every element, converted to the array's kind",
            0,
            i64::from(i32::MIN),
            i64::from(i32::MAX),
        ));
        schema.insert(ParamSpec::input_array(
            K_ARRAY,
            "Array",
            "Array to overwrite in place",
            ElementKind::NUMERIC.to_vec(),
        ));
        schema
    }

    fn clone_filter(&self) -> Box<dyn Filter> {
        Box::new(Self)
    }

    fn plan_impl(&self, _structure: &DataStructure, _args: &Arguments) -> PlanOutcome {
        // Purely in-place: nothing to create, nothing beyond schema
        // validation to check.
        PlanOutcome::valid(Vec::new())
    }

    fn execute_impl(
        &self,
        structure: &mut DataStructure,
        args: &Arguments,
        cancel: &CancelToken,
    ) -> CommitOutcome {
        let value = args.int(K_VALUE).expect("validated int");
        let path = args.path(K_ARRAY).expect("validated path");

        let Some(array) = structure.resolve_path(path) else {
            return CommitOutcome::failed(vec![contract(format!(
                "array at '{path}' must exist after planning"
            ))]);
        };
        let kind = match structure.get_array(array) {
            Some(node) => node.kind(),
            None => {
                return CommitOutcome::failed(vec![contract(format!(
                    "object at '{path}' is not an array"
                ))])
            }
        };

        let structure = &*structure;
        match kind {
            ElementKind::Int8 => fill::<i8>(structure, array, value, cancel),
            ElementKind::Int16 => fill::<i16>(structure, array, value, cancel),
            ElementKind::Int32 => fill::<i32>(structure, array, value, cancel),
            ElementKind::Int64 => fill::<i64>(structure, array, value, cancel),
            ElementKind::UInt8 => fill::<u8>(structure, array, value, cancel),
            ElementKind::UInt16 => fill::<u16>(structure, array, value, cancel),
            ElementKind::UInt32 => fill::<u32>(structure, array, value, cancel),
            ElementKind::UInt64 => fill::<u64>(structure, array, value, cancel),
            ElementKind::Float32 => fill::<f32>(structure, array, value, cancel),
            ElementKind::Float64 => fill::<f64>(structure, array, value, cancel),
            ElementKind::Boolean => CommitOutcome::failed(vec![contract(
                "boolean arrays are excluded by the schema".to_owned(),
            )]),
        }
    }
}
