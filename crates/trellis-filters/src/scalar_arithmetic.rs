//! Element-wise arithmetic between an array and an integer scalar.
//!
//! For operator `OP` in `{+, -, *, /}` and scalar `v`, commit
//! computes `output[i] = input[i] OP v` for every linear index, in
//! the input array's native element kind, into a freshly created
//! output array of the same kind and shapes. Integer kinds wrap on
//! overflow and truncate on division; the scalar is converted to the
//! native kind first.
//!
//! Division by a zero scalar is rejected while planning and never
//! reaches the per-element loop.

use trellis_core::{CancelToken, Diagnostic, ElementKind, NumericElement, ObjectId};
use trellis_filter::{
    Action, Arguments, CommitOutcome, Filter, ParamSpec, ParameterSchema, PlanOutcome,
    CANCEL_CHECK_INTERVAL,
};
use trellis_store::{DataStructure, StoreElement};
use uuid::Uuid;

/// Argument key for the operator choice.
pub const K_OPERATOR: &str = "operator";
/// Argument key for the integer scalar operand.
pub const K_VALUE: &str = "value";
/// Argument key for the input array path.
pub const K_INPUT_ARRAY: &str = "input_array";
/// Argument key for the output array path.
pub const K_OUTPUT_ARRAY: &str = "output_array";

/// Diagnostic code: division by a zero scalar requested.
pub const CODE_ZERO_DIVISOR: i32 = -66601;
/// Diagnostic code: an array resolved during planning vanished or
/// changed before the computation ran. Unreachable through
/// [`Filter::commit`], which re-plans immediately before executing.
pub const CODE_COMMIT_CONTRACT: i32 = -66602;

/// The scalar operator applied per element.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operator {
    /// `input[i] + v`
    Add,
    /// `input[i] - v`
    Sub,
    /// `input[i] * v`
    Mul,
    /// `input[i] / v` (truncating for integer kinds)
    Div,
}

impl Operator {
    /// Map a validated choice index to the operator it selects.
    pub fn from_choice(index: usize) -> Option<Self> {
        match index {
            0 => Some(Self::Add),
            1 => Some(Self::Sub),
            2 => Some(Self::Mul),
            3 => Some(Self::Div),
            _ => None,
        }
    }

    /// The label shown for this operator in the choice set.
    pub fn label(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
        }
    }

    fn apply<T: NumericElement>(self, lhs: T, rhs: T) -> T {
        match self {
            Self::Add => lhs.wrapping_add(rhs),
            Self::Sub => lhs.wrapping_sub(rhs),
            Self::Mul => lhs.wrapping_mul(rhs),
            Self::Div => lhs.wrapping_div(rhs),
        }
    }
}

/// Arithmetic-by-scalar filter.
///
/// Stateless: every invocation reads its configuration from the
/// argument map.
#[derive(Clone, Copy, Debug, Default)]
pub struct ScalarArithmetic;

impl ScalarArithmetic {
    const UUID: Uuid = Uuid::from_u128(0x7b44_9e0f_23d6_41fb_9a07_5a8c11febd42);
}

fn contract(detail: String) -> Diagnostic {
    Diagnostic::new(CODE_COMMIT_CONTRACT, detail)
}

fn compute<T: StoreElement + NumericElement>(
    structure: &DataStructure,
    input: ObjectId,
    output: ObjectId,
    operator: Operator,
    value: i64,
    cancel: &CancelToken,
) -> CommitOutcome {
    let scalar = T::from_i64(value);
    let src = match structure.read_typed::<T>(input) {
        Ok(guard) => guard,
        Err(e) => return CommitOutcome::failed(vec![contract(e.to_string())]),
    };
    let mut dst = match structure.write_typed::<T>(output) {
        Ok(guard) => guard,
        Err(e) => return CommitOutcome::failed(vec![contract(e.to_string())]),
    };
    if src.len() != dst.len() {
        return CommitOutcome::failed(vec![contract(format!(
            "input holds {} elements but output holds {}",
            src.len(),
            dst.len()
        ))]);
    }

    let chunks = src
        .as_slice()
        .chunks(CANCEL_CHECK_INTERVAL)
        .zip(dst.as_mut_slice().chunks_mut(CANCEL_CHECK_INTERVAL));
    for (index, (src_chunk, dst_chunk)) in chunks.enumerate() {
        if index > 0 && cancel.is_cancelled() {
            return CommitOutcome::cancelled();
        }
        for (s, d) in src_chunk.iter().zip(dst_chunk.iter_mut()) {
            *d = operator.apply(*s, scalar);
        }
    }
    CommitOutcome::succeeded()
}

impl Filter for ScalarArithmetic {
    fn name(&self) -> &str {
        "scalar_arithmetic"
    }

    fn class_name(&self) -> &str {
        "trellis::filters::ScalarArithmetic"
    }

    fn uuid(&self) -> Uuid {
        Self::UUID
    }

    fn human_name(&self) -> &str {
        "Scalar Arithmetic"
    }

    fn schema(&self) -> ParameterSchema {
        let mut schema = ParameterSchema::new();
        schema.insert(ParamSpec::choice(
            K_OPERATOR,
            "Operator",
            "Arithmetic operator applied between each element and the scalar",
            0,
            [Operator::Add, Operator::Sub, Operator::Mul, Operator::Div]
                .iter()
                .map(|op| op.label().to_owned())
                .collect(),
        ));
        schema.insert(ParamSpec::int(
            K_VALUE,
            "Value",
            "Integer scalar operand",
            1,
            i64::from(i32::MIN),
            i64::from(i32::MAX),
        ));
        schema.insert(ParamSpec::input_array(
            K_INPUT_ARRAY,
            "Input Array",
            "Array supplying the left-hand operand",
            ElementKind::NUMERIC.to_vec(),
        ));
        schema.insert(ParamSpec::output_array(
            K_OUTPUT_ARRAY,
            "Output Array",
            "Where to create the result array",
        ));
        schema
    }

    fn clone_filter(&self) -> Box<dyn Filter> {
        Box::new(Self)
    }

    fn plan_impl(&self, structure: &DataStructure, args: &Arguments) -> PlanOutcome {
        let operator = Operator::from_choice(args.choice(K_OPERATOR).expect("validated choice"))
            .expect("choice bounded by schema");
        let value = args.int(K_VALUE).expect("validated int");
        let input_path = args.path(K_INPUT_ARRAY).expect("validated path");
        let output_path = args.path(K_OUTPUT_ARRAY).expect("validated path");

        if operator == Operator::Div && value == 0 {
            return PlanOutcome::reject(Diagnostic::new(
                CODE_ZERO_DIVISOR,
                "operator '/' with a zero scalar divides by zero",
            ));
        }

        let input = structure
            .resolve_path(input_path)
            .and_then(|id| structure.get_array(id))
            .expect("schema resolved the input array");

        PlanOutcome::valid(vec![Action::CreateArray {
            kind: input.kind(),
            tuple_shape: input.tuple_shape(),
            component_shape: input.component_shape(),
            path: output_path.clone(),
        }])
    }

    fn execute_impl(
        &self,
        structure: &mut DataStructure,
        args: &Arguments,
        cancel: &CancelToken,
    ) -> CommitOutcome {
        let operator = Operator::from_choice(args.choice(K_OPERATOR).expect("validated choice"))
            .expect("choice bounded by schema");
        let value = args.int(K_VALUE).expect("validated int");
        let input_path = args.path(K_INPUT_ARRAY).expect("validated path");
        let output_path = args.path(K_OUTPUT_ARRAY).expect("validated path");

        let resolved = (
            structure.resolve_path(input_path),
            structure.resolve_path(output_path),
        );
        let (Some(input), Some(output)) = resolved else {
            return CommitOutcome::failed(vec![contract(format!(
                "arrays at '{input_path}' and '{output_path}' must exist after planning"
            ))]);
        };

        let kind = match structure.get_array(input) {
            Some(node) => node.kind(),
            None => {
                return CommitOutcome::failed(vec![contract(format!(
                    "object at '{input_path}' is not an array"
                ))])
            }
        };

        let structure = &*structure;
        match kind {
            ElementKind::Int8 => {
                compute::<i8>(structure, input, output, operator, value, cancel)
            }
            ElementKind::Int16 => {
                compute::<i16>(structure, input, output, operator, value, cancel)
            }
            ElementKind::Int32 => {
                compute::<i32>(structure, input, output, operator, value, cancel)
            }
            ElementKind::Int64 => {
                compute::<i64>(structure, input, output, operator, value, cancel)
            }
            ElementKind::UInt8 => {
                compute::<u8>(structure, input, output, operator, value, cancel)
            }
            ElementKind::UInt16 => {
                compute::<u16>(structure, input, output, operator, value, cancel)
            }
            ElementKind::UInt32 => {
                compute::<u32>(structure, input, output, operator, value, cancel)
            }
            ElementKind::UInt64 => {
                compute::<u64>(structure, input, output, operator, value, cancel)
            }
            ElementKind::Float32 => {
                compute::<f32>(structure, input, output, operator, value, cancel)
            }
            ElementKind::Float64 => {
                compute::<f64>(structure, input, output, operator, value, cancel)
            }
            ElementKind::Boolean => CommitOutcome::failed(vec![contract(
                "boolean arrays are excluded by the schema".to_owned(),
            )]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use smallvec::smallvec;
    use trellis_core::DataPath;
    use trellis_filter::{CommitStatus, ParamValue};

    fn ramp_store() -> DataStructure {
        let mut structure = DataStructure::new();
        let id = structure
            .create_array(
                None,
                "input",
                ElementKind::Int32,
                smallvec![10],
                smallvec![1],
            )
            .unwrap();
        let mut guard = structure.write_typed::<i32>(id).unwrap();
        for i in 0..10 {
            guard.set(i, i as i32);
        }
        drop(guard);
        structure
    }

    fn args(operator: Operator, value: i64) -> Arguments {
        let mut args = Arguments::new();
        args.insert(
            K_OPERATOR,
            ParamValue::Choice(match operator {
                Operator::Add => 0,
                Operator::Sub => 1,
                Operator::Mul => 2,
                Operator::Div => 3,
            }),
        );
        args.insert(K_VALUE, ParamValue::Int(value));
        args.insert(K_INPUT_ARRAY, ParamValue::Path(DataPath::parse("input")));
        args.insert(K_OUTPUT_ARRAY, ParamValue::Path(DataPath::parse("output")));
        args
    }

    fn run(operator: Operator, value: i64) -> Vec<i32> {
        let mut structure = ramp_store();
        let filter = ScalarArithmetic;
        let plan = filter.plan(&structure, &args(operator, value));
        assert!(plan.valid, "plan diagnostics: {:?}", plan.diagnostics);

        let outcome = filter.commit(&mut structure, &args(operator, value), &CancelToken::new());
        assert_eq!(outcome.status, CommitStatus::Succeeded);

        let output = structure.resolve_path(&DataPath::parse("output")).unwrap();
        let view = structure.read_typed::<i32>(output).unwrap();
        let result = view.as_slice().to_vec();
        result
    }

    #[test]
    fn add_one_to_ramp() {
        assert_eq!(run(Operator::Add, 1), (1..=10).collect::<Vec<_>>());
    }

    #[test]
    fn sub_one_from_ramp() {
        assert_eq!(run(Operator::Sub, 1), (-1..=8).collect::<Vec<_>>());
    }

    #[test]
    fn mul_by_one_is_identity() {
        assert_eq!(run(Operator::Mul, 1), (0..=9).collect::<Vec<_>>());
    }

    #[test]
    fn div_by_one_is_identity() {
        assert_eq!(run(Operator::Div, 1), (0..=9).collect::<Vec<_>>());
    }

    #[test]
    fn div_truncates_toward_zero() {
        assert_eq!(
            run(Operator::Div, 3),
            vec![0, 0, 0, 1, 1, 1, 2, 2, 2, 3]
        );
    }

    #[test]
    fn div_by_zero_rejected_at_plan_time() {
        let structure = ramp_store();
        let plan = ScalarArithmetic.plan(&structure, &args(Operator::Div, 0));
        assert!(!plan.valid);
        assert!(plan.actions.is_empty());
        assert_eq!(plan.diagnostics[0].code, CODE_ZERO_DIVISOR);

        // Every other operator accepts a zero scalar.
        assert!(ScalarArithmetic.plan(&structure, &args(Operator::Mul, 0)).valid);
    }

    #[test]
    fn output_mirrors_input_kind_and_shape() {
        let structure = ramp_store();
        let plan = ScalarArithmetic.plan(&structure, &args(Operator::Add, 1));
        assert_eq!(
            plan.actions,
            vec![Action::CreateArray {
                kind: ElementKind::Int32,
                tuple_shape: smallvec![10],
                component_shape: smallvec![1],
                path: DataPath::parse("output"),
            }]
        );
    }

    proptest! {
        #[test]
        fn add_then_sub_restores_input(
            values in prop::collection::vec(any::<i32>(), 1..48),
            scalar in -1000i64..1000,
        ) {
            let mut structure = DataStructure::new();
            let id = structure
                .create_array(
                    None,
                    "input",
                    ElementKind::Int32,
                    smallvec![values.len()],
                    smallvec![1],
                )
                .unwrap();
            {
                let mut guard = structure.write_typed::<i32>(id).unwrap();
                for (i, &v) in values.iter().enumerate() {
                    guard.set(i, v);
                }
            }

            let mut add_args = args(Operator::Add, scalar);
            add_args.insert(K_OUTPUT_ARRAY, ParamValue::Path(DataPath::parse("plus")));
            ScalarArithmetic.commit(&mut structure, &add_args, &CancelToken::new());

            let mut sub_args = args(Operator::Sub, scalar);
            sub_args.insert(K_INPUT_ARRAY, ParamValue::Path(DataPath::parse("plus")));
            sub_args.insert(K_OUTPUT_ARRAY, ParamValue::Path(DataPath::parse("back")));
            ScalarArithmetic.commit(&mut structure, &sub_args, &CancelToken::new());

            let back = structure.resolve_path(&DataPath::parse("back")).unwrap();
            // Wrapping add then wrapping sub is always the identity.
            let back_view = structure.read_typed::<i32>(back).unwrap();
            prop_assert_eq!(
                back_view.as_slice(),
                values.as_slice()
            );
        }
    }

    #[test]
    fn operates_in_native_kind() {
        let mut structure = DataStructure::new();
        let id = structure
            .create_array(
                None,
                "input",
                ElementKind::UInt8,
                smallvec![3],
                smallvec![1],
            )
            .unwrap();
        structure.write_typed::<u8>(id).unwrap().set(0, 255);
        let outcome =
            ScalarArithmetic.commit(&mut structure, &args(Operator::Add, 1), &CancelToken::new());
        assert_eq!(outcome.status, CommitStatus::Succeeded);

        let output = structure.resolve_path(&DataPath::parse("output")).unwrap();
        let guard = structure.read_typed::<u8>(output).unwrap();
        assert_eq!(guard.as_slice(), &[0, 1, 1]);
    }
}
