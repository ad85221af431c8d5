use crate::ast::{BinaryOperator, Statement, UnaryOperator};
use crate::builtins::BuiltinFunction;

use super::RuntimeError;

/// Runtime values of the language.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Number(f64),
    Boolean(bool),
    Str(String),
    Function(FunctionValue),
    Builtin(BuiltinFunction),
    /// Result of a call that completed without returning anything.
    None,
}

/// A user-defined function captured as a value. The call environment is
/// snapshotted at call time, not here, so the body alone is stored.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionValue {
    pub name: String,
    pub params: Vec<String>,
    pub body: Vec<Statement>,
}

impl Value {
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Number(value) => *value != 0.0,
            Value::Boolean(value) => *value,
            Value::Str(value) => !value.is_empty(),
            Value::Function(_) | Value::Builtin(_) => true,
            Value::None => false,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Number(_) => "number",
            Value::Boolean(_) => "boolean",
            Value::Str(_) => "string",
            Value::Function(_) => "function",
            Value::Builtin(_) => "builtin function",
            Value::None => "nothing",
        }
    }

    /// Rendering used by the `print` builtin. Booleans print with the
    /// language's own literal spellings.
    pub fn to_output(&self) -> String {
        match self {
            Value::Number(value) => value.to_string(),
            Value::Boolean(true) => "Salmon".to_string(),
            Value::Boolean(false) => "Bonito_Flakes".to_string(),
            Value::Str(value) => value.clone(),
            Value::Function(function) => format!("<function {}>", function.name),
            Value::Builtin(builtin) => format!("<built-in function {}>", builtin.name()),
            Value::None => "nothing".to_string(),
        }
    }

    /// Apply a binary operator to two already-evaluated operands. `and`/`or`
    /// land here like every other operator, which is why they cannot
    /// short-circuit.
    pub fn binary(
        op: BinaryOperator,
        left: &Value,
        right: &Value,
    ) -> Result<Value, RuntimeError> {
        match op {
            BinaryOperator::Add => match (left, right) {
                (Value::Number(l), Value::Number(r)) => Ok(Value::Number(l + r)),
                (Value::Str(l), Value::Str(r)) => Ok(Value::Str(format!("{l}{r}"))),
                _ => Err(invalid_operands(op, left, right)),
            },
            BinaryOperator::Sub => numeric(op, left, right, |l, r| Ok(Value::Number(l - r))),
            BinaryOperator::Mul => numeric(op, left, right, |l, r| Ok(Value::Number(l * r))),
            BinaryOperator::Div => numeric(op, left, right, |l, r| {
                if r == 0.0 {
                    Err(RuntimeError::DivisionByZero)
                } else {
                    Ok(Value::Number(l / r))
                }
            }),
            BinaryOperator::Mod => numeric(op, left, right, |l, r| {
                if r == 0.0 {
                    Err(RuntimeError::ModuloByZero)
                } else {
                    Ok(Value::Number(l % r))
                }
            }),
            BinaryOperator::Eq => Ok(Value::Boolean(left == right)),
            BinaryOperator::NotEq => Ok(Value::Boolean(left != right)),
            BinaryOperator::Less => ordering(op, left, right, |l, r| l < r, |l, r| l < r),
            BinaryOperator::Greater => ordering(op, left, right, |l, r| l > r, |l, r| l > r),
            BinaryOperator::LessEq => ordering(op, left, right, |l, r| l <= r, |l, r| l <= r),
            BinaryOperator::GreaterEq => {
                ordering(op, left, right, |l, r| l >= r, |l, r| l >= r)
            }
            BinaryOperator::And => Ok(Value::Boolean(left.is_truthy() && right.is_truthy())),
            BinaryOperator::Or => Ok(Value::Boolean(left.is_truthy() || right.is_truthy())),
        }
    }

    pub fn unary(op: UnaryOperator, operand: &Value) -> Result<Value, RuntimeError> {
        match op {
            UnaryOperator::Negate => match operand {
                Value::Number(value) => Ok(Value::Number(-value)),
                other => Err(RuntimeError::InvalidUnaryOperand {
                    op: op.symbol(),
                    type_name: other.type_name().to_string(),
                }),
            },
            UnaryOperator::Not => Ok(Value::Boolean(!operand.is_truthy())),
        }
    }
}

fn numeric(
    op: BinaryOperator,
    left: &Value,
    right: &Value,
    apply: impl FnOnce(f64, f64) -> Result<Value, RuntimeError>,
) -> Result<Value, RuntimeError> {
    match (left, right) {
        (Value::Number(l), Value::Number(r)) => apply(*l, *r),
        _ => Err(invalid_operands(op, left, right)),
    }
}

fn ordering(
    op: BinaryOperator,
    left: &Value,
    right: &Value,
    numbers: impl FnOnce(f64, f64) -> bool,
    strings: impl FnOnce(&str, &str) -> bool,
) -> Result<Value, RuntimeError> {
    match (left, right) {
        (Value::Number(l), Value::Number(r)) => Ok(Value::Boolean(numbers(*l, *r))),
        (Value::Str(l), Value::Str(r)) => Ok(Value::Boolean(strings(l, r))),
        _ => Err(invalid_operands(op, left, right)),
    }
}

fn invalid_operands(op: BinaryOperator, left: &Value, right: &Value) -> RuntimeError {
    RuntimeError::InvalidOperands {
        op: op.symbol(),
        left: left.type_name().to_string(),
        right: right.type_name().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arithmetic_on_numbers() {
        let seven = Value::binary(BinaryOperator::Add, &Value::Number(3.0), &Value::Number(4.0))
            .expect("add failed");
        assert_eq!(seven, Value::Number(7.0));

        let one = Value::binary(BinaryOperator::Mod, &Value::Number(7.0), &Value::Number(3.0))
            .expect("mod failed");
        assert_eq!(one, Value::Number(1.0));
    }

    #[test]
    fn plus_concatenates_strings() {
        let combined = Value::binary(
            BinaryOperator::Add,
            &Value::Str("cursed ".to_string()),
            &Value::Str("speech".to_string()),
        )
        .expect("concat failed");
        assert_eq!(combined, Value::Str("cursed speech".to_string()));
    }

    #[test]
    fn division_and_modulo_by_zero_are_arithmetic_errors() {
        let err = Value::binary(BinaryOperator::Div, &Value::Number(1.0), &Value::Number(0.0))
            .expect_err("expected division error");
        assert_eq!(err, RuntimeError::DivisionByZero);

        let err = Value::binary(BinaryOperator::Mod, &Value::Number(1.0), &Value::Number(0.0))
            .expect_err("expected modulo error");
        assert_eq!(err, RuntimeError::ModuloByZero);
    }

    #[test]
    fn mismatched_operands_are_operator_errors() {
        let err = Value::binary(
            BinaryOperator::Sub,
            &Value::Str("a".to_string()),
            &Value::Number(1.0),
        )
        .expect_err("expected operand error");
        assert_eq!(
            err,
            RuntimeError::InvalidOperands {
                op: "-",
                left: "string".to_string(),
                right: "number".to_string(),
            }
        );
    }

    #[test]
    fn logical_operators_combine_truthiness() {
        let truthy = Value::binary(
            BinaryOperator::And,
            &Value::Number(1.0),
            &Value::Str("x".to_string()),
        )
        .expect("and failed");
        assert_eq!(truthy, Value::Boolean(true));

        let falsy = Value::binary(BinaryOperator::Or, &Value::Number(0.0), &Value::Boolean(false))
            .expect("or failed");
        assert_eq!(falsy, Value::Boolean(false));
    }

    #[test]
    fn negation_requires_a_number() {
        assert_eq!(
            Value::unary(UnaryOperator::Negate, &Value::Number(2.0)),
            Ok(Value::Number(-2.0))
        );
        assert!(Value::unary(UnaryOperator::Negate, &Value::Boolean(true)).is_err());
        assert_eq!(
            Value::unary(UnaryOperator::Not, &Value::Str(String::new())),
            Ok(Value::Boolean(true))
        );
    }
}
