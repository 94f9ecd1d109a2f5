//! Operator kernels, one per value-type family, grouped the way the unary
//! and binary operators of the language are grouped: integer arithmetic,
//! string concatenation, boolean logic, and the type-distinguishing
//! equality/ordering shared by every comparison.

use crate::ast::{BinOp, UnOp};
use crate::error::HostError;
use crate::value::Value;

/// Forcing a division by zero does not halt the interpreter: it raises the
/// catchable exception tag `"div0"`, exactly as `raise "div0";` would.
pub const DIV0_TAG: &str = "div0";

#[derive(Debug)]
pub enum OpOutcome {
    Value(Value),
    /// The operation raised a Brewin-exception (currently only `"div0"`)
    /// rather than producing a value.
    Raise(&'static str),
}

pub fn eval_unary(op: UnOp, operand: &Value) -> Result<Value, HostError> {
    match (op, operand) {
        (UnOp::Neg, Value::Int(v)) => Ok(Value::Int(-v)),
        (UnOp::Not, Value::Bool(v)) => Ok(Value::Bool(!v)),
        (UnOp::Neg, other) => Err(type_mismatch("-", other.type_name())),
        (UnOp::Not, other) => Err(type_mismatch("!", other.type_name())),
    }
}

pub fn eval_binary(op: BinOp, lhs: &Value, rhs: &Value) -> Result<OpOutcome, HostError> {
    use BinOp::*;
    match op {
        Eq => Ok(OpOutcome::Value(Value::Bool(check_equality(lhs, rhs)))),
        Ne => Ok(OpOutcome::Value(Value::Bool(!check_equality(lhs, rhs)))),
        Add => add(lhs, rhs).map(OpOutcome::Value),
        Sub => int_op(op, lhs, rhs).map(OpOutcome::Value),
        Mul => int_op(op, lhs, rhs).map(OpOutcome::Value),
        Div => int_div(lhs, rhs),
        And => bool_op(op, lhs, rhs).map(OpOutcome::Value),
        Or => bool_op(op, lhs, rhs).map(OpOutcome::Value),
        Lt | Le | Gt | Ge => int_compare(op, lhs, rhs).map(OpOutcome::Value),
    }
}

/// `+` is overloaded: integer addition or string concatenation, chosen by
/// the operand types. Mixing an int with a string (or either with a bool or
/// nil) is a type error.
fn add(lhs: &Value, rhs: &Value) -> Result<Value, HostError> {
    match (lhs, rhs) {
        (Value::Int(a), Value::Int(b)) => Ok(Value::Int(a + b)),
        (Value::Str(a), Value::Str(b)) => Ok(Value::str(format!("{}{}", a, b))),
        _ => Err(type_mismatch("+", format!("{}/{}", lhs.type_name(), rhs.type_name()))),
    }
}

fn int_op(op: BinOp, lhs: &Value, rhs: &Value) -> Result<Value, HostError> {
    let (a, b) = int_operands(op, lhs, rhs)?;
    Ok(Value::Int(match op {
        BinOp::Sub => a - b,
        BinOp::Mul => a * b,
        _ => unreachable!("int_op only called for -/*"),
    }))
}

/// Integer division floors toward negative infinity (matching the reference
/// behavior), not toward zero as Rust's `/` does. Division by zero raises
/// the `"div0"` exception instead of returning a `HostError`.
fn int_div(lhs: &Value, rhs: &Value) -> Result<OpOutcome, HostError> {
    let (a, b) = int_operands(BinOp::Div, lhs, rhs)?;
    if b == 0 {
        return Ok(OpOutcome::Raise(DIV0_TAG));
    }
    Ok(OpOutcome::Value(Value::Int(floor_div(a, b))))
}

/// Integer division rounding toward negative infinity, unlike Rust's `/`
/// which truncates toward zero.
fn floor_div(a: i64, b: i64) -> i64 {
    let q = a / b;
    let r = a % b;
    if r != 0 && (r < 0) != (b < 0) {
        q - 1
    } else {
        q
    }
}

fn int_operands(op: BinOp, lhs: &Value, rhs: &Value) -> Result<(i64, i64), HostError> {
    match (lhs.as_int(), rhs.as_int()) {
        (Some(a), Some(b)) => Ok((a, b)),
        _ => Err(type_mismatch(
            op_symbol(op),
            format!("{}/{}", lhs.type_name(), rhs.type_name()),
        )),
    }
}

fn bool_op(op: BinOp, lhs: &Value, rhs: &Value) -> Result<Value, HostError> {
    match (lhs.as_bool(), rhs.as_bool()) {
        (Some(a), Some(b)) => Ok(Value::Bool(match op {
            BinOp::And => a && b,
            BinOp::Or => a || b,
            _ => unreachable!("bool_op only called for &&/||"),
        })),
        _ => Err(type_mismatch(
            op_symbol(op),
            format!("{}/{}", lhs.type_name(), rhs.type_name()),
        )),
    }
}

/// `<`, `<=`, `>`, `>=` are only defined over integers.
fn int_compare(op: BinOp, lhs: &Value, rhs: &Value) -> Result<Value, HostError> {
    let (a, b) = int_operands(op, lhs, rhs)?;
    Ok(Value::Bool(match op {
        BinOp::Lt => a < b,
        BinOp::Le => a <= b,
        BinOp::Gt => a > b,
        BinOp::Ge => a >= b,
        _ => unreachable!("int_compare only called for </<=/>/>="),
    }))
}

/// `==`/`!=` never fail: values of differing types simply compare unequal,
/// and `nil` is equal only to `nil`.
fn check_equality(lhs: &Value, rhs: &Value) -> bool {
    lhs == rhs
}

fn type_mismatch(op: &str, types: impl std::fmt::Display) -> HostError {
    HostError::type_error(format!("operator \"{}\" not defined for {}", op, types))
}

fn op_symbol(op: BinOp) -> &'static str {
    match op {
        BinOp::Add => "+",
        BinOp::Sub => "-",
        BinOp::Mul => "*",
        BinOp::Div => "/",
        BinOp::And => "&&",
        BinOp::Or => "||",
        BinOp::Eq => "==",
        BinOp::Ne => "!=",
        BinOp::Lt => "<",
        BinOp::Le => "<=",
        BinOp::Gt => ">",
        BinOp::Ge => ">=",
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn val(outcome: OpOutcome) -> Value {
        match outcome {
            OpOutcome::Value(v) => v,
            OpOutcome::Raise(tag) => panic!("unexpected raise: {}", tag),
        }
    }

    #[test]
    fn string_concatenation_via_plus() {
        let result = eval_binary(BinOp::Add, &Value::str("foo"), &Value::str("bar")).unwrap();
        assert_eq!(val(result), Value::str("foobar"));
    }

    #[test]
    fn mixed_type_plus_is_type_error() {
        let err = eval_binary(BinOp::Add, &Value::Int(1), &Value::str("x")).unwrap_err();
        assert_eq!(err.kind, crate::error::ErrorKind::TypeError);
    }

    #[test]
    fn division_floors_toward_negative_infinity() {
        let result = eval_binary(BinOp::Div, &Value::Int(-7), &Value::Int(2)).unwrap();
        assert_eq!(val(result), Value::Int(-4));
    }

    #[test]
    fn division_by_zero_raises_div0() {
        let result = eval_binary(BinOp::Div, &Value::Int(1), &Value::Int(0)).unwrap();
        match result {
            OpOutcome::Raise(tag) => assert_eq!(tag, DIV0_TAG),
            OpOutcome::Value(_) => panic!("expected a raise"),
        }
    }

    #[test]
    fn equality_never_errors_across_types() {
        let result = eval_binary(BinOp::Eq, &Value::Int(0), &Value::Bool(false)).unwrap();
        assert_eq!(val(result), Value::Bool(false));
        let result = eval_binary(BinOp::Eq, &Value::Nil, &Value::Nil).unwrap();
        assert_eq!(val(result), Value::Bool(true));
    }
}
