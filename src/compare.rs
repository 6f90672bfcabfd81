use crate::evaluator::EvalError;
use crate::host::Scalar;
use crate::value::Value;

/// Absolute tolerance for floating-point equality.
pub const FLOAT_TOLERANCE: f64 = 1e-9;

/// Compares two evaluation results.
///
/// - absent equals absent and nothing else
/// - scalars of the same kind compare by value, floats within
///   [`FLOAT_TOLERANCE`]
/// - an integer against a float is compared as floats unless `strict`
/// - any other kind mismatch, and any non-scalar operand, is `false`
///   unless `strict`, in which case it is [`EvalError::Mismatch`]
pub fn equal(lhs: &Value<'_>, rhs: &Value<'_>, strict: bool) -> Result<bool, EvalError> {
    match (lhs.is_absent(), rhs.is_absent()) {
        (true, true) => return Ok(true),
        (true, false) | (false, true) => return Ok(false),
        (false, false) => {}
    }

    let (Some(l), Some(r)) = (lhs.scalar(), rhs.scalar()) else {
        return mismatch(lhs.type_name(), rhs.type_name(), strict);
    };

    match (l, r) {
        (Scalar::Bool(a), Scalar::Bool(b)) => Ok(a == b),
        (Scalar::Int(a), Scalar::Int(b)) => Ok(a == b),
        (Scalar::Float(a), Scalar::Float(b)) => Ok(floats_equal(a, b)),
        (Scalar::Str(a), Scalar::Str(b)) => Ok(a == b),
        (Scalar::Int(a), Scalar::Float(b)) if !strict => Ok(floats_equal(a as f64, b)),
        (Scalar::Float(a), Scalar::Int(b)) if !strict => Ok(floats_equal(a, b as f64)),
        (l, r) => mismatch(l.type_name(), r.type_name(), strict),
    }
}

fn floats_equal(a: f64, b: f64) -> bool {
    (a - b).abs() <= FLOAT_TOLERANCE
}

fn mismatch(lhs: &'static str, rhs: &'static str, strict: bool) -> Result<bool, EvalError> {
    if strict {
        return Err(EvalError::Mismatch { lhs, rhs });
    }
    tracing::trace!(lhs, rhs, "comparing mismatched kinds, result is false");
    Ok(false)
}
