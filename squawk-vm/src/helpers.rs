//! `java.lang.VM.do_*` helper semantics.
//!
//! The translator never inlines a null/bounds/arithmetic/store/cast check; it emits a call to
//! one of these helpers instead. The interpreter recognizes calls to them by `FixedEntryPoint`
//! and runs the corresponding check here rather than dispatching a real call frame.

use crate::error::{RuntimeError, VmResult};
use squawk_core::Oop;

pub fn do_null_check(value: Option<Oop>) -> VmResult<Oop> {
    value.ok_or(RuntimeError::NullPointerException)
}

pub fn do_array_bounds_check(index: i32, length: usize) -> VmResult<usize> {
    if index < 0 || index as usize >= length {
        return Err(RuntimeError::ArrayIndexOutOfBoundsException { index, length });
    }
    Ok(index as usize)
}

pub fn do_divide_by_zero_check_i32(divisor: i32) -> VmResult<()> {
    if divisor == 0 {
        return Err(RuntimeError::ArithmeticException {
            reason: "/ by zero".to_string(),
        });
    }
    Ok(())
}

pub fn do_divide_by_zero_check_i64(divisor: i64) -> VmResult<()> {
    if divisor == 0 {
        return Err(RuntimeError::ArithmeticException {
            reason: "/ by zero".to_string(),
        });
    }
    Ok(())
}

pub fn do_array_store_check(is_assignable: bool, value_kind: &str, component_kind: &str) -> VmResult<()> {
    if !is_assignable {
        return Err(RuntimeError::ArrayStoreException {
            reason: format!("cannot store {value_kind} into array of {component_kind}"),
        });
    }
    Ok(())
}

pub fn do_checkcast(is_assignable: bool, value_kind: &str, target_kind: &str) -> VmResult<()> {
    if !is_assignable {
        return Err(RuntimeError::ClassCastException {
            reason: format!("{value_kind} cannot be cast to {target_kind}"),
        });
    }
    Ok(())
}

/// JVM integer division truncates toward zero and `Integer.MIN_VALUE / -1` overflows back to
/// `Integer.MIN_VALUE` rather than panicking.
pub fn checked_idiv(a: i32, b: i32) -> VmResult<i32> {
    do_divide_by_zero_check_i32(b)?;
    Ok(a.wrapping_div(b))
}

pub fn checked_irem(a: i32, b: i32) -> VmResult<i32> {
    do_divide_by_zero_check_i32(b)?;
    Ok(a.wrapping_rem(b))
}

pub fn checked_ldiv(a: i64, b: i64) -> VmResult<i64> {
    do_divide_by_zero_check_i64(b)?;
    Ok(a.wrapping_div(b))
}

pub fn checked_lrem(a: i64, b: i64) -> VmResult<i64> {
    do_divide_by_zero_check_i64(b)?;
    Ok(a.wrapping_rem(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_check_rejects_none() {
        assert!(matches!(
            do_null_check(None),
            Err(RuntimeError::NullPointerException)
        ));
    }

    #[test]
    fn array_bounds_check_rejects_out_of_range() {
        assert!(do_array_bounds_check(3, 3).is_err());
        assert!(do_array_bounds_check(-1, 3).is_err());
        assert!(do_array_bounds_check(2, 3).is_ok());
    }

    #[test]
    fn integer_division_by_min_and_neg_one_wraps() {
        let result = checked_idiv(i32::MIN, -1).unwrap();
        assert_eq!(result, i32::MIN);
    }

    #[test]
    fn division_by_zero_is_arithmetic_exception() {
        assert!(checked_idiv(1, 0).is_err());
    }
}
