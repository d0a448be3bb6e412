use crate::error::LabelOverflow;
use crate::write::Numeric;
use num_traits::{FromPrimitive, PrimInt, Signed, ToPrimitive};
use std::fmt::{Debug, Display};

/// Integer type used for connectivity, offsets and face-stream entries.
///
/// Signed because face offsets carry `-1` for cells without a face stream.
/// Implemented for `i32` and `i64`, the two widths VTK readers accept.
pub trait Label:
    PrimInt
    + Signed
    + FromPrimitive
    + ToPrimitive
    + Numeric
    + Debug
    + Display
    + Default
    + Send
    + Sync
    + 'static
{
    fn from_index(value: usize) -> Result<Self, LabelOverflow> {
        Self::from_usize(value).ok_or(LabelOverflow::new(value, Self::VTK_NAME))
    }
}

impl Label for i32 {}

impl Label for i64 {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn i32_overflow() {
        let too_big = i32::MAX as usize + 1;
        let err = <i32 as Label>::from_index(too_big).unwrap_err();
        assert_eq!(err.value, too_big);
        assert_eq!(err.label, "Int32");
    }

    #[test]
    fn i64_in_range() {
        assert_eq!(<i64 as Label>::from_index(42).unwrap(), 42);
    }
}
