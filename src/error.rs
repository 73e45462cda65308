use core::str::Utf8Error;

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("missing postgres signature")]
    MissingSignature,

    #[error("reading {0} bytes would cause an out of bounds access")]
    OutOfBounds(usize),

    #[error("mismatched {type_name} size: {actual}")]
    SizeMismatch {
        type_name: &'static str,
        actual: usize,
    },

    #[error("text field is not valid utf-8: {0}")]
    TextDecode(#[from] Utf8Error),

    #[error("allocation size would overflow")]
    CapacityOverflow,

    #[error("unknown type id: {0}")]
    UnsupportedType(u16),

    #[error("mismatched field count and column count on row {row}: {field_count} != {expected}")]
    FieldCountMismatch {
        row: usize,
        field_count: i16,
        expected: usize,
    },

    #[error("column count must fit in a 16-bit field count: {0}")]
    TooManyColumns(usize),

    #[error("field of {0} bytes does not fit in a 32-bit length prefix")]
    FieldTooLarge(usize),

    #[error("column {index} has {actual} rows, expected {expected}")]
    ColumnLengthMismatch {
        index: usize,
        actual: usize,
        expected: usize,
    },

    #[error("mismatched value and mask lengths: {values} != {mask}")]
    MaskLengthMismatch { values: usize, mask: usize },
}
