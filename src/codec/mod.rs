pub mod pgcopy;

pub use pgcopy::{
    DecodeOptions, SIGNATURE, decode_pgcopy, decode_pgcopy_with_options, encode_pgcopy_into,
};
