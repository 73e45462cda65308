use crate::batch::{Column, ColumnBuilder, ColumnValues, INITIAL_ROW_CAPACITY};
use crate::schema::{DATE_EPOCH_OFFSET_DAYS, PgType, TIMESTAMP_EPOCH_OFFSET_MICROS};
use crate::{Error, Result};

pub const SIGNATURE: &[u8; 11] = b"PGCOPY\n\xff\r\n\0";

// Every byte of the input flows through read_exact; nothing else touches the
// buffer directly.
struct Reader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    fn read_exact(&mut self, n: usize) -> Result<&'a [u8]> {
        let end = self.pos.checked_add(n).ok_or(Error::OutOfBounds(n))?;
        if end > self.buf.len() {
            return Err(Error::OutOfBounds(n));
        }
        let out = &self.buf[self.pos..end];
        self.pos = end;
        Ok(out)
    }

    fn read_i16(&mut self) -> Result<i16> {
        let b = self.read_exact(2)?;
        Ok(i16::from_be_bytes([b[0], b[1]]))
    }

    fn read_i32(&mut self) -> Result<i32> {
        let b = self.read_exact(4)?;
        Ok(i32::from_be_bytes([b[0], b[1], b[2], b[3]]))
    }

    fn read_u32(&mut self) -> Result<u32> {
        let b = self.read_exact(4)?;
        Ok(u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
    }

    // The signature is checked before any length read; a short or foreign
    // stream reports the missing signature, not a truncation.
    fn expect_signature(&mut self) -> Result<()> {
        if self.buf.len() < SIGNATURE.len() || &self.buf[..SIGNATURE.len()] != SIGNATURE {
            return Err(Error::MissingSignature);
        }
        self.pos = SIGNATURE.len();
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct DecodeOptions {
    initial_row_capacity: usize,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            initial_row_capacity: INITIAL_ROW_CAPACITY,
        }
    }
}

impl DecodeOptions {
    pub fn set_initial_row_capacity(&mut self, rows: usize) -> &mut Self {
        self.initial_row_capacity = rows;
        self
    }

    pub fn initial_row_capacity(&self) -> usize {
        self.initial_row_capacity
    }
}

pub fn decode_pgcopy(bytes: &[u8], types: &[PgType]) -> Result<Vec<Column>> {
    decode_pgcopy_with_options(bytes, types, &DecodeOptions::default())
}

pub fn decode_pgcopy_with_options(
    bytes: &[u8],
    types: &[PgType],
    options: &DecodeOptions,
) -> Result<Vec<Column>> {
    let mut reader = Reader::new(bytes);
    reader.expect_signature()?;

    let _flags = reader.read_u32()?;
    let extension_len = reader.read_u32()?;
    if extension_len != 0 {
        // Extension content is not interpreted, only skipped.
        reader.read_exact(extension_len as usize)?;
    }

    let mut builders = types
        .iter()
        .map(|&ty| ColumnBuilder::with_capacity(ty, options.initial_row_capacity))
        .collect::<Result<Vec<_>>>()?;

    let mut rows = 0usize;
    loop {
        let field_count = reader.read_i16()?;
        if field_count == -1 {
            // End-of-data trailer.
            break;
        }
        if field_count as usize != types.len() {
            return Err(Error::FieldCountMismatch {
                row: rows,
                field_count,
                expected: types.len(),
            });
        }
        for builder in builders.iter_mut() {
            let field_len = reader.read_i32()?;
            if field_len == -1 {
                builder.append_null()?;
                continue;
            }
            let raw = reader.read_exact(field_len as usize)?;
            builder.append(raw)?;
        }
        rows += 1;
    }

    tracing::debug!(rows, columns = types.len(), "decoded copy binary stream");
    Ok(builders.into_iter().map(ColumnBuilder::finish).collect())
}

pub fn encode_pgcopy_into(columns: &[Column], out: &mut Vec<u8>) -> Result<()> {
    if columns.len() > i16::MAX as usize {
        return Err(Error::TooManyColumns(columns.len()));
    }
    let rows = columns.first().map_or(0, Column::len);
    for (index, column) in columns.iter().enumerate() {
        column.validate()?;
        if column.len() != rows {
            return Err(Error::ColumnLengthMismatch {
                index,
                actual: column.len(),
                expected: rows,
            });
        }
    }

    out.extend_from_slice(SIGNATURE);
    out.extend_from_slice(&0u32.to_be_bytes()); // flags
    out.extend_from_slice(&0u32.to_be_bytes()); // no header extension

    for row in 0..rows {
        out.extend_from_slice(&(columns.len() as i16).to_be_bytes());
        for column in columns {
            if !column.mask[row] {
                out.extend_from_slice(&(-1i32).to_be_bytes());
                continue;
            }
            put_field(out, &column.values, row)?;
        }
    }
    out.extend_from_slice(&(-1i16).to_be_bytes());
    Ok(())
}

fn put_field(out: &mut Vec<u8>, values: &ColumnValues, row: usize) -> Result<()> {
    match values {
        ColumnValues::Bool(v) => put_fixed(out, &[u8::from(v[row])]),
        ColumnValues::Int16(v) => put_fixed(out, &v[row].to_be_bytes()),
        ColumnValues::Int32(v) => put_fixed(out, &v[row].to_be_bytes()),
        ColumnValues::Int64(v) => put_fixed(out, &v[row].to_be_bytes()),
        ColumnValues::Float32(v) => put_fixed(out, &v[row].to_bits().to_be_bytes()),
        ColumnValues::Float64(v) => put_fixed(out, &v[row].to_bits().to_be_bytes()),
        ColumnValues::Text(v) => {
            let bytes = v[row].as_bytes();
            let len = i32::try_from(bytes.len()).map_err(|_| Error::FieldTooLarge(bytes.len()))?;
            out.extend_from_slice(&len.to_be_bytes());
            out.extend_from_slice(bytes);
        }
        ColumnValues::Timestamp(v) => {
            // Re-bias back to the 2000-01-01 wire epoch.
            let micros = v[row].wrapping_sub(TIMESTAMP_EPOCH_OFFSET_MICROS);
            put_fixed(out, &micros.to_be_bytes());
        }
        ColumnValues::Date(v) => {
            let days = (v[row] - DATE_EPOCH_OFFSET_DAYS) as i32;
            put_fixed(out, &days.to_be_bytes());
        }
    }
    Ok(())
}

fn put_fixed(out: &mut Vec<u8>, bytes: &[u8]) {
    out.extend_from_slice(&(bytes.len() as i32).to_be_bytes());
    out.extend_from_slice(bytes);
}
