use core::mem;

use crate::schema::{DATE_EPOCH_OFFSET_DAYS, PgType, TIMESTAMP_EPOCH_OFFSET_MICROS};
use crate::{Error, Result};

pub const INITIAL_ROW_CAPACITY: usize = 4096;
const GROWTH_FACTOR: usize = 2;

pub(crate) fn checked_alloc_size(rows: usize, elem_size: usize) -> Result<usize> {
    rows.checked_mul(elem_size).ok_or(Error::CapacityOverflow)
}

#[derive(Debug, Clone, PartialEq)]
pub enum ColumnValues {
    Bool(Vec<bool>),
    Int16(Vec<i16>),
    Int32(Vec<i32>),
    Int64(Vec<i64>),
    Float32(Vec<f32>),
    Float64(Vec<f64>),
    Text(Vec<String>),
    Timestamp(Vec<i64>),
    Date(Vec<i64>),
}

impl ColumnValues {
    pub fn ty(&self) -> PgType {
        match self {
            ColumnValues::Bool(_) => PgType::Bool,
            ColumnValues::Int16(_) => PgType::Int16,
            ColumnValues::Int32(_) => PgType::Int32,
            ColumnValues::Int64(_) => PgType::Int64,
            ColumnValues::Float32(_) => PgType::Float32,
            ColumnValues::Float64(_) => PgType::Float64,
            ColumnValues::Text(_) => PgType::Text,
            ColumnValues::Timestamp(_) => PgType::Timestamp,
            ColumnValues::Date(_) => PgType::Date,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            ColumnValues::Bool(v) => v.len(),
            ColumnValues::Int16(v) => v.len(),
            ColumnValues::Int32(v) => v.len(),
            ColumnValues::Int64(v) => v.len(),
            ColumnValues::Float32(v) => v.len(),
            ColumnValues::Float64(v) => v.len(),
            ColumnValues::Text(v) => v.len(),
            ColumnValues::Timestamp(v) => v.len(),
            ColumnValues::Date(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // In-memory element size, used for the checked growth arithmetic. Text
    // counts the owning String header; its payload is tracked by the String.
    fn elem_size(&self) -> usize {
        match self {
            ColumnValues::Bool(_) => mem::size_of::<bool>(),
            ColumnValues::Int16(_) => mem::size_of::<i16>(),
            ColumnValues::Int32(_) => mem::size_of::<i32>(),
            ColumnValues::Int64(_) => mem::size_of::<i64>(),
            ColumnValues::Float32(_) => mem::size_of::<f32>(),
            ColumnValues::Float64(_) => mem::size_of::<f64>(),
            ColumnValues::Text(_) => mem::size_of::<String>(),
            ColumnValues::Timestamp(_) => mem::size_of::<i64>(),
            ColumnValues::Date(_) => mem::size_of::<i64>(),
        }
    }

    fn reserve_rows(&mut self, additional: usize) -> Result<()> {
        match self {
            ColumnValues::Bool(v) => v.try_reserve_exact(additional),
            ColumnValues::Int16(v) => v.try_reserve_exact(additional),
            ColumnValues::Int32(v) => v.try_reserve_exact(additional),
            ColumnValues::Int64(v) => v.try_reserve_exact(additional),
            ColumnValues::Float32(v) => v.try_reserve_exact(additional),
            ColumnValues::Float64(v) => v.try_reserve_exact(additional),
            ColumnValues::Text(v) => v.try_reserve_exact(additional),
            ColumnValues::Timestamp(v) => v.try_reserve_exact(additional),
            ColumnValues::Date(v) => v.try_reserve_exact(additional),
        }
        .map_err(|_| Error::CapacityOverflow)
    }

    fn shrink_to_fit(&mut self) {
        match self {
            ColumnValues::Bool(v) => v.shrink_to_fit(),
            ColumnValues::Int16(v) => v.shrink_to_fit(),
            ColumnValues::Int32(v) => v.shrink_to_fit(),
            ColumnValues::Int64(v) => v.shrink_to_fit(),
            ColumnValues::Float32(v) => v.shrink_to_fit(),
            ColumnValues::Float64(v) => v.shrink_to_fit(),
            ColumnValues::Text(v) => v.shrink_to_fit(),
            ColumnValues::Timestamp(v) => v.shrink_to_fit(),
            ColumnValues::Date(v) => v.shrink_to_fit(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub values: ColumnValues,
    pub mask: Vec<bool>,
}

impl Column {
    pub fn ty(&self) -> PgType {
        self.values.ty()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn null_count(&self) -> usize {
        self.mask.iter().filter(|&&present| !present).count()
    }

    pub fn validate(&self) -> Result<()> {
        if self.values.len() != self.mask.len() {
            return Err(Error::MaskLengthMismatch {
                values: self.values.len(),
                mask: self.mask.len(),
            });
        }
        Ok(())
    }
}

#[derive(Debug)]
pub struct ColumnBuilder {
    values: ColumnValues,
    mask: Vec<bool>,
    row_capacity: usize,
}

impl ColumnBuilder {
    pub fn new(ty: PgType) -> Result<Self> {
        Self::with_capacity(ty, INITIAL_ROW_CAPACITY)
    }

    pub fn with_capacity(ty: PgType, rows: usize) -> Result<Self> {
        let values = match ty {
            PgType::Bool => ColumnValues::Bool(Vec::new()),
            PgType::Int16 => ColumnValues::Int16(Vec::new()),
            PgType::Int32 => ColumnValues::Int32(Vec::new()),
            PgType::Int64 => ColumnValues::Int64(Vec::new()),
            PgType::Float32 => ColumnValues::Float32(Vec::new()),
            PgType::Float64 => ColumnValues::Float64(Vec::new()),
            PgType::Text => ColumnValues::Text(Vec::new()),
            PgType::Timestamp => ColumnValues::Timestamp(Vec::new()),
            PgType::Date => ColumnValues::Date(Vec::new()),
        };
        let mut builder = Self {
            values,
            mask: Vec::new(),
            row_capacity: 0,
        };
        builder.grow_to(rows)?;
        Ok(builder)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn ty(&self) -> PgType {
        self.values.ty()
    }

    // Checks the byte sizes of both buffers before touching the allocator so
    // an adversarial row/width combination fails instead of wrapping to a
    // smaller allocation.
    fn grow_to(&mut self, new_capacity: usize) -> Result<()> {
        checked_alloc_size(new_capacity, self.values.elem_size())?;
        checked_alloc_size(new_capacity, mem::size_of::<bool>())?;
        let additional = new_capacity - self.len();
        self.values.reserve_rows(additional)?;
        self.mask
            .try_reserve_exact(additional)
            .map_err(|_| Error::CapacityOverflow)?;
        self.row_capacity = new_capacity;
        Ok(())
    }

    fn ensure_capacity(&mut self) -> Result<()> {
        if self.len() < self.row_capacity {
            return Ok(());
        }
        let new_capacity = if self.row_capacity == 0 {
            1
        } else {
            self.row_capacity
                .checked_mul(GROWTH_FACTOR)
                .ok_or(Error::CapacityOverflow)?
        };
        self.grow_to(new_capacity)
    }

    pub fn append(&mut self, raw: &[u8]) -> Result<()> {
        let ty = self.ty();
        if let Some(width) = ty.width() {
            if raw.len() != width {
                return Err(Error::SizeMismatch {
                    type_name: ty.name(),
                    actual: raw.len(),
                });
            }
        }
        self.ensure_capacity()?;
        match &mut self.values {
            ColumnValues::Bool(v) => v.push(raw[0] != 0),
            ColumnValues::Int16(v) => v.push(i16::from_be_bytes([raw[0], raw[1]])),
            ColumnValues::Int32(v) => v.push(i32::from_be_bytes([raw[0], raw[1], raw[2], raw[3]])),
            ColumnValues::Int64(v) => v.push(i64::from_be_bytes([
                raw[0], raw[1], raw[2], raw[3], raw[4], raw[5], raw[6], raw[7],
            ])),
            ColumnValues::Float32(v) => {
                v.push(f32::from_bits(u32::from_be_bytes([
                    raw[0], raw[1], raw[2], raw[3],
                ])));
            }
            ColumnValues::Float64(v) => {
                v.push(f64::from_bits(u64::from_be_bytes([
                    raw[0], raw[1], raw[2], raw[3], raw[4], raw[5], raw[6], raw[7],
                ])));
            }
            ColumnValues::Text(v) => v.push(core::str::from_utf8(raw)?.to_owned()),
            ColumnValues::Timestamp(v) => {
                // Wire value counts from 2000-01-01; re-bias to the unix epoch.
                let micros = i64::from_be_bytes([
                    raw[0], raw[1], raw[2], raw[3], raw[4], raw[5], raw[6], raw[7],
                ]);
                v.push(micros.wrapping_add(TIMESTAMP_EPOCH_OFFSET_MICROS));
            }
            ColumnValues::Date(v) => {
                // 32-bit day count on the wire, widened so the re-bias cannot
                // overflow.
                let days = i64::from(i32::from_be_bytes([raw[0], raw[1], raw[2], raw[3]]));
                v.push(days + DATE_EPOCH_OFFSET_DAYS);
            }
        }
        self.mask.push(true);
        Ok(())
    }

    // NULL slots hold the type's zero value so they read back as a
    // deterministic sentinel, never uninitialized garbage.
    pub fn append_null(&mut self) -> Result<()> {
        self.ensure_capacity()?;
        match &mut self.values {
            ColumnValues::Bool(v) => v.push(false),
            ColumnValues::Int16(v) => v.push(0),
            ColumnValues::Int32(v) => v.push(0),
            ColumnValues::Int64(v) => v.push(0),
            ColumnValues::Float32(v) => v.push(0.0),
            ColumnValues::Float64(v) => v.push(0.0),
            ColumnValues::Text(v) => v.push(String::new()),
            ColumnValues::Timestamp(v) => v.push(0),
            ColumnValues::Date(v) => v.push(0),
        }
        self.mask.push(false);
        Ok(())
    }

    pub fn finish(mut self) -> Column {
        self.values.shrink_to_fit();
        self.mask.shrink_to_fit();
        Column {
            values: self.values,
            mask: self.mask,
        }
    }
}
