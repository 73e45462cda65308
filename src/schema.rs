use crate::{Error, Result};

// Postgres encodes temporal values relative to 2000-01-01, not the unix
// epoch. 10_957 days and 946_684_800_000_000 microseconds separate the two.
pub const DATE_EPOCH_OFFSET_DAYS: i64 = 10_957;
pub const TIMESTAMP_EPOCH_OFFSET_MICROS: i64 = 946_684_800_000_000;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "tools-json", derive(serde::Serialize, serde::Deserialize))]
pub enum PgType {
    Int16,
    Int32,
    Int64,
    Float32,
    Float64,
    Bool,
    Text,
    Timestamp,
    Date,
}

impl PgType {
    // Id order is stable and part of the boundary contract; collaborators
    // persist these ids when mapping catalog types ahead of a decode.
    pub const ALL: [PgType; 9] = [
        PgType::Int16,
        PgType::Int32,
        PgType::Int64,
        PgType::Float32,
        PgType::Float64,
        PgType::Bool,
        PgType::Text,
        PgType::Timestamp,
        PgType::Date,
    ];

    pub fn type_id(self) -> u16 {
        match self {
            PgType::Int16 => 0,
            PgType::Int32 => 1,
            PgType::Int64 => 2,
            PgType::Float32 => 3,
            PgType::Float64 => 4,
            PgType::Bool => 5,
            PgType::Text => 6,
            PgType::Timestamp => 7,
            PgType::Date => 8,
        }
    }

    pub fn from_type_id(id: u16) -> Result<Self> {
        match id {
            0 => Ok(PgType::Int16),
            1 => Ok(PgType::Int32),
            2 => Ok(PgType::Int64),
            3 => Ok(PgType::Float32),
            4 => Ok(PgType::Float64),
            5 => Ok(PgType::Bool),
            6 => Ok(PgType::Text),
            7 => Ok(PgType::Timestamp),
            8 => Ok(PgType::Date),
            other => Err(Error::UnsupportedType(other)),
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "int16" => Some(PgType::Int16),
            "int32" => Some(PgType::Int32),
            "int64" => Some(PgType::Int64),
            "float32" => Some(PgType::Float32),
            "float64" => Some(PgType::Float64),
            "bool" => Some(PgType::Bool),
            "text" => Some(PgType::Text),
            "datetime" => Some(PgType::Timestamp),
            "date" => Some(PgType::Date),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            PgType::Int16 => "int16",
            PgType::Int32 => "int32",
            PgType::Int64 => "int64",
            PgType::Float32 => "float32",
            PgType::Float64 => "float64",
            PgType::Bool => "bool",
            PgType::Text => "text",
            PgType::Timestamp => "datetime",
            PgType::Date => "date",
        }
    }

    // Declared wire width of one field; None for variable-width text.
    pub fn width(self) -> Option<usize> {
        match self {
            PgType::Int16 => Some(2),
            PgType::Int32 => Some(4),
            PgType::Int64 => Some(8),
            PgType::Float32 => Some(4),
            PgType::Float64 => Some(8),
            PgType::Bool => Some(1),
            PgType::Text => None,
            PgType::Timestamp => Some(8),
            PgType::Date => Some(4),
        }
    }
}

pub fn types_from_ids(ids: &[u16]) -> Result<Vec<PgType>> {
    ids.iter().map(|&id| PgType::from_type_id(id)).collect()
}
