use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum MessageError {
    #[error("label of {0} bytes exceeds the 63 byte limit: {1}")]
    LabelTooLong(usize, String),

    #[error("empty label in name: {0:?}")]
    EmptyLabel(String),

    #[error("name of {0} bytes exceeds the 255 byte limit")]
    NameTooLong(usize),

    #[error("writing {needed} byte(s) at {len} would exceed the {capacity} byte buffer")]
    CapacityExceeded {
        needed: usize,
        len: usize,
        capacity: usize,
    },

    #[error("compression pointer to offset {offset} is outside the {len} byte message")]
    PointerOutOfRange { offset: usize, len: usize },

    #[error("circular compression pointer - offset {0} was already visited")]
    CircularReference(usize),

    #[error("reserved label type {byte:#04x} at offset {offset}")]
    ReservedLabelType { offset: usize, byte: u8 },

    #[error("unknown record type: {0}")]
    UnknownRecordType(String),

    #[error("opcodes are only 4 bits wide")]
    ReservedOpCode,

    #[error("parsing error: {0}")]
    Parsing(String),
}

impl<E: std::fmt::Debug> From<nom::Err<E>> for MessageError {
    fn from(error: nom::Err<E>) -> Self {
        MessageError::Parsing(format!("{:?}", error))
    }
}
