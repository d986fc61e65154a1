// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Core error types for robomsg.
//!
//! Errors fall into three groups:
//! - Schema errors, raised while parsing or compiling message definitions
//! - Encode errors, raised while sizing or writing a value
//! - Decode errors, raised while reading fields out of a buffer

use thiserror::Error;

/// Errors produced by the message codec.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CodecError {
    /// Message definition text could not be parsed
    #[error("Parse error in {context}: {message}")]
    ParseError {
        /// What was being parsed
        context: String,
        /// Error message
        message: String,
    },

    /// Structurally invalid schema
    #[error("Invalid schema '{schema_name}': {reason}")]
    InvalidSchema {
        /// Schema name or identifier
        schema_name: String,
        /// Validation error message
        reason: String,
    },

    /// A complex field names a type that is not defined
    #[error("Type not found: '{type_name}'")]
    TypeNotFound {
        /// Type name that was not found
        type_name: String,
    },

    /// A complex field name matches more than one type definition
    #[error("Ambiguous type '{type_name}': matches {}", .candidates.join(", "))]
    AmbiguousType {
        /// Type name as written
        type_name: String,
        /// Every definition the name matched
        candidates: Vec<String>,
    },

    /// Buffer too short for requested read
    #[error("Buffer too short: requested {requested} bytes at position {cursor_pos}, but only {available} bytes available")]
    BufferTooShort {
        /// Requested bytes
        requested: usize,
        /// Available bytes
        available: usize,
        /// Cursor position when error occurred
        cursor_pos: u64,
    },

    /// String or array length prefix exceeds the data or the configured limit
    #[error("Length {length} exceeds buffer at position {position} (buffer length: {buffer_len})")]
    LengthExceeded {
        /// Length that was read
        length: usize,
        /// Position in buffer
        position: usize,
        /// Buffer length
        buffer_len: usize,
    },

    /// Field decode error with context
    #[error("Failed to decode field '{field_name}' (type: '{field_type}', cursor_pos: {cursor_pos}): {cause}")]
    FieldDecodeError {
        /// Field name
        field_name: String,
        /// Field type
        field_type: String,
        /// Position of the field relative to its message
        cursor_pos: u64,
        /// Underlying error
        cause: String,
    },

    /// Value does not fit the schema while sizing or writing
    #[error("{codec} encode error: {message}")]
    EncodeError {
        /// Codec context (e.g., "ROS1", "JSON")
        codec: String,
        /// Error message
        message: String,
    },

    /// Encoded string bytes do not fit the destination
    #[error("Not enough space to encode string at position {position}: produced {written} bytes, but only {available} bytes available")]
    StringOverflow {
        /// Bytes produced by UTF-8 encoding
        written: usize,
        /// Bytes left in the destination
        available: usize,
        /// Write position of the string bytes
        position: usize,
    },

    /// Array element index past the end
    #[error("Index {index} out of bounds for array of length {len}")]
    IndexOutOfBounds {
        /// Requested index
        index: usize,
        /// Array length
        len: usize,
    },

    /// Field lookup on a view with an unknown name
    #[error("Field '{field_name}' not found in type '{type_name}'")]
    FieldNotFound {
        /// Type the view was compiled for
        type_name: String,
        /// Requested field
        field_name: String,
    },

    /// Other error
    #[error("Other error: {0}")]
    Other(String),
}

impl CodecError {
    /// Create a parse error.
    pub fn parse(context: impl Into<String>, message: impl Into<String>) -> Self {
        CodecError::ParseError {
            context: context.into(),
            message: message.into(),
        }
    }

    /// Create an invalid schema error.
    pub fn invalid_schema(schema_name: impl Into<String>, reason: impl Into<String>) -> Self {
        CodecError::InvalidSchema {
            schema_name: schema_name.into(),
            reason: reason.into(),
        }
    }

    /// Create a "type not found" error.
    pub fn type_not_found(type_name: impl Into<String>) -> Self {
        CodecError::TypeNotFound {
            type_name: type_name.into(),
        }
    }

    /// Create an ambiguous type error.
    pub fn ambiguous_type(type_name: impl Into<String>, candidates: Vec<String>) -> Self {
        CodecError::AmbiguousType {
            type_name: type_name.into(),
            candidates,
        }
    }

    /// Create an encode error.
    pub fn encode(codec: impl Into<String>, message: impl Into<String>) -> Self {
        CodecError::EncodeError {
            codec: codec.into(),
            message: message.into(),
        }
    }

    /// Create a buffer too short error.
    pub fn buffer_too_short(requested: usize, available: usize, cursor_pos: u64) -> Self {
        CodecError::BufferTooShort {
            requested,
            available,
            cursor_pos,
        }
    }

    /// Create a length exceeded error.
    pub fn length_exceeded(length: usize, position: usize, buffer_len: usize) -> Self {
        CodecError::LengthExceeded {
            length,
            position,
            buffer_len,
        }
    }

    /// Create a string overflow error.
    pub fn string_overflow(written: usize, available: usize, position: usize) -> Self {
        CodecError::StringOverflow {
            written,
            available,
            position,
        }
    }

    /// Create an index out of bounds error.
    pub fn index_out_of_bounds(index: usize, len: usize) -> Self {
        CodecError::IndexOutOfBounds { index, len }
    }

    /// Create a "field not found" error.
    pub fn field_not_found(type_name: impl Into<String>, field_name: impl Into<String>) -> Self {
        CodecError::FieldNotFound {
            type_name: type_name.into(),
            field_name: field_name.into(),
        }
    }

    /// Wrap this error with the field it occurred in.
    ///
    /// Errors that already carry field context are returned unchanged so the
    /// innermost field is reported.
    pub fn in_field(self, field_name: &str, field_type: &str, cursor_pos: usize) -> Self {
        match self {
            err @ CodecError::FieldDecodeError { .. } => err,
            other => CodecError::FieldDecodeError {
                field_name: field_name.to_string(),
                field_type: field_type.to_string(),
                cursor_pos: cursor_pos as u64,
                cause: other.to_string(),
            },
        }
    }

    /// Whether this error comes from schema authoring rather than data.
    pub fn is_schema_error(&self) -> bool {
        matches!(
            self,
            CodecError::ParseError { .. }
                | CodecError::InvalidSchema { .. }
                | CodecError::TypeNotFound { .. }
                | CodecError::AmbiguousType { .. }
        )
    }

    /// Get structured fields for logging.
    pub fn log_fields(&self) -> Vec<(&'static str, String)> {
        match self {
            CodecError::ParseError { context, message } => {
                vec![("context", context.clone()), ("message", message.clone())]
            }
            CodecError::InvalidSchema {
                schema_name,
                reason,
            } => vec![("schema", schema_name.clone()), ("reason", reason.clone())],
            CodecError::TypeNotFound { type_name } => vec![("type", type_name.clone())],
            CodecError::AmbiguousType {
                type_name,
                candidates,
            } => vec![
                ("type", type_name.clone()),
                ("candidates", candidates.join(",")),
            ],
            CodecError::BufferTooShort {
                requested,
                available,
                cursor_pos,
            } => vec![
                ("requested", requested.to_string()),
                ("available", available.to_string()),
                ("cursor", cursor_pos.to_string()),
            ],
            CodecError::LengthExceeded {
                length,
                position,
                buffer_len,
            } => vec![
                ("length", length.to_string()),
                ("position", position.to_string()),
                ("buffer_len", buffer_len.to_string()),
            ],
            CodecError::FieldDecodeError {
                field_name,
                field_type,
                cursor_pos,
                cause,
            } => vec![
                ("field", field_name.clone()),
                ("type", field_type.clone()),
                ("cursor", cursor_pos.to_string()),
                ("cause", cause.clone()),
            ],
            CodecError::EncodeError { codec, message } => {
                vec![("codec", codec.clone()), ("message", message.clone())]
            }
            CodecError::StringOverflow {
                written,
                available,
                position,
            } => vec![
                ("written", written.to_string()),
                ("available", available.to_string()),
                ("position", position.to_string()),
            ],
            CodecError::IndexOutOfBounds { index, len } => {
                vec![("index", index.to_string()), ("len", len.to_string())]
            }
            CodecError::FieldNotFound {
                type_name,
                field_name,
            } => vec![("type", type_name.clone()), ("field", field_name.clone())],
            CodecError::Other(msg) => vec![("message", msg.clone())],
        }
    }
}

/// Result type for robomsg operations.
pub type Result<T> = std::result::Result<T, CodecError>;
