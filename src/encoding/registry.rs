// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Cache of compiled codecs keyed by message type name.
//!
//! Compiling a definition is far more expensive than encoding or decoding a
//! message, so callers that see the same message types repeatedly (a bag
//! reader, a bridge) compile each one once and share the result.
//!
//! # Example
//!
//! ```
//! use robomsg::encoding::CodecRegistry;
//!
//! let registry = CodecRegistry::new();
//! let codec = registry.get_or_compile("std_msgs/String", "string data").unwrap();
//! let again = registry.get_or_compile("std_msgs/String", "string data").unwrap();
//! assert!(std::sync::Arc::ptr_eq(&codec, &again));
//! ```

use std::collections::HashMap;
use std::sync::{Arc, OnceLock, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::debug;

use crate::core::{CodecError, CodecOptions, Result};
use crate::encoding::ros1::{compile_with_options, CompiledCodec};
use crate::schema::{parse_message_definition, ParseOptions};

type CodecMap = HashMap<String, Arc<CompiledCodec>>;

/// Thread-safe map from message type name to compiled codec.
#[derive(Debug, Default)]
pub struct CodecRegistry {
    codecs: RwLock<CodecMap>,
    options: CodecOptions,
}

impl CodecRegistry {
    /// Create an empty registry compiling with default limits.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty registry compiling with `options`.
    pub fn with_options(options: CodecOptions) -> Self {
        Self {
            codecs: RwLock::default(),
            options,
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, CodecMap>> {
        self.codecs
            .read()
            .map_err(|e| CodecError::Other(format!("Registry lock poisoned: {e}")))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, CodecMap>> {
        self.codecs
            .write()
            .map_err(|e| CodecError::Other(format!("Registry lock poisoned: {e}")))
    }

    /// Register a compiled codec, replacing any previous entry.
    pub fn register(&self, type_name: impl Into<String>, codec: Arc<CompiledCodec>) -> Result<()> {
        self.write()?.insert(type_name.into(), codec);
        Ok(())
    }

    /// Get a registered codec.
    pub fn get(&self, type_name: &str) -> Result<Option<Arc<CompiledCodec>>> {
        Ok(self.read()?.get(type_name).cloned())
    }

    /// Get a registered codec, compiling and registering `definition` on
    /// first use.
    ///
    /// `type_name` names the root type of the definition.
    pub fn get_or_compile(&self, type_name: &str, definition: &str) -> Result<Arc<CompiledCodec>> {
        if let Some(codec) = self.get(type_name)? {
            return Ok(codec);
        }

        let parse_options = ParseOptions::new().top_level_type_name(type_name);
        let types = parse_message_definition(definition, &parse_options)?;
        let compiled = Arc::new(compile_with_options(&types, self.options)?);
        debug!(type_name, types = types.len(), "compiled codec for registry");

        // Another thread may have compiled the same type meanwhile; keep
        // whichever landed first.
        let mut codecs = self.write()?;
        Ok(Arc::clone(
            codecs.entry(type_name.to_string()).or_insert(compiled),
        ))
    }

    /// Whether a codec is registered for `type_name`.
    pub fn contains(&self, type_name: &str) -> Result<bool> {
        Ok(self.read()?.contains_key(type_name))
    }

    /// Registered type names, sorted.
    pub fn names(&self) -> Result<Vec<String>> {
        let mut names: Vec<String> = self.read()?.keys().cloned().collect();
        names.sort();
        Ok(names)
    }

    /// Remove a codec, returning it if it was registered.
    pub fn remove(&self, type_name: &str) -> Result<Option<Arc<CompiledCodec>>> {
        Ok(self.write()?.remove(type_name))
    }

    /// Remove every codec.
    pub fn clear(&self) -> Result<()> {
        self.write()?.clear();
        Ok(())
    }

    /// Number of registered codecs.
    pub fn len(&self) -> Result<usize> {
        Ok(self.read()?.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.read()?.is_empty())
    }
}

static GLOBAL_REGISTRY: OnceLock<CodecRegistry> = OnceLock::new();

/// Process-wide registry with default limits.
///
/// For custom limits, create a [`CodecRegistry`] directly.
pub fn global_registry() -> &'static CodecRegistry {
    GLOBAL_REGISTRY.get_or_init(CodecRegistry::new)
}
