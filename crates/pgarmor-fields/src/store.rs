//! Session-scoped storage boundary used by the test-suite.
//!
//! The real deployment target is a relational database with the pgcrypto
//! extension installed; [`MemoryStore`] stands in for it at the storage
//! boundary so the adapter's behaviour — including the requirement that the
//! extension be enabled before any encrypted read or write — can be exercised
//! without a server. Extension enablement is explicit per [`Session`], never
//! global.

use std::collections::BTreeMap;

use tracing::debug;

use crate::error::FieldError;
use crate::field::{EncryptedField, FieldValue, Lookup};

/// Connection-like scope that tracks whether the crypto extension is enabled.
///
/// Mirrors `CREATE EXTENSION pgcrypto`: until it has run, the `encrypt`/
/// `decrypt` functions do not exist and every encrypted operation fails.
#[derive(Debug, Clone, Default)]
pub struct Session {
    extension_enabled: bool,
}

impl Session {
    /// New session with the extension not yet enabled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable the crypto extension for this session only.
    pub fn enable_extension(&mut self) {
        self.extension_enabled = true;
        debug!("crypto extension enabled for session");
    }

    /// Whether encrypted operations are currently available.
    pub fn extension_enabled(&self) -> bool {
        self.extension_enabled
    }
}

/// A stored row: primary key plus named text columns.
///
/// Encrypted columns hold armored ciphertext; plain columns hold their value
/// directly. Both kinds coexist in one row.
#[derive(Debug, Clone)]
pub struct Row {
    pk: u32,
    columns: BTreeMap<String, String>,
}

impl Row {
    /// The row's primary key.
    pub fn pk(&self) -> u32 {
        self.pk
    }

    /// Raw stored text for a column, armored if the column is encrypted.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.columns.get(column).map(String::as_str)
    }
}

/// Minimal in-memory row store behind the field adapter.
#[derive(Debug, Default)]
pub struct MemoryStore {
    session: Session,
    rows: Vec<Row>,
}

impl MemoryStore {
    /// Empty store with a fresh (extension-disabled) session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable the crypto extension on this store's session.
    pub fn enable_extension(&mut self) {
        self.session.enable_extension();
    }

    /// Number of stored rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the store holds no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn ensure_extension(&self) -> Result<(), FieldError> {
        if self.session.extension_enabled() {
            Ok(())
        } else {
            Err(FieldError::ExtensionUnavailable)
        }
    }

    fn row_mut(&mut self, pk: u32) -> &mut Row {
        if let Some(idx) = self.rows.iter().position(|r| r.pk == pk) {
            &mut self.rows[idx]
        } else {
            self.rows.push(Row {
                pk,
                columns: BTreeMap::new(),
            });
            self.rows.last_mut().expect("row was just pushed")
        }
    }

    /// Write `value` into an encrypted column of row `pk`.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError::ExtensionUnavailable`] if the session has not
    /// enabled the extension, or any encryption failure from the field.
    pub fn write<T: FieldValue>(
        &mut self,
        pk: u32,
        column: &str,
        field: &EncryptedField<T>,
        value: &T,
    ) -> Result<(), FieldError> {
        self.ensure_extension()?;
        let stored = field.to_storage(value)?;
        self.row_mut(pk).columns.insert(column.to_owned(), stored);
        debug!(pk, column, "wrote encrypted column");
        Ok(())
    }

    /// Read and decrypt an encrypted column of row `pk`.
    ///
    /// Returns `Ok(None)` when the row or column does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError::ExtensionUnavailable`] if the session has not
    /// enabled the extension, or any decryption failure from the field.
    pub fn read<T: FieldValue>(
        &self,
        pk: u32,
        column: &str,
        field: &EncryptedField<T>,
    ) -> Result<Option<T>, FieldError> {
        self.ensure_extension()?;
        let row = self.rows.iter().find(|r| r.pk == pk);
        match row.and_then(|r| r.get(column)) {
            Some(stored) => Ok(Some(field.from_storage(stored)?)),
            None => Ok(None),
        }
    }

    /// Write a plain (unencrypted) column. Needs no extension.
    pub fn write_plain(&mut self, pk: u32, column: &str, value: &str) {
        self.row_mut(pk)
            .columns
            .insert(column.to_owned(), value.to_owned());
    }

    /// Read a plain (unencrypted) column. Needs no extension.
    pub fn read_plain(&self, pk: u32, column: &str) -> Option<&str> {
        self.rows
            .iter()
            .find(|r| r.pk == pk)
            .and_then(|r| r.get(column))
    }

    /// Find the first row whose encrypted `column` equals `value` exactly.
    ///
    /// # Errors
    ///
    /// As for [`read`](Self::read).
    pub fn find<T: FieldValue + Ord>(
        &self,
        column: &str,
        field: &EncryptedField<T>,
        value: &T,
    ) -> Result<Option<u32>, FieldError> {
        self.ensure_extension()?;
        for row in &self.rows {
            if let Some(stored) = row.get(column) {
                if field.matches(stored, Lookup::Exact, value)? {
                    return Ok(Some(row.pk));
                }
            }
        }
        Ok(None)
    }

    /// Count rows whose encrypted `column` satisfies `lookup` against `value`.
    ///
    /// # Errors
    ///
    /// As for [`read`](Self::read).
    pub fn count_matching<T: FieldValue + Ord>(
        &self,
        column: &str,
        field: &EncryptedField<T>,
        lookup: Lookup,
        value: &T,
    ) -> Result<usize, FieldError> {
        self.ensure_extension()?;
        let mut count = 0;
        for row in &self.rows {
            if let Some(stored) = row.get(column) {
                if field.matches(stored, lookup, value)? {
                    count += 1;
                }
            }
        }
        Ok(count)
    }
}
