//! Catalog snapshot persistence.
//!
//! A snapshot is the envelope used to ship a catalog between nodes or across
//! restarts: magic bytes, format version, catalog id, then the
//! bincode-encoded catalog payload guarded by a CRC32 checksum. Decoding
//! validates all three before handing the catalog back.

use std::io::{Read, Write};

use uuid::Uuid;

use crate::catalog::Catalog;
use crate::error::{Result, UpdraftError};

/// Magic bytes identifying a catalog snapshot.
pub const SNAPSHOT_MAGIC: &[u8; 8] = b"UPDRAFT\0";

/// Current snapshot format version.
pub const SNAPSHOT_VERSION: u32 = 1;

/// A catalog together with its persistence identity.
#[derive(Debug, Clone)]
pub struct CatalogSnapshot {
    /// Unique snapshot identifier.
    catalog_id: Uuid,
    /// The catalog payload.
    catalog: Catalog,
}

impl CatalogSnapshot {
    /// Creates a snapshot with a fresh identifier.
    #[must_use]
    pub fn new(catalog: Catalog) -> Self {
        CatalogSnapshot {
            catalog_id: Uuid::new_v4(),
            catalog,
        }
    }

    /// Creates a snapshot with a known identifier.
    #[must_use]
    pub fn with_id(catalog_id: Uuid, catalog: Catalog) -> Self {
        CatalogSnapshot {
            catalog_id,
            catalog,
        }
    }

    /// Returns the snapshot identifier.
    #[must_use]
    pub fn catalog_id(&self) -> Uuid {
        self.catalog_id
    }

    /// Returns the catalog.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Consumes the snapshot, returning the catalog.
    #[must_use]
    pub fn into_catalog(self) -> Catalog {
        self.catalog
    }

    /// Writes the snapshot to a stream.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding or writing fails.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        let payload = self.catalog.serialize()?;

        writer
            .write_all(SNAPSHOT_MAGIC)
            .map_err(|e| UpdraftError::Snapshot(format!("Failed to write snapshot magic: {e}")))?;

        writer
            .write_all(&SNAPSHOT_VERSION.to_le_bytes())
            .map_err(|e| {
                UpdraftError::Snapshot(format!("Failed to write snapshot version: {e}"))
            })?;

        writer
            .write_all(self.catalog_id.as_bytes())
            .map_err(|e| UpdraftError::Snapshot(format!("Failed to write catalog ID: {e}")))?;

        let len = payload.len() as u32;
        writer
            .write_all(&len.to_le_bytes())
            .map_err(|e| UpdraftError::Snapshot(format!("Failed to write payload length: {e}")))?;

        writer
            .write_all(&payload)
            .map_err(|e| UpdraftError::Snapshot(format!("Failed to write catalog payload: {e}")))?;

        let checksum = crc32fast::hash(&payload);
        writer
            .write_all(&checksum.to_le_bytes())
            .map_err(|e| UpdraftError::Snapshot(format!("Failed to write checksum: {e}")))?;

        Ok(())
    }

    /// Reads a snapshot from a stream, validating magic, version, and
    /// checksum.
    ///
    /// # Errors
    ///
    /// Returns an error if reading fails or the stream does not hold a
    /// valid snapshot.
    pub fn read_from<R: Read>(reader: &mut R) -> Result<Self> {
        let mut magic = [0u8; 8];
        reader
            .read_exact(&mut magic)
            .map_err(|e| UpdraftError::Snapshot(format!("Failed to read snapshot magic: {e}")))?;
        if magic != *SNAPSHOT_MAGIC {
            return Err(UpdraftError::Snapshot(
                "Invalid catalog snapshot magic bytes".into(),
            ));
        }

        let mut version_bytes = [0u8; 4];
        reader
            .read_exact(&mut version_bytes)
            .map_err(|e| UpdraftError::Snapshot(format!("Failed to read snapshot version: {e}")))?;
        let version = u32::from_le_bytes(version_bytes);
        if version > SNAPSHOT_VERSION {
            return Err(UpdraftError::Snapshot(format!(
                "Unsupported snapshot version: {version} (max supported: {SNAPSHOT_VERSION})"
            )));
        }

        let mut uuid_bytes = [0u8; 16];
        reader
            .read_exact(&mut uuid_bytes)
            .map_err(|e| UpdraftError::Snapshot(format!("Failed to read catalog ID: {e}")))?;
        let catalog_id = Uuid::from_bytes(uuid_bytes);

        let mut len_bytes = [0u8; 4];
        reader
            .read_exact(&mut len_bytes)
            .map_err(|e| UpdraftError::Snapshot(format!("Failed to read payload length: {e}")))?;
        let len = u32::from_le_bytes(len_bytes) as usize;

        let mut payload = vec![0u8; len];
        reader
            .read_exact(&mut payload)
            .map_err(|e| UpdraftError::Snapshot(format!("Failed to read catalog payload: {e}")))?;

        let mut checksum_bytes = [0u8; 4];
        reader
            .read_exact(&mut checksum_bytes)
            .map_err(|e| UpdraftError::Snapshot(format!("Failed to read checksum: {e}")))?;
        let expected = u32::from_le_bytes(checksum_bytes);
        let actual = crc32fast::hash(&payload);
        if expected != actual {
            return Err(UpdraftError::Snapshot(
                "Catalog snapshot checksum mismatch".into(),
            ));
        }

        let catalog = Catalog::deserialize(&payload)?;

        Ok(CatalogSnapshot {
            catalog_id,
            catalog,
        })
    }
}
