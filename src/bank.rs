//! Bank archives
//!
//! A bank file starts with the 4-byte magic `MAYH` followed by an index of
//! fixed 32-byte entries:
//!
//! ```text
//! offset  size  field
//!      0     1  bank
//!      1     1  kind
//!      2    22  name (NUL padded)
//!     24     4  offset (u32 LE)
//!     28     4  size   (u32 LE)
//! ```
//!
//! Reading and writing whole archives is not supported yet: `load` and
//! `save` fail with `BankUnsupported`. The in-memory tables exist so callers
//! can already be written against them.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use log::warn;

use crate::error::CoreError;

pub const BANK_MAGIC: [u8; 4] = *b"MAYH";
pub const INDEX_ENTRY_SIZE: usize = 32;
pub const NAME_LEN: usize = 22;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BankIndexEntry {
    pub bank: u8,
    pub kind: u8,
    pub name: [u8; NAME_LEN],
    pub offset: u32,
    pub size: u32,
}

impl BankIndexEntry {
    /// Names longer than 22 bytes are truncated.
    pub fn new(bank: u8, kind: u8, name: &str, offset: u32, size: u32) -> Self {
        let mut buf = [0u8; NAME_LEN];
        let bytes = name.as_bytes();
        let len = bytes.len().min(NAME_LEN);
        buf[..len].copy_from_slice(&bytes[..len]);
        Self { bank, kind, name: buf, offset, size }
    }

    /// Name up to the first NUL. Invalid UTF-8 yields an empty name.
    pub fn name(&self) -> &str {
        let end = self.name.iter().position(|&b| b == 0).unwrap_or(NAME_LEN);
        std::str::from_utf8(&self.name[..end]).unwrap_or("")
    }

    pub fn to_bytes(&self) -> [u8; INDEX_ENTRY_SIZE] {
        let mut out = [0u8; INDEX_ENTRY_SIZE];
        out[0] = self.bank;
        out[1] = self.kind;
        out[2..24].copy_from_slice(&self.name);
        out[24..28].copy_from_slice(&self.offset.to_le_bytes());
        out[28..32].copy_from_slice(&self.size.to_le_bytes());
        out
    }

    pub fn from_bytes(bytes: &[u8; INDEX_ENTRY_SIZE]) -> Self {
        let mut name = [0u8; NAME_LEN];
        name.copy_from_slice(&bytes[2..24]);
        Self {
            bank: bytes[0],
            kind: bytes[1],
            name,
            offset: u32::from_le_bytes([bytes[24], bytes[25], bytes[26], bytes[27]]),
            size: u32::from_le_bytes([bytes[28], bytes[29], bytes[30], bytes[31]]),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BankEntry {
    pub name: String,
    pub kind: u8,
    pub data: Vec<u8>,
}

impl BankEntry {
    pub fn new(name: impl Into<String>, kind: u8, data: Vec<u8>) -> Self {
        Self { name: name.into(), kind, data }
    }

    pub fn size(&self) -> usize {
        self.data.len()
    }
}

/// Named entries of one bank, kept in name order.
#[derive(Debug, Clone, Default)]
pub struct Bank {
    entries: BTreeMap<String, BankEntry>,
}

impl Bank {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn find(&self, name: &str) -> Option<&BankEntry> {
        self.entries.get(name)
    }

    pub fn insert(&mut self, entry: BankEntry) -> Option<BankEntry> {
        self.entries.insert(entry.name.clone(), entry)
    }
}

#[derive(Debug, Clone)]
pub struct BankFile {
    path: PathBuf,
    banks: Vec<Bank>,
}

impl BankFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), banks: Vec::new() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_empty(&self) -> bool {
        self.banks.is_empty()
    }

    pub fn len(&self) -> usize {
        self.banks.len()
    }

    pub fn banks(&self) -> &[Bank] {
        &self.banks
    }
}

#[derive(Debug, Default)]
pub struct BankManager {
    files: HashMap<PathBuf, BankFile>,
}

impl BankManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn exists(&self, path: &Path) -> bool {
        self.files.contains_key(path)
    }

    pub fn find(&self, path: &Path) -> Option<&BankFile> {
        self.files.get(path)
    }

    pub fn load(&mut self, path: &Path) -> Result<&BankFile, CoreError> {
        warn!("bank load requested for {}", path.display());
        Err(CoreError::BankUnsupported { path: path.to_path_buf() })
    }

    pub fn save(&mut self, file: &BankFile) -> Result<(), CoreError> {
        warn!("bank save requested for {}", file.path().display());
        Err(CoreError::BankUnsupported { path: file.path().to_path_buf() })
    }
}
