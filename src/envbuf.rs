//! Bounded environment buffer.
//!
//! [`EnvBuffer`] accumulates the ordered `key=value` entries describing one
//! event. Capacity is fixed at construction (bytes and key count) and a
//! rejected append leaves every previously accepted entry intact. The caller
//! is expected to abort the whole dispatch on the first overflow.
//!
//! Entries are kept in two read-only views that stay in lockstep:
//! - a list of owned strings, for environment construction and inspection;
//! - one contiguous byte region where each entry is NUL-terminated, used
//!   verbatim as the tail of the wire payload.
//!
//! Typed append helpers replace free-form formatting: [`EnvBuffer::append`]
//! for string values, [`EnvBuffer::append_u64`] for counters, and
//! [`EnvBuffer::append_raw`] for caller-supplied `KEY=VALUE` entries taken
//! verbatim.

use crate::types::{Error, Result};

/// Ordered, capacity-bounded `key=value` sequence for one event.
#[derive(Debug, Clone)]
pub struct EnvBuffer {
    entries: Vec<String>,
    blob: Vec<u8>,
    max_bytes: usize,
    max_keys: usize,
}

impl EnvBuffer {
    /// Creates an empty buffer with the given byte and key capacities.
    ///
    /// `max_bytes` counts the NUL terminator of every entry.
    pub fn new(max_bytes: usize, max_keys: usize) -> Self {
        Self {
            entries: Vec::with_capacity(max_keys.min(64)),
            blob: Vec::with_capacity(max_bytes.min(4096)),
            max_bytes,
            max_keys,
        }
    }

    /// Appends `key=value`.
    pub fn append(&mut self, key: &str, value: &str) -> Result<()> {
        self.push_entry(format!("{key}={value}"))
    }

    /// Appends `key=<decimal>`.
    pub fn append_u64(&mut self, key: &str, value: u64) -> Result<()> {
        self.push_entry(format!("{key}={value}"))
    }

    /// Appends a caller-supplied `KEY=VALUE` entry verbatim.
    pub fn append_raw(&mut self, entry: &str) -> Result<()> {
        self.push_entry(entry.to_string())
    }

    /// Number of entries accepted so far.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Bytes consumed in the contiguous region, NUL terminators included.
    pub fn byte_len(&self) -> usize {
        self.blob.len()
    }

    /// Ordered read-only view of the accepted entries.
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// Contiguous NUL-separated byte region, one terminator per entry.
    pub fn blob(&self) -> &[u8] {
        &self.blob
    }

    fn push_entry(&mut self, entry: String) -> Result<()> {
        // Every entry must stay a self-contained NUL-terminated string.
        debug_assert!(
            !entry.contains('\0'),
            "environment entry may not embed NUL"
        );

        if self.entries.len() >= self.max_keys {
            return Err(Error::buffer_overflow(format!(
                "too many keys (max {})",
                self.max_keys
            )));
        }

        let needed = entry.len() + 1;
        let remaining = self.max_bytes - self.blob.len();
        if needed > remaining {
            return Err(Error::buffer_overflow(format!(
                "entry {:?} needs {} bytes, {} remaining",
                entry, needed, remaining
            )));
        }

        self.blob.extend_from_slice(entry.as_bytes());
        self.blob.push(0);
        self.entries.push(entry);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn entries_keep_insertion_order() {
        let mut env = EnvBuffer::new(256, 8);
        env.append("ACTION", "add").unwrap();
        env.append("DEVPATH", "/devices/pci/1").unwrap();
        env.append_u64("SEQNUM", 17).unwrap();
        assert_eq!(
            env.entries(),
            &["ACTION=add", "DEVPATH=/devices/pci/1", "SEQNUM=17"]
        );
    }

    #[test]
    fn blob_is_nul_separated() {
        let mut env = EnvBuffer::new(64, 4);
        env.append("A", "1").unwrap();
        env.append("B", "2").unwrap();
        assert_eq!(env.blob(), b"A=1\0B=2\0");
        assert_eq!(env.byte_len(), 8);
    }

    #[test]
    fn exact_byte_fit_is_accepted() {
        // "K=abc" + NUL is 6 bytes.
        let mut env = EnvBuffer::new(6, 4);
        env.append("K", "abc").unwrap();
        assert_eq!(env.byte_len(), 6);
        assert!(env.append("L", "").is_err());
    }

    #[test]
    fn overflowing_entry_is_rejected_and_prior_entries_survive() {
        let mut env = EnvBuffer::new(16, 8);
        env.append("A", "1").unwrap();
        env.append("B", "2").unwrap();

        let err = env.append("LONGKEY", "overflowing").unwrap_err();
        assert!(matches!(err, Error::BufferOverflow(_)));

        assert_eq!(env.entries(), &["A=1", "B=2"]);
        assert_eq!(env.blob(), b"A=1\0B=2\0");
    }

    #[test]
    fn key_count_limit_is_enforced() {
        let mut env = EnvBuffer::new(1024, 2);
        env.append("A", "1").unwrap();
        env.append("B", "2").unwrap();
        let err = env.append("C", "3").unwrap_err();
        assert!(matches!(err, Error::BufferOverflow(_)));
        assert_eq!(env.len(), 2);
    }

    #[test]
    fn raw_entries_are_taken_verbatim() {
        let mut env = EnvBuffer::new(64, 4);
        env.append_raw("MAJOR=8").unwrap();
        env.append_raw("weird entry without equals").unwrap();
        assert_eq!(env.entries(), &["MAJOR=8", "weird entry without equals"]);
    }
}
