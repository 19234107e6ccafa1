//! # Capture Name Tables
//!
//! Named groups are reported as a flat table of fixed-size entries:
//!
//! ```text
//! [group hi][group lo][name bytes ...][0][padding ...]
//! ```
//!
//! Each entry is `entry_size` bytes; the group number is big-endian; the
//! name is NUL-terminated; entries are sorted by name.

/// A flat capture name table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameTable {
    entry_size: usize,
    bytes: Box<[u8]>,
}

impl NameTable {
    /// Wrap raw table bytes.
    ///
    /// ## Arguments
    /// * `entry_size` - the size of one entry; must be at least 3.
    /// * `bytes` - the table; trailing partial entries are ignored.
    pub fn new(
        entry_size: usize,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            entry_size: entry_size.max(3),
            bytes: bytes.into_boxed_slice(),
        }
    }

    /// The entry size a table of these names needs: `2 + longest + 1`.
    pub fn entry_size_for<'a, I>(names: I) -> usize
    where
        I: IntoIterator<Item = &'a str>,
    {
        2 + names.into_iter().map(str::len).max().unwrap_or(0) + 1
    }

    /// Build a table from `(name, group)` pairs.
    ///
    /// ## Returns
    /// `None` if a group number does not fit the 2-byte entry header.
    pub fn build<'a, I>(names: I) -> Option<Self>
    where
        I: IntoIterator<Item = (&'a str, usize)>,
    {
        let mut names: Vec<(&str, usize)> = names.into_iter().collect();
        names.sort_unstable();

        let entry_size = Self::entry_size_for(names.iter().map(|(n, _)| *n));

        let mut bytes = vec![0u8; entry_size * names.len()];
        for (entry, (name, group)) in bytes.chunks_exact_mut(entry_size).zip(names) {
            let group = u16::try_from(group).ok()?;
            entry[..2].copy_from_slice(&group.to_be_bytes());
            entry[2..2 + name.len()].copy_from_slice(name.as_bytes());
        }

        Some(Self::new(entry_size, bytes))
    }

    /// The size of one entry.
    pub fn entry_size(&self) -> usize {
        self.entry_size
    }

    /// The raw table bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.bytes.len() / self.entry_size
    }

    /// Is the table empty?
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterate `(name, group)` pairs, in table order.
    ///
    /// Entries whose name is not valid UTF-8 are skipped.
    pub fn entries(&self) -> impl Iterator<Item = (&str, usize)> + '_ {
        self.bytes.chunks_exact(self.entry_size).filter_map(|entry| {
            let group = u16::from_be_bytes([entry[0], entry[1]]) as usize;
            let raw = &entry[2..];
            let end = raw.iter().position(|&b| b == 0).unwrap_or(raw.len());
            core::str::from_utf8(&raw[..end])
                .ok()
                .map(|name| (name, group))
        })
    }

    /// Look up the group number for a name.
    pub fn group(
        &self,
        name: &str,
    ) -> Option<usize> {
        self.entries().find(|(n, _)| *n == name).map(|(_, g)| g)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_layout() {
        let table = NameTable::build([("year", 1), ("id", 3)]).unwrap();

        // 2 + len("year") + 1
        assert_eq!(table.entry_size(), 7);
        assert_eq!(table.len(), 2);
        assert_eq!(
            table.as_bytes(),
            &[0, 3, b'i', b'd', 0, 0, 0, 0, 1, b'y', b'e', b'a', b'r', 0][..]
        );

        assert_eq!(
            table.entries().collect::<Vec<_>>(),
            vec![("id", 3), ("year", 1)]
        );
        assert_eq!(table.group("year"), Some(1));
        assert_eq!(table.group("month"), None);
    }

    #[test]
    fn test_empty() {
        let table = NameTable::build(core::iter::empty()).unwrap();
        assert!(table.is_empty());
        assert_eq!(table.entries().count(), 0);
    }

    #[test]
    fn test_group_overflow() {
        assert!(NameTable::build([("last", 65_535)]).is_some());
        assert_eq!(NameTable::build([("a", 1), ("b", 65_536)]), None);
        assert_eq!(NameTable::entry_size_for(["a", "b"]), 4);
    }

    #[test]
    fn test_partial_entries_ignored() {
        let table = NameTable::new(4, vec![0, 1, b'a', 0, 0, 2]);
        assert_eq!(table.len(), 1);
        assert_eq!(table.entries().collect::<Vec<_>>(), vec![("a", 1)]);
    }
}
