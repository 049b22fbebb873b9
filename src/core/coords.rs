//! Reference position set
//!
//! Built once, sequentially, from the coordinate file. After construction
//! it is only read, so pipeline workers share it by reference without
//! locking.

use crate::core::error::{FilterError, Result};
use crate::core::io::{open_input, ByteLineIterator};
use crate::core::record::{chrom_key, FieldLayout, Record};
use std::collections::{HashMap, HashSet};
use std::io::BufRead;
use std::path::Path;

/// Chromosome name -> set of positions
#[derive(Debug, Clone, Default)]
pub struct CoordinateSet {
    positions: HashMap<Vec<u8>, HashSet<u64>>,
    len: usize,
}

impl CoordinateSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a coordinate file from disk
    ///
    /// Gzip and bzip2 files are decompressed transparently.
    pub fn from_path<P: AsRef<Path>>(
        path: P,
        layout: FieldLayout,
        normalize: bool,
    ) -> Result<Self> {
        let reader = open_input(path.as_ref())?;
        Self::from_reader(reader, layout, normalize)
    }

    /// Build the set from a tab-separated reader.
    ///
    /// Blank lines are skipped. A line whose position column does not parse
    /// aborts the whole load.
    pub fn from_reader<R: BufRead>(
        reader: R,
        layout: FieldLayout,
        normalize: bool,
    ) -> Result<Self> {
        let mut set = Self::new();
        let mut lines = ByteLineIterator::new(reader);
        let mut key_buf = Vec::with_capacity(32);
        let mut line_no = 0usize;

        while let Some(line) = lines.next_line() {
            let line = line?;
            line_no += 1;
            if line.is_empty() {
                continue;
            }

            let record =
                Record::parse(line, layout).map_err(|e| FilterError::at_line(line_no, e))?;
            let key = chrom_key(record.chrom, normalize, &mut key_buf);
            set.insert(key, record.pos);
        }

        log::info!(
            "Loaded {} position(s) on {} chromosome(s)",
            set.len(),
            set.chromosome_count()
        );
        Ok(set)
    }

    /// Insert a (chromosome, position) pair; the name is stored as given
    pub fn insert(&mut self, chrom: &[u8], pos: u64) -> bool {
        let inserted = match self.positions.get_mut(chrom) {
            Some(set) => set.insert(pos),
            None => {
                self.positions.insert(chrom.to_vec(), HashSet::from([pos]));
                true
            }
        };
        if inserted {
            self.len += 1;
        }
        inserted
    }

    /// Exact membership test
    #[inline]
    pub fn contains(&self, chrom: &[u8], pos: u64) -> bool {
        self.positions
            .get(chrom)
            .map_or(false, |set| set.contains(&pos))
    }

    /// Number of distinct (chromosome, position) pairs
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of distinct chromosomes
    pub fn chromosome_count(&self) -> usize {
        self.positions.len()
    }
}
