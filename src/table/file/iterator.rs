//! State Iterator
//!
//! Lazy walk over every record file under `state/`, one shard at a time.

use std::fs::{self, ReadDir};
use std::io;

use crate::error::Result;
use crate::schema::Row;

use super::layout::digest_of;
use super::ContentAddressedFileTable;

/// Iterator over a file table's live rows, in directory order
pub struct StateIterator<'a> {
    table: &'a ContentAddressedFileTable,
    /// Remaining shard directories
    shards: Option<ReadDir>,
    /// Records of the shard being walked
    files: Option<ReadDir>,
    /// Failure opening `state/`, reported on the first call to `next`
    failed: Option<io::Error>,
}

impl<'a> StateIterator<'a> {
    pub(super) fn new(table: &'a ContentAddressedFileTable) -> Self {
        let (shards, failed) = match fs::read_dir(table.state_dir()) {
            Ok(shards) => (Some(shards), None),
            // Nothing has been written since creation or the last clear
            Err(e) if e.kind() == io::ErrorKind::NotFound => (None, None),
            Err(e) => (None, Some(e)),
        };

        Self {
            table,
            shards,
            files: None,
            failed,
        }
    }
}

impl<'a> Iterator for StateIterator<'a> {
    type Item = Result<Row>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(e) = self.failed.take() {
            return Some(Err(e.into()));
        }

        loop {
            if let Some(files) = &mut self.files {
                match files.next() {
                    Some(Ok(entry)) => {
                        let path = entry.path();
                        let Some(digest) = digest_of(&path) else {
                            continue;
                        };
                        match self.table.read_digest(&digest) {
                            Ok(Some(row)) => return Some(Ok(row)),
                            Ok(None) => continue,
                            Err(e) => return Some(Err(e)),
                        }
                    }
                    Some(Err(e)) => return Some(Err(e.into())),
                    None => self.files = None,
                }
            }

            match self.shards.as_mut()?.next()? {
                Ok(entry) => {
                    let path = entry.path();
                    if !path.is_dir() {
                        continue;
                    }
                    match fs::read_dir(&path) {
                        Ok(files) => self.files = Some(files),
                        Err(e) => return Some(Err(e.into())),
                    }
                }
                Err(e) => return Some(Err(e.into())),
            }
        }
    }
}
