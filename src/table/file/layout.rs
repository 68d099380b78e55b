//! On-disk layout of a table directory
//!
//! ```text
//! {base_dir}/tables/{name}/
//!   ├── schema
//!   ├── metadata
//!   └── state/
//!       └── {digest[0..2]}/
//!           └── {digest[2..40]}      one record per live row
//! ```

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use sha1::{Digest, Sha1};

use crate::config::SyncStrategy;
use crate::schema::Value;

pub(crate) const SCHEMA_FILE: &str = "schema";
pub(crate) const METADATA_FILE: &str = "metadata";
pub(crate) const STATE_DIR: &str = "state";

const DIGEST_SALT: &[u8] = b"tablestore.digest";

/// Hex characters naming the shard directory
const SHARD_LEN: usize = 2;

/// Hex characters in a full SHA-1 digest
const DIGEST_LEN: usize = 40;

/// Salted SHA-1 of a key's string form, as 40 lowercase hex characters
pub fn digest(key: &Value) -> String {
    let mut hasher = Sha1::new();
    hasher.update(DIGEST_SALT);
    hasher.update(key.to_string().as_bytes());
    hasher
        .finalize()
        .iter()
        .map(|byte| format!("{:02x}", byte))
        .collect()
}

/// "3fa9...e1" → `state/3f/a9...e1`
pub fn path_of(state_dir: &Path, digest: &str) -> PathBuf {
    let (shard, file) = digest.split_at(SHARD_LEN);
    state_dir.join(shard).join(file)
}

/// Inverse of [`path_of`]; `None` for anything that is not a record file
pub fn digest_of(path: &Path) -> Option<String> {
    let file = path.file_name()?.to_str()?;
    let shard = path.parent()?.file_name()?.to_str()?;

    let digest = format!("{}{}", shard, file);
    let is_digest = shard.len() == SHARD_LEN
        && digest.len() == DIGEST_LEN
        && digest.bytes().all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b));

    is_digest.then_some(digest)
}

/// Write `bytes` to a sibling temp file and rename it over `path`, so
/// readers see either the old contents or the new, never a mix
pub(crate) fn write_atomic(path: &Path, bytes: &[u8], sync: SyncStrategy) -> io::Result<()> {
    let mut tmp_name = path.file_name().unwrap_or_default().to_os_string();
    tmp_name.push(".tmp");
    let tmp = path.with_file_name(tmp_name);

    {
        let mut file = File::create(&tmp)?;
        file.write_all(bytes)?;
        if sync == SyncStrategy::EveryWrite {
            file.sync_all()?;
        }
    }

    fs::rename(&tmp, path)
}

/// Read a whole file, mapping "not found" to `None`
pub(crate) fn read_if_exists(path: &Path) -> io::Result<Option<Vec<u8>>> {
    match fs::read(path) {
        Ok(bytes) => Ok(Some(bytes)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e),
    }
}

/// Recursively delete a directory; a missing directory is not an error
pub(crate) fn remove_tree(path: &Path) -> io::Result<()> {
    match fs::remove_dir_all(path) {
        Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e),
        _ => Ok(()),
    }
}
