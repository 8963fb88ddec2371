//! Unix open options.

use std::fs::OpenOptions;
use std::os::unix::fs::OpenOptionsExt;

/// Permission bits of newly created files, before the process umask.
pub const CREATE_MODE: u32 = 0o644;

pub(crate) fn configure(options: &mut OpenOptions) {
    options.mode(CREATE_MODE);
}
