//! Windows open options.

use std::fs::OpenOptions;
use std::os::windows::fs::OpenOptionsExt;
use windows::Win32::Storage::FileSystem::{FILE_SHARE_DELETE, FILE_SHARE_READ, FILE_SHARE_WRITE};

/// Let other handles read, write, rename and delete a file while a stream has
/// it open, matching what Unix allows.
pub(crate) fn configure(options: &mut OpenOptions) {
    options.share_mode(FILE_SHARE_READ.0 | FILE_SHARE_WRITE.0 | FILE_SHARE_DELETE.0);
}
