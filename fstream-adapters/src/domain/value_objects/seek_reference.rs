//! Seek reference points.

/// The position an offset is measured from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SeekReference {
    /// The beginning of the resource.
    Start,
    /// The caller's logical position, not the channel's raw offset.
    Current,
    /// The end of the resource.
    End,
}

impl SeekReference {
    /// Split an `embedded_io` seek into a reference point and a signed offset.
    ///
    /// Returns `None` if a `Start` offset does not fit into an `i64`.
    pub fn from_seek_from(pos: embedded_io::SeekFrom) -> Option<(i64, Self)> {
        match pos {
            embedded_io::SeekFrom::Start(n) => i64::try_from(n).ok().map(|n| (n, Self::Start)),
            embedded_io::SeekFrom::Current(n) => Some((n, Self::Current)),
            embedded_io::SeekFrom::End(n) => Some((n, Self::End)),
        }
    }
}
