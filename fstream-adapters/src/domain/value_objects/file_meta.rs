//! Metadata record produced by info queries.

use std::path::Path;
use time::OffsetDateTime;

/// Metadata about a named resource.
///
/// Used by `BufferedStream::info` and the one-shot `info` / `last_modified`
/// functions.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct FileMeta {
    /// The resource name as it was given to the channel.
    pub name: String,
    /// The containing directory, empty if the name has no parent.
    pub directory: String,
    /// The extension (type) without the leading dot.
    pub extension: Option<String>,
    /// Size in bytes.
    pub size: u64,
    /// Creation time, if the channel can report it.
    pub created: Option<OffsetDateTime>,
    /// Last modification time, if the channel can report it.
    pub modified: Option<OffsetDateTime>,
}

impl FileMeta {
    /// Create a record for `name`, splitting out its directory and extension.
    ///
    /// # Examples
    ///
    /// ```
    /// use fstream_adapters::FileMeta;
    ///
    /// let meta = FileMeta::from_name("logs/today.txt");
    /// assert_eq!(meta.directory, "logs");
    /// assert_eq!(meta.extension.as_deref(), Some("txt"));
    /// ```
    pub fn from_name(name: &str) -> Self {
        let path = Path::new(name);
        let directory = path
            .parent()
            .map(|p| p.to_string_lossy().into_owned())
            .unwrap_or_default();
        let extension = path
            .extension()
            .map(|e| e.to_string_lossy().into_owned());

        Self {
            name: name.to_owned(),
            directory,
            extension,
            size: 0,
            created: None,
            modified: None,
        }
    }

    /// Set the size.
    #[must_use]
    pub fn with_size(mut self, size: u64) -> Self {
        self.size = size;
        self
    }

    /// Set the creation and modification times.
    #[must_use]
    pub fn with_times(
        mut self,
        created: Option<OffsetDateTime>,
        modified: Option<OffsetDateTime>,
    ) -> Self {
        self.created = created;
        self.modified = modified;
        self
    }
}
