//! The metadata projector: turns a file path into the optional "Metadata date"
//! cell value by reading the embedded EXIF block of `.jpg` files.

use super::CoreError;
use exif::{In, Value};
use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// Numeric EXIF tag of `DateTime` (last written), not `DateTimeOriginal`.
pub const DATE_TIME_TAG: u16 = 306;

/// Tag number to textual value, for the primary image only.
pub type TagMap = BTreeMap<u16, String>;

/// The metadata-decoding collaborator.
pub trait MetadataReader {
    /// Opens the image at `path` and returns its primary tags.
    ///
    /// A readable image without any metadata block yields an empty map. Every
    /// failure (missing file, permissions, malformed data) is an `Err`.
    fn read_tags(&self, path: &Path) -> Result<TagMap, CoreError>;
}

/// Reads EXIF tags with `kamadak-exif`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExifReader;

impl MetadataReader for ExifReader {
    fn read_tags(&self, path: &Path) -> Result<TagMap, CoreError> {
        let file = File::open(path).map_err(|e| CoreError::Io(e, path.to_path_buf()))?;
        let mut reader = BufReader::new(file);

        let exif = match exif::Reader::new().read_from_container(&mut reader) {
            Ok(exif) => exif,
            Err(exif::Error::NotFound(_)) => return Ok(TagMap::new()),
            Err(e) => return Err(CoreError::Exif(e, path.to_path_buf())),
        };

        Ok(exif
            .fields()
            .filter(|field| field.ifd_num == In::PRIMARY)
            .map(|field| (field.tag.number(), field_text(field)))
            .collect())
    }
}

/// ASCII values verbatim, everything else in its display form.
fn field_text(field: &exif::Field) -> String {
    match field.value {
        Value::Ascii(ref strings) => strings
            .first()
            .map(|bytes| {
                String::from_utf8_lossy(bytes)
                    .trim_end_matches('\0')
                    .to_string()
            })
            .unwrap_or_default(),
        _ => field.display_value().to_string(),
    }
}

/// Case-insensitive `.jpg` suffix check. `.jpeg` is not matched.
pub fn is_jpg_path(path: &Path) -> bool {
    path.to_string_lossy().to_lowercase().ends_with(".jpg")
}

/// Projects a file path onto its "Metadata date" value.
///
/// The projector runs on the UI thread for every visible row, so the optional
/// cache keeps scrolling and re-rendering from re-reading unchanged files.
pub struct MetadataProjector<R = ExifReader> {
    reader: R,
    cache: Option<RefCell<HashMap<PathBuf, Option<String>>>>,
}

impl<R: MetadataReader> MetadataProjector<R> {
    /// A projector that reads the file on every call.
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            cache: None,
        }
    }

    /// A projector that remembers the value per path until invalidated.
    pub fn with_cache(reader: R) -> Self {
        Self {
            reader,
            cache: Some(RefCell::new(HashMap::new())),
        }
    }

    pub fn is_caching(&self) -> bool {
        self.cache.is_some()
    }

    /// Returns the verbatim `DateTime` string of a `.jpg` file, or `None`.
    ///
    /// Never fails: read and decode errors are logged and become `None`.
    pub fn project(&self, path: &Path) -> Option<String> {
        if !is_jpg_path(path) {
            return None;
        }

        if let Some(cache) = &self.cache {
            if let Some(known) = cache.borrow().get(path) {
                return known.clone();
            }
        }

        let value = self.read_date_time(path);
        if let Some(cache) = &self.cache {
            cache
                .borrow_mut()
                .insert(path.to_path_buf(), value.clone());
        }
        value
    }

    fn read_date_time(&self, path: &Path) -> Option<String> {
        match self.reader.read_tags(path) {
            Ok(tags) => {
                tracing::debug!("EXIF data for {}: {:?}", path.display(), tags);
                let date_time = tags
                    .get(&DATE_TIME_TAG)
                    .filter(|value| !value.is_empty())
                    .cloned();
                tracing::debug!("DateTime for {}: {:?}", path.display(), date_time);
                date_time
            }
            Err(e) => {
                tracing::warn!("Could not read metadata for {}: {}", path.display(), e);
                None
            }
        }
    }

    /// Forgets the cached value of one path.
    pub fn invalidate(&self, path: &Path) {
        if let Some(cache) = &self.cache {
            cache.borrow_mut().remove(path);
        }
    }

    /// Forgets every cached value.
    pub fn clear(&self) {
        if let Some(cache) = &self.cache {
            cache.borrow_mut().clear();
        }
    }
}

impl Default for MetadataProjector<ExifReader> {
    fn default() -> Self {
        Self::with_cache(ExifReader)
    }
}
