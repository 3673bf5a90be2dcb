//! The five listing columns and the pull-based cell value provider.

use super::metadata::{MetadataProjector, MetadataReader};
use super::{Entry, EntryAttributes, FileSystem};
use crate::utils::format::{format_modified, format_size};
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Column {
    Name,
    Size,
    Type,
    Modified,
    MetadataDate,
}

impl Column {
    /// All columns in display order.
    pub const ALL: [Column; 5] = [
        Column::Name,
        Column::Size,
        Column::Type,
        Column::Modified,
        Column::MetadataDate,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Column> {
        Self::ALL.get(index).copied()
    }

    pub fn label(self) -> &'static str {
        match self {
            Column::Name => "Name",
            Column::Size => "Size",
            Column::Type => "Type",
            Column::Modified => "Modified",
            Column::MetadataDate => "Metadata date",
        }
    }
}

/// Header labels in display order.
pub fn header_labels() -> Vec<String> {
    Column::ALL.iter().map(|c| c.label().to_string()).collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

/// The column the rows of every directory level are ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SortOrder {
    pub column: Column,
    pub direction: SortDirection,
}

impl Default for SortOrder {
    fn default() -> Self {
        Self {
            column: Column::Name,
            direction: SortDirection::Ascending,
        }
    }
}

impl SortOrder {
    /// A header click: the same column flips direction, another one starts ascending.
    pub fn clicked(self, column: Column) -> Self {
        let direction = match (self.column == column, self.direction) {
            (true, SortDirection::Ascending) => SortDirection::Descending,
            _ => SortDirection::Ascending,
        };
        Self { column, direction }
    }

    /// Directories stay ahead of files in both directions. Equal keys compare
    /// as equal so a stable sort keeps the listing's name order.
    pub fn compare(&self, a: (&Entry, &SortKey), b: (&Entry, &SortKey)) -> Ordering {
        match (a.0.is_dir(), b.0.is_dir()) {
            (true, false) => Ordering::Less,
            (false, true) => Ordering::Greater,
            _ => {
                let ordering = a.1.cmp(b.1);
                match self.direction {
                    SortDirection::Ascending => ordering,
                    SortDirection::Descending => ordering.reverse(),
                }
            }
        }
    }
}

/// The raw value a row is ordered by. Rows without a value sort first.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum SortKey {
    Missing,
    Bytes(u64),
    Time(DateTime<Local>),
    Text(String),
}

/// Answers "what is shown in this cell" for the view.
///
/// The first four columns pass filesystem attributes through; the last one is
/// served by the metadata projector and stays empty for directories.
pub struct CellValueProvider<'a, F, R> {
    fs: &'a F,
    projector: &'a MetadataProjector<R>,
}

impl<'a, F: FileSystem, R: MetadataReader> CellValueProvider<'a, F, R> {
    pub fn new(fs: &'a F, projector: &'a MetadataProjector<R>) -> Self {
        Self { fs, projector }
    }

    /// The value of a single cell.
    pub fn cell_value(&self, entry: &Entry, column: Column) -> String {
        match column {
            Column::MetadataDate => self.metadata_cell(entry),
            _ => self
                .attributes(entry)
                .map(|attrs| attribute_cell(&attrs, column))
                .unwrap_or_default(),
        }
    }

    /// All five cells of a row; the attributes are read once.
    pub fn row_values(&self, entry: &Entry) -> Vec<String> {
        self.row_with_sort_key(entry, Column::Name).0
    }

    /// The cells of a row and its key under `sort_by`, from a single read of
    /// the attributes and the metadata.
    pub fn row_with_sort_key(&self, entry: &Entry, sort_by: Column) -> (Vec<String>, SortKey) {
        let attrs = self.attributes(entry);
        let metadata = self.metadata_value(entry);

        let cells = Column::ALL
            .iter()
            .map(|&column| match column {
                Column::MetadataDate => metadata.clone().unwrap_or_default(),
                _ => attrs
                    .as_ref()
                    .map(|attrs| attribute_cell(attrs, column))
                    .unwrap_or_default(),
            })
            .collect();

        (cells, sort_key(attrs.as_ref(), metadata, sort_by))
    }

    fn metadata_cell(&self, entry: &Entry) -> String {
        self.metadata_value(entry).unwrap_or_default()
    }

    fn metadata_value(&self, entry: &Entry) -> Option<String> {
        if entry.is_dir() {
            return None;
        }
        self.projector.project(&entry.path)
    }

    fn attributes(&self, entry: &Entry) -> Option<EntryAttributes> {
        match self.fs.attributes(entry) {
            Ok(attrs) => Some(attrs),
            Err(e) => {
                tracing::debug!("No attributes for {}: {}", entry.path.display(), e);
                None
            }
        }
    }
}

fn attribute_cell(attrs: &EntryAttributes, column: Column) -> String {
    match column {
        Column::Name => attrs.name.clone(),
        Column::Size => attrs.size.map(format_size).unwrap_or_default(),
        Column::Type => attrs.type_label.clone(),
        Column::Modified => attrs.modified.as_ref().map(format_modified).unwrap_or_default(),
        Column::MetadataDate => String::new(),
    }
}

fn sort_key(attrs: Option<&EntryAttributes>, metadata: Option<String>, column: Column) -> SortKey {
    let key = match column {
        Column::Name => attrs.map(|a| SortKey::Text(a.name.to_lowercase())),
        Column::Size => attrs.and_then(|a| a.size).map(SortKey::Bytes),
        Column::Type => attrs.map(|a| SortKey::Text(a.type_label.to_lowercase())),
        Column::Modified => attrs.and_then(|a| a.modified).map(SortKey::Time),
        Column::MetadataDate => metadata.map(SortKey::Text),
    };
    key.unwrap_or(SortKey::Missing)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::test_helpers::jpeg_with_date_time;
    use crate::core::{EntryKind, ExifReader, LocalFileSystem};
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_header_has_five_fixed_labels() {
        assert_eq!(
            header_labels(),
            vec!["Name", "Size", "Type", "Modified", "Metadata date"]
        );
        assert_eq!(Column::from_index(4), Some(Column::MetadataDate));
        assert_eq!(Column::from_index(5), None);
        assert_eq!(Column::Modified.index(), 3);
    }

    #[test]
    fn test_row_values_for_jpg_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("holiday.jpg");
        fs::write(&path, jpeg_with_date_time("2023:01:01 10:00:00")).unwrap();

        let fs = LocalFileSystem::default();
        let projector = MetadataProjector::new(ExifReader);
        let provider = CellValueProvider::new(&fs, &projector);
        let row = provider.row_values(&Entry::new(&path, EntryKind::File));

        assert_eq!(row.len(), 5);
        assert_eq!(row[0], "holiday.jpg");
        assert!(row[1].ends_with("bytes"));
        assert_eq!(row[2], "jpg File");
        assert!(!row[3].is_empty());
        assert_eq!(row[4], "2023:01:01 10:00:00");
    }

    #[test]
    fn test_directory_has_empty_size_and_metadata() {
        let dir = tempdir().unwrap();
        // A directory named like a JPEG must still not be projected.
        let sub = dir.path().join("album.jpg");
        fs::create_dir(&sub).unwrap();

        let fs = LocalFileSystem::default();
        let projector = MetadataProjector::new(ExifReader);
        let provider = CellValueProvider::new(&fs, &projector);
        let entry = Entry::new(&sub, EntryKind::Directory);

        assert_eq!(provider.cell_value(&entry, Column::MetadataDate), "");
        assert_eq!(provider.cell_value(&entry, Column::Size), "");
        assert_eq!(provider.cell_value(&entry, Column::Type), "Folder");
    }

    #[test]
    fn test_stale_entry_renders_empty_cells() {
        let dir = tempdir().unwrap();
        let gone = Entry::new(dir.path().join("gone.jpg"), EntryKind::File);

        let fs = LocalFileSystem::default();
        let projector = MetadataProjector::new(ExifReader);
        let provider = CellValueProvider::new(&fs, &projector);

        assert!(provider.row_values(&gone).iter().all(String::is_empty));
    }

    #[test]
    fn test_header_click_cycles_direction() {
        let order = SortOrder::default();
        assert_eq!(order.column, Column::Name);
        assert_eq!(order.direction, SortDirection::Ascending);

        let order = order.clicked(Column::Name);
        assert_eq!(order.direction, SortDirection::Descending);

        let order = order.clicked(Column::Size);
        assert_eq!(order.column, Column::Size);
        assert_eq!(order.direction, SortDirection::Ascending);
    }

    #[test]
    fn test_size_sorts_by_byte_count() {
        let dir = tempdir().unwrap();
        let small = dir.path().join("small.png");
        let large = dir.path().join("large.png");
        fs::write(&small, vec![0u8; 900]).unwrap();
        fs::write(&large, vec![0u8; 2000]).unwrap();

        let fs = LocalFileSystem::default();
        let projector = MetadataProjector::new(ExifReader);
        let provider = CellValueProvider::new(&fs, &projector);
        let (small_cells, small_key) =
            provider.row_with_sort_key(&Entry::new(&small, EntryKind::File), Column::Size);
        let (large_cells, large_key) =
            provider.row_with_sort_key(&Entry::new(&large, EntryKind::File), Column::Size);

        // As text "1.95 KiB" would come before "900 bytes".
        assert!(large_cells[1] < small_cells[1]);
        assert!(small_key < large_key);
    }

    #[test]
    fn test_directories_lead_in_both_directions() {
        let folder = Entry::new("/p/zzz", EntryKind::Directory);
        let file = Entry::new("/p/aaa.jpg", EntryKind::File);
        let key = SortKey::Missing;
        let text = SortKey::Text("2020:01:01 00:00:00".to_string());

        for direction in [SortDirection::Ascending, SortDirection::Descending] {
            let order = SortOrder {
                column: Column::MetadataDate,
                direction,
            };
            assert_eq!(order.compare((&folder, &key), (&file, &text)), Ordering::Less);
        }
    }

    #[test]
    fn test_missing_values_sort_first_ascending() {
        let order = SortOrder {
            column: Column::MetadataDate,
            direction: SortDirection::Ascending,
        };
        let a = Entry::new("/p/a.jpg", EntryKind::File);
        let b = Entry::new("/p/b.jpg", EntryKind::File);
        let dated = SortKey::Text("2020:01:01 00:00:00".to_string());

        assert_eq!(order.compare((&a, &SortKey::Missing), (&b, &dated)), Ordering::Less);
        assert_eq!(
            order
                .clicked(Column::MetadataDate)
                .compare((&a, &SortKey::Missing), (&b, &dated)),
            Ordering::Greater
        );
    }
}
