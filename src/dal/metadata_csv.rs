use std::path::Path;

use crate::domain::metadata::{MetadataTable, TABLE_HEADER};

/// Writes `table` as CSV with a `category,details,title` header and no index
/// column. An empty table still gets its header.
pub fn write_table(path: &Path, table: &MetadataTable) -> Result<(), csv::Error> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)?;

    writer.write_record(TABLE_HEADER)?;
    for record in table.records() {
        writer.serialize(record)?;
    }
    writer.flush()?;

    Ok(())
}
