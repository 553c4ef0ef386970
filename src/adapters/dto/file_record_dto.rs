use sqlx::{postgres::PgRow, FromRow, Row};

use crate::application::dto::file_record_dto::FileRecordDTO;

impl FromRow<'_, PgRow> for FileRecordDTO {
    fn from_row(row: &PgRow) -> Result<Self, sqlx::Error> {
        let index: i64 = row.try_get("file_index")?;

        Ok(FileRecordDTO {
            id: Some(row.try_get("id")?),
            filename: Some(row.try_get("filename")?),
            index: Some(index.max(0) as u64),
            upload_date: Some(row.try_get("upload_date")?),
        })
    }
}
