use crate::domain::model::PostRecord;
use crate::utils::error::{Result, ScrapeError};

pub fn render(records: &[PostRecord]) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(PostRecord::FIELD_LABELS)?;

    for record in records {
        writer.write_record([
            record.author_name.clone(),
            record.author_tier.as_str().to_string(),
            record.body_text.clone(),
            record.published_at.clone(),
            record.repost_count.to_string(),
            record.comment_count.to_string(),
            record.like_count.to_string(),
            record.image_cell(),
        ])?;
    }

    writer.into_inner().map_err(|e| ScrapeError::ProcessingError {
        message: format!("Failed to flush CSV writer: {}", e),
    })
}
