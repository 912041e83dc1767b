use std::io::Write;
use std::path::Path;
use tracing::info;

use crate::models::{ContactRecord, Result};

const SINGLE_HEADERS: [&str; 6] = [
    "Website",
    "Email",
    "Phone",
    "Facebook",
    "Instagram",
    "LinkedIn",
];

const BATCH_HEADERS: [&str; 6] = [
    "url",
    "emails",
    "phones",
    "facebook",
    "instagram",
    "linkedin",
];

/// Single-URL report: capitalized headers, one row.
pub fn write_single_report(path: &Path, record: &ContactRecord) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(SINGLE_HEADERS)?;
    writer.write_record(record_row(record))?;
    writer.flush()?;
    info!("Results saved to {}", path.display());
    Ok(())
}

/// Batch report: one row per target, in target order.
pub fn write_batch_report(path: &Path, records: &[ContactRecord]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    write_batch(&mut writer, records)?;
    writer.flush()?;
    info!("Results saved to {}", path.display());
    Ok(())
}

/// The batch layout rendered to a string, for handing straight back over
/// HTTP without touching disk twice.
pub fn batch_report_string(records: &[ContactRecord]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    write_batch(&mut writer, records)?;
    into_string(writer)
}

/// Single-URL layout rendered to a string.
pub fn single_report_string(record: &ContactRecord) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(SINGLE_HEADERS)?;
    writer.write_record(record_row(record))?;
    into_string(writer)
}

fn into_string(writer: csv::Writer<Vec<u8>>) -> Result<String> {
    let bytes = writer.into_inner().map_err(|e| e.to_string())?;
    Ok(String::from_utf8(bytes)?)
}

fn write_batch<W: Write>(writer: &mut csv::Writer<W>, records: &[ContactRecord]) -> csv::Result<()> {
    writer.write_record(BATCH_HEADERS)?;
    for record in records {
        writer.write_record(record_row(record))?;
    }
    Ok(())
}

fn record_row(record: &ContactRecord) -> [String; 6] {
    [
        record.target.clone(),
        record.joined_emails(),
        record.joined_phones(),
        record.facebook.clone(),
        record.instagram.clone(),
        record.linkedin.clone(),
    ]
}
