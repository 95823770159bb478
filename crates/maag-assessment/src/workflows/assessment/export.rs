use std::io::Write;

use chrono::NaiveDate;

use super::repository::SubmissionRecord;
use super::respondent::Gender;
use super::scoring::RiskLevel;

pub const EXPORT_HEADERS: [&str; 9] = [
    "Tanggal",
    "Nama Lengkap",
    "Email",
    "Nomor Telepon",
    "Usia",
    "Jenis Kelamin",
    "Pekerjaan",
    "Skor (%)",
    "Level Risiko",
];

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("failed to write submission export: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to flush submission export: {0}")]
    Io(#[from] std::io::Error),
}

/// Admin-facing label for a risk tier.
pub const fn risk_label(level: RiskLevel) -> &'static str {
    match level {
        RiskLevel::High => "Tinggi (Berbahaya)",
        RiskLevel::Moderate => "Sedang (Waspada)",
        RiskLevel::Low => "Rendah (Stabil)",
    }
}

/// `Data_Asesmen_Maag_<yyyy-mm-dd>.csv`
pub fn export_file_name(date: NaiveDate) -> String {
    format!("Data_Asesmen_Maag_{}.csv", date.format("%Y-%m-%d"))
}

/// Write `records` as the spreadsheet export, one row per submission in the given order.
pub fn export_csv<W: Write>(records: &[SubmissionRecord], writer: W) -> Result<(), ExportError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(EXPORT_HEADERS)?;

    for record in records {
        let row = &record.submission;
        // Leading quote keeps spreadsheet apps from eating the phone's leading zero.
        let phone = if row.phone.is_empty() {
            String::new()
        } else {
            format!("'{}", row.phone)
        };

        csv_writer.write_record([
            row.created_at.format("%d/%m/%Y").to_string(),
            row.name.clone(),
            row.email.clone(),
            phone,
            row.age.to_string(),
            row.gender.map(Gender::display_name).unwrap_or_default().to_string(),
            row.occupation
                .map(|occupation| occupation.label())
                .unwrap_or_default()
                .to_string(),
            row.score.to_string(),
            risk_label(row.risk_level).to_string(),
        ])?;
    }

    csv_writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::assessment::repository::{NewSubmission, SubmissionId};
    use crate::workflows::assessment::respondent::Occupation;
    use chrono::{TimeZone, Utc};

    fn record(name: &str, phone: &str, risk_level: RiskLevel, score: u8) -> SubmissionRecord {
        SubmissionRecord {
            id: SubmissionId(7),
            submission: NewSubmission {
                name: name.to_string(),
                email: "sari@example.id".to_string(),
                phone: phone.to_string(),
                age: 27,
                gender: Some(Gender::Female),
                occupation: Some(Occupation::Healthcare),
                risk_level,
                score,
                answers: serde_json::json!({"heartburn": "Ya"}),
                created_at: Utc
                    .with_ymd_and_hms(2025, 3, 4, 8, 30, 0)
                    .single()
                    .expect("valid timestamp"),
            },
        }
    }

    fn export(records: &[SubmissionRecord]) -> String {
        let mut buffer = Vec::new();
        export_csv(records, &mut buffer).expect("export succeeds");
        String::from_utf8(buffer).expect("utf-8 output")
    }

    #[test]
    fn writes_headers_even_without_rows() {
        let output = export(&[]);
        assert_eq!(
            output.trim_end(),
            "Tanggal,Nama Lengkap,Email,Nomor Telepon,Usia,Jenis Kelamin,Pekerjaan,Skor (%),Level Risiko"
        );
    }

    #[test]
    fn maps_labels_and_dates() {
        let output = export(&[record("Sari Wulandari", "081234567890", RiskLevel::High, 95)]);
        let row = output.lines().nth(1).expect("one data row");

        assert_eq!(
            row,
            "04/03/2025,Sari Wulandari,sari@example.id,'081234567890,27,Perempuan,healthcare,95,Tinggi (Berbahaya)"
        );
    }

    #[test]
    fn quotes_names_containing_commas() {
        let output = export(&[record("Wulandari, Sari", "", RiskLevel::Moderate, 40)]);
        let row = output.lines().nth(1).expect("one data row");

        assert!(row.contains("\"Wulandari, Sari\""), "{row}");
        assert!(row.ends_with(",40,Sedang (Waspada)"), "{row}");
    }

    #[test]
    fn names_the_file_after_the_export_date() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 4).expect("valid date");
        assert_eq!(export_file_name(date), "Data_Asesmen_Maag_2025-03-04.csv");
    }
}
