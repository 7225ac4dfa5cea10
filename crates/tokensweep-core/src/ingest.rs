//! Turning operator input (a CSV export or one typed-in entry) into
//! [`ProcessRequest`]s.

use crate::config::ColumnConfig;
use crate::error::IngestError;
use crate::types::{PrimeStatus, ProcessRequest, RowData};

/// A parsed CSV file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ingested {
    pub headers: Vec<String>,
    /// Every data row, including those dropped for a blank email.
    pub rows: Vec<RowData>,
    pub requests: Vec<ProcessRequest>,
}

/// Parse CSV text with a header row. Blank lines are skipped, cells are
/// trimmed, a blank status becomes `N/A` and a blank brand `default_brand`.
/// Rows without an email are dropped.
pub fn parse_csv(
    text: &str,
    columns: &ColumnConfig,
    default_brand: &str,
) -> Result<Ingested, IngestError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    if headers.iter().all(|h| h.is_empty()) {
        return Err(IngestError::Empty);
    }

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        if record.iter().all(|cell| cell.trim().is_empty()) {
            continue;
        }
        let row: RowData = headers
            .iter()
            .zip(record.iter())
            .map(|(h, v)| (h.clone(), v.to_string()))
            .collect();
        rows.push(row);
    }
    if rows.is_empty() {
        return Err(IngestError::Empty);
    }

    let missing: Vec<String> = [&columns.email, &columns.prime_status, &columns.brand]
        .into_iter()
        .filter(|col| !headers.contains(col))
        .map(|col| format!("\"{col}\""))
        .collect();
    if !missing.is_empty() {
        return Err(IngestError::MissingColumns {
            missing: missing.join(", "),
            found: headers.join(", "),
        });
    }

    let requests: Vec<ProcessRequest> = rows
        .iter()
        .filter_map(|row| request_from_row(row, columns, default_brand))
        .collect();
    if requests.is_empty() {
        return Err(IngestError::NoValidEntries);
    }

    tracing::debug!(
        rows = rows.len(),
        requests = requests.len(),
        "parsed csv input"
    );
    Ok(Ingested {
        headers,
        rows,
        requests,
    })
}

fn request_from_row(
    row: &RowData,
    columns: &ColumnConfig,
    default_brand: &str,
) -> Option<ProcessRequest> {
    let cell = |key: &str| row.get(key).unwrap_or_default();
    let (email, prime_status, brand) = normalize(
        cell(&columns.email),
        cell(&columns.prime_status),
        cell(&columns.brand),
        default_brand,
    )?;
    Some(ProcessRequest::new(email, prime_status, brand).with_row_data(row.clone()))
}

/// Trim the three fields and fill a blank status with `N/A` and a blank
/// brand with `default_brand`. `None` when the email is blank.
fn normalize<'a>(
    email: &'a str,
    prime_status: &'a str,
    brand: &'a str,
    default_brand: &'a str,
) -> Option<(&'a str, &'a str, &'a str)> {
    let email = email.trim();
    if email.is_empty() {
        return None;
    }
    let prime_status = match prime_status.trim() {
        "" => PrimeStatus::NotApplicable.as_str(),
        s => s,
    };
    let brand = match brand.trim() {
        "" => default_brand,
        s => s,
    };
    Some((email, prime_status, brand))
}

impl ProcessRequest {
    /// Apply the CSV row defaults to an entry submitted directly. Row data
    /// is kept as sent.
    pub fn with_defaults(self, default_brand: &str) -> Result<Self, IngestError> {
        let (email, prime_status, brand) =
            normalize(&self.email, &self.prime_status, &self.brand, default_brand)
                .ok_or(IngestError::MissingEmail)?;
        Ok(ProcessRequest::new(email, prime_status, brand)
            .with_row_data(self.original_row_data.clone()))
    }

    /// A typed-in entry. The row data is synthesized under the configured
    /// column names so exports look like a one-line CSV.
    pub fn single(
        email: &str,
        prime_status: &str,
        brand: &str,
        columns: &ColumnConfig,
    ) -> Result<Self, IngestError> {
        let email = email.trim();
        if email.is_empty() {
            return Err(IngestError::MissingEmail);
        }
        let mut row = RowData::new();
        row.insert(columns.email.as_str(), email);
        row.insert(columns.prime_status.as_str(), prime_status);
        row.insert(columns.brand.as_str(), brand);
        Ok(ProcessRequest::new(email, prime_status, brand).with_row_data(row))
    }
}
