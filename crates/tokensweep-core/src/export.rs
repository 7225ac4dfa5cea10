//! Result table and CSV download.

use chrono::NaiveDate;

use crate::error::Result;
use crate::types::ProcessedItem;

pub const TASK_STATUS_COLUMN: &str = "Task Status";
pub const TASK_MESSAGE_COLUMN: &str = "Task Message";
pub const EMAIL_FALLBACK_COLUMN: &str = "Email (Processed)";
pub const STATUS_FALLBACK_COLUMN: &str = "Prime Status (Processed)";
pub const BRAND_FALLBACK_COLUMN: &str = "Brand (Processed)";
pub const DEFAULT_PER_PAGE: usize = 10;

/// Column headers for a result set: the first item's original columns, or
/// the processed-field fallbacks when it has none, followed by the two
/// outcome columns.
pub fn table_headers(items: &[ProcessedItem]) -> Vec<String> {
    let Some(first) = items.first() else {
        return Vec::new();
    };

    if first.request.original_row_data.is_empty() {
        let req = &first.request;
        let fallbacks = [
            (EMAIL_FALLBACK_COLUMN, &req.email),
            (STATUS_FALLBACK_COLUMN, &req.prime_status),
            (BRAND_FALLBACK_COLUMN, &req.brand),
        ]
        .into_iter()
        .filter(|(_, value)| !value.is_empty())
        .map(|(name, _)| name.to_string())
        .collect();
        with_outcome_columns(fallbacks)
    } else {
        export_headers(first)
    }
}

/// CSV download headers: the item's original columns plus the outcome
/// columns, with no processed-field fallbacks.
fn export_headers(item: &ProcessedItem) -> Vec<String> {
    with_outcome_columns(
        item.request
            .original_row_data
            .keys()
            .map(str::to_string)
            .collect(),
    )
}

fn with_outcome_columns(mut headers: Vec<String>) -> Vec<String> {
    for col in [TASK_STATUS_COLUMN, TASK_MESSAGE_COLUMN] {
        if !headers.iter().any(|h| h == col) {
            headers.push(col.to_string());
        }
    }
    headers
}

/// The display value of `header` for one item. Unknown headers are blank.
pub fn cell_value<'a>(item: &'a ProcessedItem, header: &str) -> &'a str {
    match header {
        TASK_STATUS_COLUMN => item.task_status.as_str(),
        TASK_MESSAGE_COLUMN => item.processed_message.as_str(),
        _ => {
            if let Some(v) = item.request.original_row_data.get(header) {
                return v;
            }
            match header {
                EMAIL_FALLBACK_COLUMN => item.request.email.as_str(),
                STATUS_FALLBACK_COLUMN => item.request.prime_status.as_str(),
                BRAND_FALLBACK_COLUMN => item.request.brand.as_str(),
                _ => "",
            }
        }
    }
}

pub fn table_rows(items: &[ProcessedItem], headers: &[String]) -> Vec<Vec<String>> {
    items
        .iter()
        .map(|item| {
            headers
                .iter()
                .map(|h| cell_value(item, h).to_string())
                .collect()
        })
        .collect()
}

/// Render results as CSV: original row data plus the two outcome columns.
/// Empty input renders as an empty string.
pub fn to_csv(items: &[ProcessedItem]) -> Result<String> {
    if items.is_empty() {
        return Ok(String::new());
    }

    let headers = export_headers(&items[0]);

    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::CRLF)
        .from_writer(Vec::new());
    writer.write_record(&headers)?;
    for item in items {
        let record: Vec<&str> = headers.iter().map(|h| cell_value(item, h)).collect();
        writer.write_record(&record)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| std::io::Error::other(e.to_string()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

pub fn default_export_filename(date: NaiveDate) -> String {
    format!("processed_feedback_{}.csv", date.format("%Y-%m-%d"))
}

// ---------------------------------------------------------------------------
// Pagination
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page<'a, T> {
    pub items: &'a [T],
    /// 1-based.
    pub page: usize,
    pub total_pages: usize,
    /// 1-based index of the first item shown, 0 when the page is empty.
    pub first: usize,
    pub last: usize,
    pub total: usize,
}

/// Slice out page `page` (1-based). Out-of-range pages are empty.
pub fn paginate<T>(items: &[T], page: usize, per_page: usize) -> Page<'_, T> {
    let per_page = per_page.max(1);
    let total_pages = items.len().div_ceil(per_page);
    let start = page.saturating_sub(1).saturating_mul(per_page);

    let slice = if page == 0 || start >= items.len() {
        &items[0..0]
    } else {
        &items[start..(start + per_page).min(items.len())]
    };
    let (first, last) = if slice.is_empty() {
        (0, 0)
    } else {
        (start + 1, start + slice.len())
    };

    Page {
        items: slice,
        page,
        total_pages,
        first,
        last,
        total: items.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ProcessRequest, RowData, TaskStatus};

    fn item(email: &str, row: &[(&str, &str)], status: TaskStatus, msg: &str) -> ProcessedItem {
        let row: RowData = row
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ProcessedItem {
            request: ProcessRequest::new(email, "ACTIVATED", "ED").with_row_data(row),
            task_status: status,
            processed_message: msg.to_string(),
        }
    }

    #[test]
    fn headers_from_row_data() {
        let items = vec![item(
            "a@b.com",
            &[("Email", "a@b.com"), ("Notes", "vip")],
            TaskStatus::Disabled,
            "1 Payment instrument token(s) disabled.",
        )];
        assert_eq!(
            table_headers(&items),
            vec!["Email", "Notes", "Task Status", "Task Message"]
        );
    }

    #[test]
    fn headers_fall_back_to_processed_fields() {
        let items = vec![item("a@b.com", &[], TaskStatus::NoMembershipFound, "none")];
        let headers = table_headers(&items);
        assert_eq!(
            headers,
            vec![
                "Email (Processed)",
                "Prime Status (Processed)",
                "Brand (Processed)",
                "Task Status",
                "Task Message"
            ]
        );
        let rows = table_rows(&items, &headers);
        assert_eq!(rows[0], vec!["a@b.com", "ACTIVATED", "ED", "No Membership Found", "none"]);
    }

    #[test]
    fn outcome_columns_are_not_duplicated() {
        let items = vec![item(
            "a@b.com",
            &[("Email", "a@b.com"), ("Task Status", "old")],
            TaskStatus::Disabled,
            "done",
        )];
        assert_eq!(
            table_headers(&items),
            vec!["Email", "Task Status", "Task Message"]
        );
        let csv = to_csv(&items).unwrap();
        assert_eq!(csv, "Email,Task Status,Task Message\r\na@b.com,DISABLED,done\r\n");
    }

    #[test]
    fn csv_quotes_and_fills_missing_cells() {
        let items = vec![
            item(
                "a@b.com",
                &[("VIP Comms: \nCustomer's email", "a@b.com"), ("Brand", "ED")],
                TaskStatus::PartialSuccess,
                "1 token(s) disabled, 1 failed.",
            ),
            item("c@d.com", &[("VIP Comms: \nCustomer's email", "c@d.com")], TaskStatus::ProcessingError, "boom"),
        ];
        let csv = to_csv(&items).unwrap();
        assert_eq!(
            csv,
            "\"VIP Comms: \nCustomer's email\",Brand,Task Status,Task Message\r\n\
             a@b.com,ED,Partial Success,\"1 token(s) disabled, 1 failed.\"\r\n\
             c@d.com,,Processing Error,boom\r\n"
        );
    }

    #[test]
    fn csv_headers_match_table_headers_for_row_data() {
        let items = vec![item(
            "a@b.com",
            &[("Email", "a@b.com"), ("Notes", "vip")],
            TaskStatus::Disabled,
            "ok",
        )];
        let csv = to_csv(&items).unwrap();
        let first_line = csv.split("\r\n").next().unwrap();
        assert_eq!(first_line, table_headers(&items).join(","));
    }

    #[test]
    fn csv_without_row_data_has_only_outcome_columns() {
        let items = vec![item("a@b.com", &[], TaskStatus::NoMembershipFound, "none")];
        assert_eq!(
            to_csv(&items).unwrap(),
            "Task Status,Task Message\r\nNo Membership Found,none\r\n"
        );
    }

    #[test]
    fn empty_export() {
        assert_eq!(to_csv(&[]).unwrap(), "");
        assert!(table_headers(&[]).is_empty());
    }

    #[test]
    fn export_filename() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();
        assert_eq!(default_export_filename(date), "processed_feedback_2024-03-07.csv");
    }

    #[test]
    fn pagination() {
        let items: Vec<u32> = (1..=23).collect();

        let p1 = paginate(&items, 1, DEFAULT_PER_PAGE);
        assert_eq!(p1.items, &items[0..10]);
        assert_eq!(p1.total_pages, 3);
        assert_eq!((p1.first, p1.last, p1.total), (1, 10, 23));

        let p3 = paginate(&items, 3, DEFAULT_PER_PAGE);
        assert_eq!(p3.items, &[21, 22, 23]);
        assert_eq!((p3.first, p3.last), (21, 23));

        assert!(paginate(&items, 4, DEFAULT_PER_PAGE).items.is_empty());
        assert!(paginate(&items, 0, DEFAULT_PER_PAGE).items.is_empty());
        assert_eq!(paginate::<u32>(&[], 1, DEFAULT_PER_PAGE).total_pages, 0);
    }
}
