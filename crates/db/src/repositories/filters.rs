//! Query documents shared by the repositories.

use chrono::NaiveDate;
use hornero_core::debt::DebtFilter;
use mongodb::bson::{DateTime as BsonDateTime, Document, doc};

/// Matches a document by its string id.
pub fn id_filter(id: impl ToString) -> Document {
    doc! { "_id": id.to_string() }
}

/// Inclusive range over a `YYYY-MM-DD` field.
pub fn date_range(field: &str, from: NaiveDate, to: NaiveDate) -> Document {
    let mut filter = Document::new();
    filter.insert(field, doc! { "$gte": from.to_string(), "$lte": to.to_string() });
    filter
}

/// Translates a debt listing filter.
pub fn debt_filter(filter: &DebtFilter) -> Document {
    let mut query = Document::new();
    if let Some(status) = filter.status {
        query.insert("status", status.as_str());
    }
    if let Some(employee_id) = filter.employee_id {
        query.insert("employee_id", employee_id.to_string());
    }

    let mut created = Document::new();
    if let Some(from) = filter.created_from {
        created.insert("$gte", BsonDateTime::from_chrono(from));
    }
    if let Some(to) = filter.created_to {
        created.insert("$lte", BsonDateTime::from_chrono(to));
    }
    if !created.is_empty() {
        query.insert("created_at", created);
    }
    query
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use hornero_core::debt::DebtStatus;
    use hornero_shared::types::EmployeeId;

    use super::*;

    #[test]
    fn test_date_range_uses_day_strings() {
        let from = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let to = NaiveDate::from_ymd_opt(2024, 3, 31).unwrap();
        assert_eq!(
            date_range("date", from, to),
            doc! { "date": { "$gte": "2024-03-01", "$lte": "2024-03-31" } }
        );
    }

    #[test]
    fn test_empty_debt_filter_matches_everything() {
        assert!(debt_filter(&DebtFilter::default()).is_empty());
    }

    #[test]
    fn test_debt_filter_combines_criteria() {
        let employee = EmployeeId::new();
        let from = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        let filter = DebtFilter {
            status: Some(DebtStatus::Pending),
            employee_id: Some(employee),
            created_from: Some(from),
            created_to: None,
        };

        assert_eq!(
            debt_filter(&filter),
            doc! {
                "status": "pending",
                "employee_id": employee.to_string(),
                "created_at": { "$gte": BsonDateTime::from_chrono(from) },
            }
        );
    }
}
