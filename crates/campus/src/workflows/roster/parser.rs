use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer};
use std::io::Read;

/// One raw row of a registrar roster export, prior to validation.
#[derive(Debug, Deserialize)]
pub(crate) struct RosterRow {
    #[serde(rename = "Full Name")]
    pub(crate) full_name: String,
    #[serde(rename = "Email")]
    pub(crate) email: String,
    #[serde(rename = "Phone", default)]
    pub(crate) phone: String,
    #[serde(rename = "Program")]
    pub(crate) program: String,
    #[serde(rename = "Percentage")]
    pub(crate) percentage: String,
    #[serde(rename = "Hostel", default, deserialize_with = "empty_string_as_none")]
    pub(crate) hostel: Option<String>,
    #[serde(
        rename = "Submitted At",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    pub(crate) submitted_at: Option<String>,
}

impl RosterRow {
    pub(crate) fn hostel_required(&self) -> bool {
        self.hostel
            .as_deref()
            .map(|value| {
                matches!(
                    value.trim().to_ascii_lowercase().as_str(),
                    "yes" | "true" | "1"
                )
            })
            .unwrap_or(false)
    }

    pub(crate) fn submission_time(&self) -> Option<DateTime<Utc>> {
        self.submitted_at
            .as_deref()
            .and_then(parse_datetime)
            .map(|naive| naive.and_utc())
    }
}

pub(crate) fn parse_rows<R: Read>(reader: R) -> Result<Vec<RosterRow>, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    csv_reader.deserialize::<RosterRow>().collect()
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

fn parse_datetime(value: &str) -> Option<NaiveDateTime> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.naive_utc());
    }

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0);
    }

    None
}

#[cfg(test)]
pub(crate) fn parse_datetime_for_tests(value: &str) -> Option<NaiveDateTime> {
    parse_datetime(value)
}
