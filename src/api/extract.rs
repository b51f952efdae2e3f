//! Request parsing shared by every handler. Nothing here touches the database,
//! so all of it runs before identity resolution.

use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{de::DeserializeOwned, Deserialize};

use crate::error::ApiError;

/// `Json<T>` whose rejections render as 400 in the API's error envelope
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(JsonBody(value)),
            Err(rejection) => Err(json_rejection(rejection)),
        }
    }
}

fn json_rejection(rejection: JsonRejection) -> ApiError {
    match rejection {
        JsonRejection::MissingJsonContentType(_) => {
            ApiError::bad_request("Expected request with `Content-Type: application/json`")
        }
        JsonRejection::JsonSyntaxError(_) => ApiError::bad_request("Malformed JSON body"),
        other => ApiError::bad_request(other.body_text()),
    }
}

/// Positive integer id, digits only
pub fn parse_id(name: &str, raw: &str) -> Result<i32, ApiError> {
    let invalid = || ApiError::bad_request(format!("Invalid {}", name));
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    match raw.parse::<i32>() {
        Ok(id) if id >= 1 => Ok(id),
        _ => Err(invalid()),
    }
}

/// Id supplied in a JSON body, as a number or a digit string
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum IdInput {
    Number(i64),
    Text(String),
}

impl IdInput {
    pub fn parse(&self, name: &str) -> Result<i32, ApiError> {
        match self {
            IdInput::Number(n) if *n >= 1 && *n <= i64::from(i32::MAX) => Ok(*n as i32),
            IdInput::Number(_) => Err(ApiError::bad_request(format!("Invalid {}", name))),
            IdInput::Text(s) => parse_id(name, s),
        }
    }
}

/// Free-form quantity supplied as a JSON string or number (`"120ml"`, `120`)
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum TextOrNumber {
    Number(serde_json::Number),
    Text(String),
}

impl TextOrNumber {
    pub fn into_text(self) -> String {
        match self {
            TextOrNumber::Number(n) => n.to_string(),
            TextOrNumber::Text(s) => s,
        }
    }
}

/// Whether a required body field counts as supplied
pub trait Present {
    fn is_present(&self) -> bool;
}

impl Present for Option<String> {
    fn is_present(&self) -> bool {
        self.as_deref().map_or(false, |s| !s.trim().is_empty())
    }
}

impl Present for Option<f64> {
    fn is_present(&self) -> bool {
        self.is_some()
    }
}

impl Present for Option<IdInput> {
    fn is_present(&self) -> bool {
        match self {
            Some(IdInput::Text(s)) => !s.trim().is_empty(),
            Some(IdInput::Number(_)) => true,
            None => false,
        }
    }
}

impl Present for Option<Vec<IdInput>> {
    fn is_present(&self) -> bool {
        self.as_ref().map_or(false, |ids| !ids.is_empty())
    }
}

/// 400 naming every absent field, in the order given
pub fn require(fields: &[(&'static str, &dyn Present)]) -> Result<(), ApiError> {
    let missing: Vec<&str> = fields
        .iter()
        .filter(|(_, value)| !value.is_present())
        .map(|(name, _)| *name)
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(ApiError::missing_fields(&missing))
    }
}

/// Trimmed text, `None` when blank
pub fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Value of a field already checked by [`require`]
pub fn required_text(value: Option<String>) -> String {
    non_blank(value).unwrap_or_default()
}

/// `YYYY-MM-DD`
pub fn parse_date(name: &str, raw: &str) -> Result<NaiveDate, ApiError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| ApiError::bad_request(format!("Invalid {}", name)))
}

pub fn parse_optional_date(name: &str, raw: Option<&str>) -> Result<Option<NaiveDate>, ApiError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        Some(s) => parse_date(name, s).map(Some),
        None => Ok(None),
    }
}

/// `HH:MM:SS` or `HH:MM`
pub fn parse_time(name: &str, raw: &str) -> Result<NaiveTime, ApiError> {
    let raw = raw.trim();
    NaiveTime::parse_from_str(raw, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M"))
        .map_err(|_| ApiError::bad_request(format!("Invalid {}", name)))
}

/// ISO-8601 local timestamp (`T` or space separated, seconds optional) or RFC 3339,
/// the latter normalized to UTC
pub fn parse_timestamp(name: &str, raw: &str) -> Result<NaiveDateTime, ApiError> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.naive_utc());
    }
    const FORMATS: [&str; 4] = [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%d %H:%M",
    ];
    FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .ok_or_else(|| ApiError::bad_request(format!("Invalid {}", name)))
}

/// Optional integer query parameter with a default and inclusive bounds
pub fn parse_bounded(name: &str, raw: Option<&str>, default: i64, min: i64, max: i64) -> Result<i64, ApiError> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(default);
    };
    match raw.parse::<i64>() {
        Ok(n) if (min..=max).contains(&n) => Ok(n),
        _ => Err(ApiError::bad_request(format!(
            "Invalid {}: expected an integer between {} and {}",
            name, min, max
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_must_be_positive_digits() {
        assert_eq!(parse_id("babyId", "42"), Ok(42));
        for bad in ["", "0", "-1", "abc", "1.5", " 1", "99999999999"] {
            assert_eq!(parse_id("babyId", bad), Err(ApiError::bad_request("Invalid babyId")), "{bad}");
        }
    }

    #[test]
    fn quantities_accept_numbers_and_strings() {
        let parsed: Vec<TextOrNumber> = serde_json::from_str(r#"[120, 7.5, "120ml"]"#).unwrap();
        let texts: Vec<String> = parsed.into_iter().map(TextOrNumber::into_text).collect();
        assert_eq!(texts, vec!["120", "7.5", "120ml"]);
    }

    #[test]
    fn body_ids_accept_numbers_and_strings() {
        assert_eq!(IdInput::Number(10).parse("reminderId"), Ok(10));
        assert_eq!(IdInput::Text("11".into()).parse("reminderId"), Ok(11));
        assert!(IdInput::Number(0).parse("reminderId").is_err());
        assert!(IdInput::Text("x".into()).parse("reminderId").is_err());
        // Same digits-only rule as path segments
        for padded in [" 10", "10 ", "+10"] {
            assert_eq!(
                IdInput::Text(padded.into()).parse("reminderId"),
                Err(ApiError::bad_request("Invalid reminderId")),
                "{padded}"
            );
        }
    }

    #[test]
    fn require_lists_missing_fields_in_order() {
        let date: Option<String> = None;
        let time: Option<String> = Some("  ".into());
        let meal: Option<String> = Some("Lunch".into());
        let err = require(&[("date", &date), ("time", &time), ("meal", &meal)]).unwrap_err();
        assert_eq!(err.message(), "Missing required fields: date, time");
    }

    #[test]
    fn times_are_normalized() {
        let t = parse_time("time", "08:30").unwrap();
        assert_eq!(t.format("%H:%M:%S").to_string(), "08:30:00");
        assert!(parse_time("time", "8.30am").is_err());
    }

    #[test]
    fn timestamps_accept_common_shapes() {
        let expected = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap().and_hms_opt(9, 15, 0).unwrap();
        assert_eq!(parse_timestamp("timestamp", "2024-01-02T09:15:00").unwrap(), expected);
        assert_eq!(parse_timestamp("timestamp", "2024-01-02 09:15").unwrap(), expected);
        assert_eq!(parse_timestamp("timestamp", "2024-01-02T10:15:00+01:00").unwrap(), expected);
        assert!(parse_timestamp("timestamp", "yesterday").is_err());
    }

    #[test]
    fn bounded_defaults_and_limits() {
        assert_eq!(parse_bounded("days", None, 7, 1, 365), Ok(7));
        assert_eq!(parse_bounded("days", Some("30"), 7, 1, 365), Ok(30));
        assert!(parse_bounded("days", Some("0"), 7, 1, 365).is_err());
        assert!(parse_bounded("days", Some("abc"), 7, 1, 365).is_err());
    }
}
