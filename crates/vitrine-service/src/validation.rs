use chrono::NaiveDateTime;
use thiserror::Error;
use url::Url;

#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("{0} cannot be empty")]
    EmptyField(&'static str),
    #[error("Malformed link: {0}")]
    MalformedLink(String),
    #[error("Unsupported link scheme: {0}")]
    UnsupportedScheme(String),
    #[error("Link must have a host")]
    MissingHost,
    #[error("Invalid email address: {0}")]
    InvalidEmail(String),
    #[error("End date cannot precede start date")]
    EndBeforeStart,
}

/// Trims a required display field, rejecting blank input.
pub fn require_text(field: &'static str, value: &str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyField(field));
    }
    Ok(trimmed.to_string())
}

/// Validates an outbound link. Listings carry plain URLs to external
/// pages (ticket shops, venue sites, image hosts); only http(s) with a
/// non-empty host is accepted, and the parsed form is rendered back so
/// stored links are consistently normalized.
pub fn validate_link(link: &str) -> Result<String, ValidationError> {
    let trimmed = link.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyField("link"));
    }

    let url = Url::parse(trimmed).map_err(|_| ValidationError::MalformedLink(trimmed.into()))?;

    match url.scheme() {
        "http" | "https" => {}
        scheme => return Err(ValidationError::UnsupportedScheme(scheme.to_string())),
    }

    if url.host_str().is_none_or(str::is_empty) {
        return Err(ValidationError::MissingHost);
    }

    Ok(url.to_string())
}

/// Optional links are dropped when blank instead of rejected.
pub fn validate_optional_link(link: Option<String>) -> Result<Option<String>, ValidationError> {
    match link {
        Some(value) if !value.trim().is_empty() => validate_link(&value).map(Some),
        _ => Ok(None),
    }
}

/// Shallow shape check, not RFC 5322: one `@`, non-empty local part,
/// dotted domain. Deliverability is the provider's problem.
pub fn validate_email(email: &str) -> Result<String, ValidationError> {
    let trimmed = email.trim();
    let Some((local, domain)) = trimmed.split_once('@') else {
        return Err(ValidationError::InvalidEmail(trimmed.into()));
    };

    if local.is_empty() || domain.is_empty() || !domain.contains('.') || domain.contains('@') {
        return Err(ValidationError::InvalidEmail(trimmed.into()));
    }

    Ok(trimmed.to_string())
}

/// An event's ongoing window must not end before it starts.
pub fn check_event_window(
    date: NaiveDateTime,
    end_date: Option<NaiveDateTime>,
) -> Result<(), ValidationError> {
    if let Some(end) = end_date {
        if end < date {
            return Err(ValidationError::EndBeforeStart);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    #[test]
    fn require_text_trims_surrounding_whitespace() {
        assert_eq!(
            require_text("title", "  Feira de Arte ").unwrap(),
            "Feira de Arte"
        );
    }

    #[test]
    fn require_text_rejects_blank_input() {
        assert!(matches!(
            require_text("title", "   "),
            Err(ValidationError::EmptyField("title"))
        ));
    }

    #[test]
    fn validate_link_accepts_https() {
        assert_eq!(
            validate_link("https://example.com/ingressos").unwrap(),
            "https://example.com/ingressos"
        );
    }

    #[test]
    fn validate_link_rejects_javascript_scheme() {
        assert!(matches!(
            validate_link("javascript:alert(1)"),
            Err(ValidationError::UnsupportedScheme(_))
        ));
    }

    #[test]
    fn validate_link_rejects_garbage() {
        assert!(matches!(
            validate_link("not a link"),
            Err(ValidationError::MalformedLink(_))
        ));
    }

    #[test]
    fn optional_link_drops_blank_values() {
        assert_eq!(validate_optional_link(Some("  ".into())).unwrap(), None);
        assert_eq!(validate_optional_link(None).unwrap(), None);
    }

    #[test]
    fn optional_link_still_validates_present_values() {
        assert!(validate_optional_link(Some("ftp://example.com".into())).is_err());
    }

    #[test]
    fn validate_email_accepts_plain_address() {
        assert_eq!(
            validate_email("ana@example.com").unwrap(),
            "ana@example.com"
        );
    }

    #[test]
    fn validate_email_rejects_missing_domain_dot() {
        assert!(validate_email("ana@localhost").is_err());
        assert!(validate_email("ana").is_err());
        assert!(validate_email("@example.com").is_err());
    }

    #[test]
    fn event_window_allows_equal_dates() {
        assert!(check_event_window(at(2025, 5, 1), Some(at(2025, 5, 1))).is_ok());
    }

    #[test]
    fn event_window_rejects_inverted_range() {
        assert!(matches!(
            check_event_window(at(2025, 5, 2), Some(at(2025, 5, 1))),
            Err(ValidationError::EndBeforeStart)
        ));
    }

    #[test]
    fn event_window_allows_open_end() {
        assert!(check_event_window(at(2025, 5, 1), None).is_ok());
    }
}
