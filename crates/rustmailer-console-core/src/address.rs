//! Formatting and parsing of address lists.

use rustmailer_console_api::types::Addr;

/// Formats one address per line: `Name <address>` or `<address>`.
///
/// Entries without an address are dropped.
#[must_use]
pub fn format_address_lines(addresses: &[Addr]) -> Vec<String> {
    addresses.iter().filter_map(format_address).collect()
}

/// Formats addresses on one line, separated by `", "`.
#[must_use]
pub fn format_address_line(addresses: &[Addr]) -> String {
    format_address_lines(addresses).join(", ")
}

/// Formats a single address; `None` when it has no address part.
#[must_use]
pub fn format_address(addr: &Addr) -> Option<String> {
    let address = addr.address.as_deref().map(str::trim).filter(|a| !a.is_empty())?;
    match addr.name.as_deref().map(str::trim) {
        Some(name) if !name.is_empty() => Some(format!("{name} <{address}>")),
        _ => Some(format!("<{address}>")),
    }
}

/// Short label: the display name when present, otherwise the address.
#[must_use]
pub fn display_label(addr: &Addr) -> String {
    match (addr.name.as_deref(), addr.address.as_deref()) {
        (Some(name), _) if !name.trim().is_empty() => name.trim().to_string(),
        (_, Some(address)) => address.trim().to_string(),
        _ => String::new(),
    }
}

/// Error parsing an address list.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid address: {0}")]
pub struct AddressError(pub String);

/// Parses comma-separated user input such as `"A <a@x.com>, b@x.com"`.
///
/// Commas inside double quotes or angle brackets do not split entries.
/// Empty entries are skipped.
///
/// # Errors
///
/// Returns the first entry that is not a valid address.
pub fn parse_address_list(input: &str) -> Result<Vec<Addr>, AddressError> {
    split_entries(input)
        .into_iter()
        .filter(|entry| !entry.trim().is_empty())
        .map(|entry| parse_address(&entry))
        .collect()
}

/// Parses a single address entry.
///
/// # Errors
///
/// Returns an error when the address part is not a valid email address.
pub fn parse_address(entry: &str) -> Result<Addr, AddressError> {
    let entry = entry.trim();
    let invalid = || AddressError(entry.to_string());

    let (name, address) = match (entry.rfind('<'), entry.rfind('>')) {
        (Some(open), Some(close)) if open < close => {
            let name = entry[..open].trim().trim_matches('"').trim();
            (name, entry[open + 1..close].trim())
        }
        (None, None) => ("", entry),
        _ => return Err(invalid()),
    };

    if !is_valid_email(address) {
        return Err(invalid());
    }
    Ok(if name.is_empty() {
        Addr::new(address)
    } else {
        Addr::named(name, address)
    })
}

fn split_entries(input: &str) -> Vec<String> {
    let mut entries = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut in_angle = false;

    for c in input.chars() {
        match c {
            '"' => in_quotes = !in_quotes,
            '<' if !in_quotes => in_angle = true,
            '>' if !in_quotes => in_angle = false,
            ',' | ';' if !in_quotes && !in_angle => {
                entries.push(std::mem::take(&mut current));
                continue;
            }
            _ => {}
        }
        current.push(c);
    }
    entries.push(current);
    entries
}

/// Basic email validation: one `@`, non-empty local part, dotted domain.
#[must_use]
pub fn is_valid_email(email: &str) -> bool {
    let email = email.trim();
    if email.chars().any(char::is_whitespace) {
        return false;
    }

    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }

    domain.contains('.') && domain.split('.').all(|part| !part.is_empty())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_format_address_lines() {
        let lines = format_address_lines(&[
            Addr::named("A", "a@x.com"),
            Addr::new("b@x.com"),
            Addr {
                name: Some("Nobody".into()),
                address: None,
            },
        ]);
        assert_eq!(lines, ["A <a@x.com>", "<b@x.com>"]);
    }

    #[test]
    fn test_format_address_line() {
        let line = format_address_line(&[Addr::named("A", "a@x.com"), Addr::new("b@x.com")]);
        assert_eq!(line, "A <a@x.com>, <b@x.com>");
        assert_eq!(format_address_line(&[]), "");
    }

    #[test]
    fn test_blank_name_is_omitted() {
        assert_eq!(
            format_address(&Addr::named("  ", "a@x.com")).as_deref(),
            Some("<a@x.com>")
        );
    }

    #[test]
    fn test_parse_address_list() {
        let parsed = parse_address_list("A <a@x.com>, b@x.com,, \"Doe, Jane\" <jane@x.com>").unwrap();
        assert_eq!(
            parsed,
            [
                Addr::named("A", "a@x.com"),
                Addr::new("b@x.com"),
                Addr::named("Doe, Jane", "jane@x.com"),
            ]
        );
    }

    #[test]
    fn test_parse_rejects_invalid() {
        assert_eq!(
            parse_address_list("ok@x.com, not-an-address"),
            Err(AddressError("not-an-address".into()))
        );
        assert!(parse_address("A <a@x.com").is_err());
        assert!(parse_address_list("").unwrap().is_empty());
    }

    #[test]
    fn test_email_validation() {
        assert!(is_valid_email("user@example.com"));
        assert!(is_valid_email("user.name@sub.example.com"));
        assert!(!is_valid_email("user"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("user@example"));
        assert!(!is_valid_email("user@@example.com"));
        assert!(!is_valid_email("us er@example.com"));
    }

    #[test]
    fn test_display_label() {
        assert_eq!(display_label(&Addr::named("Ann", "a@x.com")), "Ann");
        assert_eq!(display_label(&Addr::new("a@x.com")), "a@x.com");
    }
}
