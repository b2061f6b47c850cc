use std::net::IpAddr;

use reqwest::Url;

use crate::error::{AppError, Result};

/// Checks a submission before anything touches the network.
///
/// Both fields must be non-blank and the URL must be an absolute `http` or
/// `https` URL whose host is an IP address, `localhost`, or a dotted domain.
pub fn validate(api_key: &str, url: &str) -> Result<Url> {
    if api_key.trim().is_empty() || url.trim().is_empty() {
        return Err(AppError::MissingInput);
    }

    let parsed = Url::parse(url.trim()).map_err(|_| AppError::InvalidUrl)?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(AppError::InvalidUrl);
    }

    let host = parsed.host_str().ok_or(AppError::InvalidUrl)?;
    if !is_valid_host(host) {
        return Err(AppError::InvalidUrl);
    }

    Ok(parsed)
}

fn is_valid_host(host: &str) -> bool {
    let bare = host.trim_start_matches('[').trim_end_matches(']');
    if bare.parse::<IpAddr>().is_ok() || bare.eq_ignore_ascii_case("localhost") {
        return true;
    }

    let labels: Vec<&str> = bare.split('.').collect();
    labels.len() >= 2
        && labels.iter().all(|label| {
            !label.is_empty()
                && !label.starts_with('-')
                && !label.ends_with('-')
                && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
        })
}
