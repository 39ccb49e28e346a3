const MASKED_PARAMS: [&str; 3] = ["token=", "password=", "ui_session="];

/// Replaces the values of credential-like query parameters with `***`.
pub fn mask_uri_token(uri: &str) -> String {
    let mut masked = uri.to_string();

    for param in MASKED_PARAMS {
        let mut search_from = 0;
        while let Some(found) = masked[search_from..].find(param) {
            let start = search_from + found + param.len();
            let end = masked[start..]
                .find('&')
                .map(|offset| start + offset)
                .unwrap_or(masked.len());
            masked.replace_range(start..end, "***");
            search_from = start + 3;
        }
    }

    masked
}
