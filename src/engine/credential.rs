/// Accepts either a bare portal token or a full portal URL carrying a
/// `token=` query parameter. Anything without `token=` is assumed to already
/// be bare and passes through untouched; malformed tokens surface later as
/// provider-request failures.
pub fn extract_token(input: &str) -> &str {
    let Some(idx) = input.find("token=") else {
        return input;
    };
    let rest = &input[idx + "token=".len()..];
    match rest.find('&') {
        Some(end) => &rest[..end],
        None => rest,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_token_from_portal_url() {
        assert_eq!(
            extract_token("https://host/view?token=ABC.DEF&x=1"),
            "ABC.DEF"
        );
    }

    #[test]
    fn extracts_token_at_end_of_query() {
        assert_eq!(extract_token("https://host/view?a=1&token=ABC.DEF"), "ABC.DEF");
    }

    #[test]
    fn bare_token_passes_through() {
        assert_eq!(extract_token("ABC.DEF"), "ABC.DEF");
    }

    #[test]
    fn empty_input_stays_empty() {
        assert_eq!(extract_token(""), "");
    }
}
