//! Terminal output helpers for the startup banner and CLI listings

/// Format a URL as a clickable OSC 8 hyperlink when stdout supports it,
/// otherwise as plain cyan text.
pub fn terminal_link(url: &str) -> String {
    if supports_hyperlinks::on(supports_hyperlinks::Stream::Stdout) {
        format!("\x1b]8;;{}\x07\x1b[36m{}\x1b[0m\x1b]8;;\x07", url, url)
    } else {
        format!("\x1b[36m{}\x1b[0m", url)
    }
}

/// Dim grey text
pub fn dim(text: &str) -> String {
    format!("\x1b[90m{}\x1b[0m", text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_link_keeps_url() {
        let url = "http://localhost:5390/api/v1/wells/alberta?use=domestic";
        let result = terminal_link(url);
        assert!(result.contains(url));
        assert!(result.contains("\x1b[36m"));
        if !result.contains("\x1b]8;;") {
            assert_eq!(result, format!("\x1b[36m{}\x1b[0m", url));
        }
    }

    #[test]
    fn test_dim() {
        assert_eq!(dim("sqlite"), "\x1b[90msqlite\x1b[0m");
    }
}
