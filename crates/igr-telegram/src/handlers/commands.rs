/// Split `/cmd@botname arg1 ...` into a lowercase command name and the rest.
pub fn parse_command(text: &str) -> (String, String) {
    let mut parts = text.trim().splitn(2, char::is_whitespace);
    let first = parts.next().unwrap_or("").trim();
    let rest = parts.next().unwrap_or("").trim().to_string();

    let cmd = first
        .trim_start_matches('/')
        .split('@')
        .next()
        .unwrap_or("")
        .to_lowercase();

    (cmd, rest)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_command() {
        assert_eq!(parse_command("/cancel"), ("cancel".to_string(), String::new()));
    }

    #[test]
    fn strips_bot_mention_and_keeps_args() {
        assert_eq!(
            parse_command("/DM@insta_relay_bot john_doe: Salom! Qalaysiz?"),
            ("dm".to_string(), "john_doe: Salom! Qalaysiz?".to_string())
        );
    }

    #[test]
    fn args_span_multiple_lines() {
        let (cmd, args) = parse_command("/dm jane:line one\nline two");
        assert_eq!(cmd, "dm");
        assert_eq!(args, "jane:line one\nline two");
    }
}
