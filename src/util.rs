use chrono::{DateTime, Utc};

/// Wrap text in an inline code span.
pub fn code(s: &str) -> String {
    format!("`{}`", s)
}

pub fn bold(s: &str) -> String {
    format!("**{}**", s)
}

pub fn format_date(date: &DateTime<Utc>) -> String {
    date.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

/// Parse a user reference. Accepts `<@id>`, `<@!id>` or a raw id.
pub fn parse_user_mention(s: &str) -> Option<u64> {
    let s = s.trim();
    let numeric = match s.strip_prefix("<@").and_then(|r| r.strip_suffix('>')) {
        Some(inner) => inner.strip_prefix('!').unwrap_or(inner),
        None => s,
    };
    numeric.parse::<u64>().ok()
}

/// Parse a channel reference. Accepts `<#id>` or a raw id.
pub fn parse_channel_mention(s: &str) -> Option<u64> {
    let s = s.trim();
    let numeric = s
        .strip_prefix("<#")
        .and_then(|r| r.strip_suffix('>'))
        .unwrap_or(s);
    numeric.parse::<u64>().ok()
}

/// Split command arguments on whitespace, keeping double-quoted runs together.
pub fn split_args(s: &str) -> Vec<String> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut quoted = false;
    let mut in_arg = false;

    for ch in s.chars() {
        match ch {
            '"' => {
                quoted = !quoted;
                in_arg = true;
            }
            c if c.is_whitespace() && !quoted => {
                if in_arg {
                    args.push(std::mem::take(&mut current));
                    in_arg = false;
                }
            }
            c => {
                current.push(c);
                in_arg = true;
            }
        }
    }

    if in_arg {
        args.push(current);
    }

    args
}

/// Split a response into chunks of at most `max_len` bytes, preferring line breaks.
pub fn chunk_message(text: &str, max_len: usize) -> Vec<String> {
    if max_len == 0 {
        return Vec::new();
    }

    if text.len() <= max_len {
        return vec![text.to_string()];
    }

    let mut chunks = Vec::new();
    let mut current = String::new();

    fn split_utf8_by_max_bytes(s: &str, max_len: usize) -> Vec<String> {
        let mut out = Vec::new();
        let mut rest = s;

        while !rest.is_empty() {
            if rest.len() <= max_len {
                out.push(rest.to_string());
                break;
            }

            let mut cut = rest
                .char_indices()
                .map(|(idx, ch)| idx + ch.len_utf8())
                .take_while(|&end| end <= max_len)
                .last()
                .unwrap_or(0);

            // A single char wider than max_len still has to make progress.
            if cut == 0 {
                cut = rest.chars().next().map(char::len_utf8).unwrap_or(rest.len());
            }

            out.push(rest[..cut].to_string());
            rest = &rest[cut..];
        }

        out
    }

    for line in text.lines() {
        if !current.is_empty() && current.len() + 1 + line.len() > max_len {
            chunks.push(std::mem::take(&mut current));
        }

        if line.len() > max_len {
            if !current.is_empty() {
                chunks.push(std::mem::take(&mut current));
            }
            let mut pieces = split_utf8_by_max_bytes(line, max_len);
            current = pieces.pop().unwrap_or_default();
            chunks.extend(pieces);
        } else {
            if !current.is_empty() {
                current.push('\n');
            }
            current.push_str(line);
        }
    }

    if !current.is_empty() {
        chunks.push(current);
    }

    chunks
}
