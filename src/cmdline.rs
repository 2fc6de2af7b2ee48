// Command-line tokenizing for uninstall strings

use crate::path::HostPaths;

/// Splits a command line the way the Windows shell splits `argv`.
///
/// The first token ends at the closing quote (or first whitespace) with no
/// escape processing. Later tokens follow the backslash/quote rules: `2n`
/// backslashes before a quote yield `n` backslashes and toggle quoting,
/// `2n+1` yield `n` backslashes and a literal quote.
pub fn split_command_line(line: &str) -> Vec<String> {
    let mut args = Vec::new();
    if line.trim().is_empty() {
        return args;
    }
    let chars: Vec<char> = line.chars().collect();
    let mut i = 0;

    // Program name.
    let mut program = String::new();
    if chars.first() == Some(&'"') {
        i = 1;
        while i < chars.len() && chars[i] != '"' {
            program.push(chars[i]);
            i += 1;
        }
        i += 1;
    } else {
        while i < chars.len() && !is_blank(chars[i]) {
            program.push(chars[i]);
            i += 1;
        }
    }
    args.push(program);

    loop {
        while i < chars.len() && is_blank(chars[i]) {
            i += 1;
        }
        if i >= chars.len() {
            break;
        }

        let mut current = String::new();
        let mut quoted = false;
        while i < chars.len() {
            let c = chars[i];
            if c == '\\' {
                let start = i;
                while i < chars.len() && chars[i] == '\\' {
                    i += 1;
                }
                let count = i - start;
                if i < chars.len() && chars[i] == '"' {
                    current.extend(std::iter::repeat('\\').take(count / 2));
                    if count % 2 == 1 {
                        current.push('"');
                        i += 1;
                    }
                } else {
                    current.extend(std::iter::repeat('\\').take(count));
                }
                continue;
            }
            if c == '"' {
                if quoted && chars.get(i + 1) == Some(&'"') {
                    current.push('"');
                    i += 2;
                    continue;
                }
                quoted = !quoted;
                i += 1;
                continue;
            }
            if is_blank(c) && !quoted {
                break;
            }
            current.push(c);
            i += 1;
        }
        args.push(current);
    }

    args
}

fn is_blank(c: char) -> bool {
    c == ' ' || c == '\t'
}

/// Rejoins tokens, quoting any that contain blanks and are not already quoted.
pub fn join_arguments(tokens: &[String]) -> String {
    tokens
        .iter()
        .map(|token| {
            if token.contains(is_blank) && !token.starts_with('"') {
                format!("\"{token}\"")
            } else {
                token.clone()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Splits an uninstall command into an executable and its argument string.
pub fn split_uninstall_command(host: &dyn HostPaths, command: &str) -> (String, String) {
    if !command.starts_with('"') {
        if let Some(found) = host.search_path(command, Some(".exe")) {
            if host.exists(&found) {
                return (found, String::new());
            }
        }
    }

    let tokens = split_command_line(command);
    let Some((first, rest)) = tokens.split_first() else {
        return (command.trim_matches('"').to_string(), String::new());
    };

    let executable = host
        .search_path(first, Some(".exe"))
        .unwrap_or_else(|| first.clone());
    (executable, join_arguments(rest))
}
