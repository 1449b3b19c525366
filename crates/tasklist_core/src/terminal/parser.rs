use std::collections::BTreeMap;

/// Value bound to a flag that is not followed by a value token.
pub const FLAG_TRUE: &str = "true";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedCommand {
    pub name: String,
    pub args: Vec<String>,
    pub flags: BTreeMap<String, String>,
}

impl ParsedCommand {
    pub fn flag(&self, name: &str) -> Option<&str> {
        self.flags.get(name).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_empty()
    }
}

fn is_flag(token: &str) -> bool {
    token.starts_with("--")
}

/// Splits one input line into a command name, positional arguments and flags.
///
/// Tokens are whitespace-delimited. `--name value` binds a flag; a flag whose
/// next token is missing or itself a flag is bound to `"true"`. A token that
/// opens with `"` swallows following tokens until one ends with `"`, and the
/// outer quotes are dropped. Quotes do not nest and nothing is escaped; an
/// unterminated quote runs to the end of the line.
pub fn parse_command(input: &str) -> ParsedCommand {
    let mut tokens = input.split_whitespace().peekable();
    let name = tokens.next().unwrap_or_default().to_string();
    let mut args = Vec::new();
    let mut flags = BTreeMap::new();

    while let Some(token) = tokens.next() {
        if let Some(flag_name) = token.strip_prefix("--") {
            let value = match tokens.peek() {
                Some(next) if !is_flag(next) => {
                    let value = next.to_string();
                    tokens.next();
                    value
                }
                _ => FLAG_TRUE.to_string(),
            };
            flags.insert(flag_name.to_string(), value);
        } else if let Some(opened) = token.strip_prefix('"') {
            let mut quoted = opened.to_string();
            let mut closed = token.ends_with('"');
            while !closed {
                let Some(next) = tokens.next() else {
                    break;
                };
                quoted.push(' ');
                quoted.push_str(next);
                closed = next.ends_with('"');
            }
            if quoted.ends_with('"') {
                quoted.pop();
            }
            args.push(quoted);
        } else {
            args.push(token.to_string());
        }
    }

    ParsedCommand { name, args, flags }
}
