use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tasklist_core::config::{ConfigOverrides, StartMode, canonical_key};
use tasklist_core::error::AppError;
use tasklist_core::model::{Category, Priority};
use tasklist_core::task_api::StatusFilter;

#[derive(Parser, Debug)]
#[command(name = "tasklist", author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Output JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Task store file (defaults to $TASKLIST_STORE_PATH or ~/.config/tasklist/tasks.json)
    #[arg(long, value_name = "PATH", global = true)]
    pub store: Option<PathBuf>,

    /// Override configuration values (format KEY=VALUE)
    #[arg(long = "config-override", value_name = "KEY=VALUE", global = true)]
    pub config_override: Vec<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start the text-command terminal
    ///
    /// Example: tasklist terminal
    Terminal,
    /// Start the card view
    ///
    /// Example: tasklist gui
    Gui,
    #[command(flatten)]
    Task(TaskCommand),
}

/// Operations on the task collection, shared by one-shot invocations and the
/// card view.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum TaskCommand {
    /// Add a new task
    ///
    /// Example: tasklist add "Buy groceries" --category shopping --priority high
    Add {
        text: Option<String>,
        #[arg(short, long)]
        description: Option<String>,
        #[arg(short, long)]
        category: Option<Category>,
        #[arg(short, long)]
        priority: Option<Priority>,
        #[arg(long, value_name = "YYYY-MM-DD")]
        due: Option<String>,
    },
    /// Flip a task between active and completed
    ///
    /// Example: tasklist toggle 1766188800000
    Toggle { id: String },
    /// Replace a task's text and description
    ///
    /// Example: tasklist edit 1766188800000 "Buy oat milk" -d "the barista one"
    Edit {
        id: String,
        text: String,
        #[arg(short, long)]
        description: Option<String>,
    },
    /// Delete a task
    ///
    /// Example: tasklist delete 1766188800000
    Delete { id: String },
    /// List tasks
    ///
    /// Example: tasklist list --status active --category work
    List {
        #[arg(long, default_value = "all")]
        status: StatusFilter,
        #[arg(long)]
        category: Option<Category>,
    },
    /// Show task counts
    ///
    /// Example: tasklist stats
    Stats,
}

/// One line typed into the card view.
#[derive(Parser, Debug)]
#[command(
    name = "tasklist",
    no_binary_name = true,
    disable_version_flag = true,
    override_usage = "<COMMAND> [ARGS]"
)]
pub struct BoardLine {
    #[command(subcommand)]
    pub command: BoardCommand,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum BoardCommand {
    #[command(flatten)]
    Task(TaskCommand),
    /// Set the filter used for the card listing
    ///
    /// Example: filter --status active --category work
    Filter {
        #[arg(long, default_value = "all")]
        status: StatusFilter,
        #[arg(long)]
        category: Option<Category>,
    },
    /// Switch to the text-command terminal
    Terminal,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigOverrideTarget {
    Theme,
    StartMode,
    ModeSwitchDelay,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedConfigOverride {
    pub target: ConfigOverrideTarget,
    pub value: String,
}

/// Parse a raw `KEY=VALUE` override string into a structured target.
pub fn parse_config_override(raw: &str) -> Result<ParsedConfigOverride, String> {
    let (key_raw, value_raw) = raw
        .trim()
        .split_once('=')
        .ok_or_else(|| "override must be in KEY=VALUE format".to_string())?;

    let key = canonical_key(key_raw);
    if key.is_empty() {
        return Err("override key cannot be empty".to_string());
    }

    let target = match key.as_str() {
        "theme" => ConfigOverrideTarget::Theme,
        "start_mode" | "mode" => ConfigOverrideTarget::StartMode,
        "mode_switch_delay_ms" | "mode_switch_delay" => ConfigOverrideTarget::ModeSwitchDelay,
        other => return Err(format!("unknown config field '{other}'")),
    };

    Ok(ParsedConfigOverride {
        target,
        value: value_raw.trim().to_string(),
    })
}

pub fn collect_config_overrides(raw: &[String]) -> Result<ConfigOverrides, AppError> {
    let mut overrides = ConfigOverrides::default();
    for entry in raw {
        let parsed = parse_config_override(entry).map_err(AppError::invalid_input)?;
        match parsed.target {
            ConfigOverrideTarget::Theme => overrides.theme = Some(parsed.value),
            ConfigOverrideTarget::StartMode => {
                overrides.start_mode = Some(parsed.value.parse::<StartMode>()?);
            }
            ConfigOverrideTarget::ModeSwitchDelay => {
                let millis = parsed.value.parse::<u64>().map_err(|_| {
                    AppError::invalid_input(format!(
                        "mode_switch_delay_ms must be a number of milliseconds, got '{}'",
                        parsed.value
                    ))
                })?;
                overrides.mode_switch_delay_ms = Some(millis);
            }
        }
    }
    Ok(overrides)
}

/// Splits a card-view line into arguments, honouring `"..."` with `\"`
/// escapes.
pub fn split_command_line(line: &str) -> Result<Vec<String>, AppError> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut quoted = false;
    let mut escape = false;

    for ch in line.chars() {
        if escape {
            if ch != '"' && ch != '\\' {
                current.push('\\');
            }
            current.push(ch);
            escape = false;
            continue;
        }

        if in_quotes && ch == '\\' {
            escape = true;
            continue;
        }

        if ch == '"' {
            in_quotes = !in_quotes;
            quoted = true;
            continue;
        }

        if ch.is_whitespace() && !in_quotes {
            if !current.is_empty() || quoted {
                args.push(std::mem::take(&mut current));
            }
            quoted = false;
            continue;
        }

        current.push(ch);
    }

    if in_quotes {
        return Err(AppError::invalid_input("unterminated quote in command"));
    }

    if !current.is_empty() || quoted {
        args.push(current);
    }

    Ok(args)
}

#[cfg(test)]
mod tests {
    use super::{
        BoardCommand, BoardLine, ConfigOverrideTarget, TaskCommand, collect_config_overrides,
        parse_config_override, split_command_line,
    };
    use clap::Parser;
    use tasklist_core::config::StartMode;
    use tasklist_core::model::{Category, Priority};
    use tasklist_core::task_api::StatusFilter;

    #[test]
    fn parse_config_override_canonicalizes_field_names() {
        let parsed = parse_config_override(" THEME = Midnight ").unwrap();
        assert_eq!(parsed.target, ConfigOverrideTarget::Theme);
        assert_eq!(parsed.value, "Midnight");

        let parsed = parse_config_override("Start-Mode=gui").unwrap();
        assert_eq!(parsed.target, ConfigOverrideTarget::StartMode);
    }

    #[test]
    fn parse_config_override_rejects_unknown_fields() {
        let err = parse_config_override("unknown.field=value").unwrap_err();
        assert!(err.contains("unknown config field"));
    }

    #[test]
    fn parse_config_override_rejects_missing_equals() {
        let err = parse_config_override("theme").unwrap_err();
        assert!(err.contains("KEY=VALUE"));
    }

    #[test]
    fn collect_config_overrides_validates_values() {
        let overrides = collect_config_overrides(&[
            "start_mode=gui".to_string(),
            "mode_switch_delay_ms=0".to_string(),
        ])
        .unwrap();
        assert_eq!(overrides.start_mode, Some(StartMode::Gui));
        assert_eq!(overrides.mode_switch_delay_ms, Some(0));

        let err = collect_config_overrides(&["mode_switch_delay_ms=soon".to_string()]).unwrap_err();
        assert_eq!(err.code(), "invalid_input");
    }

    #[test]
    fn split_command_line_handles_quotes_and_escapes() {
        let args = split_command_line(r#"edit 12 "say \"hi\"" -d """#).unwrap();
        assert_eq!(args, vec!["edit", "12", "say \"hi\"", "-d", ""]);
        assert!(split_command_line("add \"open").is_err());
    }

    #[test]
    fn board_line_parses_task_commands() {
        let line = BoardLine::try_parse_from([
            "add", "Buy milk", "--category", "shopping", "--priority", "HIGH",
        ])
        .unwrap();
        assert_eq!(
            line.command,
            BoardCommand::Task(TaskCommand::Add {
                text: Some("Buy milk".to_string()),
                description: None,
                category: Some(Category::Shopping),
                priority: Some(Priority::High),
                due: None,
            })
        );

        let line = BoardLine::try_parse_from(["filter", "--status", "active"]).unwrap();
        assert_eq!(
            line.command,
            BoardCommand::Filter {
                status: StatusFilter::Active,
                category: None,
            }
        );
    }

    #[test]
    fn board_line_rejects_unknown_category() {
        assert!(BoardLine::try_parse_from(["list", "--category", "garden"]).is_err());
    }
}
