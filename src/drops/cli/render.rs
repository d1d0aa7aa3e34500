use chrono::{DateTime, Utc};
use colored::Colorize;
use drops::api::{CmdMessage, MessageLevel};
use drops::config::{DropsConfig, KEYS};
use drops::model::{Board, DropResult, Privacy};
use timeago::Formatter;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const LINE_WIDTH: usize = 100;
const CODE_WIDTH: usize = 10;
const TIME_WIDTH: usize = 14;
const LOCK_MARKER: &str = "🔒";

/// How results are written. Built once from the global flags.
#[derive(Debug, Clone, Copy, Default)]
pub struct OutputSettings {
    pub porcelain: bool,
    pub debug: bool,
}

impl OutputSettings {
    pub fn new(porcelain: bool, debug: bool) -> Self {
        if porcelain {
            colored::control::set_override(false);
        }
        Self { porcelain, debug }
    }
}

pub fn print_messages(settings: &OutputSettings, messages: &[CmdMessage]) {
    if settings.porcelain {
        return;
    }
    for message in messages {
        match message.level {
            MessageLevel::Info => println!("{}", message.content.dimmed()),
            MessageLevel::Success => println!("{}", message.content.green()),
            MessageLevel::Warning => println!("{}", message.content.yellow()),
        }
    }
}

/// Value lookups (`config <key>`, `whoami`) are the answer itself, so they
/// print in porcelain mode too.
pub fn print_values(messages: &[CmdMessage]) {
    for message in messages {
        println!("{}", message.content);
    }
}

/// Prints a freshly created drop: the shortlink first, then its state.
pub fn print_created(settings: &OutputSettings, drop: &DropResult) {
    if settings.porcelain {
        println!("{}", drop.shortlink);
        return;
    }
    println!("{}", drop.shortlink.bold());
    let mut flags = Vec::new();
    if drop.privacy == Privacy::Private {
        flags.push("private");
    }
    if drop.password_protected {
        flags.push("password protected");
    }
    if !flags.is_empty() {
        println!("{}", flags.join(", ").dimmed());
    }
}

pub fn print_drops(settings: &OutputSettings, drops: &[DropResult]) {
    if settings.porcelain {
        for drop in drops {
            println!("{}", porcelain_drop(drop));
        }
        return;
    }

    for drop in drops {
        let code = format!("{:<width$}", drop.code, width = CODE_WIDTH);
        let marker = if drop.privacy == Privacy::Private || drop.password_protected {
            format!("{} ", LOCK_MARKER)
        } else {
            "   ".to_string()
        };
        let time_ago = drop.created_at.map(format_time_ago).unwrap_or_else(|| {
            format!("{:>width$}", "", width = TIME_WIDTH)
        });

        let title = drop.title.as_deref().unwrap_or("(untitled)");
        let label = format!("{} {}", title, drop.shortlink);
        let fixed_width = code.width() + marker.width() + TIME_WIDTH;
        let available = LINE_WIDTH.saturating_sub(fixed_width);
        let label = truncate_to_width(&label, available);
        let padding = available.saturating_sub(label.width());

        println!(
            "{}{}{}{}{}",
            code.yellow(),
            marker,
            label,
            " ".repeat(padding),
            time_ago.dimmed()
        );
    }
}

fn porcelain_drop(drop: &DropResult) -> String {
    let drop_type = drop.drop_type.to_string();
    let privacy = drop.privacy.to_string();
    let created = drop
        .created_at
        .map(|at| at.to_rfc3339())
        .unwrap_or_default();
    let fields: [&str; 6] = [
        &drop.code,
        &drop_type,
        &privacy,
        drop.title.as_deref().unwrap_or(""),
        &drop.shortlink,
        &created,
    ];
    fields.join("\t")
}

pub fn print_boards(settings: &OutputSettings, boards: &[Board]) {
    for board in boards {
        if settings.porcelain {
            println!("{}\t{}\t{}", board.id, board.name, board.drop_count);
        } else {
            let id = format!("{:<width$}", board.id, width = CODE_WIDTH);
            println!(
                "{}{} {}",
                id.yellow(),
                board.name.bold(),
                format!("({} drops)", board.drop_count).dimmed()
            );
        }
    }
}

pub fn print_config(settings: &OutputSettings, config: &DropsConfig) {
    for key in KEYS {
        let value = config.get(key).unwrap_or_default();
        if settings.porcelain {
            println!("{}\t{}", key, value);
        } else {
            println!("{} = {}", key, value);
        }
    }
}

fn truncate_to_width(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }

    let mut result = String::new();
    let mut current_width = 0;
    for c in s.chars() {
        let char_width = c.width().unwrap_or(0);
        if current_width + char_width > max_width.saturating_sub(1) {
            result.push('…');
            return result;
        }
        result.push(c);
        current_width += char_width;
    }
    result
}

fn format_time_ago(timestamp: DateTime<Utc>) -> String {
    let duration = Utc::now().signed_duration_since(timestamp);
    let time_str = Formatter::new().convert(duration.to_std().unwrap_or_default());
    format!("{:>width$}", time_str, width = TIME_WIDTH)
}
