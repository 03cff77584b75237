//! Line parsing for bulk task creation.
//!
//! Chat clients paste lists in every shape imaginable; each line is stripped
//! of bullets, numbering, checkboxes and leading emoji before becoming a task
//! name. Blank results are dropped.

use std::sync::OnceLock;

use regex::Regex;

fn bullet_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[-*•●○■▪▫\s]+").expect("valid bullet regex"))
}

fn numbering_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(?:\d+[.)]|\(\d+\))\s*").expect("valid numbering regex"))
}

fn checkbox_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\[[ xX]?\]\s*").expect("valid checkbox regex"))
}

fn marker_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(?:👉|➡️|➡|✅|✔️|✔|–)\s*").expect("valid marker regex")
    })
}

/// Normalize one pasted line into a task name (possibly empty).
pub fn clean_task_line(line: &str) -> String {
    let line = bullet_re().replace(line, "");
    let line = numbering_re().replace(&line, "");
    let line = checkbox_re().replace(&line, "");
    let line = marker_re().replace(&line, "");
    line.trim().to_string()
}

/// Split a newline-delimited block into task names.
pub fn parse_task_lines(block: &str) -> Vec<String> {
    block
        .lines()
        .map(clean_task_line)
        .filter(|name| !name.is_empty())
        .collect()
}
