//! Heuristic language detection for pasted text.
//!
//! Checks run from most to least distinctive: interpreter lines, structured
//! data formats, markup, a handful of high-signal language markers, and
//! finally keyword scoring. The first confident answer wins.

const SAMPLE_MAX_BYTES: usize = 64 * 1024;
const SAMPLE_MAX_LINES: usize = 512;
const KEYWORD_THRESHOLD: usize = 2;

/// Keyword tables scanned in order; ties keep the earlier entry.
const SCORED_LANGUAGES: &[(&str, &[&str])] = &[
    (
        "rust",
        &[
            "fn main(", "fn ", "let mut ", "pub fn", "impl ", "println!", "use std::", "&self",
            "#[derive", "match ",
        ],
    ),
    (
        "python",
        &[
            "def ", "import ", "self.", "elif ", "print(", "__name__", "__init__", "except ",
            "lambda ",
        ],
    ),
    (
        "javascript",
        &[
            "function ", "const ", "let ", "=> ", "console.log", "document.", "require(",
            "module.exports", "export default", "var ",
        ],
    ),
    (
        "go",
        &[
            "package ", "func ", "fmt.", ":= ", "defer ", "go func", "chan ", "import (",
        ],
    ),
    (
        "java",
        &[
            "public class ", "public static void main", "system.out.", "import java.",
            "@override", "private final ",
        ],
    ),
    (
        "kotlin",
        &["fun ", "val ", "data class ", "companion object", "when ("],
    ),
    (
        "swift",
        &["import foundation", "guard let", "func ", "protocol ", "var "],
    ),
    (
        "ruby",
        &["puts ", "require '", "attr_accessor", ".each do", "do |", "end\n"],
    ),
    (
        "lua",
        &["local function", "local ", "elseif ", "~=", "pairs(", "ipairs("],
    ),
    (
        "perl",
        &["use strict;", "use warnings;", "my $", "my @", "sub "],
    ),
    (
        "powershell",
        &[
            "write-host", "get-childitem", "$psversiontable", "param(", "foreach-object",
            "-eq ",
        ],
    ),
    (
        "shell",
        &["echo ", "\nfi", "\ndone", "esac", "if [", "export ", "$("],
    ),
    (
        "elixir",
        &["defmodule ", "defp ", "|> ", "io.puts", ":ok"],
    ),
    (
        "dart",
        &["void main()", "import 'package:", "future<", "setstate("],
    ),
    (
        "zig",
        &["@import(", "comptime", "const std", "!void"],
    ),
];

/// Best-effort language detection on a pre-trimmed sample.
///
/// # Returns
/// A language label (not yet canonicalized) or `None`.
pub(crate) fn detect(content: &str) -> Option<&'static str> {
    let sample = utf8_prefix(content, SAMPLE_MAX_BYTES);
    if sample.trim().is_empty() {
        return None;
    }
    let lower = sample.to_ascii_lowercase();

    if let Some(language) = shebang_language(sample) {
        return Some(language);
    }
    if lower.starts_with("<?php") {
        return Some("php");
    }
    if looks_like_json(sample, sample.len() < content.len()) {
        return Some("json");
    }
    if let Some(language) = markup_language(&lower) {
        return Some(language);
    }
    if looks_like_toml(sample) {
        return Some("toml");
    }
    if looks_like_yaml(sample) {
        return Some("yaml");
    }
    if looks_like_sql(&lower) {
        return Some("sql");
    }
    if looks_like_markdown(sample) {
        return Some("markdown");
    }
    if let Some(language) = marker_language(&lower) {
        return Some(language);
    }
    if looks_like_css(&lower) {
        return Some("css");
    }

    best_keyword_match(&lower)
}

fn lines(sample: &str) -> impl Iterator<Item = &str> {
    sample.lines().take(SAMPLE_MAX_LINES)
}

fn shebang_language(sample: &str) -> Option<&'static str> {
    let first = sample.lines().next()?.trim();
    let command = first.strip_prefix("#!")?.trim();
    let mut parts = command.split_whitespace();
    let mut program = parts.next()?;
    if basename(program) == "env" {
        program = parts.find(|arg| !arg.starts_with('-'))?;
    }
    let program = basename(program).to_ascii_lowercase();
    let family = program.trim_end_matches(|ch: char| ch.is_ascii_digit() || ch == '.');
    match family {
        "python" | "pypy" => Some("python"),
        "node" | "nodejs" | "deno" | "bun" => Some("javascript"),
        "sh" | "bash" | "zsh" | "ksh" | "dash" | "ash" | "fish" => Some("shell"),
        "perl" => Some("perl"),
        "ruby" => Some("ruby"),
        "php" => Some("php"),
        "lua" => Some("lua"),
        "pwsh" => Some("powershell"),
        _ => None,
    }
}

fn basename(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}

fn looks_like_json(sample: &str, truncated: bool) -> bool {
    let trimmed = sample.trim();
    let (open, close) = match trimmed.as_bytes().first() {
        Some(b'{') => ('{', '}'),
        Some(b'[') => ('[', ']'),
        _ => return false,
    };
    // A truncated sample of a large document may lack its closing delimiter.
    (trimmed.ends_with(close) || truncated)
        && trimmed.contains('"')
        && (open == '[' || trimmed.contains(':'))
}

fn markup_language(lower: &str) -> Option<&'static str> {
    let trimmed = lower.trim_start();
    if trimmed.starts_with("<!doctype html") || trimmed.starts_with("<html") {
        return Some("html");
    }
    if !trimmed.starts_with('<') {
        return None;
    }
    if trimmed.starts_with("<?xml") {
        return Some("xml");
    }
    let html_tags = [
        "<head", "<body", "<div", "<span", "<script", "<style", "<p>", "<a ",
    ]
    .iter()
    .filter(|tag| lower.contains(**tag))
    .count();
    if html_tags >= 2 {
        return Some("html");
    }
    if lower.contains("</") || lower.contains("/>") {
        return Some("xml");
    }
    None
}

fn is_bare_key(key: &str) -> bool {
    let key = key.trim();
    let unquoted = key
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
        .unwrap_or(key);
    !unquoted.is_empty()
        && unquoted
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '_' | '-' | '.'))
}

fn looks_like_toml(sample: &str) -> bool {
    let mut has_table = false;
    let mut assignments = 0usize;
    for line in lines(sample) {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        if trimmed.starts_with('[') && trimmed.ends_with(']') {
            let inner = trimmed.trim_matches(|ch| ch == '[' || ch == ']');
            has_table |= is_bare_key(inner);
            continue;
        }
        if let Some((key, value)) = trimmed.split_once('=') {
            if is_bare_key(key) && !value.trim().is_empty() && !value.starts_with('=') {
                assignments += 1;
            }
        }
    }
    has_table && assignments >= 1
}

fn looks_like_yaml(sample: &str) -> bool {
    let mut content_lines = 0usize;
    let mut yaml_lines = 0usize;
    let mut mappings = 0usize;
    for line in lines(sample) {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') || trimmed == "---" {
            continue;
        }
        content_lines += 1;
        if trimmed.starts_with("- ") {
            yaml_lines += 1;
            continue;
        }
        let Some((key, value)) = trimmed.split_once(':') else {
            continue;
        };
        let value = value.trim();
        if is_bare_key(key) && !value.ends_with(';') && !value.contains('{') {
            yaml_lines += 1;
            mappings += 1;
        }
    }
    mappings >= 1 && yaml_lines >= 2 && yaml_lines * 10 >= content_lines * 7
}

fn looks_like_sql(lower: &str) -> bool {
    lines(lower).any(|line| {
        let line = line.trim();
        (line.starts_with("select ") && line.contains(" from "))
            || line.starts_with("insert into ")
            || (line.starts_with("update ") && line.contains(" set "))
            || line.starts_with("delete from ")
            || line.starts_with("create table ")
            || line.starts_with("alter table ")
            || line.starts_with("drop table ")
    })
}

fn looks_like_markdown(sample: &str) -> bool {
    let mut heading = false;
    let mut fence = false;
    let mut list = false;
    for line in lines(sample) {
        let trimmed = line.trim_start();
        let hashes = trimmed.chars().take_while(|ch| *ch == '#').count();
        if (1..=6).contains(&hashes) && trimmed[hashes..].starts_with(' ') {
            heading = true;
        }
        fence |= trimmed.starts_with("```");
        list |= trimmed.starts_with("- ") || trimmed.starts_with("* ");
    }
    let link = sample.contains("](");
    let emphasis = sample.contains("**");
    let supporting = [fence, list, link, emphasis].iter().filter(|hit| **hit).count();
    (heading || fence) && supporting >= 1 && (heading as usize + supporting) >= 2
}

/// Languages with a distinctive construct that keyword scoring would blur.
fn marker_language(lower: &str) -> Option<&'static str> {
    if lower.contains("\\documentclass")
        || ["\\begin{", "\\end{", "\\usepackage", "\\section"]
            .iter()
            .filter(|kw| lower.contains(**kw))
            .count()
            >= 2
    {
        return Some("latex");
    }

    if lower.contains("using system") && (lower.contains("namespace ") || lower.contains("console."))
    {
        return Some("cs");
    }

    if lower.contains("#include <iostream>")
        || lower.contains("using namespace std")
        || lower.contains("std::cout")
        || lower.contains("template <")
    {
        return Some("cpp");
    }

    if lower.contains("#include") && (lower.contains("printf") || lower.contains("int main")) {
        return Some("c");
    }

    let typescript_hits = [
        "interface ",
        ": string",
        ": number",
        ": boolean",
        "readonly ",
        "as const",
        "export type ",
    ]
    .iter()
    .filter(|kw| lower.contains(**kw))
    .count();
    if typescript_hits >= 2 {
        return Some("typescript");
    }

    None
}

fn looks_like_css(lower: &str) -> bool {
    let has_rule_shape =
        lower.contains('{') && lower.contains('}') && lower.contains(':') && lower.contains(';');
    let has_property = [
        "color:", "margin", "padding", "font-", "display:", "background", "border",
    ]
    .iter()
    .any(|token| lower.contains(token));
    let looks_scripted = ["function", "=>", "const ", "let "]
        .iter()
        .any(|token| lower.contains(token));
    has_rule_shape && has_property && !looks_scripted
}

fn best_keyword_match(lower: &str) -> Option<&'static str> {
    let mut best: Option<(&'static str, usize)> = None;
    for (language, keywords) in SCORED_LANGUAGES {
        let hits = keywords.iter().filter(|kw| lower.contains(**kw)).count();
        if hits < KEYWORD_THRESHOLD {
            continue;
        }
        match best {
            Some((_, best_hits)) if best_hits >= hits => {}
            _ => best = Some((*language, hits)),
        }
    }
    best.map(|(language, _)| language)
}

fn utf8_prefix(content: &str, max_bytes: usize) -> &str {
    if content.len() <= max_bytes {
        return content;
    }
    let mut end = max_bytes;
    while end > 0 && !content.is_char_boundary(end) {
        end -= 1;
    }
    &content[..end]
}
