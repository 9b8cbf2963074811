//! Detection module tests for canonicalization and heuristic matching.

use super::canonical::{canonicalize, MANUAL_LANGUAGE_OPTIONS};
use super::detect_language;

fn assert_detection_cases(cases: &[(&str, Option<&str>)]) {
    for (content, expected) in cases {
        assert_eq!(
            detect_language(content).as_deref(),
            *expected,
            "content: {content}"
        );
    }
}

#[test]
fn heuristic_detects_common_language_matrix() {
    let cases = [
        (
            "fn main() {\n    let mut x = 1;\n    println!(\"{}\", x);\n}",
            Some("rust"),
        ),
        (
            "def greet(name):\n    print(f\"hi {name}\")\n\nif __name__ == \"__main__\":\n    greet(\"x\")",
            Some("python"),
        ),
        (
            "const add = (a, b) => a + b;\nconsole.log(add(1, 2));",
            Some("javascript"),
        ),
        (
            "interface User {\n  name: string;\n  age: number;\n}",
            Some("typescript"),
        ),
        ("#!/bin/bash\necho \"hello\"", Some("shell")),
        ("#!/usr/bin/env python3\nx = 1", Some("python")),
        ("{\n  \"name\": \"demo\",\n  \"version\": 1\n}", Some("json")),
        (
            "<!DOCTYPE html>\n<html><body><p>Hi</p></body></html>",
            Some("html"),
        ),
        (
            "<?xml version=\"1.0\"?>\n<note><to>A</to></note>",
            Some("xml"),
        ),
        ("name: app\nservices:\n  - web\n  - worker", Some("yaml")),
        (
            "[package]\nname = \"demo\"\nversion = \"0.1.0\"",
            Some("toml"),
        ),
        ("SELECT id, name FROM users WHERE id = 1;", Some("sql")),
        (
            "package main\n\nimport \"fmt\"\n\nfunc main() {\n\tfmt.Println(\"hi\")\n}",
            Some("go"),
        ),
        ("body {\n  color: #333;\n  margin: 0;\n}", Some("css")),
        ("just some plain words here", None),
    ];
    assert_detection_cases(cases.as_slice());
}

#[test]
fn heuristic_detects_marker_languages() {
    let cases = [
        (
            "#include <stdio.h>\nint main(void) {\n  printf(\"hi\\n\");\n  return 0;\n}",
            Some("c"),
        ),
        (
            "#include <iostream>\nint main() { std::cout << 1; }",
            Some("cpp"),
        ),
        (
            "using System;\nnamespace Demo {\n  class P { static void Main() { Console.WriteLine(\"hi\"); } }\n}",
            Some("cs"),
        ),
        (
            "\\documentclass{article}\n\\begin{document}\nhi\n\\end{document}",
            Some("latex"),
        ),
        ("<?php echo 'hi'; ?>", Some("php")),
        ("param($Name)\nWrite-Host $Name", Some("powershell")),
    ];
    assert_detection_cases(cases.as_slice());
}

#[test]
fn markdown_needs_heading_plus_supporting_signal() {
    let cases = [
        (
            "# Title\n\nSome text with a [link](https://example.com).\n\n- item one\n- item two",
            Some("markdown"),
        ),
        ("# just a comment line", None),
    ];
    assert_detection_cases(cases.as_slice());
}

#[test]
fn surrounding_blank_lines_do_not_change_the_result() {
    let body = "def main():\n    print('hi')";
    let padded = format!("\n\n   \n{body}\n\n\t\n");
    assert_eq!(detect_language(body).as_deref(), Some("python"));
    assert_eq!(detect_language(&padded), detect_language(body));
}

#[test]
fn detection_is_deterministic_and_never_panics_on_odd_input() {
    let inputs = ["", "   \n\n", "\u{0}\u{1}\u{2}", "ééé: ü", "[", "{", "<"];
    for input in inputs {
        let first = detect_language(input);
        assert_eq!(first, detect_language(input), "input: {input:?}");
    }
    let large = "x".repeat(200 * 1024);
    assert_eq!(detect_language(&large), None);
}

#[test]
fn canonicalization_matrix_handles_aliases() {
    let cases = [
        ("csharp", "cs"),
        ("C#", "cs"),
        ("c++", "cpp"),
        ("bash", "shell"),
        ("yml", "yaml"),
        ("js", "javascript"),
        ("ts", "typescript"),
        ("md", "markdown"),
        ("plain text", "text"),
        ("pwsh", "powershell"),
        ("PY", "python"),
        ("rust", "rust"),
        ("  ", ""),
    ];
    for (input, expected) in cases {
        assert_eq!(canonicalize(input), expected, "input: {input}");
    }
}

#[test]
fn manual_options_are_sorted_canonical_and_labelled() {
    for option in MANUAL_LANGUAGE_OPTIONS {
        assert_eq!(canonicalize(option.value), option.value);
    }
    let labels: Vec<String> = MANUAL_LANGUAGE_OPTIONS
        .iter()
        .map(|option| option.label.to_ascii_lowercase())
        .collect();
    let mut sorted = labels.clone();
    sorted.sort();
    assert_eq!(labels, sorted);
}
