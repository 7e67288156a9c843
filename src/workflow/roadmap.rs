//! Section extraction from the product roadmap.
//!
//! The roadmap lists the product's sections; each one gets its own spec
//! under `product/sections/<id>/`, and the architecture step needs all of
//! them.

use std::path::Path;

use super::catalog::PRODUCT_ROADMAP;

/// Extract section ids from roadmap markdown, in order of appearance.
///
/// Sections are the `###` headings or top-level list items under a `##`
/// heading that mentions "section". Ids are slugified titles.
pub fn parse_sections(content: &str) -> Vec<String> {
    let mut sections: Vec<String> = Vec::new();
    let mut in_sections = false;
    let mut uses_headings = false;

    for raw in content.lines() {
        let line = raw.trim_end();
        let trimmed = line.trim_start();

        if trimmed.starts_with("## ") {
            in_sections = trimmed.to_lowercase().contains("section");
            uses_headings = false;
            continue;
        }
        if trimmed.starts_with("# ") {
            in_sections = false;
            continue;
        }
        if !in_sections {
            continue;
        }

        let title = if let Some(heading) = trimmed.strip_prefix("### ") {
            uses_headings = true;
            Some(strip_numbering(heading))
        } else if !uses_headings && line.len() == trimmed.len() {
            // Only top-level items count; indented ones are details.
            parse_list_item(trimmed)
        } else {
            None
        };

        if let Some(title) = title {
            let name = title.split(" - ").next().unwrap_or_default();
            let name = name.split(": ").next().unwrap_or_default();
            let id = slugify(name);
            if !id.is_empty() && !sections.contains(&id) {
                sections.push(id);
            }
        }
    }

    sections
}

/// Read section ids from `<root>/product/product-roadmap.md`.
///
/// Returns an empty list when the roadmap is missing or unreadable.
pub fn load_sections(root: &Path) -> Vec<String> {
    let path = root.join(PRODUCT_ROADMAP);
    if !path.exists() {
        return Vec::new();
    }
    match std::fs::read_to_string(&path) {
        Ok(content) => {
            let sections = parse_sections(&content);
            tracing::debug!(count = sections.len(), "Loaded roadmap sections");
            sections
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Could not read roadmap");
            Vec::new()
        }
    }
}

/// Lowercase ASCII slug: alphanumeric runs joined by `-`.
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_dash = false;
    for c in title.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }
    slug
}

fn parse_list_item(line: &str) -> Option<String> {
    if let Some(rest) = line.strip_prefix("- ").or_else(|| line.strip_prefix("* ")) {
        Some(strip_markup(rest))
    } else if line.chars().next().is_some_and(|c| c.is_ascii_digit()) && line.contains(". ") {
        line.split_once(". ").map(|(_, rest)| strip_markup(rest))
    } else {
        None
    }
}

fn strip_numbering(heading: &str) -> String {
    let heading = heading.trim();
    let without_number = match heading.split_once(". ") {
        Some((num, rest)) if num.chars().all(|c| c.is_ascii_digit()) => rest,
        _ => heading,
    };
    strip_markup(without_number)
}

fn strip_markup(text: &str) -> String {
    text.trim_start_matches("[ ] ").trim_start_matches("[x] ").replace("**", "").trim().to_string()
}
