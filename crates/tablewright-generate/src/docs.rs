use std::sync::LazyLock;

use regex::Regex;
use tablewright_core::{BaseKind, ClassDef, Range, Result, SchemaView, SlotDef};

use crate::context::CompileContext;

static NON_ANCHOR_CHARS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\W+").unwrap_or_else(|_| unreachable!("static regex is valid"))
});

/// Render the human-facing reference of every class, sorted by name.
pub fn render_class_descriptions(ctx: &CompileContext<'_>) -> Result<String> {
    let view = ctx.view;
    let mut classes: Vec<&ClassDef> = view.classes().iter().collect();
    classes.sort_by(|a, b| a.name.cmp(&b.name));

    let mut lines = Vec::new();
    lines.push(format!("# {} CSV Models", view.name()));
    lines.push(String::new());
    lines.push("This file is generated from the schema. Do not edit it manually.".to_string());
    lines.push(String::new());
    if let Some(description) = view.description() {
        lines.push(description.to_string());
        lines.push(String::new());
    }

    lines.push("| Contents |".to_string());
    lines.push("| --- |".to_string());
    for class in &classes {
        lines.push(format!("| [{}](#{}) |", class.name, anchor(&class.name)));
    }
    lines.push("| [Prefixes](#prefixes) |".to_string());
    lines.push(String::new());

    for class in &classes {
        push_class_section(&mut lines, ctx, class)?;
        lines.push(String::new());
    }

    lines.push("## Prefixes".to_string());
    lines.push(String::new());
    lines.push("| Prefix | Base URI |".to_string());
    lines.push("| --- | --- |".to_string());
    for (prefix, uri) in view.prefixes() {
        lines.push(format!("| {prefix} | {uri} |"));
    }
    lines.push(String::new());

    Ok(lines.join("\n"))
}

fn push_class_section(
    lines: &mut Vec<String>,
    ctx: &CompileContext<'_>,
    class: &ClassDef,
) -> Result<()> {
    lines.push(format!("## {}", class.name));
    lines.push(String::new());

    if class.is_abstract {
        lines.push("This table is assembled automatically. You cannot edit it yourself.".to_string());
    } else {
        let csv = ctx.layout.csv_path(&class.name);
        let csv = csv.display();
        lines.push(format!("File location: [{csv}](./{csv})"));
    }
    lines.push(String::new());

    if let Some(description) = class.description.as_deref() {
        lines.push(description.to_string());
        lines.push(String::new());
    }

    lines.push("| Column Title | Required | Contains | Multivalued | Description |".to_string());
    lines.push("| --- | --- | --- | --- | --- |".to_string());
    for slot in ctx.view.effective_slots(&class.name)? {
        lines.push(format!(
            "| {} | {} | {} | {} | {} |",
            slot.column_title(),
            yes_no(slot.required),
            range_description(ctx, slot),
            yes_no(slot.multivalued),
            slot_description(slot, &ctx.options.separator),
        ));
    }

    Ok(())
}

fn range_description(ctx: &CompileContext<'_>, slot: &SlotDef) -> String {
    if ctx.synthetic_table(&slot.range).is_some() {
        return format!("{} identifier", slot.range);
    }

    match ctx.view.range_of(slot) {
        Range::Class(class) => format!("[{}](#{}) identifier", class.name, anchor(&class.name)),
        Range::Literal(literal) => match literal.base_kind() {
            Ok(BaseKind::Date) => "Date (YYYY-mm-DD)".to_string(),
            Ok(BaseKind::DateTime) => "Date Time (YYYY-mm-DDTHH:mm:SSZ)".to_string(),
            Ok(BaseKind::Uri) => uri_description(ctx.view, slot),
            Ok(BaseKind::String) if literal.title.is_none() => match slot.pattern.as_deref() {
                Some(pattern) => format!("Text matching the pattern `{}`", escape_cell(pattern)),
                None => "Free Text".to_string(),
            },
            _ => literal.title.clone().unwrap_or_else(|| literal.name.clone()),
        },
        Range::Unresolved => slot.range.clone(),
    }
}

fn uri_description(view: &SchemaView<'_>, slot: &SlotDef) -> String {
    let prefix = slot
        .implicit_prefix
        .as_deref()
        .and_then(|prefix| view.prefixes().get(prefix).map(|uri| (prefix, uri)));
    match prefix {
        Some((prefix, uri)) => format!("[{prefix}]({uri}) identifier slug."),
        None => "URL Persistent Identifier".to_string(),
    }
}

fn slot_description(slot: &SlotDef, separator: &str) -> String {
    let mut description = slot.description.clone().unwrap_or_default();
    if slot.multivalued {
        if !description.is_empty() {
            description.push('\n');
        }
        description.push_str(&format!(
            "Use the `{separator}` symbol to separate multiple values."
        ));
    }
    escape_cell(&description)
}

fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|").replace("\r\n", "<br/>").replace('\n', "<br/>")
}

fn anchor(title: &str) -> String {
    NON_ANCHOR_CHARS.replace_all(&title.to_lowercase(), "").into_owned()
}

fn yes_no(value: bool) -> &'static str {
    if value { "Yes" } else { "No" }
}
