//! Plain-text rendering of the concept view.

use std::fmt::Write as _;

use client_core::{FormMode, NoticeLevel, ViewModel};
use shared::domain::{Action, Concept, ConceptField, ConceptId};

pub fn render(view: &ViewModel) -> String {
    let mut out = String::new();

    if !view.role().is_authenticated() {
        out.push_str("Not logged in. Use: login <username> <password>\n");
        render_notice(view, &mut out);
        return out;
    }

    if view.is_loading() {
        out.push_str("Loading...\n");
        return out;
    }

    let _ = writeln!(out, "Clinical Concepts Dataset (role: {})", view.role());
    let _ = writeln!(
        out,
        "Search: \"{}\"  |  {}",
        view.search_term(),
        sort_label(view.sort_ascending_by_id())
    );
    if let Some(loaded_at) = view.last_loaded_at() {
        let _ = writeln!(out, "Loaded at {}", loaded_at.format("%Y-%m-%d %H:%M:%S UTC"));
    }
    out.push('\n');

    render_list(view, &mut out);

    if view.can(Action::Create) || view.can(Action::Edit) {
        out.push('\n');
        render_form(view, &mut out);
    }
    if view.can(Action::Import) {
        let _ = writeln!(
            out,
            "\nAdmin Controls: {}",
            if view.is_importing() {
                "Importing CSV..."
            } else {
                "import [filename]"
            }
        );
    }

    render_notice(view, &mut out);
    out
}

pub fn sort_label(ascending: bool) -> &'static str {
    if ascending {
        "Sort by ID (Ascending)"
    } else {
        "Sort by ID (Descending)"
    }
}

pub fn render_list(view: &ViewModel, out: &mut String) {
    let concepts = view.visible_concepts();
    if concepts.is_empty() {
        out.push_str("No concepts found\n");
        return;
    }
    for concept in concepts {
        render_concept(concept, out);
    }
}

fn render_concept(concept: &Concept, out: &mut String) {
    let _ = writeln!(out, "{}  {}", concept.concept_id, concept.display_name);
    if !concept.description.is_empty() {
        let _ = writeln!(out, "    {}", concept.description);
    }
    let _ = writeln!(out, "    Alternate Names: {}", concept.alternate_names);
    if !concept.parent_ids.is_empty() {
        let _ = writeln!(out, "    Parents: {}", join_ids(&concept.parent_ids));
    }
    if !concept.child_ids.is_empty() {
        let _ = writeln!(out, "    Children: {}", join_ids(&concept.child_ids));
    }
}

fn render_form(view: &ViewModel, out: &mut String) {
    match view.mode() {
        FormMode::Create => out.push_str("Add New Concept\n"),
        FormMode::Edit(id) => {
            let _ = writeln!(out, "Edit Concept {id}");
        }
    }
    let draft = view.draft();
    for field in ConceptField::ALL {
        let locked = field == ConceptField::ConceptId && view.editing_id().is_some();
        let _ = writeln!(
            out,
            "  {:<16} {}{}",
            format!("{}:", field.label()),
            draft.field(field),
            if locked { " (locked)" } else { "" }
        );
    }
}

fn render_notice(view: &ViewModel, out: &mut String) {
    if let Some(notice) = view.notice() {
        let marker = match notice.level {
            NoticeLevel::Info => "*",
            NoticeLevel::Error => "!",
        };
        let _ = writeln!(out, "\n{marker} {}", notice.message);
    }
}

fn join_ids(ids: &[ConceptId]) -> String {
    ids.iter()
        .map(ConceptId::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}
