//! Reader for concept CSV exports.
//!
//! Layout: a header line, then
//! `conceptId,displayName,description,parentIds,childIds,alternateNames`
//! with `;`-separated id lists. A field containing a comma must be wrapped
//! in double quotes (`""` inside quotes is a literal quote). Records do not
//! span lines.

use shared::domain::{Concept, ConceptId};

const COLUMNS: usize = 6;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowError {
    /// 1-based, counting the header.
    pub line: usize,
    pub reason: String,
}

#[derive(Debug, Default)]
pub struct ParsedRows {
    pub concepts: Vec<Concept>,
    pub errors: Vec<RowError>,
}

pub fn parse_concepts_csv(text: &str) -> ParsedRows {
    let mut parsed = ParsedRows::default();

    for (index, line) in text.lines().enumerate().skip(1) {
        let line = line.trim_end_matches('\r');
        if line.trim().is_empty() {
            continue;
        }

        let columns = match split_record(line) {
            Ok(columns) => columns,
            Err(reason) => {
                parsed.errors.push(RowError {
                    line: index + 1,
                    reason,
                });
                continue;
            }
        };
        if columns.len() != COLUMNS {
            parsed.errors.push(RowError {
                line: index + 1,
                reason: format!("expected {COLUMNS} columns, found {}", columns.len()),
            });
            continue;
        }
        if columns[0].trim().is_empty() {
            parsed.errors.push(RowError {
                line: index + 1,
                reason: "missing concept id".to_string(),
            });
            continue;
        }

        parsed.concepts.push(Concept {
            concept_id: ConceptId::from(columns[0].trim()),
            display_name: columns[1].trim().to_string(),
            description: columns[2].trim().to_string(),
            parent_ids: id_list(&columns[3]),
            child_ids: id_list(&columns[4]),
            alternate_names: columns[5].trim().to_string(),
        });
    }

    parsed
}

fn split_record(line: &str) -> Result<Vec<String>, String> {
    let mut columns = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match (c, in_quotes) {
            ('"', true) if chars.peek() == Some(&'"') => {
                chars.next();
                field.push('"');
            }
            ('"', true) => in_quotes = false,
            ('"', false) if field.trim().is_empty() => {
                field.clear();
                in_quotes = true;
            }
            (',', false) => columns.push(std::mem::take(&mut field)),
            _ => field.push(c),
        }
    }
    if in_quotes {
        return Err("unterminated quoted field".to_string());
    }
    columns.push(field);
    Ok(columns)
}

fn id_list(raw: &str) -> Vec<ConceptId> {
    raw.split(';')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(ConceptId::from)
        .collect()
}
