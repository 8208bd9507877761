// ── CSV export ──
//
// Serializes the loaded row set. Every value that comes from the remote
// record is escaped (embedded `"` doubled) and wrapped in quotes, in every
// column of every view. Header labels and formatted dates are produced
// locally from a fixed alphabet and are written bare.

use crate::model::format_date;

/// One exported cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CsvField {
    /// Remote text, always quoted.
    Text(String),
    /// Locally formatted value, written as is.
    Bare(String),
}

impl CsvField {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    /// A creation date in the fixed export format.
    pub fn date(raw: Option<&str>) -> Self {
        Self::Bare(format_date(raw))
    }

    fn render(&self) -> String {
        match self {
            Self::Text(value) => quote(value),
            Self::Bare(value) => value.clone(),
        }
    }
}

/// A labelled column and how to pull its cell out of a row.
pub struct Column<R> {
    pub label: &'static str,
    pub extract: fn(&R) -> CsvField,
}

impl<R> Clone for Column<R> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<R> Copy for Column<R> {}

impl<R> std::fmt::Debug for Column<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Column").field("label", &self.label).finish()
    }
}

/// A rendered export, ready to be handed to a file effect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvDocument {
    pub file_name: String,
    pub body: String,
}

/// Escape embedded quotes and wrap the whole field in quotes.
pub fn quote(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

/// Render `rows` under `columns`. `None` when there is nothing to export.
pub fn render<R>(rows: &[R], columns: &[Column<R>]) -> Option<String> {
    if rows.is_empty() {
        return None;
    }

    let header = columns
        .iter()
        .map(|c| c.label)
        .collect::<Vec<_>>()
        .join(",");

    let lines = rows.iter().map(|row| {
        columns
            .iter()
            .map(|c| (c.extract)(row).render())
            .collect::<Vec<_>>()
            .join(",")
    });

    Some(
        std::iter::once(header)
            .chain(lines)
            .collect::<Vec<_>>()
            .join("\n"),
    )
}

/// Render into a named document. `None` (no file) for an empty row set.
pub fn export<R>(rows: &[R], columns: &[Column<R>], file_name: &str) -> Option<CsvDocument> {
    render(rows, columns).map(|body| CsvDocument {
        file_name: file_name.to_owned(),
        body,
    })
}

/// Split an exported document back into records, undoing the quoting
/// rule: quoted fields may contain commas, newlines and doubled quotes.
pub fn parse_document(input: &str) -> Vec<Vec<String>> {
    let mut records = Vec::new();
    let mut record = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    field.push('"');
                    chars.next();
                }
                '"' => in_quotes = false,
                other => field.push(other),
            }
            continue;
        }

        match c {
            '"' => in_quotes = true,
            ',' => record.push(std::mem::take(&mut field)),
            '\n' => {
                record.push(std::mem::take(&mut field));
                records.push(std::mem::take(&mut record));
            }
            other => field.push(other),
        }
    }

    if !field.is_empty() || !record.is_empty() {
        record.push(field);
        records.push(record);
    }
    records
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    struct Item {
        label: String,
        created: Option<String>,
    }

    fn columns() -> Vec<Column<Item>> {
        vec![
            Column {
                label: "Label",
                extract: |i| CsvField::text(i.label.clone()),
            },
            Column {
                label: "Created At",
                extract: |i| CsvField::date(i.created.as_deref()),
            },
        ]
    }

    #[test]
    fn doubles_embedded_quotes() {
        assert_eq!(quote(r#"He said "hi""#), r#""He said ""hi""""#);
    }

    #[test]
    fn empty_rows_produce_nothing() {
        let rows: Vec<Item> = Vec::new();
        assert!(render(&rows, &columns()).is_none());
        assert!(export(&rows, &columns(), "x.csv").is_none());
    }

    #[test]
    fn header_then_quoted_text_then_bare_date() {
        let rows = vec![Item {
            label: "a, b".into(),
            created: Some("2024-01-01T00:00:00Z".into()),
        }];
        let out = render(&rows, &columns());
        assert_eq!(
            out.as_deref(),
            Some("Label,Created At\n\"a, b\",01-Jan-2024")
        );
    }

    #[test]
    fn text_without_specials_is_still_quoted() {
        let rows = vec![Item {
            label: "plain".into(),
            created: None,
        }];
        let out = render(&rows, &columns()).unwrap_or_default();
        assert!(out.ends_with("\"plain\",Invalid Date"), "got: {out}");
    }

    #[test]
    fn round_trip_recovers_original_text() {
        let tricky = [
            r#"He said "hi""#,
            "comma, separated",
            "multi\nline",
            "\"\"",
            "",
        ];
        let rows: Vec<Item> = tricky
            .iter()
            .map(|s| Item {
                label: (*s).to_owned(),
                created: Some("2024-06-15T08:00:00Z".into()),
            })
            .collect();

        let doc = render(&rows, &columns()).unwrap_or_default();
        let parsed = parse_document(&doc);

        assert_eq!(parsed.len(), tricky.len() + 1);
        assert_eq!(parsed[0], vec!["Label", "Created At"]);
        for (record, original) in parsed[1..].iter().zip(tricky) {
            assert_eq!(record[0], original);
            assert_eq!(record[1], "15-Jun-2024");
        }
    }
}
