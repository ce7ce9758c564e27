use std::fmt;

use crate::models::{Component, Row, Scores, StudentRecord, MIN_CELLS};

#[derive(Debug, Clone, PartialEq)]
pub enum RowOutcome {
    Valid(StudentRecord),
    /// Fewer than `MIN_CELLS` cells; dropped without a diagnostic.
    Short,
    Invalid(FieldError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub line: usize,
    pub component: Component,
    pub message: String,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Row {} error in {}: {}",
            self.line,
            self.component.field_name(),
            self.message
        )
    }
}

/// Parses a trimmed score cell. Only finite values are accepted.
pub fn parse_score(text: &str) -> Result<f64, String> {
    let value = text
        .trim()
        .parse::<f64>()
        .map_err(|err| err.to_string())?;
    if !value.is_finite() {
        return Err(format!("{value} is not a finite number"));
    }
    Ok(value)
}

pub fn validate(row: &Row) -> RowOutcome {
    if row.cells.len() < MIN_CELLS {
        return RowOutcome::Short;
    }

    let mut scores = Scores::default();
    for component in Component::ALL {
        let text = row.cell(component.column()).unwrap_or_default();
        match parse_score(text) {
            Ok(value) => scores.set(component, value),
            Err(message) => {
                return RowOutcome::Invalid(FieldError {
                    line: row.line,
                    component,
                    message,
                })
            }
        }
    }

    RowOutcome::Valid(StudentRecord {
        line: row.line,
        id: row.id().to_string(),
        student_id: row.student_id().unwrap_or_default().to_string(),
        scores,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(line: usize, cells: &[&str]) -> Row {
        Row::new(line, cells.iter().map(|c| c.to_string()).collect())
    }

    #[test]
    fn parses_full_row() {
        let outcome = validate(&row(
            2,
            &["H1", "x", "y", "2024A7PS001", "10", "20", "15", "8", "9", "30", "83"],
        ));
        let RowOutcome::Valid(record) = outcome else {
            panic!("expected a valid record, got {outcome:?}");
        };
        assert_eq!(record.line, 2);
        assert_eq!(record.id, "H1");
        assert_eq!(record.student_id, "2024A7PS001");
        assert_eq!(record.scores.pre_compre, 9.0);
        assert_eq!(record.scores.total, 83.0);
    }

    #[test]
    fn short_rows_are_skipped_quietly() {
        let outcome = validate(&row(4, &["H1", "x", "y", "2024A7PS001", "10"]));
        assert_eq!(outcome, RowOutcome::Short);
    }

    #[test]
    fn reports_first_bad_field() {
        let outcome = validate(&row(
            7,
            &["H2", "", "", "2024A3PS002", " 4.5 ", "x", "15", "8", "9", "30", "abc"],
        ));
        let RowOutcome::Invalid(err) = outcome else {
            panic!("expected a field error, got {outcome:?}");
        };
        assert_eq!(err.component, Component::MidSem);
        assert!(err.to_string().starts_with("Row 7 error in Mid-Sem: "));
    }

    #[test]
    fn total_field_uses_long_name() {
        let outcome = validate(&row(
            3,
            &["H3", "", "", "2024A3PS003", "1", "2", "3", "4", "5", "6", "abc"],
        ));
        let RowOutcome::Invalid(err) = outcome else {
            panic!("expected a field error, got {outcome:?}");
        };
        assert!(err.to_string().starts_with("Row 3 error in Total (300): "));
    }

    #[test]
    fn non_finite_values_are_rejected() {
        assert!(parse_score("NaN").is_err());
        assert!(parse_score("inf").is_err());
        assert!(parse_score("-infinity").is_err());
        assert_eq!(parse_score(" 12.5 "), Ok(12.5));
        assert!(parse_score("").is_err());
    }
}
