use tracing::{debug, warn};

use crate::models::{AggregateResult, Component, Row, Scores};
use crate::validate::{validate, RowOutcome};

/// Largest gap between the summed components and the reported total that is
/// still treated as rounding noise.
pub const TOTAL_TOLERANCE: f64 = 0.05;

pub fn aggregate(rows: &[Row]) -> AggregateResult {
    let mut sums = Scores::default();
    let mut result = AggregateResult::default();

    for row in rows {
        let record = match validate(row) {
            RowOutcome::Valid(record) => record,
            RowOutcome::Short => {
                debug!(line = row.line, cells = row.cells.len(), "skipping short row");
                continue;
            }
            RowOutcome::Invalid(err) => {
                warn!(line = err.line, field = err.component.field_name(), "{}", err);
                result.skipped.push(err.to_string());
                continue;
            }
        };

        let calculated = record.scores.calculated_total();
        let total = record.scores.total;
        if (calculated - total).abs() > TOTAL_TOLERANCE {
            result.mismatches.push(format!(
                "Row {} (ID {}): calculated {:.2} != total {:.2}",
                record.line, record.id, calculated, total
            ));
        }

        for component in Component::ALL {
            sums.set(component, sums.get(component) + record.scores.get(component));
        }
        result.count += 1;
    }

    if result.count > 0 {
        let count = result.count as f64;
        for component in Component::ALL {
            result.averages.set(component, sums.get(component) / count);
        }
    }

    result
}
