use crate::models::{Component, Row, RankingEntry};
use crate::validate::parse_score;

pub const PODIUM_SIZE: usize = 3;

pub fn top3(rows: &[Row], component: Component) -> Vec<RankingEntry> {
    top_n(rows, component, PODIUM_SIZE)
}

/// Highest `limit` scores for one component, best first.
///
/// Rows whose cell is missing or not numeric are left out of the ranking.
/// Equal scores keep their input order.
pub fn top_n(rows: &[Row], component: Component, limit: usize) -> Vec<RankingEntry> {
    let mut candidates: Vec<RankingEntry> = rows
        .iter()
        .filter_map(|row| {
            let score = parse_score(row.cell(component.column())?).ok()?;
            Some(RankingEntry {
                line: row.line,
                id: row.id().to_string(),
                student_id: row.student_id().unwrap_or_default().to_string(),
                score,
            })
        })
        .collect();

    candidates.sort_by(|a, b| b.score.total_cmp(&a.score));
    candidates.truncate(limit);
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(line: usize, student_id: &str, quiz: &str, total: &str) -> Row {
        let cells = [
            "H", "", "", student_id, quiz, "0", "0", "0", "0", "0", total,
        ];
        Row::new(line, cells.iter().map(|c| c.to_string()).collect())
    }

    #[test]
    fn orders_best_first() {
        let rows = vec![
            row(2, "A", "4", "0"),
            row(3, "B", "9", "0"),
            row(4, "C", "7", "0"),
            row(5, "D", "1", "0"),
        ];
        let top = top3(&rows, Component::Quiz);
        let ids: Vec<&str> = top.iter().map(|e| e.student_id.as_str()).collect();
        assert_eq!(ids, vec!["B", "C", "A"]);
        assert!(top.windows(2).all(|pair| pair[0].score >= pair[1].score));
    }

    #[test]
    fn fewer_candidates_than_podium() {
        let rows = vec![row(2, "2024A7PS001", "10", "83")];
        let top = top3(&rows, Component::Quiz);
        assert_eq!(top.len(), 1);
        assert_eq!(top[0].student_id, "2024A7PS001");
        assert_eq!(top[0].score, 10.0);

        assert!(top3(&[], Component::Total).is_empty());
    }

    #[test]
    fn unparseable_cells_are_dropped() {
        let rows = vec![
            row(2, "A", "abc", "50"),
            row(3, "B", "5", "x"),
            Row::new(4, vec!["H".into(), "".into()]),
        ];
        let quiz = top3(&rows, Component::Quiz);
        assert_eq!(quiz.len(), 1);
        assert_eq!(quiz[0].student_id, "B");

        let total = top3(&rows, Component::Total);
        assert_eq!(total.len(), 1);
        assert_eq!(total[0].student_id, "A");
    }

    #[test]
    fn ties_keep_input_order() {
        let rows = vec![
            row(2, "A", "5", "0"),
            row(3, "B", "8", "0"),
            row(4, "C", "5", "0"),
            row(5, "D", "5", "0"),
        ];
        let first = top3(&rows, Component::Quiz);
        let second = top3(&rows, Component::Quiz);
        assert_eq!(first, second);
        let ids: Vec<&str> = first.iter().map(|e| e.student_id.as_str()).collect();
        assert_eq!(ids, vec!["B", "A", "C"]);
    }

    #[test]
    fn custom_limit() {
        let rows: Vec<Row> = (0..6)
            .map(|i| row(i + 2, &format!("S{i}"), &i.to_string(), "0"))
            .collect();
        assert_eq!(top_n(&rows, Component::Quiz, 5).len(), 5);
        assert_eq!(top_n(&rows, Component::Quiz, 10).len(), 6);
        assert_eq!(top_n(&rows, Component::Quiz, 0).len(), 0);
    }
}
