use clap::ValueEnum;
use serde::{Deserialize, Serialize};

pub const ID_COLUMN: usize = 0;
pub const STUDENT_ID_COLUMN: usize = 3;
/// Rows shorter than this are skipped before any field is parsed.
pub const MIN_CELLS: usize = 11;

/// One raw table row together with its 1-based line in the source table.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub line: usize,
    pub cells: Vec<String>,
}

impl Row {
    pub fn new(line: usize, cells: Vec<String>) -> Self {
        Self { line, cells }
    }

    pub fn cell(&self, index: usize) -> Option<&str> {
        self.cells.get(index).map(|cell| cell.trim())
    }

    pub fn id(&self) -> &str {
        self.cell(ID_COLUMN).unwrap_or_default()
    }

    pub fn student_id(&self) -> Option<&str> {
        self.cell(STUDENT_ID_COLUMN)
    }
}

#[derive(Debug, Clone)]
pub struct Dataset {
    pub header: Row,
    pub rows: Vec<Row>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Component {
    Quiz,
    MidSem,
    LabTest,
    WeeklyLabs,
    PreCompre,
    Compre,
    Total,
}

impl Component {
    pub const ALL: [Component; 7] = [
        Component::Quiz,
        Component::MidSem,
        Component::LabTest,
        Component::WeeklyLabs,
        Component::PreCompre,
        Component::Compre,
        Component::Total,
    ];

    pub fn column(self) -> usize {
        match self {
            Component::Quiz => 4,
            Component::MidSem => 5,
            Component::LabTest => 6,
            Component::WeeklyLabs => 7,
            Component::PreCompre => 8,
            Component::Compre => 9,
            Component::Total => 10,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Component::Quiz => "Quiz",
            Component::MidSem => "Mid-Sem",
            Component::LabTest => "Lab Test",
            Component::WeeklyLabs => "Weekly Labs",
            Component::PreCompre => "Pre-Compre",
            Component::Compre => "Compre",
            Component::Total => "Total",
        }
    }

    /// Name used in per-field parse diagnostics.
    pub fn field_name(self) -> &'static str {
        match self {
            Component::Total => "Total (300)",
            other => other.label(),
        }
    }
}

/// Seven component values, used both for parsed scores and for averages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Scores {
    pub quiz: f64,
    pub mid_sem: f64,
    pub lab_test: f64,
    pub weekly_labs: f64,
    pub pre_compre: f64,
    pub compre: f64,
    pub total: f64,
}

impl Scores {
    pub fn get(&self, component: Component) -> f64 {
        match component {
            Component::Quiz => self.quiz,
            Component::MidSem => self.mid_sem,
            Component::LabTest => self.lab_test,
            Component::WeeklyLabs => self.weekly_labs,
            Component::PreCompre => self.pre_compre,
            Component::Compre => self.compre,
            Component::Total => self.total,
        }
    }

    pub fn set(&mut self, component: Component, value: f64) {
        let slot = match component {
            Component::Quiz => &mut self.quiz,
            Component::MidSem => &mut self.mid_sem,
            Component::LabTest => &mut self.lab_test,
            Component::WeeklyLabs => &mut self.weekly_labs,
            Component::PreCompre => &mut self.pre_compre,
            Component::Compre => &mut self.compre,
            Component::Total => &mut self.total,
        };
        *slot = value;
    }

    /// Sum of the graded components. Pre-Compre is tracked but not part of the total.
    pub fn calculated_total(&self) -> f64 {
        self.quiz + self.mid_sem + self.lab_test + self.weekly_labs + self.compre
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StudentRecord {
    pub line: usize,
    pub id: String,
    pub student_id: String,
    pub scores: Scores,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AggregateResult {
    pub count: usize,
    pub averages: Scores,
    pub mismatches: Vec<String>,
    pub skipped: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankingEntry {
    pub line: usize,
    pub id: String,
    pub student_id: String,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BranchRule {
    pub label: String,
    pub pattern: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ComponentRanking {
    pub component: Component,
    pub entries: Vec<RankingEntry>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BranchReport {
    pub name: String,
    pub summary: AggregateResult,
    pub rankings: Vec<ComponentRanking>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ClassReport {
    pub summary: AggregateResult,
    pub rankings: Vec<ComponentRanking>,
    pub branches: Vec<BranchReport>,
}
