use mgm_model::{Report, ValidationIssue};

/// Text shown next to the table after validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Summary {
    pub invalid_date_count: usize,
    /// One line per cell issue, in collection order.
    pub details: Vec<String>,
    /// Count line followed by the details; empty when no cell has an issue.
    pub text: String,
}

impl Summary {
    pub fn is_empty(&self) -> bool {
        self.details.is_empty()
    }
}

pub fn summarize(report: &Report) -> Summary {
    let details: Vec<String> = report.cell_issues().map(ValidationIssue::message).collect();
    let invalid_date_count = report
        .cell_issues()
        .filter(|issue| issue.is_date_issue())
        .count();

    let text = if details.is_empty() {
        String::new()
    } else {
        let mut text = format!("Number of cells with invalid date: {invalid_date_count}");
        for line in &details {
            text.push('\n');
            text.push_str(line);
        }
        text
    };

    Summary {
        invalid_date_count,
        details,
        text,
    }
}

/// `Row R, Column C: before -> after` per normalization rewrite.
pub fn correction_lines(report: &Report) -> Vec<String> {
    report
        .corrections
        .iter()
        .map(|c| format!("Row {}, Column {}: {} -> {}", c.row, c.field, c.before, c.after))
        .collect()
}
