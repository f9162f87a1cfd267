//! Minimum-cost assignment solver.
//!
//! A primal-dual Hungarian algorithm over an `i64` cost matrix, O(n^3)
//! overall: matrix reduction, an initial feasible dual solution, a greedy
//! zero-slack matching, then one augmenting phase per remaining unmatched
//! row. On top of the standard solver sits
//! [`HungarianAlgorithm::next_best_solution`], which re-roots a single phase
//! at row zero after forbidding its current column; the search engine uses it to
//! enumerate alternative assignments lazily instead of solving from scratch.
//!
//! Cells may hold the forbidden sentinel; the solver treats it as a plain
//! (very large) cost, and callers judge whether a returned assignment
//! actually avoids forbidden cells.

use super::cost::FORBIDDEN;

const NONE: usize = usize::MAX;

pub(crate) struct HungarianAlgorithm {
    /// Reduced cost matrix, destructively updated. Callers keep their own
    /// pristine copy for scoring.
    cost: Vec<Vec<i64>>,
    dim: usize,
    labels_row: Vec<i64>,
    labels_col: Vec<i64>,
    min_slack_value_by_col: Vec<i64>,
    min_slack_row_by_col: Vec<usize>,
    committed_rows: Vec<bool>,
    parent_row_by_committed_col: Vec<usize>,
    match_col_by_row: Vec<usize>,
    match_row_by_col: Vec<usize>,
}

impl HungarianAlgorithm {
    /// Build a solver over the given matrix, padding it square with zero
    /// rows/columns when necessary.
    pub fn new(matrix: &[Vec<i64>]) -> Self {
        let rows = matrix.len();
        let cols = matrix.iter().map(Vec::len).max().unwrap_or(0);
        let dim = rows.max(cols);
        let mut cost = vec![vec![0_i64; dim]; dim];
        for (i, row) in matrix.iter().enumerate() {
            cost[i][..row.len()].copy_from_slice(row);
        }
        Self {
            cost,
            dim,
            labels_row: vec![0; dim],
            labels_col: vec![0; dim],
            min_slack_value_by_col: vec![0; dim],
            min_slack_row_by_col: vec![NONE; dim],
            committed_rows: vec![false; dim],
            parent_row_by_committed_col: vec![NONE; dim],
            match_col_by_row: vec![NONE; dim],
            match_row_by_col: vec![NONE; dim],
        }
    }

    /// Solve and return the matched column for every row.
    pub fn execute(&mut self) -> Vec<usize> {
        self.reduce();
        self.compute_initial_feasible_solution();
        self.greedy_match();
        while let Some(row) = self.fetch_unmatched_row() {
            self.initialize_phase(row);
            self.execute_phase();
        }
        self.match_col_by_row.clone()
    }

    /// Forbid row zero's current column and re-run a single phase rooted at
    /// row zero, producing the cheapest assignment that routes row zero
    /// elsewhere. Returns `None` once row zero has no assignment to vary.
    ///
    /// The forbidding writes the sentinel into this solver's own matrix; the
    /// caller decides against its pristine matrix whether the new assignment
    /// is still genuinely legal.
    pub fn next_best_solution(&mut self) -> Option<Vec<usize>> {
        if self.dim == 0 {
            return None;
        }
        let assigned = self.match_col_by_row[0];
        if assigned == NONE {
            return None;
        }
        self.cost[0][assigned] = FORBIDDEN;
        self.match_col_by_row[0] = NONE;
        self.match_row_by_col[assigned] = NONE;
        self.initialize_phase(0);
        self.execute_phase();
        if self.match_col_by_row[0] == NONE {
            return None;
        }
        Some(self.match_col_by_row.clone())
    }

    /// Subtract each row's minimum from the row, then each column's minimum
    /// from the column.
    fn reduce(&mut self) {
        for row in &mut self.cost {
            let min = row.iter().copied().min().unwrap_or(0);
            for cell in row.iter_mut() {
                *cell -= min;
            }
        }
        for j in 0..self.dim {
            let min = (0..self.dim).map(|i| self.cost[i][j]).min().unwrap_or(0);
            for i in 0..self.dim {
                self.cost[i][j] -= min;
            }
        }
    }

    fn compute_initial_feasible_solution(&mut self) {
        for j in 0..self.dim {
            self.labels_col[j] = (0..self.dim).map(|i| self.cost[i][j]).min().unwrap_or(0);
        }
    }

    fn greedy_match(&mut self) {
        for i in 0..self.dim {
            for j in 0..self.dim {
                if self.match_col_by_row[i] == NONE
                    && self.match_row_by_col[j] == NONE
                    && self.cost[i][j] - self.labels_row[i] - self.labels_col[j] == 0
                {
                    self.set_match(i, j);
                }
            }
        }
    }

    fn fetch_unmatched_row(&self) -> Option<usize> {
        self.match_col_by_row.iter().position(|&c| c == NONE)
    }

    fn initialize_phase(&mut self, row: usize) {
        self.committed_rows.fill(false);
        self.parent_row_by_committed_col.fill(NONE);
        self.committed_rows[row] = true;
        for j in 0..self.dim {
            self.min_slack_value_by_col[j] =
                self.cost[row][j] - self.labels_row[row] - self.labels_col[j];
            self.min_slack_row_by_col[j] = row;
        }
    }

    /// Grow an alternating tree from the phase root until an augmenting path
    /// to an unmatched column is found, adjusting dual labels as needed.
    fn execute_phase(&mut self) {
        loop {
            let mut min_slack_row = NONE;
            let mut min_slack_col = NONE;
            let mut min_slack = i64::MAX;
            for j in 0..self.dim {
                if self.parent_row_by_committed_col[j] == NONE
                    && self.min_slack_value_by_col[j] < min_slack
                {
                    min_slack = self.min_slack_value_by_col[j];
                    min_slack_row = self.min_slack_row_by_col[j];
                    min_slack_col = j;
                }
            }
            if min_slack > 0 {
                self.update_labeling(min_slack);
            }
            self.parent_row_by_committed_col[min_slack_col] = min_slack_row;
            let matched_row = self.match_row_by_col[min_slack_col];
            if matched_row == NONE {
                // Augment along the alternating path back to the root.
                let mut committed_col = min_slack_col;
                let mut parent_row = self.parent_row_by_committed_col[committed_col];
                loop {
                    let temp = self.match_col_by_row[parent_row];
                    self.set_match(parent_row, committed_col);
                    if temp == NONE {
                        return;
                    }
                    committed_col = temp;
                    parent_row = self.parent_row_by_committed_col[committed_col];
                }
            }
            self.committed_rows[matched_row] = true;
            for j in 0..self.dim {
                if self.parent_row_by_committed_col[j] == NONE {
                    let slack =
                        self.cost[matched_row][j] - self.labels_row[matched_row] - self.labels_col[j];
                    if self.min_slack_value_by_col[j] > slack {
                        self.min_slack_value_by_col[j] = slack;
                        self.min_slack_row_by_col[j] = matched_row;
                    }
                }
            }
        }
    }

    fn update_labeling(&mut self, slack: i64) {
        for i in 0..self.dim {
            if self.committed_rows[i] {
                self.labels_row[i] += slack;
            }
        }
        for j in 0..self.dim {
            if self.parent_row_by_committed_col[j] == NONE {
                self.min_slack_value_by_col[j] -= slack;
            } else {
                self.labels_col[j] -= slack;
            }
        }
    }

    fn set_match(&mut self, row: usize, col: usize) {
        self.match_col_by_row[row] = col;
        self.match_row_by_col[col] = row;
    }
}
