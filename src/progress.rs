use crate::models::LeadSnapshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardMode {
    FirstRun,
    Tracking,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProgressView {
    pub mode: BoardMode,
    pub total_target: u64,
    pub achieved_leads: u64,
    pub remaining: u64,
    pub exceeded: u64,
    pub progress_percent: f64,
    pub can_undo: bool,
    pub can_redo: bool,
}

impl ProgressView {
    pub fn from_snapshot(snapshot: &LeadSnapshot) -> Self {
        let target = snapshot.total_target;
        let achieved = snapshot.achieved_leads;
        Self {
            mode: if target == 0 {
                BoardMode::FirstRun
            } else {
                BoardMode::Tracking
            },
            total_target: target,
            achieved_leads: achieved,
            remaining: remaining(target, achieved),
            exceeded: exceeded(target, achieved),
            progress_percent: progress_percent(target, achieved),
            can_undo: !snapshot.history_stack.is_empty(),
            can_redo: !snapshot.redo_stack.is_empty(),
        }
    }

    pub fn goal_met(&self) -> bool {
        self.achieved_leads >= self.total_target
    }

    pub fn percent_label(&self) -> String {
        format!("{:.1}%", self.progress_percent)
    }
}

pub fn remaining(target: u64, achieved: u64) -> u64 {
    target.saturating_sub(achieved)
}

pub fn exceeded(target: u64, achieved: u64) -> u64 {
    achieved.saturating_sub(target)
}

pub fn progress_percent(target: u64, achieved: u64) -> f64 {
    if target == 0 {
        return 0.0;
    }
    (achieved as f64 / target as f64 * 100.0).min(100.0)
}

pub fn format_count(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}
