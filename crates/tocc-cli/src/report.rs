//! Text rendering of runs, steps and scenario lists

use crate::scenarios::Scenario;
use tocc_scheduler::{FinalHistory, OpKind, ScheduleOutcome, Step, TimestampScheduler};

fn join<T: ToString>(items: impl IntoIterator<Item = T>, sep: &str) -> String {
    items
        .into_iter()
        .map(|item| item.to_string())
        .collect::<Vec<_>>()
        .join(sep)
}

fn or_empty(text: String) -> String {
    if text.is_empty() {
        "(empty)".to_string()
    } else {
        text
    }
}

/// Describe one step, with the scheduler state right after it
pub fn narrate_step(step: &Step, state: &TimestampScheduler) -> String {
    let op = &step.operation;
    let mut lines = vec![format!("Step {}: {}", step.index, op)];

    match &step.outcome {
        ScheduleOutcome::Accepted => {
            let ts = state
                .transaction(op.tx())
                .map(|t| t.timestamp())
                .unwrap_or_default();
            let item = op.key().and_then(|key| state.data_item(key.as_str()));
            let detail = match (op.kind(), item) {
                (OpKind::Read(key), Some(item)) => format!(
                    "TS={} >= WTS({})={}, RTS({}) = {}",
                    ts, key, item.wts, key, item.rts
                ),
                (OpKind::Write(key), Some(item)) => format!(
                    "TS={} >= RTS({})={}, WTS({}) = {}",
                    ts, key, item.rts, key, item.wts
                ),
                _ => format!("{} committed (TS={})", op.tx(), ts),
            };
            lines.push(format!("  accepted: {}", detail));
        }
        ScheduleOutcome::Aborted(info) => {
            lines.push(format!(
                "  aborted {} (TS={}, incarnation {}): {}",
                info.tx, info.timestamp, info.incarnation, info.reason
            ));
            lines.push(format!("  removed from history: {}", join(&info.purged, " ")));
            lines.push(format!(
                "  {} restarts with a new timestamp on its next operation",
                info.tx
            ));
        }
    }

    lines.push(format!("  history: {}", or_empty(state.history().to_string())));
    lines.push(format!(
        "  items: {}",
        or_empty(join(state.data_items().iter(), ", "))
    ));
    lines.join("\n")
}

/// Render the final state of a run
pub fn render_report(result: &FinalHistory) -> String {
    let mut lines = vec!["Final history:".to_string()];
    if result.history.is_empty() {
        lines.push("  (empty)".to_string());
    }
    lines.extend(
        result
            .history
            .iter()
            .enumerate()
            .map(|(i, op)| format!("  {:2}. {}", i + 1, op)),
    );

    lines.push("Data items:".to_string());
    if result.items.is_empty() {
        lines.push("  (none)".to_string());
    }
    lines.extend(result.items.iter().map(|item| format!("  {}", item)));

    lines.push("Transactions:".to_string());
    if result.transactions.is_empty() {
        lines.push("  (none)".to_string());
    }
    lines.extend(result.transactions.iter().map(|txn| {
        format!(
            "  {}: TS={}, incarnation={}, status={}",
            txn.id(),
            txn.timestamp(),
            txn.incarnation(),
            txn.state()
        )
    }));

    if !result.abort_counts.is_empty() {
        lines.push("Aborts:".to_string());
        lines.extend(
            result
                .abort_counts
                .iter()
                .map(|(tx, count)| format!("  {}: {} abort(s)", tx, count)),
        );
    }

    let stats = result.stats;
    lines.push(format!(
        "Stats: {} processed, {} accepted, {} abort(s), {} purged",
        stats.processed, stats.accepted, stats.aborts, stats.purged
    ));
    lines.join("\n")
}

/// List scenarios with their operations
pub fn render_scenarios(scenarios: &[Scenario]) -> String {
    let width = scenarios.iter().map(|s| s.name.len()).max().unwrap_or(0);
    let lines: Vec<String> = scenarios
        .iter()
        .map(|s| {
            format!(
                "{:width$}  {}\n{:width$}  {}",
                s.name,
                s.title,
                "",
                s.operations,
                width = width
            )
        })
        .collect();
    lines.join("\n")
}
