//! Text renderers for a finished run: Gantt timeline, process summary,
//! resource-allocation graph and deadlock history. None of them look at
//! anything but the report.

use std::fmt::Write;

use procsim_core::events::EventLog;
use procsim_core::model::{AllocationTable, Outcome, RequestTable};
use procsim_simulator::SimulationReport;

pub fn render_gantt(log: &EventLog) -> String {
    let mut out = String::from("Gantt Chart:\n");
    for (pid, duration) in log.timeline() {
        let _ = write!(out, "| P{pid}({duration}) ");
    }
    out.push_str("|\n");
    out
}

pub fn render_summary(report: &SimulationReport) -> String {
    let mut out = String::from("Process Summary:\n");
    let _ = writeln!(
        out,
        "{:<5}{:>9}{:>7}{:>10}{:>9}{:>12}{:>8}  Outcome",
        "PID", "Arrival", "Burst", "Priority", "Waiting", "Turnaround", "Finish"
    );
    for p in &report.processes {
        let outcome = match p.outcome() {
            Some(Outcome::Completed) => "completed",
            Some(Outcome::Terminated) => "terminated",
            None => "running",
        };
        let _ = writeln!(
            out,
            "{:<5}{:>9}{:>7}{:>10}{:>9}{:>12}{:>8}  {}",
            p.pid,
            p.arrival,
            p.burst,
            p.priority,
            p.waiting(),
            p.turnaround(),
            p.finish_time(),
            outcome
        );
    }

    let _ = writeln!(out, "\nContext Switches: {}", report.counters.context_switches);
    let _ = writeln!(
        out,
        "Deadlocks Detected and Resolved: {}",
        report.counters.deadlocks_detected
    );
    if let (Some(waiting), Some(turnaround)) =
        (report.average_waiting(), report.average_turnaround())
    {
        let _ = writeln!(out, "Average Waiting: {waiting:.2}");
        let _ = writeln!(out, "Average Turnaround: {turnaround:.2}");
    }
    out
}

/// `P -> R` for every declared request, `R -> P` for every held allocation.
pub fn render_rag(requests: &RequestTable, allocations: &AllocationTable) -> String {
    let mut out = String::from("Resource Allocation Graph (RAG):\n");
    for (pid, rids) in requests.iter() {
        for rid in rids {
            let _ = writeln!(out, "P{pid} --> R{rid}");
        }
    }
    for (pid, rids) in allocations.iter() {
        for rid in rids {
            let _ = writeln!(out, "R{rid} --> P{pid}");
        }
    }
    out
}

pub fn render_deadlocks(report: &SimulationReport) -> String {
    let mut out = String::new();
    for record in &report.deadlocks {
        let waiting: Vec<String> = record.report.waiting.iter().map(|p| format!("P{p}")).collect();
        let _ = write!(out, "t={} deadlock among {}", record.report.time, waiting.join(" "));
        match record.terminated {
            Some(pid) => {
                let _ = writeln!(out, " -> terminated P{pid}");
            }
            None => out.push('\n'),
        }
    }
    out
}

/// All sections, in the order an operator reads them.
pub fn render_all(report: &SimulationReport) -> String {
    let mut out = String::new();
    let deadlocks = render_deadlocks(report);
    if !deadlocks.is_empty() {
        out.push_str(&deadlocks);
        out.push('\n');
    }
    out.push_str(&render_gantt(&report.event_log));
    out.push('\n');
    out.push_str(&render_summary(report));
    out.push('\n');
    out.push_str(&render_rag(&report.requests, &report.allocations));
    out
}
