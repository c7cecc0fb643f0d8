//! Plain-text rendering of a pass outcome.

use std::fmt::Write;

use carve_core::{FreeTime, PassOutcome, SlotKind};

pub fn render_outcome(out: &PassOutcome, explain: bool) -> String {
    let mut s = String::new();

    let mut order: Vec<usize> = (0..out.allocations.len()).collect();
    order.sort_by_key(|&i| out.allocations[i].interval.start());

    let _ = writeln!(s, "## Allocations\n");
    if order.is_empty() {
        let _ = writeln!(s, "(none)");
    }
    for i in order {
        let a = &out.allocations[i];
        let e = &out.explanations[i];
        let _ = writeln!(
            s,
            "- {}-{} | {} | {} | {} min | score={:.2}{}",
            a.interval.start().format("%H:%M"),
            a.interval.end().format("%H:%M"),
            a.goal_id,
            kind_label(a.source_kind),
            a.interval.duration_minutes(),
            e.scored.score,
            if e.shrunk_to_commitment { " (shortened)" } else { "" }
        );
        if explain {
            for f in &e.scored.explanation {
                let _ = writeln!(
                    s,
                    "    {:?}: raw={:.3} x weight={:.2} = {:.3}",
                    f.factor, f.raw, f.weight, f.contribution
                );
            }
        }
    }

    let _ = writeln!(s, "\n## Remaining\n");
    for r in &out.remaining {
        let _ = writeln!(
            s,
            "- {}: allocated {} of {} min{}",
            r.goal_id,
            r.allocated_minutes,
            r.requested_minutes,
            if r.unsatisfied_minutes > 0 {
                format!(" ({} min unsatisfied)", r.unsatisfied_minutes)
            } else {
                String::new()
            }
        );
    }

    if !out.warnings.is_empty() {
        let _ = writeln!(s, "\n## Warnings\n");
        for w in &out.warnings {
            let _ = writeln!(s, "- {w}");
        }
    }

    let _ = writeln!(s, "\n{}", out.summary());
    s
}

pub fn render_free_time(ft: &FreeTime) -> String {
    let mut s = String::new();
    let span = ft.bounds().span;
    let _ = writeln!(
        s,
        "Day {} ({}), awake {} -> {}",
        ft.bounds().day,
        ft.bounds().weekday(),
        span.start().format("%H:%M"),
        span.end().format("%H:%M")
    );
    for kind in [SlotKind::Free, SlotKind::Work] {
        let _ = writeln!(s, "\n{} ({} min):", kind_label(kind), ft.total_minutes(kind));
        for iv in ft.sequence(kind) {
            let _ = writeln!(s, "- {}-{}", iv.start().format("%H:%M"), iv.end().format("%H:%M"));
        }
    }
    for w in ft.warnings() {
        let _ = writeln!(s, "warning: {w}");
    }
    s
}

fn kind_label(kind: SlotKind) -> &'static str {
    match kind {
        SlotKind::Free => "free",
        SlotKind::Work => "work",
    }
}
