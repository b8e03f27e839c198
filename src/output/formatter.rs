use chrono::{Duration, Utc};
use owo_colors::OwoColorize;
use std::io::IsTerminal;
use terminal_size::{terminal_size, Width};

use crate::approval::{ApprovalStatus, DeterminationRecord, WalletEntry};
use crate::refund::{Money, RefundDetermination};
use crate::scoring::PerformanceScore;

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Format a percentage with at most two decimals and no trailing zeros
/// ("89.33%", "42.5%", "100%")
pub fn format_percent(value: f64) -> String {
    let formatted = format!("{:.2}", value);
    let trimmed = formatted.trim_end_matches('0').trim_end_matches('.');
    format!("{}%", trimmed)
}

fn format_status(status: ApprovalStatus, use_colors: bool) -> String {
    let label = status.to_string();
    if !use_colors {
        return label;
    }
    match status {
        ApprovalStatus::Pending => label.yellow().to_string(),
        ApprovalStatus::Approved => label.green().to_string(),
        ApprovalStatus::Rejected => label.red().to_string(),
    }
}

/// Format a performance score with one line per component
pub fn format_performance(score: &PerformanceScore, use_colors: bool) -> String {
    let header = format!("Performance score: {:.1}", score.value);
    let mut lines = vec![if use_colors {
        header.bold().to_string()
    } else {
        header
    }];

    for c in &score.breakdown {
        let earned = match c.earned {
            Some(points) => format!("{}/{}", points, c.max_points),
            None => "missing".to_string(),
        };
        let line = format!(
            "  {:<24} {:>3}%  {:>12}  -> {:.2}",
            c.title, c.weight, earned, c.contribution
        );
        if use_colors && c.earned.is_none() {
            lines.push(line.red().to_string());
        } else {
            lines.push(line);
        }
    }

    lines.join("\n")
}

/// Format a refund determination (multi-line)
pub fn format_determination(determination: &RefundDetermination, use_colors: bool) -> String {
    let mut lines = vec![
        format!("  Band: {}", determination.band),
        format!("  Refund rate: {}", format_percent(determination.percentage)),
        format!(
            "  Refund amount: {} of {}",
            determination.amount, determination.paid_fee
        ),
    ];
    if determination.scholarship_bonus_percent > 0.0 {
        lines.push(format!(
            "  Scholarship bonus: {}",
            format_percent(determination.scholarship_bonus_percent)
        ));
    }
    let review = if determination.requires_review {
        "required"
    } else {
        "not required"
    };
    lines.push(format!("  Manual review: {}", review));

    if use_colors {
        lines[2] = lines[2].bold().to_string();
    }
    lines.join("\n")
}

/// Format a stored record with its approval state
pub fn format_record_detail(record: &DeterminationRecord, use_colors: bool) -> String {
    let mut out = format!(
        "Determination {}\n  Student: {}\n  Course: {}\n  Score: {:.1}\n  Status: {}",
        record.id,
        record.student_id,
        record.course_id,
        record.score.value,
        format_status(record.status, use_colors),
    );
    if let Some(ref by) = record.decided_by {
        out.push_str(&format!("\n  Decided by: {}", by));
    }
    if let Some(payout) = record.effective_payout() {
        out.push_str(&format!("\n  Payout: {}", payout));
    }
    out.push('\n');
    out.push_str(&format_determination(&record.determination, use_colors));
    out
}

/// Get terminal width, defaulting to None for pipes (unlimited)
fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

/// Shorten text to `max_width` characters, marking the cut with "..."
/// when there is room for it
fn truncate(text: &str, max_width: usize) -> String {
    if text.chars().count() <= max_width {
        return text.to_string();
    }
    let ellipsis = max_width > 3;
    let keep = if ellipsis { max_width - 3 } else { max_width };
    let mut out: String = text.chars().take(keep).collect();
    if ellipsis {
        out.push_str("...");
    }
    out
}

/// Format pending records as a table: index, amount, score, age, who, id
pub fn format_pending_table(records: &[&DeterminationRecord], use_colors: bool) -> String {
    if records.is_empty() {
        return "No determinations pending review.".to_string();
    }

    let term_width = get_terminal_width();
    let now = Utc::now();
    // Index 3 + amount 10 + score 5 + age 4 + id 36, plus separators
    let fixed_width = 3 + 1 + 10 + 2 + 5 + 2 + 4 + 2 + 2 + 36;

    records
        .iter()
        .enumerate()
        .map(|(idx, record)| {
            let index_str = format!("{:>2}.", idx + 1);
            let amount = format!("{:>10}", record.determination.amount.to_string());
            let score = format!("{:>5.1}", record.score.value);
            let age = format!("{:>4}", format_age(now - record.created_at));
            let who = format!("{} / {}", record.student_id, record.course_id);
            let who = match term_width {
                Some(width) if width > fixed_width + 10 => truncate(&who, width - fixed_width),
                Some(_) => truncate(&who, 20),
                None => who,
            };

            if use_colors {
                format!(
                    "{} {}  {}  {}  {}  {}",
                    index_str.dimmed(),
                    amount.bold(),
                    score,
                    age.dimmed(),
                    who,
                    record.id.to_string().underline()
                )
            } else {
                format!(
                    "{} {}  {}  {}  {}  {}",
                    index_str, amount, score, age, who, record.id
                )
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format a wallet balance line
pub fn format_wallet(student_id: &str, balance: Money, use_colors: bool) -> String {
    if use_colors {
        format!("{}: {}", student_id, balance.to_string().green().bold())
    } else {
        format!("{}: {}", student_id, balance)
    }
}

/// Format a student's refund history: date, description, amount, status
pub fn format_wallet_history(entries: &[WalletEntry], use_colors: bool) -> String {
    if entries.is_empty() {
        return "No refund history.".to_string();
    }

    let width = entries
        .iter()
        .map(|e| e.description().chars().count())
        .max()
        .unwrap_or(0);

    entries
        .iter()
        .map(|entry| {
            let date = entry.created_at.format("%Y-%m-%d").to_string();
            let amount = format!("{:>10}", entry.amount.to_string());
            let status = format_status(entry.status, use_colors);
            let description = format!("{:<width$}", entry.description(), width = width);
            if use_colors {
                format!("  {}  {}  {}  {}", date.dimmed(), description, amount.bold(), status)
            } else {
                format!("  {}  {}  {}  {}", date, description, amount, status)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Largest whole unit of a duration: "5m", "2h", "3d", "1w", or "now"
/// under a minute
pub fn format_age(duration: Duration) -> String {
    const UNITS: [(i64, &str); 4] = [(7 * 24 * 60, "w"), (24 * 60, "d"), (60, "h"), (1, "m")];

    let minutes = duration.num_minutes();
    UNITS
        .iter()
        .find(|(size, _)| minutes >= *size)
        .map(|(size, suffix)| format!("{}{}", minutes / size, suffix))
        .unwrap_or_else(|| "now".to_string())
}
