//! Console rendering. Successful outcomes and tables go to the output
//! writer, failures to the error writer.

use std::io::{self, Write};

use crate::dns::DnsRecord;
use crate::reconcile::Outcome;

const HEADERS: [&str; 5] = ["ID", "Name", "Content", "Proxied", "TTL"];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub succeeded: usize,
    pub failed: usize,
}

pub fn write_record_table<W: Write>(out: &mut W, records: &[DnsRecord]) -> io::Result<()> {
    if records.is_empty() {
        return writeln!(out, "No A records found.");
    }

    let rows: Vec<[String; 5]> = records
        .iter()
        .map(|r| {
            [
                r.id.clone(),
                r.name.clone(),
                r.content.clone(),
                r.proxied.to_string(),
                r.ttl.to_string(),
            ]
        })
        .collect();

    let mut widths = HEADERS.map(str::len);
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    write_row(out, &HEADERS[..], &widths)?;
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    write_row(out, rule.as_slice(), &widths)?;
    for row in &rows {
        write_row(out, &row[..], &widths)?;
    }

    Ok(())
}

fn write_row<W: Write, S: AsRef<str>>(out: &mut W, cells: &[S], widths: &[usize]) -> io::Result<()> {
    let line = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{:<width$}", cell.as_ref(), width = *width))
        .collect::<Vec<_>>()
        .join("  ");
    writeln!(out, "{}", line.trim_end())
}

pub fn write_outcomes<O: Write, E: Write>(
    out: &mut O,
    err: &mut E,
    outcomes: &[Outcome],
) -> io::Result<Summary> {
    let mut summary = Summary::default();

    for outcome in outcomes {
        if outcome.is_success() {
            summary.succeeded += 1;
            writeln!(out, "{outcome}")?;
        } else {
            summary.failed += 1;
            writeln!(err, "{outcome}")?;
        }
    }

    Ok(summary)
}
