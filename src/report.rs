use crate::store::AnswerRecord;
use crate::util::format_mm_ss;
use itertools::Itertools;
use std::fmt::Write as _;
use std::io::Write;

/// One interview's slice of the answer log, in write order.
#[derive(Debug, Clone, PartialEq)]
pub struct InterviewSummary {
    pub interview_id: String,
    pub records: Vec<AnswerRecord>,
}

impl InterviewSummary {
    pub fn answered(&self) -> usize {
        self.records.len()
    }

    /// Answers finalized by the clock rather than the candidate.
    pub fn expired(&self) -> usize {
        self.records
            .iter()
            .filter(|r| r.time_remaining_ms == 0)
            .count()
    }
}

/// Group the answer log into per-interview summaries. Rows arrive in write
/// order, so records for one interview are consecutive.
pub fn summarize(rows: &[(String, AnswerRecord)]) -> Vec<InterviewSummary> {
    let mut summaries = Vec::new();
    for (interview_id, group) in &rows.iter().chunk_by(|(interview_id, _)| interview_id.clone()) {
        summaries.push(InterviewSummary {
            interview_id,
            records: group.map(|(_, r)| r.clone()).collect(),
        });
    }
    summaries
}

/// Human-readable report of every recorded answer, grouped by interview.
pub fn render_report(rows: &[(String, AnswerRecord)]) -> String {
    if rows.is_empty() {
        return "no recorded answers\n".to_string();
    }

    let mut out = String::new();
    for summary in summarize(rows) {
        let _ = writeln!(
            out,
            "{}: {} answered, {} timed out",
            summary.interview_id,
            summary.answered(),
            summary.expired()
        );
        for record in &summary.records {
            let clock = if record.time_remaining_ms == 0 {
                "expired".to_string()
            } else {
                format!("{} left", format_mm_ss(record.time_remaining_ms))
            };
            let _ = writeln!(
                out,
                "  {}  {}  {}",
                record.question_id,
                record.submitted_at.format("%c"),
                clock
            );
        }
    }
    out
}

/// Write the full answer log as CSV.
pub fn export_csv<W: Write>(rows: &[(String, AnswerRecord)], out: W) -> csv::Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record([
        "interview_id",
        "question_id",
        "submitted_at",
        "time_remaining_ms",
        "content",
    ])?;

    for (interview_id, record) in rows {
        writer.write_record([
            interview_id.as_str(),
            record.question_id.as_str(),
            &record.submitted_at.to_rfc3339(),
            &record.time_remaining_ms.to_string(),
            record.content.as_str(),
        ])?;
    }

    writer.flush()?;
    Ok(())
}
