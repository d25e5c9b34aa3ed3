use chrono::{Months, NaiveDate};

use crate::workday::markdown::model::{Feedback, Report};

/// Months of history kept when no cutoff is given.
pub const DEFAULT_LOOKBACK_MONTHS: u32 = 6;

/// Cutoff used when `--since` is absent: six calendar months before `today`,
/// clamped to the last day of the target month.
pub fn default_cutoff(today: NaiveDate) -> NaiveDate {
    today
        .checked_sub_months(Months::new(DEFAULT_LOOKBACK_MONTHS))
        .unwrap_or(NaiveDate::MIN)
}

/// Groups feedback by recipient and drops entries dated before `cutoff`.
///
/// Grouping happens before filtering: a recipient whose feedback is all older
/// than the cutoff keeps an empty group.
pub fn group_by_recipient<I>(feedback: I, cutoff: NaiveDate) -> Report
where
    I: IntoIterator<Item = Feedback>,
{
    let mut report = Report::default();
    for entry in feedback {
        let keep = entry.date >= cutoff;
        if let Some(group) = report.groups.get_mut(&entry.to) {
            if keep {
                group.push(entry);
            }
            continue;
        }

        let recipient = entry.to.clone();
        let group = if keep { vec![entry] } else { Vec::new() };
        report.groups.insert(recipient, group);
    }
    report
}
