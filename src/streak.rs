use chrono::{Days, NaiveDate};

fn newest_first(dates: &[NaiveDate]) -> Vec<NaiveDate> {
    let mut sorted = dates.to_vec();
    sorted.sort_unstable_by(|a, b| b.cmp(a));
    sorted.dedup();
    sorted
}

/// Consecutive completed days ending today, or ending yesterday when today
/// has not been completed yet.
pub fn current_streak(completed: &[NaiveDate], today: NaiveDate) -> u32 {
    let yesterday = today.pred_opt();
    let mut anchor = today;
    let mut streak = 0u32;

    for date in newest_first(completed) {
        if date > today {
            continue;
        }
        let expected = anchor.checked_sub_days(Days::new(u64::from(streak)));
        if Some(date) == expected {
            streak += 1;
        } else if streak == 0 && Some(date) == yesterday {
            anchor = date;
            streak = 1;
        } else {
            break;
        }
    }

    streak
}

pub fn best_streak(completed: &[NaiveDate]) -> u32 {
    let sorted = newest_first(completed);
    let mut best = 0u32;
    let mut running = 0u32;
    let mut previous: Option<NaiveDate> = None;

    for date in sorted {
        running = match previous {
            Some(prev) if (prev - date).num_days() == 1 => running + 1,
            _ => 1,
        };
        best = best.max(running);
        previous = Some(date);
    }

    best
}
