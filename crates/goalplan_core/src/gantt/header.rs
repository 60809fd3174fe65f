use crate::dates::{Interval, day_sequence, is_first_of_year};
use serde::Serialize;
use time::Date;
use time::macros::format_description;

/// A labelled run of consecutive header days (a month or a year).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeaderBand {
    pub label: String,
    pub start: Date,
    pub span_days: usize,
}

/// Day-by-day header cells for the visible window.
pub fn day_headers(window: Interval) -> Vec<Date> {
    day_sequence(window.start, window.end)
}

pub fn group_by_month(days: &[Date]) -> Vec<HeaderBand> {
    group_by(days, |day| day.day() == 1, |day| {
        day.format(format_description!("[month repr:short]"))
            .unwrap_or_else(|_| day.month().to_string())
    })
}

pub fn group_by_year(days: &[Date]) -> Vec<HeaderBand> {
    group_by(days, is_first_of_year, |day| day.year().to_string())
}

/// Open a band at the first day and at every boundary day; each band spans
/// until the next one opens.
fn group_by(
    days: &[Date],
    is_boundary: impl Fn(Date) -> bool,
    label: impl Fn(Date) -> String,
) -> Vec<HeaderBand> {
    let mut bands: Vec<HeaderBand> = Vec::new();

    for (index, &day) in days.iter().enumerate() {
        if index > 0
            && !is_boundary(day)
            && let Some(band) = bands.last_mut()
        {
            band.span_days += 1;
            continue;
        }

        bands.push(HeaderBand {
            label: label(day),
            start: day,
            span_days: 1,
        });
    }

    bands
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use time::macros::date;

    #[test]
    fn month_bands_cover_partial_months() {
        let days = day_headers(Interval::new(date!(2025 - 12 - 20), date!(2026 - 02 - 03)));
        let bands = group_by_month(&days);

        assert_eq!(
            bands,
            vec![
                HeaderBand { label: "Dec".to_string(), start: date!(2025 - 12 - 20), span_days: 12 },
                HeaderBand { label: "Jan".to_string(), start: date!(2026 - 01 - 01), span_days: 31 },
                HeaderBand { label: "Feb".to_string(), start: date!(2026 - 02 - 01), span_days: 3 },
            ]
        );
        assert_eq!(bands.iter().map(|band| band.span_days).sum::<usize>(), days.len());
    }

    #[test]
    fn year_bands_split_on_new_year() {
        let days = day_headers(Interval::new(date!(2025 - 12 - 30), date!(2026 - 01 - 02)));
        let bands = group_by_year(&days);

        assert_eq!(bands.len(), 2);
        assert_eq!((bands[0].label.as_str(), bands[0].span_days), ("2025", 2));
        assert_eq!((bands[1].label.as_str(), bands[1].span_days), ("2026", 2));
    }

    #[test]
    fn window_starting_on_boundary_has_single_band() {
        let days = day_headers(Interval::new(date!(2026 - 03 - 01), date!(2026 - 03 - 31)));
        let bands = group_by_month(&days);
        assert_eq!(bands.len(), 1);
        assert_eq!(bands[0].span_days, 31);
    }

    #[test]
    fn empty_days_give_no_bands() {
        assert!(group_by_month(&[]).is_empty());
        assert!(day_headers(Interval::new(date!(2026 - 03 - 02), date!(2026 - 03 - 01))).is_empty());
    }
}
