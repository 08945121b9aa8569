//! Series transforms: seasonal tagging and first differencing.

use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::{Observation, Season};

/// An observation with its calendar-quarter season.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TaggedObservation {
    pub date: NaiveDate,
    pub value: f64,
    pub season: Season,
}

pub fn tag_seasons(observations: &[Observation]) -> Vec<TaggedObservation> {
    observations
        .iter()
        .map(|o| TaggedObservation {
            date: o.date,
            value: o.value,
            season: Season::of(o.date),
        })
        .collect()
}

/// `Δ_t = v_t - v_{t-1}`, dated at `t` and keeping the season of `t`.
///
/// The first observation has no predecessor and is dropped.
pub fn first_difference(observations: &[TaggedObservation]) -> Vec<TaggedObservation> {
    observations
        .windows(2)
        .map(|w| TaggedObservation {
            value: w[1].value - w[0].value,
            ..w[1]
        })
        .collect()
}

/// Number of observations per season, in `Season::ALL` order.
pub fn season_counts(observations: &[TaggedObservation]) -> Vec<(Season, usize)> {
    Season::ALL
        .iter()
        .map(|&s| (s, observations.iter().filter(|o| o.season == s).count()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn difference_keeps_later_date_and_season() {
        let tagged = tag_seasons(&[
            Observation::new(d(2020, 3, 1), 10.0),
            Observation::new(d(2020, 4, 1), 12.5),
            Observation::new(d(2020, 7, 1), 11.0),
        ]);
        let diff = first_difference(&tagged);

        assert_eq!(diff.len(), 2);
        assert_eq!(diff[0].date, d(2020, 4, 1));
        assert_eq!(diff[0].value, 2.5);
        assert_eq!(diff[0].season, Season::Spring);
        assert_eq!(diff[1].value, -1.5);
        assert_eq!(diff[1].season, Season::Summer);
    }

    #[test]
    fn counts_cover_every_season() {
        let tagged = tag_seasons(&[
            Observation::new(d(2020, 1, 1), 1.0),
            Observation::new(d(2020, 2, 1), 1.0),
            Observation::new(d(2020, 11, 1), 1.0),
        ]);
        assert_eq!(
            season_counts(&tagged),
            vec![
                (Season::Winter, 2),
                (Season::Spring, 0),
                (Season::Summer, 0),
                (Season::Fall, 1),
            ]
        );
    }

    #[test]
    fn single_observation_has_no_difference() {
        let tagged = tag_seasons(&[Observation::new(d(2020, 1, 1), 1.0)]);
        assert!(first_difference(&tagged).is_empty());
    }
}
