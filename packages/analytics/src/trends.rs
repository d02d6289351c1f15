//! Daily time series of ratings for a locality search.

use std::collections::BTreeMap;

use tally_analytics_models::DailyRatings;
use tally_database::DocumentStore;
use tally_survey_models::SurveyRecord;

use crate::search::find_surveys_by_locality;
use crate::{AnalyticsError, LocalityTerm};

#[derive(Debug, Default)]
struct DayTotals {
    cleanliness: f64,
    air_quality: f64,
    water_quality: f64,
    noise_level: f64,
    count: u64,
}

/// Groups `surveys` by UTC submission day and averages cleanliness, air
/// quality, water quality, and noise level per day.
///
/// Days are returned in ascending order.
#[must_use]
pub fn compute_ratings_over_time<'a, I>(surveys: I) -> Vec<DailyRatings>
where
    I: IntoIterator<Item = &'a SurveyRecord>,
{
    let mut days: BTreeMap<String, DayTotals> = BTreeMap::new();

    for survey in surveys {
        let date = survey.created_at.date_naive().format("%Y-%m-%d").to_string();
        let totals = days.entry(date).or_default();

        totals.cleanliness += survey.ratings.cleanliness.unwrap_or(0.0);
        totals.air_quality += survey.ratings.air_quality.unwrap_or(0.0);
        totals.water_quality += survey.ratings.water_quality.unwrap_or(0.0);
        totals.noise_level += survey.ratings.noise_level.unwrap_or(0.0);
        totals.count += 1;
    }

    days.into_iter()
        .map(|(date, totals)| {
            #[allow(clippy::cast_precision_loss)]
            let count = totals.count as f64;
            DailyRatings {
                date,
                cleanliness: totals.cleanliness / count,
                air_quality: totals.air_quality / count,
                water_quality: totals.water_quality / count,
                noise_level: totals.noise_level / count,
            }
        })
        .collect()
}

/// Computes the daily rating series over every survey matching `term`.
///
/// Returns an empty series when nothing matches.
///
/// # Errors
///
/// Returns [`AnalyticsError`] if the search fails.
pub async fn ratings_over_time(
    store: &dyn DocumentStore,
    term: &LocalityTerm,
) -> Result<Vec<DailyRatings>, AnalyticsError> {
    let matches = find_surveys_by_locality(store, term).await?;
    Ok(compute_ratings_over_time(matches.iter().map(|m| &m.record)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tally_database::memory::MemoryStore;

    use crate::fixtures::add_survey;

    #[tokio::test]
    async fn groups_by_utc_day_in_ascending_order() {
        let store = MemoryStore::new();
        let locality = ("telangana", "hyderabad", "gachibowli");
        add_survey(
            &store,
            locality,
            30,
            "analyst",
            json!({ "cleanliness": 5, "airQuality": 2, "waterQuality": 4, "noiseLevel": 1 }),
            None,
            "2025-09-26T08:00:00Z",
        )
        .await;
        add_survey(
            &store,
            locality,
            30,
            "analyst",
            json!({ "cleanliness": 3, "airQuality": 4 }),
            None,
            "2025-09-25T23:59:59Z",
        )
        .await;
        add_survey(
            &store,
            locality,
            30,
            "analyst",
            json!({ "cleanliness": 1, "airQuality": 2, "noiseLevel": 3 }),
            None,
            "2025-09-25T00:00:00+05:30",
        )
        .await;

        let term = LocalityTerm::parse(Some("hyderabad")).unwrap();
        let series = ratings_over_time(&store, &term).await.unwrap();

        // 2025-09-25T00:00+05:30 is still 2025-09-24 in UTC.
        let dates: Vec<&str> = series.iter().map(|d| d.date.as_str()).collect();
        assert_eq!(dates, vec!["2025-09-24", "2025-09-25", "2025-09-26"]);

        assert_eq!(
            series[1],
            DailyRatings {
                date: "2025-09-25".to_string(),
                cleanliness: 3.0,
                air_quality: 4.0,
                water_quality: 0.0,
                noise_level: 0.0,
            }
        );
        assert!((series[2].cleanliness - 5.0).abs() < f64::EPSILON);
        assert!((series[0].noise_level - 3.0).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn averages_within_a_day() {
        let store = MemoryStore::new();
        let locality = ("kerala", "kochi", "fort kochi");
        for cleanliness in [2, 3] {
            add_survey(
                &store,
                locality,
                22,
                "student",
                json!({ "cleanliness": cleanliness }),
                None,
                "2025-01-01T12:00:00Z",
            )
            .await;
        }

        let term = LocalityTerm::parse(Some("fort kochi")).unwrap();
        let series = ratings_over_time(&store, &term).await.unwrap();

        assert_eq!(series.len(), 1);
        assert!((series[0].cleanliness - 2.5).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn no_matches_yields_empty_series() {
        let store = MemoryStore::new();
        let term = LocalityTerm::parse(Some("nowhere")).unwrap();
        assert!(ratings_over_time(&store, &term).await.unwrap().is_empty());
    }
}
