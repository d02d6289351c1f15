//! Overall statistics for a locality search.

use std::collections::BTreeMap;

use tally_analytics_models::{AgeGroup, AmenityAverages, RatingAverages, SurveyStats};
use tally_database::DocumentStore;
use tally_survey_models::{Amenities, Ratings, SurveyRecord};

use crate::search::find_surveys_by_locality;
use crate::{AnalyticsError, LocalityTerm};

/// Running per-field sums of [`Ratings`]. Absent ratings add 0.
#[derive(Debug, Default)]
struct RatingTotals {
    cleanliness: f64,
    water_quality: f64,
    air_quality: f64,
    noise_level: f64,
    road_quality: f64,
    affordability: f64,
    safety: f64,
    internet_quality: f64,
}

impl RatingTotals {
    fn add(&mut self, ratings: &Ratings) {
        self.cleanliness += ratings.cleanliness.unwrap_or(0.0);
        self.water_quality += ratings.water_quality.unwrap_or(0.0);
        self.air_quality += ratings.air_quality.unwrap_or(0.0);
        self.noise_level += ratings.noise_level.unwrap_or(0.0);
        self.road_quality += ratings.road_quality.unwrap_or(0.0);
        self.affordability += ratings.affordability.unwrap_or(0.0);
        self.safety += ratings.safety.unwrap_or(0.0);
        self.internet_quality += ratings.internet_quality.unwrap_or(0.0);
    }

    fn average(&self, count: f64) -> RatingAverages {
        RatingAverages {
            cleanliness: self.cleanliness / count,
            water_quality: self.water_quality / count,
            air_quality: self.air_quality / count,
            noise_level: self.noise_level / count,
            road_quality: self.road_quality / count,
            affordability: self.affordability / count,
            safety: self.safety / count,
            internet_quality: self.internet_quality / count,
        }
    }
}

/// Running per-field sums of [`Amenities`]. Absent scores add 0.
#[derive(Debug, Default)]
struct AmenityTotals {
    hospital: f64,
    grocery_store: f64,
    vegetable_vendor: f64,
    public_transport: f64,
    recreation: f64,
    schools: f64,
}

impl AmenityTotals {
    fn add(&mut self, amenities: &Amenities) {
        self.hospital += amenities.hospital.unwrap_or(0.0);
        self.grocery_store += amenities.grocery_store.unwrap_or(0.0);
        self.vegetable_vendor += amenities.vegetable_vendor.unwrap_or(0.0);
        self.public_transport += amenities.public_transport.unwrap_or(0.0);
        self.recreation += amenities.recreation.unwrap_or(0.0);
        self.schools += amenities.schools.unwrap_or(0.0);
    }

    fn average(&self, count: f64) -> AmenityAverages {
        AmenityAverages {
            hospital: self.hospital / count,
            grocery_store: self.grocery_store / count,
            vegetable_vendor: self.vegetable_vendor / count,
            public_transport: self.public_transport / count,
            recreation: self.recreation / count,
            schools: self.schools / count,
        }
    }
}

/// Summarizes `surveys` in a single pass.
///
/// Returns `None` when there are no surveys.
#[must_use]
pub fn compute_stats<'a, I>(surveys: I) -> Option<SurveyStats>
where
    I: IntoIterator<Item = &'a SurveyRecord>,
{
    let mut ratings = RatingTotals::default();
    let mut amenities = AmenityTotals::default();
    let mut age_distribution: BTreeMap<AgeGroup, u64> = BTreeMap::new();
    let mut occupation_distribution: BTreeMap<String, u64> = BTreeMap::new();
    let mut comments = Vec::new();
    let mut count: u64 = 0;

    for survey in surveys {
        ratings.add(&survey.ratings);
        amenities.add(&survey.amenities);

        *age_distribution
            .entry(AgeGroup::from_age(survey.age))
            .or_default() += 1;
        *occupation_distribution
            .entry(survey.occupation.to_lowercase())
            .or_default() += 1;

        if let Some(comment) = survey.comments.as_deref().map(str::trim)
            && !comment.is_empty()
        {
            comments.push(comment.to_string());
        }

        count += 1;
    }

    if count == 0 {
        return None;
    }

    #[allow(clippy::cast_precision_loss)]
    let count = count as f64;

    Some(SurveyStats {
        ratings_avg: ratings.average(count),
        amenities_avg: amenities.average(count),
        age_distribution,
        occupation_distribution,
        comments,
    })
}

/// Computes [`SurveyStats`] over every survey matching `term`.
///
/// Returns `Ok(None)` when nothing matches.
///
/// # Errors
///
/// Returns [`AnalyticsError`] if the search fails.
pub async fn survey_stats_by_locality(
    store: &dyn DocumentStore,
    term: &LocalityTerm,
) -> Result<Option<SurveyStats>, AnalyticsError> {
    let matches = find_surveys_by_locality(store, term).await?;
    Ok(compute_stats(matches.iter().map(|m| &m.record)))
}
