use serde_json::{Value, json};
use tally_database::DocumentStore;
use tally_survey_models::SURVEYS_COLLECTION;

/// Stores a survey for `state`/`city`/`area` and returns its id.
pub async fn add_survey(
    store: &dyn DocumentStore,
    (state, city, area): (&str, &str, &str),
    age: u32,
    occupation: &str,
    ratings: Value,
    comments: Option<&str>,
    created_at: &str,
) -> String {
    store
        .add(
            SURVEYS_COLLECTION,
            json!({
                "name": "respondent",
                "age": age,
                "occupation": occupation,
                "locality": { "state": state, "city": city, "area": area, "pincode": "" },
                "ratings": ratings,
                "amenities": { "hospital": 4, "schools": 2 },
                "comments": comments,
                "createdAt": created_at,
            }),
        )
        .await
        .unwrap()
}
