use super::{SpotifyClient, client::decode};
use crate::{
    error::ApiError,
    types::{RecommendationParams, Recommendations, Seeds},
};

impl SpotifyClient {
    /// Retrieves recommendations seeded by up to five tracks.
    ///
    /// Tunable attributes from `params` are passed through verbatim, e.g.
    /// `target_energy=0.8`.
    pub async fn get_recommendations(
        &self,
        seeds: &Seeds,
        params: &RecommendationParams,
    ) -> Result<Recommendations, ApiError> {
        let url = self.url("/recommendations");
        let query = recommendation_query(seeds, params);
        let response = self.execute(|http| http.get(&url).query(&query)).await?;

        decode(response).await
    }
}

fn recommendation_query(
    seeds: &Seeds,
    params: &RecommendationParams,
) -> Vec<(String, String)> {
    let mut query = vec![("seed_tracks".to_string(), seeds.tracks.join(","))];
    if let Some(limit) = params.limit {
        query.push(("limit".to_string(), limit.to_string()));
    }
    if let Some(market) = &params.market {
        query.push(("market".to_string(), market.clone()));
    }
    for (name, value) in &params.attributes {
        query.push((name.clone(), value.to_string()));
    }
    query
}
