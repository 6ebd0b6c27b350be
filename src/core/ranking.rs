//! Distance ranking and the combined filter-then-rank operation.

use crate::core::distance::haversine_km;
use crate::core::filter::filter_companies;
use crate::domain::model::{Company, Coordinate, RankedResult};

/// Orders `companies` by ascending distance from `origin`.
///
/// Without an origin the input order is kept and every distance is `None`.
/// Equal distances keep their input order. Full precision is used for the
/// comparison; rounding is left to presentation.
pub fn rank_by_distance<'a>(
    companies: Vec<&'a Company>,
    origin: Option<Coordinate>,
) -> Vec<RankedResult<'a>> {
    match origin {
        Some(origin) => {
            let mut ranked: Vec<(f64, &'a Company)> = companies
                .into_iter()
                .map(|company| (haversine_km(origin, company.location()), company))
                .collect();
            // `sort_by` is stable; NaN from malformed rows goes to the end
            ranked.sort_by(|a, b| {
                a.0.partial_cmp(&b.0)
                    .unwrap_or_else(|| a.0.is_nan().cmp(&b.0.is_nan()))
            });
            ranked
                .into_iter()
                .map(|(distance, company)| RankedResult {
                    company,
                    distance_km: Some(distance),
                })
                .collect()
        }
        None => companies
            .into_iter()
            .map(|company| RankedResult {
                company,
                distance_km: None,
            })
            .collect(),
    }
}

/// Filters by `search_text`, then ranks by distance from `origin`.
///
/// Pure over its inputs: the same snapshot, text and origin always give the
/// same sequence. The input slice is never reordered.
pub fn rank<'a>(
    companies: &'a [Company],
    search_text: &str,
    origin: Option<Coordinate>,
) -> Vec<RankedResult<'a>> {
    let filtered = filter_companies(companies, search_text);
    let ranked = rank_by_distance(filtered, origin);
    tracing::debug!(
        total = companies.len(),
        matched = ranked.len(),
        has_origin = origin.is_some(),
        "Ranked companies"
    );
    ranked
}
