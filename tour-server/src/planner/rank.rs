//! Route ranking for search results.

use std::collections::HashSet;

use crate::domain::EntityId;

use super::route::Route;

/// Rank routes by preference.
///
/// Routes are ranked by:
/// 1. Score (higher is better)
/// 2. Stop ids, compared lexicographically (lower first)
///
/// The second key makes the order independent of discovery order.
/// Returns routes sorted best-first.
pub fn rank_routes(mut routes: Vec<Route>) -> Vec<Route> {
    routes.sort_by(|a, b| {
        b.score
            .total_cmp(&a.score)
            .then_with(|| a.stops.cmp(&b.stops))
    });
    routes
}

/// Remove routes that visit the same stops in the same order.
///
/// Keeps the first occurrence.
pub fn deduplicate(routes: Vec<Route>) -> Vec<Route> {
    if routes.len() <= 1 {
        return routes;
    }

    let mut seen: HashSet<Vec<EntityId>> = HashSet::with_capacity(routes.len());
    routes
        .into_iter()
        .filter(|route| seen.insert(route.stops.clone()))
        .collect()
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::planner::route::Totals;
    use proptest::prelude::*;

    fn routes_strategy() -> impl Strategy<Value = Vec<Route>> {
        proptest::collection::vec(
            (proptest::collection::vec(0u64..6, 2..5), 0u8..4),
            0..30,
        )
        .prop_map(|raw| {
            raw.into_iter()
                .map(|(stops, score)| {
                    Route::new(
                        stops.into_iter().map(EntityId).collect(),
                        Totals {
                            score: f64::from(score),
                            ..Totals::default()
                        },
                    )
                })
                .collect()
        })
    }

    proptest! {
        /// Ranked output is ordered by descending score
        #[test]
        fn rank_sorted(routes in routes_strategy()) {
            let ranked = rank_routes(routes);
            for pair in ranked.windows(2) {
                prop_assert!(pair[0].score >= pair[1].score);
                if pair[0].score == pair[1].score {
                    prop_assert!(pair[0].stops <= pair[1].stops);
                }
            }
        }

        /// Ranking does not depend on input order
        #[test]
        fn rank_deterministic(routes in routes_strategy()) {
            let routes = deduplicate(routes);
            let mut reversed = routes.clone();
            reversed.reverse();
            prop_assert_eq!(rank_routes(routes), rank_routes(reversed));
        }

        /// No two deduplicated routes share stops
        #[test]
        fn deduplicate_unique(routes in routes_strategy()) {
            let result = deduplicate(routes);
            let unique: HashSet<_> = result.iter().map(|r| r.stops.clone()).collect();
            prop_assert_eq!(unique.len(), result.len());
        }
    }
}
