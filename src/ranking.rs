use std::collections::HashMap;

use crate::aggregation::SetAggregate;

/// Sets ordered by card count (descending), ties broken by set code (ascending)
pub fn rank_sets(sets: &HashMap<String, SetAggregate>) -> Vec<&SetAggregate> {
    let mut ranked: Vec<_> = sets.values().collect();
    ranked.sort_by(|a, b| {
        b.count()
            .cmp(&a.count())
            .then_with(|| a.set_code().cmp(b.set_code()))
    });
    ranked
}
