/// Sorts descending by the key and pairs each item with its 1-based dense
/// rank. The sort is stable, so ties keep their original store order.
pub fn rank_desc<T, K, F>(mut items: Vec<T>, key: F) -> Vec<(T, i64)>
where
    K: Ord,
    F: Fn(&T) -> K,
{
    items.sort_by(|a, b| key(b).cmp(&key(a)));
    items
        .into_iter()
        .enumerate()
        .map(|(position, item)| (item, position as i64 + 1))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ranks_descending_with_dense_positions() {
        let ranked = rank_desc(vec![("a", 5), ("b", 30), ("c", 10)], |e| e.1);
        let order: Vec<(&str, i64)> = ranked.into_iter().map(|(e, r)| (e.0, r)).collect();
        assert_eq!(order, vec![("b", 1), ("c", 2), ("a", 3)]);
    }

    #[test]
    fn ties_keep_original_order() {
        let ranked = rank_desc(vec![("first", 7), ("second", 7), ("third", 7)], |e| e.1);
        let order: Vec<(&str, i64)> = ranked.into_iter().map(|(e, r)| (e.0, r)).collect();
        assert_eq!(order, vec![("first", 1), ("second", 2), ("third", 3)]);
    }

    #[test]
    fn empty_input_yields_empty_leaderboard() {
        let ranked = rank_desc(Vec::<(&str, i64)>::new(), |e| e.1);
        assert!(ranked.is_empty());
    }
}
