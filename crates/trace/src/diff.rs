//! Hop-by-hop comparison of two raw traces

use crate::parse::parse;
use std::collections::BTreeSet;

/// Compare two raw traceroute outputs and return the set of hop positions
/// (0-based) where they differ.
///
/// A position differs when either side has no hop there, or when the two
/// hops' first-probe addresses differ. An unresolved hop (`*`) compares as
/// its own distinct value: two timeouts at the same position are equal, a
/// timeout versus any resolved address is a difference. A non-empty result
/// means the route changed.
pub fn diff(a: &str, b: &str) -> BTreeSet<usize> {
    let trace_a = parse(a);
    let trace_b = parse(b);

    let max_hops = trace_a.hops.len().max(trace_b.hops.len());
    let mut changed = BTreeSet::new();

    for index in 0..max_hops {
        match (trace_a.hops.get(index), trace_b.hops.get(index)) {
            (Some(hop_a), Some(hop_b)) if hop_a.first_addr() == hop_b.first_addr() => {}
            _ => {
                changed.insert(index);
            }
        }
    }

    changed
}

#[cfg(test)]
mod tests {
    use super::*;

    fn three_hops() -> String {
        "\
traceroute to example.com (93.184.216.34), 30 hops max
 1  gateway (192.168.1.1)  0.4 ms
 2  10.11.0.1  1.1 ms
 3  edge.example.com (93.184.216.34)  9.1 ms
"
        .to_string()
    }

    #[test]
    fn test_identical_traces_do_not_differ() {
        let a = three_hops();
        assert!(diff(&a, &a).is_empty());
    }

    #[test]
    fn test_single_changed_hop() {
        let a = three_hops();
        let b = a.replace("10.11.0.1", "10.11.0.99");
        let changed = diff(&a, &b);
        assert_eq!(changed.into_iter().collect::<Vec<_>>(), vec![1]);
    }

    #[test]
    fn test_extra_hops_all_marked() {
        let a = three_hops();
        let b = format!("{a} 4  10.99.0.1  12.0 ms\n 5  10.99.0.2  13.0 ms\n");
        let changed = diff(&a, &b);
        assert_eq!(changed.into_iter().collect::<Vec<_>>(), vec![3, 4]);
    }

    #[test]
    fn test_empty_against_nonempty_marks_everything() {
        let a = three_hops();
        let changed = diff("", &a);
        assert_eq!(changed.into_iter().collect::<Vec<_>>(), vec![0, 1, 2]);
    }

    #[test]
    fn test_two_empty_traces_do_not_differ() {
        assert!(diff("", "").is_empty());
    }

    #[test]
    fn test_timeout_versus_resolved_differs() {
        let a = three_hops();
        let b = a.replace("2  10.11.0.1  1.1 ms", "2  * * *");
        let changed = diff(&a, &b);
        assert_eq!(changed.into_iter().collect::<Vec<_>>(), vec![1]);
    }

    #[test]
    fn test_timeout_versus_timeout_is_equal() {
        let a = three_hops().replace("2  10.11.0.1  1.1 ms", "2  * * *");
        assert!(diff(&a, &a).is_empty());
    }
}
