use std::collections::VecDeque;

/// Directed transitive closure over a graph's vertices, stored as a dense
/// row-major boolean matrix so pairwise causal-order checks are O(1).
/// Identity is always reachable (the empty path), which is what makes an
/// element causally ordered with itself by default.
#[derive(Debug)]
pub struct Reachability {
    n: usize,
    closure: Vec<bool>,
}

impl Reachability {
    /// BFS from every vertex over the successor lists. Quadratic in the
    /// vertex count, run once per immutable graph.
    pub(crate) fn compute(successors: &[Vec<usize>]) -> Self {
        let n = successors.len();
        let mut closure = vec![false; n * n];
        let mut queue = VecDeque::new();
        for start in 0..n {
            let row = start * n;
            closure[row + start] = true;
            queue.clear();
            queue.push_back(start);
            while let Some(v) = queue.pop_front() {
                for &next in &successors[v] {
                    if !closure[row + next] {
                        closure[row + next] = true;
                        queue.push_back(next);
                    }
                }
            }
        }
        Self { n, closure }
    }

    pub fn reaches(&self, from: usize, to: usize) -> bool {
        self.closure[from * self.n + to]
    }

    /// One of the two vertices lies on a directed path to the other
    /// (identity included).
    pub fn causally_ordered(&self, a: usize, b: usize) -> bool {
        self.reaches(a, b) || self.reaches(b, a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // 0 -> 1 -> 3, 0 -> 2 -> 3
    fn diamond() -> Reachability {
        Reachability::compute(&[vec![1, 2], vec![3], vec![3], vec![]])
    }

    #[test]
    fn identity_is_reachable() {
        let r = diamond();
        for v in 0..4 {
            assert!(r.reaches(v, v));
        }
    }

    #[test]
    fn closure_follows_paths() {
        let r = diamond();
        assert!(r.reaches(0, 3));
        assert!(!r.reaches(3, 0));
        assert!(!r.reaches(1, 2));
        assert!(!r.reaches(2, 1));
    }

    #[test]
    fn causal_order_is_symmetric_in_direction() {
        let r = diamond();
        assert!(r.causally_ordered(0, 3));
        assert!(r.causally_ordered(3, 0));
        assert!(!r.causally_ordered(1, 2));
    }

    #[test]
    fn cycles_reach_both_ways() {
        let r = Reachability::compute(&[vec![1], vec![0]]);
        assert!(r.reaches(0, 1));
        assert!(r.reaches(1, 0));
    }
}
