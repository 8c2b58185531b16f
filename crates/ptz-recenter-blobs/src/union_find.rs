//! Label equivalence table: a parent-pointer array indexed by provisional label.

/// Disjoint sets over provisional labels `1..=len`.
///
/// Index 0 is the background and is never merged. Every class root is the
/// smallest provisional label of its class.
#[derive(Clone, Debug)]
pub(crate) struct EquivalenceTable {
    parent: Vec<u32>,
}

impl EquivalenceTable {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        let mut parent = Vec::with_capacity(capacity + 1);
        parent.push(0);
        Self { parent }
    }

    /// Number of provisional labels handed out so far.
    #[inline]
    pub(crate) fn len(&self) -> u32 {
        (self.parent.len() - 1) as u32
    }

    /// Allocate a fresh provisional label.
    #[inline]
    pub(crate) fn make_label(&mut self) -> u32 {
        let label = self.parent.len() as u32;
        self.parent.push(label);
        label
    }

    /// Root of `label`, compressing the path walked.
    pub(crate) fn find(&mut self, label: u32) -> u32 {
        let mut root = label;
        while self.parent[root as usize] != root {
            root = self.parent[root as usize];
        }
        let mut cur = label;
        while self.parent[cur as usize] != root {
            let next = self.parent[cur as usize];
            self.parent[cur as usize] = root;
            cur = next;
        }
        root
    }

    /// Merge the classes of `a` and `b`; the smaller root wins.
    pub(crate) fn union(&mut self, a: u32, b: u32) -> u32 {
        let ra = self.find(a);
        let rb = self.find(b);
        let (lo, hi) = if ra <= rb { (ra, rb) } else { (rb, ra) };
        self.parent[hi as usize] = lo;
        lo
    }

    /// Map every provisional label to a dense canonical id.
    ///
    /// Canonical ids start at 1 and follow the order of each class's
    /// smallest provisional label, i.e. raster discovery order. Entry 0
    /// maps background to 0. Returns the table and the number of classes.
    pub(crate) fn resolve(&mut self) -> (Vec<u32>, u32) {
        let n = self.parent.len();
        let mut canonical = vec![0u32; n];
        let mut next = 0u32;
        for label in 1..n as u32 {
            let root = self.find(label);
            if root == label {
                next += 1;
                canonical[label as usize] = next;
            } else {
                // roots are smaller than their members, so already numbered
                canonical[label as usize] = canonical[root as usize];
            }
        }
        (canonical, next)
    }
}
