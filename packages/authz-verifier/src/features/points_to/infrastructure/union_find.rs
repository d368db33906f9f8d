//! Union-Find over dense element ids
//!
//! Union by rank with path halving. Used to merge variables that may alias
//! into one equivalence class before locations are assigned.

/// Disjoint sets of `u32` ids
#[derive(Debug, Clone, Default)]
pub struct UnionFind {
    /// Parent pointers (self-loop = root)
    parent: Vec<u32>,

    /// Tree height upper bound, valid for roots
    rank: Vec<u8>,

    /// Number of disjoint sets
    set_count: usize,
}

impl UnionFind {
    pub fn new(n: usize) -> Self {
        Self {
            parent: (0..n as u32).collect(),
            rank: vec![0; n],
            set_count: n,
        }
    }

    /// Append a fresh singleton and return its id
    pub fn push(&mut self) -> u32 {
        let id = self.parent.len() as u32;
        self.parent.push(id);
        self.rank.push(0);
        self.set_count += 1;
        id
    }

    /// Representative of `x`, halving the path on the way up
    pub fn find(&mut self, x: u32) -> u32 {
        let mut current = x;
        while self.parent[current as usize] != current {
            let grandparent = self.parent[self.parent[current as usize] as usize];
            self.parent[current as usize] = grandparent;
            current = grandparent;
        }
        current
    }

    /// Representative of `x` without compressing
    pub fn find_readonly(&self, x: u32) -> u32 {
        let mut current = x;
        while self.parent[current as usize] != current {
            current = self.parent[current as usize];
        }
        current
    }

    /// Merge the sets of `x` and `y`; returns the new representative
    pub fn union(&mut self, x: u32, y: u32) -> u32 {
        let root_x = self.find(x);
        let root_y = self.find(y);
        if root_x == root_y {
            return root_x;
        }

        let (rx, ry) = (root_x as usize, root_y as usize);
        let root = match self.rank[rx].cmp(&self.rank[ry]) {
            std::cmp::Ordering::Less => {
                self.parent[rx] = root_y;
                root_y
            }
            std::cmp::Ordering::Greater => {
                self.parent[ry] = root_x;
                root_x
            }
            std::cmp::Ordering::Equal => {
                self.parent[ry] = root_x;
                self.rank[rx] += 1;
                root_x
            }
        };

        self.set_count -= 1;
        root
    }

    pub fn connected(&mut self, x: u32, y: u32) -> bool {
        self.find(x) == self.find(y)
    }

    /// Number of disjoint sets
    pub fn count(&self) -> usize {
        self.set_count
    }

    pub fn len(&self) -> usize {
        self.parent.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parent.is_empty()
    }

    /// Fully compress so every element points at its root
    pub fn flatten(&mut self) {
        for i in 0..self.parent.len() as u32 {
            let root = self.find(i);
            self.parent[i as usize] = root;
        }
    }
}
