//! Generic rapidly-exploring random tree.
//!
//! The tree grows over any configuration type through the [`RrtSpace`]
//! trait: the space owns the sampler (and therefore the RNG), the
//! interpolation rule, the connectivity test, and the goal predicate.  The
//! tree itself only does the bookkeeping — vertices, parent links, goals —
//! so the concrete grid wiring in [`finder`][crate::finder] stays small.

/// A configuration space the tree can grow through.
pub trait RrtSpace {
    type Config: Copy + PartialEq;

    /// Draw the next candidate from the remaining free set, or `None` when
    /// the space is exhausted.  Sampling consumes the candidate: the same
    /// configuration is not offered twice.
    fn sample(&mut self) -> Option<Self::Config>;

    /// Move from `nearest` toward `sample`, at most one growth step.
    fn interpolate(&self, nearest: &Self::Config, sample: &Self::Config) -> Self::Config;

    /// Metric used for the nearest-vertex lookup.
    fn distance(&self, a: &Self::Config, b: &Self::Config) -> f64;

    /// `true` if the edge from `from` to `to` is traversable.
    fn is_connected(&self, from: &Self::Config, to: &Self::Config) -> bool;

    /// `true` if `config` belongs to the goal set.
    fn is_goal(&self, config: &Self::Config) -> bool;
}

/// The growing tree.
pub struct Rrt<S: RrtSpace> {
    space:    S,
    vertices: Vec<S::Config>,
    /// `parents[i]` is the index of vertex `i`'s parent; the root points at
    /// itself.
    parents:  Vec<usize>,
    goals:    Vec<usize>,
}

impl<S: RrtSpace> Rrt<S> {
    /// Root the tree at `initial`.
    pub fn new(space: S, initial: S::Config) -> Self {
        let goals = if space.is_goal(&initial) { vec![0] } else { Vec::new() };
        Self {
            space,
            vertices: vec![initial],
            parents: vec![0],
            goals,
        }
    }

    /// One growth attempt: sample → nearest → interpolate → accept.
    ///
    /// The interpolated configuration is accepted iff it is not already a
    /// vertex and the edge from its nearest neighbour is connected.  Returns
    /// the accepted configuration, or `None` for a rejected attempt (which
    /// still consumes one sample and counts as one iteration).
    pub fn grow(&mut self) -> Option<S::Config> {
        let sample = self.space.sample()?;

        // Nearest vertex; ties break on the lower index for determinism.
        let nearest = (0..self.vertices.len())
            .min_by(|&a, &b| {
                self.space
                    .distance(&self.vertices[a], &sample)
                    .total_cmp(&self.space.distance(&self.vertices[b], &sample))
                    .then(a.cmp(&b))
            })
            .expect("tree always holds at least the root");

        let config = self.space.interpolate(&self.vertices[nearest], &sample);
        if self.vertices.iter().any(|v| *v == config) {
            return None;
        }
        if !self.space.is_connected(&self.vertices[nearest], &config) {
            return None;
        }

        self.vertices.push(config);
        self.parents.push(nearest);
        if self.space.is_goal(&config) {
            self.goals.push(self.vertices.len() - 1);
        }
        Some(config)
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    pub fn vertices(&self) -> &[S::Config] {
        &self.vertices
    }

    #[inline]
    pub fn goal_count(&self) -> usize {
        self.goals.len()
    }

    /// Root-to-goal path for the shortest-length goal found so far, or
    /// `None` when no goal was reached.
    pub fn path(&self) -> Option<Vec<S::Config>> {
        let best = self
            .goals
            .iter()
            .copied()
            .min_by(|&a, &b| {
                self.path_length(a)
                    .total_cmp(&self.path_length(b))
                    .then(a.cmp(&b))
            })?;

        let mut indices = vec![best];
        let mut cur = best;
        while self.parents[cur] != cur {
            cur = self.parents[cur];
            indices.push(cur);
        }
        indices.reverse();
        Some(indices.into_iter().map(|i| self.vertices[i]).collect())
    }

    /// Total metric length from the root to vertex `index`.
    fn path_length(&self, index: usize) -> f64 {
        let mut len = 0.0;
        let mut cur = index;
        while self.parents[cur] != cur {
            let parent = self.parents[cur];
            len += self.space.distance(&self.vertices[parent], &self.vertices[cur]);
            cur = parent;
        }
        len
    }
}
