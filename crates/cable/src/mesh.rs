//! Y-shaped cable mesh.
//!
//! Branch A runs from its free end to the junction, where branches B and C
//! start. Nodes are spaced uniformly and numbered branch by branch:
//!
//! ```text
//! A: 0 ..= junction        (junction is the last node of A)
//! B: junction + 1 .. c0
//! C: c0 .. n
//! ```
//!
//! The discrete Laplacian is the graph Laplacian over node neighbours scaled
//! by `1 / dx²`, which seals the free ends and conserves current at the
//! junction.

use std::{fmt, ops::Range};

use log::info;
use thiserror::Error;
use uom::si::{f64::Length, length::centimeter};

/// One of the three branches of the mesh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Branch {
    A,
    B,
    C,
}

impl Branch {
    pub const ALL: [Branch; 3] = [Branch::A, Branch::B, Branch::C];
}

impl fmt::Display for Branch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Branch::A => "A",
            Branch::B => "B",
            Branch::C => "C",
        };
        f.write_str(name)
    }
}

/// Errors that can occur when building a [`Mesh`].
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum MeshError {
    #[error("mesh spacing must be finite and positive, got {0} cm")]
    Spacing(f64),

    #[error("branch {branch} of length {length} cm holds no interior node")]
    BranchTooShort { branch: Branch, length: f64 },
}

/// Default branch lengths of the Y-shaped cable, in centimetres.
pub const DEFAULT_LENGTHS: [f64; 3] = [1.0, 0.5, 0.5];

/// A uniform Y-shaped mesh.
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    dx: f64,
    lengths: [f64; 3],
    grid: Vec<f64>,
    neighbours: Vec<Vec<usize>>,
    ranges: [Range<usize>; 3],
}

impl Mesh {
    /// Builds a mesh with spacing `dx` and branch lengths `[A, B, C]`.
    ///
    /// Each branch length is rounded to a whole number of spacings.
    ///
    /// # Errors
    ///
    /// Returns a [`MeshError`] if `dx` is not positive or a branch is shorter
    /// than one spacing.
    pub fn new(dx: Length, lengths: [Length; 3]) -> Result<Self, MeshError> {
        let dx = dx.get::<centimeter>();
        if !dx.is_finite() || dx <= 0.0 {
            return Err(MeshError::Spacing(dx));
        }

        let lengths = lengths.map(|l| l.get::<centimeter>());
        let mut counts = [0; 3];
        for (branch, (&length, count)) in Branch::ALL.iter().zip(lengths.iter().zip(&mut counts)) {
            let cells = (length / dx).round();
            if !(cells >= 1.0) {
                return Err(MeshError::BranchTooShort {
                    branch: *branch,
                    length,
                });
            }
            *count = cells as usize;
        }
        let [na, nb, nc] = counts;

        let junction = na;
        let b_start = junction + 1;
        let c_start = b_start + nb;
        let n = c_start + nc;

        let mut grid = Vec::with_capacity(n);
        grid.extend((0..=na).map(|i| i as f64 * dx));
        let length_a = na as f64 * dx;
        grid.extend((1..=nb).map(|k| length_a + k as f64 * dx));
        grid.extend((1..=nc).map(|k| length_a + k as f64 * dx));

        let mut neighbours = vec![Vec::with_capacity(3); n];
        let mut connect = |i: usize, j: usize| {
            neighbours[i].push(j);
            neighbours[j].push(i);
        };
        for i in 1..=junction {
            connect(i - 1, i);
        }
        for start in [b_start, c_start] {
            connect(junction, start);
        }
        for i in b_start + 1..c_start {
            connect(i - 1, i);
        }
        for i in c_start + 1..n {
            connect(i - 1, i);
        }

        Ok(Self {
            dx,
            lengths,
            grid,
            neighbours,
            ranges: [0..b_start, b_start..c_start, c_start..n],
        })
    }

    /// Builds a mesh with spacing `dx` and the default branch lengths.
    ///
    /// # Errors
    ///
    /// Returns a [`MeshError`] if `dx` is not positive or too coarse.
    pub fn y_junction(dx: Length) -> Result<Self, MeshError> {
        Self::new(dx, DEFAULT_LENGTHS.map(Length::new::<centimeter>))
    }

    /// Returns the number of nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.grid.len()
    }

    /// Returns `true` if the mesh has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.grid.is_empty()
    }

    /// Returns the node spacing in centimetres.
    #[must_use]
    pub fn dx(&self) -> f64 {
        self.dx
    }

    /// Returns the node spacing.
    #[must_use]
    pub fn spacing(&self) -> Length {
        Length::new::<centimeter>(self.dx)
    }

    /// Returns each node's distance from the free end of branch A along its
    /// own path, in centimetres.
    #[must_use]
    pub fn grid(&self) -> &[f64] {
        &self.grid
    }

    /// Returns the indices of the nodes adjacent to `node`.
    #[must_use]
    pub fn neighbours(&self, node: usize) -> &[usize] {
        &self.neighbours[node]
    }

    /// Returns the node indices belonging to `branch`.
    #[must_use]
    pub fn branch(&self, branch: Branch) -> Range<usize> {
        match branch {
            Branch::A => self.ranges[0].clone(),
            Branch::B => self.ranges[1].clone(),
            Branch::C => self.ranges[2].clone(),
        }
    }

    /// Returns the node where the three branches meet.
    #[must_use]
    pub fn junction(&self) -> usize {
        self.ranges[0].end - 1
    }

    /// Returns the monitored node, three spacings before the junction on
    /// branch A.
    #[must_use]
    pub fn probe_node(&self) -> usize {
        self.junction().saturating_sub(3)
    }

    /// Returns the largest number of neighbours of any node.
    #[must_use]
    pub fn max_degree(&self) -> usize {
        self.neighbours.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// Writes the discrete Laplacian of `u` into `out`.
    pub fn laplacian(&self, u: &[f64], out: &mut [f64]) {
        debug_assert_eq!(u.len(), self.len());
        let scale = 1.0 / (self.dx * self.dx);
        for ((o, ui), nbrs) in out.iter_mut().zip(u).zip(&self.neighbours) {
            *o = scale * nbrs.iter().map(|&j| u[j] - ui).sum::<f64>();
        }
    }

    /// Logs a summary of the mesh.
    pub fn print_info(&self) {
        info!("{self}");
    }
}

impl fmt::Display for Mesh {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Y-shaped cable mesh")?;
        writeln!(f, "  spacing:  {} cm", self.dx)?;
        writeln!(f, "  nodes:    {}", self.len())?;
        for (branch, length) in Branch::ALL.iter().zip(self.lengths) {
            let range = self.branch(*branch);
            writeln!(
                f,
                "  branch {branch}: {length} cm, nodes {}..{}",
                range.start, range.end
            )?;
        }
        write!(f, "  probe:    node {}", self.probe_node())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    fn cm(value: f64) -> Length {
        Length::new::<centimeter>(value)
    }

    fn small_mesh() -> Mesh {
        // A: 0..=4, B: 5..7, C: 7..9.
        Mesh::new(cm(0.25), [cm(1.0), cm(0.5), cm(0.5)]).unwrap()
    }

    #[test]
    fn numbers_nodes_branch_by_branch() {
        let mesh = small_mesh();
        assert_eq!(mesh.len(), 9);
        assert_eq!(mesh.branch(Branch::A), 0..5);
        assert_eq!(mesh.branch(Branch::B), 5..7);
        assert_eq!(mesh.branch(Branch::C), 7..9);
        assert_eq!(mesh.junction(), 4);
        assert_eq!(mesh.probe_node(), 1);
    }

    #[test]
    fn junction_connects_all_branches() {
        let mesh = small_mesh();
        let mut nbrs = mesh.neighbours(4).to_vec();
        nbrs.sort_unstable();
        assert_eq!(nbrs, vec![3, 5, 7]);
        assert_eq!(mesh.neighbours(0), &[1]);
        assert_eq!(mesh.neighbours(6), &[5]);
        assert_eq!(mesh.neighbours(8), &[7]);
        assert_eq!(mesh.max_degree(), 3);
    }

    #[test]
    fn grid_measures_distance_along_path() {
        let mesh = small_mesh();
        assert_relative_eq!(mesh.grid()[4], 1.0);
        assert_relative_eq!(mesh.grid()[6], 1.5);
        assert_relative_eq!(mesh.grid()[7], 1.25);
    }

    #[test]
    fn laplacian_of_constant_vanishes() {
        let mesh = small_mesh();
        let u = vec![3.0; mesh.len()];
        let mut out = vec![1.0; mesh.len()];
        mesh.laplacian(&u, &mut out);
        assert!(out.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn laplacian_conserves_total() {
        let mesh = small_mesh();
        let u: Vec<f64> = (0..mesh.len()).map(|i| (i * i) as f64).collect();
        let mut out = vec![0.0; mesh.len()];
        mesh.laplacian(&u, &mut out);
        assert_relative_eq!(out.iter().sum::<f64>(), 0.0, epsilon = 1e-9);
    }

    #[test]
    fn default_mesh_matches_spacing() {
        let mesh = Mesh::y_junction(cm(0.01)).unwrap();
        assert_eq!(mesh.len(), 201);
        assert_relative_eq!(mesh.spacing().get::<centimeter>(), 0.01);
    }

    #[test]
    fn rejects_bad_geometry() {
        assert_eq!(
            Mesh::new(cm(0.0), [cm(1.0); 3]).unwrap_err(),
            MeshError::Spacing(0.0)
        );
        assert!(matches!(
            Mesh::new(cm(0.5), [cm(1.0), cm(0.1), cm(1.0)]),
            Err(MeshError::BranchTooShort {
                branch: Branch::B,
                ..
            })
        ));
    }

    #[test]
    fn display_lists_branches() {
        let text = small_mesh().to_string();
        assert!(text.contains("nodes:    9"));
        assert!(text.contains("branch B"));
    }
}
