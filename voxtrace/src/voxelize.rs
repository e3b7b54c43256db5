//! Conversion of triangle meshes into voxel presence sets, after
//! “An Accurate Method for Voxelizing Polygon Meshes” (Huang et al., 1998).
//!
//! The output set is the union of three families of marked cells:
//!
//! * **S_v**: cells whose centers fall inside a bounding sphere around each
//!   vertex;
//! * **S_e**: cells whose centers fall inside a bounding cylinder around
//!   each unique edge;
//! * **S_f**: cells whose centers lie within a thin slab around each
//!   triangle's plane and on the inner side of its three edge planes.
//!
//! S_f is the hot loop and fans out one task per triangle; all three
//! producers feed marked cell indices through a channel into one presence
//! set, which is an idempotent union, so emission order is irrelevant.

use std::collections::BTreeSet;

use rayon::prelude::*;

use crate::bits::BitSet;
use crate::math::{
    normalize_or_zero, Cube, FreeCoordinate, FreePoint, FreeVector, GridCoordinate, GridSize,
    GridVector, Rgb8,
};
use crate::store::VoxelStore;

/// Which cells count as “connected” for the purposes of making a voxelized
/// surface gap-free; determines the bounding radii and slab thickness.
#[allow(clippy::exhaustive_enums)]
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Connectivity {
    /// Face connectivity: 6 neighbors. Produces the thinner surface.
    T6,
    /// Face, edge and vertex connectivity: 26 neighbors.
    T26,
}

/// Problems with voxelization parameters.
#[derive(Clone, Debug, displaydoc::Display, Eq, PartialEq)]
#[non_exhaustive]
pub enum VoxelizeError {
    /// voxelization resolution must be at least 1, got {0}
    InvalidResolution(u32),
}

impl std::error::Error for VoxelizeError {}

/// Problems with triangle mesh input.
#[derive(Clone, Debug, displaydoc::Display, Eq, PartialEq)]
#[non_exhaustive]
pub enum MeshError {
    /// triangle {triangle} references vertex {vertex} but the mesh has {vertex_count} vertices
    IndexOutOfRange {
        /// Position of the offending triangle in the input list.
        triangle: usize,
        /// The out-of-range vertex index.
        vertex: u32,
        /// Number of vertices actually supplied.
        vertex_count: usize,
    },
}

impl std::error::Error for MeshError {}

/// The geometry the voxelizer consumes: vertices normalized into the
/// ±1 cube, triangles, and the deduplicated undirected edge set.
///
/// This is the narrow interface between mesh file loading (out of scope
/// here) and voxelization: normals, texture coordinates and grouping are
/// already gone.
#[derive(Clone, Debug, PartialEq)]
pub struct TriangleMesh {
    vertices: Vec<FreePoint>,
    triangles: Vec<[u32; 3]>,
    edges: Vec<[u32; 2]>,
    /// Per-axis maximum |coordinate| after normalization; the largest axis
    /// is 1.0.
    max_abs: FreeVector,
}

impl TriangleMesh {
    /// Builds a mesh from raw vertices and triangles.
    ///
    /// Vertices are centered on their mid-extent and scaled so the greatest
    /// absolute coordinate is 1.0; `flip` then mirrors the chosen axes. The
    /// undirected edge set is deduplicated by sorted index pairs.
    pub fn new(
        mut vertices: Vec<FreePoint>,
        triangles: Vec<[u32; 3]>,
        flip: [bool; 3],
    ) -> Result<Self, MeshError> {
        for (index, triangle) in triangles.iter().enumerate() {
            for &vertex in triangle {
                if vertex as usize >= vertices.len() {
                    return Err(MeshError::IndexOutOfRange {
                        triangle: index,
                        vertex,
                        vertex_count: vertices.len(),
                    });
                }
            }
        }

        if !vertices.is_empty() {
            let mut low = vertices[0];
            let mut high = vertices[0];
            for &v in &vertices {
                low = low.min(v);
                high = high.max(v);
            }
            let mid = (low.to_vector() + high.to_vector()) * 0.5;
            let extent = (high - low) * 0.5;
            let largest = extent.x.max(extent.y).max(extent.z);
            let scale = if largest > 0.0 { largest.recip() } else { 1.0 };
            let sign = FreeVector::new(
                if flip[0] { -1.0 } else { 1.0 },
                if flip[1] { -1.0 } else { 1.0 },
                if flip[2] { -1.0 } else { 1.0 },
            );
            for v in &mut vertices {
                let centered = (*v - mid) * scale;
                *v = FreePoint::new(
                    centered.x * sign.x,
                    centered.y * sign.y,
                    centered.z * sign.z,
                );
            }
        }

        let mut max_abs = FreeVector::zero();
        for &v in &vertices {
            max_abs = max_abs.max(v.to_vector().abs());
        }

        let mut edge_set: BTreeSet<[u32; 2]> = BTreeSet::new();
        for &[a, b, c] in &triangles {
            for (p, q) in [(a, b), (b, c), (c, a)] {
                if p != q {
                    edge_set.insert([p.min(q), p.max(q)]);
                }
            }
        }

        Ok(Self {
            vertices,
            triangles,
            edges: edge_set.into_iter().collect(),
            max_abs,
        })
    }

    /// The normalized vertex positions.
    pub fn vertices(&self) -> &[FreePoint] {
        &self.vertices
    }

    /// The triangles, as vertex index triples.
    pub fn triangles(&self) -> &[[u32; 3]] {
        &self.triangles
    }

    /// The deduplicated undirected edges, as sorted vertex index pairs.
    pub fn edges(&self) -> &[[u32; 2]] {
        &self.edges
    }
}

/// A voxelized model: a presence set of the given dimensions with one
/// uniform fill color, compatible with any [`VoxelStore`] via
/// [`add_to()`](Self::add_to).
#[derive(Clone, Debug, PartialEq)]
pub struct VoxelModel {
    size: GridSize,
    presence: BitSet,
    color: Rgb8,
}

impl VoxelModel {
    /// Model dimensions in cells.
    pub fn size(&self) -> GridSize {
        self.size
    }

    /// The uniform fill color.
    pub fn color(&self) -> Rgb8 {
        self.color
    }

    /// The number of present cells.
    pub fn count(&self) -> usize {
        self.presence.count_ones()
    }

    /// Whether the cell at `cube` is present. Cells outside the model are
    /// absent.
    pub fn is_present(&self, cube: Cube) -> bool {
        match self.index(cube) {
            Some(index) => self.presence.get(index),
            None => false,
        }
    }

    fn index(&self, cube: Cube) -> Option<usize> {
        let (w, h, d) = (
            self.size.width as GridCoordinate,
            self.size.height as GridCoordinate,
            self.size.depth as GridCoordinate,
        );
        if cube.x < 0 || cube.y < 0 || cube.z < 0 || cube.x >= w || cube.y >= h || cube.z >= d {
            return None;
        }
        Some(((cube.z * h + cube.y) * w + cube.x) as usize)
    }

    /// Iterates over all present cells.
    pub fn cells(&self) -> impl Iterator<Item = Cube> + '_ {
        let w = (self.size.width as usize).max(1);
        let h = (self.size.height as usize).max(1);
        self.presence.iter_ones().map(move |index| {
            Cube::new(
                (index % w) as GridCoordinate,
                ((index / w) % h) as GridCoordinate,
                (index / (w * h)) as GridCoordinate,
            )
        })
    }

    /// Mirrors the presence set along the chosen axes.
    pub fn flip(&mut self, x: bool, y: bool, z: bool) {
        let (w, h, d) = (
            self.size.width as GridCoordinate,
            self.size.height as GridCoordinate,
            self.size.depth as GridCoordinate,
        );
        let mut flipped = BitSet::new(self.presence.len());
        for cube in self.cells() {
            let mirrored = Cube::new(
                if x { w - cube.x - 1 } else { cube.x },
                if y { h - cube.y - 1 } else { cube.y },
                if z { d - cube.z - 1 } else { cube.z },
            );
            flipped.set(self.index(mirrored).unwrap());
        }
        self.presence = flipped;
    }

    /// Inserts every present cell into `store`, translated by `offset`.
    /// Cells landing outside the store's bounds are skipped.
    pub fn add_to(&self, store: &mut impl VoxelStore, offset: GridVector) {
        for cube in self.cells() {
            store.insert(cube.wrapping_add(offset), self.color);
        }
    }
}

/// The cell lattice a model is voxelized onto: cell `(i, j, k)` has its
/// center at `((i, j, k) - (size - 1) / 2) · voxel_len` in mesh coordinates.
#[derive(Clone, Copy, Debug)]
struct ModelGrid {
    size: GridSize,
    voxel_len: FreeCoordinate,
}

impl ModelGrid {
    fn volume(&self) -> usize {
        self.size.width as usize * self.size.height as usize * self.size.depth as usize
    }

    fn contains(&self, cell: [GridCoordinate; 3]) -> bool {
        let [x, y, z] = cell;
        x >= 0
            && y >= 0
            && z >= 0
            && x < self.size.width as GridCoordinate
            && y < self.size.height as GridCoordinate
            && z < self.size.depth as GridCoordinate
    }

    fn index(&self, cell: [GridCoordinate; 3]) -> usize {
        let [x, y, z] = cell;
        ((z * self.size.height as GridCoordinate + y) * self.size.width as GridCoordinate + x)
            as usize
    }

    /// The cell whose center is nearest to the given mesh-space point
    /// (possibly outside the grid).
    fn nearest_cell(&self, point: FreePoint) -> [GridCoordinate; 3] {
        let inv = self.voxel_len.recip();
        let along = |p: FreeCoordinate, n: u32| -> GridCoordinate {
            (p * inv + (FreeCoordinate::from(n) - 1.0) * 0.5).round() as GridCoordinate
        };
        [
            along(point.x, self.size.width),
            along(point.y, self.size.height),
            along(point.z, self.size.depth),
        ]
    }

    /// The mesh-space center of a cell.
    fn cell_center(&self, cell: [GridCoordinate; 3]) -> FreePoint {
        let along = |c: GridCoordinate, n: u32| -> FreeCoordinate {
            (FreeCoordinate::from(c) - (FreeCoordinate::from(n) - 1.0) * 0.5) * self.voxel_len
        };
        FreePoint::new(
            along(cell[0], self.size.width),
            along(cell[1], self.size.height),
            along(cell[2], self.size.depth),
        )
    }
}

/// A plane in normal–offset form: `normal · p + d = 0`.
#[derive(Clone, Copy, Debug)]
struct Plane {
    normal: FreeVector,
    d: FreeCoordinate,
}

impl Plane {
    fn through(normal: FreeVector, point: FreePoint) -> Self {
        Self {
            normal,
            d: -normal.dot(point.to_vector()),
        }
    }

    fn signed_distance(&self, point: FreePoint) -> FreeCoordinate {
        self.normal.dot(point.to_vector()) + self.d
    }
}

/// Voxelizes `mesh` at the given resolution: the unit voxel side is
/// `2 / resolution`, and the output dimensions are
/// `⌈resolution · max_abs⌉` per axis.
///
/// Returns a [`VoxelModel`] filled with `color`.
pub fn voxelize(
    mesh: &TriangleMesh,
    connectivity: Connectivity,
    resolution: u32,
    color: Rgb8,
) -> Result<VoxelModel, VoxelizeError> {
    if resolution < 1 {
        return Err(VoxelizeError::InvalidResolution(resolution));
    }
    let voxel_len = 2.0 / FreeCoordinate::from(resolution);

    let bound_radius = match connectivity {
        Connectivity::T6 => voxel_len / 2.0,
        Connectivity::T26 => voxel_len / 2.0 * FreeCoordinate::sqrt(3.0),
    };

    let cells_along =
        |extent: FreeCoordinate| (FreeCoordinate::from(resolution) * extent).ceil() as u32;
    let grid = ModelGrid {
        size: GridSize::new(
            cells_along(mesh.max_abs.x),
            cells_along(mesh.max_abs.y),
            cells_along(mesh.max_abs.z),
        ),
        voxel_len,
    };

    let (sender, receiver) = flume::unbounded::<usize>();
    rayon::scope(|scope| {
        let tx = sender.clone();
        scope.spawn(move |_| vertex_set(mesh, grid, bound_radius, &tx));
        let tx = sender.clone();
        scope.spawn(move |_| edge_set(mesh, grid, bound_radius, &tx));
        let tx = sender.clone();
        scope.spawn(move |_| {
            mesh.triangles
                .par_iter()
                .for_each_with(tx, |tx, &triangle| {
                    face_set(mesh, grid, connectivity, triangle, tx);
                });
        });
    });
    drop(sender);

    let mut presence = BitSet::new(grid.volume());
    for index in receiver.try_iter() {
        presence.set(index);
    }

    log::debug!(
        "voxelized {} triangles at resolution {resolution} into {} of {}×{}×{} cells",
        mesh.triangles.len(),
        presence.count_ones(),
        grid.size.width,
        grid.size.height,
        grid.size.depth,
    );

    Ok(VoxelModel {
        size: grid.size,
        presence,
        color,
    })
}

/// S_v: cells whose centers fall within the bounding sphere of a vertex.
/// Candidates are the 27 cells around the nearest cell.
fn vertex_set(mesh: &TriangleMesh, grid: ModelGrid, radius: FreeCoordinate, tx: &flume::Sender<usize>) {
    for &vertex in &mesh.vertices {
        let [cx, cy, cz] = grid.nearest_cell(vertex);
        for i in -1..=1 {
            for j in -1..=1 {
                for k in -1..=1 {
                    let cell = [cx + i, cy + j, cz + k];
                    if grid.contains(cell)
                        && (grid.cell_center(cell) - vertex).square_length() <= radius * radius
                    {
                        tx.send(grid.index(cell)).unwrap();
                    }
                }
            }
        }
    }
}

/// S_e: cells whose centers fall within the bounding cylinder of an edge,
/// found by walking the edge in half-voxel steps. Zero-length edges are
/// skipped.
fn edge_set(mesh: &TriangleMesh, grid: ModelGrid, radius: FreeCoordinate, tx: &flume::Sender<usize>) {
    for &[a, b] in &mesh.edges {
        let (v1, v2) = (mesh.vertices[a as usize], mesh.vertices[b as usize]);
        let step = normalize_or_zero(v2 - v1) * (grid.voxel_len * 0.5);
        if step == FreeVector::zero() {
            continue;
        }

        let mut position = v1;
        while (v2 - position).dot(step) > 0.0 {
            let [cx, cy, cz] = grid.nearest_cell(position);
            for i in -1..=1 {
                for j in -1..=1 {
                    for k in -1..=1 {
                        let cell = [cx + i, cy + j, cz + k];
                        if grid.contains(cell) && inside_cylinder(grid.cell_center(cell), radius, v1, v2) {
                            tx.send(grid.index(cell)).unwrap();
                        }
                    }
                }
            }
            position += step;
        }
    }
}

/// Whether `point` lies within the infinite cylinder of the given radius
/// around segment `a`–`b`, between the planes through the endpoints.
fn inside_cylinder(
    point: FreePoint,
    radius: FreeCoordinate,
    a: FreePoint,
    b: FreePoint,
) -> bool {
    let axis = b - a;
    (point - a).dot(axis) >= 0.0
        && (point - b).dot(axis) <= 0.0
        && (point - a).cross(axis).square_length() <= radius * radius * axis.square_length()
}

/// S_f: cells within slab distance `t` of the triangle's plane and on the
/// non-negative side of all three edge planes. Zero-area triangles
/// contribute nothing (their vertices and edges are still covered by S_v
/// and S_e).
fn face_set(
    mesh: &TriangleMesh,
    grid: ModelGrid,
    connectivity: Connectivity,
    triangle: [u32; 3],
    tx: &flume::Sender<usize>,
) {
    let v1 = mesh.vertices[triangle[0] as usize];
    let v2 = mesh.vertices[triangle[1] as usize];
    let v3 = mesh.vertices[triangle[2] as usize];

    let normal = normalize_or_zero((v2 - v1).cross(v3 - v1));
    if normal == FreeVector::zero() {
        return;
    }
    let face_plane = Plane::through(normal, v1);
    let edge_planes = [
        Plane::through(normalize_or_zero(normal.cross(v2 - v1)), v1),
        Plane::through(normalize_or_zero(normal.cross(v3 - v2)), v2),
        Plane::through(normalize_or_zero(normal.cross(v1 - v3)), v3),
    ];

    // Slab half-thickness: distance from a cell center at which the cell
    // still touches the plane, under the chosen connectivity.
    let half = grid.voxel_len * 0.5;
    let t = match connectivity {
        Connectivity::T6 => half * normal.x.abs().max(normal.y.abs()).max(normal.z.abs()),
        Connectivity::T26 => {
            let inv_sqrt3 = FreeCoordinate::sqrt(3.0).recip();
            let mut cos_alpha: FreeCoordinate = 0.0;
            for i in [-1.0, 1.0] {
                for j in [-1.0, 1.0] {
                    for k in [-1.0, 1.0] {
                        let diagonal = FreeVector::new(i, j, k) * inv_sqrt3;
                        cos_alpha = cos_alpha.max(normal.dot(diagonal));
                    }
                }
            }
            half * FreeCoordinate::sqrt(3.0) * cos_alpha
        }
    };

    // Iterate the cells of the triangle's bounding box grown by t.
    let low = FreePoint::new(
        v1.x.min(v2.x).min(v3.x) - t,
        v1.y.min(v2.y).min(v3.y) - t,
        v1.z.min(v2.z).min(v3.z) - t,
    );
    let high = FreePoint::new(
        v1.x.max(v2.x).max(v3.x) + t,
        v1.y.max(v2.y).max(v3.y) + t,
        v1.z.max(v2.z).max(v3.z) + t,
    );
    let [x0, y0, z0] = grid.nearest_cell(low);
    let [x1, y1, z1] = grid.nearest_cell(high);

    for x in x0..=x1 {
        for y in y0..=y1 {
            for z in z0..=z1 {
                let cell = [x, y, z];
                if !grid.contains(cell) {
                    continue;
                }
                let center = grid.cell_center(cell);
                if face_plane.signed_distance(center).abs() <= t
                    && edge_planes
                        .iter()
                        .all(|plane| plane.signed_distance(center) >= 0.0)
                {
                    tx.send(grid.index(cell)).unwrap();
                }
            }
        }
    }
}
