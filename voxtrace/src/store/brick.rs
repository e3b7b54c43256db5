use crate::bits::BitSet;
use crate::math::{Cube, Face7, GridAab, GridCoordinate, GridSize, GridVector, Rgb8};
use crate::raycast::{Ray, RayHit};
use crate::store::march_unit_cells;

/// A fixed 8×8×8 sub-grid of voxels: a presence bit-set and a color table,
/// in its own local coordinate frame `(0, 0, 0) .. (8, 8, 8)`.
///
/// Bricks are the leaf payload of [`BrickTree`](crate::store::BrickTree),
/// heap-allocated on the first insertion into a leaf region.
#[derive(Clone, Debug, PartialEq)]
pub struct Brick {
    presence: BitSet,
    colors: Box<[Rgb8]>,
}

impl Brick {
    /// Cubes per edge of a brick.
    pub const SIZE: GridCoordinate = 8;

    /// Cubes per brick.
    pub const VOLUME: usize = (Self::SIZE * Self::SIZE * Self::SIZE) as usize;

    /// The local-frame bounds of any brick.
    pub fn local_bounds() -> GridAab {
        GridAab::from_lower_size([0, 0, 0], GridSize::new(8, 8, 8))
    }

    /// Creates a brick with every cell absent.
    pub fn new() -> Self {
        Self {
            presence: BitSet::new(Self::VOLUME),
            colors: vec![Rgb8::BLACK; Self::VOLUME].into_boxed_slice(),
        }
    }

    /// Index of a local cell in the `z·64 + y·8 + x` layout, or [`None`]
    /// outside the brick.
    #[inline]
    fn index(cube: Cube) -> Option<usize> {
        Self::local_bounds().index(cube)
    }

    /// Returns the color of the local cell if present.
    #[inline]
    pub fn get(&self, cube: Cube) -> Option<Rgb8> {
        let index = Self::index(cube)?;
        self.presence.get(index).then(|| self.colors[index])
    }

    /// Makes a local cell present. Panics if `offset` is outside the brick.
    #[track_caller]
    pub fn set(&mut self, offset: GridVector, color: Rgb8) {
        let cube = Cube::new(offset.x, offset.y, offset.z);
        let index = Self::index(cube)
            .unwrap_or_else(|| panic!("Brick::set() offset {offset:?} outside the brick"));
        self.presence.set(index);
        self.colors[index] = color;
    }

    /// Makes a local cell absent; out-of-brick offsets are ignored.
    pub fn unset(&mut self, offset: GridVector) {
        if let Some(index) = Self::index(Cube::new(offset.x, offset.y, offset.z)) {
            self.presence.put(index, false);
            self.colors[index] = Rgb8::BLACK;
        }
    }

    /// Whether every cell is absent.
    pub fn is_empty(&self) -> bool {
        !self.presence.any()
    }

    /// Marches a ray given in the brick's local frame, entering through
    /// `entry_face` (the face of the enclosing leaf box that the outer walk
    /// crossed, so that a hit in the very first cell reports the right
    /// normal).
    pub fn march_local(&self, ray: Ray, entry_face: Face7) -> Option<RayHit> {
        march_unit_cells(ray, entry_face, |cube| self.get(cube))
    }
}

impl Default for Brick {
    fn default() -> Self {
        Self::new()
    }
}
