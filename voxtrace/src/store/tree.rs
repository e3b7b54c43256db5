use crate::math::{
    Cube, FreeCoordinate, GridAab, GridCoordinate, GridSize, GridVector, Octant, Rgb8,
};
use crate::raycast::{Ray, RayHit, Raycaster};
use crate::store::{Brick, VoxelStore};

/// Nodes are kept in a flat arena and named by index, so that a node can
/// refer to its parent without reference cycles and the tree walker is just
/// a pair of integers.
type NodeId = u32;

const ROOT: NodeId = 0;

/// Trees deeper than this indicate a corrupted structure rather than a big
/// scene (a root this deep would span 2³² cubes).
const MAX_DEPTH: u32 = 32;

/// What a [`Tree`] stores at the bottom of its subdivision.
///
/// The two implementations are [`Voxel`] (leaf boxes are single cubes; the
/// tree is a classic sparse octree) and [`Brick`] (leaf boxes are 8³ regions
/// holding a dense sub-grid). Everything else about the tree (construction,
/// the parent-linked walker, empty-subtree skipping) is identical between
/// the two, so it is written once, generic over this trait.
pub trait Leaf: Default + core::fmt::Debug {
    /// Side length of the cube region one leaf payload covers.
    const SIDE: GridCoordinate;

    /// Makes the cell at `offset` (relative to the leaf's lower corner)
    /// present with the given color.
    fn insert(&mut self, offset: GridVector, color: Rgb8);

    /// Makes the cell at `offset` absent. Returns `true` if the whole leaf
    /// is now empty and may be discarded.
    fn erase(&mut self, offset: GridVector) -> bool;

    /// Returns the color of the cell at `offset` if present.
    fn sample(&self, offset: GridVector) -> Option<Rgb8>;

    /// Continues a ray march that has arrived at this leaf's box `aab`, with
    /// the walker `march` positioned inside it. Returns the hit, if any,
    /// in world coordinates.
    fn march_leaf(&self, ray: Ray, aab: GridAab, march: &Raycaster) -> Option<RayHit>;
}

/// The payload of a [`SparseOctree`] leaf: one present voxel's color.
/// (Absent voxels are represented by the absence of the payload.)
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Voxel {
    /// Surface color of the voxel.
    pub color: Rgb8,
}

impl Default for Voxel {
    fn default() -> Self {
        Self { color: Rgb8::BLACK }
    }
}

impl Leaf for Voxel {
    const SIDE: GridCoordinate = 1;

    fn insert(&mut self, _offset: GridVector, color: Rgb8) {
        self.color = color;
    }

    fn erase(&mut self, _offset: GridVector) -> bool {
        true
    }

    fn sample(&self, _offset: GridVector) -> Option<Rgb8> {
        Some(self.color)
    }

    fn march_leaf(&self, ray: Ray, _aab: GridAab, march: &Raycaster) -> Option<RayHit> {
        Some(march.hit(&ray, self.color))
    }
}

impl Leaf for Brick {
    const SIDE: GridCoordinate = Brick::SIZE;

    fn insert(&mut self, offset: GridVector, color: Rgb8) {
        self.set(offset, color);
    }

    fn erase(&mut self, offset: GridVector) -> bool {
        self.unset(offset);
        self.is_empty()
    }

    fn sample(&self, offset: GridVector) -> Option<Rgb8> {
        self.get(Cube::new(offset.x, offset.y, offset.z))
    }

    fn march_leaf(&self, ray: Ray, aab: GridAab, march: &Raycaster) -> Option<RayHit> {
        // Continue in the brick's local frame: translate the entry point to
        // the leaf's lower corner and bound the local march at the leaf exit.
        let entry_t = march.t_distance();
        let (_, exit_t) = aab.ray_intersection(ray)?;
        let low = aab.lower_bounds().map(FreeCoordinate::from).to_vector();
        let local_ray = Ray {
            origin: ray.point_at(entry_t) - low,
            direction: ray.direction,
            t_max: exit_t - entry_t,
        };

        let local_hit = self.march_local(local_ray, march.last_face())?;
        Some(RayHit::new(
            &ray,
            entry_t + local_hit.t_distance,
            local_hit.cube.wrapping_add(aab.lower_bounds().to_vector()),
            local_hit.color,
            local_hit.face,
        ))
    }
}

#[derive(Debug)]
struct TreeNode<L> {
    aab: GridAab,
    parent: Option<NodeId>,
    /// Either no children, or all eight, in [`Octant`] linear-index order.
    children: Option<[NodeId; 8]>,
    /// Present only on nodes whose box side is `L::SIDE`.
    payload: Option<L>,
}

impl<L> TreeNode<L> {
    fn is_stem(&self) -> bool {
        self.children.is_some()
    }
}

/// A binary-splitting cube tree over the region `(0, 0, 0) .. (s, s, s)`
/// where `s` is a power of two.
///
/// Every node covers a cube; a stem's eight children cover its octants.
/// Subdivision happens on demand during insertion and is never undone:
/// erasing voxels empties leaves but keeps the node structure, so a once-used
/// region stays cheap to re-populate.
///
/// See [`Leaf`] for the two concrete configurations, [`SparseOctree`] and
/// [`BrickTree`].
#[derive(Debug)]
pub struct Tree<L> {
    nodes: Vec<TreeNode<L>>,
}

/// A [`Tree`] with single-voxel leaves.
pub type SparseOctree = Tree<Voxel>;

/// A [`Tree`] with 8³ [`Brick`] leaves.
pub type BrickTree = Tree<Brick>;

impl<L: Leaf> Tree<L> {
    /// Creates an empty tree whose root covers at least `(0, 0, 0) .. size`,
    /// rounded up to the next power-of-two cube no smaller than one leaf.
    pub fn new(size: GridSize) -> Self {
        let requested = size
            .width
            .max(size.height)
            .max(size.depth)
            .max(L::SIDE as u32)
            .max(1);
        let side = requested.next_power_of_two();
        Self {
            nodes: vec![TreeNode {
                aab: GridAab::from_lower_size([0, 0, 0], GridSize::new(side, side, side)),
                parent: None,
                children: None,
                payload: None,
            }],
        }
    }

    fn node(&self, id: NodeId) -> &TreeNode<L> {
        &self.nodes[id as usize]
    }

    /// Splits a childless node into eight empty octant children.
    fn subdivide(&mut self, id: NodeId) {
        debug_assert!(!self.node(id).is_stem());
        let octant_boxes = self.node(id).aab.octants();
        let base = self.nodes.len() as NodeId;
        for aab in octant_boxes {
            self.nodes.push(TreeNode {
                aab,
                parent: Some(id),
                children: None,
                payload: None,
            });
        }
        self.nodes[id as usize].children = Some(core::array::from_fn(|i| base + i as NodeId));
    }

    /// Finds the leaf-sized node containing `cube` without modifying the
    /// tree. [`None`] if the cube is outside the root or its region was
    /// never subdivided down to leaf size.
    fn find_leaf(&self, cube: Cube) -> Option<NodeId> {
        if !self.node(ROOT).aab.contains_cube(cube) {
            return None;
        }
        let mut id = ROOT;
        loop {
            let node = self.node(id);
            if node.aab.size_scalar() == L::SIDE {
                return Some(id);
            }
            id = node.children?[node.aab.octant_of(cube).index()];
        }
    }

    /// Finds the leaf-sized node containing `cube`, subdividing on the way
    /// down as needed. [`None`] if the cube is outside the root.
    fn find_or_create_leaf(&mut self, cube: Cube) -> Option<NodeId> {
        if !self.node(ROOT).aab.contains_cube(cube) {
            return None;
        }
        let mut id = ROOT;
        loop {
            let aab = self.node(id).aab;
            if aab.size_scalar() == L::SIDE {
                return Some(id);
            }
            if !self.node(id).is_stem() {
                self.subdivide(id);
            }
            let children = self.node(id).children.unwrap();
            id = children[aab.octant_of(cube).index()];
        }
    }

    /// Returns the color of `cube` if it is present.
    pub fn get(&self, cube: Cube) -> Option<Rgb8> {
        let id = self.find_leaf(cube)?;
        let node = self.node(id);
        node.payload
            .as_ref()?
            .sample(cube.lower_bounds() - node.aab.lower_bounds())
    }

    /// The number of nodes currently allocated, including the root.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }
}

impl<L: Leaf> VoxelStore for Tree<L> {
    fn bounds(&self) -> GridAab {
        self.node(ROOT).aab
    }

    fn insert(&mut self, cube: Cube, color: Rgb8) -> bool {
        match self.find_or_create_leaf(cube) {
            Some(id) => {
                let offset = cube.lower_bounds() - self.node(id).aab.lower_bounds();
                self.nodes[id as usize]
                    .payload
                    .get_or_insert_with(L::default)
                    .insert(offset, color);
                true
            }
            None => false,
        }
    }

    fn erase(&mut self, cube: Cube) {
        if let Some(id) = self.find_leaf(cube) {
            let offset = cube.lower_bounds() - self.node(id).aab.lower_bounds();
            let node = &mut self.nodes[id as usize];
            if let Some(payload) = &mut node.payload {
                if payload.erase(offset) {
                    node.payload = None;
                }
            }
        }
    }

    /// Stackless hierarchical march: locate the smallest node containing the
    /// walker's cube via the parent-linked walker, and either finish in a
    /// leaf or reconfigure the DDA to leap the node's whole box in one step.
    fn march_ray(&self, ray: Ray) -> Option<RayHit> {
        let (entry_t, exit_t) = self.bounds().ray_intersection(ray)?;

        let mut march = Raycaster::new(&ray);
        march.fast_forward(entry_t, &ray);

        let mut walker = TreeWalker::new(self);
        let mut entered = false;
        loop {
            if march.t_distance() > ray.t_max {
                return None;
            }
            walker.goto_absolute(march.cube());
            let node = walker.current();

            if !node.aab.contains_cube(march.cube()) {
                // Outside the root box: either still closing in on it from a
                // fast-forwarded start, or past it for good.
                if entered || march.t_distance() > exit_t {
                    return None;
                }
                march.step();
                continue;
            }
            entered = true;

            if let Some(payload) = &node.payload {
                if let Some(hit) = payload.march_leaf(ray, node.aab, &march) {
                    return Some(hit);
                }
                // A brick the ray passes through without touching anything
                // is skipped like any other empty region.
            }

            march.scale_to_box(node.aab, &ray);
            march.step();
            march.resynchronize(&ray);
        }
    }
}

/// A cursor into a [`Tree`]: a current node plus its depth.
///
/// Navigation is [`ascend()`](Self::ascend) along the parent link,
/// [`descend()`](Self::descend) into an octant, and the combined
/// [`goto_absolute()`](Self::goto_absolute), which is all the ray march
/// uses: worst case O(depth), and O(1) amortized when successive queries
/// move cube by cube.
#[derive(Debug)]
pub struct TreeWalker<'t, L> {
    tree: &'t Tree<L>,
    node: NodeId,
    level: u32,
}

impl<'t, L: Leaf> TreeWalker<'t, L> {
    /// Creates a walker positioned at the root.
    pub fn new(tree: &'t Tree<L>) -> Self {
        Self {
            tree,
            node: ROOT,
            level: 0,
        }
    }

    fn current(&self) -> &'t TreeNode<L> {
        self.tree.node(self.node)
    }

    /// The box of the current node.
    pub fn aab(&self) -> GridAab {
        self.current().aab
    }

    /// Depth of the current node; 0 at the root.
    pub fn level(&self) -> u32 {
        self.level
    }

    /// Whether the current node is the root.
    pub fn is_root(&self) -> bool {
        self.node == ROOT
    }

    /// Moves to the parent node.
    ///
    /// Panics when already at the root.
    pub fn ascend(&mut self) {
        match self.current().parent {
            Some(parent) => {
                self.node = parent;
                self.level -= 1;
            }
            None => panic!("TreeWalker::ascend() above the root"),
        }
    }

    /// Moves into the given octant child of the current node.
    ///
    /// Panics if the current node has no children, or at depth
    /// [`MAX_DEPTH`].
    pub fn descend(&mut self, octant: Octant) {
        assert!(
            self.level < MAX_DEPTH,
            "TreeWalker::descend() past level {MAX_DEPTH}"
        );
        match self.current().children {
            Some(children) => {
                self.node = children[octant.index()];
                self.level += 1;
            }
            None => panic!("TreeWalker::descend() from a node with no children"),
        }
    }

    /// Repositions the walker at the smallest node containing `cube`:
    /// ascends until the current box contains it (or the root is reached),
    /// then descends while the node is a stem.
    ///
    /// If `cube` is outside the whole tree, the walker is left at the root.
    pub fn goto_absolute(&mut self, cube: Cube) {
        while !self.aab().contains_cube(cube) {
            if self.is_root() {
                return;
            }
            self.ascend();
        }
        while self.current().is_stem() {
            self.descend(self.aab().octant_of(cube));
        }
    }
}
