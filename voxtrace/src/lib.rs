//! CPU voxel raycasting.
//!
//! `voxtrace` stores scenes of opaque colored unit cubes and answers one
//! question fast: given a ray, which cube does it hit first? Three storage
//! backends (a dense bit-array grid, a sparse octree, and an octree of 8³
//! “bricks”) share the [`store::VoxelStore`] interface, so rendering code
//! is written once against the trait. The hierarchical backends walk a
//! doubly-linked tree with a per-node-rescaled DDA, skipping whole empty
//! subtrees in a single step.
//!
//! The crate also provides the supporting cast a renderer needs:
//!
//! * [`math`]: grid/free coordinate types, axis-aligned boxes, faces,
//!   octants, colors;
//! * [`raycast`]: the unit-grid DDA walker and hit records;
//! * [`light`]: point lights and the per-voxel shading cache;
//! * [`voxelize`]: triangle-mesh voxelization (Huang's
//!   separating-triangle algorithm);
//! * [`bits`]: the packed boolean sets backing presence storage.
//!
//! Camera handling, shading and frame dispatch live in the companion
//! `voxtrace-render` crate.

pub mod bits;
pub mod light;
pub mod math;
pub mod raycast;
pub mod store;
pub mod voxelize;
