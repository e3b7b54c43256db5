//! Rendering for [`voxtrace`] voxel scenes: camera, direct-lighting
//! shading, and the parallel frame dispatcher.
//!
//! A frame is produced by [`renderer::render()`]: it takes any store
//! implementing [`voxtrace::store::VoxelStore`], a [`camera::Camera`], the
//! scene's lights, and writes RGBA8 pixels into a
//! [`framebuffer::Framebuffer`]. Window-system presentation, input mapping
//! and scene configuration are deliberately out of scope; callers feed
//! input deltas to the camera ([`Camera::update_rotation_fps`],
//! [`Camera::handle_scroll`]) and blit the finished pixels themselves.
//!
//! [`Camera::update_rotation_fps`]: camera::Camera::update_rotation_fps
//! [`Camera::handle_scroll`]: camera::Camera::handle_scroll

pub mod camera;
pub mod framebuffer;
pub mod renderer;
pub mod shading;

pub use camera::{Camera, CameraRayBasis};
pub use framebuffer::Framebuffer;
pub use renderer::{render, RenderOptions};
pub use shading::ShadingMode;
