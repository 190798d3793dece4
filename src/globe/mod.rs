pub mod animation;
pub mod dots;
pub mod error;
pub mod land_mask;
pub mod projection;
pub mod sampler;

use crate::common::settings::Settings;

use self::{
    dots::{DotMesh, DotMeshBuilder},
    error::GlobeError,
    land_mask::LandMask,
};

/// Samples the sphere, filters it through the mask and builds the dot mesh.
///
/// Blocks until the whole mesh is built.
pub fn build_dot_mesh(settings: &Settings, mask: &LandMask) -> Result<DotMesh, GlobeError> {
    let sampler = settings.sampler()?;
    let polygon = settings.dot_polygon()?;

    Ok(DotMeshBuilder::new(sampler, polygon, mask).build(&mut settings.rng()))
}
