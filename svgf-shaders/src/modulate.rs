use svgf_gpu::prelude::*;

/// Reconstructs shaded color out of demodulated illumination.
pub fn modulate(
    illumination: Illumination,
    direct_albedo: Vec4,
    indirect_albedo: Vec4,
) -> Vec4 {
    let color = illumination.direct_color() * direct_albedo.xyz()
        + illumination.indirect_color() * indirect_albedo.xyz();

    color.extend(0.0)
}

/// Combines this frame's raw inputs without any filtering.
pub fn combine_unfiltered(
    direct: Vec4,
    indirect: Vec4,
    direct_albedo: Vec4,
    indirect_albedo: Vec4,
) -> Vec4 {
    modulate(
        Illumination::new(direct, indirect),
        direct_albedo,
        indirect_albedo,
    )
}
