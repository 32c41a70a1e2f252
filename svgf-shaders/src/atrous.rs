use svgf_gpu::prelude::*;

/// B3-spline weights, indexed by the absolute tap offset.
const KERNEL: [f32; 3] = [1.0, 2.0 / 3.0, 1.0 / 6.0];

/// 3x3 Gaussian weights, indexed by the absolute tap offset.
const GAUSSIAN: [[f32; 2]; 2] =
    [[1.0 / 4.0, 1.0 / 8.0], [1.0 / 8.0, 1.0 / 16.0]];

/// Runs a single à-trous iteration: a 5x5 edge-aware blur whose taps are
/// `params.step` pixels apart.
pub fn atrous<K>(
    global_id: UVec2,
    params: &AtrousPassParams,
    kernel: &K,
    surface_map: SurfaceMap,
    input: Tex<Illumination>,
) -> Illumination
where
    K: FilterKernel,
{
    let screen_pos = global_id;
    let center = input.read(screen_pos);

    let Some(center_surface) = surface_map.get(screen_pos.as_ivec2()) else {
        return center.with_min_variance(params.variance_epsilon);
    };

    // -------------------------------------------------------------------------

    let (direct_variance, indirect_variance) =
        blurred_variance(screen_pos, input);

    let (center_direct_luma, center_indirect_luma) = center.luminance();

    let center_direct = center_surface.as_kernel_sample(center_direct_luma);
    let center_indirect =
        center_surface.as_kernel_sample(center_indirect_luma);

    let phi_direct_luma = params.phi_color
        * (params.variance_epsilon + direct_variance).max(0.0).sqrt();

    let phi_indirect_luma = params.phi_color
        * (params.variance_epsilon + indirect_variance).max(0.0).sqrt();

    let phi_depth = center_surface.depth_fwidth.max(SVGF_EPSILON)
        * params.step as f32;

    let step = params.step as i32;
    let mut sum_w = Vec2::ONE;
    let mut sum_direct = center.direct;
    let mut sum_indirect = center.indirect;
    let mut sample_offset = ivec2(-2, -2);

    loop {
        let sample_pos = screen_pos.as_ivec2() + sample_offset * step;

        if sample_offset != IVec2::ZERO {
            if let Some(sample_surface) = surface_map.get(sample_pos) {
                let sample = input.read(sample_pos.as_uvec2());
                let (sample_direct_luma, sample_indirect_luma) =
                    sample.luminance();

                let k = KERNEL[sample_offset.x.unsigned_abs() as usize]
                    * KERNEL[sample_offset.y.unsigned_abs() as usize];

                let phi_depth = phi_depth * sample_offset.as_vec2().length();

                let w_direct = k * kernel.weight(
                    center_direct,
                    sample_surface.as_kernel_sample(sample_direct_luma),
                    EdgeStopping {
                        depth: phi_depth,
                        normal: params.phi_normal,
                        luminance: phi_direct_luma,
                    },
                );

                let w_indirect = k * kernel.weight(
                    center_indirect,
                    sample_surface.as_kernel_sample(sample_indirect_luma),
                    EdgeStopping {
                        depth: phi_depth,
                        normal: params.phi_normal,
                        luminance: phi_indirect_luma,
                    },
                );

                sum_w += vec2(w_direct, w_indirect);

                // Variance is propagated with squared weights
                sum_direct +=
                    sample.direct * w_direct.as_color_variance_weight();

                sum_indirect +=
                    sample.indirect * w_indirect.as_color_variance_weight();
            }
        }

        sample_offset.x += 1;

        if sample_offset.x > 2 {
            sample_offset.x = -2;
            sample_offset.y += 1;

            if sample_offset.y > 2 {
                break;
            }
        }
    }

    Illumination::new(
        sum_direct / sum_w.x.as_color_variance_weight(),
        sum_indirect / sum_w.y.as_color_variance_weight(),
    )
    .with_min_variance(params.variance_epsilon)
}

/// Returns variances of the pixel at `screen_pos`, blurred with a 3x3
/// Gaussian; out-of-screen taps are clamped to the edge.
fn blurred_variance(
    screen_pos: UVec2,
    input: Tex<Illumination>,
) -> (f32, f32) {
    let mut direct = 0.0;
    let mut indirect = 0.0;

    for y in -1..=1 {
        for x in -1..=1 {
            let sample_pos = input.clamp(screen_pos.as_ivec2() + ivec2(x, y));
            let sample = input.read(sample_pos);
            let w =
                GAUSSIAN[x.unsigned_abs() as usize][y.unsigned_abs() as usize];

            direct += sample.direct_variance() * w;
            indirect += sample.indirect_variance() * w;
        }
    }

    (direct, indirect)
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    const SIZE: UVec2 = uvec2(9, 9);

    fn params(step: u32) -> AtrousPassParams {
        AtrousPassParams {
            phi_color: 10.0,
            phi_normal: 128.0,
            variance_epsilon: 1e-4,
            step,
        }
    }

    fn flat_surfaces() -> Vec<Vec4> {
        vec![
            CompactNormDepth::new(Vec3::Z, 5.0, 0.1).pack();
            (SIZE.x * SIZE.y) as usize
        ]
    }

    fn run(
        pos: UVec2,
        params: AtrousPassParams,
        surfaces: &[Vec4],
        input: &[Illumination],
    ) -> Illumination {
        atrous(
            pos,
            &params,
            &SvgfKernel,
            SurfaceMap::new(Tex::new(surfaces, SIZE)),
            Tex::new(input, SIZE),
        )
    }

    #[test]
    fn constant_input_is_preserved() {
        let surfaces = flat_surfaces();
        let pixel = Illumination::new(
            vec4(0.3, 0.4, 0.5, 0.01),
            vec4(1.0, 1.0, 1.0, 0.02),
        );
        let input = vec![pixel; (SIZE.x * SIZE.y) as usize];

        for step in [1, 2, 4] {
            let target = run(uvec2(4, 4), params(step), &surfaces, &input);

            assert_relative_eq!(0.3, target.direct.x, epsilon = 0.0001);
            assert_relative_eq!(0.5, target.direct.z, epsilon = 0.0001);
            assert_relative_eq!(1.0, target.indirect.y, epsilon = 0.0001);

            // Averaging shrinks variance
            assert!(target.direct_variance() < 0.01);
            assert!(target.indirect_variance() < 0.02);
            assert!(target.direct_variance() >= 1e-4);
        }
    }

    #[test]
    fn noise_is_smoothed() {
        let surfaces = flat_surfaces();

        let input: Vec<_> = (0..SIZE.x * SIZE.y)
            .map(|idx| {
                let luma = (idx % 2) as f32;

                Illumination::new(
                    Vec3::splat(luma).extend(0.25),
                    Vec3::ZERO.extend(0.0),
                )
            })
            .collect();

        let target = run(uvec2(4, 4), params(1), &surfaces, &input);

        assert!(target.direct.x > 0.2);
        assert!(target.direct.x < 0.8);
    }

    #[test]
    fn geometric_edges_are_preserved() {
        let mut surfaces = flat_surfaces();

        for (idx, surface) in surfaces.iter_mut().enumerate() {
            if idx as u32 % SIZE.x >= 5 {
                *surface = CompactNormDepth::new(Vec3::X, 5.0, 0.1).pack();
            }
        }

        let input: Vec<_> = (0..SIZE.x * SIZE.y)
            .map(|idx| {
                let luma = if idx % SIZE.x >= 5 { 1.0 } else { 0.0 };

                Illumination::new(
                    Vec3::splat(luma).extend(1.0),
                    Vec4::ZERO,
                )
            })
            .collect();

        let target = run(uvec2(4, 4), params(1), &surfaces, &input);

        assert_relative_eq!(0.0, target.direct.x);
    }

    #[test]
    fn background_passes_through() {
        let mut surfaces = flat_surfaces();
        let input = vec![Illumination::default(); (SIZE.x * SIZE.y) as usize];

        surfaces[0] = Vec4::ZERO;

        let target = run(uvec2(0, 0), params(1), &surfaces, &input);

        assert_eq!(Vec3::ZERO, target.direct_color());
        assert_eq!(1e-4, target.direct_variance());
    }
}
