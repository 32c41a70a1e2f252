use svgf_gpu::prelude::*;

/// Radius of the spatial fallback, in pixels.
pub const RADIUS: i32 = 3;

/// Estimates variance of pixels whose temporal history is too short for the
/// accumulated moments to be trusted.
pub fn filter_moments<K>(
    global_id: UVec2,
    params: &FilterMomentsPassParams,
    kernel: &K,
    surface_map: SurfaceMap,
    reprojected: Tex<Reprojected>,
) -> Illumination
where
    K: FilterKernel,
{
    let screen_pos = global_id;
    let center = reprojected.read(screen_pos);

    let Some(center_surface) = surface_map.get(screen_pos.as_ivec2()) else {
        return center
            .illumination
            .with_min_variance(params.variance_epsilon);
    };

    if center.history_length >= params.history_threshold {
        return center
            .illumination
            .with_min_variance(params.variance_epsilon);
    }

    // -------------------------------------------------------------------------

    let (center_direct_luma, center_indirect_luma) =
        center.illumination.luminance();

    let center_direct = center_surface.as_kernel_sample(center_direct_luma);
    let center_indirect =
        center_surface.as_kernel_sample(center_indirect_luma);

    let phi_depth = center_surface.depth_fwidth.max(SVGF_EPSILON) * 3.0;

    let mut sum_w = Vec2::ZERO;
    let mut sum_direct = Vec3::ZERO;
    let mut sum_indirect = Vec3::ZERO;
    let mut sum_moments = Moments::default();
    let mut sample_offset = ivec2(-RADIUS, -RADIUS);

    loop {
        let sample_pos = screen_pos.as_ivec2() + sample_offset;

        if let Some(sample_surface) = surface_map.get(sample_pos) {
            let sample = reprojected.read(sample_pos.as_uvec2());
            let (sample_direct_luma, sample_indirect_luma) =
                sample.illumination.luminance();

            let w = if sample_offset == IVec2::ZERO {
                Vec2::ONE
            } else {
                let phi = EdgeStopping {
                    depth: phi_depth * sample_offset.as_vec2().length(),
                    normal: params.phi_normal,
                    luminance: params.phi_color,
                };

                vec2(
                    kernel.weight(
                        center_direct,
                        sample_surface.as_kernel_sample(sample_direct_luma),
                        phi,
                    ),
                    kernel.weight(
                        center_indirect,
                        sample_surface.as_kernel_sample(sample_indirect_luma),
                        phi,
                    ),
                )
            };

            sum_w += w;
            sum_direct += sample.illumination.direct_color() * w.x;
            sum_indirect += sample.illumination.indirect_color() * w.y;

            sum_moments = sum_moments
                + Moments {
                    direct: sample.moments.direct * w.x,
                    indirect: sample.moments.indirect * w.y,
                };
        }

        sample_offset.x += 1;

        if sample_offset.x > RADIUS {
            sample_offset.x = -RADIUS;
            sample_offset.y += 1;

            if sample_offset.y > RADIUS {
                break;
            }
        }
    }

    let sum_w = sum_w.max(Vec2::splat(1e-6));

    let moments = Moments {
        direct: sum_moments.direct / sum_w.x,
        indirect: sum_moments.indirect / sum_w.y,
    };

    // Boost variance for the first frames, where it's most likely
    // underestimated
    let boost = params.history_threshold / center.history_length.max(1.0);
    let (direct_variance, indirect_variance) = moments.variance();

    Illumination::new(
        (sum_direct / sum_w.x).extend(direct_variance * boost),
        (sum_indirect / sum_w.y).extend(indirect_variance * boost),
    )
    .with_min_variance(params.variance_epsilon)
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    const SIZE: UVec2 = uvec2(8, 8);

    fn params() -> FilterMomentsPassParams {
        FilterMomentsPassParams {
            phi_color: 10.0,
            phi_normal: 128.0,
            history_threshold: 4.0,
            variance_epsilon: 1e-4,
        }
    }

    fn surfaces() -> Vec<Vec4> {
        vec![
            CompactNormDepth::new(Vec3::Z, 5.0, 0.1).pack();
            (SIZE.x * SIZE.y) as usize
        ]
    }

    fn reprojected(
        history_length: f32,
        luma: impl Fn(UVec2) -> f32,
    ) -> Vec<Reprojected> {
        (0..SIZE.y)
            .flat_map(|y| (0..SIZE.x).map(move |x| uvec2(x, y)))
            .map(|pos| {
                let illumination = Illumination::new(
                    Vec3::splat(luma(pos)).extend(0.0),
                    Vec4::ZERO,
                );

                Reprojected::new(
                    illumination,
                    Moments::from_illumination(&illumination),
                    history_length,
                )
            })
            .collect()
    }

    #[test]
    fn mature_history_passes_through() {
        let surfaces = surfaces();
        let reprojected = reprojected(4.0, |_| 0.5);

        let target = filter_moments(
            uvec2(3, 3),
            &params(),
            &SvgfKernel,
            SurfaceMap::new(Tex::new(&surfaces, SIZE)),
            Tex::new(&reprojected, SIZE),
        );

        assert_eq!(Vec3::splat(0.5), target.direct_color());
        assert_eq!(1e-4, target.direct_variance());
        assert_eq!(1e-4, target.indirect_variance());
    }

    #[test]
    fn short_history_is_estimated_spatially() {
        let surfaces = surfaces();

        // Checkerboard of 0.0 and 1.0; with a huge luminance sensitivity
        // every neighbour weighs (almost) the same
        let reprojected =
            reprojected(1.0, |pos| ((pos.x + pos.y) % 2) as f32);

        let params = FilterMomentsPassParams {
            phi_color: 1e4,
            phi_normal: 0.0,
            ..params()
        };

        let target = filter_moments(
            uvec2(4, 4),
            &params,
            &SvgfKernel,
            SurfaceMap::new(Tex::new(&surfaces, SIZE)),
            Tex::new(&reprojected, SIZE),
        );

        assert!(target.direct_variance() > 0.5);
        assert!(target.direct_color().x > 0.3);
        assert!(target.direct_color().x < 0.7);
        assert_relative_eq!(1e-4, target.indirect_variance());
    }

    #[test]
    fn background_passes_through() {
        let mut surfaces = surfaces();
        let reprojected = reprojected(1.0, |_| 0.25);

        surfaces[0] = Vec4::ZERO;

        let target = filter_moments(
            uvec2(0, 0),
            &params(),
            &SvgfKernel,
            SurfaceMap::new(Tex::new(&surfaces, SIZE)),
            Tex::new(&reprojected, SIZE),
        );

        assert_eq!(Vec3::splat(0.25), target.direct_color());
        assert_eq!(1e-4, target.direct_variance());
    }
}
