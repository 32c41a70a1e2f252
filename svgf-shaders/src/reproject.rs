use core::ops;

use svgf_gpu::prelude::*;

/// Temporal history fetched from the previous frame.
#[derive(Clone, Copy, Debug, Default)]
struct HistorySample {
    illumination: Illumination,
    moments: Moments,
}

impl ops::Add for HistorySample {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self {
            illumination: self.illumination + rhs.illumination,
            moments: self.moments + rhs.moments,
        }
    }
}

impl ops::Mul<f32> for HistorySample {
    type Output = Self;

    fn mul(self, rhs: f32) -> Self::Output {
        Self {
            illumination: self.illumination * rhs,
            moments: self.moments * rhs,
        }
    }
}

/// Blends this frame's noisy illumination with the history found at the
/// position the pixel had in the previous frame.
#[allow(clippy::too_many_arguments)]
pub fn reproject(
    global_id: UVec2,
    params: &ReprojectPassParams,
    direct: TexRgba32,
    indirect: TexRgba32,
    linear_z: LinearZMap,
    prev_linear_z: LinearZMap,
    motion_vectors: TexRgba32,
    prev_reprojected: Tex<Reprojected>,
    filtered_past: Tex<Illumination>,
) -> Reprojected {
    let screen_pos = global_id;

    let illumination = Illumination::new(
        direct.read(screen_pos).truncate().extend(0.0),
        indirect.read(screen_pos).truncate().extend(0.0),
    );

    let moments = Moments::from_illumination(&illumination);
    let curr_linear_z = LinearZ::unpack(linear_z.tex().read(screen_pos));

    if curr_linear_z.is_sky() {
        return Reprojected::new(illumination, moments, 1.0);
    }

    // -------------------------------------------------------------------------

    let reprojection = Reprojection::from_motion(
        screen_pos,
        motion_vectors.read(screen_pos).xy(),
    );

    if !reprojection.is_near_screen(prev_reprojected.size()) {
        return Reprojected::new(illumination, moments, 1.0);
    }

    let sample = |pos: IVec2| {
        let prev_linear_z = prev_linear_z.get(pos)?;

        if !curr_linear_z.is_consistent_with(&prev_linear_z) {
            return None;
        }

        let pos = pos.as_uvec2();
        let prev = prev_reprojected.read(pos);

        if !prev.has_history() {
            return None;
        }

        Some(HistorySample {
            illumination: filtered_past.read(pos),
            moments: prev.moments,
        })
    };

    let history = BilinearFilter::gather(reprojection.prev_pos, &sample)
        .eval(reprojection.prev_pos_fract())
        .or_else(|| {
            let center = reprojection.prev_pos_round();
            let mut sum = HistorySample::default();
            let mut count = 0;
            let mut sample_offset = ivec2(-1, -1);

            loop {
                if let Some(s) = sample(center + sample_offset) {
                    sum = sum + s;
                    count += 1;
                }

                sample_offset.x += 1;

                if sample_offset.x > 1 {
                    sample_offset.x = -1;
                    sample_offset.y += 1;

                    if sample_offset.y > 1 {
                        break;
                    }
                }
            }

            if count > 0 {
                Some(sum * (1.0 / count as f32))
            } else {
                None
            }
        });

    let Some(history) = history else {
        return Reprojected::new(illumination, moments, 1.0);
    };

    let prev_history_length = prev_reprojected
        .read(prev_reprojected.clamp(reprojection.prev_pos_round()))
        .history_length;

    let history_length =
        (prev_history_length + 1.0).min(params.max_history_length);

    let alpha = params.alpha.max(1.0 / history_length);
    let moments_alpha = params.moments_alpha.max(1.0 / history_length);

    let illumination = lerp(history.illumination, illumination, alpha);
    let moments = lerp(history.moments, moments, moments_alpha);
    let (direct_variance, indirect_variance) = moments.variance();

    Reprojected::new(
        illumination.with_variance(direct_variance, indirect_variance),
        moments,
        history_length,
    )
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    const SIZE: UVec2 = uvec2(4, 4);

    struct Frame {
        direct: Vec<Vec4>,
        indirect: Vec<Vec4>,
        linear_z: Vec<Vec4>,
        prev_linear_z: Vec<Vec4>,
        motion_vectors: Vec<Vec4>,
        prev_reprojected: Vec<Reprojected>,
        filtered_past: Vec<Illumination>,
    }

    impl Frame {
        fn new(direct: f32, history: f32, history_length: f32) -> Self {
            let len = (SIZE.x * SIZE.y) as usize;
            let plane = LinearZ::new(5.0, 0.1, 5.0, Vec3::Z).pack();
            let history = Illumination::new(Vec4::splat(history), Vec4::ZERO);

            Self {
                direct: vec![Vec4::splat(direct); len],
                indirect: vec![Vec4::ZERO; len],
                linear_z: vec![plane; len],
                prev_linear_z: vec![plane; len],
                motion_vectors: vec![Vec4::ZERO; len],
                prev_reprojected: vec![
                    Reprojected::new(
                        history,
                        Moments::from_illumination(&history),
                        history_length,
                    );
                    len
                ],
                filtered_past: vec![history; len],
            }
        }

        fn run(&self, pos: UVec2) -> Reprojected {
            let params = ReprojectPassParams {
                alpha: 0.05,
                moments_alpha: 0.2,
                max_history_length: 32.0,
                _pad: 0.0,
            };

            reproject(
                pos,
                &params,
                Tex::new(&self.direct, SIZE),
                Tex::new(&self.indirect, SIZE),
                LinearZMap::new(Tex::new(&self.linear_z, SIZE)),
                LinearZMap::new(Tex::new(&self.prev_linear_z, SIZE)),
                Tex::new(&self.motion_vectors, SIZE),
                Tex::new(&self.prev_reprojected, SIZE),
                Tex::new(&self.filtered_past, SIZE),
            )
        }
    }

    #[test]
    fn accumulates_history() {
        let target = Frame::new(1.0, 3.0, 1.0).run(uvec2(1, 1));

        assert_eq!(2.0, target.history_length);
        assert_relative_eq!(2.0, target.illumination.direct.x);
        assert_relative_eq!(1.0, target.illumination.direct_variance());
    }

    #[test]
    fn caps_history() {
        let target = Frame::new(1.0, 3.0, 32.0).run(uvec2(0, 0));

        assert_eq!(32.0, target.history_length);
        assert_relative_eq!(
            2.9,
            target.illumination.direct.x,
            epsilon = 0.0001
        );
    }

    #[test]
    fn rejects_disoccluded_history() {
        let mut frame = Frame::new(1.0, 3.0, 8.0);

        for pixel in &mut frame.prev_linear_z {
            *pixel = LinearZ::new(9.0, 0.1, 9.0, Vec3::Z).pack();
        }

        let target = frame.run(uvec2(2, 2));

        assert_eq!(1.0, target.history_length);
        assert_eq!(1.0, target.illumination.direct.x);
        assert_eq!(0.0, target.illumination.direct_variance());
    }

    #[test]
    fn rejects_history_outside_screen() {
        let mut frame = Frame::new(1.0, 3.0, 8.0);

        for pixel in &mut frame.motion_vectors {
            *pixel = vec4(-10.0, 0.0, 0.0, 0.0);
        }

        assert_eq!(1.0, frame.run(uvec2(3, 0)).history_length);
    }

    #[test]
    fn rejects_non_finite_motion() {
        for motion in [
            vec4(f32::INFINITY, 0.0, 0.0, 0.0),
            vec4(0.0, f32::NEG_INFINITY, 0.0, 0.0),
            vec4(f32::NAN, f32::NAN, 0.0, 0.0),
            vec4(1e30, -1e30, 0.0, 0.0),
        ] {
            let mut frame = Frame::new(1.0, 3.0, 8.0);

            for pixel in &mut frame.motion_vectors {
                *pixel = motion;
            }

            for pos in [uvec2(0, 0), uvec2(3, 3)] {
                let target = frame.run(pos);

                assert_eq!(1.0, target.history_length, "{motion}");
                assert_eq!(1.0, target.illumination.direct.x, "{motion}");
            }
        }
    }

    #[test]
    fn falls_back_to_neighbourhood() {
        let mut frame = Frame::new(1.0, 3.0, 4.0);

        // Moving half a pixel to the right lands between (1, 1) and (2, 1),
        // both of which are rejected; their neighbours are not
        frame.motion_vectors[5] = vec4(0.5, 0.0, 0.0, 0.0);
        frame.prev_linear_z[5] = Vec4::ZERO;
        frame.prev_linear_z[6] = Vec4::ZERO;

        let target = frame.run(uvec2(1, 1));

        assert_eq!(5.0, target.history_length);
        assert_relative_eq!(
            2.6,
            target.illumination.direct.x,
            epsilon = 0.0001
        );
    }

    #[test]
    fn background_passes_through() {
        let mut frame = Frame::new(1.0, 3.0, 8.0);

        frame.linear_z[0] = Vec4::ZERO;

        let target = frame.run(uvec2(0, 0));

        assert_eq!(1.0, target.history_length);
        assert_eq!(1.0, target.illumination.direct.x);
    }
}
