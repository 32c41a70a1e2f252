//! Renders a synthetic, noisy scene and saves both the raw and the denoised
//! image as PNGs.
//!
//! Run with: `cargo run --example demo --features png`

use std::path::Path;

use glam::{uvec2, vec3, UVec2, Vec3, Vec4};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use svgf::{
    Channels, CompactNormDepth, DebugBuffer, Denoiser, DenoiserConfig,
    DenoiserError, FrameInputs, LinearZ, Texture,
};

const SIZE: UVec2 = uvec2(256, 192);
const FRAMES: usize = 32;

/// Returns `(depth, normal)` of the surface visible through given pixel:
/// a floor with a box standing on it.
fn surface(pos: UVec2) -> (f32, Vec3) {
    let is_box = (96..160).contains(&pos.x) && (48..128).contains(&pos.y);

    if is_box {
        (4.0, vec3(0.0, 0.0, 1.0))
    } else {
        (8.0 + pos.y as f32 / SIZE.y as f32, vec3(0.0, 1.0, 0.0))
    }
}

fn albedo(pos: UVec2) -> Vec4 {
    if (pos.x / 16 + pos.y / 16) % 2 == 0 {
        vec3(0.9, 0.8, 0.7).extend(1.0)
    } else {
        vec3(0.3, 0.4, 0.6).extend(1.0)
    }
}

fn main() -> Result<(), DenoiserError> {
    let out = Path::new("target").join("svgf-demo");

    std::fs::create_dir_all(&out).map_err(image::ImageError::IoError)?;

    let mut rng = StdRng::seed_from_u64(1234);
    let mut denoiser = Denoiser::new(Channels::default());

    denoiser.configure(DenoiserConfig::default());
    denoiser.resize(SIZE);

    let linear_z = Texture::from_fn("linear_z", SIZE, |pos| {
        let (depth, normal) = surface(pos);

        LinearZ::new(depth, 0.01, depth, normal).pack()
    });

    let compact_norm_depth =
        Texture::from_fn("compact_norm_depth", SIZE, |pos| {
            let (depth, normal) = surface(pos);

            CompactNormDepth::new(normal, depth, 0.01).pack()
        });

    let motion_vectors = Texture::new("motion_vectors", SIZE);
    let direct_albedo = Texture::from_fn("direct_albedo", SIZE, albedo);
    let indirect_albedo = Texture::from_fn("indirect_albedo", SIZE, albedo);
    let mut output = Texture::new("output", SIZE);
    let mut noisy = None;

    for _ in 0..FRAMES {
        // Light comes from the left; only one in four samples is lit
        let direct = Texture::from_fn("direct", SIZE, |pos| {
            let light = 1.0 - pos.x as f32 / SIZE.x as f32;

            if rng.gen_bool(0.25) {
                Vec3::splat(4.0 * light).extend(0.0)
            } else {
                Vec4::ZERO
            }
        });

        let indirect = Texture::from_fn("indirect", SIZE, |_| {
            Vec3::splat(0.4 * rng.gen::<f32>()).extend(0.0)
        });

        let inputs = FrameInputs {
            direct: &direct,
            indirect: &indirect,
            direct_albedo: &direct_albedo,
            indirect_albedo: &indirect_albedo,
            linear_z: &linear_z,
            motion_vectors: &motion_vectors,
            compact_norm_depth: &compact_norm_depth,
        };

        denoiser.execute(&inputs, Some(&mut output))?;

        noisy = Some(Texture::from_fn("noisy", SIZE, |pos| {
            let color = direct.read(pos).truncate()
                * direct_albedo.read(pos).truncate()
                + indirect.read(pos).truncate()
                    * indirect_albedo.read(pos).truncate();

            color.extend(0.0)
        }));
    }

    if let Some(noisy) = noisy {
        noisy.save_png(out.join("noisy.png"))?;
    }

    output.save_png(out.join("denoised.png"))?;

    if let Some(variance) = denoiser.debug_buffer(DebugBuffer::Variance) {
        variance.save_png(out.join("variance.png"))?;
    }

    println!("Images saved to {}", out.display());

    Ok(())
}
