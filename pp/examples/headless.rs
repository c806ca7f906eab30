//! Runs every bloom preset over a synthetic scene and prints how much light each adds.
//!
//! `RUST_LOG=debug cargo run -p glowgpu-pp --example headless`

use glowgpu::prelude::*;
use glowgpu::BoxError;
use glowgpu_pp::{Bloom, BloomSettings, Destination, SAMPLED_ATTACHMENT};
use tracing::info;

const WIDTH: u32 = 320;
const HEIGHT: u32 = 180;
const FORMAT: TextureFormat = TextureFormat::Rgba8Unorm;

/// Dim blue gradient with a few bright lights.
fn synthetic_scene() -> Vec<u32> {
    let lights = [(60, 40), (160, 90), (270, 140)];
    let mut pixels = Vec::with_capacity((WIDTH * HEIGHT) as usize);
    for y in 0..HEIGHT {
        for x in 0..WIDTH {
            let lit = lights
                .iter()
                .any(|&(lx, ly)| x.abs_diff(lx) < 4 && y.abs_diff(ly) < 4);
            let texel = if lit {
                [255, 240, 200, 255]
            } else {
                [10, 20, (40 + y * 60 / HEIGHT) as u8, 255]
            };
            pixels.push(u32::from_le_bytes(texel));
        }
    }
    pixels
}

fn mean_luma(rgba: &[u8]) -> f32 {
    let total: f32 = rgba
        .chunks(4)
        .map(|t| 0.3 * t[0] as f32 + 0.59 * t[1] as f32 + 0.11 * t[2] as f32)
        .sum();
    total / (rgba.len() / 4) as f32
}

fn main() -> Result<(), BoxError> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let gpu = glowgpu::Gpu::builder().build_headless()?;

    let scene = gpu
        .new_texture("Synthetic scene")
        .with_format(FORMAT)
        .allow_binding()
        .allow_copy_to()
        .allow_copy_from()
        .create_empty((WIDTH, HEIGHT));
    scene.write(&synthetic_scene())?;
    let base_luma = mean_luma(&scene.read_immediately()?);

    let output = gpu
        .new_texture("Bloom output")
        .with_format(FORMAT)
        .with_usage(SAMPLED_ATTACHMENT)
        .allow_copy_from()
        .create_empty((WIDTH, HEIGHT));

    let mut bloom = Bloom::new(&gpu, WIDTH, HEIGHT, FORMAT)?;
    info!("Scene mean luma {:.2}", base_luma);

    for (name, settings) in BloomSettings::presets() {
        let mut encoder = gpu.create_command_encoder("Bloom example encoder");
        bloom.process(&mut encoder, &scene.view, Destination::Texture(&output), &settings)?;
        encoder.submit();

        let luma = mean_luma(&output.read_immediately()?);
        println!("{:<12} mean luma {:>7.2} ({:+.2})", name, luma, luma - base_luma);
    }

    Ok(())
}
