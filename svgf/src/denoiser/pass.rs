use bytemuck::Pod;
use glam::{uvec2, UVec2};
use log::{debug, trace};
use rayon::prelude::*;

use crate::{utils, Texture};

/// A single stage of the pipeline, dispatched once per pixel of its target.
///
/// Rows are processed in parallel; the target is borrowed exclusively and
/// everything the stage reads has to be borrowed immutably, so a stage can't
/// observe its own, partially-written output.
#[derive(Debug)]
pub struct ComputePass {
    label: String,
}

impl ComputePass {
    pub fn new(label: impl ToString) -> Self {
        let label = format!("svgf_{}_pass", label.to_string());

        debug!("Initializing pass: {label}");

        Self { label }
    }

    pub fn run<T>(
        &self,
        target: &mut Texture<T>,
        f: impl Fn(UVec2) -> T + Sync,
    ) where
        T: Pod + Send,
    {
        trace!("Dispatching pass: {}; size={:?}", self.label, target.size());

        let width = target.size().x as usize;

        utils::measure(&self.label, || {
            target
                .pixels_mut()
                .par_chunks_mut(width)
                .enumerate()
                .for_each(|(y, row)| {
                    for (x, pixel) in row.iter_mut().enumerate() {
                        *pixel = f(uvec2(x as u32, y as u32));
                    }
                });
        });
    }

    /// Like [`Self::run()`], but writes two targets of the same size at once.
    pub fn run2<A, B>(
        &self,
        target_a: &mut Texture<A>,
        target_b: &mut Texture<B>,
        f: impl Fn(UVec2) -> (A, B) + Sync,
    ) where
        A: Pod + Send,
        B: Pod + Send,
    {
        assert_eq!(target_a.size(), target_b.size());

        trace!(
            "Dispatching pass: {}; size={:?}",
            self.label,
            target_a.size()
        );

        let width = target_a.size().x as usize;

        utils::measure(&self.label, || {
            target_a
                .pixels_mut()
                .par_chunks_mut(width)
                .zip(target_b.pixels_mut().par_chunks_mut(width))
                .enumerate()
                .for_each(|(y, (row_a, row_b))| {
                    for (x, (pixel_a, pixel_b)) in
                        row_a.iter_mut().zip(row_b.iter_mut()).enumerate()
                    {
                        (*pixel_a, *pixel_b) = f(uvec2(x as u32, y as u32));
                    }
                });
        });
    }
}
