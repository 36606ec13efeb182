use std::collections::HashMap;
use std::path::Path;

use rayon::prelude::*;

use crate::foundation::error::{HexweaveError, HexweaveResult};
use crate::geometry::layout::GridLayout;
use crate::interaction::profile::Profile;
use crate::render::backend::{FrameRGBA, RenderBackend};
use crate::render::cpu::CpuBackend;
use crate::scene::compile::compile_scene;
use crate::scene::snapshot::Snapshot;

/// Compile + render a single snapshot.
///
/// Returns a [`FrameRGBA`] containing **premultiplied** RGBA8 pixels.
pub fn render_snapshot(
    snapshot: &Snapshot,
    layout: &GridLayout,
    profile: &Profile,
    backend: &mut dyn RenderBackend,
) -> HexweaveResult<FrameRGBA> {
    if backend.side_px() != layout.side_px() {
        backend.resize(layout.side_px())?;
    }
    let list = compile_scene(snapshot, layout, profile);
    backend.render(&list)
}

#[derive(Clone, Debug)]
pub struct RenderThreading {
    pub parallel: bool,
    pub threads: Option<usize>,
    /// Render each distinct snapshot once and clone it for repeats.
    pub elide_duplicates: bool,
}

impl Default for RenderThreading {
    fn default() -> Self {
        Self {
            parallel: false,
            threads: None,
            elide_duplicates: true,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RenderStats {
    pub frames_total: u64,
    pub frames_rendered: u64,
    pub frames_elided: u64,
}

/// Render a batch of snapshots that share one layout.
///
/// Output order matches `snapshots`. With `threading.parallel` every worker thread owns its
/// own [`CpuBackend`].
pub fn render_snapshots(
    snapshots: &[Snapshot],
    layout: &GridLayout,
    profile: &Profile,
    threading: &RenderThreading,
) -> HexweaveResult<(Vec<FrameRGBA>, RenderStats)> {
    let mut unique_indices = Vec::<usize>::with_capacity(snapshots.len());
    let mut frame_to_unique = Vec::<usize>::with_capacity(snapshots.len());
    if threading.elide_duplicates {
        let mut first = HashMap::<u64, usize>::new();
        for (idx, snapshot) in snapshots.iter().enumerate() {
            let fingerprint = snapshot.fingerprint();
            if let Some(existing) = first.get(&fingerprint).copied() {
                frame_to_unique.push(existing);
            } else {
                let slot = unique_indices.len();
                unique_indices.push(idx);
                first.insert(fingerprint, slot);
                frame_to_unique.push(slot);
            }
        }
    } else {
        for idx in 0..snapshots.len() {
            frame_to_unique.push(idx);
            unique_indices.push(idx);
        }
    }

    let side = layout.side_px();
    let rendered: Vec<HexweaveResult<FrameRGBA>> = if threading.parallel {
        let pool = build_thread_pool(threading.threads)?;
        pool.install(|| {
            unique_indices
                .par_iter()
                .map_init(
                    || CpuBackend::new(side),
                    |worker, &idx| -> HexweaveResult<FrameRGBA> {
                        let backend = worker.as_mut().map_err(|e| {
                            HexweaveError::surface(format!("worker backend unavailable: {e}"))
                        })?;
                        render_snapshot(&snapshots[idx], layout, profile, backend)
                    },
                )
                .collect()
        })
    } else {
        let mut backend = CpuBackend::new(side)?;
        unique_indices
            .iter()
            .map(|&idx| render_snapshot(&snapshots[idx], layout, profile, &mut backend))
            .collect()
    };

    let mut unique_frames = Vec::<Option<FrameRGBA>>::with_capacity(rendered.len());
    for item in rendered {
        unique_frames.push(Some(item?));
    }

    let mut remaining = vec![0usize; unique_frames.len()];
    for &u in &frame_to_unique {
        remaining[u] += 1;
    }

    let mut out = Vec::<FrameRGBA>::with_capacity(frame_to_unique.len());
    for u in frame_to_unique {
        let frame = if remaining[u] == 1 {
            unique_frames[u].take()
        } else {
            unique_frames[u].clone()
        };
        out.push(frame.ok_or_else(|| HexweaveError::render("unique frame missing"))?);
        remaining[u] -= 1;
    }

    let total = snapshots.len() as u64;
    let rendered_count = unique_indices.len() as u64;
    Ok((
        out,
        RenderStats {
            frames_total: total,
            frames_rendered: rendered_count,
            frames_elided: total.saturating_sub(rendered_count),
        },
    ))
}

/// Write a frame as a straight-alpha PNG, creating parent directories.
pub fn save_png(frame: &FrameRGBA, path: &Path) -> HexweaveResult<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(|e| {
            HexweaveError::render(format!("create output dir '{}': {e}", parent.display()))
        })?;
    }
    image::save_buffer_with_format(
        path,
        &frame.to_straight_rgba8(),
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .map_err(|e| HexweaveError::render(format!("write png '{}': {e}", path.display())))
}

fn build_thread_pool(threads: Option<usize>) -> HexweaveResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(HexweaveError::validation(
            "render threading 'threads' must be >= 1 when set",
        ));
    }

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| HexweaveError::render(format!("failed to build rayon thread pool: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/render/pipeline.rs"]
mod tests;
