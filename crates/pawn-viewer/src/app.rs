use std::path::PathBuf;

use anyhow::{Context, Result};
use pawn_engine::core::{App, AppControl, FrameCtx, StartCtx};
use pawn_engine::render::{SceneRenderer, WgpuBackend};
use pawn_engine::scene::Composition;
use pawn_engine::shader::{parse_shader, shader_path, ShaderProgram};

use crate::pawn;

pub const SHADER_NAME: &str = "pawn.shader";

/// Shipped copy, used when nothing is installed next to the executable.
pub const BUNDLED_SHADER: &str = include_str!("../shaders/pawn.shader");

/// Everything created once the GPU exists.
struct Scene {
    gpu: WgpuBackend,
    program: ShaderProgram<WgpuBackend>,
    pawn: Composition<WgpuBackend>,
    renderer: SceneRenderer,
}

#[derive(Default)]
pub struct PawnApp {
    scene: Option<Scene>,
}

impl PawnApp {
    pub fn new() -> Self {
        Self::default()
    }
}

impl App for PawnApp {
    fn on_start(&mut self, ctx: &mut StartCtx<'_, '_>) -> Result<()> {
        let mut gpu = WgpuBackend::new(ctx.gpu.device(), ctx.gpu.queue(), ctx.gpu.surface_format());

        let program = load_program(&gpu)?;
        let mut pawn = pawn::build(&gpu).context("failed to build the pawn")?;
        pawn.init_rotation(&gpu, &program)?;
        gpu.ensure_fallback(pawn.max_vertex_count());

        self.scene = Some(Scene {
            gpu,
            program,
            pawn,
            renderer: SceneRenderer::new(),
        });
        Ok(())
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        let Some(scene) = self.scene.as_mut() else {
            return AppControl::Continue;
        };

        let control = ctx.render(|target| {
            scene
                .renderer
                .render(&scene.gpu, target, &scene.program, &scene.pawn)
        });
        scene.pawn.apply_rotation(&scene.gpu);
        control
    }
}

/// Loads `shaders/pawn.shader` next to the executable, or the bundled copy.
fn load_program(gpu: &WgpuBackend) -> Result<ShaderProgram<WgpuBackend>> {
    match installed_shader() {
        Some(path) => {
            log::info!("loading shader {}", path.display());
            Ok(ShaderProgram::load(gpu, &path)?)
        }
        None => {
            log::warn!("{SHADER_NAME} not found next to the executable; using the bundled copy");
            Ok(ShaderProgram::create(gpu, &parse_shader(BUNDLED_SHADER)?)?)
        }
    }
}

fn installed_shader() -> Option<PathBuf> {
    let exe = std::env::current_exe().ok()?;
    let path = shader_path(&exe, SHADER_NAME);
    path.is_file().then_some(path)
}
