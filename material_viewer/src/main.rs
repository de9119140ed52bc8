//! Material viewer
//!
//! Headless walkthrough of every technique: loads material defaults, builds a
//! small scene (flat, textured, wireframe and a volume bound to its own
//! drawable), steps a few frames with scripted UI edits and logs what the
//! recording backend was asked to draw.

use std::path::PathBuf;

use raster_materials::materials::MaterialError;
use raster_materials::prelude::*;
use raster_materials::render::api::PolygonMode;
use raster_materials::ui::WidgetEdit;

/// Fixed step for the headless frame loop
const FRAME_STEP: f64 = 1.0 / 60.0;

#[derive(thiserror::Error, Debug)]
enum ViewerError {
    #[error(transparent)]
    Material(#[from] MaterialError),

    #[error("Invalid frame count '{0}'")]
    FrameCount(String),
}

impl From<ConfigError> for ViewerError {
    fn from(err: ConfigError) -> Self {
        Self::Material(err.into())
    }
}

struct ViewerApp {
    recorder: Recorder,
    device: raster_materials::render::backends::RecordingDevice,
    camera: Camera,
    clock: FrameClock,
    scene: Scene,
    menu: WidgetRecorder,
    volume: DrawableId,
}

impl ViewerApp {
    fn new(config: &MaterialConfig) -> Self {
        log::info!("Creating material viewer...");
        let recorder = Recorder::new();
        let shaders = ShaderCache::new(recorder.compiler());
        let textures = TextureCache::new(recorder.texture_loader());

        let mut camera = Camera::perspective(Vec3::new(0.0, 3.0, 12.0), 45.0, 800.0 / 600.0, 0.1, 100.0);
        camera.look_at(Vec3::new(0.0, 0.0, 0.0), Vec3::new(0.0, 1.0, 0.0));

        let mut scene = Scene::new();
        let cube: Arc<dyn Geometry> = Arc::new(recorder.mesh("cube"));
        let teapot: Arc<dyn Geometry> = Arc::new(recorder.mesh("teapot"));

        scene.spawn(
            "ground",
            Mat4::new_translation(&Vec3::new(0.0, -1.0, 0.0)),
            Some(Arc::clone(&cube)),
            |_| {
                FlatMaterial::new(&shaders, &config.shaders)
                    .with_color(Vec4::new(0.8, 0.7, 0.5, 1.0))
                    .into()
            },
        );
        scene.spawn(
            "crate",
            Mat4::new_translation(&Vec3::new(-3.0, 0.0, 0.0)),
            Some(Arc::clone(&cube)),
            |_| {
                FlatMaterial::textured(&shaders, &textures, &config.shaders, "data/textures/crate.png")
                    .into()
            },
        );
        scene.spawn(
            "teapot outline",
            Mat4::new_translation(&Vec3::new(3.0, 0.0, 0.0)),
            Some(teapot),
            |_| {
                WireframeMaterial::new(&shaders, &config.shaders)
                    .with_color(Vec4::new(0.0, 1.0, 0.0, 1.0))
                    .into()
            },
        );

        // Density volumes normally come from an external loader
        let density = textures.get("data/volumes/foot.vol").ok();
        let volume = scene.spawn("volume", Mat4::identity(), Some(cube), |id| {
            VolumetricMaterial::new(&shaders, &textures, config, density, Some(id)).into()
        });

        log::info!(
            "Scene ready: {} drawables, {} programs, {} textures",
            scene.len(),
            shaders.len(),
            textures.len()
        );

        Self {
            device: recorder.device(),
            recorder,
            camera,
            clock: FrameClock::new(),
            scene,
            menu: WidgetRecorder::new(),
            volume,
        }
    }

    fn run(&mut self, frames: u64) {
        log::info!("Stepping {frames} frames...");

        for frame in 0..frames {
            self.script_edits(frame);
            self.update_scene();
            self.render_frame();
        }

        log::info!(
            "Viewer completed: {} frames, {} draw calls",
            self.clock.frame_count(),
            self.recorder.draw_calls().len()
        );
    }

    /// Toggle slice mode and lighting part way through, as a user would
    fn script_edits(&mut self, frame: u64) {
        match frame {
            1 => self.menu.queue_edit("Slider", WidgetEdit::Bool(true)),
            2 => {
                self.menu.queue_edit("Direct Light", WidgetEdit::Bool(true));
                self.menu.queue_edit("Slice", WidgetEdit::Float(0.25));
            }
            3 => self
                .menu
                .queue_edit("Light Color", WidgetEdit::Float3([1.0, 0.8, 0.6])),
            _ => {}
        }
    }

    fn update_scene(&mut self) {
        let dt = self.clock.advance(FRAME_STEP);

        self.menu.begin_frame();
        self.scene.render_in_menu(&mut self.menu);
        self.scene.update(dt);

        if let Some(transform) = self.scene.transform(self.volume) {
            log::debug!("Volume scale: {:?}", transform.scale_factors());
        }
    }

    fn render_frame(&mut self) {
        self.recorder.clear_commands();
        let frame = FrameContext::from_clock(&self.camera, &self.clock);
        self.scene.render(&mut self.device, &frame);

        let draws = self.recorder.draw_calls();
        let outlines = draws
            .iter()
            .filter(|d| d.raster.polygon_mode == PolygonMode::Line)
            .count();
        log::info!(
            "Frame {}: {} draws ({} wireframe), {} widgets",
            self.clock.frame_count(),
            draws.len(),
            outlines,
            self.menu.widgets().len()
        );
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    raster_materials::foundation::logging::init_with_default("info");
    log::info!("Starting material viewer");

    let mut args = std::env::args().skip(1);
    let config_path = args
        .next()
        .map_or_else(|| PathBuf::from("config/materials.toml"), PathBuf::from);
    let frames = match args.next() {
        Some(raw) => raw.parse::<u64>().map_err(|_| ViewerError::FrameCount(raw))?,
        None => 5,
    };

    let config = MaterialConfig::load_or_default(&config_path).map_err(ViewerError::from)?;
    config.validate().map_err(ViewerError::from)?;

    let mut app = ViewerApp::new(&config);
    app.run(frames);
    Ok(())
}
