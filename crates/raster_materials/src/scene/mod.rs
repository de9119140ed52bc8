//! Scene of drawables, each pairing a mesh with a material
//!
//! The scene drives the per-frame order: every material's `update` runs
//! first, then every drawable renders with its current transform.
//! Transforms live apart from materials so a material can rewrite its own
//! drawable's transform while the scene iterates over materials.

pub mod transforms;

pub use transforms::{DrawableId, TransformRegistry};

use std::sync::Arc;

use slotmap::SecondaryMap;

use crate::foundation::math::Mat4;
use crate::materials::{Material, Technique};
use crate::render::api::{Geometry, RasterDevice};
use crate::render::FrameContext;
use crate::ui::ParameterSurface;

/// Mesh and material of one drawable
#[derive(Debug, Clone)]
pub struct Renderable {
    /// Display name, used for logging
    pub name: String,
    /// Geometry, `None` while not yet available
    pub mesh: Option<Arc<dyn Geometry>>,
    /// Material driving the draw
    pub material: Material,
}

/// Drawables in insertion order
#[derive(Debug, Default)]
pub struct Scene {
    transforms: TransformRegistry,
    renderables: SecondaryMap<DrawableId, Renderable>,
    order: Vec<DrawableId>,
}

impl Scene {
    /// Create an empty scene
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a drawable
    ///
    /// The id is reserved before `build` runs so materials that drive their
    /// own drawable can be bound to it at construction.
    pub fn spawn(
        &mut self,
        name: impl Into<String>,
        transform: Mat4,
        mesh: Option<Arc<dyn Geometry>>,
        build: impl FnOnce(DrawableId) -> Material,
    ) -> DrawableId {
        let id = self.transforms.insert(transform);
        let renderable = Renderable {
            name: name.into(),
            mesh,
            material: build(id),
        };
        log::debug!("Spawned drawable '{}' ({id:?})", renderable.name);
        self.renderables.insert(id, renderable);
        self.order.push(id);
        id
    }

    /// Remove a drawable
    pub fn despawn(&mut self, id: DrawableId) -> Option<Renderable> {
        self.transforms.remove(id)?;
        self.order.retain(|other| *other != id);
        self.renderables.remove(id)
    }

    /// Transform of a drawable
    pub fn transform(&self, id: DrawableId) -> Option<&Mat4> {
        self.transforms.get(id)
    }

    /// Overwrite a drawable's transform
    pub fn set_transform(&mut self, id: DrawableId, transform: Mat4) -> bool {
        self.transforms.set(id, transform)
    }

    /// Drawable by id
    pub fn renderable(&self, id: DrawableId) -> Option<&Renderable> {
        self.renderables.get(id)
    }

    /// Drawable by id, mutably
    pub fn renderable_mut(&mut self, id: DrawableId) -> Option<&mut Renderable> {
        self.renderables.get_mut(id)
    }

    /// Ids in draw order
    pub fn ids(&self) -> &[DrawableId] {
        &self.order
    }

    /// Number of drawables
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether the scene is empty
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Run every material's per-frame step
    pub fn update(&mut self, seconds_elapsed: f64) {
        for id in &self.order {
            if let Some(renderable) = self.renderables.get_mut(*id) {
                renderable
                    .material
                    .update(seconds_elapsed, &mut self.transforms);
            }
        }
    }

    /// Render every drawable in insertion order
    pub fn render(&self, device: &mut dyn RasterDevice, frame: &FrameContext<'_>) {
        for id in &self.order {
            let (Some(renderable), Some(model)) =
                (self.renderables.get(*id), self.transforms.get(*id))
            else {
                continue;
            };
            renderable
                .material
                .render(device, renderable.mesh.as_deref(), model, frame);
        }
    }

    /// Let every material register its widgets
    pub fn render_in_menu(&mut self, surface: &mut dyn ParameterSurface) {
        for id in &self.order {
            if let Some(renderable) = self.renderables.get_mut(*id) {
                renderable.material.render_in_menu(surface);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MaterialConfig;
    use crate::foundation::math::{Mat4Ext, Vec3};
    use crate::materials::{FlatMaterial, VolumetricMaterial, WireframeMaterial};
    use crate::render::api::{PolygonMode, TextureKind};
    use crate::render::backends::Recorder;
    use crate::render::primitives::Camera;
    use crate::ui::WidgetRecorder;

    fn mesh(recorder: &Recorder, label: &str) -> Option<Arc<dyn Geometry>> {
        Some(Arc::new(recorder.mesh(label)))
    }

    #[test]
    fn test_update_binds_volume_to_its_own_drawable() {
        let recorder = Recorder::new();
        let mut scene = Scene::new();
        let config = MaterialConfig::default();
        let offset = Mat4::new_translation(&Vec3::new(0.0, 2.0, 0.0));

        let floor = scene.spawn("floor", offset, mesh(&recorder, "plane"), |_| {
            FlatMaterial::from_parts(Some(recorder.program("flat")), None).into()
        });
        let volume = scene.spawn("volume", Mat4::identity(), mesh(&recorder, "cube"), |id| {
            VolumetricMaterial::from_parts(
                Some(recorder.program("volume")),
                Some(recorder.texture("foot.vol", TextureKind::Texture3D)),
                None,
                &config,
                Some(id),
            )
            .into()
        });

        scene.update(0.016);

        assert_eq!(scene.transform(floor), Some(&offset));
        assert_eq!(
            scene.transform(volume),
            Some(&Mat4::from_scale(&Vec3::new(5.0, 5.0, 9.0)))
        );
    }

    #[test]
    fn test_render_draws_in_insertion_order() {
        let recorder = Recorder::new();
        let mut device = recorder.device();
        let mut scene = Scene::new();

        scene.spawn("solid", Mat4::identity(), mesh(&recorder, "a"), |_| {
            FlatMaterial::from_parts(Some(recorder.program("flat")), None).into()
        });
        scene.spawn("outline", Mat4::identity(), mesh(&recorder, "b"), |_| {
            WireframeMaterial::from_parts(Some(recorder.program("wire"))).into()
        });
        scene.spawn("pending", Mat4::identity(), None, |_| {
            FlatMaterial::from_parts(Some(recorder.program("flat")), None).into()
        });

        let camera = Camera::default();
        scene.render(&mut device, &FrameContext::new(&camera, 0.0));

        let draws = recorder.draw_calls();
        let meshes: Vec<&str> = draws.iter().map(|d| d.mesh.as_str()).collect();
        assert_eq!(meshes, vec!["a", "b"]);
        assert_eq!(draws[0].raster.polygon_mode, PolygonMode::Fill);
        assert_eq!(draws[1].raster.polygon_mode, PolygonMode::Line);
        assert_eq!(recorder.raster_state().polygon_mode, PolygonMode::Fill);
    }

    #[test]
    fn test_despawn_invalidates_volume_binding() {
        let recorder = Recorder::new();
        let mut scene = Scene::new();
        let config = MaterialConfig::default();

        let cube = scene.spawn("cube", Mat4::identity(), None, |_| {
            FlatMaterial::from_parts(None, None).into()
        });
        let volume = scene.spawn("volume", Mat4::identity(), None, |_| {
            VolumetricMaterial::from_parts(None, None, None, &config, Some(cube)).into()
        });

        assert!(scene.despawn(cube).is_some());
        scene.update(0.016);

        assert_eq!(scene.len(), 1);
        assert_eq!(scene.ids(), &[volume]);
        assert_eq!(scene.transform(volume), Some(&Mat4::identity()));
        assert!(scene.despawn(cube).is_none());
    }

    #[test]
    fn test_menu_pass_visits_every_material() {
        let mut scene = Scene::new();
        let config = MaterialConfig::default();
        scene.spawn("flat", Mat4::identity(), None, |_| {
            FlatMaterial::from_parts(None, None).into()
        });
        scene.spawn("volume", Mat4::identity(), None, |id| {
            VolumetricMaterial::from_parts(None, None, None, &config, Some(id)).into()
        });

        let mut surface = WidgetRecorder::new();
        scene.render_in_menu(&mut surface);

        assert_eq!(surface.labels().first(), Some(&"Color"));
        assert!(surface.find("Direct Light").is_some());
    }
}
