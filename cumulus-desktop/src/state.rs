//! Per-application state: GPU context, renderer, and camera wiring.

use cumulus_cloud::PointCloud;
use cumulus_render::{
    collect_sprites, context::GpuContext, renderer::RenderError, Camera, FrameStats, Renderer,
};

use crate::controller::CameraController;

pub struct AppState {
    pub gpu: GpuContext,
    renderer: Renderer,
    camera: Camera,
    pub controller: CameraController,
    /// Sprite circumradius in pixels, fixed for the session.
    sprite_px: f32,
    viewport_height: u32,
}

impl AppState {
    pub fn new(
        gpu: GpuContext,
        cloud: &PointCloud,
        sprite_px: f32,
        width: u32,
        height: u32,
    ) -> Self {
        let mut renderer = Renderer::new(&gpu);
        renderer.upload_points(&gpu, &collect_sprites(cloud));

        let centroid = cloud.centroid();
        let mean_radius = cloud.mean_radius(centroid);
        let camera = Camera::framing(centroid, mean_radius, width as f32 / height as f32);

        // Cross the cloud in roughly a second of held key at 60 fps.
        let speed = (mean_radius / 30.0).max(0.01);

        Self {
            gpu,
            renderer,
            camera,
            controller: CameraController::new(speed),
            sprite_px,
            viewport_height: height,
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.gpu.resize(width, height);
        if width > 0 && height > 0 {
            self.camera.aspect = width as f32 / height as f32;
            self.viewport_height = height;
        }
    }

    /// Advance the camera and render one frame.
    ///
    /// The uniforms are rebuilt from the camera every frame and handed
    /// to the renderer at dispatch time; no frame state lives between
    /// calls.
    pub fn render_frame(&mut self) -> Result<FrameStats, RenderError> {
        self.controller.update_camera(&mut self.camera);
        let frame = self
            .camera
            .frame_uniforms(self.sprite_px, self.viewport_height);
        self.renderer.prepare(&self.gpu, &frame);
        self.renderer.render_to_surface(&self.gpu)
    }
}
