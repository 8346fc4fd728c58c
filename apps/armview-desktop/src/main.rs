use anyhow::Result;
use armview_common::config::JointSliders;
use armview_common::{Joint, ViewerConfig};
use armview_input::{ArmCommand, CommandQueue, PointerDrag, SceneState};
use armview_kinematics::Scene;
use armview_render::{FrameLoop, build_scene, projection_matrix};
use armview_render_wgpu::{GpuContext, RenderError, ShaderSources, WgpuRenderer};
use clap::Parser;
use egui::Context as EguiContext;
use glam::Vec2;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, KeyEvent, MouseButton, MouseScrollDelta, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

/// Pixels of trackpad scroll that count as one wheel line.
const PIXELS_PER_LINE: f32 = 40.0;

#[derive(Parser)]
#[command(name = "armview-desktop", about = "Robot arm viewer")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// YAML viewer config (defaults are used when omitted)
    #[arg(long)]
    config: Option<PathBuf>,
}

/// Window pointer events the viewer reacts to.
#[derive(Debug, Clone, Copy, PartialEq)]
enum PointerInput {
    Press,
    Release,
    Moved(Vec2),
    Left,
    /// Scroll in wheel lines; positive zooms in.
    Wheel(f32),
}

impl PointerInput {
    fn from_window_event(event: &WindowEvent) -> Option<Self> {
        match event {
            WindowEvent::MouseInput {
                button: MouseButton::Left,
                state,
                ..
            } => Some(match state {
                ElementState::Pressed => PointerInput::Press,
                ElementState::Released => PointerInput::Release,
            }),
            WindowEvent::CursorMoved { position, .. } => Some(PointerInput::Moved(Vec2::new(
                position.x as f32,
                position.y as f32,
            ))),
            WindowEvent::CursorLeft { .. } => Some(PointerInput::Left),
            WindowEvent::MouseWheel { delta, .. } => Some(PointerInput::Wheel(scroll_lines(*delta))),
            _ => None,
        }
    }
}

fn scroll_lines(delta: MouseScrollDelta) -> f32 {
    match delta {
        MouseScrollDelta::LineDelta(_, y) => y,
        MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / PIXELS_PER_LINE,
    }
}

/// Pose, camera and the pending input that drives them.
struct AppState {
    scene: SceneState,
    queue: CommandQueue,
    drag: PointerDrag,
    cursor: Vec2,
    sliders: JointSliders,
    show_panel: bool,
}

impl AppState {
    fn new(config: &ViewerConfig) -> Self {
        let scene = SceneState::new(config.joints.initial_angles(), config.camera.build())
            .with_zoom_step(config.camera.zoom_step);
        Self {
            scene,
            queue: CommandQueue::new(),
            drag: PointerDrag::new(),
            cursor: Vec2::ZERO,
            sliders: config.joints.clone(),
            show_panel: true,
        }
    }

    /// Feed one pointer event to the drag tracker and command queue.
    ///
    /// `overlay_consumed` suppresses presses, orbit deltas and zoom while the
    /// pointer is over the panel. Releases and leaves always end the drag.
    fn handle_pointer(&mut self, input: PointerInput, overlay_consumed: bool) {
        match input {
            PointerInput::Press => {
                if !overlay_consumed {
                    self.drag.press(self.cursor.x, self.cursor.y);
                }
            }
            PointerInput::Release => self.drag.release(),
            PointerInput::Left => self.drag.leave(),
            PointerInput::Moved(pos) => {
                self.cursor = pos;
                // Keep the tracker's last sample current even over the panel.
                let delta = self.drag.moved(pos.x, pos.y);
                if let Some(delta) = delta.filter(|_| !overlay_consumed) {
                    self.queue.push(ArmCommand::Orbit {
                        dx: delta.x,
                        dy: delta.y,
                    });
                }
            }
            PointerInput::Wheel(lines) => {
                if !overlay_consumed && lines != 0.0 {
                    self.queue.push(ArmCommand::Zoom(lines));
                }
            }
        }
    }

    fn handle_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::F1 => self.show_panel = !self.show_panel,
            KeyCode::KeyR => self.queue.push(ArmCommand::ResetPose),
            KeyCode::Home => self.queue.push(ArmCommand::ResetCamera),
            _ => {}
        }
    }

    fn draw_ui(&mut self, ctx: &EguiContext) {
        if !self.show_panel {
            return;
        }

        egui::SidePanel::left("joints")
            .default_width(240.0)
            .show(ctx, |ui| {
                ui.heading("Robot Arm");
                ui.separator();

                for joint in Joint::ALL {
                    let range = self.sliders.range(joint);
                    let mut degrees = self.scene.angles.get(joint);
                    let response = ui.add(
                        egui::Slider::new(&mut degrees, range.min..=range.max)
                            .text(joint.label())
                            .suffix("°"),
                    );
                    if response.changed() {
                        self.queue.push(ArmCommand::SetJoint { joint, degrees });
                    }
                }

                ui.horizontal(|ui| {
                    if ui.button("Reset Pose (R)").clicked() {
                        self.queue.push(ArmCommand::ResetPose);
                    }
                    if ui.button("Reset Camera (Home)").clicked() {
                        self.queue.push(ArmCommand::ResetCamera);
                    }
                });

                ui.separator();
                let camera = &self.scene.camera;
                ui.label(format!(
                    "Camera: yaw {:.0}°  pitch {:.0}°  radius {:.1}",
                    camera.yaw.to_degrees(),
                    camera.pitch().to_degrees(),
                    camera.radius()
                ));
                ui.separator();
                ui.small("F1: Toggle Panel | LMB drag: Orbit | Wheel: Zoom");
            });
    }
}

/// Everything a frame needs, created once at startup.
struct SceneResources {
    window: Arc<Window>,
    gpu: GpuContext,
    renderer: WgpuRenderer,
    scene: Scene,
    frames: FrameLoop,
}

/// Bring up the GPU, load shaders and upload the shared mesh. Any error is
/// fatal for the viewer.
fn initialize(window: Arc<Window>, config: &ViewerConfig) -> Result<SceneResources, RenderError> {
    let size = window.inner_size();
    let gpu = GpuContext::new(window.clone(), size.width, size.height)?;
    let shaders = ShaderSources::load(&config.shaders.vertex, &config.shaders.fragment)?;

    let (scene, mesh) = build_scene(config.show_prop);
    let mesh = mesh.finish();

    let (width, height) = gpu.size();
    let renderer = WgpuRenderer::new(
        &gpu.device,
        gpu.surface_format(),
        width,
        height,
        &mesh,
        &shaders,
        config.clear_color,
    )?;
    let frames = FrameLoop::new(projection_matrix(&config.projection, gpu.aspect()));

    tracing::info!(
        "scene ready: {} draws per frame, {} mesh vertices",
        scene.draw_count(),
        mesh.vertex_count()
    );

    Ok(SceneResources {
        window,
        gpu,
        renderer,
        scene,
        frames,
    })
}

/// egui input translation and painting on top of the scene.
struct Overlay {
    winit: egui_winit::State,
    renderer: egui_wgpu::Renderer,
}

impl Overlay {
    fn new(ctx: &EguiContext, resources: &SceneResources) -> Self {
        let winit = egui_winit::State::new(
            ctx.clone(),
            egui::ViewportId::ROOT,
            &resources.window,
            Some(resources.window.scale_factor() as f32),
            None,
            None,
        );
        let renderer =
            egui_wgpu::Renderer::new(&resources.gpu.device, resources.gpu.surface_format(), None, 1, false);
        Self { winit, renderer }
    }

    fn paint(
        &mut self,
        ctx: &EguiContext,
        window: &Window,
        gpu: &GpuContext,
        target: &wgpu::TextureView,
        run_ui: impl FnMut(&EguiContext),
    ) {
        let raw_input = self.winit.take_egui_input(window);
        let full_output = ctx.run(raw_input, run_ui);
        self.winit
            .handle_platform_output(window, full_output.platform_output);

        let paint_jobs = ctx.tessellate(full_output.shapes, full_output.pixels_per_point);
        let (width, height) = gpu.size();
        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [width, height],
            pixels_per_point: full_output.pixels_per_point,
        };

        for (id, image_delta) in &full_output.textures_delta.set {
            self.renderer
                .update_texture(&gpu.device, &gpu.queue, *id, image_delta);
        }
        let mut encoder = gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("egui_encoder"),
            });
        self.renderer.update_buffers(
            &gpu.device,
            &gpu.queue,
            &mut encoder,
            &paint_jobs,
            &screen_descriptor,
        );
        {
            let mut pass = encoder
                .begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("egui_pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view: target,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Load,
                            store: wgpu::StoreOp::Store,
                        },
                    })],
                    depth_stencil_attachment: None,
                    ..Default::default()
                })
                .forget_lifetime();
            self.renderer
                .render(&mut pass, &paint_jobs, &screen_descriptor);
        }
        gpu.queue.submit(std::iter::once(encoder.finish()));
        for id in &full_output.textures_delta.free {
            self.renderer.free_texture(id);
        }
    }
}

struct Running {
    resources: SceneResources,
    overlay: Overlay,
}

struct GpuApp {
    config: ViewerConfig,
    app: AppState,
    running: Option<Running>,
    egui_ctx: EguiContext,
    startup_error: Option<anyhow::Error>,
}

impl GpuApp {
    fn new(config: ViewerConfig) -> Self {
        Self {
            app: AppState::new(&config),
            config,
            running: None,
            egui_ctx: EguiContext::default(),
            startup_error: None,
        }
    }

    fn start(&self, event_loop: &ActiveEventLoop) -> Result<Running> {
        let window_config = &self.config.window;
        let attrs = Window::default_attributes()
            .with_title(window_config.title.as_str())
            .with_inner_size(PhysicalSize::new(window_config.width, window_config.height))
            .with_resizable(false);
        let window = Arc::new(event_loop.create_window(attrs)?);

        let resources = initialize(window, &self.config)?;
        let overlay = Overlay::new(&self.egui_ctx, &resources);
        Ok(Running { resources, overlay })
    }

    fn redraw(&mut self) {
        let Some(running) = self.running.as_mut() else {
            return;
        };
        self.app.scene.apply_pending(&mut self.app.queue);

        let res = &mut running.resources;
        let output = match res.gpu.surface.get_current_texture() {
            Ok(t) => t,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                res.gpu.reconfigure();
                return;
            }
            Err(e) => {
                tracing::error!("surface error: {e}");
                return;
            }
        };
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        res.frames.run_frame(
            &mut res.renderer,
            &res.scene,
            &self.app.scene.angles,
            &self.app.scene.camera,
        );
        res.renderer.finish_frame(&res.gpu.device, &res.gpu.queue, &view);

        let app = &mut self.app;
        running
            .overlay
            .paint(&self.egui_ctx, &res.window, &res.gpu, &view, |ctx| {
                app.draw_ui(ctx)
            });

        output.present();
        res.window.request_redraw();
    }
}

impl ApplicationHandler for GpuApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.running.is_some() || self.startup_error.is_some() {
            return;
        }

        match self.start(event_loop) {
            Ok(running) => self.running = Some(running),
            Err(err) => {
                tracing::error!("startup failed: {err:#}");
                eprintln!("armview-desktop: cannot start the viewer: {err:#}");
                self.startup_error = Some(err);
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(running) = self.running.as_mut() else {
            return;
        };

        let response = running
            .overlay
            .winit
            .on_window_event(&running.resources.window, &event);
        if let Some(input) = PointerInput::from_window_event(&event) {
            self.app.handle_pointer(input, response.consumed);
            return;
        }
        if response.consumed {
            return;
        }

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                let res = &mut running.resources;
                res.gpu.resize(new_size.width, new_size.height);
                let (width, height) = res.gpu.size();
                res.renderer.resize(&res.gpu.device, width, height);
                res.frames
                    .set_projection(projection_matrix(&self.config.projection, res.gpu.aspect()));
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(key),
                        state: ElementState::Pressed,
                        repeat: false,
                        ..
                    },
                ..
            } => {
                self.app.handle_key(key);
            }
            WindowEvent::RedrawRequested => {
                self.redraw();
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(running) = &self.running {
            running.resources.window.request_redraw();
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    tracing::info!("armview-desktop starting");

    let config = ViewerConfig::load_or_default(cli.config.as_deref())?;

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = GpuApp::new(config);
    event_loop.run_app(&mut app)?;

    if let Some(err) = app.startup_error.take() {
        return Err(err);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::dpi::PhysicalPosition;

    fn drain(state: &mut AppState) -> Vec<ArmCommand> {
        state.queue.drain().collect()
    }

    fn moved(x: f32, y: f32) -> PointerInput {
        PointerInput::Moved(Vec2::new(x, y))
    }

    #[test]
    fn drag_publishes_orbit_deltas() {
        let mut state = AppState::new(&ViewerConfig::default());
        state.handle_pointer(moved(10.0, 10.0), false);
        assert!(drain(&mut state).is_empty());

        state.handle_pointer(PointerInput::Press, false);
        state.handle_pointer(moved(15.0, 7.0), false);
        assert_eq!(drain(&mut state), vec![ArmCommand::Orbit { dx: 5.0, dy: -3.0 }]);

        state.handle_pointer(PointerInput::Left, false);
        state.handle_pointer(moved(40.0, 40.0), false);
        assert!(drain(&mut state).is_empty());
    }

    #[test]
    fn release_stops_orbiting() {
        let mut state = AppState::new(&ViewerConfig::default());
        state.handle_pointer(PointerInput::Press, false);
        state.handle_pointer(PointerInput::Release, false);
        state.handle_pointer(moved(100.0, 0.0), false);
        assert!(drain(&mut state).is_empty());
    }

    #[test]
    fn release_over_panel_still_ends_drag() {
        let mut state = AppState::new(&ViewerConfig::default());
        state.handle_pointer(moved(400.0, 300.0), false);
        state.handle_pointer(PointerInput::Press, false);
        // Drag onto the panel and let go there.
        state.handle_pointer(moved(200.0, 300.0), true);
        state.handle_pointer(PointerInput::Release, true);
        drain(&mut state);

        state.handle_pointer(moved(400.0, 300.0), false);
        state.handle_pointer(moved(420.0, 310.0), false);
        assert!(drain(&mut state).is_empty());
    }

    #[test]
    fn leave_over_panel_still_ends_drag() {
        let mut state = AppState::new(&ViewerConfig::default());
        state.handle_pointer(PointerInput::Press, false);
        state.handle_pointer(PointerInput::Left, true);
        state.handle_pointer(moved(5.0, 5.0), false);
        state.handle_pointer(moved(50.0, 5.0), false);
        assert!(drain(&mut state).is_empty());
    }

    #[test]
    fn panel_blocks_presses_and_zoom() {
        let mut state = AppState::new(&ViewerConfig::default());
        state.handle_pointer(moved(100.0, 100.0), true);
        state.handle_pointer(PointerInput::Press, true);
        state.handle_pointer(moved(120.0, 100.0), false);
        state.handle_pointer(PointerInput::Wheel(1.0), true);
        assert!(drain(&mut state).is_empty());
    }

    #[test]
    fn drag_across_panel_resumes_without_jump() {
        let mut state = AppState::new(&ViewerConfig::default());
        state.handle_pointer(moved(300.0, 100.0), false);
        state.handle_pointer(PointerInput::Press, false);
        state.handle_pointer(moved(200.0, 100.0), true);
        assert!(drain(&mut state).is_empty());
        state.handle_pointer(moved(260.0, 100.0), false);
        assert_eq!(drain(&mut state), vec![ArmCommand::Orbit { dx: 60.0, dy: 0.0 }]);
    }

    #[test]
    fn wheel_maps_to_zoom_lines() {
        assert_eq!(scroll_lines(MouseScrollDelta::LineDelta(0.0, 2.0)), 2.0);
        assert_eq!(
            scroll_lines(MouseScrollDelta::PixelDelta(PhysicalPosition::new(0.0, -80.0))),
            -2.0
        );

        let mut state = AppState::new(&ViewerConfig::default());
        state.handle_pointer(PointerInput::Wheel(2.0), false);
        state.handle_pointer(PointerInput::Wheel(0.0), false);
        assert_eq!(drain(&mut state), vec![ArmCommand::Zoom(2.0)]);
    }

    #[test]
    fn keys_queue_resets_and_toggle_panel() {
        let mut state = AppState::new(&ViewerConfig::default());
        state.handle_key(KeyCode::F1);
        assert!(!state.show_panel);
        state.handle_key(KeyCode::KeyR);
        state.handle_key(KeyCode::Home);
        assert_eq!(
            drain(&mut state),
            vec![ArmCommand::ResetPose, ArmCommand::ResetCamera]
        );
    }

    #[test]
    fn starts_from_configured_slider_defaults() {
        let state = AppState::new(&ViewerConfig::default());
        assert_eq!(state.scene.angles.get(Joint::Gripper), 15.0);
        assert_eq!(state.scene.camera.radius(), 20.0);
    }
}
