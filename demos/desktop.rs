use std::error::Error;
use std::sync::Arc;

use gaze_eyes::gui::{eye_control_panel, PanelAction};
use gaze_eyes::{
    AnimatorConfig, DetectError, DrawList, EyeRenderer, FaceDetector, FaceLandmarks, FrameDriver,
    Point,
};
use winit::application::ApplicationHandler;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::keyboard::{Key, NamedKey};
use winit::window::{Window, WindowId};

/// Pretends the mouse cursor is a face looking at the screen.
///
/// While the cursor is inside the window it reports one face with both eyes
/// at the cursor, mapped into the reference frame and mirrored the way a
/// front-facing camera would see it.
struct CursorDetector {
    cursor: Option<[f32; 2]>,
    viewport: [f32; 2],
    reference_frame: [f32; 2],
}

impl FaceDetector for CursorDetector {
    async fn detect(&mut self) -> Result<Vec<FaceLandmarks>, DetectError> {
        let Some([x, y]) = self.cursor else {
            return Ok(Vec::new());
        };
        let [vw, vh] = self.viewport;
        if vw <= 0.0 || vh <= 0.0 {
            return Err(DetectError::Unavailable("window has no area".into()));
        }
        let [fw, fh] = self.reference_frame;
        let point = Point::new((1.0 - x / vw) * fw, y / vh * fh);
        Ok(vec![FaceLandmarks {
            left_eye: vec![point, point],
            right_eye: vec![point, point],
        }])
    }
}

struct App {
    config: AnimatorConfig,
    state: Option<AppState>,
}

struct AppState {
    window: Arc<Window>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    surface: wgpu::Surface<'static>,
    surface_config: wgpu::SurfaceConfiguration,
    renderer: EyeRenderer,
    driver: FrameDriver<CursorDetector>,
    draw_list: DrawList,
    config: AnimatorConfig,

    // egui
    egui_ctx: egui::Context,
    egui_state: egui_winit::State,
    egui_renderer: egui_wgpu::Renderer,
}

impl AppState {
    fn viewport(&self) -> [f32; 2] {
        [
            self.surface_config.width as f32,
            self.surface_config.height as f32,
        ]
    }

    fn handle_panel_action(&mut self, action: PanelAction) {
        match action {
            PanelAction::ParamsChanged => {
                self.driver.apply_params(self.config.eye);
                self.driver.set_background(self.config.background_color);
            }
            PanelAction::Save => {
                let Some(path) = rfd::FileDialog::new()
                    .add_filter("json", &["json"])
                    .set_file_name("eyes.json")
                    .save_file()
                else {
                    return;
                };
                if let Err(e) = self.config.save(&path) {
                    log::error!("could not save config: {e}");
                }
            }
            PanelAction::Load => {
                let Some(path) = rfd::FileDialog::new()
                    .add_filter("json", &["json"])
                    .pick_file()
                else {
                    return;
                };
                match AnimatorConfig::load(&path) {
                    Ok(config) => {
                        self.config = config;
                        self.rebuild_eyes();
                    }
                    Err(e) => log::error!("could not load config: {e}"),
                }
            }
            PanelAction::Reset => self.rebuild_eyes(),
        }
    }

    fn rebuild_eyes(&mut self) {
        let eyes = self.config.build_eyes(self.viewport());
        self.driver.replace_eyes(eyes);
        self.driver.set_background(self.config.background_color);
        self.driver.detector_mut().reference_frame = self.config.eye.reference_frame;
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }

        let window = Arc::new(
            event_loop
                .create_window(
                    Window::default_attributes()
                        .with_title("Gaze Eyes")
                        .with_inner_size(winit::dpi::LogicalSize::new(1280, 720)),
                )
                .unwrap(),
        );

        let config = self.config.clone();
        let state = pollster::block_on(async {
            let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
                backends: wgpu::Backends::all(),
                ..Default::default()
            });

            let surface = instance.create_surface(window.clone()).unwrap();

            let adapter = instance
                .request_adapter(&wgpu::RequestAdapterOptions {
                    power_preference: wgpu::PowerPreference::default(),
                    compatible_surface: Some(&surface),
                    force_fallback_adapter: false,
                })
                .await
                .unwrap();

            let (device, queue) = adapter
                .request_device(
                    &wgpu::DeviceDescriptor {
                        label: Some("eyes_device"),
                        ..Default::default()
                    },
                    None,
                )
                .await
                .unwrap();

            let size = window.inner_size();
            let caps = surface.get_capabilities(&adapter);
            // Colors are authored as sRGB bytes, so skip the sRGB-encoding formats.
            let format = caps
                .formats
                .iter()
                .copied()
                .find(|f| !f.is_srgb())
                .unwrap_or(caps.formats[0]);

            let surface_config = wgpu::SurfaceConfiguration {
                usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
                format,
                width: size.width.max(1),
                height: size.height.max(1),
                present_mode: wgpu::PresentMode::AutoVsync,
                alpha_mode: caps.alpha_modes[0],
                view_formats: vec![],
                desired_maximum_frame_latency: 2,
            };
            surface.configure(&device, &surface_config);

            let renderer = EyeRenderer::new(&device, format);
            let viewport = [surface_config.width as f32, surface_config.height as f32];
            let detector = CursorDetector {
                cursor: None,
                viewport,
                reference_frame: config.eye.reference_frame,
            };
            let driver = FrameDriver::new(detector, &config, viewport);
            log::info!("created {} eyes for {viewport:?}", driver.eyes().len());

            // egui setup
            let egui_ctx = egui::Context::default();
            let egui_state = egui_winit::State::new(
                egui_ctx.clone(),
                egui_ctx.viewport_id(),
                &window,
                Some(window.scale_factor() as f32),
                None,
                None,
            );
            let egui_renderer = egui_wgpu::Renderer::new(&device, format, None, 1, false);

            AppState {
                window,
                device,
                queue,
                surface,
                surface_config,
                renderer,
                driver,
                draw_list: DrawList::new(),
                config,
                egui_ctx,
                egui_state,
                egui_renderer,
            }
        });

        self.state = Some(state);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(state) = &mut self.state else {
            return;
        };

        // Pass events to egui first
        let egui_response = state.egui_state.on_window_event(&state.window, &event);
        if egui_response.consumed {
            return;
        }

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                state.surface_config.width = new_size.width.max(1);
                state.surface_config.height = new_size.height.max(1);
                state
                    .surface
                    .configure(&state.device, &state.surface_config);
                // Eye geometry stays as created; only the cursor mapping follows.
                state.driver.detector_mut().viewport = state.viewport();
                state.window.request_redraw();
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        logical_key: Key::Named(NamedKey::Escape),
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } => {
                event_loop.exit();
            }
            WindowEvent::CursorMoved { position, .. } => {
                state.driver.detector_mut().cursor = Some([position.x as f32, position.y as f32]);
            }
            WindowEvent::CursorLeft { .. } => {
                state.driver.detector_mut().cursor = None;
            }
            WindowEvent::RedrawRequested => {
                let output = match state.surface.get_current_texture() {
                    Ok(output) => output,
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        state
                            .surface
                            .configure(&state.device, &state.surface_config);
                        return;
                    }
                    Err(e) => {
                        log::error!("surface error: {e:?}");
                        return;
                    }
                };

                // Detect, update and record this frame's eyes.
                state.draw_list.clear();
                pollster::block_on(state.driver.run_frame(&mut state.draw_list));

                // --- egui frame ---
                let raw_input = state.egui_state.take_egui_input(&state.window);
                let mut panel_action = None;
                let full_output = state.egui_ctx.run(raw_input, |ctx| {
                    panel_action = eye_control_panel(ctx, &mut state.config, state.driver.eyes());
                });
                if let Some(action) = panel_action {
                    state.handle_panel_action(action);
                }

                state
                    .egui_state
                    .handle_platform_output(&state.window, full_output.platform_output);

                let paint_jobs = state
                    .egui_ctx
                    .tessellate(full_output.shapes, full_output.pixels_per_point);

                // Update egui textures
                for (id, delta) in &full_output.textures_delta.set {
                    state
                        .egui_renderer
                        .update_texture(&state.device, &state.queue, *id, delta);
                }

                let screen_descriptor = egui_wgpu::ScreenDescriptor {
                    size_in_pixels: [state.surface_config.width, state.surface_config.height],
                    pixels_per_point: state.window.scale_factor() as f32,
                };

                let view = output
                    .texture
                    .create_view(&wgpu::TextureViewDescriptor::default());
                let mut encoder =
                    state
                        .device
                        .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                            label: Some("eyes_encoder"),
                        });

                // Update egui buffers
                state.egui_renderer.update_buffers(
                    &state.device,
                    &state.queue,
                    &mut encoder,
                    &paint_jobs,
                    &screen_descriptor,
                );

                state.renderer.prepare(
                    &state.queue,
                    &state.draw_list,
                    (state.surface_config.width, state.surface_config.height),
                );

                // Render eyes + egui overlay in same pass
                {
                    let mut pass = encoder
                        .begin_render_pass(&wgpu::RenderPassDescriptor {
                            label: Some("eyes_render_pass"),
                            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                                view: &view,
                                resolve_target: None,
                                ops: wgpu::Operations {
                                    load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                                    store: wgpu::StoreOp::Store,
                                },
                            })],
                            depth_stencil_attachment: None,
                            timestamp_writes: None,
                            occlusion_query_set: None,
                        })
                        .forget_lifetime();

                    state.renderer.draw(&mut pass);

                    state
                        .egui_renderer
                        .render(&mut pass, &paint_jobs, &screen_descriptor);
                }

                // Free egui textures
                for id in &full_output.textures_delta.free {
                    state.egui_renderer.free_texture(id);
                }

                state.queue.submit(std::iter::once(encoder.finish()));
                output.present();

                state.window.request_redraw();
            }
            _ => {}
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let config = match std::env::args().nth(1) {
        Some(path) => AnimatorConfig::load(path)?,
        None => AnimatorConfig::default(),
    };

    let event_loop = EventLoop::new()?;
    let mut app = App {
        config,
        state: None,
    };
    event_loop.run_app(&mut app)?;
    Ok(())
}
