//! Windowed viewer backed by `wgpu` and `winit`.
//!
//! The event loop is never handed over to winit: every poll pumps pending
//! events without blocking, so the caller keeps control of the simulation
//! loop and the window simply reflects the last synced state.

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use physics::ArmSim;
use wgpu::util::DeviceExt;
use winit::dpi::{LogicalSize, PhysicalSize};
use winit::event::{ElementState, Event, WindowEvent};
use winit::event_loop::EventLoop;
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::platform::pump_events::{EventLoopExtPumpEvents, PumpStatus};
use winit::window::{Window, WindowBuilder};

use crate::camera::OrbitCamera;
use crate::mesh::{scene_vertices, Vertex};
use crate::viewer::{Viewer, ViewerOptions};

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;
const ORBIT_STEP: f32 = 0.08;
const ZOOM_STEP: f32 = 0.9;
const CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 0.08,
    g: 0.09,
    b: 0.11,
    a: 1.0,
};
const VERTEX_ATTRIBUTES: [wgpu::VertexAttribute; 2] =
    wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3];

/// Interactive window showing the arm, obstacles and goal markers.
///
/// Arrow keys orbit the camera, `+`/`-` zoom. Closing the window makes
/// [`Viewer::is_running`] return `false`.
pub struct WindowViewer {
    event_loop: EventLoop<()>,
    window: Arc<Window>,
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    pipeline: wgpu::RenderPipeline,
    depth_view: wgpu::TextureView,
    vertex_buffer: wgpu::Buffer,
    vertex_count: u32,
    camera: OrbitCamera,
    camera_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,
    frame_interval: Option<Duration>,
    last_frame: Option<Instant>,
    running: bool,
    closed: bool,
}

impl WindowViewer {
    /// Open a window and prepare the GPU pipeline.
    ///
    /// # Errors
    ///
    /// Fails when no window can be created or no suitable GPU adapter exists.
    pub fn new(options: &ViewerOptions, sim: &ArmSim) -> Result<Self> {
        let event_loop = EventLoop::new().context("create event loop")?;
        let window = Arc::new(
            WindowBuilder::new()
                .with_title(options.title.clone())
                .with_inner_size(LogicalSize::new(
                    f64::from(options.width),
                    f64::from(options.height),
                ))
                .build(&event_loop)
                .context("failed to create window")?,
        );

        let instance = wgpu::Instance::default();
        let surface = instance
            .create_surface(window.clone())
            .context("failed to create surface")?;

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .context("failed to get adapter")?;

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("Viewer Device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
            },
            None,
        ))
        .context("failed to request device")?;

        let size = window.inner_size();
        let surface_caps = surface.get_capabilities(&adapter);
        let format = *surface_caps
            .formats
            .first()
            .context("surface reports no texture formats")?;
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);
        let depth_view = create_depth_view(&device, &config);

        let camera = OrbitCamera::new(config.width, config.height);
        let camera_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Camera Buffer"),
            contents: bytemuck::bytes_of(&camera.uniform()),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let camera_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
                label: Some("camera_bind_group_layout"),
            });

        let camera_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &camera_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: camera_buffer.as_entire_binding(),
            }],
            label: Some("camera_bind_group"),
        });

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("scene shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shader.wgsl").into()),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Render Pipeline Layout"),
            bind_group_layouts: &[&camera_bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Render Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: "vs_main",
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<Vertex>() as u64,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &VERTEX_ATTRIBUTES,
                }],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: "fs_main",
                targets: &[Some(wgpu::ColorTargetState {
                    format: config.format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
        });

        let vertices = scene_vertices(sim);
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("vertices"),
            contents: bytemuck::cast_slice(&vertices),
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        });

        tracing::info!(
            width = config.width,
            height = config.height,
            adapter = ?adapter.get_info().name,
            "viewer window opened"
        );

        Ok(Self {
            event_loop,
            window,
            surface,
            device,
            queue,
            config,
            pipeline,
            depth_view,
            vertex_count: u32::try_from(vertices.len()).unwrap_or(u32::MAX),
            vertex_buffer,
            camera,
            camera_buffer,
            camera_bind_group,
            frame_interval: options
                .fps
                .filter(|fps| *fps > 0.0)
                .map(|fps| Duration::from_secs_f32(1.0 / fps)),
            last_frame: None,
            running: true,
            closed: false,
        })
    }

    /// Drain pending window events without blocking.
    fn pump(&mut self) {
        let mut exit_requested = false;
        let mut resized = None;
        let mut keys = Vec::new();
        let status = self
            .event_loop
            .pump_events(Some(Duration::ZERO), |event, elwt| {
                if let Event::WindowEvent { event, .. } = event {
                    match event {
                        WindowEvent::CloseRequested => {
                            exit_requested = true;
                            elwt.exit();
                        }
                        WindowEvent::Resized(size) => resized = Some(size),
                        WindowEvent::KeyboardInput { event, .. }
                            if event.state == ElementState::Pressed =>
                        {
                            if let PhysicalKey::Code(code) = event.physical_key {
                                keys.push(code);
                            }
                        }
                        _ => {}
                    }
                }
            });

        if exit_requested || matches!(status, PumpStatus::Exit(_)) {
            tracing::info!("viewer window closed by user");
            self.running = false;
        }
        if let Some(size) = resized {
            self.resize(size);
        }
        for key in keys {
            self.handle_key(key);
        }
    }

    fn handle_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::ArrowLeft => self.camera.orbit(-ORBIT_STEP, 0.0),
            KeyCode::ArrowRight => self.camera.orbit(ORBIT_STEP, 0.0),
            KeyCode::ArrowUp => self.camera.orbit(0.0, ORBIT_STEP),
            KeyCode::ArrowDown => self.camera.orbit(0.0, -ORBIT_STEP),
            KeyCode::Equal | KeyCode::NumpadAdd => self.camera.zoom(ZOOM_STEP),
            KeyCode::Minus | KeyCode::NumpadSubtract => self.camera.zoom(1.0 / ZOOM_STEP),
            _ => {}
        }
    }

    fn resize(&mut self, size: PhysicalSize<u32>) {
        if size.width == 0 || size.height == 0 {
            return;
        }
        self.config.width = size.width;
        self.config.height = size.height;
        self.surface.configure(&self.device, &self.config);
        self.depth_view = create_depth_view(&self.device, &self.config);
        self.camera.resize(size.width, size.height);
    }

    /// Upload the scene triangles, growing the buffer when needed.
    fn upload(&mut self, sim: &ArmSim) {
        let vertices = scene_vertices(sim);
        let bytes: &[u8] = bytemuck::cast_slice(&vertices);
        if self.vertex_buffer.size() < bytes.len() as u64 {
            self.vertex_buffer = self
                .device
                .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some("vertices"),
                    contents: bytes,
                    usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
                });
        } else {
            self.queue.write_buffer(&self.vertex_buffer, 0, bytes);
        }
        self.vertex_count = u32::try_from(vertices.len()).unwrap_or(u32::MAX);
    }

    fn render_frame(&mut self) -> Result<()> {
        self.queue.write_buffer(
            &self.camera_buffer,
            0,
            bytemuck::bytes_of(&self.camera.uniform()),
        );

        let output = match self.surface.get_current_texture() {
            Ok(output) => output,
            // Reconfigure and drop this frame; the next sync draws again.
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.surface.configure(&self.device, &self.config);
                return Ok(());
            }
            Err(e) => return Err(e).context("failed to acquire surface texture"),
        };
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor { label: Some("enc") });
        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("rpass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(CLEAR_COLOR),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            rpass.set_pipeline(&self.pipeline);
            rpass.set_bind_group(0, &self.camera_bind_group, &[]);
            rpass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
            rpass.draw(0..self.vertex_count, 0..1);
        }
        self.queue.submit(Some(encoder.finish()));
        output.present();
        Ok(())
    }

    /// Sleep off the rest of the frame budget.
    fn pace(&mut self) {
        if let (Some(interval), Some(last)) = (self.frame_interval, self.last_frame) {
            let elapsed = last.elapsed();
            if elapsed < interval {
                std::thread::sleep(interval - elapsed);
            }
        }
        self.last_frame = Some(Instant::now());
    }
}

impl Viewer for WindowViewer {
    fn is_running(&mut self) -> bool {
        if self.running {
            self.pump();
        }
        self.running
    }

    fn sync(&mut self, sim: &ArmSim) -> Result<()> {
        if !self.running {
            return Ok(());
        }
        self.upload(sim);
        self.render_frame()?;
        self.pace();
        Ok(())
    }

    fn close(&mut self) {
        if !self.closed {
            self.closed = true;
            self.running = false;
            self.window.set_visible(false);
            tracing::info!("viewer window released");
        }
    }
}

fn create_depth_view(
    device: &wgpu::Device,
    config: &wgpu::SurfaceConfiguration,
) -> wgpu::TextureView {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("depth"),
        size: wgpu::Extent3d {
            width: config.width,
            height: config.height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    texture.create_view(&wgpu::TextureViewDescriptor::default())
}
