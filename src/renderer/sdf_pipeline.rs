//! SDF-based WebGPU render pipeline
//!
//! Renders the entire dungeon in the fragment shader by raymarching signed
//! distance fields: a floor plane, one box per wall cell, a capsule for the
//! player, and a sphere per live enemy. No meshes and no vertex buffers;
//! the sim state is uploaded each frame and a single fullscreen triangle
//! is drawn.

use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

use crate::consts::GROUND_HEIGHT;
use crate::sim::{BehaviorState, EffectKind, GameState, SimPhase};

/// Maximum number of wall cells uploaded to the GPU
const MAX_WALLS: usize = 1024;
/// Maximum number of enemies uploaded to the GPU
const MAX_ENEMIES: usize = 64;

// ============================================================================
// GPU DATA STRUCTURES (must match shader)
// ============================================================================

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct Globals {
    resolution: [f32; 2],    // offset 0
    time: f32,               // offset 8
    wall_count: u32,         // offset 12
    camera_pos: [f32; 3],    // offset 16 (16-byte aligned for WGSL vec3)
    enemy_count: u32,        // offset 28 - packs into the vec3 tail slot
    camera_target: [f32; 3], // offset 32
    hurt_flash: f32,         // offset 44 - red vignette strength, 0-1
    tile_size: f32,          // offset 48
    ground_height: f32,      // offset 52 - actor origin rest height
    game_over: u32,          // offset 56 - 1 drains the color from the scene
    _pad: u32,               // pad to 64 bytes
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct PlayerUniform {
    pos: [f32; 3],
    yaw: f32,
    radius: f32,
    sweep: f32, // swing phase 0-1, negative when no swing is active
    sweep_yaw: f32,
    health_frac: f32,
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct WallData {
    center: [f32; 2], // cell center on the ground plane (x, z)
    half_size: f32,
    _pad: f32,
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct EnemyData {
    pos: [f32; 3],
    radius: f32,
    yaw: f32,
    flash: f32,    // 0-1 hit flash, fades over the effect's lifetime
    behavior: u32, // 0=Idle, 1=Chase, 2=Attack
    _pad: u32,
}

// ============================================================================
// DUNGEON RENDER STATE
// ============================================================================

pub struct DungeonRenderState {
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    pub pipeline: wgpu::RenderPipeline,

    // Uniform buffers
    globals_buffer: wgpu::Buffer,
    player_buffer: wgpu::Buffer,
    walls_buffer: wgpu::Buffer,
    enemies_buffer: wgpu::Buffer,

    bind_group: wgpu::BindGroup,

    pub size: (u32, u32),
}

impl DungeonRenderState {
    pub async fn new(
        surface: wgpu::Surface<'static>,
        adapter: &wgpu::Adapter,
        width: u32,
        height: u32,
    ) -> Self {
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("dungeon-device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::downlevel_webgl2_defaults(),
                memory_hints: Default::default(),
                trace: Default::default(),
                experimental_features: Default::default(),
            })
            .await
            .expect("Failed to create device");

        let surface_caps = surface.get_capabilities(adapter);
        log::info!("Surface formats: {:?}", surface_caps.formats);
        log::info!("Surface alpha modes: {:?}", surface_caps.alpha_modes);
        log::info!("Surface present modes: {:?}", surface_caps.present_modes);

        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .copied()
            .unwrap_or(surface_caps.formats[0]);

        log::info!("Using surface format: {:?}", surface_format);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width,
            height,
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        log::info!(
            "Surface config: {}x{}, alpha: {:?}",
            width,
            height,
            config.alpha_mode
        );
        surface.configure(&device, &config);

        // Create shader
        log::info!("Creating shader module...");
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("dungeon_shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("dungeon_shader.wgsl").into()),
        });
        log::info!("Shader module created");

        // Create buffers
        let globals_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("globals"),
            contents: bytemuck::bytes_of(&Globals {
                resolution: [width as f32, height as f32],
                time: 0.0,
                wall_count: 0,
                camera_pos: [0.0, 8.0, -10.0],
                enemy_count: 0,
                camera_target: [0.0, 0.0, 0.0],
                hurt_flash: 0.0,
                tile_size: 2.0,
                ground_height: GROUND_HEIGHT,
                game_over: 0,
                _pad: 0,
            }),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let player_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("player"),
            contents: bytemuck::bytes_of(&PlayerUniform {
                pos: [0.0, GROUND_HEIGHT, 0.0],
                yaw: 0.0,
                radius: 0.5,
                sweep: -1.0,
                sweep_yaw: 0.0,
                health_frac: 1.0,
            }),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let walls_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("walls"),
            size: (std::mem::size_of::<WallData>() * MAX_WALLS) as u64,
            usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let enemies_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("enemies"),
            size: (std::mem::size_of::<EnemyData>() * MAX_ENEMIES) as u64,
            usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        // Bind group layout
        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("dungeon_bind_group_layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Storage { read_only: true },
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 3,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Storage { read_only: true },
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
            ],
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("dungeon_bind_group"),
            layout: &bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: globals_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: player_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: walls_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 3,
                    resource: enemies_buffer.as_entire_binding(),
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("dungeon_pipeline_layout"),
            bind_group_layouts: &[&bind_group_layout],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("dungeon_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[], // No vertex buffers - fullscreen triangle
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: config.format,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                ..Default::default()
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        Self {
            surface,
            device,
            queue,
            config,
            pipeline,
            globals_buffer,
            player_buffer,
            walls_buffer,
            enemies_buffer,
            bind_group,
            size: (width, height),
        }
    }

    pub fn resize(&mut self, new_width: u32, new_height: u32) {
        if new_width > 0 && new_height > 0 {
            self.size = (new_width, new_height);
            self.config.width = new_width;
            self.config.height = new_height;
            self.surface.configure(&self.device, &self.config);
        }
    }

    /// Update GPU buffers from game state and render
    pub fn render(&mut self, state: &GameState, time: f64) -> Result<(), wgpu::SurfaceError> {
        // time is ms since page load from requestAnimationFrame, convert to seconds
        let elapsed = (time / 1000.0) as f32;

        // Dead enemies keep their slot in the sim but are never uploaded
        let mut enemies_data = vec![
            EnemyData {
                pos: [0.0; 3],
                radius: 0.0,
                yaw: 0.0,
                flash: 0.0,
                behavior: 0,
                _pad: 0,
            };
            MAX_ENEMIES
        ];
        let mut enemy_count = 0;
        for enemy in state.live_enemies() {
            if enemy_count >= MAX_ENEMIES {
                break;
            }
            let mut flash: f32 = 0.0;
            for effect in &state.effects {
                if let EffectKind::HitFlash { enemy_id } = effect.kind {
                    if enemy_id == enemy.id {
                        flash = flash.max(1.0 - effect.progress());
                    }
                }
            }
            enemies_data[enemy_count] = EnemyData {
                pos: enemy.actor.position.to_array(),
                radius: enemy.actor.collision_radius,
                yaw: enemy.actor.yaw,
                flash,
                behavior: match enemy.behavior {
                    BehaviorState::Idle => 0,
                    BehaviorState::Chase => 1,
                    BehaviorState::Attack => 2,
                },
                _pad: 0,
            };
            enemy_count += 1;
        }

        // Swing cooldown exceeds the sweep's lifetime, so at most one is live
        let mut sweep: f32 = -1.0;
        let mut sweep_yaw: f32 = 0.0;
        let mut hurt_flash: f32 = 0.0;
        for effect in &state.effects {
            match effect.kind {
                EffectKind::SwordSweep { yaw } => {
                    sweep = effect.progress();
                    sweep_yaw = yaw;
                }
                EffectKind::HurtFlash => {
                    hurt_flash = hurt_flash.max(1.0 - effect.progress());
                }
                EffectKind::HitFlash { .. } => {}
            }
        }

        // Update globals
        let globals = Globals {
            resolution: [self.size.0 as f32, self.size.1 as f32],
            time: elapsed,
            wall_count: state.field.walls().len().min(MAX_WALLS) as u32,
            camera_pos: state.camera.position.to_array(),
            enemy_count: enemy_count as u32,
            camera_target: state.camera.look_at.to_array(),
            hurt_flash,
            tile_size: state.tuning.tile_size,
            ground_height: GROUND_HEIGHT,
            game_over: if state.phase == SimPhase::GameOver { 1 } else { 0 },
            _pad: 0,
        };
        self.queue
            .write_buffer(&self.globals_buffer, 0, bytemuck::bytes_of(&globals));

        // Update player
        let player = PlayerUniform {
            pos: state.player.actor.position.to_array(),
            yaw: state.player.actor.yaw,
            radius: state.player.actor.collision_radius,
            sweep,
            sweep_yaw,
            health_frac: state.player.actor.health.max(0) as f32
                / state.tuning.player_health.max(1) as f32,
        };
        self.queue
            .write_buffer(&self.player_buffer, 0, bytemuck::bytes_of(&player));

        // Update walls
        let mut walls_data = vec![
            WallData {
                center: [0.0; 2],
                half_size: 0.0,
                _pad: 0.0,
            };
            MAX_WALLS
        ];
        for (i, wall) in state.field.walls().iter().take(MAX_WALLS).enumerate() {
            walls_data[i] = WallData {
                center: wall.center.to_array(),
                half_size: wall.half_size,
                _pad: 0.0,
            };
        }
        self.queue
            .write_buffer(&self.walls_buffer, 0, bytemuck::cast_slice(&walls_data));

        self.queue
            .write_buffer(&self.enemies_buffer, 0, bytemuck::cast_slice(&enemies_data));

        // Render
        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("dungeon_encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("dungeon_render_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            render_pass.set_pipeline(&self.pipeline);
            render_pass.set_bind_group(0, &self.bind_group, &[]);
            render_pass.draw(0..3, 0..1); // Fullscreen triangle
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}
