use armview_common::{DrawCommand, JointAngles, OrbitCamera, ViewerConfig};
use armview_kinematics::{ArmLink, ArmRig};
use armview_render::mesh::GRAY_SHADES;
use armview_render::{DebugTextRenderer, FrameLoop, build_scene, projection_matrix};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "armview-cli", about = "Headless tool for the robot-arm viewer")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// YAML viewer config (defaults are used when omitted)
    #[arg(long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and scene summary
    Info,
    /// Print the arm's draw commands for a joint-angle vector
    Pose {
        #[command(flatten)]
        angles: AngleArgs,
        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Run one frame through the recording renderer
    Frame {
        #[command(flatten)]
        angles: AngleArgs,
        /// Camera yaw in degrees
        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        yaw: f32,
        /// Camera pitch in degrees
        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        pitch: f32,
        /// Camera distance from the target
        #[arg(long)]
        radius: Option<f32>,
    },
    /// Summarize the packed mesh
    Mesh,
}

/// Joint angles in degrees. Unset joints use the configured slider defaults.
#[derive(Args)]
struct AngleArgs {
    #[arg(long, allow_hyphen_values = true)]
    base: Option<f32>,
    #[arg(long, allow_hyphen_values = true)]
    upper: Option<f32>,
    #[arg(long, allow_hyphen_values = true)]
    lower: Option<f32>,
    #[arg(long, allow_hyphen_values = true)]
    gripper: Option<f32>,
}

impl AngleArgs {
    fn resolve(&self, defaults: JointAngles) -> JointAngles {
        JointAngles::new(
            self.base.unwrap_or(defaults.base),
            self.upper.unwrap_or(defaults.upper_arm),
            self.lower.unwrap_or(defaults.lower_arm),
            self.gripper.unwrap_or(defaults.gripper),
        )
    }
}

#[derive(Serialize)]
struct LinkReport<'a> {
    link: &'a str,
    #[serde(flatten)]
    command: DrawCommand,
}

/// Run one frame through the recording renderer and describe it: camera,
/// world-space box origins, then the recorded view-space draws.
fn frame_report(config: &ViewerConfig, angles: &JointAngles, camera: &OrbitCamera) -> String {
    let (scene, _) = build_scene(config.show_prop);
    let aspect = config.window.width as f32 / config.window.height.max(1) as f32;
    let mut frames = FrameLoop::new(projection_matrix(&config.projection, aspect));
    let mut renderer = DebugTextRenderer::new();
    let stats = frames.run_frame(&mut renderer, &scene, angles, camera);
    tracing::debug!(
        "frame {} submitted {} draws, renderer saw {} frame(s)",
        stats.frame,
        stats.draws,
        renderer.frames()
    );

    let eye = camera.eye();
    let mut out = format!(
        "Camera: yaw={:.1} pitch={:.1} radius={:.1} eye=({:.2}, {:.2}, {:.2})\n",
        camera.yaw.to_degrees(),
        camera.pitch().to_degrees(),
        camera.radius(),
        eye.x,
        eye.y,
        eye.z
    );
    out.push_str("World origins:\n");
    for (i, cmd) in frames.last_commands().iter().enumerate() {
        let origin = cmd.model.w_axis;
        out.push_str(&format!(
            "  [{i}] ({:.2}, {:.2}, {:.2})\n",
            origin.x, origin.y, origin.z
        ));
    }
    out.push_str(&renderer.report());
    out
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    let config = ViewerConfig::load_or_default(cli.config.as_deref())?;
    let defaults = config.joints.initial_angles();

    match cli.command {
        Commands::Info => {
            let (scene, mesh) = build_scene(config.show_prop);
            println!("armview-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("links per arm: {}", ArmLink::ALL.len());
            println!("draws per frame: {}", scene.draw_count());
            println!("mesh vertices: {}", mesh.vertex_count());
            println!("projection: {:?}", config.projection);
        }
        Commands::Pose { angles, json } => {
            let angles = angles.resolve(defaults);
            let commands = ArmRig::default().evaluate(&angles);
            let reports: Vec<_> = ArmLink::ALL
                .iter()
                .zip(commands)
                .map(|(link, command)| LinkReport {
                    link: link.name(),
                    command,
                })
                .collect();

            if json {
                println!("{}", serde_json::to_string_pretty(&reports)?);
            } else {
                println!(
                    "Pose: base={} upper={} lower={} gripper={}",
                    angles.base, angles.upper_arm, angles.lower_arm, angles.gripper
                );
                for report in &reports {
                    let origin = report.command.model.w_axis;
                    let up = report.command.model.y_axis;
                    println!(
                        "  {:<12} origin=({:.3}, {:.3}, {:.3}) up=({:.3}, {:.3}, {:.3}) dims={:.2}x{:.2}x{:.2}",
                        report.link,
                        origin.x,
                        origin.y,
                        origin.z,
                        up.x,
                        up.y,
                        up.z,
                        report.command.dims.width,
                        report.command.dims.height,
                        report.command.dims.depth
                    );
                }
            }
        }
        Commands::Frame {
            angles,
            yaw,
            pitch,
            radius,
        } => {
            let angles = angles.resolve(defaults);
            let mut camera: OrbitCamera = config.camera.build();
            camera.yaw = yaw.to_radians();
            camera.set_pitch(pitch.to_radians());
            if let Some(r) = radius {
                camera.set_radius(r);
            }

            print!("{}", frame_report(&config, &angles, &camera));
        }
        Commands::Mesh => {
            let (scene, mut mesh) = build_scene(config.show_prop);
            let arm = scene.arm.range();
            println!("arm cube: vertices {}..{}", arm.offset, arm.end());
            for prop in &scene.props {
                println!("prop cube: vertices {}..{}", prop.range.offset, prop.range.end());
            }
            println!("total vertices: {}", mesh.vertex_count());
            let extra = mesh.push_cube(&GRAY_SHADES);
            println!(
                "appending another cube lands at {}..{} (append-only)",
                extra.offset,
                extra.end()
            );
        }
    }

    Ok(())
}
