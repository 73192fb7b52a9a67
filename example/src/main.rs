// Tick-driven task sequencer demo.
//
// Each waypoint tracks an object pose combined with a fixed hand offset. On
// every tick the target is re-derived, solved against the last commanded
// joints and the result becomes the new command. Any solver error aborts the
// current waypoint and holds the last command.

use std::f64::consts::FRAC_PI_2;
use std::path::PathBuf;
use std::time::Duration;

use arm_kinematics::{ArmKinematics, JointVector, KinematicParameters, Pose};
use clap::Parser;
use nalgebra::{Isometry3, Translation3, UnitQuaternion, Vector3};
use tracing::{debug, info, warn};

#[derive(Parser)]
#[command(about = "Drive a simulated arm through object-relative waypoints")]
struct Args {
    /// JSON kinematic parameter file (defaults to the AIRBOT Play preset)
    #[arg(long)]
    params: Option<PathBuf>,

    /// Ticks spent on each waypoint
    #[arg(long, default_value_t = 50)]
    ticks: u32,

    /// Tick period in milliseconds
    #[arg(long, default_value_t = 10)]
    tick_ms: u64,
}

struct Waypoint {
    name: &'static str,
    // Object pose at the first and last tick, interpolated in between
    object_start: Isometry3<f64>,
    object_end: Isometry3<f64>,
    hand_offset: Isometry3<f64>,
}

impl Waypoint {
    fn stationary(name: &'static str, object: Isometry3<f64>, hand_offset: Isometry3<f64>) -> Self {
        Self {
            name,
            object_start: object,
            object_end: object,
            hand_offset,
        }
    }

    /// Hand target at fraction `t` of the waypoint.
    fn target(&self, t: f64) -> Pose {
        let start = self.object_start.translation.vector;
        let end = self.object_end.translation.vector;
        let rotation = self.object_start.rotation.slerp(&self.object_end.rotation, t);
        let object = Isometry3::from_parts(Translation3::from(start.lerp(&end, t)), rotation);
        Pose::from(object * self.hand_offset)
    }
}

/// Grasp from above: tool axis pointing down, `height` above the object.
fn top_grasp(height: f64) -> Isometry3<f64> {
    Isometry3::from_parts(
        Translation3::new(0.0, 0.0, height),
        UnitQuaternion::from_axis_angle(&Vector3::y_axis(), FRAC_PI_2),
    )
}

fn object_at(x: f64, y: f64, z: f64) -> Isometry3<f64> {
    Isometry3::translation(x, y, z)
}

fn waypoints() -> Vec<Waypoint> {
    vec![
        Waypoint::stationary("approach", object_at(0.35, -0.1, 0.0), top_grasp(0.10)),
        Waypoint {
            name: "track",
            object_start: object_at(0.35, -0.1, 0.0),
            object_end: object_at(0.35, 0.1, 0.0),
            hand_offset: top_grasp(0.10),
        },
        Waypoint::stationary("grasp", object_at(0.30, 0.1, 0.0), top_grasp(0.05)),
        Waypoint::stationary("handover", object_at(0.9, 0.0, 0.2), top_grasp(0.05)),
        Waypoint::stationary("place", object_at(0.25, -0.2, 0.0), top_grasp(0.05)),
    ]
}

enum Outcome {
    Completed,
    Aborted,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let params = match &args.params {
        Some(path) => KinematicParameters::from_json_file(path)?,
        None => KinematicParameters::airbot_play(),
    };
    let kin = ArmKinematics::new(params)?;
    info!(arm = %kin.params().name, "kinematics ready");

    let mut command: JointVector = [0.0; 6];
    let mut interval = tokio::time::interval(Duration::from_millis(args.tick_ms.max(1)));
    let ticks = args.ticks.max(1);

    let mut completed = 0;
    let plan = waypoints();
    for waypoint in &plan {
        let outcome = run_waypoint(&kin, waypoint, ticks, &mut interval, &mut command).await;
        match outcome {
            Outcome::Completed => {
                completed += 1;
                info!(waypoint = waypoint.name, joints = ?command, "waypoint reached");
            }
            Outcome::Aborted => {
                warn!(
                    waypoint = waypoint.name,
                    joints = ?command,
                    "waypoint aborted, holding last command"
                );
            }
        }
    }

    let pose = kin.forward_kinematics(&command);
    info!(completed, total = plan.len(), "sequence finished at {pose}");
    Ok(())
}

async fn run_waypoint(
    kin: &ArmKinematics,
    waypoint: &Waypoint,
    ticks: u32,
    interval: &mut tokio::time::Interval,
    command: &mut JointVector,
) -> Outcome {
    for tick in 0..ticks {
        interval.tick().await;

        let t = if ticks > 1 { tick as f64 / (ticks - 1) as f64 } else { 1.0 };
        let target = waypoint.target(t);

        match kin.solve_nearest(&target, command) {
            Ok(joints) => {
                debug!(waypoint = waypoint.name, tick, ?joints, "command");
                *command = joints;
            }
            Err(e) => {
                warn!(waypoint = waypoint.name, tick, error = %e, "solve failed");
                return Outcome::Aborted;
            }
        }
    }
    Outcome::Completed
}
