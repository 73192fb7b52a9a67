// FK -> IK consistency sweep over the joint space.
//
// Samples in-limit joint vectors on a low-discrepancy grid, solves the FK pose
// back and reports the worst errors as JSON.

use std::path::PathBuf;

use arm_kinematics::{ArmKinematics, JointVector, KinematicParameters, KinematicsError, JOINT_COUNT};
use clap::Parser;
use serde::Serialize;
use tracing::{info, warn};

#[derive(Parser)]
#[command(about = "Sweep FK/IK round trips and report the worst errors")]
struct Args {
    /// JSON kinematic parameter file (defaults to the AIRBOT Play preset)
    #[arg(long)]
    params: Option<PathBuf>,

    /// Number of joint vectors to test
    #[arg(long, default_value_t = 10_000)]
    samples: usize,

    /// Distance kept from every joint limit, in radians
    #[arg(long, default_value_t = 0.05)]
    margin: f64,
}

#[derive(Debug, Default, Serialize)]
struct Report {
    samples: usize,
    solved: usize,
    domain_errors: usize,
    unreachable_errors: usize,
    max_joint_error: f64,
    max_position_error: f64,
    max_rotation_error: f64,
    mean_solution_count: f64,
}

// Fractional parts of sqrt(prime), one per joint
const SEQUENCE_STEPS: [f64; JOINT_COUNT] = [
    0.414_213_562_373_095,
    0.732_050_807_568_877,
    0.236_067_977_499_790,
    0.645_751_311_064_591,
    0.316_624_790_355_400,
    0.605_551_275_463_989,
];

fn sample(params: &KinematicParameters, index: usize, margin: f64) -> JointVector {
    let mut q = [0.0; JOINT_COUNT];
    for (j, value) in q.iter_mut().enumerate() {
        let limit = params.joint_limits[j];
        let u = ((index as f64 + 0.5) * SEQUENCE_STEPS[j]).fract();
        let lo = limit.min + margin;
        let hi = limit.max - margin;
        *value = lo + u * (hi - lo);
    }
    q
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
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
    info!(arm = %kin.params().name, samples = args.samples, "starting sweep");

    let mut report = Report {
        samples: args.samples,
        ..Default::default()
    };
    let mut total_solutions = 0;

    for i in 0..args.samples {
        let q = sample(kin.params(), i, args.margin);
        let target = kin.forward_kinematics(&q);

        let solutions = match kin.solve(&target, Some(&q)) {
            Ok(solutions) => solutions,
            Err(e) => {
                match e {
                    KinematicsError::Domain { .. } => report.domain_errors += 1,
                    _ => report.unreachable_errors += 1,
                }
                warn!(sample = i, joints = ?q, error = %e, "round trip failed");
                continue;
            }
        };
        total_solutions += solutions.len();

        let best = kin.select(&solutions, &q)?;
        let reached = kin.forward_kinematics(&best);
        let joint_error = best
            .iter()
            .zip(q.iter())
            .map(|(a, b)| (a - b).abs())
            .fold(0.0, f64::max);

        report.solved += 1;
        report.max_joint_error = report.max_joint_error.max(joint_error);
        report.max_position_error = report.max_position_error.max(reached.position_error(&target));
        report.max_rotation_error = report.max_rotation_error.max(reached.rotation_error(&target));
    }

    if report.solved > 0 {
        report.mean_solution_count = total_solutions as f64 / report.solved as f64;
    }

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
