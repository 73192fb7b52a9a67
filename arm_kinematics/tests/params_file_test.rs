use std::io::Write;

use arm_kinematics::{ArmKinematics, KinematicParameters, KinematicsError};

fn write_temp(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
    file.write_all(contents.as_bytes()).expect("Failed to write temp file");
    file
}

#[test]
fn load_preset_from_file() {
    let params = KinematicParameters::airbot_play();
    let file = write_temp(&params.to_json_pretty().unwrap());

    let loaded = KinematicParameters::from_json_file(file.path()).unwrap();
    assert_eq!(loaded, params);

    let kin = ArmKinematics::new(loaded).unwrap();
    let q = [0.3, -0.8, 1.2, 0.5, 0.7, -0.4];
    let best = kin.solve_nearest(&kin.forward_kinematics(&q), &q).unwrap();
    assert!((best[3] - q[3]).abs() < 1e-9);
}

#[test]
fn missing_file_is_config_error() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let err = KinematicParameters::from_json_file(dir.path().join("missing.json")).unwrap_err();
    assert!(matches!(err, KinematicsError::Config(_)), "{err}");
    assert!(err.to_string().contains("missing.json"));
}

#[test]
fn malformed_json_is_config_error() {
    let file = write_temp("{ \"a1\": 0.1, ");
    let err = KinematicParameters::from_json_file(file.path()).unwrap_err();
    assert!(matches!(err, KinematicsError::Config(_)), "{err}");
}

#[test]
fn invalid_limits_in_file_are_rejected() {
    let mut value = serde_json::to_value(KinematicParameters::airbot_play()).unwrap();
    value["joint_limits"][1] = serde_json::json!({ "min": 0.5, "max": 0.5 });
    let file = write_temp(&value.to_string());

    let err = KinematicParameters::from_json_file(file.path()).unwrap_err();
    assert!(matches!(err, KinematicsError::InvalidParameters(_)), "{err}");
    assert!(err.to_string().contains("joint 2"));
}

#[test]
fn custom_arm_from_file() {
    let json = r#"{
        "name": "bench arm",
        "a1": 0.1,
        "a3": 0.3,
        "a4": 0.25,
        "a6": 0.1,
        "bias": [0.0, 0.0, 0.0, 0.0, 0.0, 0.0],
        "joint_limits": [
            { "min": -3.0, "max": 3.0 },
            { "min": -3.0, "max": 3.0 },
            { "min": -3.0, "max": 3.0 },
            { "min": -3.0, "max": 3.0 },
            { "min": -3.0, "max": 3.0 },
            { "min": -3.0, "max": 3.0 }
        ],
        "frame_rotation": [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]]
    }"#;
    let file = write_temp(json);
    let params = KinematicParameters::from_json_file(file.path()).unwrap();
    let kin = ArmKinematics::new(params).unwrap();
    assert_eq!(kin.params().name, "bench arm");

    let q = [0.4, 0.6, -1.1, 0.3, 0.9, -0.2];
    let target = kin.forward_kinematics(&q);
    let best = kin.solve_nearest(&target, &q).unwrap();
    for (a, b) in best.iter().zip(q.iter()) {
        assert!((a - b).abs() < 1e-9, "{best:?} vs {q:?}");
    }
}
