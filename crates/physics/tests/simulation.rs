use physics::{ArmModel, ArmSim, Obstacle, PhysicsError, SimParams, Vec3, NUM_JOINTS};

#[test]
fn new_sim_starts_at_home_at_rest() {
    let sim = ArmSim::new(ArmModel::panda());
    assert_eq!(sim.data.qpos, sim.model.home);
    assert_eq!(sim.data.qvel, [0.0; NUM_JOINTS]);
    assert_eq!(sim.data.time, 0.0);
    assert_eq!(sim.data.link_points.len(), sim.model.num_points());
    assert!(!sim.in_collision());
}

#[test]
fn step_advances_time_by_frame_dt() {
    let mut sim = ArmSim::new(ArmModel::panda());
    sim.step();
    sim.step();
    assert!((sim.data.time - 2.0 * sim.frame_dt()).abs() < 1e-6);
    assert!((sim.frame_dt() - 0.01).abs() < 1e-6);
}

#[test]
fn commands_are_clamped_to_velocity_limits() {
    let mut sim = ArmSim::new(ArmModel::panda());
    sim.set_ctrl(&[100.0, 0.0, 0.0, 0.0, 0.0, 0.0, -100.0]).unwrap();
    let start = sim.data.qpos;
    sim.step();

    let limits = sim.model.velocity_limits();
    assert!((sim.data.qvel[0] - limits[0]).abs() < 1e-6);
    assert!((sim.data.qvel[6] + limits[6]).abs() < 1e-6);
    let moved = sim.data.qpos[0] - start[0];
    assert!((moved - limits[0] * sim.frame_dt()).abs() < 1e-4);
}

#[test]
fn joint_limits_stop_motion() {
    let mut sim = ArmSim::new(ArmModel::panda());
    let mut ctrl = [0.0; NUM_JOINTS];
    ctrl[1] = 2.0;
    sim.set_ctrl(&ctrl).unwrap();
    for _ in 0..500 {
        sim.step();
    }
    let upper = sim.model.limits[1].upper;
    assert!((sim.data.qpos[1] - upper).abs() < 1e-6);
    assert_eq!(sim.data.qvel[1], 0.0);
}

#[test]
fn reset_clamps_and_rewinds() {
    let mut sim = ArmSim::new(ArmModel::panda());
    sim.set_ctrl(&[0.5; NUM_JOINTS]).unwrap();
    sim.step();
    sim.reset_to(&[10.0, 0.0, 0.0, -1.0, 0.0, 1.0, 0.0]).unwrap();
    assert_eq!(sim.data.time, 0.0);
    assert_eq!(sim.data.ctrl, [0.0; NUM_JOINTS]);
    assert!((sim.data.qpos[0] - sim.model.limits[0].upper).abs() < 1e-6);
}

#[test]
fn bad_commands_are_rejected() {
    let mut sim = ArmSim::new(ArmModel::panda());
    assert_eq!(
        sim.set_ctrl(&[0.0; 3]),
        Err(PhysicsError::DimensionMismatch { expected: NUM_JOINTS, got: 3 })
    );
    let mut ctrl = [0.0; NUM_JOINTS];
    ctrl[4] = f32::NAN;
    assert_eq!(sim.set_ctrl(&ctrl), Err(PhysicsError::NonFiniteCommand { index: 4 }));
    assert_eq!(sim.data.ctrl, [0.0; NUM_JOINTS]);
}

#[test]
fn invalid_params_are_rejected() {
    let sim = ArmSim::new(ArmModel::panda());
    let err = sim
        .with_params(SimParams { timestep: 0.0, frame_skip: 1 })
        .unwrap_err();
    assert_eq!(err, PhysicsError::InvalidTimestep(0.0));
}

#[test]
fn zero_frame_skip_is_rejected_on_its_own() {
    let err = ArmSim::new(ArmModel::panda())
        .with_params(SimParams { timestep: 0.002, frame_skip: 0 })
        .unwrap_err();
    assert_eq!(err, PhysicsError::InvalidFrameSkip);
    assert_eq!(err.to_string(), "frame skip must be at least 1");
}

#[test]
fn obstacle_on_the_tool_is_a_contact() {
    let sim = ArmSim::new(ArmModel::panda());
    let tcp = sim.end_effector();
    let sim = sim.with_obstacles(vec![
        Obstacle::new(Vec3::new(2.0, 2.0, 2.0), 0.1),
        Obstacle::new(tcp, 0.05),
    ]);
    let contacts = sim.contacts();
    assert!(!contacts.is_empty());
    assert!(contacts
        .iter()
        .all(|c| c.kind == physics::ContactKind::Obstacle(1)));
}

#[test]
fn folding_into_the_floor_is_a_contact() {
    let mut sim = ArmSim::new(ArmModel::panda());
    // shoulder pitched fully forward with the elbow bent drives the wrist down
    sim.reset_to(&[0.0, 1.7628, 0.0, -1.0, 0.0, 0.0, 0.0]).unwrap();
    assert!(sim
        .contacts()
        .iter()
        .any(|c| c.kind == physics::ContactKind::Floor));
}
