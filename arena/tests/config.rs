use std::fs;

use arena::config::{Cli, DemoConfig};
use clap::Parser;

#[test]
fn defaults_match_the_demo_budget() {
    let config = DemoConfig::from_cli(&Cli::parse_from(["panda_demo"])).unwrap();
    assert_eq!(config.run.max_episodes, 4);
    assert_eq!(config.run.steps_per_episode, 500);
    assert_eq!(config.run.seed, 0);
    assert!(!config.viewer.headless);
}

#[test]
fn flags_override_defaults() {
    let cli = Cli::parse_from([
        "panda_demo",
        "--episodes",
        "2",
        "--steps",
        "50",
        "--seed",
        "9",
        "--headless",
        "--max-frames",
        "30",
        "--fps",
        "0",
    ]);
    let config = DemoConfig::from_cli(&cli).unwrap();
    assert_eq!(config.run.budget().max_episodes, 2);
    assert_eq!(config.run.budget().steps_per_episode, 50);
    assert_eq!(config.run.seed, 9);
    assert!(config.viewer.headless);
    assert_eq!(config.viewer.max_frames, Some(30));
    assert_eq!(config.viewer.fps, None);
}

#[test]
fn file_values_are_loaded_and_flags_win() {
    let path = std::env::temp_dir().join(format!("panda_demo_config_{}.json", std::process::id()));
    fs::write(
        &path,
        r#"{
            "run": { "max_episodes": 7, "seed": 42 },
            "env": { "max_episode_steps": 120 },
            "viewer": { "headless": true, "title": "from file" }
        }"#,
    )
    .unwrap();

    let cli = Cli::parse_from([
        "panda_demo",
        "--config",
        path.to_str().unwrap(),
        "--seed",
        "5",
    ]);
    let config = DemoConfig::from_cli(&cli).unwrap();
    fs::remove_file(&path).unwrap();

    assert_eq!(config.run.max_episodes, 7);
    assert_eq!(config.run.steps_per_episode, 500);
    assert_eq!(config.run.seed, 5);
    assert_eq!(config.env.max_episode_steps, 120);
    assert!(config.viewer.headless);
    assert_eq!(config.viewer.title, "from file");
}

#[test]
fn missing_or_malformed_files_are_reported() {
    let missing = std::env::temp_dir().join("panda_demo_config_does_not_exist.json");
    let err = DemoConfig::load(&missing).unwrap_err();
    assert!(err.to_string().contains("failed to read config"));

    let path = std::env::temp_dir().join(format!("panda_demo_bad_{}.json", std::process::id()));
    fs::write(&path, "{ not json").unwrap();
    let err = DemoConfig::load(&path).unwrap_err();
    fs::remove_file(&path).unwrap();
    assert!(err.to_string().contains("failed to parse config"));
}

#[test]
fn headless_demo_runs_to_completion() {
    let cli = Cli::parse_from([
        "panda_demo",
        "--episodes",
        "2",
        "--steps",
        "15",
        "--headless",
    ]);
    let config = DemoConfig::from_cli(&cli).unwrap();
    let summary = arena::app::run(&config).unwrap();
    assert_eq!(summary.episodes, 2);
    assert!(summary.steps <= 30);
    assert!(!summary.stopped_by_viewer);
}
