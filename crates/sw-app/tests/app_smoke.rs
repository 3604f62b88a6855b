use sw_app::{
    AppError, RunOptions, RunProgressEvent, RunRequest, RunStage, area_series, coi_table,
    get_run_summary, list_areas, load_scenario, run_scenario, run_scenario_with_progress,
    save_scenario,
};
use sw_project::{DisturbanceDef, Scenario, SolverMethodDef, japan_ten_area};
use sw_sim::CoiMethod;

fn short_scenario() -> Scenario {
    let mut s = japan_ten_area();
    s.selection = vec![4, 5];
    s.time.end_s = 1.0;
    s.time.points = 11;
    s
}

fn temp_path(name: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!("sw_app_{}_{}", std::process::id(), name))
}

#[test]
fn runs_two_area_selection() {
    let scenario = short_scenario();
    let response = run_scenario(&RunRequest {
        scenario: &scenario,
        options: RunOptions::default(),
    })
    .unwrap();

    assert_eq!(response.area_names, vec!["Chubu", "Kansai"]);
    assert_eq!(response.trajectory.len(), 11);
    assert_eq!(response.trajectory.y.ncols(), 80);
    assert_eq!(response.coi.samples(), 11);
    assert_eq!(response.coi.area_count(), 2);
    assert!(response.mismatches.is_empty());
    assert!(response.timing.accepted_steps > 0);
    assert!(response.coi.frequency.iter().all(|v| v.is_finite()));

    let summary = get_run_summary(&response).unwrap();
    assert_eq!(summary.time_range, (0.0, 1.0));
    assert_eq!(summary.generator_count, 40);
    assert_eq!(summary.peak_frequency.len(), 2);
}

#[test]
fn equilibrium_start_stays_put() {
    let mut scenario = short_scenario();
    for area in &mut scenario.areas {
        area.p_m = 0.0;
    }
    scenario.initial.jitter_rad = 0.0;
    scenario.solver.method = SolverMethodDef::Rk4;
    scenario.solver.dt_s = 0.01;

    let response = run_scenario(&RunRequest {
        scenario: &scenario,
        options: RunOptions::default(),
    })
    .unwrap();
    assert!(response.trajectory.y.iter().all(|v| v.abs() < 1e-12));
    assert!(response.coi.peak_frequency().iter().all(|v| *v < 1e-12));
}

#[test]
fn disturbance_excites_its_area() {
    let mut scenario = short_scenario();
    scenario.initial.jitter_rad = 0.0;
    scenario.disturbances.push(DisturbanceDef {
        area: 0,
        generator: 1,
        angle_rad: 2.0,
    });
    let response = run_scenario(&RunRequest {
        scenario: &scenario,
        options: RunOptions {
            coi_method: CoiMethod::Circular,
        },
    })
    .unwrap();

    let first = response.trajectory.state(0);
    assert_eq!(first[0], 2.0);
    let peaks = response.coi.peak_frequency();
    assert!(peaks[0] > 1e-6);
}

#[test]
fn progress_events_are_ordered() {
    let scenario = short_scenario();
    let mut stages = Vec::new();
    let mut samples = 0;
    let mut cb = |event: RunProgressEvent| {
        if event.transient.is_some() {
            samples += 1;
        }
        if stages.last() != Some(&event.stage) {
            stages.push(event.stage);
        }
    };
    run_scenario_with_progress(
        &RunRequest {
            scenario: &scenario,
            options: RunOptions::default(),
        },
        Some(&mut cb),
    )
    .unwrap();

    assert_eq!(
        stages,
        vec![
            RunStage::CompilingRuntime,
            RunStage::Integrating,
            RunStage::Aggregating,
            RunStage::Completed,
        ]
    );
    assert!(samples >= 10);
}

#[test]
fn coi_table_decimates_and_keeps_last_row() {
    let scenario = short_scenario();
    let response = run_scenario(&RunRequest {
        scenario: &scenario,
        options: RunOptions::default(),
    })
    .unwrap();

    let rows = coi_table(&response, 4).unwrap();
    let times: Vec<f64> = rows.iter().map(|r| r.t).collect();
    assert_eq!(times.len(), 4);
    assert_eq!(times[0], 0.0);
    assert_eq!(*times.last().unwrap(), 1.0);
    assert_eq!(rows[0].angle.len(), 2);

    assert!(matches!(
        coi_table(&response, 0),
        Err(AppError::InvalidInput(_))
    ));

    let series = area_series(&response, "Kansai", "frequency").unwrap();
    assert_eq!(series.len(), 11);
    assert!(area_series(&response, "Okinawa", "angle").is_err());
    assert!(area_series(&response, "Kansai", "power").is_err());
}

#[test]
fn configuration_errors_surface_before_integration() {
    let mut scenario = short_scenario();
    scenario.disturbances.push(DisturbanceDef {
        area: 5,
        generator: 1,
        angle_rad: 1.0,
    });
    let err = run_scenario(&RunRequest {
        scenario: &scenario,
        options: RunOptions::default(),
    })
    .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
}

#[test]
fn scenario_file_roundtrip() {
    let scenario = short_scenario();
    for name in ["scenario.yaml", "scenario.json"] {
        let path = temp_path(name);
        save_scenario(&path, &scenario).unwrap();
        let loaded = load_scenario(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(loaded, scenario);
    }

    let missing = temp_path("missing.yaml");
    assert!(matches!(
        load_scenario(&missing),
        Err(AppError::ProjectFileRead { .. })
    ));
}

#[test]
fn area_listing_includes_neighbours() {
    let areas = list_areas(&japan_ten_area()).unwrap();
    assert_eq!(areas.len(), 10);
    assert_eq!(areas[0].name, "Hokkaido");
    assert_eq!(areas[0].neighbors, vec![1]);
    // Tokyo gains Hokuriku through symmetrization
    assert_eq!(areas[2].neighbors, vec![1, 3, 4]);
    assert!(areas[9].neighbors.is_empty());
}
