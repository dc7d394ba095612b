use std::fs;
use std::path::Path;

use algo_report::config::{
    ReportPaths, FLOW_MATCHING_PNG, FLOW_P1_CSV, FLOW_P2_CSV, FLOW_P5_CSV, FLOW_RUNTIME_PNG,
    SETCOVER_CSV, SETCOVER_RUNTIME_PNG, SETCOVER_STOPS_PNG, SETCOVER_VISUALIZATION_PNG,
    VISUALIZATION_CSV,
};
use algo_report::data::loader::{load_visualization, LoadError};
use algo_report::report::flow::{self, FlowReport};
use algo_report::report::setcover::{self, SetCoverReport, VISUALIZATION_SKIPPED};

fn write_input(paths: &ReportPaths, name: &str, contents: &str) {
    fs::create_dir_all(&paths.data_dir).unwrap();
    fs::write(paths.input(name), contents).unwrap();
}

/// Three sizes, three trials each, runtimes chosen so the means are 2, 20 and 80.
fn write_setcover_csv(paths: &ReportPaths) {
    write_input(
        paths,
        SETCOVER_CSV,
        "size,runtime_ms,num_stops\n\
         100,78,14\n10,1,4\n50,20,10\n\
         10,2,5\n100,80,15\n50,18,11\n\
         50,22,12\n10,3,6\n100,82,16\n",
    );
}

fn write_flow_csvs(paths: &ReportPaths) {
    let mut p1 = String::from("size,runtime_ms,flow_value\n");
    let mut p2 = p1.clone();
    let mut p5 = p1.clone();
    for n in [10u32, 20, 40, 80] {
        let nf = n as f64;
        for trial in 0..2 {
            let jitter = trial as f64 * 0.1;
            p1.push_str(&format!("{n},{},{}\n", 0.01 * nf * nf + jitter, nf * 0.6));
            p2.push_str(&format!("{n},{},{}\n", 0.02 * nf * nf + jitter, nf * 0.9));
            p5.push_str(&format!("{n},{},{}\n", 0.001 * nf * nf * nf + jitter, nf));
        }
    }
    write_input(paths, FLOW_P1_CSV, &p1);
    write_input(paths, FLOW_P2_CSV, &p2);
    write_input(paths, FLOW_P5_CSV, &p5);
}

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}

#[test]
fn setcover_table_has_one_ascending_row_per_size() {
    let dir = tempfile::tempdir().unwrap();
    let paths = ReportPaths::under(dir.path());
    write_setcover_csv(&paths);

    let report = SetCoverReport::load(&paths).unwrap();

    let sizes: Vec<u32> = report.rows.iter().map(|r| r.size).collect();
    assert_eq!(sizes, vec![10, 50, 100]);

    let expected = [(2.0, 1.0, 5.0), (20.0, 2.0, 11.0), (80.0, 2.0, 15.0)];
    for (row, (runtime_mean, runtime_std, stops_mean)) in report.rows.iter().zip(expected) {
        assert_eq!(row.runtime.count, 3);
        assert_close(row.runtime.mean, runtime_mean);
        assert_close(row.runtime.std_dev.unwrap(), runtime_std);
        assert_close(row.stops.mean, stops_mean);
        assert_close(row.stops.std_dev.unwrap(), 1.0);
    }
}

#[test]
fn missing_visualization_is_skipped_not_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let paths = ReportPaths::under(dir.path());
    write_setcover_csv(&paths);

    let report = SetCoverReport::load(&paths).unwrap();
    assert!(report.fit.degree == 2 || report.fit.degree == 3);

    let mut out = Vec::new();
    assert!(setcover::render_visualization(&paths, &mut out)
        .unwrap()
        .is_none());
    assert!(String::from_utf8(out).unwrap().contains(VISUALIZATION_SKIPPED));
}

#[test]
fn visualization_file_is_parsed_when_present() {
    let dir = tempfile::tempdir().unwrap();
    let paths = ReportPaths::under(dir.path());
    write_setcover_csv(&paths);
    write_input(
        &paths,
        VISUALIZATION_CSV,
        "STUDENTS\n1,2\n3,4\nSELECTED_STOPS\n5,6\n",
    );

    let layout = load_visualization(&paths.input(VISUALIZATION_CSV))
        .unwrap()
        .unwrap();
    assert_eq!(layout.students, vec![(1.0, 2.0), (3.0, 4.0)]);
    assert_eq!(layout.selected_stops, vec![(5.0, 6.0)]);
    assert!(layout.unselected_stops.is_empty());
}

#[test]
fn malformed_visualization_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let paths = ReportPaths::under(dir.path());
    write_setcover_csv(&paths);
    write_input(&paths, VISUALIZATION_CSV, "STUDENTS\n1;2,x\n");

    // The required table still loads; only the visualization step fails.
    assert!(SetCoverReport::load(&paths).is_ok());
    assert!(load_visualization(&paths.input(VISUALIZATION_CSV)).is_err());
}

#[test]
fn missing_required_input_aborts_with_context() {
    let dir = tempfile::tempdir().unwrap();
    let paths = ReportPaths::under(dir.path());

    let err = SetCoverReport::load(&paths).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<LoadError>(),
        Some(LoadError::NotFound { .. })
    ));

    write_input(&paths, FLOW_P1_CSV, "size,runtime_ms,flow_value\n10,1,5\n");
    let err = FlowReport::load(&paths).unwrap_err();
    assert!(format!("{err:#}").contains("flow_p2.csv"));
}

#[test]
fn flow_report_aggregates_every_variant() {
    let dir = tempfile::tempdir().unwrap();
    let paths = ReportPaths::under(dir.path());
    write_flow_csvs(&paths);

    let report = FlowReport::load(&paths).unwrap();
    assert_eq!(report.series.len(), 3);
    assert_eq!(report.densest().edge_probability, 0.5);

    let expected_pct = [60.0, 90.0, 100.0];
    for (series, pct) in report.series.iter().zip(expected_pct) {
        let sizes: Vec<u32> = series.runtime.iter().map(|p| p.size).collect();
        assert_eq!(sizes, vec![10, 20, 40, 80]);
        for (_, value) in series.matching_percentage() {
            assert!(value >= 0.0);
            assert_close(value, pct);
        }
    }

    // p=0.5 runtimes are 0.001·n³ + 0.05, so a cubic or higher wins.
    assert!(report.fit.degree >= 3);
    assert!(report.to_string().contains(&report.fit.complexity_label()));
}

#[test]
fn flow_fit_is_repeatable() {
    let dir = tempfile::tempdir().unwrap();
    let paths = ReportPaths::under(dir.path());
    write_flow_csvs(&paths);

    let first = FlowReport::load(&paths).unwrap();
    let second = FlowReport::load(&paths).unwrap();
    assert_eq!(first.fit, second.fit);
}

fn assert_png(path: &Path) {
    let bytes = fs::read(path).unwrap();
    assert!(bytes.starts_with(b"\x89PNG"), "{} is not a PNG", path.display());
}

#[test]
fn flow_pipeline_writes_figures() {
    let dir = tempfile::tempdir().unwrap();
    let paths = ReportPaths::under(dir.path());
    write_flow_csvs(&paths);

    let mut out = Vec::new();
    flow::run(&paths, &mut out).unwrap();

    assert_png(&paths.figure(FLOW_RUNTIME_PNG));
    assert_png(&paths.figure(FLOW_MATCHING_PNG));
    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("Saved flow_runtime.png with polynomial fit"));
    assert!(text.contains("Polynomial Analysis:"));
}

#[test]
fn setcover_pipeline_without_visualization_prints_notice() {
    let dir = tempfile::tempdir().unwrap();
    let paths = ReportPaths::under(dir.path());
    write_setcover_csv(&paths);

    let mut out = Vec::new();
    setcover::run(&paths, &mut out).unwrap();

    assert_png(&paths.figure(SETCOVER_RUNTIME_PNG));
    assert_png(&paths.figure(SETCOVER_STOPS_PNG));
    assert!(!paths.figure(SETCOVER_VISUALIZATION_PNG).exists());
    let text = String::from_utf8(out).unwrap();
    assert!(text.contains(VISUALIZATION_SKIPPED));
    assert!(text.contains("Observed approximation ratio:"));
}

#[test]
fn setcover_pipeline_renders_visualization() {
    let dir = tempfile::tempdir().unwrap();
    let paths = ReportPaths::under(dir.path());
    write_setcover_csv(&paths);
    write_input(
        &paths,
        VISUALIZATION_CSV,
        "STUDENTS\n10,20\n300,400\nSELECTED_STOPS\n150,200\nUNSELECTED_STOPS\n600,50\n",
    );

    let mut out = Vec::new();
    setcover::run(&paths, &mut out).unwrap();

    assert_png(&paths.figure(SETCOVER_VISUALIZATION_PNG));
    assert!(String::from_utf8(out)
        .unwrap()
        .contains("Saved setcover_visualization.png"));
}

#[test]
fn malformed_visualization_keeps_earlier_figures() {
    let dir = tempfile::tempdir().unwrap();
    let paths = ReportPaths::under(dir.path());
    write_setcover_csv(&paths);
    write_input(&paths, VISUALIZATION_CSV, "STUDENTS\n1,2\n3,abc\n");

    let mut out = Vec::new();
    let err = setcover::run(&paths, &mut out).unwrap_err();
    assert!(format!("{err:#}").contains("visualization.csv"));

    assert_png(&paths.figure(SETCOVER_RUNTIME_PNG));
    assert_png(&paths.figure(SETCOVER_STOPS_PNG));
    assert!(!paths.figure(SETCOVER_VISUALIZATION_PNG).exists());
    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("Saved setcover_stops.png"));
    assert!(!text.contains(VISUALIZATION_SKIPPED));
}
