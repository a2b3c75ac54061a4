use std::fs;
use upcount::{Simulation, TestbenchConfig, find_scenario, pins};

#[test]
fn test_vcd_generation() {
    let dir = tempfile::tempdir().unwrap();
    let vcd_path = dir.path().join("counter.vcd");

    let mut sim = Simulation::builder().vcd(&vcd_path).build().unwrap();
    sim.add_clock(10, 0).unwrap();
    sim.modify(|p| p.ui_in = 1 << pins::OE).unwrap();
    sim.run_until(10).unwrap();
    sim.finish().unwrap();

    let content = fs::read_to_string(&vcd_path).unwrap();
    assert!(content.contains("$timescale 1ns $end"));
    assert!(content.contains("$scope module top $end"));
    assert!(content.contains("$var wire 1 ! clk $end"));
    assert!(content.contains("$var wire 8 & uo_out $end"));
    assert!(content.contains("$var wire 8 ' uio_oe $end"));
    // Undefined before the first reset edge
    assert!(content.contains("bxxxxxxxx &"));
    assert!(content.contains("b00000000 &"));
    assert!(content.contains("b11111111 '"));
    assert!(content.contains("#0"));
    assert!(content.contains("#5"));
    assert!(content.contains("#10"));
}

#[test]
fn test_vcd_only_records_changes() {
    let dir = tempfile::tempdir().unwrap();
    let vcd_path = dir.path().join("idle.vcd");

    let mut sim = Simulation::builder().vcd(&vcd_path).build().unwrap();
    sim.wait(10).unwrap();
    sim.wait(10).unwrap();
    sim.finish().unwrap();

    let content = fs::read_to_string(&vcd_path).unwrap();
    assert!(content.contains("#0"));
    assert!(!content.contains("#10"));
    assert!(!content.contains("#20"));
}

#[test]
fn test_scenario_trace() {
    let dir = tempfile::tempdir().unwrap();
    let vcd_path = dir.path().join("counter_basic.vcd");

    let report = find_scenario("counter_basic")
        .unwrap()
        .run(&TestbenchConfig::default(), Some(vcd_path.as_path()))
        .unwrap();
    assert!(report.passed);

    let content = fs::read_to_string(&vcd_path).unwrap();
    assert!(content.contains("b11110000 &")); // loaded
    assert!(content.contains("b11110011 &")); // after three increments
    assert!(content.contains("#102")); // OE re-enabled
}

#[test]
fn test_vcd_buffered_until_finish() {
    let dir = tempfile::tempdir().unwrap();
    let vcd_path = dir.path().join("buffered.vcd");

    let mut sim = Simulation::builder().vcd(&vcd_path).build().unwrap();
    sim.add_clock(10, 0).unwrap();
    sim.run_until(30).unwrap();
    assert!(!fs::read_to_string(&vcd_path).unwrap().contains("#30"));

    sim.finish().unwrap();
    assert!(fs::read_to_string(&vcd_path).unwrap().contains("#30"));

    // Dropping flushes whatever was written after finish
    sim.run_until(40).unwrap();
    drop(sim);
    assert!(fs::read_to_string(&vcd_path).unwrap().contains("#40"));
}
