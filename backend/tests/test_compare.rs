//! Tests for policy duels and the hybrid run

use os_simulator_core_rs::compare::{duel_paging, duel_scheduling, run_hybrid, Verdict};
use os_simulator_core_rs::paging::PagingAlgorithm;
use os_simulator_core_rs::scheduling::{Preemption, SchedulerConfig};
use os_simulator_core_rs::{Process, SimulationError};

/// Four processes, each with its own page references
fn demo_workload() -> Vec<Process> {
    vec![
        Process::new(1, 0, 5)
            .unwrap()
            .with_memory_pages(vec![1, 2, 3, 4, 1, 2]),
        Process::new(2, 1, 3)
            .unwrap()
            .with_memory_pages(vec![2, 3, 4, 5, 2, 3]),
        Process::new(3, 2, 8)
            .unwrap()
            .with_memory_pages(vec![1, 3, 5, 1, 3, 5, 1, 3]),
        Process::new(4, 3, 6)
            .unwrap()
            .with_memory_pages(vec![4, 5, 6, 4, 5, 6]),
    ]
}

#[test]
fn test_srtf_beats_fcfs_on_waiting() {
    let report = duel_scheduling(
        &SchedulerConfig::Fcfs,
        &SchedulerConfig::Sjf {
            preemption: Preemption::Preemptive,
        },
        &demo_workload(),
        "average_waiting_time",
    )
    .unwrap();

    assert_eq!(report.verdict, Verdict::Right);
    assert_eq!(report.left.metric("average_waiting_time"), Some(5.75));
    assert_eq!(report.right.metric("average_waiting_time"), Some(5.0));
    assert_eq!(report.winner().unwrap().algorithm_name(), "SJF (Preemptive)");
}

#[test]
fn test_duel_on_empty_workload_is_tie() {
    let report = duel_scheduling(
        &SchedulerConfig::Fcfs,
        &SchedulerConfig::Edf,
        &[],
        "average_waiting_time",
    )
    .unwrap();
    assert_eq!(report.verdict, Verdict::Tie);
}

#[test]
fn test_duel_propagates_engine_errors() {
    // EDF needs deadlines
    let err = duel_scheduling(
        &SchedulerConfig::Fcfs,
        &SchedulerConfig::Edf,
        &demo_workload(),
        "average_waiting_time",
    )
    .unwrap_err();
    assert_eq!(err, SimulationError::MissingDeadline(1));
}

#[test]
fn test_hit_ratio_higher_is_better() {
    let sequence = [7, 0, 1, 2, 0, 3, 0, 4, 2, 3, 0, 3, 2, 1, 2, 0, 1, 7, 0, 1];
    let report = duel_paging(
        PagingAlgorithm::Optimal,
        PagingAlgorithm::Fifo,
        &sequence,
        3,
        "hit_ratio",
    )
    .unwrap();
    assert_eq!(report.verdict, Verdict::Left);
    assert_eq!(report.left.metric("page_faults"), Some(9.0));
    assert_eq!(report.right.metric("page_faults"), Some(15.0));
}

#[test]
fn test_hybrid_fcfs_fifo() {
    let report = run_hybrid(
        &SchedulerConfig::Fcfs,
        PagingAlgorithm::Fifo,
        &demo_workload(),
        3,
    )
    .unwrap();

    let faults: Vec<_> = report
        .page_faults
        .iter()
        .map(|(&pid, &n)| (pid, n))
        .collect();
    assert_eq!(faults, vec![(1, 6), (2, 6), (3, 3), (4, 3)]);
    assert_eq!(report.total_page_faults, 18);
    assert_eq!(report.cpu_efficiency, 94.25);
    assert_eq!(report.memory_efficiency, 10.0);
    assert_eq!(report.efficiency_score, 52.125);
    assert_eq!(report.schedule.algorithm_name(), "FCFS");
}

#[test]
fn test_hybrid_optimal_faults_fewer() {
    let report = run_hybrid(
        &SchedulerConfig::Fcfs,
        PagingAlgorithm::Optimal,
        &demo_workload(),
        3,
    )
    .unwrap();
    assert_eq!(report.total_page_faults, 14);
}

#[test]
fn test_hybrid_skips_processes_without_pages() {
    let mut processes = demo_workload();
    processes.push(Process::new(5, 4, 2).unwrap());

    let report = run_hybrid(&SchedulerConfig::Fcfs, PagingAlgorithm::Lru, &processes, 3).unwrap();
    assert!(!report.page_faults.contains_key(&5));
    assert_eq!(
        report
            .schedule
            .visualization_data()
            .process_stats()
            .len(),
        5
    );
}

#[test]
fn test_hybrid_zero_frames_rejected() {
    let err = run_hybrid(&SchedulerConfig::Fcfs, PagingAlgorithm::Lru, &demo_workload(), 0)
        .unwrap_err();
    assert!(matches!(err, SimulationError::InvalidConfig(_)));
}
