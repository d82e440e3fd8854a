//! Tests for configuration and request documents

use os_simulator_core_rs::models::InputParameters;
use os_simulator_core_rs::paging::PagingAlgorithm;
use os_simulator_core_rs::scheduling::{
    MlfqConfig, MlfqScheduler, Preemption, PriorityScheduler, RoundRobinScheduler, SchedulerConfig,
    SjfScheduler,
};
use os_simulator_core_rs::{Process, SimulationError, SimulationRequest};

#[test]
fn test_scheduler_config_json_round_trip() {
    let configs = vec![
        SchedulerConfig::Fcfs,
        SchedulerConfig::Sjf {
            preemption: Preemption::Preemptive,
        },
        SchedulerConfig::RoundRobin { time_quantum: 4 },
        SchedulerConfig::Priority {
            preemption: Preemption::NonPreemptive,
        },
        SchedulerConfig::Mlfq(MlfqConfig {
            num_queues: 2,
            time_quantums: vec![3, 6],
            aging_threshold: 7,
        }),
        SchedulerConfig::Edf,
    ];
    for config in configs {
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(SchedulerConfig::from_json(&json).unwrap(), config);
    }
}

#[test]
fn test_mlfq_config_is_flat() {
    let config = SchedulerConfig::from_json(
        r#"{"type": "Mlfq", "num_queues": 2, "time_quantums": [1, 5], "aging_threshold": 4}"#,
    )
    .unwrap();
    let scheduler = config.build().unwrap();
    assert_eq!(scheduler.name(), "MLFQ (2 levels)");
}

#[test]
fn test_invalid_mlfq_config_rejected_at_build() {
    let config = SchedulerConfig::from_json(r#"{"type": "Mlfq", "aging_threshold": 0}"#).unwrap();
    assert!(matches!(
        config.build().err(),
        Some(SimulationError::InvalidConfig(_))
    ));
}

#[test]
fn test_paging_algorithm_names() {
    assert_eq!("FIFO".parse::<PagingAlgorithm>().unwrap(), PagingAlgorithm::Fifo);
    assert_eq!(" opt ".parse::<PagingAlgorithm>().unwrap(), PagingAlgorithm::Optimal);
    assert!(matches!(
        "random".parse::<PagingAlgorithm>(),
        Err(SimulationError::InvalidConfig(_))
    ));
    assert_eq!(PagingAlgorithm::Clock.to_string(), "Clock");
}

#[test]
fn test_request_round_trip() {
    let request = SimulationRequest::Scheduling {
        scheduler: SchedulerConfig::RoundRobin { time_quantum: 3 },
        processes: vec![
            Process::new(1, 0, 4).unwrap().with_priority(2),
            Process::new(2, 1, 2).unwrap(),
        ],
    };
    let json = request.to_json().unwrap();
    assert_eq!(SimulationRequest::from_json(&json).unwrap(), request);

    let paging = SimulationRequest::Paging {
        algorithm: PagingAlgorithm::Optimal,
        page_sequence: vec![1, 2, 3, 1],
        frame_count: 2,
    };
    let json = paging.to_json().unwrap();
    assert_eq!(SimulationRequest::from_json(&json).unwrap(), paging);
}

#[test]
fn test_request_runs_like_direct_call() {
    let processes = vec![
        Process::new(1, 0, 4).unwrap(),
        Process::new(2, 1, 2).unwrap(),
    ];
    let request = SimulationRequest::Scheduling {
        scheduler: SchedulerConfig::Fcfs,
        processes: processes.clone(),
    };
    assert_eq!(
        request.run().unwrap(),
        SchedulerConfig::Fcfs.execute(&processes).unwrap()
    );
}

#[test]
fn test_malformed_request_is_serialization_error() {
    let err =
        SimulationRequest::from_json(r#"{"kind": "paging", "algorithm": "Lru"}"#).unwrap_err();
    assert!(matches!(err, SimulationError::Serialization(_)));
}

#[test]
fn test_result_records_inputs() {
    let processes = vec![Process::new(1, 0, 3).unwrap()];
    let config = SchedulerConfig::Priority {
        preemption: Preemption::Preemptive,
    };
    let result = config.execute(&processes).unwrap();

    match result.input_parameters() {
        InputParameters::Scheduling {
            process_count,
            scheduler,
            processes: recorded,
        } => {
            assert_eq!(*process_count, 1);
            assert_eq!(scheduler, &config);
            assert_eq!(recorded, &processes);
        }
        other => panic!("unexpected input parameters: {:?}", other),
    }

    let summary = result.summary();
    assert_eq!(summary.algorithm, "Priority (Preemptive)");
    assert_eq!(summary.total_steps, result.execution_steps().len());
}

#[test]
fn test_paging_result_records_inputs() {
    let result = PagingAlgorithm::Fifo.execute(&[4, 4, 2], 1).unwrap();
    assert_eq!(
        result.input_parameters(),
        &InputParameters::Paging {
            page_sequence: vec![4, 4, 2],
            frame_count: 1
        }
    );
}

#[test]
fn test_scheduler_parameters_exposed() {
    assert_eq!(SjfScheduler::preemptive().preemption(), Preemption::Preemptive);
    assert!(SjfScheduler::preemptive().preemption().is_preemptive());
    assert!(!PriorityScheduler::default().preemption().is_preemptive());
    assert_eq!(RoundRobinScheduler::new(5).unwrap().time_quantum(), 5);

    let mlfq = MlfqScheduler::new(MlfqConfig {
        num_queues: 2,
        time_quantums: vec![3],
        aging_threshold: 6,
    })
    .unwrap();
    assert_eq!(mlfq.aging_threshold(), 6);
    assert_eq!(mlfq.quantums(), &[3, 6]);
}
