//! End-to-end pipeline tests against a mock qsub runner.

use std::time::Duration;

use pipe2q_sched::{QsubRunner, SubmissionOptions, SubmitDriver, SubmitError};

fn commands(lines: &[&str]) -> Vec<String> {
    lines.iter().map(|l| l.to_string()).collect()
}

#[tokio::test]
async fn test_three_commands_batch_of_two() {
    // `echo 1` .. `echo 3` with --procs 2 --batch 2 --wt 10:00 must yield
    // two jobs: [echo 1, echo 2] and [echo 3].
    let opts = SubmissionOptions {
        walltime: "10:00".to_string(),
        processors: 2,
        batch_size: 2,
        job_name: None,
        use_test_queue: false,
    };
    let driver = SubmitDriver::new(opts, QsubRunner::mock()).with_pause(Duration::ZERO);

    let results = driver
        .run(commands(&["echo 1", "echo 2", "echo 3"]))
        .await
        .unwrap();

    assert_eq!(results.len(), 2);
    assert!(results.iter().all(|r| r.accepted));

    let scripts = driver.runner().submitted_scripts();
    assert_eq!(scripts.len(), 2);
    for script in &scripts {
        assert!(script.starts_with("#!/bin/sh\n"));
        assert!(script.contains("#PBS -l nodes=1:ppn=2\n"));
        assert!(script.contains("#PBS -l walltime=00:00:10:00\n"));
    }
    assert!(scripts[0].ends_with("\necho 1\necho 2\n"));
    assert!(scripts[1].ends_with("\necho 3\n"));
}

#[tokio::test]
async fn test_batch_size_one_submits_one_job_per_line() {
    let opts = SubmissionOptions {
        walltime: "10:00".to_string(),
        ..Default::default()
    };
    let driver = SubmitDriver::new(opts, QsubRunner::mock()).with_pause(Duration::ZERO);

    let results = driver
        .run(commands(&["echo a", "echo b", "echo c"]))
        .await
        .unwrap();
    assert_eq!(results.len(), 3);
    assert_eq!(driver.runner().submitted_scripts().len(), 3);
}

#[tokio::test]
async fn test_name_and_testq_reach_the_script() {
    let opts = SubmissionOptions {
        walltime: "1:00:00".to_string(),
        processors: 4,
        batch_size: 8,
        job_name: Some("blast".to_string()),
        use_test_queue: true,
    };
    let driver = SubmitDriver::new(opts, QsubRunner::mock()).with_pause(Duration::ZERO);

    driver.run(commands(&["blastn -query a.fa"])).await.unwrap();

    let scripts = driver.runner().submitted_scripts();
    assert_eq!(scripts.len(), 1);
    assert!(scripts[0].contains("#PBS -N n-blast\n"));
    assert!(scripts[0].contains("#PBS -q testq\n"));
}

#[tokio::test]
async fn test_empty_input_is_a_no_op() {
    let opts = SubmissionOptions {
        walltime: "10:00".to_string(),
        ..Default::default()
    };
    let driver = SubmitDriver::new(opts, QsubRunner::mock()).with_pause(Duration::ZERO);

    let results = driver.run(Vec::new()).await.unwrap();
    assert!(results.is_empty());
    assert!(driver.runner().submitted_scripts().is_empty());
}

#[tokio::test]
async fn test_invalid_walltime_is_fatal_before_any_submission() {
    let opts = SubmissionOptions {
        walltime: "ten minutes".to_string(),
        ..Default::default()
    };
    let driver = SubmitDriver::new(opts, QsubRunner::mock()).with_pause(Duration::ZERO);

    let err = driver.run(commands(&["echo 1"])).await.unwrap_err();
    assert!(matches!(err, SubmitError::InvalidWalltime(_)));
    assert!(driver.runner().submitted_scripts().is_empty());
}

#[tokio::test]
async fn test_invalid_batch_size_is_fatal_before_any_submission() {
    let opts = SubmissionOptions {
        walltime: "10:00".to_string(),
        batch_size: 0,
        ..Default::default()
    };
    let driver = SubmitDriver::new(opts, QsubRunner::mock()).with_pause(Duration::ZERO);

    let err = driver.run(commands(&["echo 1"])).await.unwrap_err();
    assert!(matches!(err, SubmitError::InvalidBatchSize(0)));
    assert!(driver.runner().submitted_scripts().is_empty());
}

#[tokio::test]
async fn test_unclamped_walltime_flows_through() {
    let opts = SubmissionOptions {
        walltime: "25:70:90".to_string(),
        ..Default::default()
    };
    let driver = SubmitDriver::new(opts, QsubRunner::mock()).with_pause(Duration::ZERO);

    driver.run(commands(&["echo 1"])).await.unwrap();

    let scripts = driver.runner().submitted_scripts();
    assert!(scripts[0].contains("#PBS -l walltime=00:25:70:90\n"));
}

#[tokio::test]
async fn test_failed_invocation_does_not_halt_later_batches() {
    // A missing qsub binary fails every invocation; the driver must still
    // walk all batches and report each failure.
    let opts = SubmissionOptions {
        walltime: "10:00".to_string(),
        batch_size: 1,
        ..Default::default()
    };
    let runner = QsubRunner::with_binary("/nonexistent/pipe2q-fake-qsub");
    let driver = SubmitDriver::new(opts, runner).with_pause(Duration::ZERO);

    let results = driver.run(commands(&["echo 1", "echo 2"])).await.unwrap();
    assert_eq!(results.len(), 2);
    assert!(results.iter().all(|r| !r.accepted));
    assert!(results.iter().all(|r| r.diagnostic.is_some()));
}

#[tokio::test]
async fn test_rejected_batch_does_not_halt_later_batches() {
    // `false` stands in for a qsub that rejects every job.
    let opts = SubmissionOptions {
        walltime: "10:00".to_string(),
        batch_size: 1,
        ..Default::default()
    };
    let driver =
        SubmitDriver::new(opts, QsubRunner::with_binary("false")).with_pause(Duration::ZERO);

    let results = driver.run(commands(&["echo 1", "echo 2"])).await.unwrap();
    assert_eq!(results.len(), 2);
    assert!(results.iter().all(|r| !r.accepted));
}

#[tokio::test]
async fn test_script_file_released_after_each_submission() {
    let dir = tempfile::tempdir().unwrap();
    let opts = SubmissionOptions {
        walltime: "10:00".to_string(),
        batch_size: 2,
        ..Default::default()
    };
    let driver = SubmitDriver::new(opts, QsubRunner::mock())
        .with_pause(Duration::ZERO)
        .with_script_dir(dir.path());

    let results = driver
        .run(commands(&["echo 1", "echo 2", "echo 3"]))
        .await
        .unwrap();
    assert_eq!(results.len(), 2);

    // The runner saw both scripts, yet none survive the run.
    assert_eq!(driver.runner().submitted_scripts().len(), 2);
    let leftovers: Vec<_> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().path())
        .collect();
    assert!(leftovers.is_empty(), "leftover scripts: {leftovers:?}");
}

#[tokio::test]
async fn test_script_file_released_when_invocation_fails() {
    let dir = tempfile::tempdir().unwrap();
    let opts = SubmissionOptions {
        walltime: "10:00".to_string(),
        batch_size: 1,
        ..Default::default()
    };
    let runner = QsubRunner::with_binary("/nonexistent/pipe2q-fake-qsub");
    let driver = SubmitDriver::new(opts, runner)
        .with_pause(Duration::ZERO)
        .with_script_dir(dir.path());

    let results = driver.run(commands(&["echo 1", "echo 2"])).await.unwrap();
    assert!(results.iter().all(|r| !r.accepted));

    let leftovers: Vec<_> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().path())
        .collect();
    assert!(leftovers.is_empty(), "leftover scripts: {leftovers:?}");
}

#[tokio::test(start_paused = true)]
async fn test_pause_between_submissions_not_after_last() {
    // With the default 1 s pause and two batches, exactly one pause
    // elapses. Paused tokio time auto-advances through the sleep.
    let opts = SubmissionOptions {
        walltime: "10:00".to_string(),
        batch_size: 1,
        ..Default::default()
    };
    let driver = SubmitDriver::new(opts, QsubRunner::mock());

    let start = tokio::time::Instant::now();
    let results = driver.run(commands(&["echo 1", "echo 2"])).await.unwrap();
    let elapsed = start.elapsed();

    assert_eq!(results.len(), 2);
    assert!(elapsed >= Duration::from_secs(1));
    assert!(elapsed < Duration::from_secs(2));
}
