// tests/task_execution.rs

use std::error::Error;
use std::time::Duration;

use kitchenbot::Robot;
use kitchenbot::device::{Lifecycle, Readouts};
use kitchenbot::errors::KitchenError;
use kitchenbot::types::{Mode, Ramp};
use kitchenbot_test_utils::builders::{TaskBuilder, powered_robot, test_settings};
use kitchenbot_test_utils::recorder::EventRecorder;
use kitchenbot_test_utils::ticks::ScriptedTickSource;
use kitchenbot_test_utils::{init_tracing, with_timeout};

type TestResult = Result<(), Box<dyn Error>>;

fn readouts(speed: u32, temperature: u32) -> Readouts {
    Readouts { speed, temperature }
}

#[tokio::test]
async fn progress_is_monotonic_and_ends_at_exactly_100() -> TestResult {
    init_tracing();
    let ticks = ScriptedTickSource::half_second();
    let robot = powered_robot(Mode::Manual, ticks.as_source());
    let events = EventRecorder::attach(&robot);

    let task = TaskBuilder::new("Boil", 2).temperature(100).build();
    let completed = with_timeout(robot.execute_task(task)).await?;

    assert!(completed);
    assert_eq!(ticks.ticks(), 4);
    assert_eq!(events.progress(), vec![0, 25, 50, 75, 100]);
    assert_eq!(events.states(), vec![Lifecycle::Running, Lifecycle::On]);
    assert_eq!(
        events.readouts(),
        vec![
            readouts(0, 40),
            readouts(0, 60),
            readouts(0, 80),
            readouts(0, 20),
        ]
    );

    let state = robot.state();
    assert_eq!(state.lifecycle(), Lifecycle::On);
    assert!(state.active_task().is_none());
    assert_eq!(state.progress(), 0);
    assert_eq!(state.readouts(), readouts(0, 20));
    Ok(())
}

#[tokio::test]
async fn step_ramp_reaches_target_on_first_tick() -> TestResult {
    init_tracing();
    let ticks = ScriptedTickSource::half_second();
    let robot = powered_robot(Mode::Manual, ticks.as_source());
    let events = EventRecorder::attach(&robot);

    let task = TaskBuilder::new("Chop", 1).speed(8).ramp(Ramp::Step).build();
    assert!(with_timeout(robot.execute_task(task)).await?);

    assert_eq!(events.readouts(), vec![readouts(8, 20), readouts(0, 20)]);
    Ok(())
}

#[tokio::test]
async fn pause_and_resume_preserve_elapsed_time() -> TestResult {
    init_tracing();
    let ticks = ScriptedTickSource::half_second();
    let robot = powered_robot(Mode::Manual, ticks.as_source());
    let events = EventRecorder::attach(&robot);

    let r = robot.clone();
    ticks.at_tick(2, move || r.pause().unwrap());
    let r = robot.clone();
    ticks.at_tick(5, move || r.resume().unwrap());

    let task = TaskBuilder::new("Knead", 2).speed(2).build();
    let completed = with_timeout(robot.execute_task(task)).await?;

    assert!(completed);
    // 4 running ticks plus the 3 spent paused.
    assert_eq!(ticks.ticks(), 7);
    assert_eq!(events.progress(), vec![0, 25, 50, 75, 100]);
    assert_eq!(
        events.states(),
        vec![
            Lifecycle::Running,
            Lifecycle::Paused,
            Lifecycle::Running,
            Lifecycle::On,
        ]
    );
    Ok(())
}

#[tokio::test]
async fn pause_resets_readouts_to_baseline() -> TestResult {
    init_tracing();
    let ticks = ScriptedTickSource::half_second();
    let robot = powered_robot(Mode::Manual, ticks.as_source());

    let seen = std::sync::Arc::new(std::sync::Mutex::new(None));
    let r = robot.clone();
    ticks.at_tick(3, move || r.pause().unwrap());
    let (r, s) = (robot.clone(), seen.clone());
    ticks.at_tick(4, move || {
        *s.lock().unwrap() = Some(r.state());
        r.resume().unwrap();
    });

    let task = TaskBuilder::new("Saute", 2).speed(1).temperature(120).build();
    assert!(with_timeout(robot.execute_task(task)).await?);

    let paused = seen.lock().unwrap().take().expect("hook ran");
    assert_eq!(paused.lifecycle(), Lifecycle::Paused);
    assert_eq!(paused.readouts(), readouts(0, 20));
    assert_eq!(paused.progress(), 50);
    assert_eq!(paused.active_task().map(|t| t.name()), Some("Saute"));
    Ok(())
}

#[tokio::test]
async fn emergency_stop_aborts_within_one_tick() -> TestResult {
    init_tracing();
    let ticks = ScriptedTickSource::half_second();
    let robot = powered_robot(Mode::Manual, ticks.as_source());
    let events = EventRecorder::attach(&robot);

    let r = robot.clone();
    ticks.at_tick(3, move || r.emergency_stop());

    let task = TaskBuilder::new("Boil", 10).temperature(100).build();
    let completed = with_timeout(robot.execute_task(task)).await?;

    assert!(!completed);
    assert_eq!(ticks.ticks(), 3);
    assert_eq!(events.progress(), vec![0, 5, 10]);
    assert_eq!(events.states(), vec![Lifecycle::Running, Lifecycle::Off]);

    let state = robot.state();
    assert_eq!(state.lifecycle(), Lifecycle::Off);
    assert!(state.active_task().is_none());
    assert_eq!(state.progress(), 0);
    assert_eq!(state.readouts(), readouts(0, 20));
    Ok(())
}

#[tokio::test]
async fn emergency_stop_while_paused_aborts() -> TestResult {
    init_tracing();
    let ticks = ScriptedTickSource::half_second();
    let robot = powered_robot(Mode::Manual, ticks.as_source());

    let r = robot.clone();
    ticks.at_tick(1, move || r.pause().unwrap());
    let r = robot.clone();
    ticks.at_tick(4, move || r.emergency_stop());

    let task = TaskBuilder::new("Steam", 5).build();
    assert!(!with_timeout(robot.execute_task(task)).await?);
    assert_eq!(robot.lifecycle(), Lifecycle::Off);
    // A stopped device cannot be resumed.
    assert!(matches!(robot.resume(), Err(KitchenError::InvalidOperation(_))));
    Ok(())
}

#[tokio::test]
async fn executing_while_off_is_rejected_without_side_effects() -> TestResult {
    init_tracing();
    let ticks = ScriptedTickSource::half_second();
    let robot = Robot::with_tick_source(&test_settings(Mode::Manual), ticks.as_source());
    let events = EventRecorder::attach(&robot);

    let err = robot
        .execute_task(TaskBuilder::new("Chop", 1).build())
        .await
        .unwrap_err();

    assert!(matches!(err, KitchenError::DeviceNotPowered));
    assert_eq!(robot.lifecycle(), Lifecycle::Off);
    assert!(robot.state().active_task().is_none());
    assert!(events.events().is_empty());
    assert_eq!(ticks.ticks(), 0);
    Ok(())
}

#[tokio::test]
async fn second_concurrent_execution_is_rejected() -> TestResult {
    init_tracing();
    let ticks = ScriptedTickSource::half_second();
    let robot = powered_robot(Mode::Manual, ticks.as_source());

    let first = robot.execute_task(TaskBuilder::new("Knead", 1).build());
    let second = robot.execute_task(TaskBuilder::new("Chop", 1).build());
    let (first, second) = with_timeout(async { tokio::join!(first, second) }).await;

    let results = [first, second];
    let completed = results.iter().filter(|r| matches!(r, Ok(true))).count();
    let rejected = results
        .iter()
        .filter(|r| matches!(r, Err(KitchenError::InvalidOperation(_))))
        .count();
    assert_eq!((completed, rejected), (1, 1));
    assert_eq!(robot.lifecycle(), Lifecycle::On);
    Ok(())
}

#[tokio::test]
async fn manual_task_may_run_in_guided_mode() -> TestResult {
    init_tracing();
    let ticks = ScriptedTickSource::half_second();
    let robot = powered_robot(Mode::GuidedCooking, ticks.as_source());

    assert!(with_timeout(robot.execute_task(TaskBuilder::new("Dice", 1).build())).await?);
    assert_eq!(robot.mode(), Mode::GuidedCooking);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn interval_ticks_follow_the_tokio_clock() -> TestResult {
    init_tracing();
    let robot = Robot::new(&test_settings(Mode::Manual));
    assert!(robot.power_on());

    let start = tokio::time::Instant::now();
    assert!(robot.execute_task(TaskBuilder::new("Chop", 2).build()).await?);
    assert_eq!(start.elapsed(), Duration::from_secs(2));
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn paused_time_is_not_counted_against_the_task() -> TestResult {
    init_tracing();
    let robot = Robot::new(&test_settings(Mode::Manual));
    assert!(robot.power_on());

    let start = tokio::time::Instant::now();
    let run = {
        let robot = robot.clone();
        tokio::spawn(async move { robot.execute_task(TaskBuilder::new("Boil", 2).build()).await })
    };

    tokio::time::sleep(Duration::from_millis(1200)).await;
    robot.pause()?;
    tokio::time::sleep(Duration::from_secs(3)).await;
    assert_eq!(robot.state().progress(), 50);
    robot.resume()?;

    assert!(run.await??);
    assert_eq!(start.elapsed(), Duration::from_secs(5));
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn dropped_task_run_releases_the_device() -> TestResult {
    init_tracing();
    let robot = Robot::new(&test_settings(Mode::Manual));
    assert!(robot.power_on());
    let events = EventRecorder::attach(&robot);

    let task = TaskBuilder::new("Boil", 10).temperature(100).build();
    let run = tokio::time::timeout(Duration::from_secs(1), robot.execute_task(task)).await;
    assert!(run.is_err(), "task should still be running");

    let state = robot.state();
    assert_eq!(state.lifecycle(), Lifecycle::On);
    assert!(state.active_task().is_none());
    assert_eq!(state.progress(), 0);
    assert_eq!(state.readouts(), readouts(0, 20));
    assert_eq!(events.states(), vec![Lifecycle::Running, Lifecycle::On]);

    // Nothing is left holding the device.
    tokio::time::sleep(Duration::from_secs(30)).await;
    assert_eq!(robot.lifecycle(), Lifecycle::On);
    assert!(with_timeout(robot.execute_task(TaskBuilder::new("Chop", 1).build())).await?);
    assert!(robot.power_off()?);
    Ok(())
}
