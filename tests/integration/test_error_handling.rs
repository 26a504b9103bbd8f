// エラーハンドリングの統合テスト
use anyhow::{anyhow, Result};
use parmap::{run, telemetry::init_tracing, ItemError, ParallelMapper};
use parmap::{DefaultMapConfig, TracingProgressReporter};
use std::collections::BTreeSet;
use std::time::Duration;
use tokio::time::sleep;
use tracing::Level;

fn fail_on(failing: &'static [u64]) -> impl Fn(u64) -> std::future::Ready<Result<u64>> + Send + Sync + 'static {
    move |x: u64| {
        if failing.contains(&x) {
            std::future::ready(Err(anyhow!("rejected {x}")))
        } else {
            std::future::ready(Ok(x * 10))
        }
    }
}

#[tokio::test]
async fn test_partial_failure_keeps_defaults_and_keys() -> Result<()> {
    const FAILING: &[u64] = &[1, 4, 5, 9];
    let inputs: Vec<u64> = (0..12).collect();

    let (results, errors) = run(inputs.clone(), fail_on(FAILING)).await;
    let errors = errors.expect("failures should be reported");

    let expected_keys: BTreeSet<usize> = FAILING.iter().map(|x| *x as usize).collect();
    assert_eq!(errors.indices().collect::<BTreeSet<_>>(), expected_keys);
    assert_eq!(results.len(), inputs.len());
    for (index, value) in results.iter().enumerate() {
        if expected_keys.contains(&index) {
            assert_eq!(*value, 0);
        } else {
            assert_eq!(*value, inputs[index] * 10);
        }
    }
    Ok(())
}

#[tokio::test]
async fn test_all_failing_input() -> Result<()> {
    let (results, errors) = run((0..25u64).collect::<Vec<u64>>(), |x: u64| async move {
        Err::<u64, anyhow::Error>(anyhow!("failure {x}"))
    })
    .await;

    let errors = errors.expect("every item should fail");
    assert_eq!(results, vec![0; 25]);
    assert_eq!(errors.len(), 25);
    assert_eq!(errors.indices().collect::<Vec<_>>(), (0..25).collect::<Vec<_>>());
    Ok(())
}

#[tokio::test]
async fn test_single_item_failure() -> Result<()> {
    let (results, errors) = run(vec![42u64], |_: u64| async move {
        Err::<u64, anyhow::Error>(anyhow!("always fails"))
    })
    .await;

    assert_eq!(results, vec![0]);
    let errors = errors.expect("single failure should be reported");
    assert_eq!(errors.indices().collect::<Vec<_>>(), vec![0]);
    assert_eq!(errors.to_string(), "0: always fails");
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_join_is_deterministic_across_runs() -> Result<()> {
    let mut rendered = Vec::new();

    for run_number in 0..5u64 {
        let (_, errors) = run((0..30u64).collect::<Vec<u64>>(), move |x: u64| async move {
            // 実行毎に完了順を変える
            sleep(Duration::from_millis((x * (run_number + 3)) % 11)).await;
            if x % 3 == 0 {
                Err::<u64, anyhow::Error>(anyhow!("bad {x}"))
            } else {
                Ok(x)
            }
        })
        .await;

        let errors = errors.expect("multiples of three fail");
        let joined = errors.join().to_string();
        rendered.push(joined);
    }

    assert!(rendered.windows(2).all(|pair| pair[0] == pair[1]));

    // インデックス昇順の接頭辞になっていることを確認
    let prefixes: Vec<usize> = rendered[0]
        .lines()
        .map(|line| line.split(':').next().unwrap().parse().unwrap())
        .collect();
    assert_eq!(prefixes, (0..30).step_by(3).collect::<Vec<_>>());
    assert!(rendered[0].starts_with("0: bad 0\n3: bad 3"));
    Ok(())
}

#[tokio::test]
async fn test_failures_are_isolated_from_siblings() -> Result<()> {
    init_tracing(false, Level::WARN);
    let mapper = ParallelMapper::new(DefaultMapConfig::default(), TracingProgressReporter::new())?;

    let (results, errors) = mapper
        .execute(vec![1u64, 2, 3, 4, 5], |x: u64| async move {
            match x {
                2 => Err(anyhow!("declared failure")),
                4 => panic!("unexpected panic"),
                _ => {
                    sleep(Duration::from_millis(10)).await;
                    Ok(x)
                }
            }
        })
        .await;

    assert_eq!(results, vec![1, 0, 3, 0, 5]);
    let errors = errors.expect("two items fail");
    assert!(matches!(errors.get(1), Some(ItemError::Operation(_))));
    assert!(matches!(errors.get(3), Some(ItemError::Panicked(_))));
    Ok(())
}

#[tokio::test]
async fn test_error_map_converts_into_anyhow() -> Result<()> {
    let (_, errors) = run(vec![1u64, 2], fail_on(&[2])).await;

    let outcome: Result<()> = match errors {
        Some(errors) => Err(errors.into()),
        None => Ok(()),
    };

    let error = outcome.unwrap_err();
    assert_eq!(error.to_string(), "1: rejected 2");
    Ok(())
}
