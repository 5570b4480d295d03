use std::time::Duration;
use stress_test::{stress_test_contention, stress_test_race};
use tracing_subscriber::EnvFilter;

fn main() -> std::io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,squares_sdk=warn")),
        )
        .init();

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async_main());
    Ok(())
}

async fn async_main() {

    println!("\n\n╔════════════════════════════════════════════════════════════╗");
    println!("║            CLAIM RACE STRESS TESTS                          ║");
    println!("╚════════════════════════════════════════════════════════════╝");

    let mut consistent = true;

    // Test 1: a few players, whole board
    let stats = stress_test_race(4, 5, 100, Duration::ZERO).await;
    stats.print();
    consistent &= stats.is_consistent();

    // Test 2: many players, slow store, small region
    let stats = stress_test_race(20, 5, 25, Duration::from_millis(2)).await;
    stats.print();
    consistent &= stats.is_consistent();

    // Test 3: everyone wants the same cell
    let stats = stress_test_race(50, 10, 1, Duration::from_millis(1)).await;
    stats.print();
    consistent &= stats.is_consistent();

    // Test 4: contention sweep
    stress_test_contention(16, Duration::from_millis(1)).await;

    if consistent {
        println!("\n✓ All stress tests completed, no cell ever had two owners!");
    } else {
        println!("\n✗ Double claims detected, see statistics above.");
    }
}
