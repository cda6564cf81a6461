//! End-to-end pipeline tests: CSV text → grid → scan → project → evaluate.
//!
//! Exercises the public API the way the binary and dashboard do, with a
//! deterministic in-memory grid source — no network, no external state.

use anyhow::Result;
use async_trait::async_trait;

use prophammer::engine::evaluator::{self, ModelConfig};
use prophammer::engine::{projection, scanner, EdgeEngine};
use prophammer::grid::cache::CachedLoader;
use prophammer::grid::csv::parse_csv;
use prophammer::grid::GridSource;
use prophammer::types::{RawGrid, Verdict};

// ---------------------------------------------------------------------------
// Deterministic grid source
// ---------------------------------------------------------------------------

/// A grid source that serves a fixed in-memory grid.
struct StaticSource {
    grid: RawGrid,
}

#[async_trait]
impl GridSource for StaticSource {
    async fn fetch_grid(&self) -> Result<RawGrid> {
        Ok(self.grid.clone())
    }

    fn describe(&self) -> String {
        "static test grid".to_string()
    }
}

fn grid(rows: Vec<Vec<&str>>) -> RawGrid {
    RawGrid::new(
        rows.into_iter()
            .map(|r| r.into_iter().map(String::from).collect())
            .collect(),
    )
}

// ---------------------------------------------------------------------------
// Scanner → projection contract
// ---------------------------------------------------------------------------

#[test]
fn scanner_finds_the_documented_row_shape() {
    let g = grid(vec![vec!["ignore", "Points", "22, 25, 28, 19", "27.5/-110"]]);
    let rows: Vec<_> = scanner::scan(&g).collect();
    assert_eq!(rows.len(), 1);

    let row = &rows[0];
    assert_eq!(row.label, "Points");
    assert_eq!(row.history, vec![22.0, 25.0, 28.0, 19.0]);
    assert_eq!(row.candidates, vec!["27.5/-110".to_string()]);
    assert!((projection::project(&row.history, 1.0) - 23.5).abs() < 1e-10);

    let quote = evaluator::parse_quote(&row.candidates[0]).unwrap();
    assert!((quote.line - 27.5).abs() < 1e-10);
    assert!((quote.american_odds - (-110.0)).abs() < 1e-10);
}

// ---------------------------------------------------------------------------
// Full engine runs
// ---------------------------------------------------------------------------

#[test]
fn documented_example_falls_below_threshold() {
    // projection 23.5, σ 4.7; 27.5/-110 → edge ≈ -0.326 → excluded
    let g = grid(vec![vec!["ignore", "Points", "22, 25, 28, 19", "27.5/-110"]]);
    let engine = EdgeEngine::new(ModelConfig::default());
    assert!(engine.analyze(&g, 1.0).is_empty());
}

#[test]
fn mixed_grid_produces_ranked_verdicts() {
    let g = grid(vec![
        // header noise the scanner must step over
        vec!["Player", "Stat", "Last 10", "Ladder"],
        // hammer: p ≈ 0.856 vs implied 0.5
        vec!["", "Points", "22, 25, 28, 19", "18.5/+100"],
        // excluded: deep negative edge
        vec!["", "Points", "22, 25, 28, 19", "27.5/-110"],
        // malformed rows of every kind
        vec!["", "Points", "22", "27.5/-110"],
        vec!["", "Steals", "2, 3, 1", "2.5/-110"],
        vec!["not", "a", "stat", "row"],
        // assists edge via two candidates, one garbage
        vec!["", "Assists", "7, 8, 6, 9", "abc/xyz", "6.5/+120"],
    ]);

    let engine = EdgeEngine::new(ModelConfig::default());
    let opps = engine.analyze(&g, 1.0);

    assert_eq!(opps.len(), 2);
    // Sorted by raw edge descending
    assert!(opps[0].raw_edge >= opps[1].raw_edge);
    for opp in &opps {
        assert!(opp.raw_edge > 0.02);
        assert!(matches!(opp.verdict, Verdict::Hammer | Verdict::Bet | Verdict::Pass));
    }
    let stats: Vec<_> = opps.iter().map(|o| o.stat.as_str()).collect();
    assert!(stats.contains(&"Points"));
    assert!(stats.contains(&"Assists"));
}

#[test]
fn repeated_runs_are_identical() {
    let g = grid(vec![
        vec!["", "Points", "22, 25, 28, 19", "18.5/+100", "20.5/+120"],
        vec!["", "Rebounds", "10, 12, 9, 11", "8.5/+105"],
    ]);
    let engine = EdgeEngine::new(ModelConfig::default());

    let first = engine.analyze(&g, 1.08);
    let second = engine.analyze(&g, 1.08);

    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap(),
    );
}

#[test]
fn garbage_quotes_never_surface_under_any_multiplier() {
    let g = grid(vec![vec!["", "Points", "22, 25, 28, 19", "abc/xyz"]]);
    let engine = EdgeEngine::new(ModelConfig::default());
    for multiplier in [0.5, 0.92, 1.0, 1.08, 3.0] {
        assert!(engine.analyze(&g, multiplier).is_empty());
    }
}

#[test]
fn custom_thresholds_shift_verdicts() {
    let g = grid(vec![vec!["", "Points", "22, 25, 28, 19", "18.5/+100"]]);

    // Default config calls this a HAMMER (edge ≈ 0.356)
    let default_engine = EdgeEngine::new(ModelConfig::default());
    assert_eq!(default_engine.analyze(&g, 1.0)[0].verdict, Verdict::Hammer);

    // Raising the bar demotes it to a BET
    let strict = EdgeEngine::new(ModelConfig {
        hammer_threshold: 0.40,
        ..ModelConfig::default()
    });
    assert_eq!(strict.analyze(&g, 1.0)[0].verdict, Verdict::Bet);

    // And an impossible inclusion bar drops it entirely
    let impossible = EdgeEngine::new(ModelConfig {
        min_edge: 0.99,
        ..ModelConfig::default()
    });
    assert!(impossible.analyze(&g, 1.0).is_empty());
}

// ---------------------------------------------------------------------------
// CSV export → engine
// ---------------------------------------------------------------------------

#[test]
fn csv_export_flows_through_the_engine() {
    // As a worksheet export would look: history cells quoted
    let csv = "\
Player,Stat,Last Games,Ladder
Donovan Mitchell,Points,\"22, 25, 28, 19\",18.5/+100
Donovan Mitchell,Assists,\"7, 8, 6, 9\",6.5/+120
";
    let g = parse_csv(csv);
    assert_eq!(g.len(), 3);

    let engine = EdgeEngine::new(ModelConfig::default());
    let opps = engine.analyze(&g, 1.0);
    assert_eq!(opps.len(), 2);
    assert_eq!(opps.iter().filter(|o| o.stat == "Points").count(), 1);
}

// ---------------------------------------------------------------------------
// Cache + engine
// ---------------------------------------------------------------------------

#[tokio::test]
async fn cached_loader_feeds_the_engine_and_survives_outages() {
    let source = StaticSource {
        grid: grid(vec![vec!["", "Points", "22, 25, 28, 19", "18.5/+100"]]),
    };
    // Failure flag shared with the source inside the box
    let fail_flag = std::sync::Arc::new(std::sync::atomic::AtomicBool::new(false));
    struct FlaggedSource {
        inner: StaticSource,
        fail: std::sync::Arc<std::sync::atomic::AtomicBool>,
    }
    #[async_trait]
    impl GridSource for FlaggedSource {
        async fn fetch_grid(&self) -> Result<RawGrid> {
            if self.fail.load(std::sync::atomic::Ordering::SeqCst) {
                anyhow::bail!("simulated outage");
            }
            self.inner.fetch_grid().await
        }
        fn describe(&self) -> String {
            self.inner.describe()
        }
    }

    let mut loader = CachedLoader::new(
        Box::new(FlaggedSource {
            inner: source,
            fail: fail_flag.clone(),
        }),
        0, // always stale — every call hits the source
    );

    let engine = EdgeEngine::new(ModelConfig::default());

    let g1 = loader.grid().await.unwrap();
    assert_eq!(engine.analyze(&g1, 1.0).len(), 1);

    // Source goes down; the stale snapshot keeps the pipeline alive
    fail_flag.store(true, std::sync::atomic::Ordering::SeqCst);
    let g2 = loader.grid().await.unwrap();
    assert_eq!(engine.analyze(&g2, 1.0).len(), 1);
}
