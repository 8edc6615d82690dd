//! Test the cross-chain aggregation flow
//!
//! Models the fetch round the app runs against the worker:
//! 1. Every configured chain starts a round as Pending
//! 2. Results and failures arrive per chain, tagged with a generation
//! 3. Stale generations are dropped at ingestion
//! 4. The table concatenates ready chains in the fixed chain order

use std::collections::BTreeMap;

const CHAIN_ORDER: [&str; 7] = [
    "ethereum", "polygon", "avalanche", "fantom", "rinkeby", "goerli", "mumbai",
];

#[derive(Debug, Clone, PartialEq)]
enum MockQuery {
    Disabled,
    Pending,
    Ready(Vec<MockEntry>),
    Failed(String),
}

#[derive(Debug, Clone, PartialEq)]
struct MockEntry {
    chain: &'static str,
    address: String,
}

struct MockRegistry {
    generation: u64,
    queries: BTreeMap<&'static str, MockQuery>,
}

impl MockRegistry {
    fn new(configured: &[&'static str]) -> Self {
        let mut queries = BTreeMap::new();
        for chain in CHAIN_ORDER {
            queries.insert(chain, MockQuery::Disabled);
        }
        let mut registry = Self {
            generation: 0,
            queries,
        };
        registry.begin_round(configured);
        registry
    }

    fn begin_round(&mut self, configured: &[&'static str]) {
        self.generation += 1;
        for chain in CHAIN_ORDER {
            let state = if configured.contains(&chain) {
                MockQuery::Pending
            } else {
                MockQuery::Disabled
            };
            self.queries.insert(chain, state);
        }
    }

    fn ingest_ready(&mut self, generation: u64, chain: &'static str, entries: Vec<MockEntry>) {
        if generation != self.generation {
            return; // stale round
        }
        self.queries.insert(chain, MockQuery::Ready(entries));
    }

    fn ingest_failed(&mut self, generation: u64, chain: &'static str, msg: &str) {
        if generation != self.generation {
            return;
        }
        self.queries.insert(chain, MockQuery::Failed(msg.to_string()));
    }

    fn aggregate(&self) -> Vec<MockEntry> {
        let mut rows = Vec::new();
        for chain in CHAIN_ORDER {
            if let Some(MockQuery::Ready(entries)) = self.queries.get(chain) {
                rows.extend(entries.iter().cloned());
            }
        }
        rows
    }

    fn settled(&self) -> usize {
        self.queries
            .values()
            .filter(|q| matches!(q, MockQuery::Ready(_) | MockQuery::Failed(_)))
            .count()
    }
}

fn entries(chain: &'static str, count: usize) -> Vec<MockEntry> {
    (0..count)
        .map(|i| MockEntry {
            chain,
            address: format!("0x{:040x}", i + 1),
        })
        .collect()
}

#[test]
fn test_aggregate_preserves_chain_order() {
    let mut registry = MockRegistry::new(&["ethereum", "polygon", "mumbai"]);
    let generation = registry.generation;

    // Results arrive out of chain order
    registry.ingest_ready(generation, "mumbai", entries("mumbai", 2));
    registry.ingest_ready(generation, "ethereum", entries("ethereum", 1));
    registry.ingest_ready(generation, "polygon", entries("polygon", 3));

    let rows = registry.aggregate();
    assert_eq!(rows.len(), 6);
    let chains: Vec<&str> = rows.iter().map(|e| e.chain).collect();
    assert_eq!(
        chains,
        vec!["ethereum", "polygon", "polygon", "polygon", "mumbai", "mumbai"]
    );

    println!("✓ Rows follow the fixed chain order regardless of arrival order");
}

#[test]
fn test_stale_generation_is_dropped() {
    let mut registry = MockRegistry::new(&["ethereum", "polygon"]);
    let old_generation = registry.generation;

    // A wallet switch starts a new round before the old result lands
    registry.begin_round(&["ethereum", "polygon"]);
    registry.ingest_ready(old_generation, "ethereum", entries("ethereum", 5));

    assert_eq!(registry.aggregate().len(), 0);
    assert_eq!(
        registry.queries.get("ethereum"),
        Some(&MockQuery::Pending),
        "stale result must not settle the new round"
    );

    // The current generation still lands normally
    registry.ingest_ready(registry.generation, "ethereum", entries("ethereum", 2));
    assert_eq!(registry.aggregate().len(), 2);

    println!("✓ Stale generation dropped, current generation ingested");
}

#[test]
fn test_failed_chain_does_not_block_others() {
    let mut registry = MockRegistry::new(&["ethereum", "polygon", "avalanche"]);
    let generation = registry.generation;

    registry.ingest_ready(generation, "ethereum", entries("ethereum", 2));
    registry.ingest_failed(generation, "polygon", "connection refused");
    registry.ingest_ready(generation, "avalanche", entries("avalanche", 1));

    let rows = registry.aggregate();
    assert_eq!(rows.len(), 3, "failed chain contributes zero rows");
    assert!(rows.iter().all(|e| e.chain != "polygon"));

    // A failure still settles the chain, so the round completes
    assert_eq!(registry.settled(), 3);

    println!("✓ One failed chain leaves the other chains' rows intact");
}

#[test]
fn test_round_settles_when_every_configured_chain_answers() {
    let configured = ["ethereum", "polygon"];
    let mut registry = MockRegistry::new(&configured);
    let generation = registry.generation;

    assert_eq!(registry.settled(), 0);
    registry.ingest_ready(generation, "ethereum", entries("ethereum", 1));
    assert!(registry.settled() < configured.len(), "round still open");

    registry.ingest_failed(generation, "polygon", "timeout");
    assert_eq!(registry.settled(), configured.len(), "round complete");

    // Unconfigured chains stay disabled and never settle
    assert_eq!(registry.queries.get("fantom"), Some(&MockQuery::Disabled));

    println!("✓ Round settles on ready + failed, disabled chains excluded");
}
