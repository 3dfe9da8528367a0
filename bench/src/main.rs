use std::collections::VecDeque;
use std::time::Instant;

use clap::{Parser, ValueEnum};
use rabbit_graph_core::{Graph, GraphBuilder, NodeId};

#[derive(Parser)]
#[command(name = "rabbit-graph-bench")]
#[command(about = "Time rabbit hole, rabbit island and longest rabbit hole queries on synthetic catalogs")]
struct Cli {
    /// Topology to generate
    #[arg(value_enum, default_value_t = Mode::All)]
    mode: Mode,

    /// Number of categories
    #[arg(default_value_t = 1_000_000)]
    node_count: u64,

    /// Seed for the deterministic generators
    #[arg(long, default_value_t = 42)]
    seed: u64,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    /// Run all generators and benchmark each
    All,
    /// Seeded category catalog: 100 roots, random parents, random similarity pairs
    Catalog,
    /// Fractal branching tree (deep paths, exact diameter)
    Lsystem,
    /// Watts-Strogatz ring lattice + shortcuts
    Smallworld,
    /// Erdos-Renyi uniform random pairs
    Random,
    /// Two dense clusters connected by a thin bridge
    Barbell,
    /// Diffusion-limited aggregation (organic branching)
    Dla,
}

type Generator = fn(u64, u64) -> Graph;

fn main() {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    tracing::info!(mode = ?cli.mode, node_count = cli.node_count, seed = cli.seed, "starting benchmark");

    println!("rabbit-graph-bench");
    println!("==================");
    println!();

    let generators: Vec<(&str, Generator)> = match cli.mode {
        Mode::Catalog => vec![("Seeded catalog", gen_catalog)],
        Mode::Lsystem => vec![("L-system tree", gen_lsystem)],
        Mode::Smallworld => vec![("Small-world (Watts-Strogatz)", gen_small_world)],
        Mode::Random => vec![("Erdos-Renyi random", gen_random)],
        Mode::Barbell => vec![("Barbell (cluster-bridge-cluster)", gen_barbell)],
        Mode::Dla => vec![("DLA (organic branching)", gen_dla)],
        Mode::All => vec![
            ("Seeded catalog", gen_catalog as Generator),
            ("L-system tree", gen_lsystem),
            ("Small-world (Watts-Strogatz)", gen_small_world),
            ("Erdos-Renyi random", gen_random),
            ("Barbell (cluster-bridge-cluster)", gen_barbell),
            ("DLA (organic branching)", gen_dla),
        ],
    };

    for (name, generator) in generators {
        run_benchmark(name, generator, cli.node_count, cli.seed);
    }
}

fn run_benchmark(name: &str, generator: Generator, node_count: u64, seed: u64) {
    println!("--- {} ---", name);
    println!("Target: {} categories", node_count);

    let t = Instant::now();
    let graph = generator(node_count, seed);
    let gen_time = t.elapsed();
    println!(
        "Built in {:.2}s — {} categories, {} similarity pairs, ~{:.0}MB",
        gen_time.as_secs_f64(),
        graph.node_count(),
        graph.edge_count(),
        graph.memory_usage() as f64 / 1_048_576.0
    );

    if graph.is_empty() {
        println!();
        return;
    }

    // Neighborhood of the first category
    let first = graph.nodes()[0];
    println!();
    println!("{:>8} {:>12} {:>12} {:>10}", "depth", "found", "visited", "time");
    println!("{:->8} {:->12} {:->12} {:->10}", "", "", "", "");

    for depth in [1, 2, 3, 5, 10, 20, 50] {
        let t = Instant::now();
        let result = rabbit_graph_core::bfs_neighborhood(&graph, first, depth);
        let elapsed = t.elapsed();
        println!(
            "{:>8} {:>12} {:>12} {:>8.1}ms",
            depth,
            result.neighbors.len(),
            result.nodes_visited,
            elapsed.as_secs_f64() * 1000.0
        );
        if result.nodes_visited >= graph.node_count() {
            println!("{:>8} (entire graph reached)", "");
            break;
        }
    }

    // Rabbit hole: first category to last category
    let last = graph.nodes()[graph.node_count() - 1];
    println!();
    let t = Instant::now();
    let path = rabbit_graph_core::shortest_path(&graph, first, last);
    let elapsed = t.elapsed();
    match path {
        Some(p) => println!(
            "Rabbit hole {} → {}: {} hops in {:.1}ms",
            first,
            last,
            p.len() - 1,
            elapsed.as_secs_f64() * 1000.0
        ),
        None => println!(
            "Rabbit hole {} → {}: no path ({:.1}ms)",
            first,
            last,
            elapsed.as_secs_f64() * 1000.0
        ),
    }

    // Rabbit islands
    let t = Instant::now();
    let islands = rabbit_graph_core::connected_components(&graph);
    let elapsed = t.elapsed();
    let largest = islands.iter().map(|i| i.len()).max().unwrap_or(0);
    let singletons = islands.iter().filter(|i| i.len() == 1).count();
    println!(
        "Rabbit islands: {} (largest {}, {} lonely categories) in {:.1}ms",
        islands.len(),
        largest,
        singletons,
        elapsed.as_secs_f64() * 1000.0
    );

    // Longest rabbit hole
    let t = Instant::now();
    let longest = rabbit_graph_core::approximate_diameter_path(&graph);
    let elapsed = t.elapsed();
    println!(
        "Longest rabbit hole: {} hops ({} → {}) in {:.1}ms",
        longest.len().saturating_sub(1),
        longest.first().copied().unwrap_or_default(),
        longest.last().copied().unwrap_or_default(),
        elapsed.as_secs_f64() * 1000.0
    );
    println!();
}

// ---------------------------------------------------------------------------
// Generators — all O(n) or O(n + edges), single-threaded, deterministic
// ---------------------------------------------------------------------------

/// Simple LCG for deterministic, fast pseudo-random numbers.
struct FastRng(u64);

impl FastRng {
    fn new(seed: u64) -> Self {
        Self(seed)
    }
    fn next(&mut self, max: u64) -> u64 {
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1);
        (self.0 >> 33) % max
    }
    fn next_f64(&mut self) -> f64 {
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1);
        (self.0 >> 11) as f64 / (1u64 << 53) as f64
    }
}

/// Add a pair, ignoring self-pairs and repeats (generators draw them freely).
fn link(builder: &mut GraphBuilder, a: NodeId, b: NodeId) {
    if a != b {
        let _ = builder.add_edge(a, b);
    }
}

/// Seeded category catalog.
///
/// Category ids start at 1. The first 100 are roots; every later category
/// picks a random earlier category as its parent. A third of the non-root
/// categories are marked similar to their parent, a third to a random
/// category anywhere in the catalog, and the rest get no pair of their own,
/// which leaves plenty of small islands and lonely categories.
fn gen_catalog(node_count: u64, seed: u64) -> Graph {
    let roots = 100u64.min(node_count);
    let mut builder = GraphBuilder::with_capacity(node_count as usize, node_count as usize);
    let mut rng = FastRng::new(seed);
    let mut parent_of: Vec<u64> = Vec::with_capacity(node_count as usize);

    for id in 1..=node_count {
        builder.add_node(id);
        let parent = if id > roots { rng.next(id - 1) + 1 } else { 0 };
        parent_of.push(parent);
    }

    for id in (roots + 1)..=node_count {
        match rng.next(3) {
            0 => {
                let parent = parent_of[(id - 1) as usize];
                link(&mut builder, id, parent);
            }
            1 => {
                let other = rng.next(node_count) + 1;
                link(&mut builder, id, other);
            }
            _ => {}
        }
    }

    builder.build()
}

/// L-system fractal tree: deep branching with self-similar structure.
///
/// Each node spawns `branching` children. A tree, so the longest rabbit
/// hole is the exact diameter.
fn gen_lsystem(node_count: u64, _seed: u64) -> Graph {
    let mut builder = GraphBuilder::with_capacity(node_count as usize, node_count as usize);

    let branching = 3u64;
    builder.add_node(0);

    let mut next_id: u64 = 1;
    let mut frontier: Vec<u64> = vec![0];

    while next_id < node_count && !frontier.is_empty() {
        let mut next_frontier = Vec::with_capacity(frontier.len() * branching as usize);
        for &parent in &frontier {
            for _ in 0..branching {
                if next_id >= node_count {
                    break;
                }
                let child = next_id;
                next_id += 1;
                builder.add_node(child);
                link(&mut builder, parent, child);
                next_frontier.push(child);
            }
        }
        frontier = next_frontier;
    }

    builder.build()
}

/// Small-world (Watts-Strogatz): ring lattice + random rewiring.
fn gen_small_world(node_count: u64, seed: u64) -> Graph {
    let k = 10u64; // neighbors on each side
    let p = 0.05f64; // rewire probability
    let mut builder = GraphBuilder::with_capacity(node_count as usize, (node_count * k) as usize);
    let mut rng = FastRng::new(seed ^ 67890);

    for i in 0..node_count {
        builder.add_node(i);
    }

    for i in 0..node_count {
        for j in 1..=k {
            let neighbor = (i + j) % node_count;
            if rng.next_f64() < p {
                let rewired = rng.next(node_count);
                link(&mut builder, i, if rewired != i { rewired } else { neighbor });
            } else {
                link(&mut builder, i, neighbor);
            }
        }
    }

    builder.build()
}

/// Erdos-Renyi: uniform random pairs, ~10 per category on average.
fn gen_random(node_count: u64, seed: u64) -> Graph {
    let target_edges = node_count * 10;
    let mut builder = GraphBuilder::with_capacity(node_count as usize, target_edges as usize);
    let mut rng = FastRng::new(seed ^ 54321);

    for i in 0..node_count {
        builder.add_node(i);
    }

    for _ in 0..target_edges {
        let a = rng.next(node_count);
        let b = rng.next(node_count);
        link(&mut builder, a, b);
    }

    builder.build()
}

/// Barbell: two dense clusters connected by a single chain of bridge nodes.
///
/// Worst case for the rabbit hole through a bottleneck, and the longest
/// rabbit hole must cross the bridge.
fn gen_barbell(node_count: u64, seed: u64) -> Graph {
    let bridge_len = 10u64.min(node_count);
    let cluster_size = (node_count - bridge_len) / 2;
    let mut builder =
        GraphBuilder::with_capacity(node_count as usize, (cluster_size * 20 + bridge_len) as usize);
    let mut rng = FastRng::new(seed ^ 99999);

    let b_start = cluster_size + bridge_len;
    for id in 0..(b_start + cluster_size) {
        builder.add_node(id);
    }

    if cluster_size > 1 {
        for offset in [0, b_start] {
            for i in 0..cluster_size {
                for _ in 0..20u64.min(cluster_size - 1) {
                    let target = rng.next(cluster_size);
                    link(&mut builder, offset + i, offset + target);
                }
            }
        }
    }

    // Bridge: chain from the last node of A through to the first node of B
    if cluster_size > 0 {
        for id in cluster_size..=b_start {
            link(&mut builder, id - 1, id);
        }
    }

    builder.build()
}

/// DLA (Diffusion-Limited Aggregation): organic branching growth.
///
/// Each new node attaches to a random recent "surface" node, with
/// occasional long-range second links that create cycles.
fn gen_dla(node_count: u64, seed: u64) -> Graph {
    let mut builder = GraphBuilder::with_capacity(node_count as usize, (node_count * 2) as usize);
    let mut rng = FastRng::new(seed ^ 77777);

    builder.add_node(0);

    let mut surface: VecDeque<u64> = VecDeque::with_capacity(10001);
    surface.push_back(0);
    let surface_max = 10000usize;

    for new_node in 1..node_count {
        builder.add_node(new_node);

        let attach_to = surface[rng.next(surface.len() as u64) as usize];
        link(&mut builder, new_node, attach_to);

        // 10% chance of a second connection (creates loops / shortcuts)
        if rng.next(10) == 0 && new_node > 1 {
            let other = rng.next(new_node);
            link(&mut builder, new_node, other);
        }

        surface.push_back(new_node);
        if surface.len() > surface_max {
            surface.pop_front();
        }
    }

    builder.build()
}
