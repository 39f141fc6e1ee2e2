//! Benchmarks for markdown splitting.
//!
//! Measures splitter throughput across document sizes and option sets, and
//! the split + hash + store path used during ingestion.

use chrono::Utc;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use starkdocs_chunker::MarkdownSplitter;
use starkdocs_core::{content_hash, ChunkSink, IngestedChunk, SplitOptions};
use starkdocs_store::MemoryStore;

/// Sample chapter for benchmarking.
const SAMPLE_DOC: &str = r#"
# Storage in Starknet Contracts

Contracts keep their state in storage, a map of 2^251 slots addressed by felt252 keys.

## Declaring Storage

Storage variables are declared in a struct annotated with `#[storage]`.

```cairo
#[storage]
struct Storage {
    owner: ContractAddress,
    balances: Map<ContractAddress, u256>,
}
```

### Reading and Writing

Each storage variable exposes `read` and `write`. Reads are cheap; writes cost gas because the
state diff is posted to L1.

## Storage Layout

The address of a variable is the `sn_keccak` hash of its name. Map entries are derived with
Pedersen hashing of the key and the base address.

- Simple values occupy a single slot
- Structs occupy consecutive slots
- Maps never collide in practice
"#;

/// Generate test content of specified size (in KB).
fn generate_content(size_kb: usize) -> String {
    let repetitions = (size_kb * 1024) / SAMPLE_DOC.len() + 1;
    SAMPLE_DOC.repeat(repetitions)
}

fn splitting_benchmark(c: &mut Criterion) {
    let splitter = MarkdownSplitter::new(SplitOptions::default()).unwrap();

    let mut group = c.benchmark_group("splitting");

    // Benchmark different content sizes
    for size_kb in [1, 10, 100].iter() {
        let content = generate_content(*size_kb);

        group.throughput(Throughput::Bytes(content.len() as u64));
        group.bench_with_input(
            BenchmarkId::new("markdown", format!("{}kb", size_kb)),
            &content,
            |b, content| b.iter(|| black_box(splitter.split_to_chunks(content))),
        );
    }

    // Benchmark different chunk sizes
    let content = generate_content(50);
    for max_chars in [256, 512, 1024, 4096].iter() {
        let splitter = MarkdownSplitter::builder()
            .max_chars(*max_chars)
            .min_chars(*max_chars / 4)
            .overlap(*max_chars / 8)
            .build()
            .unwrap();

        group.bench_with_input(
            BenchmarkId::new("max_chars", max_chars),
            &content,
            |b, content| b.iter(|| black_box(splitter.split_to_chunks(content))),
        );
    }

    group.finish();
}

fn ingest_benchmark(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let splitter = MarkdownSplitter::new(SplitOptions::default()).unwrap();
    let store = MemoryStore::new();

    let mut group = c.benchmark_group("ingest");

    for size_kb in [10, 100].iter() {
        let content = generate_content(*size_kb);

        group.throughput(Throughput::Bytes(content.len() as u64));
        group.bench_with_input(
            BenchmarkId::new("split_hash_store", format!("{}kb", size_kb)),
            &content,
            |b, content| {
                b.to_async(&rt).iter(|| async {
                    let chunks: Vec<IngestedChunk> = splitter
                        .split_to_chunks(content)
                        .into_iter()
                        .map(|chunk| IngestedChunk {
                            document: "storage.md".to_string(),
                            content_hash: content_hash(&chunk.content),
                            source_link: None,
                            ingested_at: Utc::now(),
                            chunk,
                        })
                        .collect();
                    black_box(store.write("storage.md", &chunks).await)
                });
            },
        );
    }

    group.finish();
}

criterion_group!(benches, splitting_benchmark, ingest_benchmark);
criterion_main!(benches);
