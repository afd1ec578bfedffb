use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use remote_memory::config::Config;
use remote_memory::RemoteMemory;

fn benchmark_memory_ops(c: &mut Criterion) {
    let pid = std::process::id();
    let mut config = Config::default();
    config.cache.enabled = true;
    let cached = RemoteMemory::from_config(&config);
    let scoped = RemoteMemory::new();

    let mut group = c.benchmark_group("read_memory");
    for size in [64usize, 4096, 1 << 20] {
        let data = vec![0xA5u8; size];
        group.throughput(Throughput::Bytes(size as u64));

        group.bench_with_input(BenchmarkId::new("scoped", size), &data, |b, data| {
            b.iter(|| scoped.read_memory(pid, black_box(data.as_ptr()), data.len()));
        });
        group.bench_with_input(BenchmarkId::new("cached", size), &data, |b, data| {
            b.iter(|| cached.read_memory(pid, black_box(data.as_ptr()), data.len()));
        });
    }
    group.finish();
}

criterion_group!(benches, benchmark_memory_ops);
criterion_main!(benches);
