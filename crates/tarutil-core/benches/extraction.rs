//! Benchmarks for tarutil-core extraction.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use criterion::BatchSize;
use criterion::BenchmarkId;
use criterion::Criterion;
use criterion::Throughput;
use criterion::criterion_group;
use criterion::criterion_main;
use tarutil_core::ExtractOptions;
use tarutil_core::extract_all;
use tarutil_core::test_utils::TarTestBuilder;
use tempfile::TempDir;

/// Creates a tar stream with many small files spread over a few directories.
fn create_many_small_files_tar(file_count: usize) -> Vec<u8> {
    let mut builder = TarTestBuilder::new();
    for dir in 0..10 {
        builder = builder.add_directory(&format!("dir{dir}/"));
    }
    for i in 0..file_count {
        let name = format!("dir{}/file{i:05}.txt", i % 10);
        builder = builder.add_file(&name, format!("content{i}").as_bytes());
    }
    builder.build()
}

/// Creates a tar stream with a single large file.
fn create_large_file_tar(size_bytes: usize) -> Vec<u8> {
    TarTestBuilder::new()
        .add_file("large_file.bin", &vec![0xAB_u8; size_bytes])
        .build()
}

/// Creates a tar stream of files each followed by a hard link and a symlink.
fn create_linked_tar(file_count: usize) -> Vec<u8> {
    let mut builder = TarTestBuilder::new();
    for i in 0..file_count {
        let name = format!("file{i:05}");
        builder = builder
            .add_file(&name, b"payload")
            .add_hardlink(&format!("hard{i:05}"), &name)
            .add_symlink(&format!("soft{i:05}"), &name);
    }
    builder.build()
}

fn bench_many_small_files(c: &mut Criterion) {
    let mut group = c.benchmark_group("many_small_files");
    for count in [100, 1000] {
        let data = create_many_small_files_tar(count);
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), &data, |b, data| {
            b.iter_batched(
                || TempDir::new().unwrap(),
                |temp| extract_all(&data[..], temp.path(), ExtractOptions::empty()).unwrap(),
                BatchSize::PerIteration,
            );
        });
    }
    group.finish();
}

fn bench_large_file(c: &mut Criterion) {
    let mut group = c.benchmark_group("large_file");
    for size in [1024 * 1024, 16 * 1024 * 1024] {
        let data = create_large_file_tar(size);
        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &data, |b, data| {
            b.iter_batched(
                || TempDir::new().unwrap(),
                |temp| extract_all(&data[..], temp.path(), ExtractOptions::empty()).unwrap(),
                BatchSize::PerIteration,
            );
        });
    }
    group.finish();
}

fn bench_links_and_metadata(c: &mut Criterion) {
    let data = create_linked_tar(300);
    let mut group = c.benchmark_group("links_and_metadata");
    for (label, options) in [
        ("links", ExtractOptions::LINK | ExtractOptions::SYMLINK),
        (
            "links_chmod_chtimes",
            ExtractOptions::LINK
                | ExtractOptions::SYMLINK
                | ExtractOptions::CHMOD
                | ExtractOptions::CHTIMES,
        ),
    ] {
        group.bench_function(label, |b| {
            b.iter_batched(
                || TempDir::new().unwrap(),
                |temp| extract_all(&data[..], temp.path(), options).unwrap(),
                BatchSize::PerIteration,
            );
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_many_small_files,
    bench_large_file,
    bench_links_and_metadata
);
criterion_main!(benches);
