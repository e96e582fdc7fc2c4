use criterion::{black_box, criterion_group, criterion_main, Criterion};
use fragscout::search::{match_document, PatternCompiler};
use fragscout::{search, FileEntry, FileKind, SearchConfig, SearchQuery};
use std::{fs::File, io::Write};
use tempfile::tempdir;

fn create_test_files(
    dir: &tempfile::TempDir,
    file_count: usize,
    lines_per_file: usize,
) -> std::io::Result<()> {
    for i in 0..file_count {
        let file_path = dir.path().join(format!("chapter_{}.wt", i));
        let mut file = File::create(file_path)?;
        for j in 0..lines_per_file {
            writeln!(
                file,
                "Line {}: the dragon (old, red) slept; the knight's dragonfly waited {} times.",
                j, j
            )?;
        }
    }
    Ok(())
}

fn document(lines: usize) -> String {
    (0..lines)
        .map(|j| format!("Line {}: the dragon (old, red) slept; the knight's dragonfly waited.\n", j))
        .collect()
}

fn bench_line_extraction(c: &mut Criterion) {
    let text = document(1000);
    let entry = FileEntry::new("chapter.wt", FileKind::Fragment);
    let compiler = PatternCompiler::new();

    let queries = vec![
        ("literal", SearchQuery::new("dragon")),
        ("whole_word", SearchQuery::new("dragon").whole_word(true)),
        (
            "regex_ignore_case",
            SearchQuery::new(r"k\w+t").regex(true).case_insensitive(true),
        ),
    ];

    let mut group = c.benchmark_group("Line Extraction");
    for (name, query) in queries {
        let pattern = compiler.compile(&query).unwrap();
        group.bench_function(name, |b| {
            b.iter(|| black_box(match_document(&entry, black_box(&text), &pattern)));
        });
    }
    group.finish();
}

fn bench_pattern_cache(c: &mut Criterion) {
    let compiler = PatternCompiler::new();
    let query = SearchQuery::new("dragon").whole_word(true).case_insensitive(true);

    c.bench_function("compile_cached", |b| {
        b.iter(|| black_box(compiler.compile(black_box(&query)).unwrap()));
    });
}

fn bench_file_scaling(c: &mut Criterion) -> std::io::Result<()> {
    let rt = tokio::runtime::Runtime::new()?;
    let query = SearchQuery::new("dragon").whole_word(true);

    let mut group = c.benchmark_group("File Scaling");
    for count in [1, 10, 100, 1000] {
        let dir = tempdir()?;
        create_test_files(&dir, count, 20)?;
        let config = SearchConfig::for_root(dir.path());

        group.bench_function(format!("files_{}", count), |b| {
            b.to_async(&rt)
                .iter(|| async { black_box(search(&config, &query).await.unwrap()) });
        });
    }
    group.finish();
    Ok(())
}

fn run_file_scaling(c: &mut Criterion) {
    bench_file_scaling(c).unwrap();
}

criterion_group!(
    benches,
    bench_line_extraction,
    bench_pattern_cache,
    run_file_scaling
);
criterion_main!(benches);
