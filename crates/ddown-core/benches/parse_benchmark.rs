//! Benchmarks for Ddown parsing and rendering
//!
//! Run with: cargo bench -p ddown-core

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use ddown_core::convert::to_html;
use ddown_core::Parser;

/// Sample Ddown content exercising every block kind
const DDOWN_SAMPLE: &str = r#"{@dark-mode}

{@global-style}
h1 { color: #333333; }
.wide { width: 100%; }
#intro { margin-top: 2em; }
{@endglobal-style}

Benchmark Document
==================

This is a paragraph with `inline code`, a [link](https://example.com),
and an ![image](logo.png). It spans several source lines that the
parser joins back together.

Lists {#intro}
--------------

=> First item with some content
=> Second item with more content
=> Third item concluding the list

1. Step one of the process
2. Step two continues
3. Step three completes

Code Example
------------

```rust
fn fibonacci(n: u64) -> u64 {
    match n {
        0 => 0,
        1 => 1,
        _ => fibonacci(n - 1) + fibonacci(n - 2),
    }
}
```

Quote
-----

> The best code is no code at all.
> Every line of code you write is a liability.

Table {.wide}
-------------

| Name    | Speed   | Memory |
| ------- | ------- | ------ |
| Fast    | 100ms   | 10MB   |
| Medium  | 500ms   | 50MB   |
| Slow    | 1000ms  | 100MB  |

End of document.
"#;

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");

    group.throughput(Throughput::Bytes(DDOWN_SAMPLE.len() as u64));
    group.bench_function("ddown", |b| {
        b.iter(|| {
            let mut parser = Parser::new();
            let doc = parser.parse(black_box(DDOWN_SAMPLE));
            black_box(doc.blocks.len())
        })
    });

    group.finish();
}

fn bench_scaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("scaling");

    for size in [1, 5, 10, 20].iter() {
        let content: String = DDOWN_SAMPLE.repeat(*size);
        group.throughput(Throughput::Bytes(content.len() as u64));
        group.bench_with_input(BenchmarkId::new("ddown", size), &content, |b, content| {
            b.iter(|| {
                let mut parser = Parser::new();
                let doc = parser.parse(black_box(content));
                black_box(doc.blocks.len())
            })
        });
    }

    group.finish();
}

fn bench_inline_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("inline");

    let line = "Text with `code`, a [link](https://example.com), an ![img](x.png), and more text.";

    group.bench_function("ddown_inline", |b| {
        b.iter(|| {
            let spans = ddown_core::inline::parse_inlines(black_box(line));
            black_box(spans.len())
        })
    });

    group.finish();
}

fn bench_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("render");

    let doc = Parser::new().parse(DDOWN_SAMPLE);
    group.bench_function("html", |b| {
        b.iter(|| {
            let html = to_html(black_box(&doc));
            black_box(html.len())
        })
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_parse,
    bench_scaling,
    bench_inline_parsing,
    bench_render
);
criterion_main!(benches);
