use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

use annotate::drawing::{
    Document, ElementKind, ElementStyle, Geometry, History, Point, create_element,
};

fn document_with(count: usize) -> Document {
    let mut doc = Document::new();
    for i in 0..count {
        let kind = if i % 4 == 0 {
            ElementKind::Freehand
        } else {
            ElementKind::Rectangle
        };
        let mut geometry = Geometry::rect((i % 40) as f32 * 20.0, (i / 40) as f32 * 20.0, 18.0, 18.0);
        if kind == ElementKind::Freehand {
            geometry.points = (0..200).map(|j| Point::new(j as f32, (j * 2) as f32)).collect();
        }
        doc.push(create_element(kind, geometry, ElementStyle::default()));
    }
    doc
}

/// Snapshot cost of `record` for growing documents
fn bench_record(c: &mut Criterion) {
    let mut group = c.benchmark_group("History Record");

    for count in [10, 100, 500] {
        let doc = document_with(count);
        group.bench_with_input(BenchmarkId::from_parameter(count), &doc, |b, doc| {
            b.iter(|| {
                let mut history = History::new();
                history.record(black_box(doc));
                black_box(history.len())
            });
        });
    }

    group.finish();
}

fn bench_undo_redo(c: &mut Criterion) {
    let doc = document_with(100);
    let mut history = History::new();
    for _ in 0..20 {
        history.record(&doc);
    }

    c.bench_function("History Undo+Redo", |b| {
        b.iter(|| {
            let undone = history.undo();
            let redone = history.redo();
            black_box((undone, redone))
        });
    });
}

/// Topmost-first hit testing, worst case (miss)
fn bench_hit_test(c: &mut Criterion) {
    let mut group = c.benchmark_group("Hit Test");

    for count in [10, 100, 1000] {
        let doc = document_with(count);
        group.bench_with_input(BenchmarkId::new("miss", count), &doc, |b, doc| {
            b.iter(|| black_box(doc.hit_test(black_box(Point::new(-5.0, -5.0)))));
        });
        group.bench_with_input(BenchmarkId::new("hit", count), &doc, |b, doc| {
            b.iter(|| black_box(doc.hit_test(black_box(Point::new(25.0, 5.0)))));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_record, bench_undo_redo, bench_hit_test);
criterion_main!(benches);
