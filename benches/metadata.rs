use criterion::{criterion_group, criterion_main, Criterion};
use gphoto2_fs::{metadata::Metadata, mime};
use std::hint::black_box;

fn fragment(entries: usize) -> String {
    (0..entries)
        .map(|i| format!("<Key{i}>value &amp; {i}</Key{i}>"))
        .collect()
}

pub fn benchmark_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("metadata");
    for entries in [4, 16, 64, 256].iter() {
        let xml = fragment(*entries);
        // An unclosed tag up front forces the lenient scan.
        let broken = format!("<Broken>{xml}");

        group.bench_with_input(format!("strict/{entries}"), &xml, |b, xml| {
            b.iter(|| Metadata::parse(black_box(xml)))
        });
        group.bench_with_input(format!("lenient/{entries}"), &broken, |b, xml| {
            b.iter(|| Metadata::parse(black_box(xml)))
        });

        let metadata = Metadata::parse(&xml);
        group.bench_with_input(format!("to_xml/{entries}"), &metadata, |b, metadata| {
            b.iter(|| metadata.to_xml())
        });
    }
    group.finish();
}

pub fn benchmark_mime(c: &mut Criterion) {
    let names = [
        "track.mp3",
        "IMG_0001.JPG",
        "clip.mov",
        "favourites.zpl",
        "archive.tar.gz",
    ];
    c.bench_function("mime/guess", |b| {
        b.iter(|| {
            for name in names {
                black_box(mime::guess(black_box(name)));
            }
        })
    });
}

criterion_group!(benches, benchmark_parse, benchmark_mime);
criterion_main!(benches);
