use criterion::{criterion_group, criterion_main, Criterion};
use ferrovis_image::{Image, ImageSize};
use std::hint::black_box;

const SIZE: ImageSize = ImageSize {
    width: 1920,
    height: 1080,
};

fn sample_bytes() -> Vec<u8> {
    (0..SIZE.area() * 3).map(|i| (i % 256) as u8).collect()
}

fn bench_image(c: &mut Criterion) {
    let mut group = c.benchmark_group("Image");

    group.bench_function("from_interleaved_u8", |b| {
        let bytes = sample_bytes();
        b.iter(|| black_box(Image::from_interleaved_u8(SIZE, 3, &bytes).unwrap()))
    });

    group.bench_function("to_interleaved_u8", |b| {
        let image = Image::from_interleaved_u8(SIZE, 3, &sample_bytes()).unwrap();
        b.iter(|| black_box(image.to_interleaved_u8()))
    });

    group.bench_function("get_pixel_clamped", |b| {
        let image = Image::from_size_val(SIZE, 3, 0.5).unwrap();
        b.iter(|| {
            let mut sum = 0.0;
            for y in -1..SIZE.height as isize + 1 {
                sum += image.get_pixel(-1, y, 0) + image.get_pixel(SIZE.width as isize, y, 2);
            }
            black_box(sum)
        })
    });

    group.finish();
}

criterion_group!(benches, bench_image);
criterion_main!(benches);
