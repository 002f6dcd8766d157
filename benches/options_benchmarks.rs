use av_morning_star::downloader::progress::parse_line;
use av_morning_star::options::{
    DownloadChoices, DownloadMode, DownloadRequest, FilenameTag, FilenameTemplate, FormatType,
    YdlOptions,
};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::path::Path;

fn benchmark_option_building(c: &mut Criterion) {
    let mut group = c.benchmark_group("Download Options");

    let mut choices = DownloadChoices::default();
    choices.download_subs = true;
    choices.normalize_audio = true;
    choices.denoise_audio = true;
    let template = FilenameTemplate::default();

    for mode in DownloadMode::ALL {
        for format_type in FormatType::ALL {
            let request =
                DownloadRequest::resolve(mode, format_type, &choices, Path::new("/downloads"), &template);
            group.bench_with_input(
                BenchmarkId::new("to_args", format!("{}-{}", mode.as_str(), format_type.as_str())),
                &request,
                |b, request| b.iter(|| YdlOptions::download(black_box(request)).to_args()),
            );
        }
    }

    group.finish();
}

fn benchmark_template(c: &mut Criterion) {
    let mut group = c.benchmark_group("Filename Template");

    for count in [1usize, 4, FilenameTag::ALL.len()] {
        let template = FilenameTemplate::new(FilenameTag::ALL.into_iter().take(count));
        group.bench_with_input(BenchmarkId::new("build", count), &template, |b, template| {
            b.iter(|| black_box(template).build(FormatType::Video))
        });
        group.bench_with_input(BenchmarkId::new("preview", count), &template, |b, template| {
            b.iter(|| black_box(template).preview())
        });
    }

    group.finish();
}

fn benchmark_progress_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("Progress Parsing");

    let lines = [
        ("template", "[morningstar] downloading| 42.3%|4230000|10000000|NA|1048576|5|/tmp/Clip.f137.mp4"),
        ("classic", "[download]  42.3% of ~ 10.00MiB at  1.00MiB/s ETA 00:05"),
        ("destination", "[download] Destination: /tmp/Clip.f137.mp4"),
        ("noise", "[youtube] Extracting URL: https://www.youtube.com/watch?v=x"),
    ];

    for (name, line) in lines {
        group.bench_with_input(BenchmarkId::new("parse_line", name), &line, |b, line| {
            b.iter(|| parse_line(black_box(line)))
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_option_building,
    benchmark_template,
    benchmark_progress_parsing
);
criterion_main!(benches);
